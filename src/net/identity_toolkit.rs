//! Identity Toolkit REST provider.
//!
//! Thin HTTP wrapper for the `accounts:signUp` and
//! `accounts:signInWithPassword` endpoints. Pure parsing in `parse_user` and
//! `parse_error` for testability.
//!
//! ERROR HANDLING
//! ==============
//! Provider failures arrive as `{"error": {"message": "CODE : detail"}}`.
//! Only the leading machine code is mapped to an [`ErrorKind`]; the free-text
//! detail is never interpreted.

#[cfg(test)]
#[path = "identity_toolkit_test.rs"]
mod identity_toolkit_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::identity::{IdentityProvider, SessionListener};
use super::types::{AuthError, ErrorKind, ProviderUser};
use crate::config::{ConfigError, IdentityConfig};
use crate::util::listeners::{Listeners, Subscription};

const SIGN_UP_ENDPOINT: &str = "accounts:signUp";
const SIGN_IN_ENDPOINT: &str = "accounts:signInWithPassword";

// =============================================================================
// PROVIDER
// =============================================================================

/// [`IdentityProvider`] backed by the Identity Toolkit REST API.
///
/// The signed-in account is held in memory only; it starts signed out, so
/// the initial session resolution is immediate.
pub struct IdentityToolkitProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    current: Mutex<Option<ProviderUser>>,
    listeners: Listeners<Option<ProviderUser>>,
}

impl IdentityToolkitProvider {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &IdentityConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::HttpClientBuild(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            current: Mutex::new(None),
            listeners: Listeners::new(),
        })
    }

    /// The account currently signed in, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<ProviderUser> {
        self.current().clone()
    }

    fn current(&self) -> MutexGuard<'_, Option<ProviderUser>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace_session(&self, user: Option<ProviderUser>) {
        *self.current() = user.clone();
        self.listeners.emit(&user);
    }

    async fn password_request(&self, endpoint: &str, email: &str, password: &str) -> Result<ProviderUser, AuthError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let body = PasswordRequest { email, password, return_secure_token: true };

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AuthError::new(ErrorKind::NetworkFailure, e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::new(ErrorKind::NetworkFailure, e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(parse_error(status, &text));
        }

        parse_user(&text)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for IdentityToolkitProvider {
    async fn create_account(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError> {
        let user = self.password_request(SIGN_UP_ENDPOINT, email, password).await?;
        tracing::info!(uid = %user.uid, "identity account created");
        self.replace_session(Some(user.clone()));
        Ok(user)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError> {
        let user = self.password_request(SIGN_IN_ENDPOINT, email, password).await?;
        tracing::info!(uid = %user.uid, "identity session started");
        self.replace_session(Some(user.clone()));
        Ok(user)
    }

    async fn terminate_session(&self) -> Result<(), AuthError> {
        if let Some(user) = self.current_user() {
            tracing::info!(uid = %user.uid, "identity session ended");
        }
        self.replace_session(None);
        Ok(())
    }

    fn on_session_change(&self, listener: SessionListener) -> Subscription {
        let subscription = self.listeners.add(Arc::clone(&listener));
        let snapshot = self.current_user();
        listener(&snapshot);
        subscription
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    local_id: String,
    email: Option<String>,
}

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: String,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_user(json: &str) -> Result<ProviderUser, AuthError> {
    let body: PasswordResponse =
        serde_json::from_str(json).map_err(|e| AuthError::new(ErrorKind::Unknown, format!("bad response: {e}")))?;
    Ok(ProviderUser { uid: body.local_id, email: body.email })
}

fn parse_error(status: u16, json: &str) -> AuthError {
    match serde_json::from_str::<ErrorEnvelope>(json) {
        Ok(envelope) => {
            let code = error_code(&envelope.error.message);
            AuthError::new(classify_error_code(code), code)
        }
        Err(_) => AuthError::new(ErrorKind::Unknown, format!("status {status}")),
    }
}

/// Leading machine code of a provider message (`"WEAK_PASSWORD : ..."` → `"WEAK_PASSWORD"`).
fn error_code(message: &str) -> &str {
    message.split(" : ").next().unwrap_or(message).trim()
}

fn classify_error_code(code: &str) -> ErrorKind {
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "USER_NOT_FOUND" => {
            ErrorKind::InvalidCredential
        }
        "INVALID_EMAIL" | "MISSING_EMAIL" | "MISSING_PASSWORD" | "WEAK_PASSWORD" => ErrorKind::ValidationFailure,
        _ => ErrorKind::Unknown,
    }
}
