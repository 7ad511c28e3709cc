//! Shared DTOs and error kinds for the collaborator boundary.
//!
//! DESIGN
//! ======
//! Collaborators report failures as a structured [`ErrorKind`] so callers can
//! branch on what happened (notably the login → signup fallback) without ever
//! inspecting human-readable provider text.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR KINDS
// =============================================================================

/// Failure taxonomy shared by the identity provider and the posts backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No account matches the supplied credential.
    InvalidCredential,
    /// The collaborator could not be reached.
    NetworkFailure,
    /// A required field was empty or malformed.
    ValidationFailure,
    Unknown,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::InvalidCredential => "invalid credential",
            Self::NetworkFailure => "network failure",
            Self::ValidationFailure => "validation failure",
            Self::Unknown => "unknown error",
        };
        f.write_str(label)
    }
}

/// Failure reported by an identity provider.
///
/// `code` is the provider's machine-readable reason (e.g. `EMAIL_NOT_FOUND`)
/// kept for logs only; behavior keys off `kind`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {code}")]
pub struct AuthError {
    pub kind: ErrorKind,
    pub code: String,
}

impl AuthError {
    pub fn new(kind: ErrorKind, code: impl Into<String>) -> Self {
        Self { kind, code: code.into() }
    }
}

/// Failure reported by the posts backend.
#[derive(Debug, thiserror::Error)]
pub enum PostsError {
    /// The request never produced an HTTP response.
    #[error("posts request failed: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("posts request failed: status {0}")]
    Status(u16),

    /// The response body was not the expected JSON shape.
    #[error("posts response parse failed: {0}")]
    Decode(String),

    /// A write was attempted without an authenticated session.
    #[error("sign in before creating posts")]
    Unauthenticated,
}

impl PostsError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) => ErrorKind::NetworkFailure,
            Self::Status(_) | Self::Decode(_) | Self::Unauthenticated => ErrorKind::Unknown,
        }
    }
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Email + password pair held only for the duration of one submit.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signed-in account as reported by the identity provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderUser {
    /// Provider-assigned account identifier.
    pub uid: String,
    pub email: Option<String>,
}

// =============================================================================
// POSTS
// =============================================================================

/// A feed entry as exchanged with the posts backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post title.
    pub name: String,
    pub content: String,
}
