//! Client configuration parsed from environment variables.

pub const DEFAULT_POSTS_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_IDENTITY_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

pub const POSTS_URL_VAR: &str = "FEEDGATE_POSTS_URL";
pub const IDENTITY_API_KEY_VAR: &str = "FEEDGATE_IDENTITY_API_KEY";
pub const IDENTITY_URL_VAR: &str = "FEEDGATE_IDENTITY_URL";

/// Errors produced while assembling the client.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing config: env var {var} not set")]
    MissingVar { var: &'static str },

    /// A variable is set but unusable.
    #[error("invalid config: {var}={value:?} ({reason})")]
    Invalid { var: &'static str, value: String, reason: &'static str },

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub posts_base_url: String,
    pub identity: IdentityConfig,
}

impl ClientConfig {
    /// Build typed client config from environment variables, loading `.env`
    /// first when one is present.
    ///
    /// Required:
    /// - `FEEDGATE_IDENTITY_API_KEY`
    ///
    /// Optional:
    /// - `FEEDGATE_POSTS_URL`: default `http://127.0.0.1:5000`
    /// - `FEEDGATE_IDENTITY_URL`: default Identity Toolkit v1 endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or a URL is not http(s).
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(IDENTITY_API_KEY_VAR)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingVar { var: IDENTITY_API_KEY_VAR })?;

        let posts_base_url = base_url(&lookup, POSTS_URL_VAR, DEFAULT_POSTS_BASE_URL)?;
        let identity_base_url = base_url(&lookup, IDENTITY_URL_VAR, DEFAULT_IDENTITY_BASE_URL)?;

        Ok(Self { posts_base_url, identity: IdentityConfig { api_key, base_url: identity_base_url } })
    }
}

fn base_url(lookup: &impl Fn(&str) -> Option<String>, var: &'static str, default: &str) -> Result<String, ConfigError> {
    let raw = lookup(var).unwrap_or_else(|| default.to_owned());
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid { var, value: raw.clone(), reason: "expected an http(s) URL" });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
