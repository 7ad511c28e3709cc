//! Identity provider contract.
//!
//! SYSTEM CONTEXT
//! ==============
//! The provider owns credentials, tokens, and session persistence. The client
//! only asks it to sign in, sign up, or sign out, and listens for the session
//! changes it reports. Those change events are the source of truth for whether
//! the user is authenticated.

use std::sync::Arc;

use super::types::{AuthError, ProviderUser};
use crate::util::listeners::{Listener, Subscription};

/// Callback receiving the provider's current session (`None` when signed out).
pub type SessionListener = Listener<Option<ProviderUser>>;

/// Wrap a closure as a [`SessionListener`].
pub fn session_listener(f: impl Fn(Option<&ProviderUser>) + Send + Sync + 'static) -> SessionListener {
    Arc::new(move |user: &Option<ProviderUser>| f(user.as_ref()))
}

/// External service that issues and validates credentials.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new account and sign it in.
    async fn create_account(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError>;

    /// Sign in with an existing account.
    async fn authenticate(&self, email: &str, password: &str) -> Result<ProviderUser, AuthError>;

    /// End the current session.
    async fn terminate_session(&self) -> Result<(), AuthError>;

    /// Register for session change events.
    ///
    /// Implementations fire at least once when the initial session state is
    /// resolved, then again on every change, for as long as the returned
    /// guard is alive.
    fn on_session_change(&self, listener: SessionListener) -> Subscription;
}
