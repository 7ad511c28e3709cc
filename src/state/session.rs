//! Session coordinator: the client-side authentication state machine.
//!
//! SYSTEM CONTEXT
//! ==============
//! One coordinator is constructed per mounted client and shared by `Arc`.
//! It holds the only writable copy of [`Session`]; views read it through
//! [`SessionCoordinator::watch`] or the boolean [`SessionCoordinator::subscribe`]
//! callbacks.
//!
//! TRANSITIONS
//! ===========
//! `Unknown` is left only when the identity provider reports its first
//! session state. After that, status moves between `Authenticated` and
//! `Unauthenticated` on provider notifications and on completed
//! login/signup/logout calls. Setting the status it already has is a no-op,
//! so a provider callback racing the completion of the call that caused it
//! produces exactly one transition.
//!
//! ERROR HANDLING
//! ==============
//! Failures are returned as [`SessionError`], whose `Display` is the notice
//! shown to the user. The only automatic follow-up is login → signup when
//! the provider reports [`ErrorKind::InvalidCredential`].

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tokio::sync::watch;

use crate::net::identity::{IdentityProvider, session_listener};
use crate::net::types::{AuthError, Credentials, ErrorKind};
use crate::util::listeners::{Listeners, Subscription};

// =============================================================================
// SESSION
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    /// The provider has not reported yet.
    #[default]
    Unknown,
    Authenticated,
    Unauthenticated,
}

/// Client-side record of whether the user is signed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub status: SessionStatus,
    /// Kind of the most recent failed operation, cleared on the next success.
    pub last_error: Option<ErrorKind>,
}

impl Session {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// A failed session operation. `Display` is the user-visible notice.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Unable to log in, please try again")]
    Login(#[source] AuthError),

    #[error("Unable to sign up, please try a different email")]
    Signup(#[source] AuthError),

    #[error("Unable to log you out, please try again")]
    Logout(#[source] AuthError),
}

impl SessionError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Login(e) | Self::Signup(e) | Self::Logout(e) => e.kind,
        }
    }
}

/// How a successful [`SessionCoordinator::login`] got there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    SignedIn,
    /// No account existed, so one was created with the same credentials.
    SignedUp,
}

// =============================================================================
// COORDINATOR
// =============================================================================

pub struct SessionCoordinator {
    provider: Arc<dyn IdentityProvider>,
    session: watch::Sender<Session>,
    listeners: Listeners<bool>,
    /// Serializes a status write with its callback delivery.
    delivery: Mutex<()>,
    provider_subscription: OnceLock<Subscription>,
}

impl SessionCoordinator {
    /// Create a coordinator and attach it to `provider`'s change events.
    ///
    /// The provider subscription lives as long as the coordinator.
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Arc<Self> {
        let coordinator = Arc::new(Self {
            provider: Arc::clone(&provider),
            session: watch::Sender::new(Session::default()),
            listeners: Listeners::new(),
            delivery: Mutex::new(()),
            provider_subscription: OnceLock::new(),
        });

        let weak = Arc::downgrade(&coordinator);
        let subscription = provider.on_session_change(session_listener(move |user| {
            if let Some(coordinator) = weak.upgrade() {
                coordinator.apply_provider_event(user.is_some());
            }
        }));
        let _ = coordinator.provider_subscription.set(subscription);

        coordinator
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        *self.session.borrow()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.session.borrow().status
    }

    /// Receiver that observes every session change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    /// Live `watch` receivers plus `subscribe` callbacks.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.session.receiver_count() + self.listeners.len()
    }

    /// Call `handler(authenticated)` on every status change until the guard
    /// is dropped.
    ///
    /// If the status is already resolved, `handler` is called once
    /// immediately with it; a subscriber that arrives late still learns the
    /// initial resolution. `handler` must not call back into `subscribe`.
    pub fn subscribe(&self, handler: impl Fn(bool) + Send + Sync + 'static) -> Subscription {
        let handler: Arc<dyn Fn(&bool) + Send + Sync> = Arc::new(move |authenticated: &bool| handler(*authenticated));
        let _delivery = self.delivery.lock().unwrap_or_else(PoisonError::into_inner);
        let subscription = self.listeners.add(Arc::clone(&handler));
        match self.status() {
            SessionStatus::Unknown => {}
            status => handler(&(status == SessionStatus::Authenticated)),
        }
        subscription
    }

    /// Sign in, falling back to creating the account when none exists.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Login`] for any failure other than a missing
    /// account, or [`SessionError::Signup`] when the fallback fails.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome, SessionError> {
        match self.provider.authenticate(&credentials.email, &credentials.password).await {
            Ok(_) => {
                self.complete(SessionStatus::Authenticated);
                Ok(LoginOutcome::SignedIn)
            }
            Err(e) if e.kind == ErrorKind::InvalidCredential => {
                tracing::info!(code = %e.code, "no matching account, attempting signup");
                self.signup(credentials).await.map(|()| LoginOutcome::SignedUp)
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                self.record_failure(e.kind);
                Err(SessionError::Login(e))
            }
        }
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Signup`] if the provider rejects the account.
    pub async fn signup(&self, credentials: &Credentials) -> Result<(), SessionError> {
        match self.provider.create_account(&credentials.email, &credentials.password).await {
            Ok(_) => {
                self.complete(SessionStatus::Authenticated);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "signup failed");
                self.record_failure(e.kind);
                Err(SessionError::Signup(e))
            }
        }
    }

    /// End the session. On failure the status is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Logout`] if the provider fails to terminate.
    pub async fn logout(&self) -> Result<(), SessionError> {
        match self.provider.terminate_session().await {
            Ok(()) => {
                self.complete(SessionStatus::Unauthenticated);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "logout failed");
                self.record_failure(e.kind);
                Err(SessionError::Logout(e))
            }
        }
    }

    fn apply_provider_event(&self, authenticated: bool) {
        let status = if authenticated { SessionStatus::Authenticated } else { SessionStatus::Unauthenticated };
        self.transition(status);
    }

    fn complete(&self, status: SessionStatus) {
        self.session.send_if_modified(|session| session.last_error.take().is_some());
        self.transition(status);
    }

    /// Callbacks must not drive a transition synchronously; delivery holds
    /// a non-reentrant lock.
    fn transition(&self, status: SessionStatus) {
        let _delivery = self.delivery.lock().unwrap_or_else(PoisonError::into_inner);
        let mut from = status;
        let changed = self.session.send_if_modified(|session| {
            if session.status == status {
                return false;
            }
            from = session.status;
            session.status = status;
            true
        });
        if changed {
            tracing::info!(?from, to = ?status, "session status changed");
            self.listeners.emit(&(status == SessionStatus::Authenticated));
        }
    }

    fn record_failure(&self, kind: ErrorKind) {
        self.session.send_modify(|session| session.last_error = Some(kind));
    }
}

impl std::fmt::Debug for SessionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCoordinator")
            .field("session", &self.session())
            .field("observers", &self.observer_count())
            .finish_non_exhaustive()
    }
}
