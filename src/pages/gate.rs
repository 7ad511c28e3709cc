//! Gated view: loading, login prompt, or the posts feed.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the single screen of the client. Which mode it shows depends only
//! on the latest session status; the view owns the login form and feed
//! models and routes user actions to the session coordinator.
//!
//! LIFECYCLE
//! =========
//! `mount` takes one session subscription for the lifetime of the view and
//! dropping the view releases it. Every entry into `Content` triggers one
//! feed read; leaving `Content` clears the cached feed.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use std::sync::Arc;

use tokio::sync::watch;

use crate::net::posts::PostsBackend;
use crate::net::types::PostsError;
use crate::state::feed::PostsFeed;
use crate::state::login_form::LoginForm;
use crate::state::session::{LoginOutcome, Session, SessionCoordinator, SessionError, SessionStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Loading,
    LoginPrompt,
    Content,
}

/// Pure mapping from session status to what the view renders.
#[must_use]
pub fn render_mode(status: SessionStatus) -> RenderMode {
    match status {
        SessionStatus::Unknown => RenderMode::Loading,
        SessionStatus::Unauthenticated => RenderMode::LoginPrompt,
        SessionStatus::Authenticated => RenderMode::Content,
    }
}

pub struct GatedView {
    coordinator: Arc<SessionCoordinator>,
    session: watch::Receiver<Session>,
    mode: RenderMode,
    login: LoginForm,
    feed: PostsFeed,
    notice: Option<String>,
}

impl GatedView {
    /// Attach a view to `coordinator`. Starts in [`RenderMode::Loading`];
    /// call [`GatedView::sync`] or [`GatedView::changed`] to evaluate.
    ///
    /// A session that is already resolved counts as unseen, so the first
    /// `changed` returns at once with it.
    pub fn mount(coordinator: Arc<SessionCoordinator>, backend: Arc<dyn PostsBackend>) -> Self {
        let mut session = coordinator.watch();
        let resolved = session.borrow().status != SessionStatus::Unknown;
        if resolved {
            session.mark_changed();
        }
        Self {
            coordinator,
            session,
            mode: RenderMode::Loading,
            login: LoginForm::new(),
            feed: PostsFeed::new(backend),
            notice: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    #[must_use]
    pub fn login(&self) -> &LoginForm {
        &self.login
    }

    pub fn login_mut(&mut self) -> &mut LoginForm {
        &mut self.login
    }

    #[must_use]
    pub fn feed(&self) -> &PostsFeed {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut PostsFeed {
        &mut self.feed
    }

    /// User-visible notice from the last failed action, if any.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Re-evaluate against the latest session.
    pub async fn sync(&mut self) -> RenderMode {
        let status = self.session.borrow_and_update().status;
        let next = render_mode(status);
        let previous = std::mem::replace(&mut self.mode, next);

        if previous != next {
            tracing::debug!(?previous, ?next, "render mode changed");
            match next {
                RenderMode::Content => {
                    if let Err(e) = self.feed.load().await {
                        self.notice = Some(e.to_string());
                    }
                }
                RenderMode::Loading | RenderMode::LoginPrompt => self.feed.reset(),
            }
        }
        next
    }

    /// Wait for the next session change, then re-evaluate.
    ///
    /// Returns `None` if the session channel has closed.
    pub async fn changed(&mut self) -> Option<RenderMode> {
        self.session.changed().await.ok()?;
        Some(self.sync().await)
    }

    /// Submit the login form through the coordinator.
    ///
    /// Returns `None` without calling anything unless the login prompt is
    /// showing and no submit is already in flight.
    pub async fn submit_login(&mut self) -> Option<Result<LoginOutcome, SessionError>> {
        if self.mode != RenderMode::LoginPrompt {
            return None;
        }
        let credentials = self.login.begin_submit()?;
        self.notice = None;
        let result = self.coordinator.login(&credentials).await;
        self.login.finish_submit();
        self.capture(result.as_ref().err());
        self.sync().await;
        Some(result)
    }

    /// End the session.
    ///
    /// # Errors
    ///
    /// Returns the coordinator's logout error; the mode is unchanged.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        let result = self.coordinator.logout().await;
        self.capture(result.as_ref().err());
        self.sync().await;
        result
    }

    /// Send the feed draft as a new post. Only allowed while showing content.
    ///
    /// # Errors
    ///
    /// Returns [`PostsError::Unauthenticated`] outside `Content`, otherwise
    /// the backend error.
    pub async fn create_post(&mut self) -> Result<(), PostsError> {
        if self.mode != RenderMode::Content {
            return Err(PostsError::Unauthenticated);
        }
        let result = self.feed.create().await;
        if let Err(e) = &result {
            self.notice = Some(e.to_string());
        }
        result
    }

    fn capture(&mut self, error: Option<&SessionError>) {
        if let Some(e) = error {
            self.notice = Some(e.to_string());
        }
    }
}
