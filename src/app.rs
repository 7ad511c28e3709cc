//! Root wiring: collaborators, the shared session coordinator, and the view.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::sync::Arc;

use crate::config::{ClientConfig, ConfigError};
use crate::net::identity::IdentityProvider;
use crate::net::identity_toolkit::IdentityToolkitProvider;
use crate::net::posts::{HttpPostsBackend, PostsBackend};
use crate::pages::gate::GatedView;
use crate::state::session::SessionCoordinator;

/// A mounted client.
///
/// Owns the gated view and shares the coordinator with anything else that
/// needs the session (e.g. a header with a logout button).
pub struct App {
    coordinator: Arc<SessionCoordinator>,
    view: GatedView,
}

impl App {
    /// Build the client from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or an HTTP client fails
    /// to build.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    /// Build the client against the REST collaborators in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client fails to build.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let provider = Arc::new(IdentityToolkitProvider::new(&config.identity)?);
        let backend = Arc::new(HttpPostsBackend::new(&config.posts_base_url)?);
        tracing::info!(posts = %config.posts_base_url, identity = %config.identity.base_url, "client configured");
        Ok(Self::mount(provider, backend))
    }

    /// Mount a client on arbitrary collaborators.
    pub fn mount(provider: Arc<dyn IdentityProvider>, backend: Arc<dyn PostsBackend>) -> Self {
        let coordinator = SessionCoordinator::new(provider);
        let view = GatedView::mount(Arc::clone(&coordinator), backend);
        Self { coordinator, view }
    }

    #[must_use]
    pub fn coordinator(&self) -> &Arc<SessionCoordinator> {
        &self.coordinator
    }

    #[must_use]
    pub fn view(&self) -> &GatedView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut GatedView {
        &mut self.view
    }
}
