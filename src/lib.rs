//! # feedgate
//!
//! Session coordination layer for a small posts-feed web client.
//!
//! Authentication is delegated to an external identity provider and posts are
//! stored by an external REST backend. This crate owns the parts in between:
//! the session state machine (`state::session`), the gated view that decides
//! between loading / login / content (`pages::gate`), the login form and feed
//! view models, and the HTTP collaborators that talk to the outside world.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;
