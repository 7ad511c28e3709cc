//! Collaborator boundary: identity provider and posts backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `identity` and `posts` define the traits the session layer calls into,
//! `identity_toolkit` and the HTTP half of `posts` implement them over REST,
//! and `types` holds the shared DTOs and error kinds.

pub mod identity;
pub mod identity_toolkit;
pub mod posts;
pub mod types;
