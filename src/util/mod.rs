//! Utility helpers shared across state and collaborator modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Callback fan-out is needed both by identity providers (session change
//! events) and by the session coordinator (authenticated flag), so the
//! registry lives here instead of in either owner.

pub mod listeners;
