//! Page modules for screen-level orchestration.
//!
//! ARCHITECTURE
//! ============
//! The client has one screen, `gate`, which composes the state models and
//! decides which of them is rendered.

pub mod gate;
