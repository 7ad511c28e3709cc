//! Client-side state modules.
//!
//! DESIGN
//! ======
//! State is split by concern (`session`, `login_form`, `feed`) so the gated
//! view can compose small focused models and each can be tested alone.

pub mod feed;
pub mod login_form;
pub mod session;
