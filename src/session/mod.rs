//! Chat session management
//!
//! This module owns the transcript and conversation handle of a chat screen:
//!
//! - `message`: transcript entry types
//! - `store`: the [`SessionStore`] that appends, sends, and reconciles turns

pub mod message;
pub mod store;

pub use message::{Message, Role};
pub use store::SessionStore;
