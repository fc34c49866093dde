//! Type definitions module
//!
//! Core types for the conversation transcript and parsed model output.

pub mod messages;

// Re-export commonly used types
pub use messages::{ConversationTurn, ModelDirective, Role};
