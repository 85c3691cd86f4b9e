//! State management module
//!
//! This module handles per-user conversation state and inbound classification

pub mod classifier;
pub mod context;
pub mod storage;

// Re-export commonly used state components
pub use classifier::{classify, InboundAction};
pub use context::ConversationState;
pub use storage::ConversationStore;
