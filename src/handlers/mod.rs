//! Handlers module
//!
//! This module contains the inbound chat and control surface handlers:
//! - Message handlers for inbound chat messages
//! - Control handlers for the HTTP send, event and health endpoints

pub mod control;
pub mod messages;

// Re-export commonly used handler functions
pub use control::{control_routes, ApiError, ControlState};
pub use messages::handle_message;
