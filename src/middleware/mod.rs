//! Middleware module
//!
//! Request and interaction logging shared by the control surface and the
//! inbound event consumer.

pub mod logging;

pub use logging::{log_inbound_message, log_requests};
