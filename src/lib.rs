//! SurveyRelay
//!
//! A chat relay for an image description service. Users send an image, the
//! backend answers with an audio description, and the user is then walked
//! through a scored satisfaction survey. This library holds the per-user
//! conversation state machine, the relays to the backend, the outbound send
//! gateway and the HTTP control surface that ties them together.

#![allow(non_snake_case)]

pub mod config;
pub mod coordinator;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod transport;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{SurveyRelayError, Result};

// Re-export main components for easy access
pub use coordinator::Coordinator;
pub use services::ServiceFactory;
pub use state::{ConversationState, ConversationStore};
pub use transport::{ChatTransport, TransportEvent};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
