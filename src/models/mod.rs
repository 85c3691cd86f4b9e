//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod message;
pub mod backend;
pub mod control;

// Re-export commonly used models
pub use message::{InboundMessage, MediaPayload, OutboundMedia, SendOptions};
pub use backend::{WebhookPayload, WebhookMedia, SurveySubmission, SurveyResponse};
pub use control::{SendTextRequest, SendVoiceRequest, SendTextResponse, SendVoiceResponse, HealthResponse, ErrorResponse, EventAccepted};
