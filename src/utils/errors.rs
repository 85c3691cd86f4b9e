//! Error handling for SurveyRelay
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for SurveyRelay application
#[derive(Error, Debug)]
pub enum SurveyRelayError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Chat transport is not ready")]
    NotReady,

    #[error("Event queue is full")]
    QueueFull,

    #[error("Send failed: {0}")]
    SendFailure(#[from] TransportError),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(#[from] BackendError),

    #[error("Survey answer rejected: {0}")]
    ValidationRejected(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Pairing code rendering failed: {0}")]
    Pairing(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Survey backend specific errors
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend request failed: {0}")]
    RequestFailed(String),

    #[error("Backend timeout")]
    Timeout,

    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),

    #[error("Backend service unavailable")]
    ServiceUnavailable,
}

/// Chat transport specific errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Transport rejected the request: {0}")]
    Rejected(String),

    #[error("Transport timeout")]
    Timeout,

    #[error("Media unavailable: {0}")]
    MediaUnavailable(String),

    #[error("Transport unreachable: {0}")]
    Unreachable(String),
}

/// Result type alias for SurveyRelay operations
pub type Result<T> = std::result::Result<T, SurveyRelayError>;

/// Result type alias for backend operations
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Result type alias for transport operations
pub type TransportResult<T> = std::result::Result<T, TransportError>;

impl SurveyRelayError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            SurveyRelayError::InvalidRequest(_) => false,
            SurveyRelayError::NotReady => true,
            SurveyRelayError::QueueFull => true,
            SurveyRelayError::SendFailure(_) => true,
            SurveyRelayError::BackendUnavailable(_) => true,
            SurveyRelayError::ValidationRejected(_) => false,
            SurveyRelayError::Config(_) => false,
            SurveyRelayError::Pairing(_) => false,
            SurveyRelayError::Http(_) => true,
            SurveyRelayError::Serialization(_) => false,
            SurveyRelayError::Io(_) => true,
            SurveyRelayError::UrlParse(_) => false,
            SurveyRelayError::Base64(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SurveyRelayError::Config(_) => ErrorSeverity::Critical,
            SurveyRelayError::NotReady | SurveyRelayError::QueueFull => ErrorSeverity::Warning,
            SurveyRelayError::InvalidRequest(_) => ErrorSeverity::Info,
            SurveyRelayError::ValidationRejected(_) => ErrorSeverity::Info,
            SurveyRelayError::Base64(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// HTTP status class this error surfaces as on the control surface
    pub fn status_code(&self) -> u16 {
        match self {
            SurveyRelayError::InvalidRequest(_)
            | SurveyRelayError::ValidationRejected(_)
            | SurveyRelayError::Base64(_) => 400,
            SurveyRelayError::NotReady | SurveyRelayError::QueueFull => 503,
            _ => 500,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
