//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the SurveyRelay application.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{SurveyRelayError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be held
/// for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, &config.file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .map_err(|e| SurveyRelayError::Config(format!("Failed to install subscriber: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: &str, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log conversation state transitions
pub fn log_state_transition(user_id: &str, transition: &str, question_number: u32) {
    debug!(
        user_id = user_id,
        transition = transition,
        question_number = question_number,
        "Conversation state changed"
    );
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}

/// Log the outcome of an outbound chat send
pub fn log_send_result(to: &str, kind: &str, success: bool, error: Option<&str>) {
    if success {
        info!(to = to, kind = kind, "Message delivered to transport");
    } else {
        warn!(to = to, kind = kind, error = error, "Message delivery failed");
    }
}
