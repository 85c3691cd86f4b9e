//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{SurveyRelayError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_bridge_config(&settings.bridge)?;
    validate_backend_config(&settings.backend)?;
    validate_coordinator_config(&settings.coordinator)?;
    validate_pairing_config(&settings.pairing)?;
    validate_prompts_config(&settings.prompts)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate control surface configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(SurveyRelayError::Config(
            "Server host is required".to_string()
        ));
    }

    if config.port == 0 {
        return Err(SurveyRelayError::Config(
            "Server port must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate chat bridge configuration
fn validate_bridge_config(config: &super::BridgeConfig) -> Result<()> {
    validate_url("Bridge API URL", &config.api_url)?;

    if config.timeout_seconds == 0 {
        return Err(SurveyRelayError::Config(
            "Bridge timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate survey backend configuration
fn validate_backend_config(config: &super::BackendConfig) -> Result<()> {
    validate_url("Backend API URL", &config.api_url)?;

    if config.timeout_seconds == 0 {
        return Err(SurveyRelayError::Config(
            "Backend timeout must be greater than 0".to_string()
        ));
    }

    if config.webhook_path.is_empty() || config.survey_path.is_empty() {
        return Err(SurveyRelayError::Config(
            "Backend webhook and survey paths are required".to_string()
        ));
    }

    Ok(())
}

/// Validate event consumer configuration
fn validate_coordinator_config(config: &super::CoordinatorConfig) -> Result<()> {
    if config.queue_capacity == 0 {
        return Err(SurveyRelayError::Config(
            "Event queue capacity must be greater than 0".to_string()
        ));
    }

    if config.send_timeout_seconds == 0 {
        return Err(SurveyRelayError::Config(
            "Send timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

fn validate_pairing_config(config: &super::PairingConfig) -> Result<()> {
    if config.artifact_path.is_empty() {
        return Err(SurveyRelayError::Config(
            "Pairing artifact path is required".to_string()
        ));
    }

    Ok(())
}

/// Validate chat reply texts
fn validate_prompts_config(config: &super::PromptsConfig) -> Result<()> {
    let prompts = [
        ("no_image", &config.no_image),
        ("awaiting_audio", &config.awaiting_audio),
        ("invalid_score", &config.invalid_score),
        ("acknowledgement", &config.acknowledgement),
        ("retry", &config.retry),
    ];

    for (name, text) in prompts {
        if text.trim().is_empty() {
            return Err(SurveyRelayError::Config(
                format!("Prompt '{}' must not be empty", name)
            ));
        }
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(SurveyRelayError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(SurveyRelayError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    if config.file_path.is_empty() || config.file_name.is_empty() {
        return Err(SurveyRelayError::Config(
            "Log file path and name are required".to_string()
        ));
    }

    Ok(())
}

fn validate_url(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(SurveyRelayError::Config(format!("{} is required", name)));
    }

    let parsed = url::Url::parse(value)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SurveyRelayError::Config(
            format!("{} must use http or https, got {}", name, parsed.scheme())
        ));
    }

    Ok(())
}
