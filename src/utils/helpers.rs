//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::utils::errors::{Result, SurveyRelayError};

/// Lowest accepted survey score
pub const MIN_SCORE: u8 = 1;

/// Highest accepted survey score
pub const MAX_SCORE: u8 = 5;

/// Number of questions in one survey cycle
pub const TOTAL_QUESTIONS: u32 = 5;

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Format a timestamp for wire output
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339()
}

/// Parse a survey score.
///
/// Only the literal tokens `"1"` through `"5"` are accepted; surrounding
/// whitespace, signs and leading zeros are rejected.
pub fn parse_score(input: &str) -> Option<u8> {
    match input.as_bytes() {
        [digit @ b'0'..=b'9'] => {
            let score = digit - b'0';
            (MIN_SCORE..=MAX_SCORE).contains(&score).then_some(score)
        }
        _ => None,
    }
}

/// Validate a survey answer, rejecting anything that is not a score
pub fn validate_score(input: &str) -> Result<u8> {
    parse_score(input).ok_or_else(|| {
        SurveyRelayError::ValidationRejected(format!(
            "{:?} is not a score between {} and {}",
            truncate_text(input, 16),
            MIN_SCORE,
            MAX_SCORE
        ))
    })
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Check that a required string parameter carries content
pub fn is_present(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}
