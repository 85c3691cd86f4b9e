//! Test helpers module
//!
//! This module provides utilities and helpers for testing the SurveyRelay application.
//! It includes a recording chat transport, a mock survey backend, and test context setup.

#![allow(dead_code)]

pub mod backend_mock;
pub mod chat_mock;
pub mod test_context;

pub use backend_mock::*;
pub use chat_mock::*;
pub use test_context::*;

pub fn test_user_id() -> &'static str {
    "5511999990000@c.us"
}

/// A tiny JPEG header, enough to exercise the base64 path
pub fn test_image_bytes() -> Vec<u8> {
    vec![0xff, 0xd8, 0xff, 0xe0]
}

/// "OggS" in base64
pub fn test_audio_base64() -> &'static str {
    "T2dnUw=="
}
