//! Logging middleware
//!
//! This module provides logging for control surface requests and inbound
//! chat interactions, with timing and a per-request correlation id.

use std::time::Instant;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, info, warn, Instrument};
use crate::models::InboundMessage;
use crate::utils::helpers::{generate_uuid, truncate_text};

/// Longest body excerpt written to the logs
const BODY_PREVIEW_CHARS: usize = 64;

/// Log method, path, status and latency of every control request
pub async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = generate_uuid();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let span = tracing::info_span!("control_request", request_id = %request_id, method = %method, path = %path);
    let response = next.run(request).instrument(span.clone()).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;
    span.in_scope(|| {
        if status.is_server_error() {
            warn!(status = status.as_u16(), duration_ms = duration_ms, "Control request completed with error");
        } else {
            info!(status = status.as_u16(), duration_ms = duration_ms, "Control request completed");
        }
    });

    response
}

/// Log an inbound chat message summary
pub fn log_inbound_message(message: &InboundMessage) {
    info!(
        user_id = %message.from,
        message_id = %message.id,
        message_type = %message.message_type,
        has_media = message.has_media,
        is_forwarded = message.is_forwarded,
        "Inbound message received"
    );

    if message.is_text() {
        debug!(
            user_id = %message.from,
            text = %truncate_text(&message.body, BODY_PREVIEW_CHARS),
            "Text message received"
        );
    }
}
