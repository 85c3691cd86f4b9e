//! Control surface handlers
//!
//! HTTP endpoints used by the backend and the chat bridge:
//! - `POST /sendText`: send a text message, optionally tagging the survey image
//! - `POST /sendVoice`: send a voice note and unlock the survey
//! - `POST /events`: transport event ingress from the bridge
//! - `GET /health`: liveness probe

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{error, info, warn};

use crate::middleware::logging::log_requests;
use crate::models::control::STATUS_OK;
use crate::models::{
    ErrorResponse, EventAccepted, HealthResponse, SendTextRequest, SendTextResponse,
    SendVoiceRequest, SendVoiceResponse,
};
use crate::services::SendGateway;
use crate::transport::{Readiness, TransportEvent};
use crate::utils::errors::{ErrorSeverity, SurveyRelayError};
use crate::utils::helpers::format_timestamp;

/// Shared state for control routes
#[derive(Clone)]
pub struct ControlState {
    pub gateway: SendGateway,
    pub readiness: Readiness,
    pub events: mpsc::Sender<TransportEvent>,
    pub started_at: Instant,
}

/// API error type that converts domain errors to HTTP responses
#[derive(Debug)]
pub struct ApiError(pub SurveyRelayError);

impl From<SurveyRelayError> for ApiError {
    fn from(err: SurveyRelayError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(SurveyRelayError::InvalidRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self.0.severity() {
            ErrorSeverity::Info | ErrorSeverity::Warning => {
                warn!(status = status.as_u16(), error = %self.0, "Control request rejected")
            }
            ErrorSeverity::Error | ErrorSeverity::Critical => {
                error!(status = status.as_u16(), error = %self.0, "Control request failed")
            }
        }

        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// POST /sendText
async fn send_text(
    State(state): State<ControlState>,
    payload: Result<Json<SendTextRequest>, JsonRejection>,
) -> Result<Json<SendTextResponse>, ApiError> {
    let Json(request) = payload?;
    let to = request.to.unwrap_or_default();
    let message = request.message.unwrap_or_default();

    state
        .gateway
        .send_text(&to, &message, request.image_id.as_deref())
        .await?;

    Ok(Json(SendTextResponse {
        status: STATUS_OK.to_string(),
        to,
        message,
    }))
}

/// POST /sendVoice
///
/// Readiness is checked before the body is looked at, so a request made
/// before authentication always answers 503.
async fn send_voice(
    State(state): State<ControlState>,
    payload: Result<Json<SendVoiceRequest>, JsonRejection>,
) -> Result<Json<SendVoiceResponse>, ApiError> {
    if !state.readiness.is_ready() {
        return Err(SurveyRelayError::NotReady.into());
    }

    let Json(request) = payload?;
    let to = request.to.unwrap_or_default();
    let audio = request.audio_base64.unwrap_or_default();

    state
        .gateway
        .send_voice(&to, &audio, request.image_id.as_deref())
        .await?;

    Ok(Json(SendVoiceResponse {
        status: STATUS_OK.to_string(),
        to,
    }))
}

/// POST /events
///
/// Never waits for queue space; a full queue answers 503 so the bridge can retry.
async fn ingest_event(
    State(state): State<ControlState>,
    payload: Result<Json<TransportEvent>, JsonRejection>,
) -> Result<(StatusCode, Json<EventAccepted>), ApiError> {
    let Json(event) = payload?;
    let kind = event.kind();

    match state.events.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            warn!(event = kind, "Event queue full, refusing transport event");
            return Err(SurveyRelayError::QueueFull.into());
        }
        Err(TrySendError::Closed(_)) => {
            error!(event = kind, "Event queue closed, dropping transport event");
            return Err(SurveyRelayError::NotReady.into());
        }
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(EventAccepted {
            status: "accepted".to_string(),
        }),
    ))
}

/// GET /health
async fn health(State(state): State<ControlState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: format_timestamp(chrono::Utc::now()),
        uptime: state.started_at.elapsed().as_secs_f64(),
        ready: state.readiness.is_ready(),
    })
}

/// Build the control surface routes
pub fn control_routes(state: ControlState) -> Router {
    info!("Building control surface routes");
    Router::new()
        .route("/sendText", post(send_text))
        .route("/sendVoice", post(send_voice))
        .route("/events", post(ingest_event))
        .route("/health", get(health))
        .layer(axum::middleware::from_fn(log_requests))
        .with_state(state)
}
