//! Survey backend service implementation
//!
//! This service handles the HTTP integration with the survey backend:
//! media webhooks for new images and survey answer submissions, with
//! bounded timeouts and error classification.

use reqwest::Client;
use tracing::{debug, info};
use crate::config::BackendConfig;
use crate::models::{SurveyResponse, SurveySubmission, WebhookPayload};
use crate::utils::errors::{BackendError, BackendResult, Result, SurveyRelayError};

/// Client for the survey backend
#[derive(Clone, Debug)]
pub struct BackendService {
    client: Client,
    config: BackendConfig,
}

impl BackendService {
    /// Create a new BackendService instance
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent("SurveyRelay/1.0")
            .build()
            .map_err(SurveyRelayError::Http)?;

        Ok(Self { client, config })
    }

    /// Notify the backend of an inbound media message
    pub async fn post_webhook(&self, payload: &WebhookPayload) -> BackendResult<()> {
        let url = self.config.webhook_url();
        debug!(from = %payload.from, message_id = %payload.id, url = %url, "Posting media webhook");

        let response = self.client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(BackendError::RequestFailed(format!("HTTP {}: {}", status, error_text)));
        }

        info!(from = %payload.from, message_id = %payload.id, "Media webhook delivered");
        Ok(())
    }

    /// Relay one survey answer and return the backend's verdict
    pub async fn submit_survey_answer(&self, submission: &SurveySubmission) -> BackendResult<SurveyResponse> {
        let url = self.config.survey_url();
        debug!(
            from = %submission.from,
            question_number = submission.question_number,
            score = submission.score,
            "Submitting survey answer"
        );

        let response = self.client
            .post(&url)
            .json(submission)
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(BackendError::RequestFailed(format!("HTTP {}: {}", status, error_text)));
        }

        response
            .json::<SurveyResponse>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

fn map_request_error(e: reqwest::Error) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout
    } else if e.is_connect() {
        BackendError::ServiceUnavailable
    } else {
        BackendError::RequestFailed(e.to_string())
    }
}
