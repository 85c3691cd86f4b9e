//! Survey submission relay
//!
//! Validates a user's score, relays it to the backend together with the
//! cycle's image reference and question number, and applies the backend's
//! verdict to the conversation state.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::PromptsConfig;
use crate::models::SurveySubmission;
use crate::state::ConversationState;
use crate::transport::ChatTransport;
use crate::utils::errors::Result;
use crate::utils::helpers::{validate_score, TOTAL_QUESTIONS};
use crate::utils::logging::{log_api_error, log_state_transition};
use super::backend::BackendService;
use super::reply;

/// What happened to a survey answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyOutcome {
    /// Not a score in 1..=5; the user was asked to correct it
    Rejected,
    /// The backend accepted the answer
    Recorded { finished: bool },
    /// The backend could not be reached or refused the answer; the user was asked to retry
    BackendFailed,
}

#[derive(Clone)]
pub struct SurveyRelay {
    backend: BackendService,
    transport: Arc<dyn ChatTransport>,
    prompts: PromptsConfig,
    send_timeout: Duration,
}

impl SurveyRelay {
    pub fn new(
        backend: BackendService,
        transport: Arc<dyn ChatTransport>,
        prompts: PromptsConfig,
        send_timeout: Duration,
    ) -> Self {
        Self {
            backend,
            transport,
            prompts,
            send_timeout,
        }
    }

    /// Handle a text candidate while the user's survey is active.
    ///
    /// `state` is the caller's locked record; the backend call happens
    /// under that lock so no other update for this user can interleave.
    /// The question counter only moves once the backend has accepted the answer.
    pub async fn handle_answer(
        &self,
        user_id: &str,
        state: &mut ConversationState,
        candidate: &str,
    ) -> Result<SurveyOutcome> {
        let score = match validate_score(candidate) {
            Ok(score) => score,
            Err(e) => {
                info!(user_id = user_id, error = %e, "Rejected survey answer");
                reply(self.transport.as_ref(), user_id, &self.prompts.invalid_score, self.send_timeout).await?;
                return Ok(SurveyOutcome::Rejected);
            }
        };

        let submission = SurveySubmission {
            from: user_id.to_string(),
            image_id: state.image_reference.clone(),
            question_number: state.question_number,
            score,
        };

        let response = match self.backend.submit_survey_answer(&submission).await {
            Ok(response) => response,
            Err(e) => {
                log_api_error("survey", &e.to_string(), Some(user_id));
                reply(self.transport.as_ref(), user_id, &self.prompts.retry, self.send_timeout).await?;
                return Ok(SurveyOutcome::BackendFailed);
            }
        };

        // The backend did not store the answer; the same question is asked again.
        if response.error {
            warn!(
                user_id = user_id,
                question_number = state.question_number,
                "Backend refused the survey answer"
            );
            let message = non_empty(response.message.as_deref()).unwrap_or(&self.prompts.retry);
            reply(self.transport.as_ref(), user_id, message, self.send_timeout).await?;
            return Ok(SurveyOutcome::BackendFailed);
        }

        state.advance_question();
        if let Some(next) = response.next_question {
            state.question_number = next;
        }
        log_state_transition(user_id, "answer_recorded", state.question_number);

        if !response.finished && state.question_number > TOTAL_QUESTIONS {
            warn!(
                user_id = user_id,
                question_number = state.question_number,
                "Backend kept the survey open past the last question"
            );
        }

        if response.finished {
            state.complete_cycle();
            info!(user_id = user_id, "Survey finished, cycle closed");
            log_state_transition(user_id, "cycle_completed", state.question_number);
        }

        let message = non_empty(response.message.as_deref()).unwrap_or(&self.prompts.acknowledgement);
        reply(self.transport.as_ref(), user_id, message, self.send_timeout).await?;

        Ok(SurveyOutcome::Recorded { finished: response.finished })
    }
}

fn non_empty(message: Option<&str>) -> Option<&str> {
    message.filter(|m| !m.trim().is_empty())
}
