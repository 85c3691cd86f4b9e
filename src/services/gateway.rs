//! Outbound send gateway
//!
//! Externally triggered sends (text and voice notes) and the conversation
//! side effects they carry: a text may associate the user's cycle with a
//! backend image, a delivered voice note unlocks the survey.

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::warn;

use crate::models::{OutboundMedia, SendOptions};
use crate::state::ConversationStore;
use crate::transport::{within, ChatTransport, Readiness};
use crate::utils::errors::{Result, SurveyRelayError};
use crate::utils::helpers::is_present;
use crate::utils::logging::{log_send_result, log_state_transition};

#[derive(Clone)]
pub struct SendGateway {
    transport: Arc<dyn ChatTransport>,
    store: ConversationStore,
    readiness: Readiness,
    send_timeout: Duration,
}

impl SendGateway {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        store: ConversationStore,
        readiness: Readiness,
        send_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            store,
            readiness,
            send_timeout,
        }
    }

    /// Send a text message; an image reference restarts the user's survey
    /// at question 1 without touching the media intake flags.
    pub async fn send_text(&self, to: &str, message: &str, image_reference: Option<&str>) -> Result<()> {
        if !is_present(Some(to)) || !is_present(Some(message)) {
            return Err(SurveyRelayError::InvalidRequest(
                "Parameters \"to\" and \"message\" are required".to_string(),
            ));
        }

        let mut state = self.store.lock(to).await;

        if let Err(e) = within(self.send_timeout, self.transport.send_text(to, message)).await {
            log_send_result(to, "text", false, Some(&e.to_string()));
            return Err(e.into());
        }
        log_send_result(to, "text", true, None);

        if let Some(image_reference) = image_reference.filter(|r| !r.is_empty()) {
            state.attach_image_reference(image_reference);
            log_state_transition(to, "image_reference_attached", state.question_number);
        }

        Ok(())
    }

    /// Send base64 audio as a voice note and mark it delivered
    pub async fn send_voice(&self, to: &str, audio_base64: &str, image_reference: Option<&str>) -> Result<()> {
        if !self.readiness.is_ready() {
            warn!(to = to, "Voice send refused, transport not ready");
            return Err(SurveyRelayError::NotReady);
        }

        if !is_present(Some(to)) || !is_present(Some(audio_base64)) {
            return Err(SurveyRelayError::InvalidRequest(
                "Parameters \"to\" and \"audioBase64\" are required".to_string(),
            ));
        }
        STANDARD.decode(audio_base64.trim())?;

        let media = OutboundMedia::voice_note(audio_base64.trim());
        let mut state = self.store.lock(to).await;

        if let Err(e) = within(
            self.send_timeout,
            self.transport.send_media(to, &media, SendOptions::voice()),
        )
        .await
        {
            log_send_result(to, "voice", false, Some(&e.to_string()));
            return Err(e.into());
        }
        log_send_result(to, "voice", true, None);

        state.mark_audio_delivered();
        if let Some(image_reference) = image_reference.filter(|r| !r.is_empty()) {
            state.remember_image_reference(image_reference);
        }
        log_state_transition(to, "audio_delivered", state.question_number);

        Ok(())
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }
}
