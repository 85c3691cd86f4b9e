//! Inbound message classification
//!
//! Decides which of the five disjoint actions an inbound chat message
//! triggers, given the sender's current conversation state. Media is checked
//! first and unconditionally; text is gated on the pending-image and
//! audio-delivered flags.

use crate::models::InboundMessage;
use super::context::ConversationState;

/// Action selected for an inbound message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InboundAction {
    /// Text before any image in this cycle
    RejectNoImage,
    /// Text while the audio description is still being produced
    RejectAwaitingAudio,
    /// Text read as a survey score
    SurveyAnswer,
    /// Media always starts a new cycle
    MediaIntake,
    /// Nothing to do
    Ignore,
}

impl InboundAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InboundAction::RejectNoImage => "reject_no_image",
            InboundAction::RejectAwaitingAudio => "reject_awaiting_audio",
            InboundAction::SurveyAnswer => "survey_answer",
            InboundAction::MediaIntake => "media_intake",
            InboundAction::Ignore => "ignore",
        }
    }
}

impl std::fmt::Display for InboundAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a message against the sender's state
pub fn classify(message: &InboundMessage, state: &ConversationState) -> InboundAction {
    if message.has_media {
        return InboundAction::MediaIntake;
    }

    if !message.is_text() {
        return InboundAction::Ignore;
    }

    match (state.has_pending_image, state.audio_delivered) {
        (false, _) => InboundAction::RejectNoImage,
        (true, false) => InboundAction::RejectAwaitingAudio,
        (true, true) => InboundAction::SurveyAnswer,
    }
}
