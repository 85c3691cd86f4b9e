//! Conversation state
//!
//! This module tracks where each user stands in the image-to-survey cycle:
//! whether an image is pending, whether its audio description went out,
//! which backend image the answers belong to and which question comes next.

use serde::{Deserialize, Serialize};

/// Per-user conversation state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    /// An image was received and awaits its audio description
    pub has_pending_image: bool,
    /// The audio description has been sent to the user
    pub audio_delivered: bool,
    /// Backend identifier correlating the image to survey answers
    pub image_reference: Option<String>,
    /// Index of the next question to be answered, starting at 1
    pub question_number: u32,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            has_pending_image: false,
            audio_delivered: false,
            image_reference: None,
            question_number: 1,
        }
    }
}

impl ConversationState {
    /// Start a new cycle for a freshly received image
    pub fn start_cycle(&mut self) {
        self.has_pending_image = true;
        self.audio_delivered = false;
        self.image_reference = None;
        self.question_number = 1;
    }

    /// Close the cycle after the backend reports the survey finished
    pub fn complete_cycle(&mut self) {
        *self = Self::default();
    }

    /// Record that the audio description reached the user.
    ///
    /// Audio is only meaningful inside a cycle, so this also marks the
    /// image as pending when the voice note arrives without a prior image.
    pub fn mark_audio_delivered(&mut self) {
        self.has_pending_image = true;
        self.audio_delivered = true;
    }

    /// Associate the cycle with a backend image and restart the questions
    pub fn attach_image_reference(&mut self, image_reference: &str) {
        self.image_reference = Some(image_reference.to_string());
        self.question_number = 1;
    }

    /// Store an image reference without touching survey progress
    pub fn remember_image_reference(&mut self, image_reference: &str) {
        self.image_reference = Some(image_reference.to_string());
    }

    pub fn advance_question(&mut self) {
        self.question_number = self.question_number.saturating_add(1);
    }

    /// Whether text from the user should be read as a survey answer
    pub fn is_survey_active(&self) -> bool {
        self.has_pending_image && self.audio_delivered
    }
}
