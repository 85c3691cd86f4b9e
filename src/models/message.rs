//! Chat message models

use serde::{Deserialize, Serialize};

/// Message type the transport reports for plain text
pub const TEXT_MESSAGE_TYPE: &str = "chat";

/// MIME type of a voice note
pub const VOICE_NOTE_MIMETYPE: &str = "audio/ogg; codecs=opus";

/// File name attached to outbound voice notes
pub const VOICE_NOTE_FILENAME: &str = "audio.ogg";

/// Message received from a chat user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    pub id: String,
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub body: String,
    #[serde(rename = "type", default)]
    pub message_type: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub is_forwarded: bool,
    #[serde(default)]
    pub has_media: bool,
}

impl InboundMessage {
    /// Build a plain text message
    pub fn text(id: &str, from: &str, body: &str) -> Self {
        Self {
            id: id.to_string(),
            from: from.to_string(),
            to: String::new(),
            body: body.to_string(),
            message_type: TEXT_MESSAGE_TYPE.to_string(),
            timestamp: chrono::Utc::now().timestamp(),
            author: None,
            is_forwarded: false,
            has_media: false,
        }
    }

    /// Build a message carrying media of the given transport type (e.g. `image`)
    pub fn media(id: &str, from: &str, message_type: &str) -> Self {
        Self {
            message_type: message_type.to_string(),
            has_media: true,
            ..Self::text(id, from, "")
        }
    }

    pub fn is_text(&self) -> bool {
        self.message_type == TEXT_MESSAGE_TYPE
    }
}

/// Media content downloaded from the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    pub mimetype: String,
    pub data: Vec<u8>,
    pub filename: Option<String>,
}

/// Media handed to the transport for sending
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutboundMedia {
    pub mimetype: String,
    /// Base64 encoded content
    pub data: String,
    pub filename: Option<String>,
}

impl OutboundMedia {
    /// Wrap base64 audio as an opus voice note
    pub fn voice_note(audio_base64: &str) -> Self {
        Self {
            mimetype: VOICE_NOTE_MIMETYPE.to_string(),
            data: audio_base64.to_string(),
            filename: Some(VOICE_NOTE_FILENAME.to_string()),
        }
    }
}

/// Delivery options for media sends
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SendOptions {
    pub send_audio_as_voice: bool,
}

impl SendOptions {
    pub fn voice() -> Self {
        Self { send_audio_as_voice: true }
    }
}
