//! Survey backend wire models

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use super::message::{InboundMessage, MediaPayload};

/// Webhook body posted for every inbound media message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub id: String,
    pub from: String,
    pub to: String,
    pub body: String,
    #[serde(rename = "type")]
    pub message_type: String,
    pub timestamp: i64,
    pub author: Option<String>,
    pub is_forwarded: bool,
    pub has_media: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<WebhookMedia>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookMedia {
    pub mimetype: String,
    /// Base64 encoded content
    pub data: String,
    pub filename: Option<String>,
}

impl WebhookPayload {
    pub fn from_message(message: &InboundMessage, media: Option<&MediaPayload>) -> Self {
        Self {
            id: message.id.clone(),
            from: message.from.clone(),
            to: message.to.clone(),
            body: message.body.clone(),
            message_type: message.message_type.clone(),
            timestamp: message.timestamp,
            author: message.author.clone(),
            is_forwarded: message.is_forwarded,
            has_media: message.has_media,
            media: media.map(|m| WebhookMedia {
                mimetype: m.mimetype.clone(),
                data: STANDARD.encode(&m.data),
                filename: m.filename.clone(),
            }),
        }
    }
}

/// One survey answer relayed to the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SurveySubmission {
    pub from: String,
    pub image_id: Option<String>,
    pub question_number: u32,
    pub score: u8,
}

/// Backend verdict on a survey answer
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub next_question: Option<u32>,
    #[serde(default)]
    pub error: bool,
}
