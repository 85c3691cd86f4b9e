//! HTTP chat bridge transport
//!
//! Talks to a bridge sidecar that owns the authenticated chat session.
//! Sends go out as JSON over HTTP; the bridge pushes inbound events back
//! to the control surface at `POST /events`.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BridgeConfig;
use crate::models::{InboundMessage, MediaPayload, OutboundMedia, SendOptions};
use crate::utils::errors::{Result, SurveyRelayError, TransportError, TransportResult};
use super::ChatTransport;

#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    to: &'a str,
    body: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MediaRequest<'a> {
    to: &'a str,
    media: &'a OutboundMedia,
    send_audio_as_voice: bool,
}

/// Media body returned by the bridge
#[derive(Debug, Deserialize)]
struct BridgeMedia {
    mimetype: String,
    data: String,
    #[serde(default)]
    filename: Option<String>,
}

/// Chat transport backed by the HTTP bridge
#[derive(Debug, Clone)]
pub struct BridgeTransport {
    client: Client,
    base_url: Url,
}

impl BridgeTransport {
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent("SurveyRelay/1.0")
            .build()
            .map_err(SurveyRelayError::Http)?;
        let base_url = Url::parse(&config.api_url)?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> TransportResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TransportError::Unreachable(format!("invalid bridge URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post_json<T: Serialize + ?Sized>(&self, url: Url, body: &T) -> TransportResult<()> {
        let response = self.client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected(format!("HTTP {}: {}", status, error_text)));
        }

        Ok(())
    }
}

fn map_request_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Unreachable(e.to_string())
    } else {
        TransportError::Rejected(e.to_string())
    }
}

#[async_trait]
impl ChatTransport for BridgeTransport {
    fn name(&self) -> &str {
        "bridge"
    }

    async fn send_text(&self, to: &str, body: &str) -> TransportResult<()> {
        debug!(to = to, "Sending text through bridge");
        let url = self.endpoint(&["messages", "text"])?;
        self.post_json(url, &TextRequest { to, body }).await
    }

    async fn send_media(
        &self,
        to: &str,
        media: &OutboundMedia,
        options: SendOptions,
    ) -> TransportResult<()> {
        debug!(to = to, mimetype = %media.mimetype, voice = options.send_audio_as_voice, "Sending media through bridge");
        let url = self.endpoint(&["messages", "media"])?;
        let request = MediaRequest {
            to,
            media,
            send_audio_as_voice: options.send_audio_as_voice,
        };
        self.post_json(url, &request).await
    }

    async fn download_media(&self, message: &InboundMessage) -> TransportResult<MediaPayload> {
        let url = self.endpoint(&["messages", &message.id, "media"])?;
        debug!(message_id = %message.id, "Downloading media from bridge");

        let response = self.client
            .get(url)
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            return Err(TransportError::MediaUnavailable(format!(
                "HTTP {} for message {}",
                response.status(),
                message.id
            )));
        }

        let media: BridgeMedia = response
            .json()
            .await
            .map_err(|e| TransportError::MediaUnavailable(e.to_string()))?;
        let data = STANDARD
            .decode(media.data.as_bytes())
            .map_err(|e| TransportError::MediaUnavailable(format!("invalid base64: {}", e)))?;

        Ok(MediaPayload {
            mimetype: media.mimetype,
            data,
            filename: media.filename,
        })
    }
}
