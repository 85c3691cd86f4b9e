//! Recording chat transport for testing
//!
//! Stands in for the chat bridge: every send is recorded, media downloads are
//! served from an in-memory map, and failures can be switched on per test.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use SurveyRelay::models::{InboundMessage, MediaPayload, OutboundMedia, SendOptions};
use SurveyRelay::transport::ChatTransport;
use SurveyRelay::utils::errors::{TransportError, TransportResult};

/// One outbound call seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub enum SentMessage {
    Text { to: String, body: String },
    Media { to: String, media: OutboundMedia, options: SendOptions },
}

#[derive(Default)]
pub struct MockTransport {
    sent: Mutex<Vec<SentMessage>>,
    media: Mutex<HashMap<String, MediaPayload>>,
    fail_sends: AtomicBool,
    send_delay: Mutex<Option<Duration>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `payload` when media for `message_id` is downloaded
    pub fn with_media(&self, message_id: &str, payload: MediaPayload) {
        self.media.lock().unwrap().insert(message_id.to_string(), payload);
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn delay_sends(&self, delay: Duration) {
        *self.send_delay.lock().unwrap() = Some(delay);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Bodies of every text sent to `to`, in order
    pub fn texts_to(&self, to: &str) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|m| match m {
                SentMessage::Text { to: t, body } if t == to => Some(body),
                _ => None,
            })
            .collect()
    }

    pub fn last_text_to(&self, to: &str) -> Option<String> {
        self.texts_to(to).pop()
    }

    pub fn media_to(&self, to: &str) -> Vec<(OutboundMedia, SendOptions)> {
        self.sent()
            .into_iter()
            .filter_map(|m| match m {
                SentMessage::Media { to: t, media, options } if t == to => Some((media, options)),
                _ => None,
            })
            .collect()
    }

    async fn before_send(&self) -> TransportResult<()> {
        let delay = *self.send_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::Rejected("mock send failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send_text(&self, to: &str, body: &str) -> TransportResult<()> {
        self.before_send().await?;
        self.sent.lock().unwrap().push(SentMessage::Text {
            to: to.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    async fn send_media(
        &self,
        to: &str,
        media: &OutboundMedia,
        options: SendOptions,
    ) -> TransportResult<()> {
        self.before_send().await?;
        self.sent.lock().unwrap().push(SentMessage::Media {
            to: to.to_string(),
            media: media.clone(),
            options,
        });
        Ok(())
    }

    async fn download_media(&self, message: &InboundMessage) -> TransportResult<MediaPayload> {
        self.media
            .lock()
            .unwrap()
            .get(&message.id)
            .cloned()
            .ok_or_else(|| TransportError::MediaUnavailable(format!("no media for {}", message.id)))
    }
}
