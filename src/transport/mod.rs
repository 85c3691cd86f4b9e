//! Chat transport abstraction
//!
//! The chat client itself lives outside this crate. This module defines the
//! capability it must present (send text, send media, download inbound media),
//! the events it emits, and the process-wide readiness flag.

pub mod bridge;
pub mod pairing;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{InboundMessage, MediaPayload, OutboundMedia, SendOptions};
use crate::utils::errors::{TransportError, TransportResult};

pub use bridge::BridgeTransport;
pub use pairing::PairingSink;

/// Outbound and media capability of a chat client
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Transport name for logs
    fn name(&self) -> &str;

    async fn send_text(&self, to: &str, body: &str) -> TransportResult<()>;

    async fn send_media(
        &self,
        to: &str,
        media: &OutboundMedia,
        options: SendOptions,
    ) -> TransportResult<()>;

    /// Fetch the binary content attached to an inbound message
    async fn download_media(&self, message: &InboundMessage) -> TransportResult<MediaPayload>;
}

/// Event emitted by the chat client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TransportEvent {
    /// A scannable pairing code for a new authentication cycle
    #[serde(rename = "qr")]
    PairingCode { code: String },
    /// Authentication completed; sends are possible
    Ready,
    Disconnected {
        #[serde(default)]
        reason: String,
    },
    Message { message: InboundMessage },
}

impl TransportEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            TransportEvent::PairingCode { .. } => "qr",
            TransportEvent::Ready => "ready",
            TransportEvent::Disconnected { .. } => "disconnected",
            TransportEvent::Message { .. } => "message",
        }
    }
}

/// Process-wide transport readiness flag
#[derive(Debug, Clone, Default)]
pub struct Readiness(Arc<AtomicBool>);

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set_ready(&self, ready: bool) {
        self.0.store(ready, Ordering::Release);
    }
}

/// Bound a transport call so a stalled client cannot hang the conversation
pub async fn within<T, F>(limit: Duration, call: F) -> TransportResult<T>
where
    F: Future<Output = TransportResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout),
    }
}
