//! Media intake relay
//!
//! Every inbound media message starts a new cycle for its sender and is
//! forwarded to the backend webhook. Nothing is sent back to the user from
//! here; the backend answers later through the send gateway.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{warn, Instrument};

use crate::models::{InboundMessage, WebhookPayload};
use crate::state::ConversationStore;
use crate::transport::{within, ChatTransport};
use crate::utils::errors::Result;
use crate::utils::logging::{log_api_error, log_state_transition, log_user_action};
use super::backend::BackendService;

#[derive(Clone)]
pub struct MediaIntakeRelay {
    backend: BackendService,
    transport: Arc<dyn ChatTransport>,
    store: ConversationStore,
    send_timeout: Duration,
}

impl MediaIntakeRelay {
    pub fn new(
        backend: BackendService,
        transport: Arc<dyn ChatTransport>,
        store: ConversationStore,
        send_timeout: Duration,
    ) -> Self {
        Self {
            backend,
            transport,
            store,
            send_timeout,
        }
    }

    /// Reset the sender's cycle and forward the media in the background.
    ///
    /// The backend holds the webhook open until it has produced and sent the
    /// audio, so the event consumer must not wait for it: texts arriving in
    /// the meantime are classified against the reset state.
    pub async fn handle_media(&self, message: &InboundMessage) -> JoinHandle<()> {
        let user_id = message.from.as_str();

        self.store.update(user_id, |state| state.start_cycle()).await;
        log_state_transition(user_id, "cycle_started", 1);

        let relay = self.clone();
        let message = message.clone();
        let span = tracing::info_span!("media_intake", user_id = %message.from, message_id = %message.id);
        tokio::spawn(
            async move {
                if let Err(e) = relay.forward(&message).await {
                    warn!(error = %e, "Media was not delivered to the backend");
                }
            }
            .instrument(span),
        )
    }

    /// Download the media and post it to the backend webhook
    pub async fn forward(&self, message: &InboundMessage) -> Result<()> {
        let user_id = message.from.as_str();

        let media = within(self.send_timeout, self.transport.download_media(message)).await?;
        log_user_action(user_id, "media_received", Some(&media.mimetype));

        let payload = WebhookPayload::from_message(message, Some(&media));
        if let Err(e) = self.backend.post_webhook(&payload).await {
            log_api_error("webhook", &e.to_string(), Some(user_id));
            return Err(e.into());
        }

        Ok(())
    }
}
