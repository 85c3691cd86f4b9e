//! Services module
//!
//! This module contains business logic services

pub mod backend;
pub mod gateway;
pub mod intake;
pub mod survey;

// Re-export commonly used services
pub use backend::BackendService;
pub use gateway::SendGateway;
pub use intake::MediaIntakeRelay;
pub use survey::{SurveyOutcome, SurveyRelay};

use std::sync::Arc;
use std::time::Duration;

use crate::config::{PromptsConfig, Settings};
use crate::state::ConversationStore;
use crate::transport::{within, ChatTransport, Readiness};
use crate::utils::errors::Result;
use crate::utils::logging::log_send_result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub backend: BackendService,
    pub survey: SurveyRelay,
    pub intake: MediaIntakeRelay,
    pub gateway: SendGateway,
    pub prompts: PromptsConfig,
    transport: Arc<dyn ChatTransport>,
    send_timeout: Duration,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(
        settings: &Settings,
        transport: Arc<dyn ChatTransport>,
        store: ConversationStore,
        readiness: Readiness,
    ) -> Result<Self> {
        let send_timeout = settings.coordinator.send_timeout();
        let backend = BackendService::new(settings.backend.clone())?;
        let survey = SurveyRelay::new(
            backend.clone(),
            Arc::clone(&transport),
            settings.prompts.clone(),
            send_timeout,
        );
        let intake = MediaIntakeRelay::new(
            backend.clone(),
            Arc::clone(&transport),
            store.clone(),
            send_timeout,
        );
        let gateway = SendGateway::new(Arc::clone(&transport), store, readiness, send_timeout);

        Ok(Self {
            backend,
            survey,
            intake,
            gateway,
            prompts: settings.prompts.clone(),
            transport,
            send_timeout,
        })
    }

    /// Send a fixed prompt to a user
    pub async fn reply(&self, to: &str, body: &str) -> Result<()> {
        reply(self.transport.as_ref(), to, body, self.send_timeout).await
    }
}

/// Send a chat reply within the send timeout, logging the outcome
pub(crate) async fn reply(
    transport: &dyn ChatTransport,
    to: &str,
    body: &str,
    limit: Duration,
) -> Result<()> {
    match within(limit, transport.send_text(to, body)).await {
        Ok(()) => {
            log_send_result(to, "reply", true, None);
            Ok(())
        }
        Err(e) => {
            log_send_result(to, "reply", false, Some(&e.to_string()));
            Err(e.into())
        }
    }
}
