//! Coordinator
//!
//! Owns the conversation store, the readiness flag and the services, drains
//! transport events from a bounded queue with a single consumer task, and
//! builds the control surface router.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::handlers::{control_routes, handle_message, ControlState};
use crate::middleware::log_inbound_message;
use crate::services::ServiceFactory;
use crate::state::ConversationStore;
use crate::transport::{ChatTransport, PairingSink, Readiness, TransportEvent};
use crate::utils::errors::{ErrorSeverity, Result};

pub struct Coordinator {
    services: ServiceFactory,
    store: ConversationStore,
    readiness: Readiness,
    pairing: PairingSink,
    events: mpsc::Sender<TransportEvent>,
    started_at: Instant,
}

impl Coordinator {
    /// Build the coordinator and the receiving end of its event queue
    pub fn new(
        settings: &Settings,
        transport: Arc<dyn ChatTransport>,
    ) -> Result<(Self, mpsc::Receiver<TransportEvent>)> {
        info!(transport = transport.name(), "Wiring coordinator");
        let store = ConversationStore::new();
        let readiness = Readiness::new();
        let services = ServiceFactory::new(settings, transport, store.clone(), readiness.clone())?;
        let (events, receiver) = mpsc::channel(settings.coordinator.queue_capacity);

        let coordinator = Self {
            services,
            store,
            readiness,
            pairing: PairingSink::new(&settings.pairing.artifact_path),
            events,
            started_at: Instant::now(),
        };

        Ok((coordinator, receiver))
    }

    /// Handle to push transport events into the queue
    pub fn sender(&self) -> mpsc::Sender<TransportEvent> {
        self.events.clone()
    }

    /// Control surface router
    pub fn router(&self) -> Router {
        control_routes(ControlState {
            gateway: self.services.gateway.clone(),
            readiness: self.readiness.clone(),
            events: self.events.clone(),
            started_at: self.started_at,
        })
    }

    /// Drain events in arrival order, one at a time
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<TransportEvent>) {
        info!("Event consumer started");
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        info!("Event queue closed, consumer stopping");
    }

    pub fn spawn(self: Arc<Self>, events: mpsc::Receiver<TransportEvent>) -> JoinHandle<()> {
        tokio::spawn(self.run(events))
    }

    /// Apply one transport event; failures are logged, never propagated
    pub async fn handle_event(&self, event: TransportEvent) {
        match event {
            TransportEvent::PairingCode { code } => {
                self.readiness.set_ready(false);
                self.pairing.publish(&code).await;
            }
            TransportEvent::Ready => {
                self.readiness.set_ready(true);
                info!("Chat transport is ready");
            }
            TransportEvent::Disconnected { reason } => {
                self.readiness.set_ready(false);
                warn!(reason = %reason, "Chat transport disconnected");
            }
            TransportEvent::Message { message } => {
                log_inbound_message(&message);
                match handle_message(&self.services, &self.store, &message).await {
                    Ok(action) => {
                        debug!(user_id = %message.from, action = %action, "Inbound message handled");
                    }
                    Err(e) => match e.severity() {
                        ErrorSeverity::Info | ErrorSeverity::Warning => {
                            warn!(user_id = %message.from, error = %e, "Inbound message not handled")
                        }
                        ErrorSeverity::Error | ErrorSeverity::Critical => {
                            error!(user_id = %message.from, error = %e, "Error handling inbound message")
                        }
                    },
                }
            }
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    pub fn services(&self) -> &ServiceFactory {
        &self.services
    }
}
