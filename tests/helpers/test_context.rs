//! Test context for unified test setup
//!
//! This module provides a unified test context that wires a coordinator to the
//! recording transport and the mock backend.

use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;

use SurveyRelay::config::Settings;
use SurveyRelay::models::{InboundMessage, MediaPayload};
use SurveyRelay::state::{ConversationState, ConversationStore};
use SurveyRelay::transport::TransportEvent;
use SurveyRelay::Coordinator;

use super::{backend_mock::BackendMockServer, chat_mock::MockTransport, test_image_bytes};

/// Unified test context that manages all test components
pub struct TestContext {
    pub backend: BackendMockServer,
    pub transport: Arc<MockTransport>,
    pub coordinator: Arc<Coordinator>,
    pub events: Option<mpsc::Receiver<TransportEvent>>,
    pub settings: Settings,
    pub temp_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::new_with(|_| {}).await
    }

    /// Create a context after adjusting the test settings
    pub async fn new_with(configure: impl FnOnce(&mut Settings)) -> Self {
        init_test_env();

        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let backend = BackendMockServer::new().await;
        let mut settings = test_settings(&backend.uri(), &temp_dir);
        configure(&mut settings);
        let transport = Arc::new(MockTransport::new());

        let (coordinator, events) = Coordinator::new(&settings, transport.clone())
            .expect("Failed to create coordinator");

        Self {
            backend,
            transport,
            coordinator: Arc::new(coordinator),
            events: Some(events),
            settings,
            temp_dir,
        }
    }

    /// Start the queued event consumer
    pub fn start_consumer(&mut self) -> tokio::task::JoinHandle<()> {
        let events = self.events.take().expect("consumer already started");
        self.coordinator.clone().spawn(events)
    }

    pub fn store(&self) -> &ConversationStore {
        self.coordinator.store()
    }

    pub fn set_ready(&self, ready: bool) {
        self.coordinator.readiness().set_ready(ready);
    }

    pub async fn state_of(&self, user_id: &str) -> ConversationState {
        self.store().get(user_id).await
    }

    /// Deliver a text message through the coordinator
    pub async fn send_text_from(&self, user_id: &str, body: &str) {
        let message = InboundMessage::text(&SurveyRelay::utils::helpers::generate_uuid(), user_id, body);
        self.coordinator
            .handle_event(TransportEvent::Message { message })
            .await;
    }

    /// Deliver an image message through the coordinator, with downloadable media
    pub async fn send_image_from(&self, user_id: &str, message_id: &str) {
        self.transport.with_media(
            message_id,
            MediaPayload {
                mimetype: "image/jpeg".to_string(),
                data: test_image_bytes(),
                filename: None,
            },
        );
        let message = InboundMessage::media(message_id, user_id, "image");
        self.coordinator
            .handle_event(TransportEvent::Message { message })
            .await;
    }
}

/// Settings pointing at the mock backend, with short timeouts
pub fn test_settings(backend_url: &str, temp_dir: &TempDir) -> Settings {
    let mut settings = Settings::default();
    settings.backend.api_url = backend_url.to_string();
    settings.backend.timeout_seconds = 2;
    settings.bridge.timeout_seconds = 2;
    settings.coordinator.send_timeout_seconds = 1;
    settings.coordinator.queue_capacity = 16;
    settings.pairing.artifact_path = temp_dir
        .path()
        .join("qrcode.png")
        .to_string_lossy()
        .into_owned();
    settings
}

/// Initialize test logging once
pub fn init_test_env() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("SurveyRelay=debug")
        .with_test_writer()
        .try_init();
}
