//! Mock survey backend for testing
//!
//! This module provides a mock HTTP server that simulates the backend's media
//! webhook and survey endpoints. It uses wiremock to create configurable mock responses.

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const WEBHOOK_PATH: &str = "/whatsapp-webhook";
pub const SURVEY_PATH: &str = "/whatsapp-survey";

/// Mock backend server for testing
pub struct BackendMockServer {
    pub server: MockServer,
}

impl BackendMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Accept every webhook post
    pub async fn mock_webhook_ok(&self) {
        Mock::given(method("POST"))
            .and(path(WEBHOOK_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "received" })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_webhook_failure(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(WEBHOOK_PATH))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Answer every survey submission with `body`
    pub async fn mock_survey(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path(SURVEY_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer submissions whose body contains `matching` with `body`.
    /// Mount these before any catch-all survey mock.
    pub async fn mock_survey_matching(&self, matching: Value, body: Value) {
        Mock::given(method("POST"))
            .and(path(SURVEY_PATH))
            .and(body_partial_json(matching))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Accept webhook posts but hold each one open for `delay`
    pub async fn mock_webhook_delayed(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(WEBHOOK_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "status": "received" }))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Answer every survey submission with `body` after `delay`
    pub async fn mock_survey_delayed(&self, body: Value, delay: Duration) {
        Mock::given(method("POST"))
            .and(path(SURVEY_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_survey_failure(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path(SURVEY_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string("backend exploded"))
            .mount(&self.server)
            .await;
    }

    /// The survey endpoint must not be called at all
    pub async fn expect_no_survey_calls(&self) {
        Mock::given(method("POST"))
            .and(path(SURVEY_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&self.server)
            .await;
    }

    /// JSON bodies received on `endpoint`, in arrival order
    pub async fn received_bodies(&self, endpoint: &str) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == endpoint)
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }

    /// Wait until `count` requests reached `endpoint`, returning their bodies
    pub async fn wait_for_bodies(&self, endpoint: &str, count: usize) -> Vec<Value> {
        for _ in 0..100 {
            let bodies = self.received_bodies(endpoint).await;
            if bodies.len() >= count {
                return bodies;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.received_bodies(endpoint).await
    }

    /// Reset all mocks
    pub async fn reset(&self) {
        self.server.reset().await;
    }
}
