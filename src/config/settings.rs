//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from configuration files and environment variables.

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub bridge: BridgeConfig,
    pub backend: BackendConfig,
    pub coordinator: CoordinatorConfig,
    pub pairing: PairingConfig,
    pub prompts: PromptsConfig,
    pub logging: LoggingConfig,
}

/// Control surface listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Chat bridge configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub api_url: String,
    pub timeout_seconds: u64,
}

/// Survey backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendConfig {
    pub api_url: String,
    pub timeout_seconds: u64,
    pub webhook_path: String,
    pub survey_path: String,
}

/// Event consumer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    pub queue_capacity: usize,
    pub send_timeout_seconds: u64,
}

/// Pairing code side channel configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PairingConfig {
    pub artifact_path: String,
}

/// Fixed chat replies
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PromptsConfig {
    pub no_image: String,
    pub awaiting_audio: String,
    pub invalid_score: String,
    pub acknowledgement: String,
    pub retry: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub file_name: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("SURVEYRELAY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::SurveyRelayError> {
        super::validation::validate_settings(self)
    }

    /// Address the control surface binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl BackendConfig {
    /// Full URL of the media webhook
    pub fn webhook_url(&self) -> String {
        join_url(&self.api_url, &self.webhook_path)
    }

    /// Full URL of the survey answer endpoint
    pub fn survey_url(&self) -> String {
        join_url(&self.api_url, &self.survey_path)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl BridgeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl CoordinatorConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_seconds)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            api_url: "http://whatsapp-bridge:3001".to_string(),
            timeout_seconds: 15,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_url: "http://app:8080/api".to_string(),
            timeout_seconds: 30,
            webhook_path: "/whatsapp-webhook".to_string(),
            survey_path: "/whatsapp-survey".to_string(),
        }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            send_timeout_seconds: 15,
        }
    }
}

impl Default for PairingConfig {
    fn default() -> Self {
        Self {
            artifact_path: "qrcode.png".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: "logs".to_string(),
            file_name: "surveyrelay.log".to_string(),
        }
    }
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            no_image: "📷 Envie uma imagem para receber a descrição em áudio.".to_string(),
            awaiting_audio: "Aguarde, estamos processando sua imagem. Em breve você receberá o áudio com a descrição.".to_string(),
            invalid_score: "❌ Valor inválido. Digite apenas números de 1 a 5.".to_string(),
            acknowledgement: "✅ Resposta registrada!".to_string(),
            retry: "❌ Erro interno. Tente novamente.".to_string(),
        }
    }
}
