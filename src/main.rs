//! SurveyRelay
//!
//! Main application entry point

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use SurveyRelay::{
    config::Settings,
    coordinator::Coordinator,
    transport::BridgeTransport,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", SurveyRelay::info());

    let transport = Arc::new(BridgeTransport::new(&settings.bridge)?);
    info!(bridge = %settings.bridge.api_url, backend = %settings.backend.api_url, "Chat bridge transport configured");

    let (coordinator, events) = Coordinator::new(&settings, transport)?;
    let coordinator = Arc::new(coordinator);
    let app = coordinator.router();
    let consumer = Arc::clone(&coordinator).spawn(events);

    let address = settings.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!(address = %address, "Control surface listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    consumer.abort();
    info!("SurveyRelay has been shut down.");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
