//! Server entry point.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use inbox_orchestrator_app::{AppState, SqliteStore};
use inbox_orchestrator_provider::{InboxingClient, DeploymentProvider};
use inbox_orchestrator_web::{api_router, ApiState, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    if config.provider.api_key.is_empty() {
        return Err("provider API key is not configured (set INBOX_ORCH_API_KEY)".into());
    }
    if config.webhook_secret.is_none() {
        tracing::warn!("webhook secret is not configured; job callbacks will be rejected");
    }

    let store = SqliteStore::new(&config.database_path).await?;

    let provider: Arc<dyn DeploymentProvider> = match &config.provider.base_url {
        Some(base_url) => Arc::new(InboxingClient::with_base_url(
            config.provider.api_key.clone(),
            base_url.clone(),
        )),
        None => Arc::new(InboxingClient::new(config.provider.api_key.clone())),
    };

    let app = AppState::builder()
        .with_repository(Arc::new(store))
        .with_provider(provider)
        .build()?;

    let state = ApiState::new(Arc::new(app), config.webhook_secret.clone());
    let router = api_router(state, Duration::from_secs(config.request_timeout_secs));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install shutdown signal handler: {e}");
        return;
    }
    tracing::info!("shutdown signal received");
}
