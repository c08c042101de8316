use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use eden_server::config::Config;
use eden_server::{app_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Eden dashboard {}", eden_core::get_version());

    let config = Config::from_env().context("Failed to load configuration from environment variables")?;

    if config.dashboard_secret.is_none() {
        warn!("DASHBOARD_SECRET is not set: gated pages will redirect to /login and every login will be rejected");
    }

    let app_state = Arc::new(AppState::from_config(&config));
    info!(
        "Reading status snapshot from: {}",
        app_state.provider.path().display()
    );

    let app = app_router(app_state);

    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
