use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use registration_backend::config::AppConfig;
use registration_backend::{create_router, initialize_backend};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let app_state = initialize_backend(&config)?;
    let app = create_router(app_state, &config.allowed_origins)?;

    let addr = config.socket_addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
