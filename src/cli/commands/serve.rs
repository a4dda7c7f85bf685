use anyhow::Context;
use tracing::info;

use crate::app::{router, AppState};
use crate::config::AppConfig;

pub async fn handle() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    info!(
        "Starting list tracker in {:?} mode (storage: {:?}, auth: {:?})",
        config.environment, config.storage, config.auth.provider
    );

    let state = AppState::from_config(&config).await?;
    let app = router(state, &config);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Server running on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
