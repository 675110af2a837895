use anyhow::Context;
use tracing::info;

use crate::config::config;
use crate::database::open_store;
use crate::router::app;
use crate::state::AppState;

pub async fn run(port: Option<u16>) -> anyhow::Result<()> {
    let config = config().clone();
    info!("Starting Caseway API in {:?} mode", config.environment);

    if config.auth.jwt_secret.is_empty() {
        tracing::warn!("SUPABASE_JWT_SECRET is not set; every protected route will answer 401");
    }

    let store = open_store(&config).await.context("failed to open store")?;
    let port = port.unwrap_or(config.server.port);
    let state = AppState::new(config, store).context("failed to build HTTP client")?;

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Caseway API listening on http://{}", bind_addr);

    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
