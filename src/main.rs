use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use telemetry_relay::config::CollectorConfig;
use telemetry_relay::{logging, server, AppState, MetricStore};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    logging::init();

    // ── 1. Configuration ─────────────────────────────────────────
    let config = CollectorConfig::from_env();
    info!(capacity = config.capacity, "telemetry collector {} starting", env!("CARGO_PKG_VERSION"));

    // ── 2. Shared state ──────────────────────────────────────────
    let state = Arc::new(AppState::new(Arc::new(MetricStore::new(config.capacity))));

    // ── 3. Router ────────────────────────────────────────────────
    let app = server::create_router(state.clone());

    // ── 4. Bind & serve ──────────────────────────────────────────
    // Losing the listener is the one failure the collector cannot outlive
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    let addr = listener.local_addr()?;

    info!("listening on http://{addr}");
    info!("stream  → ws://{addr}/stream");
    info!("health  → http://{addr}/health");
    info!("metrics → http://{addr}/metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
            state.trigger_shutdown();
        })
        .await
        .context("server exited with error")?;

    Ok(())
}
