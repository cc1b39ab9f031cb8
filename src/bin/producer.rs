//! Demo producer: a small axum service instrumented with `HealthTracker`.
//!
//! # Usage
//! ```sh
//! TRACKER_PROJECT_ID=demo cargo run --bin telemetry-producer
//! curl localhost:3001/slow && curl localhost:8080/metrics
//! ```
//!
//! # Environment Variables
//! - `PRODUCER_BIND_ADDR` - listen address (default: 0.0.0.0:3001)
//! - `TRACKER_*` - see `TrackerConfig`

use std::time::Duration;

use anyhow::{Context, Result};
use axum::{http::StatusCode, routing::get, Json, Router};
use rand::Rng;
use serde_json::{json, Value};
use tracing::info;

use telemetry_relay::config::TrackerConfig;
use telemetry_relay::logging;
use telemetry_relay::middleware::HealthTracker;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    logging::init();

    let config = TrackerConfig::from_env();
    info!(project = %config.project_id, collector = %config.server_url, "demo producer starting");

    let tracker = HealthTracker::new(config).await;
    let app = tracker.layer(routes());

    let addr = std::env::var("PRODUCER_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("server exited with error")?;

    tracker.close().await;
    Ok(())
}

fn routes() -> Router {
    Router::new()
        .route("/", get(|| async { Json(json!({ "hello": "world" })) }))
        .route("/slow", get(slow))
        .route("/fail", get(fail))
        .route("/teapot", get(|| async { StatusCode::IM_A_TEAPOT }))
}

/// Sleeps somewhere between 50 and 250 ms.
async fn slow() -> Json<Value> {
    let delay_ms = rand::thread_rng().gen_range(50..=250);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    Json(json!({ "slept_ms": delay_ms }))
}

async fn fail() -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "simulated failure" })),
    )
}
