use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::metrics::StoreSnapshot;
use crate::AppState;

pub const SERVICE_NAME: &str = "telemetry-collector";

#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub metrics_count: usize,
}

// ─── GET /health ─────────────────────────────────────────────────

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy",
        service: SERVICE_NAME,
        metrics_count: state.store.count(),
    })
}

// ─── GET /metrics ────────────────────────────────────────────────
/// Full copy of the buffer, oldest first.
pub async fn list_metrics(State(state): State<Arc<AppState>>) -> Json<StoreSnapshot> {
    Json(state.store.snapshot())
}
