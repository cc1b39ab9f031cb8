use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{MetricRecord, MetricStore};
use crate::error::TelemetryResult;
use crate::AppState;

/// Reply sent for every metric that made it into the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
    pub route: String,
}

impl Ack {
    pub fn received(route: impl Into<String>) -> Self {
        Self {
            status: "received".to_owned(),
            route: route.into(),
        }
    }
}

// ─── GET /stream ─────────────────────────────────────────────────
/// Upgrades to a WebSocket and ingests one metric per frame until the
/// producer goes away or the collector shuts down.
pub async fn stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let store = state.store.clone();
    let shutdown = state.shutdown.subscribe();

    ws.on_failed_upgrade(|err| warn!(error = %err, "stream upgrade failed"))
        .on_upgrade(move |socket| ingest(socket, store, shutdown))
}

/// Decode a frame and append it. The store is untouched on error.
pub fn accept_frame(store: &MetricStore, frame: &[u8]) -> TelemetryResult<Ack> {
    let record = MetricRecord::from_frame(frame)?;
    let ack = Ack::received(record.route.clone());
    store.append(record);
    Ok(ack)
}

async fn ingest(
    mut socket: WebSocket,
    store: Arc<MetricStore>,
    mut shutdown: watch::Receiver<bool>,
) {
    let conn_id = Uuid::new_v4();
    info!(%conn_id, "stream connection established");

    loop {
        let msg = tokio::select! {
            _ = stopped(&mut shutdown) => {
                debug!(%conn_id, "shutdown requested, closing stream");
                break;
            }
            msg = socket.recv() => msg,
        };

        let frame = match msg {
            Some(Ok(Message::Text(text))) => text.into_bytes(),
            Some(Ok(Message::Binary(bytes))) => bytes,
            Some(Ok(Message::Close(_))) | None => {
                info!(%conn_id, "stream closed by producer");
                break;
            }
            // Ping/pong are answered by the transport
            Some(Ok(_)) => continue,
            Some(Err(err)) => {
                warn!(%conn_id, error = %err, "stream read failed");
                break;
            }
        };

        let ack = match accept_frame(&store, &frame) {
            Ok(ack) => ack,
            Err(err) => {
                warn!(%conn_id, error = %err, "dropping metric frame");
                continue;
            }
        };
        info!(%conn_id, route = %ack.route, "received metric");

        let reply = match serde_json::to_string(&ack) {
            Ok(json) => json,
            Err(err) => {
                warn!(%conn_id, error = %err, "failed to encode ack");
                continue;
            }
        };

        let sent = tokio::select! {
            _ = stopped(&mut shutdown) => break,
            sent = socket.send(Message::Text(reply)) => sent,
        };
        if let Err(err) = sent {
            warn!(%conn_id, error = %err, "stream write failed");
            break;
        }
    }

    debug!(%conn_id, "stream connection released");
}

/// Resolves once shutdown is flagged or the sender is gone.
async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}
