use axum::{
    extract::{Request, State},
    middleware::{self as axum_mw, Next},
    response::Response,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::client::OutboundClient;
use super::transport::{Dialer, WsDialer};
use crate::config::TrackerConfig;
use crate::MetricRecord;

/// Producer-side entry point: wraps a service's `Router` so every request
/// is timed and reported to the collector.
///
/// When the config is disabled no client is built and `layer()` hands the
/// router back untouched.
pub struct HealthTracker {
    client: Option<Arc<OutboundClient>>,
}

impl HealthTracker {
    pub async fn new(config: TrackerConfig) -> Self {
        Self::with_dialer(config, Box::new(WsDialer)).await
    }

    pub async fn with_dialer(config: TrackerConfig, dialer: Box<dyn Dialer>) -> Self {
        if !config.enabled {
            info!("telemetry capture disabled");
            return Self { client: None };
        }

        let client = OutboundClient::with_dialer(config, dialer);
        client.connect().await;
        Self {
            client: Some(Arc::new(client)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    pub fn layer<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        match &self.client {
            Some(client) => router.layer(axum_mw::from_fn_with_state(client.clone(), capture)),
            None => router,
        }
    }

    pub async fn close(&self) {
        if let Some(client) = &self.client {
            client.close().await;
        }
    }
}

/// Times the wrapped handler and ships the result off the response path.
async fn capture(
    State(client): State<Arc<OutboundClient>>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().to_string();
    let route = req.uri().path().to_owned();

    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    // Detached: the caller never waits on, or sees, the send
    tokio::spawn(async move {
        let record = MetricRecord::new(route, method, status, elapsed_ms);
        client.send_metric(record).await;
    });

    response
}
