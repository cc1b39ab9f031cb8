use std::sync::Arc;

use tokio::sync::watch;

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod server;

pub use error::{TelemetryError, TelemetryResult};
pub use metrics::{MetricRecord, MetricStore};

/// Shared collector state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Bounded buffer of the most recent metrics, fed by `/stream`.
    pub store: Arc<MetricStore>,

    /// Flipped to `true` once; every ingestion loop watches it.
    pub shutdown: watch::Sender<bool>,
}

impl AppState {
    pub fn new(store: Arc<MetricStore>) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self { store, shutdown }
    }

    /// Ask every open `/stream` connection to wind down.
    pub fn trigger_shutdown(&self) {
        self.shutdown.send_replace(true);
    }
}
