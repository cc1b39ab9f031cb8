use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::transport::{Dialer, FrameSink};
use crate::config::TrackerConfig;
use crate::error::TelemetryError;
use crate::MetricRecord;

/// Owns the producer's single connection to the collector.
///
/// Delivery is best-effort and at-most-once: a record that fails to send
/// triggers one reconnect and is then dropped, never queued or retried.
/// Records produced while a dial is in flight are dropped as well.
pub struct OutboundClient {
    config: TrackerConfig,
    dialer: Box<dyn Dialer>,
    conn: Mutex<Option<Box<dyn FrameSink>>>,
    dialing: AtomicBool,
}

impl OutboundClient {
    /// Starts disconnected; call `connect()` to dial.
    pub fn with_dialer(config: TrackerConfig, dialer: Box<dyn Dialer>) -> Self {
        Self {
            config,
            dialer,
            conn: Mutex::new(None),
            dialing: AtomicBool::new(false),
        }
    }

    /// One dial attempt, bounded by `connect_timeout`. Failure is logged and
    /// leaves the client disconnected.
    pub async fn connect(&self) {
        let mut conn = self.conn.lock().await;
        self.dial_into(&mut conn).await;
    }

    pub async fn is_connected(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Stamp, encode and write one record. No-op while disconnected or
    /// while a dial is in progress.
    pub async fn send_metric(&self, mut record: MetricRecord) {
        if self.dialing.load(Ordering::Acquire) {
            debug!(route = %record.route, "dial in progress, dropping metric");
            return;
        }

        let mut conn = self.conn.lock().await;
        let Some(sink) = conn.as_mut() else {
            return;
        };

        record.project_id = self.config.project_id.clone();
        let frame = match record.to_frame() {
            Ok(frame) => frame,
            Err(err) => {
                warn!(error = %err, route = %record.route, "dropping metric");
                return;
            }
        };

        if let Err(err) = sink.send_text(frame).await {
            warn!(error = %err, route = %record.route, "failed to send metric, reconnecting");
            conn.take();
            self.dial_into(&mut conn).await;
        }
    }

    /// Release the connection, if any. Safe to call repeatedly.
    pub async fn close(&self) {
        if let Some(mut sink) = self.conn.lock().await.take() {
            sink.close().await;
        }
    }

    async fn dial_into(&self, conn: &mut Option<Box<dyn FrameSink>>) {
        let url = &self.config.server_url;
        let limit = self.config.connect_timeout;

        self.dialing.store(true, Ordering::Release);
        let dialed = match tokio::time::timeout(limit, self.dialer.dial(url)).await {
            Ok(dialed) => dialed,
            Err(_) => Err(TelemetryError::Connect {
                url: url.clone(),
                reason: format!("timed out after {limit:?}"),
            }),
        };
        self.dialing.store(false, Ordering::Release);

        match dialed {
            Ok(sink) => {
                info!(%url, "connected to collector");
                *conn = Some(sink);
            }
            Err(err) => {
                warn!(error = %err, "collector connection failed");
                *conn = None;
            }
        }
    }
}
