//! In-memory `Dialer` that records every dial and every frame written.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::transport::{Dialer, FrameSink};
use crate::error::{TelemetryError, TelemetryResult};
use crate::MetricRecord;

#[derive(Default)]
pub struct Wire {
    dials: AtomicUsize,
    /// (connection number, frame), connection numbers start at 1
    frames: Mutex<Vec<(usize, String)>>,
    /// Connections whose writes fail
    broken: Mutex<HashSet<usize>>,
    refuse: Mutex<bool>,
    /// Dials that never resolve
    hang: Mutex<bool>,
}

impl Wire {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn dialer(self: &Arc<Self>) -> Box<dyn Dialer> {
        Box::new(MockDialer(self.clone()))
    }

    pub fn dials(&self) -> usize {
        self.dials.load(Ordering::SeqCst)
    }

    pub fn break_connection(&self, conn: usize) {
        self.broken.lock().insert(conn);
    }

    pub fn refuse_dials(&self, refuse: bool) {
        *self.refuse.lock() = refuse;
    }

    pub fn hang_dials(&self, hang: bool) {
        *self.hang.lock() = hang;
    }

    pub fn frames(&self) -> Vec<(usize, String)> {
        self.frames.lock().clone()
    }

    pub fn records(&self) -> Vec<MetricRecord> {
        self.frames()
            .iter()
            .map(|(_, frame)| MetricRecord::from_frame(frame.as_bytes()).unwrap())
            .collect()
    }

    /// Polls until `n` frames have been written or a second passes.
    pub async fn wait_for_frames(&self, n: usize) -> Vec<MetricRecord> {
        for _ in 0..100 {
            if self.frames.lock().len() >= n {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.records()
    }
}

struct MockDialer(Arc<Wire>);

#[async_trait]
impl Dialer for MockDialer {
    async fn dial(&self, url: &str) -> TelemetryResult<Box<dyn FrameSink>> {
        let conn = self.0.dials.fetch_add(1, Ordering::SeqCst) + 1;
        let hang = *self.0.hang.lock();
        if hang {
            std::future::pending::<()>().await;
        }
        if *self.0.refuse.lock() {
            return Err(TelemetryError::Connect {
                url: url.to_owned(),
                reason: "refused".into(),
            });
        }
        Ok(Box::new(MockSink {
            conn,
            wire: self.0.clone(),
        }))
    }
}

struct MockSink {
    conn: usize,
    wire: Arc<Wire>,
}

#[async_trait]
impl FrameSink for MockSink {
    async fn send_text(&mut self, frame: String) -> TelemetryResult<()> {
        if self.wire.broken.lock().contains(&self.conn) {
            return Err(TelemetryError::Send("broken pipe".into()));
        }
        self.wire.frames.lock().push((self.conn, frame));
        Ok(())
    }

    async fn close(&mut self) {}
}
