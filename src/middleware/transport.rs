use async_trait::async_trait;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::trace;

use crate::error::{TelemetryError, TelemetryResult};

/// Write half of one live connection to the collector.
#[async_trait]
pub trait FrameSink: Send {
    /// Write one self-delimited text frame.
    async fn send_text(&mut self, frame: String) -> TelemetryResult<()>;

    async fn close(&mut self);
}

/// Opens connections to the collector's stream endpoint.
#[async_trait]
pub trait Dialer: Send + Sync {
    async fn dial(&self, url: &str) -> TelemetryResult<Box<dyn FrameSink>>;
}

/// WebSocket dialer used outside of tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct WsDialer;

#[async_trait]
impl Dialer for WsDialer {
    async fn dial(&self, url: &str) -> TelemetryResult<Box<dyn FrameSink>> {
        let (stream, _) = connect_async(url)
            .await
            .map_err(|e| TelemetryError::Connect {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;

        let (sink, mut inbound) = stream.split();

        // Acks are never inspected, but they must be read or they back up
        // on the collector side.
        tokio::spawn(async move {
            while let Some(Ok(msg)) = inbound.next().await {
                trace!(len = msg.len(), "discarding collector frame");
            }
        });

        Ok(Box::new(WsSink { sink }))
    }
}

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct WsSink {
    sink: SplitSink<WsStream, Message>,
}

#[async_trait]
impl FrameSink for WsSink {
    async fn send_text(&mut self, frame: String) -> TelemetryResult<()> {
        self.sink
            .send(Message::Text(frame))
            .await
            .map_err(|e| TelemetryError::Send(e.to_string()))
    }

    async fn close(&mut self) {
        let _ = self.sink.close().await;
    }
}
