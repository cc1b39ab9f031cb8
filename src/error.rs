use thiserror::Error;

/// Every failure the relay can observe. None of these are fatal: each one is
/// logged and scoped to the frame, connection or client it happened on.
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("malformed metric frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("status code {0} is outside 100-599")]
    InvalidStatus(u16),

    #[error("failed to encode frame: {0}")]
    Encode(String),

    #[error("failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("failed to send frame: {0}")]
    Send(String),
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
