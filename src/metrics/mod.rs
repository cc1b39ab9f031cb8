pub mod store;
pub mod stream;

pub use store::{MetricStore, StoreSnapshot, DEFAULT_CAPACITY};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{TelemetryError, TelemetryResult};

/// One observed request/response cycle, as it travels over `/stream`.
///
/// Created by the capture middleware, stamped with a project id by the
/// outbound client, then stored by value on the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    /// Filled in by the producer's client right before transmission
    #[serde(default)]
    pub project_id: String,
    /// Request path, e.g. "/api/users/42"
    pub route: String,
    /// HTTP verb
    pub method: String,
    /// Final response status (100-599)
    pub status_code: u16,
    /// Elapsed wall time in whole milliseconds
    pub response_time: u64,
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl MetricRecord {
    /// A record timestamped now, with the project id left blank.
    pub fn new(
        route: impl Into<String>,
        method: impl Into<String>,
        status_code: u16,
        response_time: u64,
    ) -> Self {
        Self {
            project_id: String::new(),
            route: route.into(),
            method: method.into(),
            status_code,
            response_time,
            timestamp: Utc::now(),
        }
    }

    /// Decode one inbound frame. Text and binary frames share this path.
    pub fn from_frame(frame: &[u8]) -> TelemetryResult<Self> {
        let record: MetricRecord = serde_json::from_slice(frame)?;
        if !(100..=599).contains(&record.status_code) {
            return Err(TelemetryError::InvalidStatus(record.status_code));
        }
        Ok(record)
    }

    pub fn to_frame(&self) -> TelemetryResult<String> {
        serde_json::to_string(self).map_err(|e| TelemetryError::Encode(e.to_string()))
    }
}

/// RFC 3339 on the way out; RFC 3339 or epoch milliseconds on the way in.
mod timestamp {
    use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        match Wire::deserialize(d)? {
            Wire::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| D::Error::custom(format!("timestamp {ms} out of range"))),
            Wire::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(D::Error::custom),
        }
    }
}
