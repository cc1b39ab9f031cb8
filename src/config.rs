//! Environment-driven configuration for the collector and for producers.
//!
//! Unset or unparsable variables fall back to the defaults.

use std::env;
use std::time::Duration;

use crate::metrics::DEFAULT_CAPACITY;

/// Collector process settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    pub bind_addr: String,
    pub capacity: usize,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl CollectorConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: var("COLLECTOR_BIND_ADDR").unwrap_or(defaults.bind_addr),
            capacity: var("COLLECTOR_CAPACITY")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(defaults.capacity)
                .max(1),
        }
    }
}

/// Producer-side settings read by the capture middleware and its client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub project_id: String,
    /// Carried for the collector's benefit; not sent on the stream today
    pub api_key: String,
    /// e.g. "wss://collector.internal/stream"
    pub server_url: String,
    pub enabled: bool,
    /// Upper bound on a single dial; a slower dial counts as a failure
    pub connect_timeout: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            api_key: String::new(),
            server_url: "ws://localhost:8080/stream".to_string(),
            enabled: true,
            connect_timeout: Duration::from_secs(3),
        }
    }
}

impl TrackerConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            project_id: var("TRACKER_PROJECT_ID").unwrap_or(defaults.project_id),
            api_key: var("TRACKER_API_KEY").unwrap_or(defaults.api_key),
            server_url: var("TRACKER_SERVER_URL").unwrap_or(defaults.server_url),
            enabled: var("TRACKER_ENABLED")
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(defaults.enabled),
            connect_timeout: var("TRACKER_CONNECT_TIMEOUT_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.connect_timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn collector_defaults() {
        let config = CollectorConfig::from_vars(vars(&[]));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.capacity, 1000);
    }

    #[test]
    fn collector_overrides_and_clamps() {
        let config = CollectorConfig::from_vars(vars(&[
            ("COLLECTOR_BIND_ADDR", "127.0.0.1:9000"),
            ("COLLECTOR_CAPACITY", "0"),
        ]));
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.capacity, 1);

        let config = CollectorConfig::from_vars(vars(&[("COLLECTOR_CAPACITY", "lots")]));
        assert_eq!(config.capacity, 1000);
    }

    #[test]
    fn tracker_defaults() {
        let config = TrackerConfig::from_vars(vars(&[]));
        assert_eq!(config, TrackerConfig::default());
        assert!(config.enabled);
        assert_eq!(config.server_url, "ws://localhost:8080/stream");
        assert_eq!(config.connect_timeout, Duration::from_secs(3));
    }

    #[test]
    fn tracker_overrides() {
        let config = TrackerConfig::from_vars(vars(&[
            ("TRACKER_PROJECT_ID", "shop"),
            ("TRACKER_API_KEY", "k-123"),
            ("TRACKER_SERVER_URL", "ws://collector:8080/stream"),
            ("TRACKER_ENABLED", "false"),
            ("TRACKER_CONNECT_TIMEOUT_MS", "250"),
        ]));
        assert_eq!(config.project_id, "shop");
        assert_eq!(config.api_key, "k-123");
        assert_eq!(config.server_url, "ws://collector:8080/stream");
        assert!(!config.enabled);
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
    }

    #[test]
    fn tracker_ignores_unparsable_flag() {
        let config = TrackerConfig::from_vars(vars(&[("TRACKER_ENABLED", "nope")]));
        assert!(config.enabled);
    }
}
