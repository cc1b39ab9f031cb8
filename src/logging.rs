use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install the stdout subscriber. `RUST_LOG` wins; `info` otherwise.
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter(std::env::var("RUST_LOG").ok()))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn env_filter(directives: Option<String>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .parse_lossy(directives.unwrap_or_default())
}
