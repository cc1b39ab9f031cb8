//! Producer side: request capture and the outbound stream to the collector.

pub mod capture;
pub mod client;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use capture::HealthTracker;
pub use client::OutboundClient;
pub use transport::{Dialer, FrameSink, WsDialer};
