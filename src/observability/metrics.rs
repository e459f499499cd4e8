//! Metrics collection and exposition.
//!
//! # Metrics
//! - `fixture_relays_total` (counter): relays by outcome and status
//! - `fixture_relay_duration_seconds` (histogram): relay latency by outcome
//!
//! Recording is a no-op until a recorder is installed, so the exporter is
//! optional.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_relay(outcome: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "fixture_relays_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("fixture_relay_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
