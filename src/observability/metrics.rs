//! Metrics collection and exposition.
//!
//! # Metrics
//! - `identity_proxy_requests_total` (counter): requests by outcome, status
//! - `identity_proxy_request_duration_seconds` (histogram): latency by outcome
//! - `identity_proxy_identity_lookups_total` (counter): lookups by result
//! - `identity_proxy_relay_failures_total` (counter): bodies cut off mid-stream

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint. Requires a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one completed request.
///
/// `outcome` is one of `direct`, `augmented`, `unaugmented`, `rejected`.
pub fn record_request(outcome: &'static str, status: u16, start: Instant) {
    ::metrics::counter!(
        "identity_proxy_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("identity_proxy_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_identity_lookup(result: &'static str) {
    ::metrics::counter!("identity_proxy_identity_lookups_total", "result" => result).increment(1);
}

pub fn record_relay_failure() {
    ::metrics::counter!("identity_proxy_relay_failures_total").increment(1);
}
