//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relay requests by outcome, status
//! - `relay_request_duration_seconds` (histogram): time until response headers
//!
//! Recording is a no-op until a recorder is installed, so handlers record
//! unconditionally.

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::StatusCode;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished relay decision.
pub fn record_relay(outcome: &'static str, status: StatusCode, start: Instant) {
    metrics::counter!(
        "relay_requests_total",
        "outcome" => outcome,
        "status" => status.as_u16().to_string()
    )
    .increment(1);

    metrics::histogram!("relay_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}
