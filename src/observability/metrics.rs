//! Metrics collection and exposition.
//!
//! # Metrics
//! - `users_api_requests_total` (counter): requests by method, status
//! - `users_api_request_duration_seconds` (histogram): latency by method
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "users_api_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "users_api_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
