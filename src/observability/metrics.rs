//! Metrics collection and exposition.
//!
//! # Metrics
//! - `trace_injector_decisions_total` (counter): trust decisions by outcome
//! - `trace_injector_upstream_requests_total` (counter): forwarded requests by status
//! - `trace_injector_upstream_duration_seconds` (histogram): upstream latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one trust decision.
pub fn record_decision(injected: bool) {
    let decision = if injected { "injected" } else { "trusted" };
    counter!("trace_injector_decisions_total", "decision" => decision).increment(1);
}

/// Record a request forwarded upstream.
pub fn record_upstream(method: &str, status: u16, start: Instant) {
    counter!(
        "trace_injector_upstream_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("trace_injector_upstream_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}
