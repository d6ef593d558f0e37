//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bridge_operations_total` (counter): pipeline operations by operation, outcome
//! - `bridge_provider_requests_total` (counter): provider requests by method, outcome

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

/// Record the outcome of a bridge or session operation.
pub fn record_operation(operation: &'static str, success: bool) {
    counter!(
        "bridge_operations_total",
        "operation" => operation,
        "outcome" => outcome(success)
    )
    .increment(1);
}

/// Record a provider request.
pub fn record_provider_request(method: &str, success: bool) {
    counter!(
        "bridge_provider_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome(success)
    )
    .increment(1);
}

/// Install the Prometheus recorder and serve it on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_operation("connect_wallet", true);
        record_provider_request("eth_chainId", false);
        assert_eq!(outcome(true), "success");
        assert_eq!(outcome(false), "failure");
    }
}
