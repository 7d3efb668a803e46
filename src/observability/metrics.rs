//! Metrics collection and exposition.
//!
//! # Metrics
//! - `breaker_trips_total` (counter): closed → open transitions by resource, strategy
//! - `breaker_recoveries_total` (counter): completed recovery timers by resource
//! - `breaker_recovery_failures_total` (counter): recovery tasks that panicked
//! - `breaker_blocked_total` (counter): entries rejected by resource, strategy
//! - `breaker_rules_active` (gauge): breakers in the active table

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::breaker::StrategyKind;

/// Install the Prometheus recorder with an HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_trip(resource: &str, strategy: StrategyKind) {
    metrics::counter!(
        "breaker_trips_total",
        "resource" => resource.to_string(),
        "strategy" => strategy.as_str()
    )
    .increment(1);
}

pub fn record_recovery(resource: &str) {
    metrics::counter!("breaker_recoveries_total", "resource" => resource.to_string()).increment(1);
}

pub fn record_recovery_failure(resource: &str) {
    metrics::counter!("breaker_recovery_failures_total", "resource" => resource.to_string()).increment(1);
}

pub fn record_blocked(resource: &str, strategy: StrategyKind) {
    metrics::counter!(
        "breaker_blocked_total",
        "resource" => resource.to_string(),
        "strategy" => strategy.as_str()
    )
    .increment(1);
}

pub fn record_active_rules(count: usize) {
    metrics::gauge!("breaker_rules_active").set(count as f64);
}
