//! Metrics collection and exposition.
//!
//! # Metrics
//! - `circuit_calls_total` (counter): executed calls by policy, outcome
//! - `circuit_rejections_total` (counter): fail-fast rejections by policy
//! - `circuit_transitions_total` (counter): state transitions by policy, to-state
//! - `circuit_state` (gauge): 0=closed, 1=half-open, 2=open, by policy

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::breaker::machine::StateObserver;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// An executed call completed with the given outcome ("success"/"failure").
pub fn record_outcome(policy: &str, outcome: &'static str) {
    counter!("circuit_calls_total", "policy" => policy.to_string(), "outcome" => outcome)
        .increment(1);
}

/// A call was rejected without invoking the operation.
pub fn record_rejection(policy: &str) {
    counter!("circuit_rejections_total", "policy" => policy.to_string()).increment(1);
}

fn record_transition(policy: &str, to: &'static str, state_value: f64) {
    counter!("circuit_transitions_total", "policy" => policy.to_string(), "to" => to)
        .increment(1);
    gauge!("circuit_state", "policy" => policy.to_string()).set(state_value);
}

/// Bridges breaker state transitions into the metrics registry.
pub struct TelemetryObserver;

impl StateObserver for TelemetryObserver {
    fn on_opened(&self, policy: &str) {
        record_transition(policy, "open", 2.0);
    }

    fn on_closed(&self, policy: &str) {
        record_transition(policy, "closed", 0.0);
    }

    fn on_half_opened(&self, policy: &str) {
        record_transition(policy, "half-open", 1.0);
    }
}
