//! Load tests driving concurrent traffic through the execution gate.

use std::sync::Arc;

use circuit_gate::config::{default_policies, PolicyConfig};
use circuit_gate::{simulator, ExecutionGate, PolicyRegistry};

fn make_gate(policies: Vec<PolicyConfig>) -> ExecutionGate {
    ExecutionGate::new(Arc::new(PolicyRegistry::new(&policies, Vec::new())))
}

#[tokio::test(start_paused = true)]
async fn all_failures_trip_the_circuit() {
    let gate = make_gate(default_policies());
    let report = simulator::simulate(&gate, "database", 10, 1.0)
        .await
        .unwrap();

    assert_eq!(report.succeeded, 0);
    assert_eq!(report.failed + report.rejected, 10);
    // The circuit opens after minimum throughput (3) failures land, so
    // late arrivals are rejected instead of executed. Start jitter makes
    // the exact failed/rejected split probabilistic here; the strict
    // 3-failed/7-rejected bound is pinned by the sequential test
    // `sequential_failures_reject_everything_after_opening` in gate_test.
    assert!(report.rejected >= 1, "report: {:?}", report);
    assert!(report.failed >= 3, "report: {:?}", report);

    let statuses = gate.registry().statuses();
    let db = statuses.iter().find(|s| s.policy == "database").unwrap();
    assert_eq!(db.state, "open");
}

#[tokio::test(start_paused = true)]
async fn healthy_traffic_keeps_the_circuit_closed() {
    let gate = make_gate(default_policies());
    let report = simulator::simulate(&gate, "database", 50, 0.0)
        .await
        .unwrap();

    assert_eq!(report.succeeded, 50);
    assert_eq!(report.rejected, 0);

    let statuses = gate.registry().statuses();
    let db = statuses.iter().find(|s| s.policy == "database").unwrap();
    assert_eq!(db.state, "closed");
}

#[tokio::test(start_paused = true)]
async fn simulation_only_touches_its_own_policy() {
    let gate = make_gate(default_policies());
    simulator::simulate(&gate, "database", 10, 1.0)
        .await
        .unwrap();

    let statuses = gate.registry().statuses();
    let api = statuses.iter().find(|s| s.policy == "api").unwrap();
    assert_eq!(api.state, "closed");
    assert_eq!(api.total_count, 0);
}

#[tokio::test]
async fn concurrent_wall_clock_load_settles() {
    // Real-clock smoke test: a short strict policy under mixed load.
    let gate = make_gate(vec![PolicyConfig {
        name: "flaky".to_string(),
        failure_ratio: 0.5,
        sampling_duration_secs: 5,
        minimum_throughput: 3,
        break_duration_secs: 5,
    }]);

    let report = simulator::simulate(&gate, "flaky", 30, 0.9).await.unwrap();
    assert_eq!(report.succeeded + report.failed + report.rejected, 30);

    let statuses = gate.registry().statuses();
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].policy, "flaky");
}
