//! Concurrent load simulator.
//!
//! # Responsibilities
//! - Issue N concurrent calls through the execution gate
//! - Randomize each call to fail with a target probability
//! - Aggregate outcomes into succeeded / failed / rejected counts
//!
//! # Design Decisions
//! - Pure orchestration over the gate; no state beyond the counters
//! - Random start jitter (50-200 ms) avoids pathological synchronization
//!   of the concurrent callers
//! - The simulated operation is opaque to the gate, like any real one

use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::breaker::error::CircuitError;
use crate::breaker::gate::ExecutionGate;

/// Aggregated result of one simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub policy: String,
    pub requests: u32,
    pub target_failure_rate: f64,
    pub elapsed_ms: u64,
    pub succeeded: u32,
    pub failed: u32,
    pub rejected: u32,
}

enum CallResult {
    Succeeded,
    Failed,
    Rejected,
}

/// Run `requests` logically-concurrent calls against the named policy,
/// each failing independently with probability `failure_rate`.
pub async fn simulate(
    gate: &ExecutionGate,
    policy: &str,
    requests: u32,
    failure_rate: f64,
) -> Result<LoadReport, CircuitError> {
    // Surface a bad policy name before spawning anything.
    gate.registry().get(policy)?;
    // NaN would panic inside gen_bool; treat it like "no injected failures".
    let failure_rate = if failure_rate.is_finite() {
        failure_rate.clamp(0.0, 1.0)
    } else {
        0.0
    };

    let started = Instant::now();
    let mut tasks = JoinSet::new();

    for request_id in 1..=requests {
        let gate = gate.clone();
        let policy = policy.to_string();
        let should_fail = rand::thread_rng().gen_bool(failure_rate);
        let jitter = Duration::from_millis(fastrand::u64(50..200));

        tasks.spawn(async move {
            tokio::time::sleep(jitter).await;

            let result = gate
                .execute(&policy, || async move {
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    if should_fail {
                        Err(format!("injected failure for request {}", request_id).into())
                    } else {
                        Ok(())
                    }
                })
                .await;

            match result {
                Ok(()) => CallResult::Succeeded,
                Err(e) if e.is_rejection() => CallResult::Rejected,
                Err(_) => CallResult::Failed,
            }
        });
    }

    let mut report = LoadReport {
        policy: policy.to_string(),
        requests,
        target_failure_rate: failure_rate,
        elapsed_ms: 0,
        succeeded: 0,
        failed: 0,
        rejected: 0,
    };

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(CallResult::Succeeded) => report.succeeded += 1,
            Ok(CallResult::Failed) => report.failed += 1,
            Ok(CallResult::Rejected) => report.rejected += 1,
            Err(e) => {
                tracing::error!(error = %e, "Simulator task panicked");
                report.failed += 1;
            }
        }
    }

    report.elapsed_ms = started.elapsed().as_millis() as u64;

    tracing::info!(
        policy = %report.policy,
        succeeded = report.succeeded,
        failed = report.failed,
        rejected = report.rejected,
        elapsed_ms = report.elapsed_ms,
        "Load simulation complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breaker::registry::PolicyRegistry;
    use std::sync::Arc;

    fn gate() -> ExecutionGate {
        let registry = PolicyRegistry::new(&crate::config::default_policies(), Vec::new());
        ExecutionGate::new(Arc::new(registry))
    }

    #[tokio::test(start_paused = true)]
    async fn zero_failure_rate_means_all_succeed() {
        let report = simulate(&gate(), "database", 8, 0.0).await.unwrap();
        assert_eq!(report.succeeded, 8);
        assert_eq!(report.failed, 0);
        assert_eq!(report.rejected, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn counts_always_total_the_request_count() {
        let report = simulate(&gate(), "database", 25, 0.4).await.unwrap();
        assert_eq!(report.succeeded + report.failed + report.rejected, 25);
    }

    #[tokio::test(start_paused = true)]
    async fn non_finite_failure_rate_injects_nothing() {
        let report = simulate(&gate(), "database", 5, f64::NAN).await.unwrap();
        assert_eq!(report.target_failure_rate, 0.0);
        assert_eq!(report.succeeded, 5);

        let report = simulate(&gate(), "database", 5, f64::INFINITY).await.unwrap();
        assert_eq!(report.target_failure_rate, 0.0);
        assert_eq!(report.succeeded, 5);
    }

    #[tokio::test]
    async fn unknown_policy_fails_fast() {
        let result = simulate(&gate(), "missing", 5, 0.5).await;
        assert!(matches!(result, Err(CircuitError::PolicyNotFound(_))));
    }
}
