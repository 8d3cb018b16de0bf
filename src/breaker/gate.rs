//! Execution gate: the caller-facing entry point.
//!
//! # Data Flow
//! ```text
//! execute(policy, op):
//!     registry lookup ──▶ try_acquire
//!         rejected ──▶ CircuitOpen (op never invoked, fail fast)
//!         permitted ──▶ invoke op ──▶ permit.complete(outcome)
//!             Ok  ──▶ success sample ──▶ return value
//!             Err ──▶ failure sample ──▶ CircuitError::Operation
//! ```
//!
//! # Design Decisions
//! - The gate never retries; retry policy layers above it
//! - Operation errors are re-surfaced unchanged after being sampled
//! - Each call gets a short request id for log correlation

use std::future::Future;
use std::sync::Arc;

use uuid::Uuid;

use crate::breaker::error::{BoxError, CircuitError};
use crate::breaker::registry::PolicyRegistry;
use crate::breaker::sampler::Outcome;
use crate::observability::metrics;

/// Wraps caller-supplied operations with per-policy circuit breaking.
#[derive(Clone)]
pub struct ExecutionGate {
    registry: Arc<PolicyRegistry>,
}

impl ExecutionGate {
    pub fn new(registry: Arc<PolicyRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<PolicyRegistry> {
        &self.registry
    }

    /// Run `operation` under the named policy's circuit breaker.
    ///
    /// The operation is an opaque async closure; it may suspend freely.
    /// If the circuit is Open (or a probe is in flight) the operation is
    /// never invoked. Dropping the returned future mid-operation records
    /// a failure sample against the policy.
    pub async fn execute<T, F, Fut>(&self, policy: &str, operation: F) -> Result<T, CircuitError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, BoxError>>,
    {
        let breaker = self.registry.get(policy)?;
        let request_id = short_request_id();

        let permit = match breaker.try_acquire() {
            Ok(permit) => permit,
            Err(retry_after) => {
                tracing::warn!(
                    %request_id,
                    policy,
                    retry_after_secs = retry_after.as_secs_f64(),
                    "Circuit open, rejecting call"
                );
                metrics::record_rejection(policy);
                return Err(CircuitError::CircuitOpen {
                    policy: policy.to_string(),
                    retry_after,
                });
            }
        };

        if permit.is_probe() {
            tracing::debug!(%request_id, policy, "Executing as half-open probe");
        }

        match operation().await {
            Ok(value) => {
                permit.complete(Outcome::Success);
                metrics::record_outcome(policy, "success");
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(%request_id, policy, error = %err, "Operation failed");
                permit.complete(Outcome::Failure);
                metrics::record_outcome(policy, "failure");
                Err(CircuitError::Operation(err))
            }
        }
    }
}

fn short_request_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}
