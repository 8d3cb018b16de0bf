//! Error taxonomy for gated execution.

use std::time::Duration;
use thiserror::Error;

/// Error type for operations the wrapped closure may raise.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by [`crate::ExecutionGate::execute`].
///
/// `CircuitOpen` is a first-class kind so callers can tell "service
/// protecting itself" apart from "service is broken" without matching on
/// error text.
#[derive(Debug, Error)]
pub enum CircuitError {
    /// Referenced a policy name that was never registered. Programmer
    /// error; not retriable.
    #[error("no circuit breaker registered for policy '{0}'")]
    PolicyNotFound(String),

    /// The circuit is Open (or a Half-Open probe is in flight); the
    /// operation was not invoked. `retry_after` is the remaining break
    /// duration, fit for a Retry-After hint at the request boundary.
    #[error("circuit '{policy}' is open, retry after {retry_after:?}")]
    CircuitOpen {
        policy: String,
        retry_after: Duration,
    },

    /// The operation ran and failed. Recorded as a failure sample, then
    /// re-surfaced unchanged; the gate never retries.
    #[error("operation failed: {0}")]
    Operation(#[source] BoxError),
}

impl CircuitError {
    /// True when the call was rejected without invoking the operation.
    pub fn is_rejection(&self) -> bool {
        matches!(self, CircuitError::CircuitOpen { .. })
    }
}
