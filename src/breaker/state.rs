//! Circuit state machine core.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: dependency assumed down, calls fail fast
//! - Half-Open: a single probe call tests recovery
//!
//! # State Transitions
//! ```text
//! Closed → Open: window has ≥ minimum_throughput samples AND
//!                failure_ratio ≥ threshold (checked when an outcome lands)
//! Open → Half-Open: admission request arrives after break_duration
//! Half-Open → Closed: probe succeeds (window cleared)
//! Half-Open → Open: probe fails (break restarts from now)
//! ```
//!
//! # Design Decisions
//! - Transitions are lazy and call-driven; no timer threads
//! - Rules are pure functions of (state, snapshot, config, now) so they
//!   are testable without a breaker instance
//! - Half-Open implies exactly one outstanding probe permit; concurrent
//!   admission requests are rejected until the probe completes

use std::time::Duration;
use tokio::time::Instant;

use crate::breaker::sampler::WindowSnapshot;

/// Immutable per-policy thresholds, fixed at registration.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Circuit opens when the observed failure ratio reaches this value.
    /// Fraction in (0, 1].
    pub failure_ratio_threshold: f64,

    /// Window length over which the ratio is computed.
    pub sampling_duration: Duration,

    /// Minimum samples in the window before the ratio is meaningful.
    pub minimum_throughput: u64,

    /// How long the circuit stays Open before probing.
    pub break_duration: Duration,
}

/// Current position in the breaker cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open { opened_at: Instant },
    HalfOpen,
}

impl CircuitState {
    pub fn name(&self) -> &'static str {
        match self {
            CircuitState::Closed => "closed",
            CircuitState::Open { .. } => "open",
            CircuitState::HalfOpen => "half-open",
        }
    }
}

/// Admission decision for one incoming call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Circuit is Closed; execute normally.
    Permit,
    /// Break has elapsed; admit this call as the Half-Open probe.
    PermitProbe,
    /// Fail fast without invoking the operation.
    Reject { retry_after: Duration },
}

/// Pure admission rule. Does not mutate state; the caller applies the
/// Open → Half-Open transition when `PermitProbe` is returned.
pub fn admit(state: &CircuitState, config: &BreakerConfig, now: Instant) -> Admission {
    match state {
        CircuitState::Closed => Admission::Permit,
        CircuitState::Open { opened_at } => {
            let elapsed = now.saturating_duration_since(*opened_at);
            if elapsed >= config.break_duration {
                Admission::PermitProbe
            } else {
                Admission::Reject {
                    retry_after: config.break_duration - elapsed,
                }
            }
        }
        // The probe is already in flight; its outcome decides the next state.
        CircuitState::HalfOpen => Admission::Reject {
            retry_after: Duration::ZERO,
        },
    }
}

/// Pure Closed → Open rule, evaluated against a consistent window snapshot
/// at the moment an outcome is recorded.
pub fn should_open(snapshot: &WindowSnapshot, config: &BreakerConfig) -> bool {
    snapshot.total_count >= config.minimum_throughput
        && snapshot.failure_ratio >= config.failure_ratio_threshold
}
