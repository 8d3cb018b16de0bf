//! Per-policy circuit breaker instance.
//!
//! # Responsibilities
//! - Own one sliding window and one state value behind a single mutex
//! - Decide admission for incoming calls (permit, probe, or reject)
//! - Record outcomes and apply transitions against a consistent snapshot
//! - Notify observers exactly once per transition
//!
//! # Design Decisions
//! - Admission and recording are short critical sections; the lock is
//!   never held across an await or an observer callback
//! - Outcomes are recorded through a [`CallPermit`]; a permit dropped
//!   without completing records a failure, so a cancelled or timed-out
//!   call counts against the policy
//! - Closed → Open is evaluated when a failure lands; a success cannot
//!   cross the ratio threshold
//! - Half-Open means exactly one probe permit is outstanding

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use serde::Serialize;

use crate::breaker::sampler::{Outcome, SlidingWindow};
use crate::breaker::state::{self, Admission, BreakerConfig, CircuitState};

/// Callbacks fired synchronously on every state transition, after the
/// transition is applied and before the triggering call returns.
pub trait StateObserver: Send + Sync {
    fn on_opened(&self, _policy: &str) {}
    fn on_closed(&self, _policy: &str) {}
    fn on_half_opened(&self, _policy: &str) {}
}

/// Read-only view of one breaker, safe to take while calls are in flight.
#[derive(Debug, Clone, Serialize)]
pub struct CircuitStatus {
    pub policy: String,
    pub state: String,
    pub total_count: u64,
    pub failure_ratio: f64,
    /// Remaining break duration while Open; `None` otherwise.
    pub retry_after_secs: Option<f64>,
}

struct Inner {
    state: CircuitState,
    window: SlidingWindow,
}

enum Transition {
    Opened,
    Closed,
    HalfOpened,
}

/// One circuit breaker, created at registration and alive for the
/// process lifetime.
pub struct CircuitBreaker {
    name: String,
    config: BreakerConfig,
    inner: Mutex<Inner>,
    observers: Vec<Arc<dyn StateObserver>>,
}

impl CircuitBreaker {
    pub fn new(
        name: impl Into<String>,
        config: BreakerConfig,
        observers: Vec<Arc<dyn StateObserver>>,
    ) -> Self {
        let window = SlidingWindow::new(config.sampling_duration);
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                window,
            }),
            observers,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ask for admission. Returns a permit, or the remaining break
    /// duration when the call must be rejected.
    ///
    /// When the break has elapsed this applies the Open → Half-Open
    /// transition and admits exactly this call as the probe.
    pub fn try_acquire(self: &Arc<Self>) -> Result<CallPermit, Duration> {
        let now = Instant::now();
        let decision = {
            let mut inner = self.inner.lock().expect("circuit breaker mutex poisoned");
            match state::admit(&inner.state, &self.config, now) {
                Admission::Permit => Ok(false),
                Admission::PermitProbe => {
                    inner.state = CircuitState::HalfOpen;
                    Ok(true)
                }
                Admission::Reject { retry_after } => Err(retry_after),
            }
        };

        match decision {
            Ok(probe) => {
                if probe {
                    self.notify(Transition::HalfOpened);
                }
                Ok(CallPermit {
                    breaker: Arc::clone(self),
                    probe,
                    completed: false,
                })
            }
            Err(retry_after) => Err(retry_after),
        }
    }

    /// Clear the window and force Closed. Atomic with respect to
    /// concurrent calls; idempotent.
    pub fn reset(&self) {
        let transition = {
            let mut inner = self.inner.lock().expect("circuit breaker mutex poisoned");
            inner.window.clear();
            let was_closed = matches!(inner.state, CircuitState::Closed);
            inner.state = CircuitState::Closed;
            if was_closed {
                None
            } else {
                Some(Transition::Closed)
            }
        };
        if let Some(t) = transition {
            self.notify(t);
        }
    }

    /// Snapshot current state and window aggregates without mutating
    /// anything a caller can observe (expired samples are pruned).
    pub fn status(&self) -> CircuitStatus {
        let now = Instant::now();
        let mut inner = self.inner.lock().expect("circuit breaker mutex poisoned");
        let snapshot = inner.window.snapshot(now);
        let retry_after_secs = match inner.state {
            CircuitState::Open { opened_at } => {
                let elapsed = now.saturating_duration_since(opened_at);
                Some(
                    self.config
                        .break_duration
                        .saturating_sub(elapsed)
                        .as_secs_f64(),
                )
            }
            _ => None,
        };
        CircuitStatus {
            policy: self.name.clone(),
            state: inner.state.name().to_string(),
            total_count: snapshot.total_count,
            failure_ratio: snapshot.failure_ratio,
            retry_after_secs,
        }
    }

    fn record(&self, probe: bool, outcome: Outcome) {
        let now = Instant::now();
        let transition = {
            let mut inner = self.inner.lock().expect("circuit breaker mutex poisoned");
            if probe {
                match inner.state {
                    CircuitState::HalfOpen => match outcome {
                        Outcome::Success => {
                            // Stale failures must not reopen a recovered circuit.
                            inner.window.clear();
                            inner.state = CircuitState::Closed;
                            Some(Transition::Closed)
                        }
                        Outcome::Failure => {
                            inner.state = CircuitState::Open { opened_at: now };
                            Some(Transition::Opened)
                        }
                    },
                    // An administrative reset ran while the probe was in
                    // flight; the outcome is just another sample.
                    _ => {
                        inner.window.record(outcome, now);
                        None
                    }
                }
            } else {
                inner.window.record(outcome, now);
                if matches!(inner.state, CircuitState::Closed) && outcome == Outcome::Failure {
                    let snapshot = inner.window.snapshot(now);
                    if state::should_open(&snapshot, &self.config) {
                        inner.state = CircuitState::Open { opened_at: now };
                        Some(Transition::Opened)
                    } else {
                        None
                    }
                } else {
                    None
                }
            }
        };
        if let Some(t) = transition {
            self.notify(t);
        }
    }

    fn notify(&self, transition: Transition) {
        match transition {
            Transition::Opened => {
                tracing::warn!(policy = %self.name, "Circuit opened");
                for obs in &self.observers {
                    obs.on_opened(&self.name);
                }
            }
            Transition::Closed => {
                tracing::info!(policy = %self.name, "Circuit closed");
                for obs in &self.observers {
                    obs.on_closed(&self.name);
                }
            }
            Transition::HalfOpened => {
                tracing::info!(policy = %self.name, "Circuit half-open, admitting probe");
                for obs in &self.observers {
                    obs.on_half_opened(&self.name);
                }
            }
        }
    }
}

/// Admission token for a single gated call. Exactly one outcome is
/// recorded per permit: explicitly via [`CallPermit::complete`], or a
/// failure on drop if the call never reported back.
pub struct CallPermit {
    breaker: Arc<CircuitBreaker>,
    probe: bool,
    completed: bool,
}

impl CallPermit {
    /// True when this call was admitted as the Half-Open probe.
    pub fn is_probe(&self) -> bool {
        self.probe
    }

    /// Record the call's outcome and apply any resulting transition.
    pub fn complete(mut self, outcome: Outcome) {
        self.completed = true;
        self.breaker.record(self.probe, outcome);
    }
}

impl Drop for CallPermit {
    fn drop(&mut self) {
        // Cancellation counts as failure for ratio purposes.
        if !self.completed {
            self.breaker.record(self.probe, Outcome::Failure);
        }
    }
}
