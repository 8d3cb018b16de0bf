//! Circuit breaker subsystem.
//!
//! # Data Flow
//! ```text
//! Call admission:
//!     gate.rs (execute) → registry.rs (lookup) → machine.rs (try_acquire)
//!         → state.rs (pure admission rule) → permit or CircuitOpen
//!
//! Outcome recording:
//!     permit.complete(outcome) → sampler.rs (append + prune)
//!         → state.rs (pure transition rule) → observer callbacks
//! ```
//!
//! # Design Decisions
//! - One mutex per breaker; admission and recording are single critical
//!   sections, never held across an await
//! - Transition rules are pure functions of (state, snapshot, config, now)
//! - A dropped permit records a failure: cancellation counts as failure
//! - Single probe in Half-Open (prevents hammering a recovering dependency)

pub mod error;
pub mod gate;
pub mod machine;
pub mod registry;
pub mod sampler;
pub mod state;

pub use error::CircuitError;
pub use machine::{CircuitBreaker, CircuitStatus, StateObserver};
pub use state::CircuitState;
