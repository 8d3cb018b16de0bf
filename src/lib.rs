//! Circuit-Breaker Policy Engine
//!
//! A standalone circuit breaker: per-policy failure-ratio tracking over a
//! sliding time window, an explicit Closed/Open/HalfOpen state machine,
//! and an execution gate that admits or rejects caller-supplied async
//! operations.
//!
//! # Architecture Overview
//!
//! ```text
//!  caller ──▶ ExecutionGate ──▶ PolicyRegistry ──▶ CircuitBreaker ("database")
//!                 │                                 CircuitBreaker ("api")
//!                 │                                      │
//!                 │   permit? ◀──────────────────────────┤ state + probe flag
//!                 ▼                                      ▼
//!          invoke operation                       SlidingWindow (sampler)
//!                 │                                      ▲
//!                 └── record outcome ────────────────────┘
//! ```
//!
//! Transitions are lazy and call-driven: Closed→Open is evaluated when an
//! outcome is recorded, Open→HalfOpen when a call asks for admission after
//! the break has elapsed. No timer threads.

pub mod breaker;
pub mod config;
pub mod observability;
pub mod simulator;

pub use breaker::error::CircuitError;
pub use breaker::gate::ExecutionGate;
pub use breaker::registry::PolicyRegistry;
pub use breaker::state::CircuitState;
pub use config::EngineConfig;
