//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! gate + breakers produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, state gauge)
//!
//! Consumers:
//!     → stdout (tracing fmt layer, env-filtered)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Metric updates are cheap (atomic increments behind the metrics crate)
//! - State transitions reach metrics through the observer callbacks, so
//!   the breaker core has no metrics dependency

pub mod logging;
pub mod metrics;

pub use metrics::TelemetryObserver;
