//! Sliding window outcome sampler.
//!
//! # Responsibilities
//! - Keep timestamped success/failure samples for one policy
//! - Prune samples older than the sampling duration on every access
//! - Derive (total count, failure count, failure ratio) snapshots
//!
//! # Design Decisions
//! - Pruning is lazy (on record and on snapshot), never a background
//!   timer; an idle policy costs nothing
//! - The window is owned by exactly one breaker and accessed under its
//!   lock; the sampler itself carries no synchronization
//! - `tokio::time::Instant` so paused-clock tests can drive the window

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Result of one gated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Aggregate view of the trailing window at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSnapshot {
    pub total_count: u64,
    pub failure_count: u64,
    /// failure_count / total_count; 0.0 for an empty window.
    pub failure_ratio: f64,
}

/// Time-bounded sequence of outcomes for one policy.
#[derive(Debug)]
pub struct SlidingWindow {
    sampling_duration: Duration,
    samples: VecDeque<(Instant, Outcome)>,
}

impl SlidingWindow {
    pub fn new(sampling_duration: Duration) -> Self {
        Self {
            sampling_duration,
            samples: VecDeque::new(),
        }
    }

    /// Append an outcome observed at `at`, pruning expired samples first.
    pub fn record(&mut self, outcome: Outcome, at: Instant) {
        self.prune(at);
        self.samples.push_back((at, outcome));
    }

    /// Prune entries older than the sampling duration and summarize the rest.
    pub fn snapshot(&mut self, now: Instant) -> WindowSnapshot {
        self.prune(now);
        let total_count = self.samples.len() as u64;
        let failure_count = self
            .samples
            .iter()
            .filter(|(_, o)| *o == Outcome::Failure)
            .count() as u64;
        let failure_ratio = if total_count == 0 {
            0.0
        } else {
            failure_count as f64 / total_count as f64
        };
        WindowSnapshot {
            total_count,
            failure_count,
            failure_ratio,
        }
    }

    /// Drop all samples (used when a probe closes the circuit or on reset).
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    fn prune(&mut self, now: Instant) {
        // Samples are appended in time order, so expired entries are a prefix.
        let cutoff = now.checked_sub(self.sampling_duration);
        if let Some(cutoff) = cutoff {
            while let Some((at, _)) = self.samples.front() {
                if *at < cutoff {
                    self.samples.pop_front();
                } else {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn empty_window_has_zero_ratio() {
        let mut window = SlidingWindow::new(Duration::from_secs(30));
        let snap = window.snapshot(Instant::now());
        assert_eq!(snap.total_count, 0);
        assert_eq!(snap.failure_ratio, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn ratio_counts_only_failures() {
        let mut window = SlidingWindow::new(Duration::from_secs(30));
        let now = Instant::now();
        window.record(Outcome::Failure, now);
        window.record(Outcome::Failure, now);
        window.record(Outcome::Failure, now);
        window.record(Outcome::Success, now);

        let snap = window.snapshot(now);
        assert_eq!(snap.total_count, 4);
        assert_eq!(snap.failure_count, 3);
        assert!((snap.failure_ratio - 0.75).abs() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn old_samples_are_pruned() {
        let mut window = SlidingWindow::new(Duration::from_secs(30));
        window.record(Outcome::Failure, Instant::now());

        tokio::time::advance(Duration::from_secs(31)).await;
        window.record(Outcome::Success, Instant::now());

        let snap = window.snapshot(Instant::now());
        assert_eq!(snap.total_count, 1);
        assert_eq!(snap.failure_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn samples_at_window_edge_are_retained() {
        let mut window = SlidingWindow::new(Duration::from_secs(30));
        window.record(Outcome::Failure, Instant::now());

        tokio::time::advance(Duration::from_secs(30)).await;
        let snap = window.snapshot(Instant::now());
        assert_eq!(snap.total_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn clear_empties_the_window() {
        let mut window = SlidingWindow::new(Duration::from_secs(30));
        window.record(Outcome::Failure, Instant::now());
        window.clear();
        assert_eq!(window.snapshot(Instant::now()).total_count, 0);
    }
}
