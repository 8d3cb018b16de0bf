//! Policy registry.
//!
//! # Design Decisions
//! - Built once at startup from validated config; the name → breaker map
//!   never changes afterwards (instances mutate internally)
//! - Breakers are shared as `Arc` so permits can outlive a lookup
//! - Unknown policy names are a programmer error, not a retriable one

use std::collections::HashMap;
use std::sync::Arc;

use crate::breaker::error::CircuitError;
use crate::breaker::machine::{CircuitBreaker, CircuitStatus, StateObserver};
use crate::breaker::state::BreakerConfig;
use crate::config::PolicyConfig;

/// Process-wide map of named circuit breakers.
pub struct PolicyRegistry {
    breakers: HashMap<String, Arc<CircuitBreaker>>,
}

impl PolicyRegistry {
    /// Build one breaker per policy, all sharing the given observers.
    pub fn new(policies: &[PolicyConfig], observers: Vec<Arc<dyn StateObserver>>) -> Self {
        let mut breakers = HashMap::with_capacity(policies.len());
        for policy in policies {
            let config = BreakerConfig::from(policy);
            tracing::info!(
                policy = %policy.name,
                failure_ratio = config.failure_ratio_threshold,
                sampling_secs = config.sampling_duration.as_secs(),
                minimum_throughput = config.minimum_throughput,
                break_secs = config.break_duration.as_secs(),
                "Registered circuit breaker"
            );
            breakers.insert(
                policy.name.clone(),
                Arc::new(CircuitBreaker::new(
                    policy.name.clone(),
                    config,
                    observers.clone(),
                )),
            );
        }
        Self { breakers }
    }

    pub fn get(&self, name: &str) -> Result<&Arc<CircuitBreaker>, CircuitError> {
        self.breakers
            .get(name)
            .ok_or_else(|| CircuitError::PolicyNotFound(name.to_string()))
    }

    /// Clear a policy's window and force it Closed.
    pub fn reset(&self, name: &str) -> Result<(), CircuitError> {
        self.get(name)?.reset();
        Ok(())
    }

    /// Read-only snapshots of every registered policy, name-sorted for
    /// stable output.
    pub fn statuses(&self) -> Vec<CircuitStatus> {
        let mut statuses: Vec<CircuitStatus> =
            self.breakers.values().map(|b| b.status()).collect();
        statuses.sort_by(|a, b| a.policy.cmp(&b.policy));
        statuses
    }

    pub fn policy_names(&self) -> Vec<&str> {
        self.breakers.keys().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_policy_is_an_error() {
        let registry = PolicyRegistry::new(&[], Vec::new());
        match registry.get("database") {
            Err(CircuitError::PolicyNotFound(name)) => assert_eq!(name, "database"),
            other => panic!("expected PolicyNotFound, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn policies_are_independent() {
        let registry = PolicyRegistry::new(&crate::config::default_policies(), Vec::new());

        let database = registry.get("database").unwrap().clone();
        for _ in 0..3 {
            database
                .try_acquire()
                .unwrap()
                .complete(crate::breaker::sampler::Outcome::Failure);
        }

        let statuses = registry.statuses();
        let api = statuses.iter().find(|s| s.policy == "api").unwrap();
        let db = statuses.iter().find(|s| s.policy == "database").unwrap();
        assert_eq!(db.state, "open");
        assert_eq!(api.state, "closed");
        assert_eq!(api.total_count, 0);
    }
}
