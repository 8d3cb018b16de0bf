//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::breaker::state::BreakerConfig;

/// Root configuration for the circuit breaker engine.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Named circuit breaker policies.
    pub policies: Vec<PolicyConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl EngineConfig {
    /// Defaults matching the stock "database" and "api" policies.
    pub fn with_default_policies() -> Self {
        Self {
            policies: default_policies(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// One circuit breaker policy, immutable after registration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyConfig {
    /// Unique policy identifier (e.g. "database").
    pub name: String,

    /// Failure ratio in (0, 1] at which the circuit opens.
    pub failure_ratio: f64,

    /// Window length over which the ratio is computed.
    pub sampling_duration_secs: u64,

    /// Minimum samples in the window before the ratio is evaluated.
    pub minimum_throughput: u64,

    /// How long the circuit stays open before probing.
    pub break_duration_secs: u64,
}

impl From<&PolicyConfig> for BreakerConfig {
    fn from(policy: &PolicyConfig) -> Self {
        Self {
            failure_ratio_threshold: policy.failure_ratio,
            sampling_duration: Duration::from_secs(policy.sampling_duration_secs),
            minimum_throughput: policy.minimum_throughput,
            break_duration: Duration::from_secs(policy.break_duration_secs),
        }
    }
}

/// The stock demo policies: a tolerant "database" breaker and a more
/// sensitive "api" breaker.
pub fn default_policies() -> Vec<PolicyConfig> {
    vec![
        PolicyConfig {
            name: "database".to_string(),
            failure_ratio: 0.5,
            sampling_duration_secs: 30,
            minimum_throughput: 3,
            break_duration_secs: 30,
        },
        PolicyConfig {
            name: "api".to_string(),
            failure_ratio: 0.3,
            sampling_duration_secs: 20,
            minimum_throughput: 5,
            break_duration_secs: 15,
        },
    ]
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Whether to expose a Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics listener address.
    pub metrics_address: String,

    /// Default tracing filter when RUST_LOG is unset.
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
            log_filter: "circuit_gate=info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_toml_parses_with_defaults() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert!(config.policies.is_empty());
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn policy_toml_round_trips() {
        let toml = r#"
            [[policies]]
            name = "database"
            failure_ratio = 0.5
            sampling_duration_secs = 30
            minimum_throughput = 3
            break_duration_secs = 30
        "#;
        let config: EngineConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.policies.len(), 1);

        let breaker = BreakerConfig::from(&config.policies[0]);
        assert_eq!(breaker.sampling_duration, Duration::from_secs(30));
        assert_eq!(breaker.minimum_throughput, 3);
    }
}
