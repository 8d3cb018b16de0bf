//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ratio in (0, 1], durations > 0)
//! - Detect duplicate policy names
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: EngineConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the registry

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::EngineConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("policy at index {0} has an empty name")]
    EmptyPolicyName(usize),

    #[error("duplicate policy name '{0}'")]
    DuplicatePolicyName(String),

    #[error("policy '{0}': failure_ratio must be in (0, 1]")]
    FailureRatioOutOfRange(String),

    #[error("policy '{0}': sampling_duration_secs must be greater than zero")]
    ZeroSamplingDuration(String),

    #[error("policy '{0}': minimum_throughput must be at least 1")]
    ZeroMinimumThroughput(String),

    #[error("policy '{0}': break_duration_secs must be greater than zero")]
    ZeroBreakDuration(String),

    #[error("observability: invalid metrics_address '{0}'")]
    InvalidMetricsAddress(String),
}

/// Check semantic constraints, collecting every violation.
pub fn validate_config(config: &EngineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, policy) in config.policies.iter().enumerate() {
        if policy.name.is_empty() {
            errors.push(ValidationError::EmptyPolicyName(index));
            continue;
        }
        if !seen.insert(policy.name.clone()) {
            errors.push(ValidationError::DuplicatePolicyName(policy.name.clone()));
        }
        if !(policy.failure_ratio > 0.0 && policy.failure_ratio <= 1.0) {
            errors.push(ValidationError::FailureRatioOutOfRange(policy.name.clone()));
        }
        if policy.sampling_duration_secs == 0 {
            errors.push(ValidationError::ZeroSamplingDuration(policy.name.clone()));
        }
        if policy.minimum_throughput == 0 {
            errors.push(ValidationError::ZeroMinimumThroughput(policy.name.clone()));
        }
        if policy.break_duration_secs == 0 {
            errors.push(ValidationError::ZeroBreakDuration(policy.name.clone()));
        }
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{default_policies, PolicyConfig};

    #[test]
    fn default_policies_validate() {
        let config = EngineConfig {
            policies: default_policies(),
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn all_violations_are_reported() {
        let config = EngineConfig {
            policies: vec![PolicyConfig {
                name: "bad".to_string(),
                failure_ratio: 1.5,
                sampling_duration_secs: 0,
                minimum_throughput: 0,
                break_duration_secs: 0,
            }],
            ..Default::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut policies = default_policies();
        policies.push(policies[0].clone());
        let config = EngineConfig {
            policies,
            ..Default::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicatePolicyName(
            "database".to_string()
        )));
    }

    #[test]
    fn ratio_of_one_is_allowed() {
        let config = EngineConfig {
            policies: vec![PolicyConfig {
                name: "strict".to_string(),
                failure_ratio: 1.0,
                sampling_duration_secs: 10,
                minimum_throughput: 1,
                break_duration_secs: 5,
            }],
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }
}
