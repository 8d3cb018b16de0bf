//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::EngineConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {}", describe(.0))]
    Validation(Vec<ValidationError>),
}

fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let config: EngineConfig = toml::from_str(&fs::read_to_string(path)?)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn example_config_loads_and_validates() {
        // Unit tests run from the crate root.
        let config = load_config(Path::new("config.example.toml")).unwrap();
        assert_eq!(config.policies.len(), 2);
        assert_eq!(config.policies[0].name, "database");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_config(Path::new("/nonexistent/circuit-gate.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn semantic_violations_surface_every_error() {
        let path = PathBuf::from(std::env::temp_dir()).join("circuit-gate-loader-test.toml");
        fs::write(
            &path,
            r#"
                [[policies]]
                name = "bad"
                failure_ratio = 2.0
                sampling_duration_secs = 0
                minimum_throughput = 0
                break_duration_secs = 0
            "#,
        )
        .unwrap();

        match load_config(&path) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 4);
                let rendered = ConfigError::Validation(errors).to_string();
                assert!(rendered.contains("failure_ratio"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
        let _ = fs::remove_file(&path);
    }
}
