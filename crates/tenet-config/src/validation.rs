// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks run every field the pipeline later relies on, accumulating all
//! problems before failing so a user can fix a config file in one pass.

use crate::{ConfigError, ConfigResult, TenetConfig};

/// Layer scheme names accepted in `run.layer_scheme`
const LAYER_SCHEMES: [&str; 4] = ["auto", "cortical", "cortical-thalamic", "cortical_thalamic"];

/// Log levels accepted in `logging.level`
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single validation finding
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Required field {} is not set", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate a loaded configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &TenetConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_required_fields(config, &mut errors);
    validate_value_ranges(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_required_fields(config: &TenetConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.run.subject.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "run.subject".to_string(),
        });
    }
    if config.paths.data_dir.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "paths.data_dir".to_string(),
        });
    }
    if config.paths.results_dir.as_os_str().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "paths.results_dir".to_string(),
        });
    }
}

fn validate_value_ranges(config: &TenetConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.run.repeat == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "run.repeat".to_string(),
            reason: "repeats are numbered from 1".to_string(),
        });
    }

    if !LAYER_SCHEMES.contains(&config.run.layer_scheme.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "run.layer_scheme".to_string(),
            reason: format!(
                "'{}' is not one of auto, cortical, cortical-thalamic",
                config.run.layer_scheme
            ),
        });
    }

    let threshold = config.analysis.significance_threshold;
    if !(threshold > 0.0 && threshold < 1.0) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "analysis.significance_threshold".to_string(),
            reason: format!("{} is outside (0, 1)", threshold),
        });
    }

    if !LOG_LEVELS.contains(&config.logging.level.to_lowercase().as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!(
                "'{}' is not one of trace, debug, info, warn, error",
                config.logging.level
            ),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> TenetConfig {
        let mut config = TenetConfig::default();
        config.run.subject = "m03".to_string();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_default_config_fails_on_missing_subject() {
        let result = validate_config(&TenetConfig::default());
        match result {
            Err(ConfigError::ValidationError(msg)) => assert!(msg.contains("run.subject")),
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_repeat_rejected() {
        let mut config = valid_config();
        config.run.repeat = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_unknown_layer_scheme_rejected() {
        let mut config = valid_config();
        config.run.layer_scheme = "hippocampal".to_string();
        assert!(validate_config(&config).is_err());

        config.run.layer_scheme = "cortical_thalamic".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_threshold_must_sit_inside_unit_interval() {
        let mut config = valid_config();
        config.analysis.significance_threshold = 0.0;
        assert!(validate_config(&config).is_err());

        config.analysis.significance_threshold = 1.0;
        assert!(validate_config(&config).is_err());

        config.analysis.significance_threshold = 0.01;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_all_problems_reported_at_once() {
        let mut config = TenetConfig::default();
        config.run.repeat = 0;
        config.logging.level = "verbose".to_string();

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("run.subject"));
                assert!(msg.contains("run.repeat"));
                assert!(msg.contains("logging.level"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }
}
