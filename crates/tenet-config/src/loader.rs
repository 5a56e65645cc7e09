// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, TenetConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Find the tenet configuration file
///
/// Search order:
/// 1. `TENET_CONFIG_PATH` environment variable
/// 2. Current working directory: `./tenet_configuration.toml`
/// 3. Parent directories (searches up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    // 1. Check environment variable first
    if let Ok(env_path) = env::var("TENET_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by TENET_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    // 2. Search in common locations
    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join("tenet_configuration.toml"));

        // Search up to 5 levels for a workspace root
        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join("tenet_configuration.toml"));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file 'tenet_configuration.toml' not found in any of these locations:\n{}\n\nSet TENET_CONFIG_PATH environment variable to specify a custom location.",
        search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Returns
///
/// Complete `TenetConfig` with all overrides applied
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<TenetConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: TenetConfig = toml::from_str(&content)?;

    // Apply overrides in order
    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `TENET_SUBJECT` -> `run.subject`
/// - `TENET_REPEAT` -> `run.repeat`
/// - `TENET_LAYER_SCHEME` -> `run.layer_scheme`
/// - `TENET_DATA_DIR` -> `paths.data_dir`
/// - `TENET_RESULTS_DIR` -> `paths.results_dir`
/// - `TENET_SIGNIFICANCE_THRESHOLD` -> `analysis.significance_threshold`
/// - `TENET_PARALLEL` -> `analysis.parallel`
/// - `TENET_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut TenetConfig) {
    // Run settings
    if let Ok(value) = env::var("TENET_SUBJECT") {
        config.run.subject = value;
    }
    if let Ok(value) = env::var("TENET_REPEAT") {
        if let Ok(repeat) = value.parse::<u32>() {
            config.run.repeat = repeat;
        }
    }
    if let Ok(value) = env::var("TENET_LAYER_SCHEME") {
        config.run.layer_scheme = value;
    }

    // Path settings
    if let Ok(value) = env::var("TENET_DATA_DIR") {
        config.paths.data_dir = PathBuf::from(value);
    }
    if let Ok(value) = env::var("TENET_RESULTS_DIR") {
        config.paths.results_dir = PathBuf::from(value);
    }

    // Analysis settings
    if let Ok(value) = env::var("TENET_SIGNIFICANCE_THRESHOLD") {
        if let Ok(threshold) = value.parse::<f64>() {
            config.analysis.significance_threshold = threshold;
        }
    }
    if let Ok(value) = env::var("TENET_PARALLEL") {
        config.analysis.parallel =
            value.to_lowercase() == "true" || value == "1" || value.to_lowercase() == "yes";
    }

    // Logging settings
    if let Ok(value) = env::var("TENET_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"subject": "m03", "repeat": "2"}`)
pub fn apply_cli_overrides(config: &mut TenetConfig, cli_args: &HashMap<String, String>) {
    // Run settings
    if let Some(value) = cli_args.get("subject") {
        config.run.subject = value.clone();
    }
    if let Some(value) = cli_args.get("repeat") {
        if let Ok(repeat) = value.parse::<u32>() {
            config.run.repeat = repeat;
        }
    }
    if let Some(value) = cli_args.get("layer_scheme") {
        config.run.layer_scheme = value.clone();
    }

    // Path settings
    if let Some(value) = cli_args.get("data_dir") {
        config.paths.data_dir = PathBuf::from(value);
    }
    if let Some(value) = cli_args.get("results_dir") {
        config.paths.results_dir = PathBuf::from(value);
    }

    // Analysis settings
    if let Some(value) = cli_args.get("significance_threshold") {
        if let Ok(threshold) = value.parse::<f64>() {
            config.analysis.significance_threshold = threshold;
        }
    }
    if let Some(value) = cli_args.get("parallel") {
        config.analysis.parallel = value.to_lowercase() == "true" || value == "1";
    }

    // Logging settings
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
}
