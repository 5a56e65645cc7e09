// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `tenet_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TenetConfig {
    pub run: RunConfig,
    pub paths: PathsConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

/// Which recording and which inference repeat to reconstruct
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RunConfig {
    /// Subject identifier, e.g. `m03`. Selects the label table and the
    /// result tree. Must be set; there is no sensible default subject.
    pub subject: String,
    /// Inference repeat to scan, numbered from 1.
    pub repeat: u32,
    /// `auto`, `cortical` or `cortical-thalamic`. With `auto` the scheme is
    /// inferred from the label table.
    pub layer_scheme: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            subject: String::new(),
            repeat: 1,
            layer_scheme: "auto".to_string(),
        }
    }
}

/// Filesystem roots the pipeline reads from
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the recording data tree (`{data_dir}/{subject}/...`).
    pub data_dir: PathBuf,
    /// Root of the inference result tree (`{results_dir}/{subject}/...`).
    pub results_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            results_dir: PathBuf::from("results"),
        }
    }
}

/// Statistical knobs of the aggregation passes
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// p-value cutoff for the pairwise significance test.
    pub significance_threshold: f64,
    /// Parse per-target artifacts on a thread pool.
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            significance_threshold: 0.05,
            parallel: true,
        }
    }
}

/// Console logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl TenetConfig {
    /// Path of the subject's label table.
    pub fn labels_path(&self) -> PathBuf {
        self.paths
            .data_dir
            .join(&self.run.subject)
            .join("target_indices.txt")
    }

    /// Subject-level result directory holding pairwise tables and the
    /// summary table.
    pub fn subject_results_dir(&self) -> PathBuf {
        self.paths.results_dir.join(&self.run.subject)
    }

    /// Directory holding the per-target artifacts of the configured repeat.
    pub fn repeat_dir(&self) -> PathBuf {
        self.subject_results_dir()
            .join("effective_inference")
            .join(format!("repeat_{}", self.run.repeat))
    }

    /// Directory holding the per-target inference logs of the configured
    /// repeat.
    pub fn logs_dir(&self) -> PathBuf {
        self.repeat_dir().join("logs")
    }

    /// Path of the pairwise summary table.
    pub fn summary_path(&self) -> PathBuf {
        self.subject_results_dir().join("pairwise_summary.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TenetConfig::default();
        assert_eq!(config.run.repeat, 1);
        assert_eq!(config.run.layer_scheme, "auto");
        assert_eq!(config.analysis.significance_threshold, 0.05);
        assert!(config.analysis.parallel);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_derived_paths() {
        let mut config = TenetConfig::default();
        config.run.subject = "m03".to_string();
        config.run.repeat = 2;
        config.paths.data_dir = PathBuf::from("/data");
        config.paths.results_dir = PathBuf::from("/results");

        assert_eq!(
            config.labels_path(),
            PathBuf::from("/data/m03/target_indices.txt")
        );
        assert_eq!(
            config.repeat_dir(),
            PathBuf::from("/results/m03/effective_inference/repeat_2")
        );
        assert_eq!(
            config.logs_dir(),
            PathBuf::from("/results/m03/effective_inference/repeat_2/logs")
        );
        assert_eq!(
            config.summary_path(),
            PathBuf::from("/results/m03/pairwise_summary.csv")
        );
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TenetConfig = toml::from_str(
            r#"
            [run]
            subject = "m07"
            "#,
        )
        .unwrap();
        assert_eq!(config.run.subject, "m07");
        assert_eq!(config.run.repeat, 1);
        assert_eq!(config.paths.data_dir, PathBuf::from("data"));
    }
}
