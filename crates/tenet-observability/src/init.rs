// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization for tenet tools
//!
//! Console tracing only. `RUST_LOG` takes precedence over everything so a
//! shell can always override the configured level.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::cli::CrateDebugFlags;

/// Initialize console logging
///
/// Filter precedence:
/// 1. `RUST_LOG`, when set
/// 2. Per-crate debug flags on top of `base_level`
///
/// # Arguments
/// * `base_level` - Level for crates without a debug flag, e.g. `"info"`
/// * `debug_flags` - Per-crate debug flags for filtering
pub fn init_logging(base_level: &str, debug_flags: &CrateDebugFlags) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directives = debug_flags.to_filter_string(base_level);
            EnvFilter::try_new(&directives)
                .with_context(|| format!("Invalid log filter: {}", directives))?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(())
}

/// Initialize logging at `info` with no debug flags
pub fn init_logging_default() -> Result<()> {
    init_logging("info", &CrateDebugFlags::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent_enough_for_tests() {
        // First call wins; the second must report failure rather than panic.
        let first = init_logging("info", &CrateDebugFlags::default());
        let second = init_logging("debug", &CrateDebugFlags::default());
        assert!(first.is_ok() || second.is_err());
    }
}
