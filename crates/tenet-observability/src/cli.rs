//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-tenet-reconstruction` to enable verbose
//! logging per crate without touching the run configuration.

use std::collections::HashMap;
use std::env;

use crate::KNOWN_CRATES;

/// Parse debug flags from command-line arguments
///
/// # Example
/// ```rust
/// use tenet_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(std::env::args());
/// if flags.is_enabled("tenet-reconstruction") {
///     // Verbose logging requested for the pipeline crate
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: HashMap<String, bool>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching the `--debug-{crate-name}` pattern.
    /// Also supports `--debug-all` to enable all crates.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut enabled_crates = HashMap::new();
        let mut debug_all = false;

        for arg in args {
            if arg == "--debug-all" {
                debug_all = true;
                continue;
            }

            if let Some(crate_name) = arg.strip_prefix("--debug-") {
                enabled_crates.insert(crate_name.to_string(), true);
            }
        }

        if debug_all {
            for crate_name in KNOWN_CRATES {
                enabled_crates.insert(crate_name.to_string(), true);
            }
        }

        CrateDebugFlags { enabled_crates }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains_key(crate_name)
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// Get the log level for a specific crate
    ///
    /// Returns `tracing::Level::DEBUG` if enabled, `tracing::Level::INFO` otherwise.
    pub fn log_level(&self, crate_name: &str) -> tracing::Level {
        if self.is_enabled(crate_name) {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Create a tracing filter from the debug flags
    ///
    /// Returns a filter string usable with `EnvFilter`, e.g.
    /// `"tenet-reconstruction=debug,info"`. Crates without a flag fall back
    /// to `base_level`.
    pub fn to_filter_string(&self, base_level: &str) -> String {
        if self.enabled_crates.is_empty() {
            return base_level.to_string();
        }

        let mut filters = Vec::new();
        for crate_name in self.enabled_crates.keys() {
            filters.push(format!("{}=debug", crate_name));
        }
        // Default level for everything else
        filters.push(base_level.to_string());
        filters.join(",")
    }
}

/// Helper function to parse debug flags from arguments and environment
///
/// Checks both command-line arguments and the `TENET_DEBUG` environment
/// variable. Environment variable format: comma-separated crate names,
/// e.g. `tenet-reconstruction,tenet-config`, or `all`.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());

    if let Ok(env_var) = env::var("TENET_DEBUG") {
        if env_var == "all" {
            for crate_name in KNOWN_CRATES {
                flags.enabled_crates.insert(crate_name.to_string(), true);
            }
        } else {
            for crate_name in env_var.split(',') {
                let crate_name = crate_name.trim();
                if !crate_name.is_empty() {
                    flags.enabled_crates.insert(crate_name.to_string(), true);
                }
            }
        }
    }

    flags
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for a specific crate

Available crates:
  {}

Environment Variable:
  TENET_DEBUG={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  TENET_DEBUG=all                              Enable debug for all crates

Examples:
  --debug-tenet-reconstruction
  TENET_DEBUG=tenet-reconstruction,tenet-config
"#,
        KNOWN_CRATES.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_crate_flag() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-tenet-reconstruction".to_string()]);
        assert!(flags.is_enabled("tenet-reconstruction"));
        assert!(!flags.is_enabled("tenet-config"));
    }

    #[test]
    fn test_debug_all() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-all".to_string()]);
        for crate_name in KNOWN_CRATES {
            assert!(flags.is_enabled(crate_name), "{} should be enabled", crate_name);
        }
    }

    #[test]
    fn test_filter_string_includes_base_level() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-tenet-reconstruction".to_string()]);
        let filter = flags.to_filter_string("warn");
        assert!(filter.contains("tenet-reconstruction=debug"));
        assert!(filter.ends_with("warn"));
    }

    #[test]
    fn test_no_flags_yields_bare_level() {
        let flags = CrateDebugFlags::default();
        assert_eq!(flags.to_filter_string("info"), "info");
    }

    #[test]
    fn test_log_level() {
        let flags = CrateDebugFlags::from_args(vec!["--debug-tenet-reconstruction".to_string()]);
        assert_eq!(flags.log_level("tenet-reconstruction"), tracing::Level::DEBUG);
        assert_eq!(flags.log_level("tenet-config"), tracing::Level::INFO);
    }
}
