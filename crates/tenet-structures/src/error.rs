use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use crate::layers::LayerTag;

/// Result type for tenet operations
pub type TenetResult<T> = Result<T, TenetError>;

/// Errors that can occur while reconstructing an effective network
#[derive(Debug, thiserror::Error)]
pub enum TenetError {
    #[error("Required input missing: {path}")]
    MissingFile { path: PathBuf },

    #[error("Unrecognized unit label '{label}' at {path}:{line}")]
    MalformedLabel {
        path: PathBuf,
        line: usize,
        label: String,
    },

    #[error("Malformed record at {path}:{line}: {reason}")]
    MalformedRecord {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Unit index {unit} out of range: label table holds {unit_count} units")]
    UnknownUnit { unit: usize, unit_count: usize },

    #[error("Layer {layer} is not part of the {scheme} scheme")]
    LayerNotInScheme { layer: String, scheme: String },

    #[error("Scheme mismatch: {left} vs {right}")]
    SchemeMismatch { left: String, right: String },

    #[error("Cannot attribute artifact to a target unit: {path}")]
    UnattributableArtifact { path: PathBuf },

    #[error("I/O failure on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TenetError {
    /// Wraps an I/O error with the path it occurred on, mapping a plain
    /// not-found into the dedicated missing-input variant.
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> TenetError {
        if source.kind() == std::io::ErrorKind::NotFound {
            TenetError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            TenetError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Non-fatal anomalies collected while scanning and aggregating.
///
/// These are surfaced as values rather than log lines only, so callers can
/// inspect them and tests can assert on them. The pipeline logs each one.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisWarning {
    /// A possible-links cell went negative after subtracting skip events.
    NegativePossibleLinks {
        source: LayerTag,
        target: LayerTag,
        value: f64,
    },
    /// A record passed the significance test yet carries a negative
    /// corrected magnitude. It is excluded from the rate numerators but
    /// still counted as significant.
    NegativeSignificantTransfer {
        path: PathBuf,
        line: usize,
        corrected_magnitude: f64,
        p_value: f64,
    },
    /// Two artifacts in one repeat resolved to the same target unit.
    DuplicateTarget { target: usize },
    /// A per-target artifact existed but could not be read. Treated as the
    /// target having no result.
    UnreadableArtifact { target: usize, reason: String },
}

impl Display for AnalysisWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisWarning::NegativePossibleLinks {
                source,
                target,
                value,
            } => write!(
                f,
                "Possible-links count for {} -> {} is negative ({}): skip log disagrees with the label table",
                source, target, value
            ),
            AnalysisWarning::NegativeSignificantTransfer {
                path,
                line,
                corrected_magnitude,
                p_value,
            } => write!(
                f,
                "Significant transfer with negative corrected magnitude {} (p = {}) at {}:{}",
                corrected_magnitude,
                p_value,
                path.display(),
                line
            ),
            AnalysisWarning::DuplicateTarget { target } => write!(
                f,
                "Multiple artifacts claim target unit {}: each contributes its own parents",
                target
            ),
            AnalysisWarning::UnreadableArtifact { target, reason } => write!(
                f,
                "Artifact for target unit {} unreadable, treating as no result: {}",
                target, reason
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_from_io_maps_not_found_to_missing_file() {
        let err = TenetError::from_io(
            Path::new("/data/m03/target_indices.txt"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, TenetError::MissingFile { .. }));
    }

    #[test]
    fn test_from_io_keeps_other_kinds() {
        let err = TenetError::from_io(
            Path::new("/data/m03/target_indices.txt"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(matches!(err, TenetError::Io { .. }));
    }

    #[test]
    fn test_warning_display_is_self_contained() {
        let warning = AnalysisWarning::DuplicateTarget { target: 17 };
        let text = warning.to_string();
        assert!(text.contains("17"));
        assert!(text.contains("artifacts"));
    }
}
