/*!
Per-target conditioning-set artifacts.

The inference stage writes one JSON artifact per target unit, the target
index encoded as the trailing `_<int>` of the filename. The payload either
carries the selected parent set or a null marker for "no result".
*/

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use tenet_structures::{
    AnalysisWarning, ConditioningArtifact, ConditioningOutcome, TenetError, TenetResult,
    UnitIndex, CONDITIONING_SCHEMA_VERSION,
};

/// File extension of conditioning-set artifacts.
pub const ARTIFACT_EXTENSION: &str = "json";

/// Recovers the unit index encoded as the trailing integer token of a
/// filename stem, e.g. `inference_target_17.json` -> 17.
pub fn target_from_filename(path: &Path) -> Option<UnitIndex> {
    let stem = path.file_stem()?.to_str()?;
    stem.rsplit('_').next()?.parse().ok()
}

/// Loads one artifact.
///
/// Only an unattributable filename is an error. Every problem with the
/// payload itself folds into [`ConditioningOutcome::Unreadable`], so one
/// corrupt file cannot abort a scan that covers hundreds of targets.
pub fn parse_artifact(path: &Path) -> TenetResult<(UnitIndex, ConditioningOutcome)> {
    let target =
        target_from_filename(path).ok_or_else(|| TenetError::UnattributableArtifact {
            path: path.to_path_buf(),
        })?;

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => return Ok((target, ConditioningOutcome::Unreadable(e.to_string()))),
    };

    let artifact: ConditioningArtifact = match serde_json::from_str(&content) {
        Ok(artifact) => artifact,
        Err(e) => return Ok((target, ConditioningOutcome::Unreadable(e.to_string()))),
    };

    if artifact.schema_version != CONDITIONING_SCHEMA_VERSION {
        return Ok((
            target,
            ConditioningOutcome::Unreadable(format!(
                "unsupported schema version {}",
                artifact.schema_version
            )),
        ));
    }

    let outcome = match artifact.conditioning_set {
        Some(set) => ConditioningOutcome::Present(set),
        None => ConditioningOutcome::Empty,
    };
    Ok((target, outcome))
}

/// Everything recovered from one repeat directory.
#[derive(Debug, Clone, Default)]
pub struct ArtifactScan {
    /// Outcomes sorted by target unit; ties keep filename order.
    pub outcomes: Vec<(UnitIndex, ConditioningOutcome)>,
    pub warnings: Vec<AnalysisWarning>,
}

/// Scans a repeat directory for conditioning-set artifacts.
///
/// A missing directory yields an empty scan, the same as a directory with
/// no artifacts in it. The result is deterministic regardless of directory
/// enumeration order or thread scheduling.
pub fn scan_repeat_dir(dir: &Path, parallel: bool) -> TenetResult<ArtifactScan> {
    let mut paths = artifact_paths(dir)?;
    paths.sort();

    let mut outcomes = if parallel {
        paths
            .par_iter()
            .map(|path| parse_artifact(path))
            .collect::<TenetResult<Vec<_>>>()?
    } else {
        paths
            .iter()
            .map(|path| parse_artifact(path))
            .collect::<TenetResult<Vec<_>>>()?
    };

    // Stable sort, so equal targets stay in the filename order fixed above.
    outcomes.sort_by_key(|(target, _)| *target);

    let mut warnings = Vec::new();
    let mut last_duplicate = None;
    for pair in outcomes.windows(2) {
        if pair[0].0 == pair[1].0 && last_duplicate != Some(pair[0].0) {
            warnings.push(AnalysisWarning::DuplicateTarget { target: pair[0].0 });
            last_duplicate = Some(pair[0].0);
        }
    }
    for (target, outcome) in &outcomes {
        if let ConditioningOutcome::Unreadable(reason) = outcome {
            warnings.push(AnalysisWarning::UnreadableArtifact {
                target: *target,
                reason: reason.clone(),
            });
        }
    }

    Ok(ArtifactScan { outcomes, warnings })
}

fn artifact_paths(dir: &Path) -> TenetResult<Vec<PathBuf>> {
    if !dir.exists() {
        debug!(target: "tenet-reconstruction", "No artifact directory at {}", dir.display());
        return Ok(Vec::new());
    }
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| TenetError::from_io(dir, e))? {
        let entry = entry.map_err(|e| TenetError::from_io(dir, e))?;
        let path = entry.path();
        if path.is_file()
            && path.extension().and_then(|e| e.to_str()) == Some(ARTIFACT_EXTENSION)
        {
            paths.push(path);
        }
    }
    Ok(paths)
}
