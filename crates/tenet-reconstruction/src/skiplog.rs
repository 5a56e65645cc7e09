/*!
Skip events from inference logs.

Candidate comparisons the inference stage declined to test are only
recorded as log lines, one log file per target unit. This module recovers
them as [`SkipEvent`] values behind the [`SkipEventSource`] interface, so
the aggregation never has to know the events came out of log text.
*/

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::debug;

use tenet_structures::{SkipEvent, TenetError, TenetResult, UnitIndex};

use crate::conditioning::target_from_filename;

/// Line that opens the sorted per-source results section of a log. Skip
/// notices only appear above it.
pub const SOURCES_SORTED_MARKER: &str = "Sorted order of sources";

/// Phrase announcing a skipped candidate source; the source unit index is
/// the token right after it.
pub const SKIP_PHRASE: &str = "Skipping source";

/// File extension of per-target inference logs.
pub const LOG_EXTENSION: &str = "log";

/// Source of the skip events of one run.
pub trait SkipEventSource {
    fn load_skip_events(&self) -> TenetResult<Vec<SkipEvent>>;
}

/// Skip events recovered from the per-target log files of one repeat.
///
/// A missing directory yields no events, the same as a directory without
/// logs: older runs did not keep their logs.
#[derive(Debug, Clone)]
pub struct InferenceLogDir {
    dir: PathBuf,
    parallel: bool,
}

impl InferenceLogDir {
    pub fn new(dir: impl Into<PathBuf>, parallel: bool) -> InferenceLogDir {
        InferenceLogDir {
            dir: dir.into(),
            parallel,
        }
    }
}

impl SkipEventSource for InferenceLogDir {
    fn load_skip_events(&self) -> TenetResult<Vec<SkipEvent>> {
        let mut paths = log_paths(&self.dir)?;
        paths.sort();

        let per_log = if self.parallel {
            paths
                .par_iter()
                .map(|path| parse_log(path))
                .collect::<TenetResult<Vec<_>>>()?
        } else {
            paths
                .iter()
                .map(|path| parse_log(path))
                .collect::<TenetResult<Vec<_>>>()?
        };
        Ok(per_log.into_iter().flatten().collect())
    }
}

/// Parses one per-target log. The target unit is encoded in the filename
/// the same way as for conditioning artifacts.
pub fn parse_log(path: &Path) -> TenetResult<Vec<SkipEvent>> {
    let target =
        target_from_filename(path).ok_or_else(|| TenetError::UnattributableArtifact {
            path: path.to_path_buf(),
        })?;
    let content = fs::read_to_string(path).map_err(|e| TenetError::from_io(path, e))?;
    parse_skip_lines(&content, target, path)
}

fn parse_skip_lines(
    content: &str,
    target: UnitIndex,
    path: &Path,
) -> TenetResult<Vec<SkipEvent>> {
    let mut events = Vec::new();
    for (i, line) in content.lines().enumerate() {
        if line.contains(SOURCES_SORTED_MARKER) {
            break;
        }
        let rest = match line.find(SKIP_PHRASE) {
            Some(at) => &line[at + SKIP_PHRASE.len()..],
            None => continue,
        };
        let token = rest.split_whitespace().next().unwrap_or("");
        let source = token.parse().map_err(|_| TenetError::MalformedRecord {
            path: path.to_path_buf(),
            line: i + 1,
            reason: format!("cannot parse skipped source index from '{}'", line.trim()),
        })?;
        events.push(SkipEvent { source, target });
    }
    Ok(events)
}

fn log_paths(dir: &Path) -> TenetResult<Vec<PathBuf>> {
    if !dir.exists() {
        debug!(target: "tenet-reconstruction", "No log directory at {}", dir.display());
        return Ok(Vec::new());
    }
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| TenetError::from_io(dir, e))? {
        let entry = entry.map_err(|e| TenetError::from_io(dir, e))?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(LOG_EXTENSION) {
            paths.push(path);
        }
    }
    Ok(paths)
}
