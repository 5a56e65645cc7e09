/*!
Record types produced by the inference stage and consumed here.

Conditioning-set artifacts are JSON files written per target unit; pairwise
tables and skip logs are plain text. The structures in this module carry
the parsed form of each.
*/

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::labels::UnitIndex;

/// Version tag written into every conditioning-set artifact.
pub const CONDITIONING_SCHEMA_VERSION: u32 = 1;

/// Default p-value cutoff for treating a pairwise transfer as significant.
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Per-parent statistics attached to a conditioning-set entry.
///
/// Provenance only: the reconstruction counts parents and draws edges but
/// never reads these numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParentStats {
    /// Greedy selection round in which this parent entered the set.
    pub selection_round: Option<u32>,
    /// Conditional transfer magnitude at selection time.
    pub transfer_entropy: Option<f64>,
    /// Mean of the surrogate distribution the magnitude was tested against.
    pub surrogate_mean: Option<f64>,
}

/// The parents selected as statistically relevant sources of one target,
/// keyed by parent unit index. Ordered so iteration is deterministic.
pub type ConditioningSet = BTreeMap<UnitIndex, ParentStats>;

/// On-disk payload of one per-target artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditioningArtifact {
    pub schema_version: u32,
    /// `None` is the upstream marker for "inference produced no result".
    pub conditioning_set: Option<ConditioningSet>,
}

impl ConditioningArtifact {
    pub fn new(conditioning_set: Option<ConditioningSet>) -> ConditioningArtifact {
        ConditioningArtifact {
            schema_version: CONDITIONING_SCHEMA_VERSION,
            conditioning_set,
        }
    }
}

/// What loading one per-target artifact yielded.
///
/// An empty `Present` set, `Empty` and `Unreadable` all contribute the same
/// nothing to the network (in-degree stays 0, no edges); they are kept
/// distinct so the pipeline can report how many targets fell into each bin.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditioningOutcome {
    /// The artifact carried a conditioning set, possibly empty.
    Present(ConditioningSet),
    /// The artifact explicitly recorded "no result".
    Empty,
    /// The artifact existed but could not be read or had a foreign schema.
    Unreadable(String),
}

impl ConditioningOutcome {
    /// Parents if the artifact carried any, `None` otherwise.
    pub fn parents(&self) -> Option<&ConditioningSet> {
        match self {
            ConditioningOutcome::Present(set) => Some(set),
            _ => None,
        }
    }

    /// True when this outcome will add at least one edge to the network.
    pub fn contributes_edges(&self) -> bool {
        matches!(self, ConditioningOutcome::Present(set) if !set.is_empty())
    }
}

/// One tested source-target comparison from a pairwise table row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairwiseRecord {
    /// Transfer magnitude before surrogate correction.
    pub raw_magnitude: f64,
    /// Surrogate-corrected transfer magnitude. May be negative.
    pub corrected_magnitude: f64,
    /// p-value of the significance test.
    pub p_value: f64,
    /// Spikes emitted by the source unit inside the window.
    pub source_spike_count: f64,
    /// Spikes emitted by the target unit inside the window.
    pub target_spike_count: f64,
    /// Observation window length in seconds.
    pub window_length_secs: f64,
}

impl PairwiseRecord {
    /// Strictly-below test used for significance counting. A record sitting
    /// exactly at the threshold is not significant, yet the zeroing rule
    /// (`p > threshold`) still retains its magnitude.
    pub fn is_significant(&self, threshold: f64) -> bool {
        self.p_value < threshold
    }

    /// True when the magnitude is dropped from rate numerators: either the
    /// test failed or the corrected magnitude came out negative.
    pub fn is_zeroed(&self, threshold: f64) -> bool {
        self.p_value > threshold || self.corrected_magnitude < 0.0
    }
}

/// A candidate comparison the inference stage declined to test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkipEvent {
    pub source: UnitIndex,
    pub target: UnitIndex,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_round_trips_through_json() {
        let mut set = ConditioningSet::new();
        set.insert(
            12,
            ParentStats {
                selection_round: Some(1),
                transfer_entropy: Some(0.034),
                surrogate_mean: Some(0.002),
            },
        );
        set.insert(3, ParentStats::default());

        let artifact = ConditioningArtifact::new(Some(set));
        let json = serde_json::to_string(&artifact).unwrap();
        let back: ConditioningArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(back, artifact);
        assert_eq!(back.schema_version, CONDITIONING_SCHEMA_VERSION);
    }

    #[test]
    fn test_null_set_is_the_no_result_marker() {
        let json = r#"{"schema_version": 1, "conditioning_set": null}"#;
        let artifact: ConditioningArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.conditioning_set, None);
    }

    #[test]
    fn test_parent_stats_fields_default_when_absent() {
        let json = r#"{"schema_version": 1, "conditioning_set": {"7": {}}}"#;
        let artifact: ConditioningArtifact = serde_json::from_str(json).unwrap();
        let set = artifact.conditioning_set.unwrap();
        assert_eq!(set[&7], ParentStats::default());
    }

    #[test]
    fn test_outcome_edge_contribution() {
        assert!(!ConditioningOutcome::Empty.contributes_edges());
        assert!(!ConditioningOutcome::Unreadable("eof".into()).contributes_edges());
        assert!(!ConditioningOutcome::Present(ConditioningSet::new()).contributes_edges());

        let mut set = ConditioningSet::new();
        set.insert(0, ParentStats::default());
        assert!(ConditioningOutcome::Present(set).contributes_edges());
    }

    #[test]
    fn test_significance_is_strict_at_the_threshold() {
        let mut record = PairwiseRecord {
            raw_magnitude: 0.1,
            corrected_magnitude: 0.08,
            p_value: 0.05,
            source_spike_count: 100.0,
            target_spike_count: 90.0,
            window_length_secs: 600.0,
        };
        // Exactly at the threshold: not significant, but also not zeroed.
        assert!(!record.is_significant(SIGNIFICANCE_THRESHOLD));
        assert!(!record.is_zeroed(SIGNIFICANCE_THRESHOLD));

        record.p_value = 0.049;
        assert!(record.is_significant(SIGNIFICANCE_THRESHOLD));

        record.p_value = 0.051;
        assert!(record.is_zeroed(SIGNIFICANCE_THRESHOLD));
    }

    #[test]
    fn test_negative_corrected_magnitude_is_zeroed_even_when_significant() {
        let record = PairwiseRecord {
            raw_magnitude: 0.02,
            corrected_magnitude: -0.01,
            p_value: 0.001,
            source_spike_count: 10.0,
            target_spike_count: 10.0,
            window_length_secs: 600.0,
        };
        assert!(record.is_significant(SIGNIFICANCE_THRESHOLD));
        assert!(record.is_zeroed(SIGNIFICANCE_THRESHOLD));
    }
}
