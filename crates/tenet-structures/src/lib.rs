//! The core crate for tenet. Defines the data structures shared by the
//! reconstruction pipeline and everything downstream of it.

mod error;
pub mod labels;
pub mod layers;
pub mod matrix;
pub mod network;
pub mod records;

pub use error::{AnalysisWarning, TenetError, TenetResult};
pub use labels::{LabelTable, UnitIndex, UnitLabel};
pub use layers::{LayerScheme, LayerTag};
pub use matrix::{round_to, LayerMatrix};
pub use network::{Edge, EffectiveNetwork};
pub use records::{
    ConditioningArtifact, ConditioningOutcome, ConditioningSet, PairwiseRecord, ParentStats,
    SkipEvent, CONDITIONING_SCHEMA_VERSION, SIGNIFICANCE_THRESHOLD,
};
