//! # Tenet - Transfer-Entropy Network Tools
//!
//! Tenet reconstructs the directed "effective network" selected by a
//! transfer-entropy inference run over spike recordings, and aggregates it
//! into layer-by-layer matrices. This umbrella crate re-exports all
//! components; each workspace member is also usable on its own.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! tenet = "0.1"
//! ```
//!
//! ```rust,no_run
//! use tenet::prelude::*;
//!
//! let mut config = TenetConfig::default();
//! config.run.subject = "m03".to_string();
//!
//! let report = run_full_analysis(&config)?;
//! println!("{} directed edges", report.network.network.edge_count());
//! println!("{}", report.network.edge_counts);
//! # Ok::<(), tenet::structures::TenetError>(())
//! ```
//!
//! ## Inputs
//!
//! One run reads, for a configured subject and inference repeat:
//!
//! - `{data}/{subject}/target_indices.txt` - the label table fixing every
//!   unit index
//! - `{results}/{subject}/effective_inference/repeat_{n}/*.json` -
//!   per-target conditioning-set artifacts
//! - `{results}/{subject}/effective_inference/repeat_{n}/logs/*.log` -
//!   inference logs carrying skip notices
//! - `{results}/{subject}/<Source>_to_<Target>.csv` plus
//!   `pairwise_summary.csv` - pairwise transfer tables
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: tenet-structures                           │
//! │  (labels, layers, network, matrices, errors)            │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Infrastructure: tenet-config, tenet-observability      │
//! │  (TOML + env + CLI configuration, tracing setup)        │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Analysis: tenet-reconstruction                         │
//! │  (artifact/table/log parsing, assembly, aggregation)    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use tenet_structures as structures;

// Re-export infrastructure
pub use tenet_config as config;
pub use tenet_observability as observability;

// Re-export analysis
pub use tenet_reconstruction as reconstruction;

/// Prelude - commonly used types and entry points
pub mod prelude {
    pub use crate::config::TenetConfig;
    pub use crate::reconstruction::pipeline::{
        run_full_analysis, AnalysisReport, NetworkReport,
    };
    pub use crate::reconstruction::PairwiseAggregate;
    pub use crate::structures::{
        EffectiveNetwork, LabelTable, LayerMatrix, LayerScheme, LayerTag, TenetError,
        TenetResult,
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_facade_imports() {
        // Just test that re-exports work
        use crate::prelude::*;
        let scheme = LayerScheme::Cortical;
        assert_eq!(scheme.layer_count(), 4);
        let _matrix = LayerMatrix::zeros(scheme);
    }
}
