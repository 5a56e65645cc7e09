/*!
# Tenet Reconstruction

Rebuilds the directed effective network selected by a transfer-entropy
inference run from its on-disk outputs, then collapses it into
layer-by-layer aggregates.

## Inputs

- per-target conditioning-set artifacts (`*.json`) under the repeat
  directory
- per-target inference logs (`*.log`) carrying skip notices
- pairwise tables (`<Source>_to_<Target>.csv`) and the pairwise summary
  table under the subject's result directory
- the subject's label table, which fixes every unit index

## Outputs

An [`AnalysisReport`]: the unit-level network with degrees, plus matrices
of edge counts, possible links, proportions, significance counts and mean
transfer magnitudes per layer pair.

Copyright 2025 Neuraville Inc.
Licensed under the Apache License, Version 2.0
*/

pub mod aggregator;
pub mod assembler;
pub mod conditioning;
pub mod pairwise;
pub mod pipeline;
pub mod skiplog;

pub use aggregator::{
    aggregate_pairwise, degree_summaries, edge_count_matrix, edge_proportion_matrix,
    possible_links_matrix, LayerDegreeSummary, PairwiseAggregate,
};
pub use assembler::build_network;
pub use conditioning::{parse_artifact, scan_repeat_dir, ArtifactScan};
pub use pairwise::{
    load_pair_tables, parse_pair_table, parse_summary_table, PairTable, PairTableSet,
};
pub use pipeline::{
    aggregate_pairwise_tables, reconstruct_network, resolve_scheme, run_full_analysis,
    AnalysisReport, ArtifactTally, NetworkReport,
};
pub use skiplog::{parse_log, InferenceLogDir, SkipEventSource};
