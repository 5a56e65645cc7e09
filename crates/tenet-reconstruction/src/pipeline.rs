// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
End-to-end reconstruction pipeline.

Wires the parsing stages together for one configured run: label table,
per-target artifacts, skip logs and pairwise tables in, one
[`AnalysisReport`] out. Every non-fatal anomaly met on the way is logged
and kept on the report.
*/

use std::time::Instant;

use tracing::{info, warn};

use tenet_config::TenetConfig;
use tenet_structures::{
    AnalysisWarning, ConditioningOutcome, EffectiveNetwork, LabelTable, LayerMatrix,
    LayerScheme, TenetError, TenetResult, UnitIndex,
};

use crate::aggregator::{
    aggregate_pairwise, degree_summaries, edge_count_matrix, edge_proportion_matrix,
    possible_links_matrix, LayerDegreeSummary, PairwiseAggregate,
};
use crate::assembler::build_network;
use crate::conditioning::scan_repeat_dir;
use crate::pairwise::{load_pair_tables, parse_summary_table};
use crate::skiplog::{InferenceLogDir, SkipEventSource};

/// How the scanned artifacts of a repeat broke down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtifactTally {
    pub scanned: usize,
    pub present: usize,
    pub empty: usize,
    pub unreadable: usize,
}

impl ArtifactTally {
    fn from_outcomes(outcomes: &[(UnitIndex, ConditioningOutcome)]) -> ArtifactTally {
        let mut tally = ArtifactTally::default();
        for (_, outcome) in outcomes {
            tally.scanned += 1;
            match outcome {
                ConditioningOutcome::Present(_) => tally.present += 1,
                ConditioningOutcome::Empty => tally.empty += 1,
                ConditioningOutcome::Unreadable(_) => tally.unreadable += 1,
            }
        }
        tally
    }
}

/// The reconstructed network with its layer-level aggregates.
#[derive(Debug, Clone)]
pub struct NetworkReport {
    pub scheme: LayerScheme,
    pub network: EffectiveNetwork,
    pub edge_counts: LayerMatrix,
    pub possible_links: LayerMatrix,
    pub edge_proportion: LayerMatrix,
    pub degree_summaries: Vec<LayerDegreeSummary>,
    pub tally: ArtifactTally,
    pub warnings: Vec<AnalysisWarning>,
}

/// Both halves of one run.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub network: NetworkReport,
    pub pairwise: PairwiseAggregate,
}

/// Resolves the configured scheme name against the label table. `auto`
/// infers from the labels; a named scheme must still cover every label.
pub fn resolve_scheme(config: &TenetConfig, labels: &LabelTable) -> TenetResult<LayerScheme> {
    let scheme = match config.run.layer_scheme.as_str() {
        "auto" => labels.infer_scheme(),
        name => LayerScheme::from_name(name)
            .ok_or_else(|| TenetError::Config(format!("unknown layer scheme '{}'", name)))?,
    };
    labels.validate_scheme(scheme)?;
    Ok(scheme)
}

/// Reconstructs the effective network of the configured repeat and
/// aggregates it per layer pair.
pub fn reconstruct_network(
    config: &TenetConfig,
    labels: &LabelTable,
    scheme: LayerScheme,
    skip_source: &dyn SkipEventSource,
) -> TenetResult<NetworkReport> {
    let start = Instant::now();
    let repeat_dir = config.repeat_dir();
    let scan = scan_repeat_dir(&repeat_dir, config.analysis.parallel)?;
    if scan.outcomes.is_empty() {
        warn!(
            target: "tenet-reconstruction",
            "No conditioning artifacts under {}; the network will be empty",
            repeat_dir.display()
        );
    }
    let tally = ArtifactTally::from_outcomes(&scan.outcomes);
    let network = build_network(labels, &scan.outcomes)?;

    let skips = skip_source.load_skip_events()?;
    let (possible_links, link_warnings) = possible_links_matrix(labels, scheme, &skips)?;
    let edge_counts = edge_count_matrix(labels, scheme, &network)?;
    let edge_proportion = edge_proportion_matrix(&edge_counts, &possible_links)?;
    let summaries = degree_summaries(labels, scheme, &network)?;

    let mut warnings = scan.warnings;
    warnings.extend(link_warnings);
    for warning in &warnings {
        warn!(target: "tenet-reconstruction", "{}", warning);
    }

    info!(
        target: "tenet-reconstruction",
        "🧠 Reconstructed effective network: {} edges over {} units ({} artifacts) in {:?}",
        network.edge_count(),
        network.unit_count(),
        tally.scanned,
        start.elapsed()
    );
    info!(
        target: "tenet-reconstruction",
        "🔗 {} comparisons skipped during inference",
        skips.len()
    );

    Ok(NetworkReport {
        scheme,
        network,
        edge_counts,
        possible_links,
        edge_proportion,
        degree_summaries: summaries,
        tally,
        warnings,
    })
}

/// Loads and aggregates the pairwise tables of the configured subject.
pub fn aggregate_pairwise_tables(
    config: &TenetConfig,
    scheme: LayerScheme,
) -> TenetResult<PairwiseAggregate> {
    let start = Instant::now();
    let results_dir = config.subject_results_dir();
    let summary = parse_summary_table(&config.summary_path(), scheme)?;
    let tables = load_pair_tables(&results_dir, scheme)?;
    if tables.is_empty() {
        warn!(
            target: "tenet-reconstruction",
            "No pairwise tables under {}",
            results_dir.display()
        );
    }

    let aggregate =
        aggregate_pairwise(&tables, &summary, config.analysis.significance_threshold)?;
    for warning in &aggregate.warnings {
        warn!(target: "tenet-reconstruction", "{}", warning);
    }

    info!(
        target: "tenet-reconstruction",
        "📊 Aggregated {} pairwise records from {} tables in {:?}",
        tables.record_count(),
        tables.tables().len(),
        start.elapsed()
    );
    Ok(aggregate)
}

/// Runs both halves of the analysis for one configured run.
///
/// The label table and the summary table are hard requirements; a missing
/// artifact or log directory only empties the corresponding outputs.
pub fn run_full_analysis(config: &TenetConfig) -> TenetResult<AnalysisReport> {
    let labels = LabelTable::load(&config.labels_path())?;
    let scheme = resolve_scheme(config, &labels)?;
    info!(
        target: "tenet-reconstruction",
        "Subject {}, repeat {}: {} units, {} scheme",
        config.run.subject,
        config.run.repeat,
        labels.unit_count(),
        scheme
    );

    let skip_source = InferenceLogDir::new(config.logs_dir(), config.analysis.parallel);
    let network = reconstruct_network(config, &labels, scheme, &skip_source)?;
    let pairwise = aggregate_pairwise_tables(config, scheme)?;
    Ok(AnalysisReport { network, pairwise })
}
