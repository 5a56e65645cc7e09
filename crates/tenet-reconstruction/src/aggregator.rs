/*!
Layer-level aggregation.

Collapses the unit-level network and the pairwise tables into layer-by-layer
matrices and per-layer degree summaries. Zeroing of non-significant
transfers happens here, after parsing and before any mean is formed.
*/

use std::path::Path;

use tenet_structures::{
    round_to, AnalysisWarning, EffectiveNetwork, LabelTable, LayerMatrix, LayerScheme,
    LayerTag, PairwiseRecord, SkipEvent, TenetError, TenetResult,
};

use crate::pairwise::PairTableSet;

/// Decimal places of the proportion matrices.
pub const PROPORTION_DECIMALS: u32 = 2;
/// Decimal places of the mean transfer-rate matrix.
pub const RATE_DECIMALS: u32 = 2;
/// Decimal places of the mean per-source-spike matrix.
pub const PER_SOURCE_SPIKE_DECIMALS: u32 = 3;
/// Decimal places of the mean per-target-spike matrix.
pub const PER_TARGET_SPIKE_DECIMALS: u32 = 2;
/// Decimal places of the per-layer in/out degree ratio.
pub const DEGREE_RATIO_DECIMALS: u32 = 2;

/// Realized directed edges per layer pair.
pub fn edge_count_matrix(
    labels: &LabelTable,
    scheme: LayerScheme,
    network: &EffectiveNetwork,
) -> TenetResult<LayerMatrix> {
    let mut matrix = LayerMatrix::zeros(scheme);
    for edge in network.edges() {
        let source = labels.layer_of(edge.source)?;
        let target = labels.layer_of(edge.target)?;
        matrix.add(source, target, 1.0)?;
    }
    Ok(matrix)
}

/// Candidate comparisons per layer pair: both directions of every unit
/// pairing of the two layers, minus the comparisons the inference stage
/// skipped.
///
/// A cell can come out negative when the skip log does not belong to the
/// label table; the value is kept as evidence and flagged.
pub fn possible_links_matrix(
    labels: &LabelTable,
    scheme: LayerScheme,
    skips: &[SkipEvent],
) -> TenetResult<(LayerMatrix, Vec<AnalysisWarning>)> {
    let mut matrix = LayerMatrix::zeros(scheme);
    for &source in scheme.tags() {
        for &target in scheme.tags() {
            let candidates =
                2.0 * labels.units_in(source) as f64 * labels.units_in(target) as f64;
            matrix.set(source, target, candidates)?;
        }
    }
    for event in skips {
        let source = labels.layer_of(event.source)?;
        let target = labels.layer_of(event.target)?;
        matrix.add(source, target, -1.0)?;
    }

    let mut warnings = Vec::new();
    for &source in scheme.tags() {
        for &target in scheme.tags() {
            let value = matrix.get(source, target)?;
            if value < 0.0 {
                warnings.push(AnalysisWarning::NegativePossibleLinks {
                    source,
                    target,
                    value,
                });
            }
        }
    }
    Ok((matrix, warnings))
}

/// Proportion of realized to possible links per layer pair.
pub fn edge_proportion_matrix(
    edge_counts: &LayerMatrix,
    possible_links: &LayerMatrix,
) -> TenetResult<LayerMatrix> {
    edge_counts.ratio_rounded(possible_links, PROPORTION_DECIMALS)
}

/// Summed degrees of one layer's units.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDegreeSummary {
    pub layer: LayerTag,
    pub in_degree_sum: usize,
    pub out_degree_sum: usize,
    /// in/out ratio rounded to [`DEGREE_RATIO_DECIMALS`]; NaN when the
    /// layer has no outgoing edges.
    pub in_out_ratio: f64,
}

/// Per-layer degree sums and their in/out ratio, in canonical layer order.
pub fn degree_summaries(
    labels: &LabelTable,
    scheme: LayerScheme,
    network: &EffectiveNetwork,
) -> TenetResult<Vec<LayerDegreeSummary>> {
    let mut in_sums = vec![0usize; scheme.layer_count()];
    let mut out_sums = vec![0usize; scheme.layer_count()];
    for unit in 0..network.unit_count() {
        let index = scheme.require_index(labels.layer_of(unit)?)?;
        in_sums[index] += network.in_degree()[unit];
        out_sums[index] += network.out_degree()[unit];
    }
    Ok(scheme
        .tags()
        .iter()
        .enumerate()
        .map(|(i, &layer)| LayerDegreeSummary {
            layer,
            in_degree_sum: in_sums[i],
            out_degree_sum: out_sums[i],
            in_out_ratio: if out_sums[i] == 0 {
                f64::NAN
            } else {
                round_to(in_sums[i] as f64 / out_sums[i] as f64, DEGREE_RATIO_DECIMALS)
            },
        })
        .collect())
}

/// Everything the pairwise tables aggregate into.
#[derive(Debug, Clone)]
pub struct PairwiseAggregate {
    /// Rows per pair table; the denominator of every mean below.
    pub tested_counts: LayerMatrix,
    /// Significant-comparison counts from the summary table.
    pub significant_counts: LayerMatrix,
    /// significant / tested.
    pub significant_proportion: LayerMatrix,
    /// Mean corrected transfer rate over tested comparisons.
    pub mean_rate: LayerMatrix,
    /// Mean raw transfer per source spike over tested comparisons.
    pub mean_per_source_spike: LayerMatrix,
    /// Mean raw transfer per target spike over tested comparisons.
    pub mean_per_target_spike: LayerMatrix,
    /// Mean observation window over every tested comparison, in seconds.
    /// NaN when nothing was tested.
    pub mean_window_secs: f64,
    pub warnings: Vec<AnalysisWarning>,
}

impl PairwiseAggregate {
    /// [`mean_window_secs`](Self::mean_window_secs) in minutes, the unit
    /// run summaries quote.
    pub fn mean_window_minutes(&self) -> f64 {
        self.mean_window_secs / 60.0
    }
}

/// Aggregates the pairwise tables into per-layer-pair means.
///
/// Zeroed records (failed test or negative corrected magnitude) stay in
/// the denominators and the window mean; only their magnitudes are
/// dropped. The transfer rate averages the corrected magnitude while the
/// per-spike means scale the raw magnitude, keeping the conventions the
/// tables were produced under.
pub fn aggregate_pairwise(
    tables: &PairTableSet,
    significant_counts: &LayerMatrix,
    significance_threshold: f64,
) -> TenetResult<PairwiseAggregate> {
    let scheme = tables.scheme();
    if significant_counts.scheme() != scheme {
        return Err(TenetError::SchemeMismatch {
            left: significant_counts.scheme().to_string(),
            right: scheme.to_string(),
        });
    }

    let mut tested = LayerMatrix::zeros(scheme);
    let mut rate_sums = LayerMatrix::zeros(scheme);
    let mut per_source_sums = LayerMatrix::zeros(scheme);
    let mut per_target_sums = LayerMatrix::zeros(scheme);
    let mut window_total = 0.0;
    let mut warnings = Vec::new();

    for table in tables.tables() {
        tested.add(table.source, table.target, table.records.len() as f64)?;
        for (i, record) in table.records.iter().enumerate() {
            let line = i + 1;
            require_spike_counts(record, &table.path, line)?;
            window_total += record.window_length_secs;

            if record.is_significant(significance_threshold)
                && record.corrected_magnitude < 0.0
            {
                warnings.push(AnalysisWarning::NegativeSignificantTransfer {
                    path: table.path.clone(),
                    line,
                    corrected_magnitude: record.corrected_magnitude,
                    p_value: record.p_value,
                });
            }
            if record.is_zeroed(significance_threshold) {
                continue;
            }

            rate_sums.add(table.source, table.target, record.corrected_magnitude)?;
            per_source_sums.add(
                table.source,
                table.target,
                per_spike(record, record.source_spike_count),
            )?;
            per_target_sums.add(
                table.source,
                table.target,
                per_spike(record, record.target_spike_count),
            )?;
        }
    }

    let total_tested = tested.sum();
    let mean_window_secs = if total_tested == 0.0 {
        f64::NAN
    } else {
        window_total / total_tested
    };

    let significant_proportion =
        significant_counts.ratio_rounded(&tested, PROPORTION_DECIMALS)?;
    let mean_rate = rate_sums.ratio_rounded(&tested, RATE_DECIMALS)?;
    let mean_per_source_spike =
        per_source_sums.ratio_rounded(&tested, PER_SOURCE_SPIKE_DECIMALS)?;
    let mean_per_target_spike =
        per_target_sums.ratio_rounded(&tested, PER_TARGET_SPIKE_DECIMALS)?;

    Ok(PairwiseAggregate {
        tested_counts: tested,
        significant_counts: significant_counts.clone(),
        significant_proportion,
        mean_rate,
        mean_per_source_spike,
        mean_per_target_spike,
        mean_window_secs,
        warnings,
    })
}

/// Raw magnitude normalized per spike: scaled back up over the window,
/// divided by the spike count.
fn per_spike(record: &PairwiseRecord, spikes: f64) -> f64 {
    record.raw_magnitude * record.window_length_secs / spikes
}

fn require_spike_counts(record: &PairwiseRecord, path: &Path, line: usize) -> TenetResult<()> {
    if record.source_spike_count == 0.0 || record.target_spike_count == 0.0 {
        return Err(TenetError::MalformedRecord {
            path: path.to_path_buf(),
            line,
            reason: "zero spike count; per-spike magnitudes are undefined".to_string(),
        });
    }
    Ok(())
}
