/*!
Network assembly.

Turns the per-target conditioning outcomes of a scan into one directed
[`EffectiveNetwork`]: an edge per selected parent, classified as in-layer
or cross-layer against the label table.
*/

use tracing::debug;

use tenet_structures::{
    ConditioningOutcome, Edge, EffectiveNetwork, LabelTable, TenetResult, UnitIndex,
};

/// Builds the effective network from per-target conditioning outcomes.
///
/// Every target is validated against the label table even when its outcome
/// contributes nothing: a target index past the table means the artifacts
/// belong to a different recording, and no output built on them can be
/// trusted. Duplicate targets are not collapsed here; each outcome
/// contributes its own parents.
pub fn build_network(
    labels: &LabelTable,
    outcomes: &[(UnitIndex, ConditioningOutcome)],
) -> TenetResult<EffectiveNetwork> {
    let mut network = EffectiveNetwork::new(labels.unit_count());
    for (target, outcome) in outcomes {
        let target_layer = labels.layer_of(*target)?;
        let set = match outcome.parents() {
            Some(set) => set,
            None => continue,
        };
        network.record_in_degree(*target, set.len());
        for parent in set.keys() {
            let parent_layer = labels.layer_of(*parent)?;
            network.add_edge(Edge {
                source: *parent,
                target: *target,
                crosses_layers: parent_layer != target_layer,
            });
        }
    }
    debug!(
        target: "tenet-reconstruction",
        "Assembled network: {} edges over {} units",
        network.edge_count(),
        network.unit_count()
    );
    Ok(network)
}
