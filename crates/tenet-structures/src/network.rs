/*!
The reconstructed effective network.

Edges are stored exactly as recovered from the conditioning sets: no
deduplication, self-loops allowed. Degree vectors are accumulated while
scanning and read-only afterwards.
*/

use crate::labels::UnitIndex;

/// One directed edge, parent to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: UnitIndex,
    pub target: UnitIndex,
    /// True when source and target sit in different layers.
    pub crosses_layers: bool,
}

/// Directed multigraph over all units of one run.
///
/// Callers must only pass unit indices that are valid for the label table
/// the network was sized from; the assembler checks this before inserting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectiveNetwork {
    edges: Vec<Edge>,
    in_degree: Vec<usize>,
    out_degree: Vec<usize>,
}

impl EffectiveNetwork {
    /// An edgeless network over `unit_count` units.
    pub fn new(unit_count: usize) -> EffectiveNetwork {
        EffectiveNetwork {
            edges: Vec::new(),
            in_degree: vec![0; unit_count],
            out_degree: vec![0; unit_count],
        }
    }

    pub fn unit_count(&self) -> usize {
        self.in_degree.len()
    }

    /// Inserts an edge and bumps the source's out-degree, keeping
    /// `sum(out_degree) == edge_count` by construction.
    pub fn add_edge(&mut self, edge: Edge) {
        self.out_degree[edge.source] += 1;
        self.edges.push(edge);
    }

    /// Credits a target with the size of one conditioning set. Called once
    /// per scanned artifact, so `sum(in_degree)` stays equal to
    /// `sum(out_degree)` even if a target shows up twice.
    pub fn record_in_degree(&mut self, target: UnitIndex, parent_count: usize) {
        self.in_degree[target] += parent_count;
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn in_degree(&self) -> &[usize] {
        &self.in_degree
    }

    pub fn out_degree(&self) -> &[usize] {
        &self.out_degree
    }

    pub fn in_layer_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|edge| !edge.crosses_layers)
    }

    pub fn cross_layer_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|edge| edge.crosses_layers)
    }

    /// Units with neither incoming nor outgoing edges.
    pub fn isolated_units(&self) -> impl Iterator<Item = UnitIndex> + '_ {
        (0..self.unit_count())
            .filter(|&unit| self.in_degree[unit] == 0 && self.out_degree[unit] == 0)
    }
}
