/*!
The unit label table.

One label per line, and the line position *is* the unit index: every other
input of a run (conditioning sets, skip logs) refers to units by that
index, so the table is loaded once and treated as immutable afterwards.
*/

use std::fs;
use std::path::Path;

use crate::error::{TenetError, TenetResult};
use crate::layers::{LayerScheme, LayerTag};

/// Index of a recorded unit: its position in the label table.
pub type UnitIndex = usize;

/// One label table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitLabel {
    /// The label exactly as written, e.g. `exc_23_0041`.
    pub raw: String,
    /// Layer parsed from the label's second underscore field.
    pub layer: LayerTag,
}

/// Ordered unit-to-layer mapping for one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTable {
    labels: Vec<UnitLabel>,
}

impl LabelTable {
    /// Loads a label table from a text file, one label per line.
    ///
    /// Fails on the first malformed label. A blank line counts as
    /// malformed: silently dropping it would shift every later unit index.
    pub fn load(path: &Path) -> TenetResult<LabelTable> {
        let content = fs::read_to_string(path).map_err(|e| TenetError::from_io(path, e))?;
        LabelTable::from_lines(path, content.lines())
    }

    /// Parses already-read label lines. `path` is only used for error
    /// reporting.
    pub fn from_lines<'a>(
        path: &Path,
        lines: impl Iterator<Item = &'a str>,
    ) -> TenetResult<LabelTable> {
        let mut labels = Vec::new();
        for (i, line) in lines.enumerate() {
            let raw = line.trim();
            let layer = parse_layer_token(raw).ok_or_else(|| TenetError::MalformedLabel {
                path: path.to_path_buf(),
                line: i + 1,
                label: raw.to_string(),
            })?;
            labels.push(UnitLabel {
                raw: raw.to_string(),
                layer,
            });
        }
        Ok(LabelTable { labels })
    }

    /// Builds a table directly from parsed labels. Mostly useful in tests.
    pub fn from_labels(labels: Vec<UnitLabel>) -> LabelTable {
        LabelTable { labels }
    }

    /// Number of units in the run.
    pub fn unit_count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, unit: UnitIndex) -> Option<&UnitLabel> {
        self.labels.get(unit)
    }

    /// Layer of `unit`, failing if the index does not belong to this table.
    pub fn layer_of(&self, unit: UnitIndex) -> TenetResult<LayerTag> {
        self.labels
            .get(unit)
            .map(|label| label.layer)
            .ok_or(TenetError::UnknownUnit {
                unit,
                unit_count: self.labels.len(),
            })
    }

    /// Cheap containment check used by the parsers before handing indices on.
    pub fn contains(&self, unit: UnitIndex) -> bool {
        unit < self.labels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitIndex, &UnitLabel)> {
        self.labels.iter().enumerate()
    }

    /// Number of units belonging to `layer`.
    pub fn units_in(&self, layer: LayerTag) -> usize {
        self.labels
            .iter()
            .filter(|label| label.layer == layer)
            .count()
    }

    /// Picks the layer scheme implied by the labels themselves: thalamic
    /// labels promote the run to the cortical-thalamic scheme.
    pub fn infer_scheme(&self) -> LayerScheme {
        if self.labels.iter().any(|label| label.layer.is_thalamic()) {
            LayerScheme::CorticalThalamic
        } else {
            LayerScheme::Cortical
        }
    }

    /// Checks that every label's layer participates in `scheme`.
    pub fn validate_scheme(&self, scheme: LayerScheme) -> TenetResult<()> {
        for label in &self.labels {
            scheme.require_index(label.layer)?;
        }
        Ok(())
    }
}

fn parse_layer_token(label: &str) -> Option<LayerTag> {
    let token = label.split('_').nth(1)?;
    LayerTag::from_label_token(token)
}
