/*!
Layer tags and layer schemes.

A recorded unit belongs to exactly one anatomical layer, parsed from its
label. The active scheme fixes which layers participate in a run and gives
every layer a stable matrix row/column.
*/

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::{TenetError, TenetResult};

/// Anatomical grouping of a recorded unit.
///
/// The declaration order is the canonical matrix order. Matrix rows and
/// columns are assigned by position in this enum, so reordering variants
/// would silently scramble every aggregated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayerTag {
    L23,
    L4,
    L5,
    L6,
    ThalamusCore,
    ThalamusShell,
}

impl LayerTag {
    /// Every tag, in canonical matrix order.
    pub const CANONICAL_ORDER: [LayerTag; 6] = [
        LayerTag::L23,
        LayerTag::L4,
        LayerTag::L5,
        LayerTag::L6,
        LayerTag::ThalamusCore,
        LayerTag::ThalamusShell,
    ];

    /// Parses the layer token of a unit label, i.e. the second
    /// underscore-separated field of a label like `exc_23_0041`.
    pub fn from_label_token(token: &str) -> Option<LayerTag> {
        match token {
            "23" => Some(LayerTag::L23),
            "4" => Some(LayerTag::L4),
            "5" => Some(LayerTag::L5),
            "6" => Some(LayerTag::L6),
            "co" => Some(LayerTag::ThalamusCore),
            "sh" => Some(LayerTag::ThalamusShell),
            _ => None,
        }
    }

    /// The label token this tag was parsed from.
    pub fn label_token(&self) -> &'static str {
        match self {
            LayerTag::L23 => "23",
            LayerTag::L4 => "4",
            LayerTag::L5 => "5",
            LayerTag::L6 => "6",
            LayerTag::ThalamusCore => "co",
            LayerTag::ThalamusShell => "sh",
        }
    }

    /// Human-readable name, used in pairwise table filenames and the
    /// summary table.
    pub fn display_name(&self) -> &'static str {
        match self {
            LayerTag::L23 => "Layer 23",
            LayerTag::L4 => "Layer 4",
            LayerTag::L5 => "Layer 5",
            LayerTag::L6 => "Layer 6",
            LayerTag::ThalamusCore => "Thalamus co",
            LayerTag::ThalamusShell => "Thalamus sh",
        }
    }

    /// Inverse of [`display_name`](Self::display_name).
    pub fn from_display_name(name: &str) -> Option<LayerTag> {
        LayerTag::CANONICAL_ORDER
            .iter()
            .copied()
            .find(|tag| tag.display_name() == name)
    }

    pub fn is_thalamic(&self) -> bool {
        matches!(self, LayerTag::ThalamusCore | LayerTag::ThalamusShell)
    }

    /// Position of this tag in the canonical order.
    pub fn canonical_index(&self) -> usize {
        *self as usize
    }
}

impl Display for LayerTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The set of layers a run aggregates over.
///
/// Fixes the matrix dimension and the tag-to-index assignment for every
/// matrix produced in that run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerScheme {
    /// Cortical probes: layers 23, 4, 5 and 6.
    Cortical,
    /// Probes that also reach thalamus: the four cortical layers plus
    /// thalamus core and shell.
    CorticalThalamic,
}

impl LayerScheme {
    /// The participating tags, in canonical matrix order.
    pub fn tags(&self) -> &'static [LayerTag] {
        match self {
            LayerScheme::Cortical => &LayerTag::CANONICAL_ORDER[..4],
            LayerScheme::CorticalThalamic => &LayerTag::CANONICAL_ORDER[..],
        }
    }

    /// Matrix dimension of this scheme.
    pub fn layer_count(&self) -> usize {
        self.tags().len()
    }

    pub fn contains(&self, tag: LayerTag) -> bool {
        tag.canonical_index() < self.layer_count()
    }

    /// Row/column index of `tag` within this scheme.
    pub fn index_of(&self, tag: LayerTag) -> Option<usize> {
        if self.contains(tag) {
            Some(tag.canonical_index())
        } else {
            None
        }
    }

    /// Like [`index_of`](Self::index_of) but fails loudly, for call sites
    /// where an out-of-scheme tag means corrupt inputs.
    pub fn require_index(&self, tag: LayerTag) -> TenetResult<usize> {
        self.index_of(tag).ok_or_else(|| TenetError::LayerNotInScheme {
            layer: tag.to_string(),
            scheme: self.name().to_string(),
        })
    }

    /// Tag sitting at matrix index `index`, if any.
    pub fn tag_at(&self, index: usize) -> Option<LayerTag> {
        self.tags().get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            LayerScheme::Cortical => "cortical",
            LayerScheme::CorticalThalamic => "cortical-thalamic",
        }
    }

    /// Parses a scheme name as written in configuration files. Accepts the
    /// underscore spelling as well.
    pub fn from_name(name: &str) -> Option<LayerScheme> {
        match name {
            "cortical" => Some(LayerScheme::Cortical),
            "cortical-thalamic" | "cortical_thalamic" => Some(LayerScheme::CorticalThalamic),
            _ => None,
        }
    }
}

impl Display for LayerScheme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
