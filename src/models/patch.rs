//! Style patches returned to the DOM glue
//!
//! The DOM is owned by JavaScript. Operations that change presentation
//! return a `StylePatch`: an ordered list of operations addressed by word
//! coordinate. JS applies them in order to every element carrying that
//! coordinate (`.morph-word` in the text, `.minimap-word` in the minimap).

use serde::{Deserialize, Serialize};

use super::core::WordCoord;

/// Which rendering of a word an operation addresses
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum StyleTarget {
    Text,
    Minimap,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "op", content = "value", rename_all = "camelCase")]
pub enum StyleOp {
    SetBackground(String),
    ClearBackground,
    AddClass(String),
    RemoveClass(String),
    SetBoxShadow(String),
    ClearBoxShadow,
}

impl StyleOp {
    fn is_clear(&self) -> bool {
        matches!(
            self,
            StyleOp::ClearBackground | StyleOp::RemoveClass(_) | StyleOp::ClearBoxShadow
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StyleEdit {
    pub target: StyleTarget,
    pub coord: WordCoord,
    pub op: StyleOp,
}

/// Ordered list of style edits
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct StylePatch {
    pub edits: Vec<StyleEdit>,
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, target: StyleTarget, coord: WordCoord, op: StyleOp) {
        self.edits.push(StyleEdit { target, coord, op });
    }

    pub fn text(&mut self, coord: WordCoord, op: StyleOp) {
        self.push(StyleTarget::Text, coord, op);
    }

    pub fn minimap(&mut self, coord: WordCoord, op: StyleOp) {
        self.push(StyleTarget::Minimap, coord, op);
    }

    /// Append another patch after this one
    pub fn extend(&mut self, other: StylePatch) {
        self.edits.extend(other.edits);
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Index of the first applying (non-clearing) edit, if any
    pub fn first_apply_index(&self) -> Option<usize> {
        self.edits.iter().position(|e| !e.op.is_clear())
    }

    /// Index of the last clearing edit, if any
    pub fn last_clear_index(&self) -> Option<usize> {
        self.edits.iter().rposition(|e| e.op.is_clear())
    }

    /// Edits addressed to one coordinate and target
    pub fn edits_for(&self, target: StyleTarget, coord: WordCoord) -> impl Iterator<Item = &StyleOp> {
        self.edits
            .iter()
            .filter(move |e| e.target == target && e.coord == coord)
            .map(|e| &e.op)
    }
}
