//! Shared types for the WASM API
//!
//! Serializable shapes for results whose core types carry data the glue
//! does not need (or cannot take as-is).

use serde::{Deserialize, Serialize};

use crate::highlight::Selection;
use crate::models::{ScrollRequest, StylePatch, WordCoord};
use crate::tokenize::{DocNode, Tokenized};

/// Result of tagging a verse-group tree
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TokenizeResult {
    pub root: DocNode,
    pub created: Vec<WordCoord>,
    /// Verse the tokenizer ended in
    pub last_verse: u32,
}

impl From<Tokenized> for TokenizeResult {
    fn from(t: Tokenized) -> Self {
        Self {
            last_verse: t.state.verse,
            root: t.root,
            created: t.created,
        }
    }
}

/// Result of moving the selection cursor
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResult {
    pub coord: WordCoord,
    pub patch: StylePatch,
    pub scroll: Option<ScrollRequest>,
}

impl From<Selection> for SelectionResult {
    fn from(s: Selection) -> Self {
        Self {
            coord: s.coord,
            patch: s.patch,
            scroll: s.scroll,
        }
    }
}

/// One bar of a frequency chart
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub root: String,
    pub value: f64,
}
