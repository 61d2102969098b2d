//! Search items and their regions
//!
//! A search item (added from the embedded search surface) carries regions:
//! verse ranges of one verse-group plus the matched words inside them. The
//! item list keeps insertion order, which is also display order and the
//! color-cycle index used by the overlay.

pub mod overlay;
pub mod payload;

use serde::{Deserialize, Serialize};

use crate::models::WordCoord;
use crate::stats::StatsRow;

pub use overlay::{membership, region_anchors, RegionOverlay, REGION_CLASS};
pub use payload::{
    parse_distance, payload_for_root_with_lemma, search_details_for_root, SearchItemPayload,
};

/// One highlighted range of a search result
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Verse-group the region lives in
    #[serde(alias = "sura", alias = "verse")]
    pub group: u32,
    #[serde(alias = "startAyah")]
    pub start_verse: u32,
    #[serde(alias = "endAyah")]
    pub end_verse: u32,
    #[serde(default)]
    pub matches: Vec<WordCoord>,
}

impl Region {
    /// Closed interval of highlighted coordinates
    ///
    /// Runs from the first matched word of `start_verse` (word 1 when the
    /// start verse has no match) to the last matched word of `end_verse`
    /// (end of verse when it has none). Words between matches are covered
    /// too, so a phrase highlights as one band.
    pub fn span(&self) -> (WordCoord, WordCoord) {
        let first = self
            .matches
            .iter()
            .filter(|m| m.verse == self.start_verse)
            .map(|m| m.word)
            .min()
            .unwrap_or(1);
        let last = self
            .matches
            .iter()
            .filter(|m| m.verse == self.end_verse)
            .map(|m| m.word)
            .max()
            .unwrap_or(u32::MAX);
        (
            WordCoord::new(self.start_verse, first),
            WordCoord::new(self.end_verse, last),
        )
    }

    pub fn contains(&self, coord: WordCoord) -> bool {
        let (lo, hi) = self.span();
        lo <= coord && coord <= hi
    }
}

/// A search term as shown in the item chip
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SearchTerm {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// A validated search item
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchItemEntry {
    pub display: String,
    pub items: Vec<SearchTerm>,
    /// Same length as `items`
    pub item_checked_state: Vec<bool>,
    pub distance: u32,
    pub cross_group: bool,
    pub stats_rows: Vec<StatsRow>,
    pub search_details: Option<String>,
    pub regions: Vec<Region>,
    pub root: Option<String>,
    pub lemma: Option<String>,
    /// Groups the stats were computed over; empty means the whole corpus
    pub stats_scope: Vec<u32>,
}

impl SearchItemEntry {
    /// Identity used for duplicate suppression
    pub fn root_lemma(&self) -> Option<(Option<&str>, Option<&str>)> {
        if self.root.is_none() && self.lemma.is_none() {
            return None;
        }
        Some((self.root.as_deref(), self.lemma.as_deref()))
    }

    /// Regions that live in `group`
    pub fn regions_in(&self, group: u32) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(move |r| r.group == group)
    }
}

/// Search items in insertion order
#[derive(Debug, Clone, Default)]
pub struct SearchItemList {
    entries: Vec<SearchItemEntry>,
}

impl SearchItemList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, returning its index
    ///
    /// With `prevent_duplicate`, nothing is added when an entry with the same
    /// (root, lemma) pair exists.
    pub fn add(&mut self, entry: SearchItemEntry, prevent_duplicate: bool) -> Option<usize> {
        if prevent_duplicate {
            if let Some(key) = entry.root_lemma() {
                if self.entries.iter().any(|e| e.root_lemma() == Some(key)) {
                    log::debug!("search item '{}' already present, skipped", entry.display);
                    return None;
                }
            }
        }
        self.entries.push(entry);
        Some(self.entries.len() - 1)
    }

    pub fn remove(&mut self, index: usize) -> Option<SearchItemEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, index: usize) -> Option<&SearchItemEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[SearchItemEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
