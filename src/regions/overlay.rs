//! Search-region overlay
//!
//! Each tagged word gets one inset box-shadow stratum per search item whose
//! regions cover it. The k-th covering item (in list order) draws a band of
//! `(k + 1) * band` pixels, so overlapping items stay distinguishable.

use std::collections::{BTreeMap, BTreeSet};

use super::SearchItemEntry;
use crate::highlight::contrast_boost;
use crate::models::{StyleOp, StylePatch, ViewerConfig, WordCoord};

/// Class on every word covered by at least one region
pub const REGION_CLASS: &str = "search-region";

/// Covering item indices per word, for words covered at least once
///
/// Only regions of `group` take part. `words` are the coordinates the
/// tokenizer produced.
pub fn membership(
    entries: &[SearchItemEntry],
    group: u32,
    words: &[WordCoord],
) -> BTreeMap<WordCoord, Vec<usize>> {
    let mut out: BTreeMap<WordCoord, Vec<usize>> = BTreeMap::new();
    for (i, entry) in entries.iter().enumerate() {
        let spans: Vec<_> = entry.regions_in(group).map(|r| r.span()).collect();
        if spans.is_empty() {
            continue;
        }
        for &word in words {
            if spans.iter().any(|(lo, hi)| *lo <= word && word <= *hi) {
                let indices = out.entry(word).or_default();
                if indices.last() != Some(&i) {
                    indices.push(i);
                }
            }
        }
    }
    out
}

/// First covered word of each region of `entry`, ascending and deduplicated
pub fn region_anchors(entry: &SearchItemEntry, group: u32, words: &[WordCoord]) -> Vec<WordCoord> {
    let anchors: BTreeSet<WordCoord> = entry
        .regions_in(group)
        .filter_map(|region| {
            let (lo, hi) = region.span();
            words.iter().copied().filter(|w| lo <= *w && *w <= hi).min()
        })
        .collect();
    anchors.into_iter().collect()
}

pub struct RegionOverlay {
    band_px: f32,
    palette: Vec<String>,
    applied: BTreeSet<WordCoord>,
}

impl RegionOverlay {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            band_px: config.overlay_band_px,
            palette: config.palette.clone(),
            applied: BTreeSet::new(),
        }
    }

    /// Stratum color of the item at `index`
    pub fn color_for(&self, index: usize) -> String {
        match self.palette.len() {
            0 => "#888888".to_string(),
            n => contrast_boost(&self.palette[index % n]),
        }
    }

    /// CSS `box-shadow` value for a word covered by `indices`
    pub fn shadow_for(&self, indices: &[usize]) -> String {
        indices
            .iter()
            .enumerate()
            .map(|(k, &i)| {
                format!(
                    "inset 0 0 0 {}px {}",
                    (k as f32 + 1.0) * self.band_px,
                    self.color_for(i)
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Words currently carrying overlay styling
    pub fn applied(&self) -> &BTreeSet<WordCoord> {
        &self.applied
    }

    /// Remove every stratum applied so far
    pub fn clear(&mut self) -> StylePatch {
        let mut patch = StylePatch::new();
        for coord in std::mem::take(&mut self.applied) {
            patch.text(coord, StyleOp::ClearBoxShadow);
            patch.text(coord, StyleOp::RemoveClass(REGION_CLASS.to_string()));
        }
        patch
    }

    /// Recompute the overlay for `entries`
    ///
    /// Starts with a full clear, so words no longer covered lose their
    /// strata.
    pub fn apply(&mut self, entries: &[SearchItemEntry], group: u32, words: &[WordCoord]) -> StylePatch {
        let mut patch = self.clear();
        let covered = membership(entries, group, words);

        for (coord, indices) in &covered {
            patch.text(*coord, StyleOp::AddClass(REGION_CLASS.to_string()));
            patch.text(*coord, StyleOp::SetBoxShadow(self.shadow_for(indices)));
            self.applied.insert(*coord);
        }

        log::debug!(
            "region overlay: {} items, {} words covered",
            entries.len(),
            covered.len()
        );
        patch
    }
}
