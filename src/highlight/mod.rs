//! Root highlighting, hover and selection
//!
//! `HighlightManager` owns the mutable presentation state of the view:
//! pinned roots with their palette slot, the selection cursor and the
//! hovered coordinate. Every operation returns the `StylePatch` that brings
//! the DOM in line with the new state.

pub mod color;
pub mod selection;

use serde::{Deserialize, Serialize};

use crate::models::{
    Direction, MorphologyRecord, ScrollRequest, StyleOp, StylePatch, ViewerConfig, Viewport,
    WordCoord,
};
use crate::morphology::MorphologyIndex;

pub use color::{contrast_boost, Rgb};
pub use selection::{step, CursorOrigin, Selection, SelectionCursor, WordGeometry};

/// Class on every fragment of a pinned root
pub const PINNED_CLASS: &str = "root-highlighted";
/// Class on the fragments under the pointer
pub const HOVER_CLASS: &str = "morph-word-highlighted";
/// Class on the fragments at the selection cursor
pub const SELECTED_CLASS: &str = "root-selected-word";

/// Palette slot held by a pinned root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedRoot {
    pub root: String,
    /// 1-based index into the palette
    pub color_index: usize,
    pub color: String,
}

/// Row of the highlighted-roots panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelEntry {
    pub root: String,
    pub color: String,
    pub color_index: usize,
    pub count: usize,
}

/// Tooltip data and hover styling for one coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverResult {
    pub record: Option<MorphologyRecord>,
    pub patch: StylePatch,
}

pub struct HighlightManager {
    palette: Vec<String>,
    minimap_default_color: String,
    selection_anchor_px: f32,
    pins: Vec<PinnedRoot>,
    next_color_index: usize,
    cursor: Option<SelectionCursor>,
    hovered: Option<WordCoord>,
}

impl HighlightManager {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            palette: config.palette.clone(),
            minimap_default_color: config.minimap_default_color.clone(),
            selection_anchor_px: config.selection_anchor_px,
            pins: Vec::new(),
            next_color_index: 1,
            cursor: None,
            hovered: None,
        }
    }

    pub fn is_pinned(&self, root: &str) -> bool {
        self.pins.iter().any(|p| p.root == root)
    }

    pub fn pin_for(&self, root: &str) -> Option<&PinnedRoot> {
        self.pins.iter().find(|p| p.root == root)
    }

    /// Pinned roots in pin order
    pub fn pins(&self) -> &[PinnedRoot] {
        &self.pins
    }

    pub fn cursor(&self) -> Option<&SelectionCursor> {
        self.cursor.as_ref()
    }

    /// Lowest free palette slot, cycling once the palette is exhausted
    fn allocate_color_index(&self) -> usize {
        let size = self.palette.len().max(1);
        let mut index = 1;
        while index <= size && self.pins.iter().any(|p| p.color_index == index) {
            index += 1;
        }
        if index > size {
            index = ((self.next_color_index.max(1) - 1) % size) + 1;
        }
        index
    }

    /// Highlight every occurrence of `root`
    ///
    /// Pinning an already pinned root re-applies its visuals with the same
    /// color.
    pub fn pin(&mut self, index: &MorphologyIndex, root: &str) -> StylePatch {
        let color = match self.pin_for(root) {
            Some(pin) => pin.color.clone(),
            None => {
                let color_index = self.allocate_color_index();
                let color = self
                    .palette
                    .get(color_index - 1)
                    .cloned()
                    .unwrap_or_else(|| self.minimap_default_color.clone());
                self.pins.push(PinnedRoot {
                    root: root.to_string(),
                    color_index,
                    color: color.clone(),
                });
                self.next_color_index = color_index + 1;
                log::debug!("pinned root {} with color {}", root, color_index);
                color
            }
        };

        let minimap_color = contrast_boost(&color);
        let mut patch = StylePatch::new();
        for coord in index.occurrences(root) {
            patch.text(coord, StyleOp::SetBackground(color.clone()));
            patch.text(coord, StyleOp::AddClass(PINNED_CLASS.to_string()));
            patch.minimap(coord, StyleOp::SetBackground(minimap_color.clone()));
            patch.minimap(coord, StyleOp::AddClass(PINNED_CLASS.to_string()));
        }
        patch
    }

    /// Remove the highlight of `root`; clears the cursor if `root` placed it
    pub fn unpin(&mut self, index: &MorphologyIndex, root: &str) -> StylePatch {
        let mut patch = StylePatch::new();
        let Some(pos) = self.pins.iter().position(|p| p.root == root) else {
            return patch;
        };
        self.pins.remove(pos);

        if matches!(&self.cursor, Some(c) if c.origin == CursorOrigin::Root(root.to_string())) {
            patch.extend(self.clear_selection());
        }

        // words shared with a remaining pin keep that pin's styling
        let mut exclusive = Vec::new();
        for coord in index.occurrences(root) {
            match self.covering_pin(index, coord) {
                Some(pin) => {
                    patch.text(coord, StyleOp::SetBackground(pin.color.clone()));
                    patch.minimap(coord, StyleOp::SetBackground(contrast_boost(&pin.color)));
                }
                None => exclusive.push(coord),
            }
        }

        for &coord in &exclusive {
            patch.text(coord, StyleOp::ClearBackground);
            patch.text(coord, StyleOp::RemoveClass(PINNED_CLASS.to_string()));
            patch.minimap(coord, StyleOp::RemoveClass(PINNED_CLASS.to_string()));
        }
        for &coord in &exclusive {
            patch.minimap(coord, StyleOp::SetBackground(self.minimap_default_color.clone()));
        }
        log::debug!("unpinned root {}", root);
        patch
    }

    /// Most recently pinned root still covering `coord`
    fn covering_pin(&self, index: &MorphologyIndex, coord: WordCoord) -> Option<&PinnedRoot> {
        self.pins.iter().rev().find(|p| index.covers(&p.root, coord))
    }

    /// Pin if absent, unpin if present
    pub fn toggle(&mut self, index: &MorphologyIndex, root: &str) -> StylePatch {
        if self.is_pinned(root) {
            self.unpin(index, root)
        } else {
            self.pin(index, root)
        }
    }

    /// Click on a word: toggle its root when morphology is available
    pub fn click(&mut self, index: &MorphologyIndex, coord: WordCoord) -> Option<StylePatch> {
        if !index.is_available() {
            return None;
        }
        let root = index.root_of(coord)?.to_string();
        Some(self.toggle(index, &root))
    }

    /// Pointer entered a word
    pub fn hover(&mut self, index: &MorphologyIndex, coord: WordCoord) -> HoverResult {
        let mut patch = self.unhover();
        patch.text(coord, StyleOp::AddClass(HOVER_CLASS.to_string()));
        self.hovered = Some(coord);
        HoverResult {
            record: index.record_for(coord).cloned(),
            patch,
        }
    }

    /// Pointer left the hovered word
    pub fn unhover(&mut self) -> StylePatch {
        let mut patch = StylePatch::new();
        if let Some(coord) = self.hovered.take() {
            patch.text(coord, StyleOp::RemoveClass(HOVER_CLASS.to_string()));
        }
        patch
    }

    /// Drop the cursor and its styling
    pub fn clear_selection(&mut self) -> StylePatch {
        let mut patch = StylePatch::new();
        if let Some(cursor) = self.cursor.take() {
            patch.text(cursor.coord, StyleOp::RemoveClass(SELECTED_CLASS.to_string()));
        }
        patch
    }

    /// Move the cursor over the occurrences of `root`
    pub fn select_next(
        &mut self,
        index: &MorphologyIndex,
        root: &str,
        direction: Direction,
        geometry: &dyn WordGeometry,
        viewport: &Viewport,
    ) -> Option<Selection> {
        let occurrences = index.occurrences(root);
        self.navigate(
            CursorOrigin::Root(root.to_string()),
            &occurrences,
            direction,
            geometry,
            viewport,
        )
    }

    /// Move the cursor over `targets` (ascending) on behalf of `origin`
    ///
    /// The cursor steps from its current position only when `origin` placed
    /// it; otherwise it anchors on screen.
    pub fn navigate(
        &mut self,
        origin: CursorOrigin,
        targets: &[WordCoord],
        direction: Direction,
        geometry: &dyn WordGeometry,
        viewport: &Viewport,
    ) -> Option<Selection> {
        let current = self
            .cursor
            .as_ref()
            .filter(|c| c.origin == origin)
            .map(|c| c.coord);
        let coord = step(targets, current, direction, geometry, viewport)?;

        let mut patch = self.clear_selection();
        patch.text(coord, StyleOp::AddClass(SELECTED_CLASS.to_string()));
        self.cursor = Some(SelectionCursor { coord, origin });

        let scroll = geometry
            .rect_of(coord)
            .map(|rect| ScrollRequest::smooth(viewport.container, rect.top - self.selection_anchor_px));

        Some(Selection { coord, patch, scroll })
    }

    /// Keep the cursor consistent after search item `removed` left the list
    ///
    /// A cursor placed by that item is cleared; one placed by a later item
    /// follows its item down by one position.
    pub fn forget_search_item(&mut self, removed: usize) -> StylePatch {
        let origin = self.cursor.as_ref().map(|c| c.origin.clone());
        match origin {
            Some(CursorOrigin::SearchItem(i)) if i == removed => self.clear_selection(),
            Some(CursorOrigin::SearchItem(i)) if i > removed => {
                if let Some(cursor) = self.cursor.as_mut() {
                    cursor.origin = CursorOrigin::SearchItem(i - 1);
                }
                StylePatch::new()
            }
            _ => StylePatch::new(),
        }
    }

    /// Rows of the highlighted-roots panel in pin order
    pub fn panel_entries(&self, index: &MorphologyIndex) -> Vec<PanelEntry> {
        self.pins
            .iter()
            .map(|p| PanelEntry {
                root: p.root.clone(),
                color: p.color.clone(),
                color_index: p.color_index,
                count: index.occurrence_count(&p.root),
            })
            .collect()
    }

    /// Identity of the current pin set, used to skip redundant panel rebuilds
    pub fn panel_fingerprint(&self) -> String {
        self.pins
            .iter()
            .map(|p| p.root.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Rect, StyleTarget};
    use crate::parse::SegmentRecord;
    use std::collections::HashMap;

    fn index_with(roots: &[(&str, &[(u32, u32)])]) -> MorphologyIndex {
        let mut index = MorphologyIndex::from_corpus(1, "", None);
        for (root, coords) in roots {
            for &(v, w) in coords.iter() {
                index.insert_segment(SegmentRecord {
                    coord: WordCoord::new(v, w),
                    root: Some(root.to_string()),
                    lemma: None,
                });
            }
        }
        index
    }

    fn small_palette(n: usize) -> ViewerConfig {
        ViewerConfig {
            palette: crate::models::DEFAULT_PALETTE[..n].iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_color_allocation_reuses_freed_slots() {
        let index = index_with(&[("a", &[(1, 1)]), ("b", &[(1, 2)]), ("c", &[(1, 3)])]);
        let mut hl = HighlightManager::new(&small_palette(3));

        hl.pin(&index, "a");
        hl.pin(&index, "b");
        hl.unpin(&index, "a");
        hl.pin(&index, "c");

        assert_eq!(hl.pin_for("b").unwrap().color_index, 2);
        assert_eq!(hl.pin_for("c").unwrap().color_index, 1);
    }

    #[test]
    fn test_color_allocation_cycles_when_exhausted() {
        let index = index_with(&[]);
        let mut hl = HighlightManager::new(&small_palette(2));

        hl.pin(&index, "a");
        hl.pin(&index, "b");
        hl.pin(&index, "c");
        hl.pin(&index, "d");

        assert_eq!(hl.pin_for("c").unwrap().color_index, 1);
        assert_eq!(hl.pin_for("d").unwrap().color_index, 2);
    }

    #[test]
    fn test_pin_styles_text_and_minimap() {
        let index = index_with(&[("a", &[(1, 1), (2, 3)])]);
        let mut hl = HighlightManager::new(&ViewerConfig::default());
        let patch = hl.pin(&index, "a");

        let text: Vec<_> = patch.edits_for(StyleTarget::Text, WordCoord::new(2, 3)).collect();
        assert_eq!(
            text,
            vec![
                &StyleOp::SetBackground("#FFE5E5".into()),
                &StyleOp::AddClass(PINNED_CLASS.into())
            ]
        );
        let minimap: Vec<_> = patch.edits_for(StyleTarget::Minimap, WordCoord::new(1, 1)).collect();
        assert_eq!(minimap[0], &StyleOp::SetBackground(contrast_boost("#FFE5E5")));
    }

    #[test]
    fn test_repin_keeps_color() {
        let index = index_with(&[("a", &[(1, 1)])]);
        let mut hl = HighlightManager::new(&ViewerConfig::default());
        hl.pin(&index, "a");
        let again = hl.pin(&index, "a");
        assert_eq!(hl.pins().len(), 1);
        assert!(!again.is_empty());
    }

    #[test]
    fn test_unpin_clears_own_cursor_only() {
        let index = index_with(&[("a", &[(1, 1)]), ("b", &[(1, 2)])]);
        let mut hl = HighlightManager::new(&ViewerConfig::default());
        let geo: HashMap<WordCoord, Rect> = HashMap::new();
        let vp = Viewport::default();

        hl.pin(&index, "a");
        hl.pin(&index, "b");
        hl.select_next(&index, "b", Direction::Next, &geo, &vp).unwrap();

        hl.unpin(&index, "a");
        assert!(hl.cursor().is_some());

        let patch = hl.unpin(&index, "b");
        assert!(hl.cursor().is_none());
        assert_eq!(
            patch.edits[0].op,
            StyleOp::RemoveClass(SELECTED_CLASS.to_string())
        );
    }

    #[test]
    fn test_selection_moves_clear_before_apply() {
        let index = index_with(&[("a", &[(1, 1), (1, 4)])]);
        let mut hl = HighlightManager::new(&ViewerConfig::default());
        let mut geo = HashMap::new();
        geo.insert(WordCoord::new(1, 1), Rect::new(500.0, 0.0, 20.0, 20.0));
        geo.insert(WordCoord::new(1, 4), Rect::new(900.0, 0.0, 20.0, 20.0));
        let vp = Viewport::default();

        let first = hl.select_next(&index, "a", Direction::Next, &geo, &vp).unwrap();
        assert_eq!(first.coord, WordCoord::new(1, 1));
        assert_eq!(first.scroll.unwrap().top, 380.0);

        let second = hl.select_next(&index, "a", Direction::Next, &geo, &vp).unwrap();
        assert_eq!(second.coord, WordCoord::new(1, 4));
        assert!(second.patch.last_clear_index() < second.patch.first_apply_index());
        assert_eq!(second.patch.edits[0].coord, WordCoord::new(1, 1));
    }

    #[test]
    fn test_hover_replaces_previous_hover() {
        let index = index_with(&[("a", &[(1, 1)])]);
        let mut hl = HighlightManager::new(&ViewerConfig::default());

        let first = hl.hover(&index, WordCoord::new(1, 1));
        assert_eq!(first.record.unwrap().root.as_deref(), Some("a"));

        let second = hl.hover(&index, WordCoord::new(1, 2));
        assert!(second.record.is_none());
        assert_eq!(second.patch.len(), 2);
        assert_eq!(second.patch.edits[0].op, StyleOp::RemoveClass(HOVER_CLASS.into()));

        assert_eq!(hl.unhover().len(), 1);
        assert!(hl.unhover().is_empty());
    }

    #[test]
    fn test_click_toggles_root() {
        let index = index_with(&[("a", &[(1, 1)])]);
        let mut hl = HighlightManager::new(&ViewerConfig::default());

        assert!(hl.click(&index, WordCoord::new(9, 9)).is_none());
        hl.click(&index, WordCoord::new(1, 1)).unwrap();
        assert!(hl.is_pinned("a"));
        hl.click(&index, WordCoord::new(1, 1)).unwrap();
        assert!(!hl.is_pinned("a"));

        let unloaded = MorphologyIndex::new();
        assert!(hl.click(&unloaded, WordCoord::new(1, 1)).is_none());
    }

    #[test]
    fn test_panel_model() {
        let index = index_with(&[("a", &[(1, 1), (2, 1)]), ("b", &[(1, 2)])]);
        let mut hl = HighlightManager::new(&ViewerConfig::default());
        hl.pin(&index, "b");
        hl.pin(&index, "a");

        let entries = hl.panel_entries(&index);
        assert_eq!(entries[0].root, "b");
        assert_eq!(entries[1].count, 2);
        assert_eq!(hl.panel_fingerprint(), "b|a");
    }

    #[test]
    fn test_search_item_removal_moves_cursor() {
        let mut hl = HighlightManager::new(&ViewerConfig::default());
        let geo: HashMap<WordCoord, Rect> = HashMap::new();
        let vp = Viewport::default();
        let targets = [WordCoord::new(2, 1)];

        hl.navigate(CursorOrigin::SearchItem(2), &targets, Direction::Next, &geo, &vp)
            .unwrap();
        assert!(hl.forget_search_item(3).is_empty());
        assert!(hl.forget_search_item(0).is_empty());
        assert_eq!(hl.cursor().unwrap().origin, CursorOrigin::SearchItem(1));

        let patch = hl.forget_search_item(1);
        assert_eq!(patch.len(), 1);
        assert!(hl.cursor().is_none());
    }
}
