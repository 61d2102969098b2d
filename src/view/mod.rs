//! The view context
//!
//! `ViewContext` owns every piece of state of one activated verse-group
//! view: the morphology index, the highlight state, the minimap cache, the
//! search items and their overlay. It is built when the view activates and
//! dropped when the view goes away; nothing lives in module-level state.
//!
//! Ordering: `tokenize` must run before the first minimap build, since the
//! glue measures the units it creates. Loading the corpus is independent of
//! both and may happen at any point.

pub mod reconcile;
pub mod scheduler;

use serde::{Deserialize, Serialize};

use crate::highlight::{CursorOrigin, HighlightManager, HoverResult, PanelEntry, Selection};
use crate::minimap::{
    available_width, IndicatorRect, LayoutMeasurements, MinimapDisplayList, MinimapEngine,
    MinimapPanel, TextMeasurer,
};
use crate::models::{
    ConfigError, Direction, LoadError, MorphologyRecord, PayloadError, ScrollRequest, StylePatch,
    ViewerConfig, Viewport, WordCoord,
};
use crate::morphology::{AlignmentWarning, MorphologyIndex};
use crate::regions::{
    payload_for_root_with_lemma, region_anchors, search_details_for_root, Region, RegionOverlay,
    SearchItemEntry, SearchItemList, SearchItemPayload,
};
use crate::stats::{
    build_universe_cache, stats_rows_for_matches, FrequencyDataset, ItemKind, RootStat, Section,
    SectionMeasure, UniverseCache,
};
use crate::tokenize::{DocNode, Tokenized, Tokenizer};
use crate::utils::{PerformanceMonitor, TimingSummary};

pub use reconcile::{coords_fingerprint, Reconciler};
pub use scheduler::FrameScheduler;

/// Geometry to apply in one animation frame
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FrameUpdate {
    pub indicator: Option<IndicatorRect>,
    /// New scroll offset for the minimap panel, when it must follow
    pub minimap_scroll_top: Option<f32>,
}

/// Result of adding a search item
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AddedSearchItem {
    /// `None` when the item was suppressed as a duplicate
    pub index: Option<usize>,
    pub patch: StylePatch,
}

pub struct ViewContext {
    config: ViewerConfig,
    group: u32,
    index: MorphologyIndex,
    universe: Option<UniverseCache>,
    frequencies: Option<FrequencyDataset>,
    highlights: HighlightManager,
    minimap: MinimapEngine,
    overlay: RegionOverlay,
    search_items: SearchItemList,
    /// Distinct coordinates created by the tokenizer, ascending
    words: Vec<WordCoord>,
    tagged_guard: Reconciler<u64>,
    panel_guard: Reconciler<String>,
    scheduler: FrameScheduler,
    perf: PerformanceMonitor,
}

impl ViewContext {
    pub fn new(group: u32, config: ViewerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!("view context created for group {}", group);
        Ok(Self {
            group,
            index: MorphologyIndex::new(),
            universe: None,
            frequencies: None,
            highlights: HighlightManager::new(&config),
            minimap: MinimapEngine::new(&config),
            overlay: RegionOverlay::new(&config),
            search_items: SearchItemList::new(),
            words: Vec::new(),
            tagged_guard: Reconciler::new(),
            panel_guard: Reconciler::new(),
            scheduler: FrameScheduler::new(),
            perf: PerformanceMonitor::new(),
            config,
        })
    }

    pub fn group(&self) -> u32 {
        self.group
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn index(&self) -> &MorphologyIndex {
        &self.index
    }

    pub fn highlights(&self) -> &HighlightManager {
        &self.highlights
    }

    pub fn search_items(&self) -> &SearchItemList {
        &self.search_items
    }

    /// Coordinates of the tagged units, ascending
    pub fn words(&self) -> &[WordCoord] {
        &self.words
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Tag the words of the verse-group tree
    ///
    /// Returns the rewritten tree for the glue to render.
    pub fn tokenize(&mut self, root: DocNode) -> Tokenized {
        let tokenizer = Tokenizer::new(self.config.excluded_classes.clone());
        let tokenized = self.perf.time("tokenize", || tokenizer.tokenize(root));

        let mut words = tokenized.created.clone();
        words.sort();
        words.dedup();
        self.words = words;
        self.tagged_guard.reset();
        tokenized
    }

    /// Build the morphology index from the fetched corpus
    ///
    /// Returns whether annotations are available afterwards.
    pub fn load_corpus(&mut self, corpus: Result<&str, LoadError>) -> bool {
        let group = self.group;
        let drift = self.config.drift.clone();
        let universe = corpus.as_ref().ok().map(|text| build_universe_cache(text));
        self.index = self
            .perf
            .time("corpus", || MorphologyIndex::load(group, corpus, drift));
        self.universe = universe;
        self.index.is_available()
    }

    /// Decode the roots-frequency dataset; a failure disables the panel
    pub fn load_frequencies(&mut self, json: Result<&str, LoadError>) -> Result<(), LoadError> {
        let decoded = json.and_then(FrequencyDataset::decode);
        match decoded {
            Ok(dataset) => {
                self.frequencies = Some(dataset);
                Ok(())
            }
            Err(err) => {
                log::error!("frequency dataset unavailable: {}", err);
                self.frequencies = None;
                Err(err)
            }
        }
    }

    /// Verses whose corpus numbering disagrees with the rendered text
    pub fn alignment_warnings(&self) -> Vec<AlignmentWarning> {
        self.index.alignment_warnings(&self.words)
    }

    /// True when the tagged coordinate set differs from the last one seen
    ///
    /// The glue calls this from its mutation observer and only rebuilds
    /// when it returns true.
    pub fn tagged_set_changed(&mut self, coords: &[WordCoord]) -> bool {
        self.tagged_guard.changed(coords_fingerprint(coords))
    }

    pub fn record_for(&self, coord: WordCoord) -> Option<&MorphologyRecord> {
        self.index.record_for(coord)
    }

    // ------------------------------------------------------------------
    // Highlighting and selection
    // ------------------------------------------------------------------

    pub fn pin(&mut self, root: &str) -> StylePatch {
        self.highlights.pin(&self.index, root)
    }

    pub fn unpin(&mut self, root: &str) -> StylePatch {
        self.highlights.unpin(&self.index, root)
    }

    pub fn toggle(&mut self, root: &str) -> StylePatch {
        self.highlights.toggle(&self.index, root)
    }

    pub fn click(&mut self, coord: WordCoord) -> Option<StylePatch> {
        self.highlights.click(&self.index, coord)
    }

    pub fn hover(&mut self, coord: WordCoord) -> HoverResult {
        self.highlights.hover(&self.index, coord)
    }

    pub fn unhover(&mut self) -> StylePatch {
        self.highlights.unhover()
    }

    pub fn clear_selection(&mut self) -> StylePatch {
        self.highlights.clear_selection()
    }

    /// Step the cursor over the occurrences of `root`
    ///
    /// Geometry comes from the last minimap measurement; without one the
    /// cursor still moves but no scroll is requested.
    pub fn select_next(&mut self, root: &str, direction: Direction, viewport: &Viewport) -> Option<Selection> {
        let empty = LayoutMeasurements::default();
        let geometry = self.minimap.measurements().unwrap_or(&empty);
        self.highlights
            .select_next(&self.index, root, direction, geometry, viewport)
    }

    /// Step the cursor over the region anchors of search item `item`
    pub fn select_next_region(
        &mut self,
        item: usize,
        direction: Direction,
        viewport: &Viewport,
    ) -> Option<Selection> {
        let entry = self.search_items.get(item)?;
        let anchors = region_anchors(entry, self.group, &self.words);
        let empty = LayoutMeasurements::default();
        let geometry = self.minimap.measurements().unwrap_or(&empty);
        self.highlights.navigate(
            CursorOrigin::SearchItem(item),
            &anchors,
            direction,
            geometry,
            viewport,
        )
    }

    /// Rows for the highlighted-roots panel, `None` when nothing changed
    /// since the last call
    pub fn panel_update(&mut self) -> Option<Vec<PanelEntry>> {
        if !self.panel_guard.changed(self.highlights.panel_fingerprint()) {
            return None;
        }
        Some(self.highlights.panel_entries(&self.index))
    }

    // ------------------------------------------------------------------
    // Search items and regions
    // ------------------------------------------------------------------

    /// Validate a posted payload, append it and refresh the overlay
    pub fn add_search_item(&mut self, payload: SearchItemPayload) -> Result<AddedSearchItem, PayloadError> {
        let (entry, prevent_duplicate) = payload.validate()?;
        let index = self.search_items.add(entry, prevent_duplicate);
        let patch = match index {
            Some(_) => self.apply_overlay(),
            None => StylePatch::new(),
        };
        Ok(AddedSearchItem { index, patch })
    }

    /// Payload searching `root` (optionally one lemma) in this group
    ///
    /// Regions are the verses holding a matching occurrence; the details
    /// line lists the root's lemmas with the selected/total counts.
    pub fn root_search_payload(&self, root: &str, lemma: Option<&str>) -> SearchItemPayload {
        let occurrences = self.index.occurrences(root);

        let mut lemmas: Vec<String> = Vec::new();
        for coord in &occurrences {
            if let Some(l) = self.index.record_for(*coord).and_then(|r| r.lemma.as_ref()) {
                if !lemmas.contains(l) {
                    lemmas.push(l.clone());
                }
            }
        }

        let selected: Vec<WordCoord> = occurrences
            .iter()
            .copied()
            .filter(|c| match lemma {
                Some(l) => self.index.record_for(*c).and_then(|r| r.lemma.as_deref()) == Some(l),
                None => true,
            })
            .collect();

        let mut regions: Vec<Region> = Vec::new();
        for coord in &selected {
            match regions.last_mut() {
                Some(region) if region.start_verse == coord.verse => region.matches.push(*coord),
                _ => regions.push(Region {
                    group: self.group,
                    start_verse: coord.verse,
                    end_verse: coord.verse,
                    matches: vec![*coord],
                }),
            }
        }

        let shown_lemmas: Vec<String> = match lemma {
            Some(l) => vec![l.to_string()],
            None => lemmas,
        };

        let mut payload = payload_for_root_with_lemma(root, lemma, Some(regions));
        payload.search_details = Some(search_details_for_root(
            root,
            &shown_lemmas,
            selected.len() as u64,
            occurrences.len() as u64,
        ));
        if let Some(universe) = &self.universe {
            let groups = vec![self.group; selected.len()];
            payload.stats_rows = Some(stats_rows_for_matches(
                &groups,
                &universe.resolve(ItemKind::Root),
            ));
        }
        payload.prevent_duplicate = Some(true);
        payload
    }

    /// Remove search item `item`, fixing the cursor and the overlay
    pub fn remove_search_item(&mut self, item: usize) -> StylePatch {
        if self.search_items.remove(item).is_none() {
            return StylePatch::new();
        }
        let mut patch = self.highlights.forget_search_item(item);
        patch.extend(self.apply_overlay());
        patch
    }

    pub fn clear_search_items(&mut self) -> StylePatch {
        let mut patch = StylePatch::new();
        for item in (0..self.search_items.len()).rev() {
            patch.extend(self.highlights.forget_search_item(item));
        }
        self.search_items.clear();
        patch.extend(self.overlay.clear());
        patch
    }

    fn apply_overlay(&mut self) -> StylePatch {
        self.overlay
            .apply(self.search_items.entries(), self.group, &self.words)
    }

    pub fn search_item(&self, item: usize) -> Option<&SearchItemEntry> {
        self.search_items.get(item)
    }

    // ------------------------------------------------------------------
    // Minimap
    // ------------------------------------------------------------------

    /// Build the minimap, or only rescale it when the tagged set is unchanged
    pub fn build_minimap(
        &mut self,
        measurements: LayoutMeasurements,
        viewport_width: f32,
        measurer: &dyn TextMeasurer,
    ) -> MinimapDisplayList {
        if self.words.is_empty() {
            log::warn!("minimap built before any word was tagged");
        }
        let width = available_width(viewport_width, &self.config.minimap);
        let minimap = &mut self.minimap;
        self.perf
            .time("minimap", || minimap.update(measurements, width, measurer))
    }

    /// Rescale for a new viewport width against the cached layout
    pub fn relayout_minimap(
        &mut self,
        viewport_width: f32,
        measurer: &dyn TextMeasurer,
    ) -> Option<MinimapDisplayList> {
        let width = available_width(viewport_width, &self.config.minimap);
        self.minimap.relayout(width, measurer)
    }

    pub fn visible_indicator(&self, viewport: &Viewport) -> Option<IndicatorRect> {
        self.minimap.visible_indicator(viewport)
    }

    pub fn minimap_click(
        &self,
        client_y: f32,
        surface_top: f32,
        internal_scroll: f32,
        viewport: &Viewport,
    ) -> Option<ScrollRequest> {
        self.minimap
            .click_to_scroll(client_y, surface_top, internal_scroll, viewport)
    }

    pub fn scroll_to_verse(&self, verse: u32, viewport: &Viewport) -> Option<ScrollRequest> {
        self.minimap.scroll_to_verse(verse, viewport)
    }

    /// A scroll or resize happened; true when the glue must request a frame
    pub fn request_frame(&mut self) -> bool {
        self.scheduler.request()
    }

    /// Work of one animation frame; `None` when no trigger was pending
    pub fn run_frame(&mut self, viewport: &Viewport, panel: &MinimapPanel) -> Option<FrameUpdate> {
        if !self.scheduler.begin_frame() {
            return None;
        }
        let indicator = self.minimap.visible_indicator(viewport);
        let minimap_scroll_top = indicator
            .as_ref()
            .and_then(|rect| self.minimap.follow_indicator(rect, panel));
        Some(FrameUpdate {
            indicator,
            minimap_scroll_top,
        })
    }

    // ------------------------------------------------------------------
    // Frequency panel
    // ------------------------------------------------------------------

    pub fn frequencies_available(&self) -> bool {
        self.frequencies.is_some()
    }

    /// A section of this group cut to its configured limit
    pub fn frequency_section(&self, section: Section) -> Vec<RootStat> {
        let limit = self.config.section_limits.limit(section);
        self.frequencies
            .as_ref()
            .map(|ds| ds.ranked(self.group, section, limit).to_vec())
            .unwrap_or_default()
    }

    pub fn chart_series(&self, section: Section) -> Vec<(String, f64)> {
        let limit = self.config.section_limits.limit(section);
        self.frequencies
            .as_ref()
            .map(|ds| ds.chart_series(self.group, section, limit))
            .unwrap_or_default()
    }

    pub fn root_measures(&self, root: &str) -> Vec<SectionMeasure> {
        self.frequencies
            .as_ref()
            .map(|ds| ds.measures_for_root(self.group, root))
            .unwrap_or_default()
    }

    pub fn set_section_limits(&mut self, limits: crate::stats::SectionLimits) {
        self.config.section_limits = limits;
    }

    pub fn timings(&self) -> Vec<TimingSummary> {
        self.perf.summary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minimap::{DigitWidthMeasurer, MeasuredWord};
    use crate::models::{Rect, ScrollContainer, StyleOp, StyleTarget};
    use crate::regions::REGION_CLASS;
    use crate::script::to_target_script;

    const CORPUS: &str = "LOCATION\tFORM\tTAG\tFEATURES\n\
(1:1:1:1)\tbisomi\tN\tSTEM|POS:N|LEM:{som|ROOT:smw|M|GEN\n\
(1:1:2:1)\t{ll~ahi\tPN\tSTEM|POS:PN|LEM:{ll~ah|ROOT:Alh|GEN\n\
(1:2:1:1)\t{lo\tDET\tPREFIX|Al+\n\
(1:2:1:2)\tHamodu\tN\tSTEM|POS:N|LEM:Hamod|ROOT:Hmd|M|NOM\n\
(1:2:2:1)\tlil~ahi\tPN\tSTEM|POS:PN|LEM:{ll~ah|ROOT:Alh|GEN\n";

    fn tree() -> DocNode {
        DocNode::block(vec![
            DocNode::text("بسم الله"),
            DocNode::marker("۱"),
            DocNode::text("الحمد لله"),
            DocNode::marker("۲"),
        ])
    }

    fn measurements(ctx: &ViewContext) -> LayoutMeasurements {
        LayoutMeasurements {
            words: ctx
                .words()
                .iter()
                .enumerate()
                .map(|(i, c)| MeasuredWord::new(c.verse, c.word, Rect::new(100.0 + 40.0 * i as f32, 50.0, 60.0, 20.0)))
                .collect(),
            markers: vec![],
            document_width: 800.0,
            document_height: 2000.0,
        }
    }

    fn loaded() -> ViewContext {
        let mut ctx = ViewContext::new(1, ViewerConfig::default()).unwrap();
        ctx.tokenize(tree());
        assert!(ctx.load_corpus(Ok(CORPUS)));
        ctx
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ViewerConfig {
            palette: vec![],
            ..Default::default()
        };
        assert!(ViewContext::new(1, config).is_err());
    }

    #[test]
    fn test_tokenize_then_lookup() {
        let ctx = loaded();
        assert_eq!(ctx.words().len(), 4);
        let allah = to_target_script("Alh");
        assert_eq!(
            ctx.record_for(WordCoord::new(2, 2)).unwrap().root.as_deref(),
            Some(allah.as_str())
        );
        assert!(ctx.alignment_warnings().is_empty());
    }

    #[test]
    fn test_failed_load_degrades() {
        let mut ctx = ViewContext::new(1, ViewerConfig::default()).unwrap();
        ctx.tokenize(tree());
        assert!(!ctx.load_corpus(Err(LoadError::Transport("404".into()))));
        assert!(ctx.click(WordCoord::new(1, 1)).is_none());
        assert!(ctx.load_frequencies(Ok("[]")).is_err());
        assert!(!ctx.frequencies_available());
        assert!(ctx.frequency_section(Section::TopRoots).is_empty());
    }

    #[test]
    fn test_panel_update_skips_unchanged() {
        let mut ctx = loaded();
        let allah = to_target_script("Alh");
        assert_eq!(ctx.panel_update(), Some(vec![]));
        assert_eq!(ctx.panel_update(), None);

        ctx.pin(&allah);
        let rows = ctx.panel_update().unwrap();
        assert_eq!(rows[0].count, 2);
        assert_eq!(ctx.panel_update(), None);
    }

    #[test]
    fn test_select_next_scrolls_with_measured_geometry() {
        let mut ctx = loaded();
        let m = measurements(&ctx);
        ctx.build_minimap(m, 1200.0, &DigitWidthMeasurer::default());

        let vp = Viewport::new(ScrollContainer::Window, 0.0, 800.0);
        let allah = to_target_script("Alh");
        let first = ctx.select_next(&allah, Direction::Next, &vp).unwrap();
        assert_eq!(first.coord, WordCoord::new(1, 2));
        assert_eq!(first.scroll.unwrap().top, 140.0 - 120.0);

        let second = ctx.select_next(&allah, Direction::Next, &vp).unwrap();
        assert_eq!(second.coord, WordCoord::new(2, 2));
        let third = ctx.select_next(&allah, Direction::Next, &vp).unwrap();
        assert_eq!(third.coord, WordCoord::new(1, 2));
    }

    #[test]
    fn test_root_search_round_trip() {
        let mut ctx = loaded();
        let allah = to_target_script("Alh");
        let payload = ctx.root_search_payload(&allah, None);
        assert_eq!(payload.regions.as_ref().unwrap().len(), 2);
        assert!(payload.search_details.as_ref().unwrap().contains("[۲/۲]"));

        let added = ctx.add_search_item(payload.clone()).unwrap();
        assert_eq!(added.index, Some(0));
        assert!(added
            .patch
            .edits_for(StyleTarget::Text, WordCoord::new(1, 2))
            .any(|op| *op == StyleOp::AddClass(REGION_CLASS.into())));

        let duplicate = ctx.add_search_item(payload).unwrap();
        assert_eq!(duplicate.index, None);
        assert!(duplicate.patch.is_empty());
    }

    #[test]
    fn test_region_navigation_and_removal() {
        let mut ctx = loaded();
        let allah = to_target_script("Alh");
        let hamd = to_target_script("Hmd");
        ctx.add_search_item(ctx.root_search_payload(&hamd, None)).unwrap();
        ctx.add_search_item(ctx.root_search_payload(&allah, None)).unwrap();

        let vp = Viewport::default();
        let sel = ctx.select_next_region(1, Direction::Next, &vp).unwrap();
        assert_eq!(sel.coord, WordCoord::new(1, 2));
        let sel = ctx.select_next_region(1, Direction::Next, &vp).unwrap();
        assert_eq!(sel.coord, WordCoord::new(2, 2));

        ctx.remove_search_item(0);
        assert_eq!(
            ctx.highlights().cursor().unwrap().origin,
            CursorOrigin::SearchItem(0)
        );

        let patch = ctx.remove_search_item(0);
        assert!(ctx.highlights().cursor().is_none());
        assert!(patch.edits.iter().any(|e| e.op == StyleOp::ClearBoxShadow));
        assert!(ctx.search_items().is_empty());
        assert!(ctx.remove_search_item(0).is_empty());
    }

    #[test]
    fn test_frames_batch_triggers() {
        let mut ctx = loaded();
        let m = measurements(&ctx);
        ctx.build_minimap(m, 1200.0, &DigitWidthMeasurer::default());
        let vp = Viewport::new(ScrollContainer::Window, 0.0, 800.0);
        let panel = MinimapPanel {
            scroll_top: 0.0,
            client_height: 300.0,
            scroll_height: 300.0,
        };

        assert!(ctx.run_frame(&vp, &panel).is_none());
        assert!(ctx.request_frame());
        assert!(!ctx.request_frame());
        let update = ctx.run_frame(&vp, &panel).unwrap();
        assert!(update.indicator.is_some());
        assert!(ctx.run_frame(&vp, &panel).is_none());
    }

    #[test]
    fn test_tagged_set_guard() {
        let mut ctx = loaded();
        let words = ctx.words().to_vec();
        assert!(ctx.tagged_set_changed(&words));
        assert!(!ctx.tagged_set_changed(&words));
        assert!(ctx.tagged_set_changed(&words[1..]));
    }
}
