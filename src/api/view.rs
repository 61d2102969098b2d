//! JavaScript handle on one activated view
//!
//! The glue creates an `AnnotationView` when a verse-group page activates,
//! forwards DOM events to it and applies the patches, scroll requests and
//! display lists it returns. Dropping the handle discards all view state.

use wasm_bindgen::prelude::*;

use super::helpers::{
    deserialize, deserialize_or_default, direction_from_i32, serialize, to_js_error, viewport,
};
use super::types::{ChartPoint, SelectionResult, TokenizeResult};
use crate::minimap::{DigitWidthMeasurer, LayoutMeasurements, MinimapPanel, TextMeasurer};
use crate::models::{LoadError, ViewerConfig, WordCoord};
use crate::regions::SearchItemPayload;
use crate::stats::{Section, SectionLimits};
use crate::tokenize::DocNode;
use crate::view::ViewContext;
use crate::{wasm_error, wasm_info, wasm_log, wasm_warn};

/// Text measurer backed by a JS callback `(text, fontPx) => width`
///
/// Falls back to the fixed digit advance when the callback is missing or
/// does not return a number.
struct JsMeasurer {
    callback: Option<js_sys::Function>,
    fallback: DigitWidthMeasurer,
}

impl JsMeasurer {
    fn new(callback: Option<js_sys::Function>) -> Self {
        Self {
            callback,
            fallback: DigitWidthMeasurer::default(),
        }
    }
}

impl TextMeasurer for JsMeasurer {
    fn width(&self, text: &str, font_px: f32) -> f32 {
        self.callback
            .as_ref()
            .and_then(|f| {
                f.call2(
                    &JsValue::NULL,
                    &JsValue::from_str(text),
                    &JsValue::from_f64(font_px as f64),
                )
                .ok()
            })
            .and_then(|v| v.as_f64())
            .map(|w| w as f32)
            .unwrap_or_else(|| self.fallback.width(text, font_px))
    }
}

fn section_from_key(key: &str) -> Result<Section, JsValue> {
    Section::ALL
        .iter()
        .copied()
        .find(|s| s.key() == key)
        .ok_or_else(|| to_js_error(format!("unknown frequency section '{}'", key)))
}

#[wasm_bindgen]
pub struct AnnotationView {
    ctx: ViewContext,
}

#[wasm_bindgen]
impl AnnotationView {
    /// Create the view for verse-group `group`; `config` may be omitted
    #[wasm_bindgen(constructor)]
    pub fn new(group: u32, config: JsValue) -> Result<AnnotationView, JsValue> {
        let config: ViewerConfig = deserialize_or_default(config, "Invalid viewer config")?;
        let ctx = ViewContext::new(group, config).map_err(to_js_error)?;
        wasm_info!("AnnotationView created for group {}", group);
        Ok(AnnotationView { ctx })
    }

    #[wasm_bindgen(getter)]
    pub fn group(&self) -> u32 {
        self.ctx.group()
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Tag the words of the serialized verse-group tree
    #[wasm_bindgen(js_name = tokenize)]
    pub fn tokenize(&mut self, tree: JsValue) -> Result<JsValue, JsValue> {
        let tree: DocNode = deserialize(tree, "Invalid document tree")?;
        let result = TokenizeResult::from(self.ctx.tokenize(tree));
        wasm_log!("tokenize: {} units", result.created.len());
        serialize(&result, "Failed to serialize tokenize result")
    }

    /// Build the morphology index from the fetched corpus text
    ///
    /// Pass `undefined` with an error message when the fetch failed.
    #[wasm_bindgen(js_name = loadCorpus)]
    pub fn load_corpus(&mut self, text: Option<String>, fetch_error: Option<String>) -> bool {
        let corpus = match (&text, fetch_error) {
            (Some(text), _) => Ok(text.as_str()),
            (None, Some(err)) => Err(LoadError::Transport(err)),
            (None, None) => Err(LoadError::Transport("no corpus text".to_string())),
        };
        let available = self.ctx.load_corpus(corpus);
        if !available {
            wasm_warn!("morphology annotations unavailable");
        }
        available
    }

    #[wasm_bindgen(js_name = loadFrequencies)]
    pub fn load_frequencies(&mut self, json: Option<String>, fetch_error: Option<String>) -> bool {
        let input = match (&json, fetch_error) {
            (Some(json), _) => Ok(json.as_str()),
            (None, err) => Err(LoadError::Transport(
                err.unwrap_or_else(|| "no dataset".to_string()),
            )),
        };
        self.ctx.load_frequencies(input).is_ok()
    }

    #[wasm_bindgen(js_name = alignmentWarnings)]
    pub fn alignment_warnings(&self) -> Result<JsValue, JsValue> {
        serialize(&self.ctx.alignment_warnings(), "Failed to serialize alignment warnings")
    }

    /// True when the tagged set differs from the last one observed
    #[wasm_bindgen(js_name = taggedSetChanged)]
    pub fn tagged_set_changed(&mut self, coords: JsValue) -> Result<bool, JsValue> {
        let coords: Vec<WordCoord> = deserialize(coords, "Invalid coordinate list")?;
        Ok(self.ctx.tagged_set_changed(&coords))
    }

    #[wasm_bindgen(js_name = recordFor)]
    pub fn record_for(&self, verse: u32, word: u32) -> Result<JsValue, JsValue> {
        serialize(
            &self.ctx.record_for(WordCoord::new(verse, word)),
            "Failed to serialize record",
        )
    }

    // ------------------------------------------------------------------
    // Highlighting
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = pinRoot)]
    pub fn pin_root(&mut self, root: &str) -> Result<JsValue, JsValue> {
        serialize(&self.ctx.pin(root), "Failed to serialize patch")
    }

    #[wasm_bindgen(js_name = unpinRoot)]
    pub fn unpin_root(&mut self, root: &str) -> Result<JsValue, JsValue> {
        serialize(&self.ctx.unpin(root), "Failed to serialize patch")
    }

    #[wasm_bindgen(js_name = toggleRoot)]
    pub fn toggle_root(&mut self, root: &str) -> Result<JsValue, JsValue> {
        serialize(&self.ctx.toggle(root), "Failed to serialize patch")
    }

    /// Patch for a click on a word, or `null` when nothing toggles
    #[wasm_bindgen(js_name = clickWord)]
    pub fn click_word(&mut self, verse: u32, word: u32) -> Result<JsValue, JsValue> {
        serialize(
            &self.ctx.click(WordCoord::new(verse, word)),
            "Failed to serialize patch",
        )
    }

    #[wasm_bindgen(js_name = hoverWord)]
    pub fn hover_word(&mut self, verse: u32, word: u32) -> Result<JsValue, JsValue> {
        serialize(
            &self.ctx.hover(WordCoord::new(verse, word)),
            "Failed to serialize hover result",
        )
    }

    #[wasm_bindgen(js_name = unhover)]
    pub fn unhover(&mut self) -> Result<JsValue, JsValue> {
        serialize(&self.ctx.unhover(), "Failed to serialize patch")
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) -> Result<JsValue, JsValue> {
        serialize(&self.ctx.clear_selection(), "Failed to serialize patch")
    }

    /// Step through the occurrences of `root`; `direction` is 1 or -1
    #[wasm_bindgen(js_name = selectNext)]
    pub fn select_next(
        &mut self,
        root: &str,
        direction: i32,
        in_panel: bool,
        scroll_top: f32,
        height: f32,
    ) -> Result<JsValue, JsValue> {
        let vp = viewport(in_panel, scroll_top, height);
        let selection = self
            .ctx
            .select_next(root, direction_from_i32(direction), &vp)
            .map(SelectionResult::from);
        serialize(&selection, "Failed to serialize selection")
    }

    #[wasm_bindgen(js_name = selectNextRegion)]
    pub fn select_next_region(
        &mut self,
        item: usize,
        direction: i32,
        in_panel: bool,
        scroll_top: f32,
        height: f32,
    ) -> Result<JsValue, JsValue> {
        let vp = viewport(in_panel, scroll_top, height);
        let selection = self
            .ctx
            .select_next_region(item, direction_from_i32(direction), &vp)
            .map(SelectionResult::from);
        serialize(&selection, "Failed to serialize selection")
    }

    /// Panel rows, or `null` when the pin set is unchanged
    #[wasm_bindgen(js_name = panelUpdate)]
    pub fn panel_update(&mut self) -> Result<JsValue, JsValue> {
        serialize(&self.ctx.panel_update(), "Failed to serialize panel")
    }

    // ------------------------------------------------------------------
    // Search items
    // ------------------------------------------------------------------

    /// Accept a payload posted by the search surface
    #[wasm_bindgen(js_name = addSearchItem)]
    pub fn add_search_item(&mut self, payload: JsValue) -> Result<JsValue, JsValue> {
        let payload: SearchItemPayload = deserialize(payload, "Invalid search payload")?;
        let added = self.ctx.add_search_item(payload).map_err(|e| {
            wasm_error!("search payload rejected: {}", e);
            JsValue::from_str(&e.to_string())
        })?;
        serialize(&added, "Failed to serialize search item")
    }

    /// Payload for searching a root (optionally one lemma) in this group
    #[wasm_bindgen(js_name = rootSearchPayload)]
    pub fn root_search_payload(&self, root: &str, lemma: Option<String>) -> Result<JsValue, JsValue> {
        serialize(
            &self.ctx.root_search_payload(root, lemma.as_deref()),
            "Failed to serialize payload",
        )
    }

    #[wasm_bindgen(js_name = removeSearchItem)]
    pub fn remove_search_item(&mut self, item: usize) -> Result<JsValue, JsValue> {
        serialize(&self.ctx.remove_search_item(item), "Failed to serialize patch")
    }

    #[wasm_bindgen(js_name = clearSearchItems)]
    pub fn clear_search_items(&mut self) -> Result<JsValue, JsValue> {
        serialize(&self.ctx.clear_search_items(), "Failed to serialize patch")
    }

    #[wasm_bindgen(js_name = searchItems)]
    pub fn search_items(&self) -> Result<JsValue, JsValue> {
        serialize(&self.ctx.search_items().entries(), "Failed to serialize search items")
    }

    // ------------------------------------------------------------------
    // Minimap
    // ------------------------------------------------------------------

    /// Build (or rescale) the minimap from fresh measurements
    ///
    /// `measure` is an optional `(text, fontPx) => width` callback.
    #[wasm_bindgen(js_name = buildMinimap)]
    pub fn build_minimap(
        &mut self,
        measurements: JsValue,
        viewport_width: f32,
        measure: Option<js_sys::Function>,
    ) -> Result<JsValue, JsValue> {
        let measurements: LayoutMeasurements = deserialize(measurements, "Invalid layout measurements")?;
        let measurer = JsMeasurer::new(measure);
        let list = self.ctx.build_minimap(measurements, viewport_width, &measurer);
        serialize(&list, "Failed to serialize minimap")
    }

    /// Rescale against the cached layout; `null` before the first build
    #[wasm_bindgen(js_name = relayoutMinimap)]
    pub fn relayout_minimap(
        &mut self,
        viewport_width: f32,
        measure: Option<js_sys::Function>,
    ) -> Result<JsValue, JsValue> {
        let measurer = JsMeasurer::new(measure);
        serialize(
            &self.ctx.relayout_minimap(viewport_width, &measurer),
            "Failed to serialize minimap",
        )
    }

    #[wasm_bindgen(js_name = visibleIndicator)]
    pub fn visible_indicator(&self, in_panel: bool, scroll_top: f32, height: f32) -> Result<JsValue, JsValue> {
        let vp = viewport(in_panel, scroll_top, height);
        serialize(&self.ctx.visible_indicator(&vp), "Failed to serialize indicator")
    }

    #[wasm_bindgen(js_name = minimapClick)]
    pub fn minimap_click(
        &self,
        client_y: f32,
        surface_top: f32,
        internal_scroll: f32,
        in_panel: bool,
        scroll_top: f32,
        height: f32,
    ) -> Result<JsValue, JsValue> {
        let vp = viewport(in_panel, scroll_top, height);
        serialize(
            &self.ctx.minimap_click(client_y, surface_top, internal_scroll, &vp),
            "Failed to serialize scroll request",
        )
    }

    #[wasm_bindgen(js_name = scrollToVerse)]
    pub fn scroll_to_verse(&self, verse: u32, in_panel: bool, scroll_top: f32, height: f32) -> Result<JsValue, JsValue> {
        let vp = viewport(in_panel, scroll_top, height);
        serialize(&self.ctx.scroll_to_verse(verse, &vp), "Failed to serialize scroll request")
    }

    /// Scroll or resize trigger; true when a frame must be requested
    #[wasm_bindgen(js_name = requestFrame)]
    pub fn request_frame(&mut self) -> bool {
        self.ctx.request_frame()
    }

    /// Frame callback; `panel` is the minimap panel's scroll state
    #[wasm_bindgen(js_name = runFrame)]
    pub fn run_frame(
        &mut self,
        in_panel: bool,
        scroll_top: f32,
        height: f32,
        panel: JsValue,
    ) -> Result<JsValue, JsValue> {
        let vp = viewport(in_panel, scroll_top, height);
        let panel: MinimapPanel = deserialize_or_default(panel, "Invalid minimap panel state")?;
        serialize(&self.ctx.run_frame(&vp, &panel), "Failed to serialize frame update")
    }

    // ------------------------------------------------------------------
    // Frequency panel
    // ------------------------------------------------------------------

    /// Apply stored section limits; unreadable entries take the default
    #[wasm_bindgen(js_name = setSectionLimits)]
    pub fn set_section_limits(&mut self, limits: JsValue, show_all: bool) -> Result<(), JsValue> {
        let limits = if show_all {
            SectionLimits::expanded()
        } else {
            let value: serde_json::Value = deserialize_or_default(limits, "Invalid section limits")?;
            SectionLimits::from_value(&value)
        };
        self.ctx.set_section_limits(limits);
        Ok(())
    }

    #[wasm_bindgen(js_name = frequencySection)]
    pub fn frequency_section(&self, section: &str) -> Result<JsValue, JsValue> {
        let section = section_from_key(section)?;
        serialize(&self.ctx.frequency_section(section), "Failed to serialize section")
    }

    #[wasm_bindgen(js_name = chartSeries)]
    pub fn chart_series(&self, section: &str) -> Result<JsValue, JsValue> {
        let section = section_from_key(section)?;
        let points: Vec<ChartPoint> = self
            .ctx
            .chart_series(section)
            .into_iter()
            .map(|(root, value)| ChartPoint { root, value })
            .collect();
        serialize(&points, "Failed to serialize chart")
    }

    #[wasm_bindgen(js_name = rootMeasures)]
    pub fn root_measures(&self, root: &str) -> Result<JsValue, JsValue> {
        serialize(&self.ctx.root_measures(root), "Failed to serialize measures")
    }

    #[wasm_bindgen(js_name = timings)]
    pub fn timings(&self) -> Result<JsValue, JsValue> {
        serialize(&self.ctx.timings(), "Failed to serialize timings")
    }
}
