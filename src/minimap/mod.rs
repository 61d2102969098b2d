//! Spatial minimap engine
//!
//! Projects the measured word layout into a fixed-width drawing area with a
//! single uniform scale, and keeps the visible-area indicator in sync with
//! the scroll position in both directions (scroll moves the indicator, a
//! click on the minimap scrolls the text).
//!
//! A full build caches the measurements, extents and scale. Relayouts for a
//! new drawing width reuse the cached extents; only a change of the tagged
//! coordinate set forces a full build.

pub mod display_list;
pub mod geometry;
pub mod labels;

use serde::{Deserialize, Serialize};

use crate::models::{MinimapConfig, ScrollRequest, ViewerConfig, Viewport};
use crate::script::to_persian_digits;

pub use display_list::{IndicatorRect, MinimapDisplayList, MinimapMarker, VerseLabel};
pub use geometry::{
    available_width, compute_scale, window_width, Extents, LayoutMeasurements, MeasuredMarker,
    MeasuredWord,
};
pub use labels::{fit_font_size, label_width, DigitWidthMeasurer, TextMeasurer};

/// Scroll state of the minimap's own scrollable panel
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MinimapPanel {
    pub scroll_top: f32,
    pub client_height: f32,
    pub scroll_height: f32,
}

#[derive(Debug, Clone)]
struct GeometryCache {
    measurements: LayoutMeasurements,
    extents: Extents,
    scale: f32,
    available_width: f32,
    fingerprint: u64,
}

impl GeometryCache {
    fn scaled_height(&self) -> f32 {
        self.extents.content_height * self.scale
    }
}

pub struct MinimapEngine {
    config: MinimapConfig,
    default_color: String,
    cache: Option<GeometryCache>,
}

impl MinimapEngine {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            config: config.minimap.clone(),
            default_color: config.minimap_default_color.clone(),
            cache: None,
        }
    }

    pub fn is_built(&self) -> bool {
        self.cache.is_some()
    }

    pub fn scale(&self) -> Option<f32> {
        self.cache.as_ref().map(|c| c.scale)
    }

    pub fn extents(&self) -> Option<Extents> {
        self.cache.as_ref().map(|c| c.extents)
    }

    pub fn fingerprint(&self) -> Option<u64> {
        self.cache.as_ref().map(|c| c.fingerprint)
    }

    /// Measurements of the last full build
    pub fn measurements(&self) -> Option<&LayoutMeasurements> {
        self.cache.as_ref().map(|c| &c.measurements)
    }

    /// Full build pass over fresh measurements
    pub fn build(
        &mut self,
        measurements: LayoutMeasurements,
        available_width: f32,
        measurer: &dyn TextMeasurer,
    ) -> MinimapDisplayList {
        let extents = Extents::from_measurements(&measurements);
        let scale = compute_scale(&extents, available_width, &self.config);
        let fingerprint = measurements.fingerprint();

        log::debug!(
            "minimap build: {} fragments, {} markers, content {}x{}, scale {:.4}",
            measurements.words.len(),
            measurements.markers.len(),
            extents.content_width,
            extents.content_height,
            scale
        );

        let cache = GeometryCache {
            measurements,
            extents,
            scale,
            available_width,
            fingerprint,
        };
        let list = self.render(&cache, measurer);
        self.cache = Some(cache);
        list
    }

    /// Rescale for a new drawing width against the cached extents
    pub fn relayout(
        &mut self,
        available_width: f32,
        measurer: &dyn TextMeasurer,
    ) -> Option<MinimapDisplayList> {
        let mut cache = self.cache.take()?;
        cache.scale = compute_scale(&cache.extents, available_width, &self.config);
        cache.available_width = available_width;
        let list = self.render(&cache, measurer);
        self.cache = Some(cache);
        Some(list)
    }

    /// Relayout when the coordinate set is unchanged, full build otherwise
    pub fn update(
        &mut self,
        measurements: LayoutMeasurements,
        available_width: f32,
        measurer: &dyn TextMeasurer,
    ) -> MinimapDisplayList {
        if self.fingerprint() == Some(measurements.fingerprint()) {
            if let Some(list) = self.relayout(available_width, measurer) {
                return list;
            }
        }
        self.build(measurements, available_width, measurer)
    }

    fn render(&self, cache: &GeometryCache, measurer: &dyn TextMeasurer) -> MinimapDisplayList {
        let s = cache.scale;
        let Extents { min_top, min_left, .. } = cache.extents;
        let words = &cache.measurements.words;

        let mut markers = Vec::with_capacity(words.len());
        let mut labels = Vec::new();

        for (i, word) in words.iter().enumerate() {
            let top = (word.rect.top - min_top) * s;
            let left = (word.rect.left - min_left) * s;
            let height = (word.rect.height * s).max(1.0);
            let mut width = (word.rect.width * s).max(1.0);
            if left + width > cache.available_width {
                width = (cache.available_width - left).max(1.0);
            }

            let ends_verse = words
                .get(i + 1)
                .map_or(true, |next| next.coord.verse != word.coord.verse);
            if ends_verse {
                let text = to_persian_digits(word.coord.verse as u64);
                let room = left.max(self.config.label_min_width_px);
                let font_px = fit_font_size(&text, height, room, &self.config, measurer);
                let label_w = label_width(&text, font_px, &self.config, measurer);
                labels.push(VerseLabel {
                    verse: word.coord.verse,
                    text,
                    top,
                    left: (left - label_w).max(0.0),
                    width: label_w,
                    height,
                    font_px,
                });
            }

            markers.push(MinimapMarker {
                coord: word.coord,
                top,
                left,
                width,
                height,
            });
        }

        MinimapDisplayList {
            markers,
            labels,
            default_color: self.default_color.clone(),
            scale: s,
            width: cache.available_width,
            height: cache.scaled_height(),
        }
    }

    /// Indicator for the visible part of the document
    pub fn visible_indicator(&self, viewport: &Viewport) -> Option<IndicatorRect> {
        let cache = self.cache.as_ref()?;
        let s = cache.scale;
        let min_top = cache.extents.min_top;
        let scaled_height = cache.scaled_height();

        let top = ((viewport.scroll_top - min_top) * s).max(0.0);
        let bottom = ((viewport.bottom() - min_top) * s).min(scaled_height);
        let height = (bottom - top).max(self.config.min_visible_height);
        let top = top.min((scaled_height - height).max(0.0));

        Some(IndicatorRect {
            top,
            left: 0.0,
            width: (cache.extents.content_width * s).min(cache.available_width),
            height,
        })
    }

    /// Scroll that centers the clicked document position
    ///
    /// `client_y` is the pointer position, `surface_top` the top of the
    /// minimap container and `internal_scroll` its own scroll offset. Clicks
    /// outside the drawn content are ignored.
    pub fn click_to_scroll(
        &self,
        client_y: f32,
        surface_top: f32,
        internal_scroll: f32,
        viewport: &Viewport,
    ) -> Option<ScrollRequest> {
        let cache = self.cache.as_ref()?;
        let y = client_y - surface_top - self.config.container_padding / 2.0 + internal_scroll;
        if y < 0.0 || y > cache.scaled_height() {
            return None;
        }

        let document_y = cache.extents.min_top + y / cache.scale;
        Some(ScrollRequest::smooth(
            viewport.container,
            document_y - viewport.height / 2.0,
        ))
    }

    /// Scroll so `verse` starts just below the viewport top
    ///
    /// Uses the first fragment of the verse, or the marker closing the
    /// previous verse when the verse has no tagged word.
    pub fn scroll_to_verse(&self, verse: u32, viewport: &Viewport) -> Option<ScrollRequest> {
        let measurements = self.measurements()?;
        let top = match measurements.first_word_of(verse) {
            Some(word) => word.rect.top,
            None => measurements.marker_for(verse.checked_sub(1)?)?.rect.top,
        };
        Some(ScrollRequest::smooth(
            viewport.container,
            top - self.config.verse_scroll_margin_px,
        ))
    }

    /// New scroll offset of the minimap panel that keeps `indicator` inside
    ///
    /// `None` when the indicator is already comfortably visible.
    pub fn follow_indicator(&self, indicator: &IndicatorRect, panel: &MinimapPanel) -> Option<f32> {
        if panel.client_height <= 0.0 {
            return None;
        }
        let margin = self.config.follow_margin_px;
        let view_bottom = panel.scroll_top + panel.client_height;

        if indicator.top < panel.scroll_top + margin {
            return Some((indicator.top - margin).max(0.0));
        }
        if indicator.bottom() > view_bottom - margin {
            let max_scroll = (panel.scroll_height - panel.client_height).max(0.0);
            let next = indicator.bottom() - panel.client_height + margin;
            return Some(next.max(0.0).min(max_scroll));
        }
        None
    }
}
