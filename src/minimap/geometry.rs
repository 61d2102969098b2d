//! Measured layout and the scale of the miniature
//!
//! The glue measures every tagged fragment (`getBoundingClientRect` plus the
//! scroll offset of the active container) and every verse marker, and hands
//! the result over as `LayoutMeasurements`. Everything here is a pure
//! function of those numbers.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::highlight::WordGeometry;
use crate::models::{MinimapConfig, Rect, WordCoord};

/// One tagged fragment and its document rect
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct MeasuredWord {
    #[serde(flatten)]
    pub coord: WordCoord,
    #[serde(flatten)]
    pub rect: Rect,
}

impl MeasuredWord {
    pub fn new(verse: u32, word: u32, rect: Rect) -> Self {
        Self {
            coord: WordCoord::new(verse, word),
            rect,
        }
    }
}

/// A verse marker; `verse` is the verse it closes
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct MeasuredMarker {
    pub verse: u32,
    #[serde(flatten)]
    pub rect: Rect,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutMeasurements {
    /// Tagged fragments in document order
    pub words: Vec<MeasuredWord>,
    pub markers: Vec<MeasuredMarker>,
    /// Scroll dimensions of the whole document
    pub document_width: f32,
    pub document_height: f32,
}

impl LayoutMeasurements {
    /// Identity of the tagged coordinate set, independent of positions
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.words.len().hash(&mut hasher);
        for word in &self.words {
            word.coord.hash(&mut hasher);
        }
        hasher.finish()
    }

    /// First fragment of `verse` in document order
    pub fn first_word_of(&self, verse: u32) -> Option<&MeasuredWord> {
        self.words.iter().find(|w| w.coord.verse == verse)
    }

    pub fn marker_for(&self, verse: u32) -> Option<&MeasuredMarker> {
        self.markers.iter().find(|m| m.verse == verse)
    }
}

impl WordGeometry for LayoutMeasurements {
    fn rect_of(&self, coord: WordCoord) -> Option<Rect> {
        self.words.iter().find(|w| w.coord == coord).map(|w| w.rect)
    }
}

/// Bounding box of all tagged words
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Extents {
    pub min_top: f32,
    pub min_left: f32,
    pub content_width: f32,
    pub content_height: f32,
}

impl Extents {
    /// With no words the whole document is the content
    pub fn from_measurements(m: &LayoutMeasurements) -> Self {
        if m.words.is_empty() {
            return Self {
                min_top: 0.0,
                min_left: 0.0,
                content_width: m.document_width.max(0.0),
                content_height: m.document_height.max(0.0),
            };
        }

        let mut min_top = f32::INFINITY;
        let mut min_left = f32::INFINITY;
        let mut max_bottom = f32::NEG_INFINITY;
        let mut max_right = f32::NEG_INFINITY;
        for w in &m.words {
            min_top = min_top.min(w.rect.top);
            min_left = min_left.min(w.rect.left);
            max_bottom = max_bottom.max(w.rect.bottom());
            max_right = max_right.max(w.rect.right());
        }

        Self {
            min_top,
            min_left,
            content_width: max_right - min_left,
            content_height: max_bottom - min_top,
        }
    }
}

/// Responsive minimap width for a browser viewport width
///
/// 600px and below get the minimum, 1200px and above the maximum, linear
/// (rounded to whole pixels) in between.
pub fn window_width(viewport_width: f32, config: &MinimapConfig) -> f32 {
    if viewport_width <= 600.0 {
        config.min_window_width
    } else if viewport_width >= 1200.0 {
        config.max_window_width
    } else {
        let ratio = (viewport_width - 600.0) / 600.0;
        (config.min_window_width + (config.max_window_width - config.min_window_width) * ratio)
            .round()
    }
}

/// Drawing width left inside the padded minimap container
pub fn available_width(viewport_width: f32, config: &MinimapConfig) -> f32 {
    (window_width(viewport_width, config) - config.container_padding).max(0.0)
}

/// Uniform scale of the miniature
///
/// `min(scaleX, max(minScale, (heightBudget - padding) / contentHeight))`.
/// The horizontal term always wins, so the projection never overflows the
/// drawing width even when that takes the scale below `minScale`. Degenerate
/// extents fall back to 1.
pub fn compute_scale(extents: &Extents, available_width: f32, config: &MinimapConfig) -> f32 {
    let scale_x = if extents.content_width > 0.0 {
        available_width / extents.content_width
    } else {
        f32::INFINITY
    };
    let scale_y = if extents.content_height > 0.0 {
        ((config.height_budget - config.padding) / extents.content_height).max(config.min_scale)
    } else {
        f32::INFINITY
    };

    let scale = scale_x.min(scale_y);
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}
