//! Viewer configuration
//!
//! Deserialized from a plain JS object when the view is constructed. Every
//! field is optional on the JS side; missing fields take the defaults below.

use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use crate::highlight::color::Rgb;
use crate::stats::SectionLimits;

/// Pastel swatches used for pinned roots, in allocation order
pub const DEFAULT_PALETTE: [&str; 30] = [
    "#FFE5E5", "#E5F3FF", "#E5FFE5", "#FFF5E5", "#F0E5FF",
    "#FFE5F5", "#E5FFFF", "#FFFFE5", "#FFE5CC", "#E5E5FF",
    "#FFCCE5", "#E5FFCC", "#CCE5FF", "#FFCCCC", "#E5E5CC",
    "#FFE5FF", "#CCFFE5", "#E5CCFF", "#FFCCFF", "#CCFFCC",
    "#FFE5D4", "#D4E5FF", "#E5FFD4", "#FFD4E5", "#D4FFE5",
    "#E5D4FF", "#FFD4CC", "#CCE5E5", "#E5CCE5", "#CCFFE5",
];

/// Corpus word-numbering correction
///
/// Whenever a segment's surface text starts with `surface_prefix`, every later
/// word of the same verse-group is shifted by one position.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriftRule {
    pub surface_prefix: String,
}

impl Default for DriftRule {
    fn default() -> Self {
        Self {
            surface_prefix: "ya`".to_string(),
        }
    }
}

/// Minimap sizing parameters
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MinimapConfig {
    /// Vertical budget of the drawing area in pixels
    pub height_budget: f32,

    /// Subtracted from the height budget before computing the vertical scale
    pub padding: f32,

    /// Floor of the vertical scale term
    pub min_scale: f32,

    /// Horizontal padding of the minimap container (both sides together)
    pub container_padding: f32,

    /// Minimum height of the visible-area indicator
    pub min_visible_height: f32,

    /// Largest font size tried for verse labels
    pub label_max_font_px: f32,

    /// Smallest font size verse labels shrink to
    pub label_min_font_px: f32,

    /// Minimum verse label width
    pub label_min_width_px: f32,

    /// Horizontal padding added around the measured label text
    pub label_padding_px: f32,

    /// Minimap width on narrow viewports (600px and below)
    pub min_window_width: f32,

    /// Minimap width on wide viewports (1200px and above)
    pub max_window_width: f32,

    /// Gap kept above the first word when scrolling to a verse
    pub verse_scroll_margin_px: f32,

    /// Margin kept around the indicator when the minimap scrolls to follow it
    pub follow_margin_px: f32,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            height_budget: 400.0,
            padding: 20.0,
            min_scale: 0.3,
            container_padding: 12.0,
            min_visible_height: 10.0,
            label_max_font_px: 8.0,
            label_min_font_px: 3.0,
            label_min_width_px: 12.0,
            label_padding_px: 4.0,
            min_window_width: 120.0,
            max_window_width: 180.0,
            verse_scroll_margin_px: 24.0,
            follow_margin_px: 12.0,
        }
    }
}

/// Complete viewer configuration
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    /// Highlight palette (hex `#rrggbb`)
    pub palette: Vec<String>,

    /// Background of minimap markers that carry no highlight
    pub minimap_default_color: String,

    /// Word-index correction; `None` trusts corpus numbering as-is
    pub drift: Option<DriftRule>,

    pub minimap: MinimapConfig,

    /// Distance from the viewport top at which a selected word is placed
    pub selection_anchor_px: f32,

    /// Element classes the tokenizer never descends into
    pub excluded_classes: Vec<String>,

    /// Thickness of one search-region stratum
    pub overlay_band_px: f32,

    /// Display limits for the frequency sections
    pub section_limits: SectionLimits,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
            minimap_default_color: "#ccc".to_string(),
            drift: Some(DriftRule::default()),
            minimap: MinimapConfig::default(),
            selection_anchor_px: 120.0,
            excluded_classes: vec!["morph-word".to_string()],
            overlay_band_px: 2.0,
            section_limits: SectionLimits::default(),
        }
    }
}

impl ViewerConfig {
    /// Reject configurations the engines cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        for swatch in &self.palette {
            Rgb::from_hex(swatch)?;
        }

        let positives = [
            ("minimap.heightBudget", self.minimap.height_budget),
            ("minimap.minScale", self.minimap.min_scale),
            ("minimap.labelMaxFontPx", self.minimap.label_max_font_px),
            ("minimap.labelMinFontPx", self.minimap.label_min_font_px),
            ("overlayBandPx", self.overlay_band_px),
        ];
        for (name, value) in positives {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ViewerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ViewerConfig =
            serde_json::from_str(r#"{"selectionAnchorPx": 80, "drift": null}"#).unwrap();
        assert_eq!(config.selection_anchor_px, 80.0);
        assert!(config.drift.is_none());
        assert_eq!(config.palette.len(), 30);
        assert_eq!(config.minimap.min_scale, 0.3);
    }

    #[test]
    fn test_rejects_bad_palette() {
        let config = ViewerConfig {
            palette: vec!["red".to_string()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Palette(_))));

        let empty = ViewerConfig {
            palette: vec![],
            ..Default::default()
        };
        assert_eq!(empty.validate(), Err(ConfigError::EmptyPalette));
    }

    #[test]
    fn test_rejects_zero_budget() {
        let mut config = ViewerConfig::default();
        config.minimap.height_budget = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "minimap.heightBudget", .. })
        ));
    }
}
