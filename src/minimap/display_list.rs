//! Minimap display list
//!
//! Output of a build or relayout pass. JavaScript positions one absolutely
//! placed box per entry without doing any layout of its own.

use serde::{Deserialize, Serialize};

use crate::models::WordCoord;

/// Scaled box for one tagged fragment
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MinimapMarker {
    #[serde(flatten)]
    pub coord: WordCoord,
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl MinimapMarker {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }
}

/// Verse number placed left of the verse's last word
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerseLabel {
    pub verse: u32,
    pub text: String,
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
    pub font_px: f32,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MinimapDisplayList {
    pub markers: Vec<MinimapMarker>,
    pub labels: Vec<VerseLabel>,

    /// Background of markers without a highlight
    pub default_color: String,

    pub scale: f32,

    /// Width of the drawing surface
    pub width: f32,

    /// Scaled content height
    pub height: f32,
}

/// The visible-area overlay in minimap coordinates
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorRect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl IndicatorRect {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}
