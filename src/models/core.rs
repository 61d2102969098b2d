//! Core coordinate and geometry types
//!
//! Every component keys its data by `WordCoord`, the (verse, word) pair the
//! tokenizer assigns to rendered text. Geometry is expressed in document
//! coordinates (viewport rect plus the scroll offset of the active container).

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;

/// A 1-based (verse, word) coordinate within one verse-group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCoord {
    #[serde(alias = "ayah")]
    pub verse: u32,
    #[serde(alias = "wordIndex")]
    pub word: u32,
}

impl WordCoord {
    pub fn new(verse: u32, word: u32) -> Self {
        Self { verse, word }
    }

    /// Both components are 1-based; zero never names a real word
    pub fn is_valid(&self) -> bool {
        self.verse >= 1 && self.word >= 1
    }
}

impl fmt::Display for WordCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.verse, self.word)
    }
}

/// Axis-aligned rectangle in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f32,
    pub left: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self { top, left, width, height }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// True when the rect overlaps the vertical band [top, bottom)
    pub fn intersects_band(&self, top: f32, bottom: f32) -> bool {
        self.bottom() > top && self.top < bottom
    }
}

/// Which element scrolls the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollContainer {
    /// The browser window (single-column layout)
    #[default]
    Window,
    /// The designated content panel (desktop layout)
    ContentPanel,
}

/// Live scroll state of the active container
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub container: ScrollContainer,
    pub scroll_top: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(container: ScrollContainer, scroll_top: f32, height: f32) -> Self {
        Self { container, scroll_top, height }
    }

    pub fn bottom(&self) -> f32 {
        self.scroll_top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// Instruction for the glue to scroll a container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollRequest {
    pub container: ScrollContainer,
    pub top: f32,
    pub behavior: ScrollBehavior,
}

impl ScrollRequest {
    /// Smooth scroll to `top`, never above the document start
    pub fn smooth(container: ScrollContainer, top: f32) -> Self {
        Self {
            container,
            top: top.max(0.0),
            behavior: ScrollBehavior::Smooth,
        }
    }
}

/// Navigation direction (serialized as 1 / -1 for the JS side)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i8)]
pub enum Direction {
    Next = 1,
    Previous = -1,
}

impl Direction {
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "previous" | "prev" | "up" => Direction::Previous,
            _ => Direction::Next,
        }
    }
}
