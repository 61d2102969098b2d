//! Error types for the boundary operations
//!
//! The core never fails hard: these errors only surface where data crosses
//! into the crate (corpus text, datasets, JS payloads, configuration), and
//! callers degrade to a reduced feature set when they see one.

use thiserror::Error;

/// Corpus or dataset could not be obtained or decoded
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LoadError {
    /// The fetch on the JS side failed (network, HTTP status)
    #[error("transport failure: {0}")]
    Transport(String),

    /// The payload arrived but could not be decoded
    #[error("decode failure: {0}")]
    Decode(String),
}

/// A cross-context search payload failed validation
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PayloadError {
    #[error("payload is not a valid search item: {0}")]
    Malformed(String),

    #[error("search item has an empty display label")]
    EmptyDisplay,

    #[error("search item has no terms")]
    NoItems,

    #[error("region {index} spans verses {start}..{end} backwards")]
    InvertedRegion { index: usize, start: u32, end: u32 },
}

/// A palette swatch is not a `#rrggbb` color
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid color '{0}' (expected #rrggbb)")]
pub struct ColorError(pub String);

/// Viewer configuration rejected at construction
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("highlight palette must not be empty")]
    EmptyPalette,

    #[error("invalid palette entry: {0}")]
    Palette(#[from] ColorError),

    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },
}
