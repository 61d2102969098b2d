//! Parsing module for the morphology corpus
//!
//! This module turns raw corpus lines into per-segment morphology records.
//! See `corpus` for the line format and the word-index drift correction.

pub mod corpus;

// Re-export commonly used types
pub use corpus::*;
