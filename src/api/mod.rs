//! Morphology viewer WASM API
//!
//! The JavaScript-facing surface of the crate.
//!
//! # Module Structure
//!
//! - `helpers`: logging macros, serde bridging, argument helpers
//! - `types`: serializable result shapes
//! - `view`: `AnnotationView`, the handle on one activated view
//! - `text`: stateless script and statistics exports

pub mod helpers;
pub mod types;
pub mod view;
pub mod text;

pub use view::AnnotationView;
pub use text::*;
