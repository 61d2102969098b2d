//! Morphology Viewer WASM Module
//!
//! Annotates rendered verse text with root and lemma data from a tagged
//! corpus, and keeps a scaled minimap of the word layout in sync with the
//! scroll position. JavaScript owns the DOM; this crate computes what to
//! change and hands back style patches, scroll requests and display lists.

pub mod models;
pub mod script;
pub mod parse;
pub mod morphology;
pub mod tokenize;
pub mod highlight;
pub mod minimap;
pub mod regions;
pub mod stats;
pub mod view;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use models::core::*;
pub use models::{MorphologyRecord, StylePatch, ViewerConfig};
pub use morphology::MorphologyIndex;
pub use view::ViewContext;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // A second init (module re-instantiated on the same page) keeps the
    // first logger.
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Morphology viewer WASM module initialized");
}
