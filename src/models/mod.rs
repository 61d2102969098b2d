//! Models module for the morphology viewer
//!
//! This module contains the value types shared by every layer of the crate:
//! word coordinates, geometry, morphology records, configuration, errors and
//! the style patches handed back to the DOM glue.

pub mod core;
pub mod morphology;
pub mod config;
pub mod errors;
pub mod patch;

// Re-export commonly used types
pub use core::*;
pub use morphology::MorphologyRecord;
pub use config::*;
pub use errors::*;
pub use patch::*;
