//! Utility modules for the morphology viewer
//!
//! Currently only operation timing.

pub mod performance;

// Re-export commonly used types
pub use performance::*;
