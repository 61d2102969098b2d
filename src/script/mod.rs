//! Script handling
//!
//! Conversion between the corpus's Latin transliteration scheme and the
//! target script, plus the normalization helpers used for searching and for
//! reading verse ordinals out of rendered markers.

pub mod buckwalter;
pub mod normalize;

pub use buckwalter::{to_source_scheme, to_target_script, TRANSLITERATION_TABLE};
pub use normalize::{has_script_letter, normalize_arabic, normalize_digits_to_ascii, parse_ordinal, to_persian_digits};
