//! Tree tokenizer
//!
//! Walks the rendered text tree in document order and wraps every word in a
//! tagged unit carrying its (verse, word) coordinate. These coordinates are
//! the key space every other component uses.

pub mod tree;
pub mod tokenizer;

pub use tree::{DocNode, TaggedWord};
pub use tokenizer::{split_runs, Run, Tokenized, Tokenizer, TokenizerState};
