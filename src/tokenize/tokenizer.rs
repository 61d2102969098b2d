//! Coordinate assignment over the presentation tree
//!
//! State carried through the walk:
//! - `verse`: verse the next word belongs to (starts at 1)
//! - `word`: position the next word gets (starts at 1)
//! - `active`: a word is being emitted and has not been closed yet
//!
//! A verse marker carries the number of the verse that is ending, so text
//! after it belongs to `ordinal + 1`. A word closes (position advances once)
//! on whitespace or at a block boundary, which lets one word be split over
//! several adjacent spans and still get a single position.

use crate::models::WordCoord;
use crate::script::{has_script_letter, parse_ordinal};

use super::tree::{DocNode, TaggedWord};

/// Continuation state of the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerState {
    pub verse: u32,
    pub word: u32,
    pub active: bool,
}

impl Default for TokenizerState {
    fn default() -> Self {
        Self {
            verse: 1,
            word: 1,
            active: false,
        }
    }
}

impl TokenizerState {
    /// Advance past the in-progress word, if any
    pub fn close_word(self) -> Self {
        if self.active {
            Self {
                word: self.word + 1,
                active: false,
                ..self
            }
        } else {
            self
        }
    }

    /// Start numbering the verse after `ordinal`
    pub fn after_marker(self, ordinal: u32) -> Self {
        Self {
            verse: ordinal.saturating_add(1),
            word: 1,
            active: false,
        }
    }

    pub fn coord(&self) -> WordCoord {
        WordCoord::new(self.verse, self.word)
    }
}

/// A maximal run of whitespace or non-whitespace characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Run<'a> {
    Space(&'a str),
    Word(&'a str),
}

/// Split text into alternating whitespace / non-whitespace runs
pub fn split_runs(text: &str) -> Vec<Run<'_>> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (i, c) in text.char_indices() {
        let is_space = c.is_whitespace();
        match current {
            Some(prev) if prev == is_space => {}
            Some(prev) => {
                runs.push(make_run(&text[start..i], prev));
                start = i;
                current = Some(is_space);
            }
            None => current = Some(is_space),
        }
    }
    if let Some(prev) = current {
        runs.push(make_run(&text[start..], prev));
    }
    runs
}

fn make_run(slice: &str, is_space: bool) -> Run<'_> {
    if is_space {
        Run::Space(slice)
    } else {
        Run::Word(slice)
    }
}

/// Whether a non-whitespace run is indexable
///
/// Punctuation, numerals and other fragments without target-script letters
/// stay plain text.
fn is_indexable(run: &str) -> bool {
    has_script_letter(run)
}

/// Output of one tokenizer pass
#[derive(Debug, Clone, PartialEq)]
pub struct Tokenized {
    pub root: DocNode,
    /// Coordinates of the tagged units created by this pass, in document order
    pub created: Vec<WordCoord>,
    pub state: TokenizerState,
}

pub struct Tokenizer {
    excluded_classes: Vec<String>,
}

impl Tokenizer {
    pub fn new(excluded_classes: Vec<String>) -> Self {
        Self { excluded_classes }
    }

    /// Tokenize a whole verse-group tree
    pub fn tokenize(&self, root: DocNode) -> Tokenized {
        let mut created = Vec::new();
        let (mut nodes, state) = self.visit(root, TokenizerState::default(), &mut created);

        let root = if nodes.len() == 1 {
            nodes.remove(0)
        } else {
            DocNode::element("#fragment", nodes)
        };

        log::debug!(
            "tokenized {} word units, last verse {}",
            created.len(),
            state.verse
        );
        Tokenized { root, created, state }
    }

    fn is_excluded(&self, classes: &[String]) -> bool {
        classes.iter().any(|c| self.excluded_classes.contains(c))
    }

    /// Visit one node, returning its replacement nodes and the new state
    fn visit(
        &self,
        node: DocNode,
        state: TokenizerState,
        created: &mut Vec<WordCoord>,
    ) -> (Vec<DocNode>, TokenizerState) {
        match node {
            DocNode::Text { text } => self.visit_text(&text, state, created),

            DocNode::VerseMarker { text } => {
                let next = match parse_ordinal(&text) {
                    Some(ordinal) => state.after_marker(ordinal),
                    None => state,
                };
                (vec![DocNode::VerseMarker { text }], next)
            }

            DocNode::Word(word) => (vec![DocNode::Word(word)], state),

            DocNode::Block { classes, children } => {
                let state = state.close_word();
                if self.is_excluded(&classes) {
                    return (vec![DocNode::Block { classes, children }], state);
                }
                let (children, state) = self.visit_children(children, state, created);
                (vec![DocNode::Block { classes, children }], state.close_word())
            }

            DocNode::Element { tag, classes, children } => {
                if self.is_excluded(&classes) {
                    return (vec![DocNode::Element { tag, classes, children }], state);
                }
                let (children, state) = self.visit_children(children, state, created);
                (vec![DocNode::Element { tag, classes, children }], state)
            }
        }
    }

    fn visit_children(
        &self,
        children: Vec<DocNode>,
        mut state: TokenizerState,
        created: &mut Vec<WordCoord>,
    ) -> (Vec<DocNode>, TokenizerState) {
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            let (nodes, next) = self.visit(child, state, created);
            out.extend(nodes);
            state = next;
        }
        (out, state)
    }

    fn visit_text(
        &self,
        text: &str,
        mut state: TokenizerState,
        created: &mut Vec<WordCoord>,
    ) -> (Vec<DocNode>, TokenizerState) {
        let mut out = Vec::new();
        for run in split_runs(text) {
            match run {
                Run::Space(space) => {
                    state = state.close_word();
                    out.push(DocNode::text(space));
                }
                Run::Word(word) if is_indexable(word) => {
                    created.push(state.coord());
                    out.push(DocNode::Word(TaggedWord {
                        verse: state.verse,
                        word: state.word,
                        text: word.to_string(),
                    }));
                    state.active = true;
                }
                Run::Word(plain) => out.push(DocNode::text(plain)),
            }
        }
        (out, state)
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(vec!["morph-word".to_string()])
    }
}
