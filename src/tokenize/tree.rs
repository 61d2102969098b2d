//! Presentation tree model
//!
//! The JS glue serializes the verse-group container into this closed set of
//! node kinds. Superscript verse numbers become `VerseMarker`, paragraphs
//! become `Block`, spans already carrying a coordinate become `Word`.

use serde::{Deserialize, Serialize};

use crate::models::WordCoord;

/// A word fragment carrying its coordinate
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaggedWord {
    pub verse: u32,
    pub word: u32,
    pub text: String,
}

impl TaggedWord {
    pub fn coord(&self) -> WordCoord {
        WordCoord::new(self.verse, self.word)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DocNode {
    Text {
        text: String,
    },
    VerseMarker {
        text: String,
    },
    Block {
        #[serde(default)]
        classes: Vec<String>,
        #[serde(default)]
        children: Vec<DocNode>,
    },
    Element {
        tag: String,
        #[serde(default)]
        classes: Vec<String>,
        #[serde(default)]
        children: Vec<DocNode>,
    },
    Word(TaggedWord),
}

impl DocNode {
    pub fn text(text: impl Into<String>) -> Self {
        DocNode::Text { text: text.into() }
    }

    pub fn marker(text: impl Into<String>) -> Self {
        DocNode::VerseMarker { text: text.into() }
    }

    pub fn block(children: Vec<DocNode>) -> Self {
        DocNode::Block { classes: Vec::new(), children }
    }

    pub fn element(tag: impl Into<String>, children: Vec<DocNode>) -> Self {
        DocNode::Element {
            tag: tag.into(),
            classes: Vec::new(),
            children,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        match self {
            DocNode::Block { classes, .. } | DocNode::Element { classes, .. } => {
                classes.iter().any(|c| c == class)
            }
            _ => false,
        }
    }

    /// Every tagged word in document order
    pub fn tagged_words(&self) -> Vec<&TaggedWord> {
        let mut out = Vec::new();
        self.collect_words(&mut out);
        out
    }

    fn collect_words<'a>(&'a self, out: &mut Vec<&'a TaggedWord>) {
        match self {
            DocNode::Word(word) => out.push(word),
            DocNode::Block { children, .. } | DocNode::Element { children, .. } => {
                for child in children {
                    child.collect_words(out);
                }
            }
            DocNode::Text { .. } | DocNode::VerseMarker { .. } => {}
        }
    }

    /// Concatenated text content, as the DOM would report it
    pub fn text_content(&self) -> String {
        match self {
            DocNode::Text { text } | DocNode::VerseMarker { text } => text.clone(),
            DocNode::Word(word) => word.text.clone(),
            DocNode::Block { children, .. } | DocNode::Element { children, .. } => {
                children.iter().map(DocNode::text_content).collect()
            }
        }
    }
}
