//! Morphology record attached to one word coordinate

use serde::{Deserialize, Serialize};

/// Root and lemma of one word, both in target script
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MorphologyRecord {
    pub root: Option<String>,
    pub lemma: Option<String>,
}

impl MorphologyRecord {
    pub fn new(root: Option<String>, lemma: Option<String>) -> Self {
        Self { root, lemma }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none() && self.lemma.is_none()
    }

    /// Fill fields that are still empty; populated fields are never overwritten
    pub fn merge_missing(&mut self, root: Option<&str>, lemma: Option<&str>) {
        if self.root.is_none() {
            self.root = root.filter(|r| !r.is_empty()).map(str::to_string);
        }
        if self.lemma.is_none() {
            self.lemma = lemma.filter(|l| !l.is_empty()).map(str::to_string);
        }
    }
}
