//! Morphology index
//!
//! In-memory maps built once per page load from the corpus:
//! - `(verse, word) -> MorphologyRecord`
//! - `root -> set of (verse, word)` occurrences
//!
//! Both are populated by `MorphologyIndex::load` and treated as read-only
//! afterwards. A failed load yields an empty, unavailable index instead of an
//! error so the page keeps working without annotations.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{DriftRule, LoadError, MorphologyRecord, WordCoord};
use crate::parse::{CorpusParser, SegmentRecord};

/// Disagreement between corpus numbering and tokenizer numbering for a verse
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentWarning {
    pub verse: u32,
    /// Highest word position the corpus assigns in this verse
    pub corpus_words: u32,
    /// Highest word position the tokenizer assigned in this verse
    pub rendered_words: u32,
}

#[derive(Debug, Clone, Default)]
pub struct MorphologyIndex {
    group: Option<u32>,
    records: BTreeMap<WordCoord, MorphologyRecord>,
    roots: HashMap<String, BTreeSet<WordCoord>>,
    available: bool,
}

impl MorphologyIndex {
    /// Empty index with no data available
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index for `group` from the result of fetching the corpus
    ///
    /// A transport or decode failure is logged once and degrades to an
    /// unavailable index.
    pub fn load(group: u32, corpus: Result<&str, LoadError>, drift: Option<DriftRule>) -> Self {
        match corpus {
            Ok(text) => Self::from_corpus(group, text, drift),
            Err(err) => {
                log::error!("morphology data unavailable for group {}: {}", group, err);
                Self {
                    group: Some(group),
                    ..Self::default()
                }
            }
        }
    }

    /// Build the index for `group` from corpus text
    pub fn from_corpus(group: u32, text: &str, drift: Option<DriftRule>) -> Self {
        let mut index = Self {
            group: Some(group),
            available: true,
            ..Self::default()
        };
        let mut parser = CorpusParser::new(group, drift);

        for (line_no, line) in text.lines().enumerate() {
            match parser.parse_line(line) {
                Ok(Some(segment)) => index.insert_segment(segment),
                Ok(None) => {}
                Err(skip) => log::debug!("corpus line {} skipped: {}", line_no + 1, skip),
            }
        }

        let stats = parser.stats();
        if stats.skipped > 0 {
            log::warn!(
                "group {}: {} of {} corpus lines skipped",
                group,
                stats.skipped,
                stats.lines_matched
            );
        }
        log::info!(
            "morphology loaded for group {}: {} words, {} roots, {} drift adjustments",
            group,
            index.records.len(),
            index.roots.len(),
            stats.drift_adjustments
        );

        index
    }

    /// Add one parsed segment, honoring first-non-empty-wins per field
    pub fn insert_segment(&mut self, segment: SegmentRecord) {
        let SegmentRecord { coord, root, lemma } = segment;
        if root.is_none() && lemma.is_none() {
            return;
        }

        self.records
            .entry(coord)
            .or_default()
            .merge_missing(root.as_deref(), lemma.as_deref());

        // annotation-only roots transliterate to nothing
        if let Some(root) = root.filter(|r| !r.is_empty()) {
            self.roots.entry(root).or_default().insert(coord);
        }
    }

    /// Whether corpus data was loaded successfully
    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn group(&self) -> Option<u32> {
        self.group
    }

    pub fn record_for(&self, coord: WordCoord) -> Option<&MorphologyRecord> {
        self.records.get(&coord)
    }

    pub fn root_of(&self, coord: WordCoord) -> Option<&str> {
        self.record_for(coord).and_then(|r| r.root.as_deref())
    }

    /// Occurrences of `root`, ascending by (verse, word)
    pub fn occurrences(&self, root: &str) -> Vec<WordCoord> {
        self.roots
            .get(root)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Whether `coord` is an occurrence of `root`
    pub fn covers(&self, root: &str, coord: WordCoord) -> bool {
        self.roots.get(root).is_some_and(|set| set.contains(&coord))
    }

    pub fn occurrence_count(&self, root: &str) -> usize {
        self.roots.get(root).map_or(0, BTreeSet::len)
    }

    pub fn word_count(&self) -> usize {
        self.records.len()
    }

    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    /// Compare per-verse word counts with what the tokenizer produced
    ///
    /// `rendered` is every coordinate the tokenizer assigned. A verse is
    /// reported when the highest corpus position differs from the highest
    /// rendered position; verses missing on either side are not reported.
    pub fn alignment_warnings(&self, rendered: &[WordCoord]) -> Vec<AlignmentWarning> {
        let mut corpus_max: BTreeMap<u32, u32> = BTreeMap::new();
        for coord in self.records.keys() {
            let entry = corpus_max.entry(coord.verse).or_insert(0);
            *entry = (*entry).max(coord.word);
        }

        let mut rendered_max: BTreeMap<u32, u32> = BTreeMap::new();
        for coord in rendered {
            let entry = rendered_max.entry(coord.verse).or_insert(0);
            *entry = (*entry).max(coord.word);
        }

        let warnings: Vec<AlignmentWarning> = corpus_max
            .iter()
            .filter_map(|(verse, corpus_words)| {
                let rendered_words = *rendered_max.get(verse)?;
                (rendered_words != *corpus_words).then(|| AlignmentWarning {
                    verse: *verse,
                    corpus_words: *corpus_words,
                    rendered_words,
                })
            })
            .collect();

        for w in &warnings {
            log::warn!(
                "verse {}: corpus numbers {} words, text renders {}",
                w.verse,
                w.corpus_words,
                w.rendered_words
            );
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::to_target_script;

    const CORPUS: &str = "LOCATION\tFORM\tTAG\tFEATURES\n\
(1:1:1:1)\tbi\tP\tPREFIX|bi+\n\
(1:1:1:2)\tsomi\tN\tSTEM|POS:N|LEM:{som|ROOT:smw|M|GEN\n\
(1:1:2:1)\t{ll~ahi\tPN\tSTEM|POS:PN|LEM:{ll~ah|ROOT:Alh|GEN\n\
(1:2:1:1)\t{loHamodu\tN\tSTEM|POS:N|LEM:Hamod|ROOT:Hmd|M|NOM\n\
(1:2:2:1)\tlil~ahi\tPN\tSTEM|POS:PN|LEM:{ll~ah|ROOT:Alh|GEN\n\
(2:1:1:1)\tA^lm^\tINL\tSTEM|INL|LEM:A^lm^\n";

    #[test]
    fn test_multi_segment_word_keeps_first_values() {
        let index = MorphologyIndex::from_corpus(1, CORPUS, None);
        let record = index.record_for(WordCoord::new(1, 1)).unwrap();
        assert_eq!(record.root.as_deref(), Some(to_target_script("smw").as_str()));
        assert_eq!(record.lemma.as_deref(), Some(to_target_script("{som").as_str()));
    }

    #[test]
    fn test_root_index_collects_occurrences() {
        let index = MorphologyIndex::from_corpus(1, CORPUS, None);
        let allah = to_target_script("Alh");
        assert_eq!(
            index.occurrences(&allah),
            vec![WordCoord::new(1, 2), WordCoord::new(2, 2)]
        );
        assert_eq!(index.root_count(), 3);
    }

    #[test]
    fn test_only_selected_group_is_indexed() {
        let index = MorphologyIndex::from_corpus(2, CORPUS, None);
        assert_eq!(index.word_count(), 1);
        assert!(index.root_of(WordCoord::new(1, 1)).is_none());
    }

    #[test]
    fn test_duplicate_occurrences_are_suppressed() {
        let mut index = MorphologyIndex::new();
        for _ in 0..3 {
            index.insert_segment(SegmentRecord {
                coord: WordCoord::new(4, 4),
                root: Some("r".into()),
                lemma: None,
            });
        }
        assert_eq!(index.occurrence_count("r"), 1);
    }

    #[test]
    fn test_failed_load_degrades_to_empty_index() {
        let index = MorphologyIndex::load(1, Err(LoadError::Transport("404".into())), None);
        assert!(!index.is_available());
        assert_eq!(index.word_count(), 0);
        assert!(index.record_for(WordCoord::new(1, 1)).is_none());
    }

    #[test]
    fn test_alignment_warnings_report_mismatched_verses() {
        let index = MorphologyIndex::from_corpus(1, CORPUS, None);
        let rendered = vec![
            WordCoord::new(1, 1),
            WordCoord::new(1, 2),
            WordCoord::new(2, 1),
            WordCoord::new(2, 2),
            WordCoord::new(2, 3),
        ];
        let warnings = index.alignment_warnings(&rendered);
        assert_eq!(
            warnings,
            vec![AlignmentWarning { verse: 2, corpus_words: 2, rendered_words: 3 }]
        );
    }

    #[test]
    fn test_annotation_only_root_is_not_indexed() {
        let corpus = "(1:1:1:1)\tqaAla\tV\tSTEM|ROOT:@|LEM:qaAla\n\
(1:1:2:1)\tkataba\tV\tSTEM|ROOT:ktb|LEM:kataba\n";
        let index = MorphologyIndex::from_corpus(1, corpus, None);
        assert_eq!(index.occurrence_count(""), 0);
        assert_eq!(index.root_count(), 1);
        assert!(index.root_of(WordCoord::new(1, 1)).is_none());
    }
}
