//! Corpus line parser
//!
//! Line format (tab separated):
//!
//! ```text
//! (group:verse:word:segment)  surface  tag  FEATURES
//! ```
//!
//! `FEATURES` is a pipe-separated list; `ROOT:` and `LEM:` values run to the
//! next `|` or the end of the field. Values are in transliteration and are
//! converted to the target script here.
//!
//! The parser is stateful: it carries the drift offset that realigns corpus
//! word numbers with the tokenizer's numbering (see `DriftRule`).

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use crate::models::{DriftRule, WordCoord};
use crate::script::to_target_script;

static LOCATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\((\d+):(\d+):(\d+):(\d+)\)$").expect("location pattern"));
static ROOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\|)ROOT:([^|]+)").expect("root pattern"));
static LEMMA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\|)LEM:([^|]+)").expect("lemma pattern"));

/// Parsed `(group:verse:word:segment)` location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub group: u32,
    pub verse: u32,
    pub word: u32,
    pub segment: u32,
}

impl Location {
    pub fn parse(field: &str) -> Option<Self> {
        let caps = LOCATION_RE.captures(field.trim())?;
        let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        Some(Self {
            group: num(1)?,
            verse: num(2)?,
            word: num(3)?,
            segment: num(4)?,
        })
    }

    /// First segment of the first word of a verse
    pub fn starts_verse(&self) -> bool {
        self.word == 1 && self.segment == 1
    }
}

/// Why a line was not turned into a segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineSkip {
    TooFewFields(usize),
    BadLocation(String),
}

impl fmt::Display for LineSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineSkip::TooFewFields(n) => write!(f, "expected at least 4 fields, found {}", n),
            LineSkip::BadLocation(loc) => write!(f, "invalid location '{}'", loc),
        }
    }
}

/// One corpus line split into its fields
#[derive(Debug, Clone, PartialEq)]
pub struct RawSegment<'a> {
    pub location: Location,
    pub surface: &'a str,
    pub features: &'a str,
}

impl<'a> RawSegment<'a> {
    pub fn split(line: &'a str) -> Result<Self, LineSkip> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 4 {
            return Err(LineSkip::TooFewFields(fields.len()));
        }
        let location = Location::parse(fields[0])
            .ok_or_else(|| LineSkip::BadLocation(fields[0].trim().to_string()))?;
        Ok(Self {
            location,
            surface: fields[1].trim(),
            features: fields[3].trim(),
        })
    }

    /// Transliterated `ROOT:` value, if tagged
    pub fn raw_root(&self) -> Option<&'a str> {
        extract_feature(&ROOT_RE, self.features)
    }

    /// Transliterated `LEM:` value, if tagged
    pub fn raw_lemma(&self) -> Option<&'a str> {
        extract_feature(&LEMMA_RE, self.features)
    }
}

fn extract_feature<'a>(re: &Regex, features: &'a str) -> Option<&'a str> {
    re.captures(features)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
}

/// Morphology of one segment, positioned in tokenizer coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRecord {
    pub coord: WordCoord,
    pub root: Option<String>,
    pub lemma: Option<String>,
}

/// Line counters for one parse run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines_matched: usize,
    pub segments: usize,
    pub skipped: usize,
    pub drift_adjustments: usize,
}

/// Stateful parser for the lines of one verse-group
pub struct CorpusParser {
    prefix: String,
    drift: Option<DriftRule>,
    offset: u32,
    stats: ParseStats,
}

impl CorpusParser {
    pub fn new(group: u32, drift: Option<DriftRule>) -> Self {
        Self {
            prefix: format!("({}:", group),
            drift,
            offset: 0,
            stats: ParseStats::default(),
        }
    }

    /// Whether the line belongs to this parser's verse-group
    pub fn accepts(&self, line: &str) -> bool {
        line.trim_start().starts_with(&self.prefix)
    }

    /// Parse one line
    ///
    /// Returns `Ok(None)` for lines of other groups (and blank lines),
    /// `Err` for lines of this group that are malformed.
    pub fn parse_line(&mut self, line: &str) -> Result<Option<SegmentRecord>, LineSkip> {
        let line = line.trim_matches(|c| c == '\r' || c == '\n');
        if !self.accepts(line) {
            return Ok(None);
        }
        self.stats.lines_matched += 1;

        let segment = match RawSegment::split(line.trim_start()) {
            Ok(segment) => segment,
            Err(skip) => {
                self.stats.skipped += 1;
                return Err(skip);
            }
        };

        let loc = segment.location;
        if loc.starts_verse() {
            self.offset = 0;
        }

        let record = SegmentRecord {
            coord: WordCoord::new(loc.verse, loc.word + self.offset),
            root: segment.raw_root().map(to_target_script),
            lemma: segment.raw_lemma().map(to_target_script),
        };
        self.stats.segments += 1;

        if let Some(rule) = &self.drift {
            if !rule.surface_prefix.is_empty() && segment.surface.starts_with(&rule.surface_prefix) {
                self.offset += 1;
                self.stats.drift_adjustments += 1;
            }
        }

        Ok(Some(record))
    }

    /// Current drift offset
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> CorpusParser {
        CorpusParser::new(1, Some(DriftRule::default()))
    }

    #[test]
    fn test_location_parse() {
        let loc = Location::parse("(24:35:2:1)").unwrap();
        assert_eq!(loc, Location { group: 24, verse: 35, word: 2, segment: 1 });
        assert!(Location::parse("24:35:2:1").is_none());
        assert!(Location::parse("(24:35:2)").is_none());
    }

    #[test]
    fn test_extracts_root_and_lemma() {
        let mut p = parser();
        let record = p
            .parse_line("(1:1:1:2)\tbisomi\tN\tSTEM|POS:N|LEM:{som|ROOT:smw|M|GEN")
            .unwrap()
            .unwrap();
        assert_eq!(record.coord, WordCoord::new(1, 1));
        assert_eq!(record.root.as_deref(), Some(to_target_script("smw").as_str()));
        assert_eq!(record.lemma.as_deref(), Some(to_target_script("{som").as_str()));
    }

    #[test]
    fn test_other_groups_are_ignored() {
        let mut p = parser();
        assert_eq!(p.parse_line("(2:1:1:1)\tx\tN\tROOT:bsm"), Ok(None));
        assert_eq!(p.parse_line("(11:1:1:1)\tx\tN\tROOT:bsm"), Ok(None));
        assert_eq!(p.parse_line(""), Ok(None));
        assert_eq!(p.stats().lines_matched, 0);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let mut p = parser();
        assert_eq!(p.parse_line("(1:1:1:1)\tonly\ttwo"), Err(LineSkip::TooFewFields(3)));
        assert!(matches!(
            p.parse_line("(1:x:1:1)\ta\tb\tROOT:bsm"),
            Err(LineSkip::BadLocation(_))
        ));
        assert_eq!(p.stats().skipped, 2);
    }

    #[test]
    fn test_drift_offset_shifts_following_words() {
        let mut p = parser();
        let first = p.parse_line("(1:5:1:1)\tya`\tP\tVOC|LEM:yaA").unwrap().unwrap();
        assert_eq!(first.coord, WordCoord::new(5, 1));
        assert_eq!(p.offset(), 1);

        let second = p.parse_line("(1:5:2:1)\t>ay~uhaA\tN\tROOT:>yy").unwrap().unwrap();
        assert_eq!(second.coord, WordCoord::new(5, 3));
    }

    #[test]
    fn test_drift_offset_resets_at_new_verse() {
        let mut p = parser();
        p.parse_line("(1:5:1:1)\tya`\tP\tVOC").unwrap();
        assert_eq!(p.offset(), 1);

        let next = p.parse_line("(1:6:1:1)\tqaAla\tV\tROOT:qwl").unwrap().unwrap();
        assert_eq!(p.offset(), 0);
        assert_eq!(next.coord, WordCoord::new(6, 1));
    }

    #[test]
    fn test_drift_can_be_disabled() {
        let mut p = CorpusParser::new(1, None);
        p.parse_line("(1:5:1:1)\tya`\tP\tVOC").unwrap();
        let second = p.parse_line("(1:5:2:1)\tx\tN\tROOT:>yy").unwrap().unwrap();
        assert_eq!(second.coord, WordCoord::new(5, 2));
    }
}
