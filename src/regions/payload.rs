//! Cross-context search payloads
//!
//! The embedded search surface posts loosely shaped objects. Everything is
//! optional on the wire; `validate` turns a payload into a `SearchItemEntry`
//! or rejects it.

use serde::{Deserialize, Serialize};

use super::{Region, SearchItemEntry, SearchTerm};
use crate::models::PayloadError;
use crate::script::{normalize_digits_to_ascii, to_persian_digits};
use crate::stats::StatsRow;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchItemPayload {
    pub display: Option<String>,
    pub items: Option<Vec<SearchTerm>>,
    pub item_checked_state: Option<Vec<bool>>,
    /// Number or digit string, possibly in Persian digits
    pub distance: serde_json::Value,
    pub cross_sura: Option<bool>,
    #[serde(alias = "stats")]
    pub stats_rows: Option<Vec<StatsRow>>,
    pub search_details: Option<String>,
    pub regions: Option<Vec<Region>>,
    pub root: Option<String>,
    pub lemma: Option<String>,
    pub stats_scope_suras: Option<Vec<u32>>,
    pub prevent_duplicate: Option<bool>,
}

impl SearchItemPayload {
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        serde_json::from_str(json).map_err(|e| PayloadError::Malformed(e.to_string()))
    }

    /// Check the payload and build the entry it describes
    ///
    /// Returns the entry and whether duplicates should be suppressed.
    pub fn validate(self) -> Result<(SearchItemEntry, bool), PayloadError> {
        let items = self.items.unwrap_or_default();
        if items.is_empty() {
            return Err(PayloadError::NoItems);
        }

        let display = match self.display.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d.to_string(),
            _ => match self.root.as_deref().map(str::trim) {
                Some(r) if !r.is_empty() => r.to_string(),
                _ => return Err(PayloadError::EmptyDisplay),
            },
        };

        let mut checked = self.item_checked_state.unwrap_or_default();
        checked.resize(items.len(), true);

        let mut regions = self.regions.unwrap_or_default();
        for (index, region) in regions.iter_mut().enumerate() {
            if region.start_verse > region.end_verse {
                return Err(PayloadError::InvertedRegion {
                    index,
                    start: region.start_verse,
                    end: region.end_verse,
                });
            }
            let before = region.matches.len();
            region.matches.retain(|m| m.is_valid());
            if region.matches.len() != before {
                log::warn!(
                    "search item '{}': dropped {} invalid matches in region {}",
                    display,
                    before - region.matches.len(),
                    index
                );
            }
        }

        let entry = SearchItemEntry {
            display,
            items,
            item_checked_state: checked,
            distance: parse_distance(&self.distance),
            cross_group: self.cross_sura.unwrap_or(false),
            stats_rows: self.stats_rows.unwrap_or_default(),
            search_details: self.search_details,
            regions,
            root: self.root,
            lemma: self.lemma,
            stats_scope: self.stats_scope_suras.unwrap_or_default(),
        };
        Ok((entry, self.prevent_duplicate.unwrap_or(false)))
    }
}

/// Read a word distance from a number or a (possibly Persian) digit string
///
/// Anything unreadable counts as 0.
pub fn parse_distance(value: &serde_json::Value) -> u32 {
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        serde_json::Value::String(s) => normalize_digits_to_ascii(s)
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .unwrap_or(0),
        _ => 0,
    }
}

/// Tooltip line for a root search: root, its lemmas and the selected/total
/// occurrence counts in Persian digits
pub fn search_details_for_root(root: &str, lemmas: &[String], selected: u64, total: u64) -> String {
    format!(
        "ریشه: {} ({} [{}/{}])",
        root,
        lemmas.join("، "),
        to_persian_digits(selected),
        to_persian_digits(total)
    )
}

/// Payload for searching one root, optionally narrowed to a lemma
pub fn payload_for_root_with_lemma(
    root: &str,
    lemma: Option<&str>,
    regions: Option<Vec<Region>>,
) -> SearchItemPayload {
    SearchItemPayload {
        display: Some(root.to_string()),
        items: Some(vec![SearchTerm {
            kind: "root".to_string(),
            value: root.to_string(),
        }]),
        item_checked_state: Some(vec![true]),
        distance: serde_json::Value::from(0),
        cross_sura: Some(false),
        stats_rows: None,
        search_details: None,
        regions,
        root: Some(root.to_string()),
        lemma: lemma.map(String::from),
        stats_scope_suras: None,
        prevent_duplicate: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WordCoord;
    use serde_json::json;

    #[test]
    fn test_validate_fills_defaults() {
        let payload = SearchItemPayload::from_json(
            r#"{
                "root": "رحم",
                "items": [{"type": "root", "value": "رحم"}, {"type": "word", "value": "x"}],
                "itemCheckedState": [false],
                "distance": "۳",
                "regions": [{"sura": 1, "startAyah": 1, "endAyah": 3,
                             "matches": [{"ayah": 1, "wordIndex": 2}, {"ayah": 0, "wordIndex": 1}]}],
                "preventDuplicate": true
            }"#,
        )
        .unwrap();
        let (entry, prevent) = payload.validate().unwrap();
        assert!(prevent);
        assert_eq!(entry.display, "رحم");
        assert_eq!(entry.item_checked_state, vec![false, true]);
        assert_eq!(entry.distance, 3);
        assert_eq!(entry.regions[0].matches, vec![WordCoord::new(1, 2)]);
        assert!(!entry.cross_group);
    }

    #[test]
    fn test_validate_rejections() {
        let no_items = SearchItemPayload {
            display: Some("x".into()),
            ..Default::default()
        };
        assert_eq!(no_items.validate(), Err(PayloadError::NoItems));

        let mut blank = payload_for_root_with_lemma("r", None, None);
        blank.display = Some("  ".into());
        blank.root = None;
        assert_eq!(blank.validate(), Err(PayloadError::EmptyDisplay));

        let inverted = payload_for_root_with_lemma(
            "r",
            None,
            Some(vec![Region {
                group: 1,
                start_verse: 5,
                end_verse: 2,
                matches: vec![],
            }]),
        );
        assert_eq!(
            inverted.validate(),
            Err(PayloadError::InvertedRegion { index: 0, start: 5, end: 2 })
        );
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SearchItemPayload::from_json(r#"{"items": 3}"#),
            Err(PayloadError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_distance() {
        assert_eq!(parse_distance(&json!(4)), 4);
        assert_eq!(parse_distance(&json!("۱۲ کلمه")), 12);
        assert_eq!(parse_distance(&json!("")), 0);
        assert_eq!(parse_distance(&json!(null)), 0);
        assert_eq!(parse_distance(&json!(-2)), 0);
    }

    #[test]
    fn test_root_payload_and_details() {
        let (entry, prevent) = payload_for_root_with_lemma("علم", Some("عَلِمَ"), None)
            .validate()
            .unwrap();
        assert!(!prevent);
        assert_eq!(entry.items[0].kind, "root");
        assert_eq!(entry.item_checked_state, vec![true]);
        assert_eq!(entry.lemma.as_deref(), Some("عَلِمَ"));

        let details = search_details_for_root("علم", &["a".into(), "b".into()], 2, 15);
        assert_eq!(details, "ریشه: علم (a، b [۲/۱۵])");
    }
}
