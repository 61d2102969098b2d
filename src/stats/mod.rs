//! Root frequency statistics
//!
//! - `dataset`: the precomputed roots-frequency JSON (four ranked sections
//!   per verse-group) and its per-section truncation
//! - `metrics`: the smoothed frequency measures behind those sections, and
//!   the per-group rows shown with search items

pub mod dataset;
pub mod metrics;

use serde::{Deserialize, Serialize};

pub use dataset::{DatasetMeta, FrequencyDataset, GroupFrequencies, RootStat, SectionMeasure};
pub use metrics::{
    build_universe_cache, compute_frequency_dataset, per_group_metrics, stats_rows_for_matches,
    GroupMetrics, ItemKind, StatsRow, StatsUniverse, UniverseCache,
};

/// Display limit used when a stored limit is missing or unreadable
pub const DEFAULT_SECTION_LIMIT: i64 = 20;

/// Limit used by the "show all" mode
pub const EXPANDED_SECTION_LIMIT: i64 = 1000;

/// One ranked section of the frequency panel
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    #[serde(rename = "top_roots")]
    TopRoots,
    #[serde(rename = "distinctive_roots")]
    DistinctiveRoots,
    #[serde(rename = "high_kl_roots")]
    HighKlRoots,
    #[serde(rename = "n2_N_roots")]
    N2NRoots,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::TopRoots,
        Section::DistinctiveRoots,
        Section::HighKlRoots,
        Section::N2NRoots,
    ];

    /// Key of the section in the dataset and in stored limits
    pub fn key(self) -> &'static str {
        match self {
            Section::TopRoots => "top_roots",
            Section::DistinctiveRoots => "distinctive_roots",
            Section::HighKlRoots => "high_kl_roots",
            Section::N2NRoots => "n2_N_roots",
        }
    }

    /// Value plotted for a root in this section's chart
    pub fn metric(self, stat: &RootStat) -> f64 {
        let value = match self {
            Section::TopRoots => Some(stat.count as f64),
            Section::DistinctiveRoots => stat.ratio,
            Section::HighKlRoots => stat.kl,
            Section::N2NRoots => stat.m,
        };
        value.unwrap_or(0.0)
    }
}

/// Resolved display limit per section; zero or negative hides the section
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct SectionLimits {
    pub top_roots: i64,
    pub distinctive_roots: i64,
    pub high_kl_roots: i64,
    #[serde(rename = "n2_N_roots")]
    pub n2_n_roots: i64,
}

impl Default for SectionLimits {
    fn default() -> Self {
        Self::uniform(DEFAULT_SECTION_LIMIT)
    }
}

impl SectionLimits {
    pub fn uniform(limit: i64) -> Self {
        Self {
            top_roots: limit,
            distinctive_roots: limit,
            high_kl_roots: limit,
            n2_n_roots: limit,
        }
    }

    pub fn expanded() -> Self {
        Self::uniform(EXPANDED_SECTION_LIMIT)
    }

    /// Read stored limits, replacing anything that is not an integer
    pub fn from_value(value: &serde_json::Value) -> Self {
        let read = |key: &str| {
            value
                .get(key)
                .and_then(serde_json::Value::as_i64)
                .unwrap_or(DEFAULT_SECTION_LIMIT)
        };
        Self {
            top_roots: read(Section::TopRoots.key()),
            distinctive_roots: read(Section::DistinctiveRoots.key()),
            high_kl_roots: read(Section::HighKlRoots.key()),
            n2_n_roots: read(Section::N2NRoots.key()),
        }
    }

    pub fn limit(&self, section: Section) -> i64 {
        match section {
            Section::TopRoots => self.top_roots,
            Section::DistinctiveRoots => self.distinctive_roots,
            Section::HighKlRoots => self.high_kl_roots,
            Section::N2NRoots => self.n2_n_roots,
        }
    }
}

/// First `limit` entries of an already ranked list
pub fn truncate<T>(ranked: &[T], limit: i64) -> &[T] {
    if limit <= 0 {
        return &[];
    }
    let n = usize::try_from(limit).unwrap_or(usize::MAX).min(ranked.len());
    &ranked[..n]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_limits_fall_back_per_key() {
        let limits = SectionLimits::from_value(&json!({
            "top_roots": 5,
            "distinctive_roots": "many",
            "n2_N_roots": 0
        }));
        assert_eq!(limits.top_roots, 5);
        assert_eq!(limits.distinctive_roots, DEFAULT_SECTION_LIMIT);
        assert_eq!(limits.high_kl_roots, DEFAULT_SECTION_LIMIT);
        assert_eq!(limits.limit(Section::N2NRoots), 0);
    }

    #[test]
    fn test_truncate() {
        let ranked = [1, 2, 3, 4];
        assert_eq!(truncate(&ranked, 2), &[1, 2]);
        assert_eq!(truncate(&ranked, 10), &[1, 2, 3, 4]);
        assert!(truncate(&ranked, 0).is_empty());
        assert!(truncate(&ranked, -3).is_empty());
    }

    #[test]
    fn test_limits_serialize_with_dataset_keys() {
        let json = serde_json::to_value(SectionLimits::expanded()).unwrap();
        assert_eq!(json["n2_N_roots"], 1000);
    }
}
