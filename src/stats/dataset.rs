//! Roots-frequency dataset
//!
//! Accepted shapes:
//!
//! ```text
//! { "meta": {...}, "suras": { "1": { "top_roots": [...], ... }, ... } }
//! { "1": { "top_roots": [...], ... }, ... }
//! ```
//!
//! Section lists arrive ranked and are never re-sorted here.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{truncate, Section};
use crate::models::LoadError;
use crate::script::{has_script_letter, to_target_script};

/// One root entry of a ranked section
///
/// Only `root` and `count` are shared by all sections; the other fields are
/// present for the sections that compute them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct RootStat {
    pub root: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel_in_sura: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel_elsewhere: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_sura: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_else: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m: Option<f64>,
}

impl RootStat {
    pub fn new(root: impl Into<String>, count: u64) -> Self {
        Self {
            root: root.into(),
            count,
            ..Default::default()
        }
    }
}

/// The four sections of one verse-group
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct GroupFrequencies {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_root_tokens: Option<u64>,
    pub top_roots: Vec<RootStat>,
    pub distinctive_roots: Vec<RootStat>,
    pub high_kl_roots: Vec<RootStat>,
    #[serde(rename = "n2_N_roots")]
    pub n2_n_roots: Vec<RootStat>,
}

impl GroupFrequencies {
    pub fn section(&self, section: Section) -> &[RootStat] {
        match section {
            Section::TopRoots => &self.top_roots,
            Section::DistinctiveRoots => &self.distinctive_roots,
            Section::HighKlRoots => &self.high_kl_roots,
            Section::N2NRoots => &self.n2_n_roots,
        }
    }

    fn sections_mut(&mut self) -> [&mut Vec<RootStat>; 4] {
        [
            &mut self.top_roots,
            &mut self.distinctive_roots,
            &mut self.high_kl_roots,
            &mut self.n2_n_roots,
        ]
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct DatasetMeta {
    pub top_n: usize,
    pub root_vocab_size: usize,
    pub total_root_tokens: u64,
    pub alpha_smoothing: f64,
    pub min_count_in_sura: u64,
    pub min_ratio: f64,
}

/// A root's entry in one section, for tooltips
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionMeasure {
    pub section: Section,
    /// 1-based position within the section
    pub rank: usize,
    pub stat: RootStat,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct FrequencyDataset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<DatasetMeta>,
    #[serde(rename = "suras", default)]
    pub groups: BTreeMap<u32, GroupFrequencies>,
}

impl FrequencyDataset {
    /// Decode either accepted shape
    ///
    /// Keys that are not group numbers are ignored. Roots given in
    /// transliteration are converted to the target script so they match the
    /// morphology index.
    pub fn decode(json: &str) -> Result<Self, LoadError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| LoadError::Decode(e.to_string()))?;
        let serde_json::Value::Object(mut top) = value else {
            return Err(LoadError::Decode("frequency dataset is not an object".to_string()));
        };

        let meta = match top.remove("meta") {
            Some(meta) => Some(
                serde_json::from_value::<DatasetMeta>(meta)
                    .map_err(|e| LoadError::Decode(format!("meta: {}", e)))?,
            ),
            None => None,
        };
        let body = match top.remove("suras") {
            Some(serde_json::Value::Object(groups)) => groups,
            Some(_) => return Err(LoadError::Decode("'suras' is not an object".to_string())),
            None => top,
        };

        let mut groups = BTreeMap::new();
        for (key, value) in body {
            let Ok(group) = key.trim().parse::<u32>() else {
                log::debug!("frequency dataset: ignoring key '{}'", key);
                continue;
            };
            let mut freq: GroupFrequencies = serde_json::from_value(value)
                .map_err(|e| LoadError::Decode(format!("group {}: {}", group, e)))?;
            for section in freq.sections_mut() {
                for stat in section.iter_mut() {
                    if !has_script_letter(&stat.root) {
                        stat.root = to_target_script(&stat.root);
                    }
                }
            }
            groups.insert(group, freq);
        }

        log::info!("frequency dataset loaded: {} groups", groups.len());
        Ok(Self { meta, groups })
    }

    pub fn group(&self, group: u32) -> Option<&GroupFrequencies> {
        self.groups.get(&group)
    }

    /// A section truncated to `limit` entries
    pub fn ranked(&self, group: u32, section: Section, limit: i64) -> &[RootStat] {
        self.group(group)
            .map(|g| truncate(g.section(section), limit))
            .unwrap_or(&[])
    }

    /// (root, metric) pairs for a section chart
    pub fn chart_series(&self, group: u32, section: Section, limit: i64) -> Vec<(String, f64)> {
        self.ranked(group, section, limit)
            .iter()
            .map(|stat| (stat.root.clone(), section.metric(stat)))
            .collect()
    }

    /// Every section entry for `root` in `group`, in section order
    pub fn measures_for_root(&self, group: u32, root: &str) -> Vec<SectionMeasure> {
        let Some(freq) = self.group(group) else {
            return Vec::new();
        };
        Section::ALL
            .iter()
            .filter_map(|&section| {
                let list = freq.section(section);
                let pos = list.iter().position(|s| s.root == root)?;
                Some(SectionMeasure {
                    section,
                    rank: pos + 1,
                    stat: list[pos].clone(),
                })
            })
            .collect()
    }
}
