//! Smoothed frequency measures
//!
//! All measures use additive smoothing with `ALPHA` over a vocabulary of
//! size `V`:
//!
//! ```text
//! p_group = (c_group + α) / (N_group + α·V)
//! p_else  = (c_else  + α) / (N_else  + α·V)
//! ratio   = p_group / p_else
//! kl      = p_group · ln(p_group / p_else)
//! q       = (c_all + α) / (N_total + α·V)
//! m       = c_group · p_group / q
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::dataset::{DatasetMeta, FrequencyDataset, GroupFrequencies, RootStat};
use crate::parse::RawSegment;
use crate::script::{normalize_arabic, to_target_script};

pub const ALPHA: f64 = 0.5;
pub const TOP_N: usize = 10;
pub const MIN_COUNT_IN_GROUP: u64 = 3;
pub const MIN_RATIO: f64 = 3.0;
pub const KL_THRESHOLD: f64 = 0.002;
pub const M_THRESHOLD: f64 = 10.0;
pub const SECTION_CAP: usize = 100;

/// Insertion-ordered counter
#[derive(Debug, Default, Clone)]
struct Counter {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl Counter {
    fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }

    fn get(&self, key: &str) -> u64 {
        self.index.get(key).map_or(0, |&i| self.entries[i].1)
    }

    fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Highest counts first; ties keep first-seen order
    fn most_common(&self, n: usize) -> Vec<(String, u64)> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }
}

/// Segment lines of a corpus, skipping blanks, comments and the header
fn corpus_segments(text: &str) -> impl Iterator<Item = RawSegment<'_>> {
    text.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("LOCATION") {
            return None;
        }
        RawSegment::split(line).ok()
    })
}

fn smoothed(count: u64, total: u64, vocab: usize) -> f64 {
    (count as f64 + ALPHA) / (total as f64 + ALPHA * vocab as f64)
}

fn sort_desc_by<F: Fn(&RootStat) -> f64>(stats: &mut [RootStat], key: F) {
    stats.sort_by(|a, b| key(b).total_cmp(&key(a)));
}

/// Derive the four ranked sections for every verse-group of a corpus
///
/// Counts are per tagged segment, as in the shipped dataset.
pub fn compute_frequency_dataset(corpus: &str) -> FrequencyDataset {
    let mut per_group: BTreeMap<u32, Counter> = BTreeMap::new();
    let mut global = Counter::default();

    for segment in corpus_segments(corpus) {
        let Some(raw_root) = segment.raw_root() else {
            continue;
        };
        let root = to_target_script(raw_root);
        per_group
            .entry(segment.location.group)
            .or_default()
            .add(&root);
        global.add(&root);
    }

    let total_global = global.total();
    let vocab = global.len();
    let mut groups = BTreeMap::new();

    for (&group, counts) in &per_group {
        let n_group = counts.total();
        let n_else = total_global - n_group;
        let rel = |cnt: u64| if n_group > 0 { cnt as f64 / n_group as f64 } else { 0.0 };

        let top_roots = counts
            .most_common(TOP_N)
            .into_iter()
            .map(|(root, cnt)| RootStat {
                rel_in_sura: Some(rel(cnt)),
                ..RootStat::new(root, cnt)
            })
            .collect();

        let mut distinctive_roots = Vec::new();
        let mut high_kl_roots = Vec::new();
        let mut n2_n_roots = Vec::new();

        for (root, cnt) in &counts.entries {
            let cnt = *cnt;
            let cnt_all = global.get(root);
            let cnt_else = cnt_all - cnt;
            let p = smoothed(cnt, n_group, vocab);
            let p_else = smoothed(cnt_else, n_else, vocab);

            if cnt >= MIN_COUNT_IN_GROUP && n_else > 0 {
                let ratio = p / p_else;
                if ratio >= MIN_RATIO {
                    distinctive_roots.push(RootStat {
                        rel_in_sura: Some(rel(cnt)),
                        rel_elsewhere: Some(cnt_else as f64 / n_else as f64),
                        ratio: Some(ratio),
                        log_ratio: Some(ratio.ln()),
                        ..RootStat::new(root.clone(), cnt)
                    });
                }
            }

            let kl = p * (p / p_else).ln();
            if kl >= KL_THRESHOLD {
                high_kl_roots.push(RootStat {
                    p_sura: Some(p),
                    p_else: Some(p_else),
                    kl: Some(kl),
                    ..RootStat::new(root.clone(), cnt)
                });
            }

            let q = smoothed(cnt_all, total_global, vocab);
            let m = cnt as f64 * p / q;
            if m >= M_THRESHOLD {
                n2_n_roots.push(RootStat {
                    global: Some(cnt_all),
                    p: Some(p),
                    q: Some(q),
                    m: Some(m),
                    ..RootStat::new(root.clone(), cnt)
                });
            }
        }

        distinctive_roots.sort_by(|a: &RootStat, b: &RootStat| {
            b.log_ratio
                .unwrap_or(0.0)
                .total_cmp(&a.log_ratio.unwrap_or(0.0))
                .then(b.count.cmp(&a.count))
        });
        sort_desc_by(&mut high_kl_roots, |s| s.kl.unwrap_or(0.0));
        high_kl_roots.truncate(SECTION_CAP);
        sort_desc_by(&mut n2_n_roots, |s| s.m.unwrap_or(0.0));
        n2_n_roots.truncate(SECTION_CAP);

        groups.insert(
            group,
            GroupFrequencies {
                total_root_tokens: Some(n_group),
                top_roots,
                distinctive_roots,
                high_kl_roots,
                n2_n_roots,
            },
        );
    }

    log::info!(
        "computed frequency sections for {} groups ({} roots, {} tokens)",
        groups.len(),
        vocab,
        total_global
    );

    FrequencyDataset {
        meta: Some(DatasetMeta {
            top_n: TOP_N,
            root_vocab_size: vocab,
            total_root_tokens: total_global,
            alpha_smoothing: ALPHA,
            min_count_in_sura: MIN_COUNT_IN_GROUP,
            min_ratio: MIN_RATIO,
        }),
        groups,
    }
}

/// Measures of one item in one verse-group
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupMetrics {
    pub rel_in_group: f64,
    pub ratio: f64,
    pub kl: f64,
    pub m: f64,
    pub p_group: f64,
    pub p_else: f64,
}

/// Measures for `c_group` hits of `c_all` total in a group of `n_group` tokens
///
/// Token totals and the vocabulary size are floored at 1.
pub fn per_group_metrics(
    c_group: u64,
    c_all: u64,
    n_group: u64,
    total_tokens: u64,
    vocabulary_size: usize,
) -> GroupMetrics {
    let vocab = vocabulary_size.max(1);
    let n_group = n_group.max(1);
    let n_total = total_tokens.max(1);
    let n_else = n_total.saturating_sub(n_group).max(1);
    let c_else = c_all.saturating_sub(c_group);

    let p_group = smoothed(c_group, n_group, vocab);
    let p_else = smoothed(c_else, n_else, vocab);
    let ratio = if p_else > 0.0 { p_group / p_else } else { 0.0 };
    let kl = if p_else > 0.0 && p_group > 0.0 {
        p_group * (p_group / p_else).ln()
    } else {
        0.0
    };
    let q = smoothed(c_all, n_total, vocab);
    let m = if q > 0.0 { c_group as f64 * p_group / q } else { 0.0 };

    GroupMetrics {
        rel_in_group: c_group as f64 / n_group as f64,
        ratio,
        kl,
        m,
        p_group,
        p_else,
    }
}

/// What a search item counts
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Root,
    #[serde(alias = "lem")]
    Lemma,
    #[serde(alias = "text")]
    Word,
}

impl ItemKind {
    pub fn from_str_lossy(value: &str) -> Self {
        match value {
            "root" => ItemKind::Root,
            "lemma" | "lem" => ItemKind::Lemma,
            _ => ItemKind::Word,
        }
    }
}

/// Token totals against which an item's counts are measured
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatsUniverse {
    pub total_tokens: u64,
    pub tokens_by_group: BTreeMap<u32, u64>,
    pub vocabulary_size: usize,
}

#[derive(Debug, Clone, Default)]
struct KindTotals {
    total: u64,
    by_group: BTreeMap<u32, u64>,
    vocabulary: Counter,
}

impl KindTotals {
    fn add(&mut self, group: u32, key: &str) {
        self.total += 1;
        *self.by_group.entry(group).or_insert(0) += 1;
        self.vocabulary.add(key);
    }

    fn universe(&self) -> StatsUniverse {
        StatsUniverse {
            total_tokens: self.total.max(1),
            tokens_by_group: self.by_group.clone(),
            vocabulary_size: self.vocabulary.len().max(1),
        }
    }
}

/// Whole-corpus token totals per item kind
#[derive(Debug, Clone, Default)]
pub struct UniverseCache {
    words: KindTotals,
    roots: KindTotals,
    lemmas: KindTotals,
}

impl UniverseCache {
    pub fn resolve(&self, kind: ItemKind) -> StatsUniverse {
        match kind {
            ItemKind::Root => self.roots.universe(),
            ItemKind::Lemma => self.lemmas.universe(),
            ItemKind::Word => self.words.universe(),
        }
    }

    /// Universe restricted to `groups`; an empty scope means the whole corpus
    pub fn resolve_scoped(&self, kind: ItemKind, groups: &[u32]) -> StatsUniverse {
        let mut universe = self.resolve(kind);
        if groups.is_empty() {
            return universe;
        }
        let scoped: u64 = groups
            .iter()
            .map(|g| universe.tokens_by_group.get(g).copied().unwrap_or(0))
            .sum();
        universe.total_tokens = scoped.max(1);
        universe
    }
}

/// Count word, root and lemma tokens of a whole corpus
///
/// Segments of one word are joined in segment order; the first root and the
/// first lemma of a word count for it.
pub fn build_universe_cache(corpus: &str) -> UniverseCache {
    struct WordAcc {
        segments: Vec<(u32, String)>,
        root: Option<String>,
        lemma: Option<String>,
    }

    let mut words: BTreeMap<(u32, u32, u32), WordAcc> = BTreeMap::new();
    for segment in corpus_segments(corpus) {
        let loc = segment.location;
        let acc = words.entry((loc.group, loc.verse, loc.word)).or_insert(WordAcc {
            segments: Vec::new(),
            root: None,
            lemma: None,
        });
        acc.segments.push((loc.segment, segment.surface.to_string()));
        if acc.root.is_none() {
            acc.root = segment.raw_root().map(to_target_script);
        }
        if acc.lemma.is_none() {
            acc.lemma = segment.raw_lemma().map(to_target_script);
        }
    }

    let mut cache = UniverseCache::default();
    for ((group, _, _), mut acc) in words {
        acc.segments.sort_by_key(|(n, _)| *n);
        let surface: String = acc.segments.iter().map(|(_, s)| s.as_str()).collect();
        let text = normalize_arabic(&to_target_script(&surface));
        if text.is_empty() {
            continue;
        }
        cache.words.add(group, &text);
        if let Some(root) = &acc.root {
            cache.roots.add(group, root);
        }
        if let Some(lemma) = &acc.lemma {
            cache.lemmas.add(group, lemma);
        }
    }
    cache
}

/// Per-group statistics row attached to a search item
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsRow {
    #[serde(alias = "sura")]
    pub group: u32,
    pub count: u64,
    #[serde(alias = "relInSura", default)]
    pub rel_in_group: f64,
    #[serde(default)]
    pub ratio: f64,
    #[serde(default)]
    pub kl: f64,
    #[serde(default)]
    pub m: f64,
}

/// One row per group that has matches, ascending by group
///
/// `match_groups` holds the group of every match.
pub fn stats_rows_for_matches(match_groups: &[u32], universe: &StatsUniverse) -> Vec<StatsRow> {
    let mut counts: BTreeMap<u32, u64> = BTreeMap::new();
    for &g in match_groups {
        *counts.entry(g).or_insert(0) += 1;
    }
    let total = match_groups.len() as u64;

    counts
        .into_iter()
        .map(|(group, count)| {
            let n_group = universe.tokens_by_group.get(&group).copied().unwrap_or(1);
            let metrics = per_group_metrics(
                count,
                total,
                n_group,
                universe.total_tokens,
                universe.vocabulary_size,
            );
            StatsRow {
                group,
                count,
                rel_in_group: metrics.rel_in_group,
                ratio: metrics.ratio,
                kl: metrics.kl,
                m: metrics.m,
            }
        })
        .collect()
}
