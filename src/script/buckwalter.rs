//! Transliteration codec
//!
//! Single-character table between the corpus transliteration and the target
//! script. Two pairs of source characters share a target character
//! (`A`/`{` and `^`/`` ` ``), so the reverse direction keeps only the first
//! source character declared for each target character.
//!
//! Entries with an empty target are annotation-only symbols: they are
//! dropped when converting to the target script.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// (source, target) pairs in declaration order
pub const TRANSLITERATION_TABLE: &[(char, &str)] = &[
    // Hamza and alif variants
    ('\'', "\u{0621}"),
    ('>', "\u{0623}"),
    ('&', "\u{0624}"),
    ('<', "\u{0625}"),
    ('}', "\u{0626}"),
    ('A', "\u{0627}"),
    ('{', "\u{0627}"),
    // Consonants
    ('b', "\u{0628}"),
    ('p', "\u{0629}"),
    ('t', "\u{062A}"),
    ('v', "\u{062B}"),
    ('j', "\u{062C}"),
    ('H', "\u{062D}"),
    ('x', "\u{062E}"),
    ('d', "\u{062F}"),
    ('*', "\u{0630}"),
    ('r', "\u{0631}"),
    ('z', "\u{0632}"),
    ('s', "\u{0633}"),
    ('$', "\u{0634}"),
    ('S', "\u{0635}"),
    ('D', "\u{0636}"),
    ('T', "\u{0637}"),
    ('Z', "\u{0638}"),
    ('E', "\u{0639}"),
    ('g', "\u{063A}"),
    ('f', "\u{0641}"),
    ('q', "\u{0642}"),
    ('k', "\u{0643}"),
    ('l', "\u{0644}"),
    ('m', "\u{0645}"),
    ('n', "\u{0646}"),
    ('h', "\u{0647}"),
    ('w', "\u{0648}"),
    ('Y', "\u{0649}"),
    ('y', "\u{064A}"),
    // Diacritics
    ('F', "\u{064B}"),
    ('N', "\u{064C}"),
    ('K', "\u{064D}"),
    ('a', "\u{064E}"),
    ('u', "\u{064F}"),
    ('i', "\u{0650}"),
    ('~', "\u{0651}"),
    ('o', "\u{0652}"),
    ('^', "\u{0670}"),
    ('#', "\u{0654}"),
    ('`', "\u{0670}"),
    // Quranic annotation marks without a plain-script equivalent
    ('|', ""),
    (']', ""),
    ('[', ""),
    ('@', ""),
    (':', ""),
    (';', ""),
    (',', ""),
    ('.', ""),
    ('!', ""),
    ('-', ""),
    ('+', ""),
    ('%', ""),
    ('"', ""),
    ('_', ""),
];

static FORWARD: Lazy<HashMap<char, &'static str>> =
    Lazy::new(|| TRANSLITERATION_TABLE.iter().copied().collect());

static REVERSE: Lazy<HashMap<char, char>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for (source, target) in TRANSLITERATION_TABLE {
        let mut chars = target.chars();
        if let (Some(t), None) = (chars.next(), chars.next()) {
            map.entry(t).or_insert(*source);
        }
    }
    map
});

/// Convert transliterated text to the target script
pub fn to_target_script(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for c in text.chars() {
        match FORWARD.get(&c) {
            Some(target) => out.push_str(target),
            None => out.push(c),
        }
    }
    out
}

/// Convert target-script text back to the transliteration scheme
pub fn to_source_scheme(text: &str) -> String {
    text.chars()
        .map(|c| REVERSE.get(&c).copied().unwrap_or(c))
        .collect()
}

/// Source characters whose target character is shared with another entry
pub fn colliding_sources() -> Vec<char> {
    let mut by_target: HashMap<&str, Vec<char>> = HashMap::new();
    for (source, target) in TRANSLITERATION_TABLE {
        if !target.is_empty() {
            by_target.entry(target).or_default().push(*source);
        }
    }
    let mut out: Vec<char> = by_target
        .into_values()
        .filter(|sources| sources.len() > 1)
        .flatten()
        .collect();
    out.sort_unstable();
    out
}
