//! Text normalization helpers
//!
//! - `normalize_arabic`: folds spelling variants so search terms compare equal
//! - digit conversion between Persian, Arabic-Indic and ASCII digits
//! - `has_script_letter`: whether a fragment contains target-script letters

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];
const ARABIC_INDIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Letter block used to decide whether a fragment is a word (hamza-alif .. ya)
const LETTER_FIRST: char = '\u{0623}';
const LETTER_LAST: char = '\u{064A}';

const TATWEEL: char = '\u{0640}';
const DAGGER_ALIF: char = '\u{0670}';
const ALIF: char = '\u{0627}';
const FARSI_YEH: char = '\u{06CC}';
const KEHEH: char = '\u{06A9}';

/// True when `c` lies in the target-script letter block
pub fn is_script_letter(c: char) -> bool {
    (LETTER_FIRST..=LETTER_LAST).contains(&c)
}

/// True when `text` contains at least one target-script letter
pub fn has_script_letter(text: &str) -> bool {
    text.chars().any(is_script_letter)
}

fn is_annotation_mark(c: char) -> bool {
    matches!(c, '\u{0610}'..='\u{061A}' | '\u{064B}'..='\u{065F}' | '\u{06D6}'..='\u{06ED}')
}

/// Fold script variants for comparison
///
/// Strips tatweel, harakat and Quranic annotation marks, turns each run of
/// dagger alifs into one alif and unifies alif, hamza-carrier, ya, kaf and
/// ta-marbuta forms.
pub fn normalize_arabic(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_dagger_run = false;

    for c in text.chars() {
        if c == DAGGER_ALIF {
            if !in_dagger_run {
                out.push(ALIF);
                in_dagger_run = true;
            }
            continue;
        }
        in_dagger_run = false;

        if c == TATWEEL || is_annotation_mark(c) {
            continue;
        }

        let folded = match c {
            '\u{0623}' | '\u{0625}' | '\u{0622}' | '\u{0671}' => ALIF,
            '\u{0624}' => '\u{0648}',
            '\u{0626}' | '\u{064A}' | '\u{0649}' => FARSI_YEH,
            '\u{0643}' => KEHEH,
            '\u{0629}' => '\u{0647}',
            other => other,
        };
        out.push(folded);
    }

    out
}

/// Replace Persian and Arabic-Indic digits with ASCII digits
pub fn normalize_digits_to_ascii(text: &str) -> String {
    text.chars()
        .map(|c| {
            PERSIAN_DIGITS
                .iter()
                .position(|d| *d == c)
                .or_else(|| ARABIC_INDIC_DIGITS.iter().position(|d| *d == c))
                .and_then(|i| char::from_digit(i as u32, 10))
                .unwrap_or(c)
        })
        .collect()
}

/// Read a positive ordinal out of marker text such as `"۱۲"` or `"(12)"`
///
/// Non-digit characters are ignored. Zero and digit-free text yield `None`.
pub fn parse_ordinal(text: &str) -> Option<u32> {
    let digits: String = normalize_digits_to_ascii(text)
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}

/// Format a number with Persian digits
pub fn to_persian_digits(n: u64) -> String {
    n.to_string()
        .chars()
        .map(|c| c.to_digit(10).map(|d| PERSIAN_DIGITS[d as usize]).unwrap_or(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ordinal_variants() {
        assert_eq!(parse_ordinal("۱۲"), Some(12));
        assert_eq!(parse_ordinal("١٠"), Some(10));
        assert_eq!(parse_ordinal(" (7) "), Some(7));
        assert_eq!(parse_ordinal("۰"), None);
        assert_eq!(parse_ordinal("*"), None);
    }

    #[test]
    fn test_persian_digits() {
        assert_eq!(to_persian_digits(2024), "۲۰۲۴");
        assert_eq!(normalize_digits_to_ascii(&to_persian_digits(305)), "305");
    }

    #[test]
    fn test_has_script_letter() {
        assert!(has_script_letter("کلمه"));
        assert!(!has_script_letter("۱"));
        assert!(!has_script_letter("«»"));
        assert!(!has_script_letter("ab"));
    }

    #[test]
    fn test_normalize_folds_variants() {
        // alif with hamza, ta marbuta, harakat
        assert_eq!(normalize_arabic("أَرْضَة"), "ارضه");
        // tatweel and ya forms
        assert_eq!(normalize_arabic("هـدى"), "هدی");
    }

    #[test]
    fn test_normalize_collapses_dagger_alif_runs() {
        assert_eq!(normalize_arabic("ل\u{0670}\u{0670}ه"), "لاه");
    }
}
