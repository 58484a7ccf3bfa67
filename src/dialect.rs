//! Dialect and honorific normalization for transcript text.
//!
//! Debate transcripts arrive with Bahamian Creole phonology baked in by
//! the transcription stage: TH-stopping ("da Memba for Cat Island") and
//! vowel shifts in place names ("Englaston" for "Englerston"). Alias
//! lookups normalize these to the standard forms the registry stores,
//! and strip parliamentary honorific prefixes that carry no identity
//! signal.
//!
//! Replacements preserve the capitalization pattern of the matched word
//! so surrounding text stays readable in logs and context windows.

use once_cell::sync::Lazy;
use regex::Regex;

/// TH-stopped word → standard form.
const TH_STOPPING: &[(&str, &str)] = &[
    ("da", "the"),
    ("dat", "that"),
    ("dem", "them"),
    ("dey", "they"),
    ("dis", "this"),
    ("dere", "there"),
    ("den", "then"),
    ("dese", "these"),
    ("dose", "those"),
    ("memba", "member"),
    ("memba's", "member's"),
    ("membas", "members"),
];

/// Vowel-shifted place-name fragment → standard spelling.
const VOWEL_SHIFTS: &[(&str, &str)] = &[
    ("englaston", "englerston"),
    ("carmikle", "carmichael"),
    ("killarny", "killarney"),
];

/// Normalize TH-stopped words to their standard forms, word by word.
#[must_use]
pub fn normalize_th_stopping(text: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    text.split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            match TH_STOPPING.iter().find(|(from, _)| *from == lower) {
                Some((_, to)) => match_case(word, to),
                None => word.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

static VOWEL_SHIFT_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    VOWEL_SHIFTS
        .iter()
        .map(|(variant, standard)| {
            (
                Regex::new(&format!("(?i){}", regex::escape(variant))).unwrap(),
                *standard,
            )
        })
        .collect()
});

/// Normalize vowel-shifted place names, preserving case.
#[must_use]
pub fn normalize_vowel_shifts(text: &str) -> String {
    let mut normalized = text.to_string();
    for (pattern, standard) in VOWEL_SHIFT_PATTERNS.iter() {
        normalized = pattern
            .replace_all(&normalized, |caps: &regex::Captures<'_>| {
                match_case(&caps[0], standard)
            })
            .into_owned();
    }
    normalized
}

/// Full dialect normalization: TH-stopping then vowel shifts.
#[must_use]
pub fn normalize_dialect(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    normalize_vowel_shifts(&normalize_th_stopping(text))
}

static HONORIFIC_PREFIX: Lazy<Regex> = Lazy::new(|| {
    // "The Honourable", "The Hon.", "Hon.", "my honourable friend",
    // with an optional trailing "from". "the honourable member for X"
    // keeps "member for X".
    Regex::new(
        r"(?i)^\s*(?:my\s+honou?rable\s+friend\s+|(?:the\s+)?honou?rable\s+|(?:the\s+)?hon\.?\s+)",
    )
    .expect("honorific prefix pattern is valid")
});

/// Strip a leading parliamentary honorific from a mention.
///
/// "The Honourable Member for Fox Hill" → "Member for Fox Hill",
/// "Hon. Chester Cooper" → "Chester Cooper". Text without an honorific
/// is returned unchanged.
#[must_use]
pub fn strip_honorific_prefix(text: &str) -> String {
    HONORIFIC_PREFIX.replace(text, "").trim().to_string()
}

/// Full mention normalization pipeline used by the alias resolver:
/// dialect normalization, then honorific stripping.
#[must_use]
pub fn normalize_mention(text: &str) -> String {
    strip_honorific_prefix(&normalize_dialect(text))
}

/// Re-case `replacement` to follow the capitalization of `original`.
fn match_case(original: &str, replacement: &str) -> String {
    if original.chars().all(|c| c.is_uppercase() || !c.is_alphabetic()) {
        replacement.to_uppercase()
    } else if original.chars().next().is_some_and(|c| c.is_uppercase()) {
        let mut chars = replacement.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    } else {
        replacement.to_string()
    }
}
