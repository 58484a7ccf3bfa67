//! Mention pattern tables.
//!
//! Title, honorific, and deictic reference forms are data: each table is
//! a list of `(name, regex)` pairs iterated uniformly, so a new
//! parliamentary convention is a new row, not new branching logic.
//!
//! Deictic patterns are matched first and their spans take precedence:
//! a standard-pattern span overlapping a deictic span is discarded
//! before deduplication ("my honourable friend" must never resolve as
//! an honorific-plus-name form).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::MentionClass;

/// A candidate reference span found by the pattern layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSpan {
    /// Name of the pattern that produced the span.
    pub pattern: &'static str,
    /// Standard (index-resolvable) or deictic (context-resolvable).
    pub class: MentionClass,
    /// Byte offset of the span start in the segment text.
    pub start: usize,
    /// Byte offset one past the span end.
    pub end: usize,
    /// The matched text.
    pub text: String,
}

impl CandidateSpan {
    /// Whether two spans overlap.
    #[must_use]
    pub fn overlaps(&self, other: &CandidateSpan) -> bool {
        !(self.end <= other.start || other.end <= self.start)
    }
}

/// Capitalized word run: "Cat Island, Rum Cay and San Salvador",
/// "Foreign Affairs", "Fred Mitchell".
const TITLE_RUN: &str = r"[A-Z][A-Za-z']*(?:(?:,?\s+(?:and\s+)?|\s+)[A-Z][A-Za-z']*)*";

/// Standard (direct) reference patterns.
pub static STANDARD_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        (
            "member-for",
            Regex::new(&format!(
                r"\b(?:[Tt]he\s+)?(?:[Hh]onou?rable\s+)?[Mm]ember\s+for\s+(?:{TITLE_RUN})"
            ))
            .unwrap(),
        ),
        (
            "minister-of",
            Regex::new(&format!(
                r"\b(?:[Tt]he\s+)?Minister\s+(?:of|for)\s+(?:{TITLE_RUN})"
            ))
            .unwrap(),
        ),
        (
            "honourable-name",
            Regex::new(&format!(
                r"\b(?:[Tt]he\s+)?Hon(?:ou?rable|\.)\s+({TITLE_RUN})"
            ))
            .unwrap(),
        ),
        (
            "prime-minister",
            Regex::new(r"(?i)\b(?:the\s+)?(?:deputy\s+)?prime\s+minister\b").unwrap(),
        ),
        (
            "president",
            Regex::new(r"(?i)\b(?:the\s+)?president\b").unwrap(),
        ),
        (
            "leader-of-opposition",
            Regex::new(r"(?i)\b(?:the\s+)?leader\s+of\s+the\s+opposition\b").unwrap(),
        ),
        (
            "speaker-address",
            Regex::new(r"\b(?:Mr\.?|Madam|Madame)\s+Speaker\b").unwrap(),
        ),
    ]
});

/// Deictic (anaphoric) reference patterns. Matched first; their spans
/// suppress overlapping standard spans.
pub static DEICTIC_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        (
            "who-just-spoke",
            Regex::new(
                r"(?i)\b(?:the\s+)?(?:honou?rable\s+)?(?:member|gentleman|lady)\s+who\s+(?:just\s+)?spoke\b",
            )
            .unwrap(),
        ),
        (
            "previous-speaker",
            Regex::new(r"(?i)\b(?:the\s+)?previous\s+speaker\b").unwrap(),
        ),
        (
            "opposite",
            Regex::new(
                r"(?i)\b(?:the\s+)?(?:honou?rable\s+)?(?:member|gentleman|lady)\s+opposite\b",
            )
            .unwrap(),
        ),
        (
            "my-friend",
            Regex::new(r"(?i)\bmy\s+(?:honou?rable\s+)?friend(?:\s+opposite)?\b").unwrap(),
        ),
        (
            "my-colleague",
            Regex::new(r"(?i)\bmy\s+colleague\b").unwrap(),
        ),
    ]
});

/// Procedural event patterns (points of order).
pub static POINT_OF_ORDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:i\s+rise\s+on\s+(?:a\s+)?)?point\s+of\s+order\b").unwrap()
});

/// Patterns subject to the nationality-qualifier guard.
const NATIONALITY_GUARDED: &[&str] = &["prime-minister", "president"];

/// Demonym suffixes: Canadian, Jamaican, Chinese, British, French, …
const DEMONYM_SUFFIXES: &[&str] = &["ian", "ean", "ese", "ish", "can", "ch", "an"];

/// Words that carry a demonym suffix but are not demonyms.
const NOT_DEMONYMS: &[&str] = &[
    "which", "such", "much", "each", "then", "when", "than", "an", "can", "man",
    "woman", "mean", "clean",
];

/// Captured honorific-name heads already covered by dedicated patterns.
const HONORIFIC_TITLE_HEADS: &[&str] = &[
    "Member", "Minister", "Gentleman", "Lady", "Prime", "Deputy", "Speaker",
    "Leader", "President", "House",
];

/// Whether the word immediately preceding `start` marks a foreign
/// official ("Canadian prime minister"). The home demonym never
/// triggers the guard.
fn foreign_qualifier(text: &str, start: usize, home_demonym: &str) -> bool {
    let before = &text[..start];
    let Some(word) = before
        .split_whitespace()
        .last()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
    else {
        return false;
    };
    if word.is_empty() || word.eq_ignore_ascii_case(home_demonym) {
        return false;
    }
    let lower = word.to_lowercase();
    if NOT_DEMONYMS.contains(&lower.as_str()) {
        return false;
    }
    lower.len() >= 4 && DEMONYM_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

/// Run both pattern tables over a segment text.
///
/// Deictic spans are collected first; standard spans overlapping them
/// are discarded, and nationality-guarded standard spans preceded by a
/// foreign demonym are excluded entirely. The result is unsorted and
/// may still contain overlaps within a class; the extractor
/// deduplicates.
#[must_use]
pub fn detect_spans(text: &str, home_demonym: &str) -> Vec<CandidateSpan> {
    let mut spans: Vec<CandidateSpan> = Vec::new();

    for (name, regex) in DEICTIC_PATTERNS.iter() {
        for m in regex.find_iter(text) {
            spans.push(CandidateSpan {
                pattern: *name,
                class: MentionClass::Deictic,
                start: m.start(),
                end: m.end(),
                text: m.as_str().to_string(),
            });
        }
    }
    let deictic_count = spans.len();

    for (name, regex) in STANDARD_PATTERNS.iter() {
        for m in regex.find_iter(text) {
            if NATIONALITY_GUARDED.contains(name) && foreign_qualifier(text, m.start(), home_demonym)
            {
                continue;
            }
            if *name == "honourable-name" {
                // "The Honourable Member for X" belongs to member-for;
                // skip honorific captures whose head is a title word.
                let captured = regex
                    .captures(&text[m.start()..m.end()])
                    .and_then(|c| c.get(1))
                    .map(|g| g.as_str())
                    .unwrap_or_default();
                let head = captured.split_whitespace().next().unwrap_or_default();
                if HONORIFIC_TITLE_HEADS.contains(&head) {
                    continue;
                }
            }
            let candidate = CandidateSpan {
                pattern: *name,
                class: MentionClass::Standard,
                start: m.start(),
                end: m.end(),
                text: m.as_str().to_string(),
            };
            // Deictic forms take precedence over anything they overlap.
            if spans[..deictic_count]
                .iter()
                .any(|d| d.overlaps(&candidate))
            {
                continue;
            }
            spans.push(candidate);
        }
    }

    spans
}

/// Keep a maximal set of non-overlapping spans: sort by start offset
/// then descending length, keep a span only if it does not overlap a
/// previously kept one.
#[must_use]
pub fn deduplicate(mut spans: Vec<CandidateSpan>) -> Vec<CandidateSpan> {
    spans.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then((b.end - b.start).cmp(&(a.end - a.start)))
    });
    let mut kept: Vec<CandidateSpan> = Vec::new();
    for span in spans {
        if !kept.iter().any(|k| k.overlaps(&span)) {
            kept.push(span);
        }
    }
    kept
}
