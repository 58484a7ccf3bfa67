//! Text similarity utilities for the fuzzy resolution stage.
//!
//! Provides the normalized edit-distance scorers used when a mention
//! misses the alias index: a plain Levenshtein ratio and a token-sort
//! variant that is insensitive to word order ("Davis Brave" scores 1.0
//! against "Brave Davis").

/// Compute the Levenshtein edit distance between two strings.
///
/// Operates on Unicode scalar values, not bytes.
#[must_use]
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single-row dynamic program.
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut prev = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitute = prev + usize::from(ca != cb);
            prev = row[j + 1];
            row[j + 1] = substitute.min(prev + 1).min(row[j] + 1);
        }
    }
    row[b.len()]
}

/// Normalized similarity ratio in [0.0, 1.0] from edit distance.
///
/// 1.0 = identical, 0.0 = nothing in common. Two empty strings are
/// identical.
#[must_use]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / max_len as f64
}

/// Word-order-insensitive similarity ratio in [0.0, 1.0].
///
/// Splits both strings on whitespace, sorts the tokens, rejoins, and
/// scores the result with [`similarity_ratio`]. This is the scorer the
/// fuzzy stage uses: transcript mentions frequently reorder name parts
/// ("Mitchell, Fred" vs "Fred Mitchell").
///
/// # Examples
///
/// ```
/// use chamber::similarity::token_sort_ratio;
///
/// assert!((token_sort_ratio("brave davis", "davis brave") - 1.0).abs() < 1e-9);
/// assert!(token_sort_ratio("chestor cooper", "chester cooper") > 0.85);
/// assert!(token_sort_ratio("fred mitchell", "xyz123abc") < 0.5);
/// ```
#[must_use]
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    similarity_ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_distance_basic() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("chester", "chestor"), 1);
    }

    #[test]
    fn ratio_identical_is_one() {
        assert!((similarity_ratio("brave davis", "brave davis") - 1.0).abs() < 1e-9);
        assert!((similarity_ratio("", "") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ratio_single_typo_stays_high() {
        assert!(similarity_ratio("chester cooper", "chestor cooper") > 0.9);
    }

    #[test]
    fn token_sort_ignores_word_order() {
        let forward = token_sort_ratio("fred mitchell", "mitchell fred");
        assert!((forward - 1.0).abs() < 1e-9);
    }

    #[test]
    fn token_sort_garbage_scores_low() {
        assert!(token_sort_ratio("minister of works", "qqqq zzzz") < 0.4);
    }
}
