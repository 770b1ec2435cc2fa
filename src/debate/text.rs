//! Word-set helpers shared by the duplicate check, the coherence checks and the judge.
//!
//! All comparisons work on lowercased, whitespace-tokenized word sets.
//! Punctuation stays attached to its word.

use std::collections::HashSet;

/// Lowercases `text` and splits it on whitespace into a set of words.
pub fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Number of words two texts have in common.
pub fn shared_words(a: &str, b: &str) -> usize {
    let a = word_set(a);
    let b = word_set(b);
    a.intersection(&b).count()
}

/// Jaccard similarity `|A ∩ B| / |A ∪ B|` of two word sets.
///
/// Two empty sets are identical and score 1.0.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Length of `text` in characters.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Returns at most `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// First sentence of `text` (up to the first period, period included),
/// capped at `max` characters.
pub fn first_sentence(text: &str, max: usize) -> String {
    let head = text.split('.').next().unwrap_or_default().trim();
    let sentence = format!("{}.", head);
    truncate_chars(&sentence, max).to_string()
}
