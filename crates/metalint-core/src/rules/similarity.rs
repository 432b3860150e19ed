//! Trigger words and description similarity for skills
//!
//! A skill's trigger words are the lowercase alphabetic tokens of its
//! description minus a fixed list of common English and boilerplate words.
//! They feed both the per-file density check (SK-006) and the cross-file
//! conflict pass (SK-010), which compares every pair of skills by the Jaccard
//! index of their trigger-word sets.

use crate::diagnostics::Diagnostic;
use crate::regex_util::static_regex;
use regex::Regex;
use std::collections::BTreeSet;

static_regex!(fn word_regex, r"[a-z]+");

/// Maximum number of shared words listed in a conflict message
const MAX_COMMON_WORDS: usize = 5;

/// Words that carry no routing signal
const STOP_WORDS: &[&str] = &[
    "use", "when", "for", "the", "and", "or", "to", "in", "on", "with", "this", "that", "is",
    "are", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will", "would",
    "could", "should", "may", "might", "must", "shall", "can", "need", "about", "into", "through",
    "during", "before", "after", "above", "below", "from", "up", "down", "out", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "all", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "just", "also", "now", "of", "a", "an", "as", "at", "by", "if", "it", "its",
    "any", "how", "what", "which", "who", "whom", "these", "those", "am", "was", "were", "you",
    "your", "they", "them", "their", "we", "our", "i", "me", "my", "he", "she", "him", "her",
    "his", "hers", "skill", "skills", "best", "practices", "patterns", "creating", "building",
    "implementing", "working", "handling", "managing", "using",
];

/// Distinct significant words of `text`, sorted
pub fn trigger_words(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    word_regex()
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|word| !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// |a ∩ b| / |a ∪ b|, or 0.0 when both sets are empty
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// SK-010: one warning per pair of descriptions at or above `threshold`.
///
/// `descriptions` is `(display name, description)` in path order; pairs are
/// reported in that order. Descriptions without trigger words are skipped.
pub fn find_conflicts(descriptions: &[(String, String)], threshold: f64) -> Vec<Diagnostic> {
    let words: Vec<(&str, BTreeSet<String>)> = descriptions
        .iter()
        .map(|(name, desc)| (name.as_str(), trigger_words(desc)))
        .filter(|(_, set)| !set.is_empty())
        .collect();

    let mut conflicts = Vec::new();
    for (i, (first, first_words)) in words.iter().enumerate() {
        for (second, second_words) in &words[i + 1..] {
            let similarity = jaccard(first_words, second_words);
            if similarity < threshold {
                continue;
            }
            let common: Vec<&str> = first_words
                .intersection(second_words)
                .take(MAX_COMMON_WORDS)
                .map(String::as_str)
                .collect();
            tracing::debug!(first, second, similarity, "description conflict");
            conflicts.push(Diagnostic::warning(
                "SK-010",
                format!(
                    "Similar descriptions: '{}' and '{}' ({:.0}% overlap, common: {})",
                    first,
                    second,
                    similarity * 100.0,
                    common.join(", ")
                ),
            ));
        }
    }
    conflicts
}
