//! Default keyword-overlap oracle.
//!
//! Lexical relatedness proxy: both texts are reduced to sets of
//! lowercased content words (stopwords and short tokens dropped), and the
//! overlap ratio is the percentage of the reference set also present in
//! the comparison set.

use newshound_domain::traits::KeywordOracle;
use std::collections::HashSet;

/// English stopwords that delimit keyword phrases and never count as
/// content words themselves.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his",
    "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most",
    "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our",
    "ours", "out", "over", "own", "said", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours",
];

/// Stopword-filtered word-set overlap oracle.
#[derive(Debug, Clone)]
pub struct KeywordOverlap {
    stopwords: HashSet<&'static str>,
}

impl KeywordOverlap {
    /// Create an oracle with the built-in English stopword list.
    pub fn new() -> Self {
        Self {
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    /// Reduce a text to its set of content words.
    fn keyword_set(&self, text: &str) -> HashSet<String> {
        text.split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|s| s.len() >= 2)
            .map(|s| s.trim_matches('\'').to_lowercase())
            .filter(|s| s.len() >= 2 && !self.stopwords.contains(s.as_str()))
            .collect()
    }
}

impl Default for KeywordOverlap {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordOracle for KeywordOverlap {
    fn overlap_ratio(&self, reference: &str, other: &str) -> f64 {
        let reference_words = self.keyword_set(reference);
        if reference_words.is_empty() {
            return 0.0;
        }
        let other_words = self.keyword_set(other);
        let common = reference_words.intersection(&other_words).count();
        (common as f64 / reference_words.len() as f64) * 100.0
    }
}
