use std::collections::HashMap;

use nd_core::types::truncate_chars;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::grouper::SourceGroup;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z]{4,}\b").unwrap());

/// Filler words that dominate any news corpus.
const STOPWORDS: [&str; 21] = [
    "this", "that", "with", "from", "have", "been", "will", "their", "what",
    "about", "which", "when", "make", "than", "other", "into", "could",
    "would", "should", "these", "those",
];

/// Frequency-based keyword detection over article titles and the first part
/// of their fetched content.
pub struct HotTopicDetector {
    threshold: usize,
}

impl HotTopicDetector {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Words of four letters or more that appear at least `threshold` times,
    /// most frequent first, at most ten. Ties keep encounter order.
    pub fn detect(&self, groups: &[SourceGroup]) -> Vec<String> {
        let mut corpus = Vec::new();
        for group in groups {
            for article in &group.articles {
                corpus.push(article.title.to_lowercase());
                if let Some(content) = article.content.as_deref().filter(|c| !c.is_empty()) {
                    corpus.push(truncate_chars(content, 500).to_lowercase());
                }
            }
        }
        let combined = corpus.join(" ");

        // Count alongside first-seen rank so equal counts sort deterministically.
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        let mut next_rank = 0usize;
        for word in WORD_RE.find_iter(&combined).map(|m| m.as_str()) {
            if STOPWORDS.contains(&word) {
                continue;
            }
            let entry = counts.entry(word).or_insert_with(|| {
                next_rank += 1;
                (0, next_rank)
            });
            entry.0 += 1;
        }

        let mut ranked: Vec<(&str, usize, usize)> = counts
            .into_iter()
            .map(|(word, (count, rank))| (word, count, rank))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        ranked
            .into_iter()
            .take(10)
            .filter(|(_, count, _)| *count >= self.threshold)
            .map(|(word, _, _)| word.to_string())
            .collect()
    }
}
