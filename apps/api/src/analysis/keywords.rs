//! Keyword extractor: TF-IDF style term importance over a single resume.
//!
//! With a one-document corpus the IDF term is a constant, so ranking is driven
//! by max-normalized term frequency. Stopwords and numbers never score.

use std::collections::{BTreeSet, HashMap};

use crate::analysis::tokenizer::tokenize;

/// Terms must score above this to be reported.
pub const IMPORTANCE_THRESHOLD: f64 = 0.1;

/// English stopwords ignored by keyword extraction and keyword-overlap ATS scoring.
pub const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same", "she",
    "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
];

pub fn is_stopword(term: &str) -> bool {
    STOPWORDS.contains(&term)
}

/// Returns the salient terms of `text` (lower-cased, unique).
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    score_terms(text)
        .into_iter()
        .filter(|(_, score)| *score > IMPORTANCE_THRESHOLD)
        .map(|(term, _)| term)
        .collect()
}

/// Scores every candidate term: `(count / max_count) * idf`.
fn score_terms(text: &str) -> HashMap<String, f64> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for token in tokenize(text) {
        let term = token.to_lowercase();
        if is_stopword(&term) || term.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        *counts.entry(term).or_insert(0) += 1;
    }

    let max_count = counts.values().copied().max().unwrap_or(0);
    if max_count == 0 {
        return HashMap::new();
    }

    let idf = single_document_idf();
    counts
        .into_iter()
        .map(|(term, count)| {
            let tf = count as f64 / max_count as f64;
            (term, tf * idf)
        })
        .collect()
}

/// `1 + ln(N / (1 + df))` with N = df = 1.
fn single_document_idf() -> f64 {
    1.0 + (1.0_f64 / 2.0).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_keywords() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("the and of 2024").is_empty());
    }

    #[test]
    fn test_stopwords_and_numbers_excluded() {
        let keywords = extract_keywords("The rust service handled 500 requests with rust");
        assert!(keywords.contains("rust"));
        assert!(!keywords.contains("the"));
        assert!(!keywords.contains("with"));
        assert!(!keywords.contains("500"));
    }

    #[test]
    fn test_rare_terms_excluded_when_others_dominate() {
        let text = "kubernetes kubernetes kubernetes kubernetes kubernetes kubernetes helm";
        let keywords = extract_keywords(text);
        assert!(keywords.contains("kubernetes"));
        // 1/6 * idf ≈ 0.05, below threshold
        assert!(!keywords.contains("helm"));
    }

    #[test]
    fn test_frequent_terms_capped_by_normalization() {
        let scores = score_terms("python python python python python python python python sql");
        let top = scores["python"];
        assert!((top - single_document_idf()).abs() < 1e-9);
        assert!(top <= 1.0);
    }

    #[test]
    fn test_keywords_are_lowercase() {
        let keywords = extract_keywords("Docker DOCKER docker");
        assert_eq!(keywords, BTreeSet::from(["docker".to_string()]));
    }

    #[test]
    fn test_idf_constant_is_positive() {
        let idf = single_document_idf();
        assert!(idf > 0.3 && idf < 0.31, "idf was {idf}");
    }
}
