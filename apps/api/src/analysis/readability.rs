use serde::{Deserialize, Serialize};

pub const WORDS_PER_PAGE: usize = 250;
pub const MAX_RECOMMENDED_PAGES: usize = 2;
pub const LONG_SENTENCE_WORDS: usize = 25;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadabilityReport {
    pub word_count: usize,
    pub estimated_pages: usize,
    pub sentence_count: usize,
    pub average_sentence_words: f64,
    pub long_sentence_count: usize,
    pub feedback: Vec<String>,
}

/// Words per sentence, skipping empty fragments between terminators.
fn sentence_lengths(text: &str) -> Vec<usize> {
    text.split(['.', '!', '?'])
        .map(|sentence| sentence.split_whitespace().count())
        .filter(|&words| words > 0)
        .collect()
}

pub fn analyze_readability(text: &str) -> ReadabilityReport {
    let word_count = text.split_whitespace().count();
    let estimated_pages = word_count.div_ceil(WORDS_PER_PAGE);

    let lengths = sentence_lengths(text);
    let sentence_count = lengths.len();
    let long_sentence_count = lengths
        .iter()
        .filter(|&&words| words > LONG_SENTENCE_WORDS)
        .count();
    let average_sentence_words = if sentence_count > 0 {
        let total: usize = lengths.iter().sum();
        ((total as f64 / sentence_count as f64) * 10.0).round() / 10.0
    } else {
        0.0
    };

    let mut feedback = Vec::new();
    if estimated_pages > MAX_RECOMMENDED_PAGES {
        feedback.push(format!(
            "Your resume is {estimated_pages} pages long. Consider shortening it to 1-2 pages."
        ));
    }
    if long_sentence_count > 0 {
        feedback.push(format!(
            "You have {long_sentence_count} long sentences. Consider shortening them for better readability."
        ));
    }

    ReadabilityReport {
        word_count,
        estimated_pages,
        sentence_count,
        average_sentence_words,
        long_sentence_count,
        feedback,
    }
}
