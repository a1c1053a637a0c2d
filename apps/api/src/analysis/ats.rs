//! ATS scoring: pluggable, trait-based scorer measuring how much of a job
//! description a resume covers.
//!
//! Default: `SkillVocabularyScorer` (fixed technical vocabulary on both sides).
//! Alternate: `KeywordOverlapScorer` (stopword-filtered free-text overlap).
//!
//! Both report their `strategy` so results from the two are never mixed up.

use std::collections::{BTreeSet, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::catalog::SkillVocabulary;
use crate::analysis::keywords::is_stopword;
use crate::analysis::skills::required_skills;
use crate::analysis::tokenizer::tokenize;

const MIN_OVERLAP_TERM_LEN: usize = 3;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtsStrategy {
    #[default]
    SkillVocabulary,
    KeywordOverlap,
}

impl FromStr for AtsStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skill_vocabulary" => Ok(AtsStrategy::SkillVocabulary),
            "keyword_overlap" => Ok(AtsStrategy::KeywordOverlap),
            other => Err(format!(
                "unknown ATS strategy '{other}' (expected 'skill_vocabulary' or 'keyword_overlap')"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsResult {
    pub score_percent: u32, // 0..=100
    pub found_keywords: BTreeSet<String>,
    pub missing_keywords: BTreeSet<String>,
    pub strategy: AtsStrategy,
}

impl AtsResult {
    /// Zero score; used when the job description is absent or yields nothing.
    pub fn empty(strategy: AtsStrategy) -> Self {
        Self {
            score_percent: 0,
            found_keywords: BTreeSet::new(),
            missing_keywords: BTreeSet::new(),
            strategy,
        }
    }

    /// `found = required ∩ present`, `missing = required − present`,
    /// `score = round(|found| / |required| × 100)`.
    fn from_sets(
        required: &BTreeSet<String>,
        present: impl Fn(&str) -> bool,
        strategy: AtsStrategy,
    ) -> Self {
        if required.is_empty() {
            return Self::empty(strategy);
        }

        let (found_keywords, missing_keywords): (BTreeSet<String>, BTreeSet<String>) =
            required.iter().cloned().partition(|k| present(k.as_str()));

        let score_percent =
            ((found_keywords.len() as f64 / required.len() as f64) * 100.0).round() as u32;

        Self {
            score_percent,
            found_keywords,
            missing_keywords,
            strategy,
        }
    }
}

/// What a scorer gets to look at for one resume/JD pair.
pub struct AtsInput<'a> {
    pub resume_text: &'a str,
    pub job_description: Option<&'a str>,
    /// Technical skills already detected in the resume.
    pub found_technical: &'a BTreeSet<String>,
}

impl AtsInput<'_> {
    fn job_description(&self) -> Option<&str> {
        self.job_description
            .map(str::trim)
            .filter(|jd| !jd.is_empty())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to add a scoring strategy without touching the orchestrator.
pub trait AtsScorer: Send + Sync {
    fn strategy(&self) -> AtsStrategy;

    fn score(&self, input: &AtsInput<'_>) -> AtsResult;
}

/// Returns the scorer for a strategy.
pub fn scorer_for<'a>(
    strategy: AtsStrategy,
    vocabulary: &'a SkillVocabulary,
) -> Box<dyn AtsScorer + 'a> {
    match strategy {
        AtsStrategy::SkillVocabulary => Box::new(SkillVocabularyScorer { vocabulary }),
        AtsStrategy::KeywordOverlap => Box::new(KeywordOverlapScorer),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SkillVocabularyScorer (default)
// ────────────────────────────────────────────────────────────────────────────

/// Required skills are the technical-vocabulary entries the JD mentions.
pub struct SkillVocabularyScorer<'a> {
    pub vocabulary: &'a SkillVocabulary,
}

impl AtsScorer for SkillVocabularyScorer<'_> {
    fn strategy(&self) -> AtsStrategy {
        AtsStrategy::SkillVocabulary
    }

    fn score(&self, input: &AtsInput<'_>) -> AtsResult {
        let Some(jd) = input.job_description() else {
            return AtsResult::empty(self.strategy());
        };

        let required = required_skills(&tokenize(jd), self.vocabulary);
        AtsResult::from_sets(
            &required,
            |skill| input.found_technical.contains(skill),
            self.strategy(),
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordOverlapScorer (free-text)
// ────────────────────────────────────────────────────────────────────────────

/// Required terms are the JD's distinct lower-cased tokens minus stopwords,
/// numbers and tokens shorter than 3 characters. A term is found when the
/// resume contains it as a whole token.
pub struct KeywordOverlapScorer;

impl AtsScorer for KeywordOverlapScorer {
    fn strategy(&self) -> AtsStrategy {
        AtsStrategy::KeywordOverlap
    }

    fn score(&self, input: &AtsInput<'_>) -> AtsResult {
        let Some(jd) = input.job_description() else {
            return AtsResult::empty(self.strategy());
        };

        let required: BTreeSet<String> = tokenize(jd)
            .into_iter()
            .map(str::to_lowercase)
            .filter(|term| is_overlap_term(term))
            .collect();

        let resume_terms: HashSet<String> = tokenize(input.resume_text)
            .into_iter()
            .map(str::to_lowercase)
            .collect();

        AtsResult::from_sets(
            &required,
            |term| resume_terms.contains(term),
            self.strategy(),
        )
    }
}

fn is_overlap_term(term: &str) -> bool {
    term.chars().count() >= MIN_OVERLAP_TERM_LEN
        && !is_stopword(term)
        && !term.chars().all(|c| c.is_ascii_digit())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::catalog::AnalysisCatalog;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn vocabulary_score(found: &BTreeSet<String>, jd: Option<&str>) -> AtsResult {
        let catalog = AnalysisCatalog::builtin();
        let scorer = SkillVocabularyScorer {
            vocabulary: &catalog.vocabulary,
        };
        scorer.score(&AtsInput {
            resume_text: "",
            job_description: jd,
            found_technical: found,
        })
    }

    #[test]
    fn test_missing_job_description_scores_zero() {
        let result = vocabulary_score(&set(&["Python"]), None);
        assert_eq!(result, AtsResult::empty(AtsStrategy::SkillVocabulary));
    }

    #[test]
    fn test_blank_job_description_scores_zero() {
        let result = vocabulary_score(&set(&["Python"]), Some("   "));
        assert_eq!(result.score_percent, 0);
        assert!(result.found_keywords.is_empty());
        assert!(result.missing_keywords.is_empty());
    }

    #[test]
    fn test_found_and_missing_partition_required() {
        // "AWS" and "Linux" are the only vocabulary hits in this JD
        let result = vocabulary_score(&set(&["AWS", "Python"]), Some("AWS Linux"));
        assert_eq!(result.found_keywords, set(&["AWS"]));
        assert_eq!(result.missing_keywords, set(&["Linux"]));
        assert_eq!(result.score_percent, 50);
    }

    #[test]
    fn test_found_skills_outside_required_do_not_inflate_score() {
        let result = vocabulary_score(
            &set(&["AWS", "Linux", "Python", "Java", "Rust"]),
            Some("AWS Linux"),
        );
        assert_eq!(result.score_percent, 100);
    }

    #[test]
    fn test_score_rounds() {
        let required = set(&["a", "b", "c"]);
        let found = set(&["a"]);
        let result = AtsResult::from_sets(&required, |k| found.contains(k), AtsStrategy::SkillVocabulary);
        assert_eq!(result.score_percent, 33);
        let found = set(&["a", "b"]);
        let result = AtsResult::from_sets(&required, |k| found.contains(k), AtsStrategy::SkillVocabulary);
        assert_eq!(result.score_percent, 67);
    }

    #[test]
    fn test_score_is_monotonic_in_found_required_skills() {
        let required = set(&["a", "b", "c", "d"]);
        let mut found = BTreeSet::new();
        let mut last = 0;
        for skill in ["a", "b", "c", "d"] {
            found.insert(skill.to_string());
            let result =
                AtsResult::from_sets(&required, |k| found.contains(k), AtsStrategy::SkillVocabulary);
            assert!(result.score_percent >= last);
            assert!(result.score_percent <= 100);
            last = result.score_percent;
        }
        assert_eq!(last, 100);
    }

    #[test]
    fn test_keyword_overlap_filters_stopwords_and_short_terms() {
        let found = BTreeSet::new();
        let result = KeywordOverlapScorer.score(&AtsInput {
            resume_text: "Seasoned backend engineer shipping Rust services",
            job_description: Some("We need a backend engineer with 5 years of Rust and Kafka"),
            found_technical: &found,
        });
        assert_eq!(result.strategy, AtsStrategy::KeywordOverlap);
        assert_eq!(result.found_keywords, set(&["backend", "engineer", "rust"]));
        assert_eq!(result.missing_keywords, set(&["kafka", "need", "years"]));
        assert_eq!(result.score_percent, 50);
    }

    #[test]
    fn test_keyword_overlap_requires_whole_tokens() {
        let found = BTreeSet::new();
        let result = KeywordOverlapScorer.score(&AtsInput {
            resume_text: "PostgreSQL",
            job_description: Some("SQL"),
            found_technical: &found,
        });
        assert_eq!(result.score_percent, 0);
        assert_eq!(result.missing_keywords, set(&["sql"]));
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("skill_vocabulary".parse::<AtsStrategy>(), Ok(AtsStrategy::SkillVocabulary));
        assert_eq!(" Keyword_Overlap ".parse::<AtsStrategy>(), Ok(AtsStrategy::KeywordOverlap));
        assert!("semantic".parse::<AtsStrategy>().is_err());
    }

    #[test]
    fn test_scorer_for_matches_strategy() {
        let catalog = AnalysisCatalog::builtin();
        for strategy in [AtsStrategy::SkillVocabulary, AtsStrategy::KeywordOverlap] {
            assert_eq!(scorer_for(strategy, &catalog.vocabulary).strategy(), strategy);
        }
    }
}
