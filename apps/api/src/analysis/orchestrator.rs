//! Analysis orchestrator. Runs every analysis stage over one resume/JD pair
//! and merges the best-effort enrichment into the final result.
//!
//! # Concurrency
//! The lexical stages are CPU-bound and run inside `tokio::task::spawn_blocking`.
//! The enrichment call is I/O-bound and awaited alongside them with `tokio::join!`.
//! Neither depends on the other; enrichment is merged last and can only degrade
//! the result, never fail it.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::analysis::ats::{scorer_for, AtsInput, AtsResult, AtsStrategy};
use crate::analysis::candidate::{extract_candidate_info, CandidateInfo};
use crate::analysis::catalog::AnalysisCatalog;
use crate::analysis::experience::{critique_experience, WorkExperienceCritique};
use crate::analysis::keywords::extract_keywords;
use crate::analysis::readability::{analyze_readability, ReadabilityReport};
use crate::analysis::sections::{segment_sections, Section, SectionMap};
use crate::analysis::skills::{match_resume_skills, SkillMatch};
use crate::analysis::suggestions::{suggest_jobs, JobSuggestion};
use crate::analysis::tokenizer::{normalize_whitespace, tokenize};
use crate::enrichment::{
    Enricher, EnrichmentError, EnrichmentPayload, Entity, KeyPhrase, Sentiment,
};
use crate::errors::AppError;

/// Characters of normalized text sent to the enrichment service.
pub const ENRICHMENT_EXCERPT_CHARS: usize = 5000;
/// Characters of normalized text kept in `summary`, before the ellipsis.
pub const SUMMARY_CHARS: usize = 300;
const ELLIPSIS: &str = "...";

// ────────────────────────────────────────────────────────────────────────────
// Request / result types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_description: Option<String>,
    /// Overrides the service default for this request.
    #[serde(default)]
    pub ats_strategy: Option<AtsStrategy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentStatus {
    Enriched,
    Degraded,
}

/// Outcome of the enrichment call: the payload, or a degraded sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum Enrichment {
    Enriched(EnrichmentPayload),
    Degraded { reason: String },
}

impl Enrichment {
    pub fn from_result(result: Result<EnrichmentPayload, EnrichmentError>) -> Self {
        match result {
            Ok(payload) => Enrichment::Enriched(payload),
            Err(e) => Enrichment::Degraded {
                reason: e.to_string(),
            },
        }
    }

    pub fn status(&self) -> EnrichmentStatus {
        match self {
            Enrichment::Enriched(_) => EnrichmentStatus::Enriched,
            Enrichment::Degraded { .. } => EnrichmentStatus::Degraded,
        }
    }

    /// Degraded enrichment merges as empty lists and neutral sentiment.
    pub fn into_payload(self) -> EnrichmentPayload {
        match self {
            Enrichment::Enriched(payload) => payload,
            Enrichment::Degraded { .. } => EnrichmentPayload::default(),
        }
    }
}

/// Everything computed locally from the resume and job description.
#[derive(Debug, Clone)]
pub struct CoreAnalysis {
    pub word_count: usize,
    pub summary: String,
    pub candidate_info: CandidateInfo,
    pub sections: SectionMap,
    pub skills: SkillMatch,
    pub important_keywords: BTreeSet<String>,
    pub ats: AtsResult,
    pub job_suggestions: Vec<JobSuggestion>,
    pub work_experience: WorkExperienceCritique,
    pub readability: ReadabilityReport,
}

/// Full analysis returned to callers. Created per request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub analysis_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub word_count: usize,
    pub summary: String,
    pub candidate_info: CandidateInfo,
    pub sections: SectionMap,
    pub skills: SkillMatch,
    pub important_keywords: BTreeSet<String>,
    pub ats: AtsResult,
    pub job_suggestions: Vec<JobSuggestion>,
    pub work_experience: WorkExperienceCritique,
    pub readability: ReadabilityReport,
    pub key_phrases: Vec<KeyPhrase>,
    pub entities: Vec<Entity>,
    pub sentiment: Sentiment,
    pub enrichment_status: EnrichmentStatus,
}

impl AnalysisResult {
    pub fn assemble(analysis_id: Uuid, core: CoreAnalysis, enrichment: Enrichment) -> Self {
        let enrichment_status = enrichment.status();
        let payload = enrichment.into_payload();

        Self {
            analysis_id,
            analyzed_at: Utc::now(),
            word_count: core.word_count,
            summary: core.summary,
            candidate_info: core.candidate_info,
            sections: core.sections,
            skills: core.skills,
            important_keywords: core.important_keywords,
            ats: core.ats,
            job_suggestions: core.job_suggestions,
            work_experience: core.work_experience,
            readability: core.readability,
            key_phrases: payload.key_phrases,
            entities: payload.entities,
            sentiment: payload.sentiment,
            enrichment_status,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Runs the full pipeline for one request.
///
/// Steps:
/// 1. Reject blank resume text
/// 2. `spawn_blocking` → `analyze_text` (all lexical stages)
/// 3. Concurrently: enrichment call on the first 5000 normalized characters
/// 4. Merge; enrichment failure degrades to neutral defaults
pub async fn run_analysis(
    request: AnalysisRequest,
    catalog: Arc<AnalysisCatalog>,
    enricher: Arc<dyn Enricher>,
    default_strategy: AtsStrategy,
) -> Result<AnalysisResult, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }

    let analysis_id = Uuid::new_v4();
    let span = info_span!("analysis", %analysis_id);

    async move {
        let strategy = request.ats_strategy.unwrap_or(default_strategy);
        let excerpt = leading_chars(
            &normalize_whitespace(&request.resume_text),
            ENRICHMENT_EXCERPT_CHARS,
        )
        .to_string();

        let blocking_span = Span::current();
        let core_task = tokio::task::spawn_blocking(move || {
            blocking_span.in_scope(|| {
                analyze_text(
                    &request.resume_text,
                    request.job_description.as_deref(),
                    strategy,
                    &catalog,
                )
            })
        });

        let (core, enrichment) = tokio::join!(core_task, enricher.enrich(&excerpt));

        let core = core.map_err(|e| {
            AppError::Internal(anyhow::anyhow!("analysis task failed: {e}"))
        })??;

        let enrichment = Enrichment::from_result(enrichment);
        if let Enrichment::Degraded { reason } = &enrichment {
            warn!("Enrichment unavailable, continuing with neutral defaults: {reason}");
        }

        let result = AnalysisResult::assemble(analysis_id, core, enrichment);
        info!(
            word_count = result.word_count,
            ats_score = result.ats.score_percent,
            suggestions = result.job_suggestions.len(),
            enrichment = ?result.enrichment_status,
            "Analysis complete"
        );
        Ok(result)
    }
    .instrument(span)
    .await
}

/// Every lexical stage, in order. Pure and synchronous.
pub fn analyze_text(
    resume_text: &str,
    job_description: Option<&str>,
    strategy: AtsStrategy,
    catalog: &AnalysisCatalog,
) -> Result<CoreAnalysis, AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }

    let normalized = normalize_whitespace(resume_text);

    let tokens = tokenize(&normalized);
    let skills = match_resume_skills(&tokens, &catalog.vocabulary);
    let important_keywords = extract_keywords(&normalized);
    debug!(
        tokens = tokens.len(),
        technical = skills.technical.len(),
        soft = skills.soft.len(),
        keywords = important_keywords.len(),
        "Skill and keyword pass done"
    );

    // Sections and contact fields need the raw line structure
    let sections = segment_sections(resume_text);
    let candidate_info = extract_candidate_info(resume_text);
    let work_experience = critique_experience(sections.get(Section::Experience), catalog);
    let readability = analyze_readability(&normalized);
    debug!(sections = sections.len(), "Structure pass done");

    let ats = scorer_for(strategy, &catalog.vocabulary).score(&AtsInput {
        resume_text: &normalized,
        job_description,
        found_technical: &skills.technical,
    });
    let job_suggestions = suggest_jobs(&catalog.roles, &skills.technical);

    Ok(CoreAnalysis {
        word_count: readability.word_count,
        summary: summarize(&normalized),
        candidate_info,
        sections,
        skills,
        important_keywords,
        ats,
        job_suggestions,
        work_experience,
        readability,
    })
}

fn summarize(normalized: &str) -> String {
    format!("{}{ELLIPSIS}", leading_chars(normalized, SUMMARY_CHARS))
}

/// The first `n` characters of `text`, cut on a char boundary.
fn leading_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::enrichment::DisabledEnricher;

    const SCENARIO: &str =
        "John Smith john@x.com 555-123-4567. Managed a team of 5 engineers using Python and AWS.";

    const STRUCTURED: &str = "Jane Doe\njane.doe@mail.com | 555.987.6543\n\nExperience\nBuilt billing services in Rust\nResponsible for on-call rotation\nWorked with product managers\nEducation\nBSc Computer Science";

    struct StaticEnricher(EnrichmentPayload);

    #[async_trait]
    impl Enricher for StaticEnricher {
        async fn enrich(&self, _excerpt: &str) -> Result<EnrichmentPayload, EnrichmentError> {
            Ok(self.0.clone())
        }
    }

    /// Records the excerpt it was called with, then fails.
    #[derive(Default)]
    struct RecordingEnricher(Mutex<Option<String>>);

    #[async_trait]
    impl Enricher for RecordingEnricher {
        async fn enrich(&self, excerpt: &str) -> Result<EnrichmentPayload, EnrichmentError> {
            *self.0.lock().unwrap() = Some(excerpt.to_string());
            Err(EnrichmentError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })
        }
    }

    fn analyze(text: &str, jd: Option<&str>) -> CoreAnalysis {
        let catalog = AnalysisCatalog::builtin();
        analyze_text(text, jd, AtsStrategy::SkillVocabulary, &catalog).unwrap()
    }

    fn request(text: &str, jd: Option<&str>) -> AnalysisRequest {
        AnalysisRequest {
            resume_text: text.to_string(),
            job_description: jd.map(String::from),
            ats_strategy: None,
        }
    }

    #[test]
    fn test_scenario_contact_and_skills() {
        let core = analyze(SCENARIO, None);
        assert_eq!(core.candidate_info.name.as_deref(), Some("John Smith"));
        assert_eq!(core.candidate_info.email.as_deref(), Some("john@x.com"));
        assert_eq!(core.candidate_info.phone.as_deref(), Some("555-123-4567"));
        assert!(core.skills.technical.contains("Python"));
        assert!(core.skills.technical.contains("AWS"));
    }

    #[test]
    fn test_empty_job_description_scores_zero_but_still_suggests() {
        let core = analyze(
            "Skills: Python, SQL, Machine Learning, Pandas, TensorFlow",
            Some(""),
        );
        assert_eq!(core.ats.score_percent, 0);
        assert!(core.ats.found_keywords.is_empty());
        assert!(core.ats.missing_keywords.is_empty());
        assert!(core
            .job_suggestions
            .iter()
            .any(|s| s.title == "Data Science"));
    }

    #[test]
    fn test_experience_section_feeds_critic() {
        let core = analyze(STRUCTURED, None);
        let experience = &core.work_experience;
        assert!(experience.note.is_none());
        assert_eq!(experience.quantification_issues.len(), 3);
        // "Built" is an action verb; "Responsible" and "Worked" are not
        assert_eq!(experience.action_verb_issues.len(), 2);
        assert_eq!(
            core.sections.get(Section::Education).unwrap(),
            &["BSc Computer Science".to_string()]
        );
    }

    #[test]
    fn test_missing_experience_section_reports_note() {
        let core = analyze(SCENARIO, None);
        assert!(core.work_experience.note.is_some());
    }

    #[test]
    fn test_word_count_and_summary_use_normalized_text() {
        let core = analyze("  Rust \n\n  engineer\t", None);
        assert_eq!(core.word_count, 2);
        assert_eq!(core.summary, "Rust engineer...");
        assert_eq!(core.readability.word_count, 2);
    }

    #[test]
    fn test_summary_truncated_to_300_chars() {
        let text = "é".repeat(400);
        let core = analyze(&text, None);
        assert_eq!(core.summary.chars().count(), SUMMARY_CHARS + ELLIPSIS.len());
        assert!(core.summary.ends_with("..."));
    }

    #[test]
    fn test_blank_resume_rejected() {
        let catalog = AnalysisCatalog::builtin();
        let err = analyze_text(" \n\t", None, AtsStrategy::SkillVocabulary, &catalog).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("resume_text")));
    }

    #[test]
    fn test_strategy_label_follows_request() {
        let catalog = AnalysisCatalog::builtin();
        let core = analyze_text(
            SCENARIO,
            Some("Python engineers"),
            AtsStrategy::KeywordOverlap,
            &catalog,
        )
        .unwrap();
        assert_eq!(core.ats.strategy, AtsStrategy::KeywordOverlap);
        assert_eq!(core.ats.score_percent, 100);
    }

    #[test]
    fn test_leading_chars_respects_char_boundaries() {
        assert_eq!(leading_chars("héllo", 2), "hé");
        assert_eq!(leading_chars("hi", 10), "hi");
        assert_eq!(leading_chars("", 3), "");
    }

    #[tokio::test]
    async fn test_enrichment_merged_when_available() {
        let payload = EnrichmentPayload {
            key_phrases: vec![KeyPhrase {
                text: "a team of 5 engineers".to_string(),
                score: Some(0.99),
            }],
            entities: vec![],
            sentiment: Sentiment::Positive,
        };
        let result = run_analysis(
            request(SCENARIO, None),
            Arc::new(AnalysisCatalog::builtin()),
            Arc::new(StaticEnricher(payload)),
            AtsStrategy::SkillVocabulary,
        )
        .await
        .unwrap();

        assert_eq!(result.enrichment_status, EnrichmentStatus::Enriched);
        assert_eq!(result.sentiment, Sentiment::Positive);
        assert_eq!(result.key_phrases.len(), 1);
    }

    #[tokio::test]
    async fn test_enrichment_failure_degrades_to_neutral() {
        let result = run_analysis(
            request(SCENARIO, Some("AWS Swift")),
            Arc::new(AnalysisCatalog::builtin()),
            Arc::new(DisabledEnricher),
            AtsStrategy::SkillVocabulary,
        )
        .await
        .unwrap();

        assert_eq!(result.enrichment_status, EnrichmentStatus::Degraded);
        assert_eq!(result.sentiment, Sentiment::Neutral);
        assert!(result.key_phrases.is_empty());
        assert!(result.entities.is_empty());
        // The rest of the analysis still completes
        assert_eq!(result.ats.score_percent, 50);
        assert_eq!(result.candidate_info.name.as_deref(), Some("John Smith"));
    }

    #[tokio::test]
    async fn test_enrichment_receives_bounded_normalized_excerpt() {
        let enricher = Arc::new(RecordingEnricher::default());
        let text = format!("Jane   Doe\n{}", "x".repeat(6000));
        run_analysis(
            request(&text, None),
            Arc::new(AnalysisCatalog::builtin()),
            enricher.clone(),
            AtsStrategy::SkillVocabulary,
        )
        .await
        .unwrap();

        let excerpt = enricher.0.lock().unwrap().clone().unwrap();
        assert_eq!(excerpt.chars().count(), ENRICHMENT_EXCERPT_CHARS);
        assert!(excerpt.starts_with("Jane Doe x"));
    }

    #[tokio::test]
    async fn test_run_analysis_rejects_blank_resume() {
        let err = run_analysis(
            request("   ", None),
            Arc::new(AnalysisCatalog::builtin()),
            Arc::new(DisabledEnricher),
            AtsStrategy::SkillVocabulary,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_request_strategy_overrides_default() {
        let mut req = request(SCENARIO, Some("python"));
        req.ats_strategy = Some(AtsStrategy::KeywordOverlap);
        let result = run_analysis(
            req,
            Arc::new(AnalysisCatalog::builtin()),
            Arc::new(DisabledEnricher),
            AtsStrategy::SkillVocabulary,
        )
        .await
        .unwrap();
        assert_eq!(result.ats.strategy, AtsStrategy::KeywordOverlap);
        assert_eq!(result.ats.score_percent, 100);
    }
}
