use serde::{Deserialize, Serialize};

use crate::analysis::catalog::AnalysisCatalog;

pub const MISSING_SECTION_NOTE: &str = "Work experience section not found.";

const QUANTIFY_FEEDBACK: &str =
    "Consider adding quantifiable achievements (e.g., numbers, percentages) to show impact.";

const VAGUE_SCALE_WORDS: &[&str] = &[
    "significant",
    "major",
    "large",
    "huge",
    "massive",
    "substantial",
    "considerable",
    "great",
    "many",
    "numerous",
    "various",
    "several",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletIssue {
    pub bullet_text: String,
    pub feedback: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperienceCritique {
    /// Set instead of running the checks when there is nothing to critique.
    pub note: Option<String>,
    pub action_verb_issues: Vec<BulletIssue>,
    pub quantification_issues: Vec<BulletIssue>,
}

/// Critiques each non-empty line of the experience section.
///
/// Checks, independently per bullet:
/// - first word (letters only, lower-cased) must be a recognized action verb
/// - bullet must contain at least one digit
pub fn critique_experience(
    lines: Option<&[String]>,
    catalog: &AnalysisCatalog,
) -> WorkExperienceCritique {
    let bullets: Vec<&str> = lines
        .unwrap_or_default()
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    if bullets.is_empty() {
        return WorkExperienceCritique {
            note: Some(MISSING_SECTION_NOTE.to_string()),
            ..Default::default()
        };
    }

    let mut critique = WorkExperienceCritique::default();

    for bullet in bullets {
        let first_word = leading_word(bullet);
        if !catalog.is_action_verb(&first_word) {
            critique.action_verb_issues.push(BulletIssue {
                bullet_text: bullet.to_string(),
                feedback: format!(
                    "Consider starting with a strong action verb instead of '{first_word}'."
                ),
            });
        }

        if !bullet.chars().any(|c| c.is_ascii_digit()) {
            critique.quantification_issues.push(BulletIssue {
                bullet_text: bullet.to_string(),
                feedback: quantification_feedback(bullet),
            });
        }
    }

    critique
}

/// First space-delimited word, lower-cased, with everything but a-z removed.
fn leading_word(bullet: &str) -> String {
    bullet
        .split(' ')
        .next()
        .unwrap_or_default()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

fn quantification_feedback(bullet: &str) -> String {
    let lower = bullet.to_lowercase();
    let vague = VAGUE_SCALE_WORDS
        .iter()
        .find(|&&word| lower.split(|c: char| !c.is_alphabetic()).any(|w| w == word));

    match vague {
        Some(word) => format!(
            "Replace '{word}' with a specific number: e.g., '5x', '40%', '3 weeks'."
        ),
        None => QUANTIFY_FEEDBACK.to_string(),
    }
}
