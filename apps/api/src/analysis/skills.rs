//! Skill matcher: lexical, bidirectional-containment matching of tokens
//! against a fixed vocabulary.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::analysis::catalog::SkillVocabulary;

/// Skills detected in the resume body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub technical: BTreeSet<String>,
    pub soft: BTreeSet<String>,
}

/// Returns the canonical vocabulary entries matched by any token.
///
/// A token matches an entry when, lower-cased, either one contains the other.
/// This is deliberately permissive: single-letter tokens such as "r" or "c"
/// will match every entry containing that letter.
pub fn match_skills<S: AsRef<str>>(tokens: &[S], vocabulary: &[String]) -> BTreeSet<String> {
    let entries: Vec<(String, &String)> = vocabulary
        .iter()
        .map(|entry| (entry.to_lowercase(), entry))
        .collect();

    let mut found = BTreeSet::new();
    for token in tokens {
        let token = token.as_ref().to_lowercase();
        if token.is_empty() {
            continue;
        }
        for (entry_lower, canonical) in &entries {
            if entry_lower.contains(&token) || token.contains(entry_lower.as_str()) {
                found.insert((*canonical).clone());
            }
        }
    }
    found
}

/// Runs the matcher against both halves of the vocabulary.
pub fn match_resume_skills<S: AsRef<str>>(tokens: &[S], vocabulary: &SkillVocabulary) -> SkillMatch {
    SkillMatch {
        technical: match_skills(tokens, &vocabulary.technical),
        soft: match_skills(tokens, &vocabulary.soft),
    }
}

/// Technical skills a job description asks for. Soft skills are never required.
pub fn required_skills<S: AsRef<str>>(
    jd_tokens: &[S],
    vocabulary: &SkillVocabulary,
) -> BTreeSet<String> {
    match_skills(jd_tokens, &vocabulary.technical)
}
