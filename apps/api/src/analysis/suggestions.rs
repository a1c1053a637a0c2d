//! Job suggester. Ranks catalog role profiles against the resume's technical skills.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::analysis::catalog::RoleProfile;

const REQUIRED_WEIGHT: f64 = 0.7;
const OPTIONAL_WEIGHT: f64 = 0.3;
/// A role is suggested only above this score.
const SUGGESTION_THRESHOLD: f64 = 0.3;
const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSuggestion {
    pub title: String,
    pub match_score_percent: u32, // 0..=100
    pub matching_skills: Vec<String>,
    pub missing_required: Vec<String>,
}

/// `0.7 × required coverage + 0.3 × optional coverage`. An empty list covers 0.
pub fn role_match_score(role: &RoleProfile, found: &BTreeSet<String>) -> f64 {
    coverage(&role.required, found) * REQUIRED_WEIGHT
        + coverage(&role.optional, found) * OPTIONAL_WEIGHT
}

fn coverage(skills: &[String], found: &BTreeSet<String>) -> f64 {
    if skills.is_empty() {
        return 0.0;
    }
    let matched = skills.iter().filter(|s| found.contains(*s)).count();
    matched as f64 / skills.len() as f64
}

/// Top roles scoring above the threshold, best first. Ties keep catalog order.
pub fn suggest_jobs(roles: &[RoleProfile], found: &BTreeSet<String>) -> Vec<JobSuggestion> {
    let mut scored: Vec<(f64, &RoleProfile)> = roles
        .iter()
        .map(|role| (role_match_score(role, found), role))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .collect();

    // sort_by is stable, so equal scores stay in catalog order
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(MAX_SUGGESTIONS);

    scored
        .into_iter()
        .map(|(score, role)| JobSuggestion {
            title: role.title.clone(),
            match_score_percent: (score * 100.0).round() as u32,
            matching_skills: role
                .required
                .iter()
                .chain(role.optional.iter())
                .filter(|s| found.contains(*s))
                .cloned()
                .collect(),
            missing_required: role
                .required
                .iter()
                .filter(|s| !found.contains(*s))
                .cloned()
                .collect(),
        })
        .collect()
}
