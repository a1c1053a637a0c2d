//! Candidate info extractor: name, email and phone by pattern shape.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Leading run of capitalized words; stays on the first line.
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*").expect("name pattern is valid"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._-]+@[a-zA-Z0-9._-]+\.[a-zA-Z0-9_-]+").expect("email pattern is valid")
});

/// Ten digits, optionally grouped 3-3-4 with `-` or `.` separators.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{3}[-.]?\d{3}[-.]?\d{4}").expect("phone pattern is valid"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// First match wins per field; each field is independent.
pub fn extract_candidate_info(text: &str) -> CandidateInfo {
    let text = text.trim_start();
    CandidateInfo {
        name: first_match(&NAME_RE, text),
        email: first_match(&EMAIL_RE, text),
        phone: first_match(&PHONE_RE, text),
    }
}

fn first_match(pattern: &Regex, text: &str) -> Option<String> {
    pattern.find(text).map(|m| m.as_str().trim().to_string())
}
