//! Analysis catalog: skill vocabularies, role profiles and action verbs.
//!
//! Built once at startup (built-in defaults, optionally overridden from a JSON
//! file) and shared read-only via `Arc<AnalysisCatalog>`. Every component takes
//! the pieces it needs as explicit arguments.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const TECHNICAL_SKILLS: &[&str] = &[
    // Programming languages
    "JavaScript", "Python", "Java", "C++", "C#", "Ruby", "PHP", "Swift", "Kotlin", "Go", "Rust",
    // Web
    "HTML", "CSS", "React", "Angular", "Vue", "Node.js", "Express", "Django", "Flask", "Spring",
    // Databases
    "SQL", "MySQL", "PostgreSQL", "MongoDB", "Redis", "Oracle", "SQLite",
    // Cloud & DevOps
    "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Terraform", "Jenkins", "CI/CD",
    // Data science
    "Machine Learning", "Deep Learning", "TensorFlow", "PyTorch", "Pandas", "NumPy", "R",
    // Mobile
    "Android", "iOS", "React Native", "Flutter",
    // Other
    "Git", "Linux", "Agile", "Scrum", "REST", "GraphQL", "Microservices",
];

const SOFT_SKILLS: &[&str] = &[
    "Communication",
    "Leadership",
    "Teamwork",
    "Problem Solving",
    "Time Management",
    "Adaptability",
    "Creativity",
    "Critical Thinking",
    "Emotional Intelligence",
    "Project Management",
    "Negotiation",
    "Conflict Resolution",
];

const ACTION_VERBS: &[&str] = &[
    "achieved", "accelerated", "accomplished", "acquired", "adapted", "administered", "advised",
    "advocated", "analyzed", "authored", "automated", "balanced", "budgeted", "built",
    "calculated", "centralized", "chaired", "clarified", "collaborated", "conceived",
    "conceptualized", "conducted", "consolidated", "constructed", "consulted", "converted",
    "coordinated", "counseled", "created", "cultivated", "cut", "decreased", "defined",
    "delegated", "delivered", "demonstrated", "designed", "developed", "devised", "directed",
    "discovered", "doubled", "drove", "edited", "eliminated", "enabled", "encouraged",
    "engineered", "enhanced", "ensured", "established", "evaluated", "executed", "expanded",
    "expedited", "explained", "facilitated", "forecasted", "formulated", "founded", "generated",
    "governed", "guided", "halved", "headed", "identified", "implemented", "improved",
    "incorporated", "increased", "initiated", "inspired", "instituted", "instructed",
    "integrated", "interpreted", "introduced", "invented", "launched", "led", "lectured",
    "licensed", "lobbied", "maintained", "managed", "marketed", "mastered", "mentored", "merged",
    "modernized", "motivated", "navigated", "negotiated", "operated", "orchestrated",
    "organized", "overhauled", "oversaw", "partnered", "perfected", "performed", "pioneered",
    "planned", "predicted", "prepared", "presented", "presided", "prioritized", "produced",
    "programmed", "promoted", "proposed", "proved", "provided", "published", "quadrupled",
    "quantified", "raised", "ran", "ranked", "rated", "received", "recommended", "reconciled",
    "recruited", "redesigned", "reduced", "refined", "regained", "rehabilitated", "reinforced",
    "rejuvenated", "related", "remodeled", "reorganized", "repaired", "replaced", "reported",
    "represented", "researched", "resolved", "responded", "restored", "restructured",
    "retrieved", "revamped", "revitalized", "revolutionized", "saved", "scheduled", "secured",
    "selected", "served", "serviced", "shaped", "simplified", "slashed", "solidified", "solved",
    "sparked", "spearheaded", "specified", "spoke", "sponsored", "staffed", "standardized",
    "steered", "stimulated", "streamlined", "strengthened", "structured", "studied",
    "submitted", "substituted", "succeeded", "summarized", "supervised", "supported",
    "surpassed", "surveyed", "synthesized", "systematized", "tabulated", "taught", "tested",
    "trained", "transcribed", "transformed", "translated", "tripled", "troubleshot", "tutored",
    "unified", "united", "unraveled", "updated", "upgraded", "utilized", "validated",
    "verbalized", "verified", "visualized", "won", "wrote",
];

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("skill '{0}' appears in both the technical and soft vocabularies")]
    OverlappingVocabulary(String),

    #[error("invalid role profile '{title}': {reason}")]
    InvalidRole { title: String, reason: String },

    #[error("blank entry in {0}")]
    BlankEntry(String),
}

/// The two fixed skill vocabularies. Disjoint, case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillVocabulary {
    pub technical: Vec<String>,
    pub soft: Vec<String>,
}

/// A job-role profile used to rank job-fit suggestions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleProfile {
    pub title: String,
    pub required: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AnalysisCatalog {
    pub vocabulary: SkillVocabulary,
    pub roles: Vec<RoleProfile>,
    action_verbs: HashSet<String>,
}

/// On-disk override shape. Missing keys keep the built-in values.
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    technical: Option<Vec<String>>,
    soft: Option<Vec<String>>,
    roles: Option<Vec<RoleProfile>>,
    action_verbs: Option<Vec<String>>,
}

impl AnalysisCatalog {
    /// The built-in catalog.
    pub fn builtin() -> Self {
        Self {
            vocabulary: SkillVocabulary {
                technical: to_owned(TECHNICAL_SKILLS),
                soft: to_owned(SOFT_SKILLS),
            },
            roles: builtin_roles(),
            action_verbs: ACTION_VERBS.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Loads a JSON override on top of the built-in catalog and validates it.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        let mut catalog = Self::builtin();

        if let Some(technical) = file.technical {
            catalog.vocabulary.technical = technical;
        }
        if let Some(soft) = file.soft {
            catalog.vocabulary.soft = soft;
        }
        if let Some(roles) = file.roles {
            catalog.roles = roles;
        }
        if let Some(verbs) = file.action_verbs {
            catalog.action_verbs = verbs.iter().map(|v| v.to_lowercase()).collect();
        }

        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        // A blank skill would match every token under containment matching
        ensure_no_blank(&self.vocabulary.technical, "the technical vocabulary")?;
        ensure_no_blank(&self.vocabulary.soft, "the soft vocabulary")?;

        let technical: HashSet<String> = self
            .vocabulary
            .technical
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        if let Some(overlap) = self
            .vocabulary
            .soft
            .iter()
            .find(|s| technical.contains(&s.to_lowercase()))
        {
            return Err(CatalogError::OverlappingVocabulary(overlap.clone()));
        }

        for role in &self.roles {
            if role.title.trim().is_empty() {
                return Err(CatalogError::InvalidRole {
                    title: role.title.clone(),
                    reason: "title is empty".to_string(),
                });
            }
            if role.required.is_empty() {
                return Err(CatalogError::InvalidRole {
                    title: role.title.clone(),
                    reason: "at least one required skill is needed".to_string(),
                });
            }
            ensure_no_blank(&role.required, &format!("required skills of '{}'", role.title))?;
            ensure_no_blank(&role.optional, &format!("optional skills of '{}'", role.title))?;
        }

        Ok(())
    }

    /// True if `word` (already lower-cased) is a recognized action verb.
    pub fn is_action_verb(&self, word: &str) -> bool {
        self.action_verbs.contains(word)
    }

    pub fn action_verb_count(&self) -> usize {
        self.action_verbs.len()
    }
}

fn builtin_roles() -> Vec<RoleProfile> {
    vec![
        RoleProfile {
            title: "Software Development".to_string(),
            required: to_owned(&["JavaScript", "Python", "Java", "C++", "SQL"]),
            optional: to_owned(&["React", "Node.js", "Git", "Agile"]),
        },
        RoleProfile {
            title: "Data Science".to_string(),
            required: to_owned(&["Python", "SQL", "Machine Learning"]),
            optional: to_owned(&["R", "Pandas", "TensorFlow", "Data Visualization"]),
        },
        RoleProfile {
            title: "DevOps".to_string(),
            required: to_owned(&["AWS", "Docker", "Linux"]),
            optional: to_owned(&["Kubernetes", "CI/CD", "Terraform"]),
        },
    ]
}

fn ensure_no_blank(skills: &[String], list: &str) -> Result<(), CatalogError> {
    if skills.iter().any(|s| s.trim().is_empty()) {
        return Err(CatalogError::BlankEntry(list.to_string()));
    }
    Ok(())
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
