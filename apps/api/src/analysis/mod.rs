// Resume Analysis Engine
// Implements: tokenizing, skill matching, keyword extraction, sectioning, contact
// extraction, experience critique, readability, ATS scoring and job suggestions.
// Every stage is a pure function; only the orchestrator touches async or I/O.

pub mod ats;
pub mod candidate;
pub mod catalog;
pub mod experience;
pub mod handlers;
pub mod keywords;
pub mod orchestrator;
pub mod readability;
pub mod sections;
pub mod skills;
pub mod suggestions;
pub mod tokenizer;
