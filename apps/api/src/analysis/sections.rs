//! Section segmenter. Splits resume text into named, heading-delimited sections.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
    Certifications,
    Awards,
    Publications,
    References,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Header => "header",
            Section::Summary => "summary",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Projects => "projects",
            Section::Certifications => "certifications",
            Section::Awards => "awards",
            Section::Publications => "publications",
            Section::References => "references",
        }
    }
}

/// Whole-line, case-insensitive heading patterns, tried in order.
static HEADINGS: Lazy<Vec<(Section, Regex)>> = Lazy::new(|| {
    [
        (Section::Summary, r"(?i)^summary$"),
        (
            Section::Experience,
            r"(?i)^(experience|work experience|professional experience)$",
        ),
        (Section::Education, r"(?i)^education$"),
        (Section::Skills, r"(?i)^(skills|technical skills)$"),
        (Section::Projects, r"(?i)^projects$"),
        (Section::Certifications, r"(?i)^certifications$"),
        (Section::Awards, r"(?i)^(awards|honors and awards)$"),
        (Section::Publications, r"(?i)^publications$"),
        (Section::References, r"(?i)^references$"),
    ]
    .into_iter()
    .map(|(section, pattern)| {
        (
            section,
            Regex::new(pattern).expect("section heading pattern is valid"),
        )
    })
    .collect()
});

/// Section name → trimmed content lines, in order of first appearance.
///
/// `header` is always present. Heading lines are never stored as content.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionMap {
    sections: Vec<(Section, Vec<String>)>,
}

impl SectionMap {
    fn new() -> Self {
        Self {
            sections: vec![(Section::Header, Vec::new())],
        }
    }

    pub fn get(&self, section: Section) -> Option<&[String]> {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, lines)| lines.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, &[String])> {
        self.sections.iter().map(|(s, lines)| (*s, lines.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Switches to `section`, discarding anything previously collected under it.
    fn restart(&mut self, section: Section) {
        match self.sections.iter_mut().find(|(s, _)| *s == section) {
            Some((_, lines)) => lines.clear(),
            None => self.sections.push((section, Vec::new())),
        }
    }

    fn push(&mut self, section: Section, line: String) {
        if let Some((_, lines)) = self.sections.iter_mut().find(|(s, _)| *s == section) {
            lines.push(line);
        }
    }
}

impl Serialize for SectionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (section, lines) in self.iter() {
            map.serialize_entry(section.as_str(), lines)?;
        }
        map.end()
    }
}

/// Returns the section a trimmed line announces, if it is a heading.
pub fn match_heading(line: &str) -> Option<Section> {
    let line = line.trim();
    HEADINGS
        .iter()
        .find(|(_, pattern)| pattern.is_match(line))
        .map(|(section, _)| *section)
}

/// Single pass over the lines: headings switch (and reset) the active section,
/// every other line is appended trimmed to it.
pub fn segment_sections(text: &str) -> SectionMap {
    let mut map = SectionMap::new();
    let mut current = Section::Header;

    for line in text.lines() {
        match match_heading(line) {
            Some(section) => {
                current = section;
                map.restart(section);
            }
            None => map.push(current, line.trim().to_string()),
        }
    }

    map
}
