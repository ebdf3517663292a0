//! Resume section detection

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionType {
    Skills,
    Experience,
    Education,
    Summary,
    Projects,
    Certifications,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSection {
    pub section_type: SectionType,
    /// Index of the header line in the document.
    pub heading_line: usize,
    /// Lines after the header up to the next recognized header.
    pub lines: Vec<String>,
}

/// A resume split into lines and header-delimited sections.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeDocument {
    lines: Vec<String>,
    sections: Vec<DocumentSection>,
}

const SECTION_PATTERNS: &[(SectionType, &[&str])] = &[
    (
        SectionType::Experience,
        &[
            "experience", "work experience", "professional experience", "employment",
            "employment history", "work history", "professional history", "career history",
            "relevant experience",
        ],
    ),
    (
        SectionType::Education,
        &[
            "education", "academic background", "academics", "qualifications",
            "educational qualifications", "academic qualifications", "education and training",
            "academic details",
        ],
    ),
    (
        SectionType::Skills,
        &[
            "skills", "technical skills", "core competencies", "key skills", "expertise",
            "technologies", "skills and tools",
        ],
    ),
    (
        SectionType::Summary,
        &[
            "summary", "profile", "professional summary", "objective", "career objective",
            "about", "about me", "overview",
        ],
    ),
    (
        SectionType::Projects,
        &["projects", "personal projects", "academic projects", "notable projects"],
    ),
    (
        SectionType::Certifications,
        &["certifications", "certificates", "licenses", "certifications and licenses"],
    ),
];

impl ResumeDocument {
    pub fn new(content: &str) -> Self {
        let lines: Vec<String> = content.lines().map(|l| l.trim().to_string()).collect();
        let sections = Self::detect_sections(&lines);
        Self { lines, sections }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn sections(&self) -> &[DocumentSection] {
        &self.sections
    }

    /// First section of the given type.
    pub fn section(&self, section_type: SectionType) -> Option<&DocumentSection> {
        self.sections.iter().find(|s| s.section_type == section_type)
    }

    /// Content of every section of the given type, joined by newlines.
    pub fn section_text(&self, section_type: SectionType) -> Option<String> {
        let parts: Vec<String> = self
            .sections
            .iter()
            .filter(|s| s.section_type == section_type)
            .map(|s| s.lines.join("\n"))
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n"))
        }
    }

    /// Whole document with the given sections (headers included) removed.
    pub fn text_without(&self, excluded: &[SectionType]) -> String {
        let mut skip = vec![false; self.lines.len()];
        for section in self.sections.iter().filter(|s| excluded.contains(&s.section_type)) {
            let end = section.heading_line + 1 + section.lines.len();
            for flag in skip.iter_mut().take(end).skip(section.heading_line) {
                *flag = true;
            }
        }

        self.lines
            .iter()
            .zip(skip)
            .filter(|(_, skipped)| !skipped)
            .map(|(line, _)| line.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Recognize a header line. Returns the section type and any content that
    /// follows an inline header such as `Skills: Python, Rust`.
    pub fn classify_header(line: &str) -> Option<(SectionType, Option<String>)> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.len() > 60 {
            return None;
        }

        let (head, rest) = match trimmed.split_once(':') {
            Some((head, rest)) => (head, Some(rest.trim())),
            None => (trimmed, None),
        };

        let key: String = head
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphabetic() { c } else { ' ' })
            .collect::<String>()
            .split_whitespace()
            .map(|w| if w == "&" { "and" } else { w })
            .collect::<Vec<_>>()
            .join(" ");

        if key.is_empty() || key.split(' ').count() > 4 {
            return None;
        }

        SECTION_PATTERNS
            .iter()
            .find(|(_, patterns)| patterns.contains(&key.as_str()))
            .map(|(section_type, _)| {
                let inline = rest.filter(|r| !r.is_empty()).map(|r| r.to_string());
                (*section_type, inline)
            })
    }

    fn detect_sections(lines: &[String]) -> Vec<DocumentSection> {
        let mut sections: Vec<DocumentSection> = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if let Some((section_type, inline)) = Self::classify_header(line) {
                sections.push(DocumentSection {
                    section_type,
                    heading_line: idx,
                    lines: inline.into_iter().collect(),
                });
            } else if let Some(current) = sections.last_mut() {
                current.lines.push(line.clone());
            }
        }

        sections
    }
}

impl std::fmt::Display for SectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectionType::Skills => write!(f, "Skills"),
            SectionType::Experience => write!(f, "Experience"),
            SectionType::Education => write!(f, "Education"),
            SectionType::Summary => write!(f, "Summary"),
            SectionType::Projects => write!(f, "Projects"),
            SectionType::Certifications => write!(f, "Certifications"),
        }
    }
}
