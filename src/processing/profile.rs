//! Candidate profile extraction from resume text

use crate::error::Result;
use crate::input::text_extractor::DocumentTextExtractor;
use crate::processing::document::{ResumeDocument, SectionType};
use crate::processing::reference::ReferenceTables;
use crate::processing::text_processor::{normalize_unicode, TextProcessor};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: Option<String>,
}

/// Structured facts pulled out of a resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Canonical skill names from the vocabulary.
    pub skills: BTreeSet<String>,
    /// Years of professional experience, rounded to one decimal.
    pub experience_years: f64,
    pub education: Vec<Education>,
    /// Most recent job title found in the resume.
    pub detected_role: Option<String>,
    pub location: Option<String>,
    #[serde(skip)]
    pub raw_text: String,
}

/// A resolved point in time, counted in months since year 0.
type MonthIndex = i64;

pub struct ProfileExtractor<'a> {
    tables: &'a ReferenceTables,
    text_processor: TextProcessor,
    explicit_experience_regex: Regex,
    date_range_regex: Regex,
    year_regex: Regex,
    role_regex: Regex,
    degree_regex: Regex,
    institution_regex: Regex,
    location_line_regex: Regex,
}

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

impl<'a> ProfileExtractor<'a> {
    pub fn new(tables: &'a ReferenceTables) -> Self {
        // A duration only counts when it is tied to experience wording:
        // "7+ years of professional experience", "Experience: 4 yrs".
        let explicit_experience_regex = Regex::new(
            r"(?i)\b(?:(?P<lo>\d{1,2}(?:\.\d{1,2})?)[ \t]*(?:(?:-|to)[ \t]*(?P<hi>\d{1,2}(?:\.\d{1,2})?)[ \t]*)?\+?[ \t]*(?P<unit>years?|yrs?|months?)'?[ \t]+(?:of[ \t]+)?(?:(?:professional|industry|industrial|relevant|work|working|hands-on|total|overall|combined|it|software)[ \t]+)?(?:experience|exp)\b|(?:experience|exp)\.?[ \t]*(?:of|:|-)?[ \t]*(?:over|about|around|nearly|approximately|more[ \t]+than)?[ \t]*(?P<lo2>\d{1,2}(?:\.\d{1,2})?)[ \t]*(?:(?:-|to)[ \t]*(?P<hi2>\d{1,2}(?:\.\d{1,2})?)[ \t]*)?\+?[ \t]*(?P<unit2>years?|yrs?|months?)\b)",
        )
        .expect("Invalid experience regex");

        let month_names = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec";
        let date_range_regex = Regex::new(&format!(
            r"(?i)(?:\b({m})[a-z]*\.?\s*|\b(\d{{1,2}})\s*[/.-]\s*)?\b((?:19|20)\d{{2}})\s*(?:-|to|until|till)\s*(?:\b({m})[a-z]*\.?\s*|\b(\d{{1,2}})\s*[/.-]\s*)?\b((?:19|20)\d{{2}}|present|current|now|today|date)\b",
            m = month_names
        ))
        .expect("Invalid date range regex");

        let year_regex = Regex::new(r"\b(19[5-9]\d|20\d{2})\b").expect("Invalid year regex");

        let role_regex = Regex::new(
            r"(?i)\b(?:(?:senior|sr\.?|junior|jr\.?|lead|principal|staff|associate)\s+)?(?:software|web|frontend|front[\s-]?end|backend|back[\s-]?end|full[\s-]?stack|mobile|android|ios|devops|data|machine\s+learning|ml|cloud|qa|test|automation|product|project|engineering|business|ui/?ux|ux|systems?|network|security|database)\s+(?:developer|engineer|programmer|architect|analyst|scientist|manager|designer|consultant)\b",
        )
        .expect("Invalid role regex");

        let degree_regex = Regex::new(
            r"(?:\b(?:(?i:ph\.?\s?d|doctorate|master(?:'?s)?|bachelor(?:'?s)?|diploma|associate(?:'s)?\s+degree|high\s+school|higher\s+secondary)|M\.?B\.?A|B\.?\s?Tech|M\.?\s?Tech|B\.?\s?Sc|M\.?\s?Sc|B\.?\s?Com|M\.?\s?Com|BCA|MCA|B\.\s?E|M\.\s?E|B\.\s?S|M\.\s?S|B\.\s?A|M\.\s?A|BTECH|MTECH|PHD)|^(?:BS|MS|BA|MA|BE|ME))\b",
        )
        .expect("Invalid degree regex");

        let institution_regex = Regex::new(
            r"\b(?:(?:[A-Z][A-Za-z.&'-]*\s+){0,5}(?:University|College|Institute|School|Academy|Polytechnic)(?:\s+(?:of|for|and|&)\s+[A-Z][A-Za-z.&'-]*|\s+[A-Z][A-Za-z.&'-]*){0,5}|(?:IIT|NIT|IIIT|BITS)(?:\s+[A-Z][A-Za-z]*){0,2})\b",
        )
        .expect("Invalid institution regex");

        let location_line_regex = Regex::new(
            r"(?im)^\s*(?:current\s+location|location|address|city|based\s+in|located\s+in)\s*[:\-]\s*(.+)$",
        )
        .expect("Invalid location regex");

        Self {
            tables,
            text_processor: TextProcessor::new(),
            explicit_experience_regex,
            date_range_regex,
            year_regex,
            role_regex,
            degree_regex,
            institution_regex,
            location_line_regex,
        }
    }

    /// Extract a profile from already-extracted resume text.
    ///
    /// Never fails: fields that cannot be found are left empty.
    pub fn extract(&self, text: &str) -> CandidateProfile {
        let normalized = normalize_unicode(text);
        let doc = ResumeDocument::new(&normalized);

        let profile = CandidateProfile {
            name: self.extract_name(&doc),
            email: self.text_processor.extract_email(&normalized),
            phone: self.text_processor.extract_phone(&normalized),
            skills: self.tables.vocabulary.detect(&normalized),
            experience_years: self.extract_experience_years(&doc),
            education: self.extract_education(&doc),
            detected_role: self.extract_role(&doc),
            location: self.extract_location(&doc),
            raw_text: text.to_string(),
        };

        log::info!(
            "Extracted profile: {} skills, {:.1} years experience, {} education entries",
            profile.skills.len(),
            profile.experience_years,
            profile.education.len()
        );

        profile
    }

    /// Extract text from raw document bytes and build the profile.
    pub fn extract_from_document(&self, bytes: &[u8], name_hint: &str) -> Result<CandidateProfile> {
        let extractor = DocumentTextExtractor::new(self.tables.extraction.clone());
        let text = extractor.extract(bytes, name_hint)?;
        Ok(self.extract(&text))
    }

    fn extract_name(&self, doc: &ResumeDocument) -> Option<String> {
        for line in doc.lines().iter().filter(|l| !l.is_empty()).take(5) {
            if ResumeDocument::classify_header(line).is_some() {
                break;
            }

            let candidate = line
                .strip_prefix("Name:")
                .or_else(|| line.strip_prefix("NAME:"))
                .unwrap_or(line)
                .trim();
            let words: Vec<&str> = candidate.split_whitespace().collect();

            if !(2..=4).contains(&words.len()) {
                continue;
            }
            let looks_like_name = words.iter().all(|w| {
                w.chars().next().map_or(false, |c| c.is_uppercase())
                    && w.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '\'' | '-'))
            });
            if !looks_like_name
                || self.role_regex.is_match(candidate)
                || !self.tables.vocabulary.detect(candidate).is_empty()
                || self.tables.locations.find_mention(candidate).is_some()
            {
                continue;
            }

            return Some(capitalize_words(candidate));
        }

        None
    }

    fn extract_role(&self, doc: &ResumeDocument) -> Option<String> {
        let experience = doc.section_text(SectionType::Experience);
        let sources = experience.iter().map(|s| s.as_str()).chain(doc.lines().iter().map(|l| l.as_str()));

        for source in sources {
            if let Some(m) = self.role_regex.find(source) {
                return Some(title_case(m.as_str()));
            }
        }
        None
    }

    fn extract_location(&self, doc: &ResumeDocument) -> Option<String> {
        let full_text = doc.lines().join("\n");
        if let Some(caps) = self.location_line_regex.captures(&full_text) {
            let value = caps[1].trim().trim_end_matches(['.', ',']);
            if !value.is_empty() {
                return Some(value.chars().take(60).collect::<String>().trim().to_string());
            }
        }

        // Contact details usually sit above the first section header.
        let header_end = doc.sections().first().map_or(10, |s| s.heading_line).min(10);
        let header = doc.lines()[..header_end.min(doc.lines().len())].join("\n");
        self.tables.locations.find_mention(&header).map(capitalize_words)
    }

    /// Years of experience: the largest plausible value among explicit
    /// "N years" mentions and the merged span of employment date ranges.
    pub fn extract_years_from_text(&self, text: &str) -> f64 {
        self.extract_experience_years(&ResumeDocument::new(&normalize_unicode(text)))
    }

    fn extract_experience_years(&self, doc: &ResumeDocument) -> f64 {
        let outside_education = doc.text_without(&[SectionType::Education]);
        let range_source = doc
            .section_text(SectionType::Experience)
            .unwrap_or_else(|| outside_education.clone());

        let mut candidates = self.explicit_years(&outside_education);

        let full_text = doc.lines().join("\n");
        let present_year = self
            .tables
            .extraction
            .reference_year
            .or_else(|| self.latest_year(&full_text));
        if let Some(present_year) = present_year {
            if let Some(span) = self.employment_span_years(&range_source, present_year) {
                candidates.push(span);
            }
        }

        let max = self.tables.extraction.max_plausible_experience_years;
        let best = candidates
            .into_iter()
            .filter(|years| years.is_finite() && *years >= 0.0 && *years <= max)
            .fold(0.0, f64::max);

        (best * 10.0).round() / 10.0
    }

    /// Durations stated next to experience wording, in years. For a range
    /// such as "3-5 years" the upper bound is taken.
    fn explicit_years(&self, text: &str) -> Vec<f64> {
        self.explicit_experience_regex
            .captures_iter(text)
            .filter_map(|caps| {
                let value = caps
                    .name("hi")
                    .or_else(|| caps.name("lo"))
                    .or_else(|| caps.name("hi2"))
                    .or_else(|| caps.name("lo2"))?
                    .as_str()
                    .parse::<f64>()
                    .ok()?;
                let unit = caps.name("unit").or_else(|| caps.name("unit2"))?.as_str();
                Some(if unit.to_lowercase().starts_with("month") {
                    value / 12.0
                } else {
                    value
                })
            })
            .collect()
    }

    fn latest_year(&self, text: &str) -> Option<i32> {
        self.year_regex
            .captures_iter(text)
            .filter_map(|caps| caps[1].parse::<i32>().ok())
            .max()
    }

    /// Total months covered by the union of all date ranges, in years.
    /// Overlapping roles are counted once.
    fn employment_span_years(&self, text: &str, present_year: i32) -> Option<f64> {
        let max_months = (self.tables.extraction.max_plausible_experience_years * 12.0) as MonthIndex;

        let mut intervals: Vec<(MonthIndex, MonthIndex)> = self
            .date_range_regex
            .captures_iter(text)
            .filter_map(|caps| self.parse_range(&caps, present_year))
            .filter(|(start, end)| end >= start && end - start <= max_months)
            .collect();

        if intervals.is_empty() {
            return None;
        }

        intervals.sort_unstable();
        let mut total = 0;
        let (mut current_start, mut current_end) = intervals[0];
        for &(start, end) in &intervals[1..] {
            if start <= current_end {
                current_end = current_end.max(end);
            } else {
                total += current_end - current_start;
                current_start = start;
                current_end = end;
            }
        }
        total += current_end - current_start;

        Some(total as f64 / 12.0)
    }

    /// Year-only ranges count whole years ("2016 - 2020" is four years).
    /// Once either side names a month the range is counted in months with the
    /// end month included; a missing start month is January and a missing end
    /// month (including "present") is December.
    fn parse_range(&self, caps: &Captures<'_>, present_year: i32) -> Option<(MonthIndex, MonthIndex)> {
        let start_year: i64 = caps.get(3)?.as_str().parse().ok()?;
        let start_month = month_from(caps.get(1).map(|m| m.as_str()), caps.get(2).map(|m| m.as_str()));

        let end_token = caps.get(6)?.as_str();
        let end_month = month_from(caps.get(4).map(|m| m.as_str()), caps.get(5).map(|m| m.as_str()));
        let end_year = end_token.parse::<i64>().unwrap_or(i64::from(present_year));

        if start_month.is_none() && end_month.is_none() {
            return Some((start_year * 12, end_year * 12));
        }

        Some((
            start_year * 12 + start_month.unwrap_or(0),
            end_year * 12 + end_month.unwrap_or(11) + 1,
        ))
    }

    fn extract_education(&self, doc: &ResumeDocument) -> Vec<Education> {
        let (lines, require_institution): (Vec<String>, bool) = match doc.section(SectionType::Education) {
            Some(_) => (
                doc.sections()
                    .iter()
                    .filter(|s| s.section_type == SectionType::Education)
                    .flat_map(|s| s.lines.iter().cloned())
                    .filter(|l| !l.is_empty())
                    .collect(),
                false,
            ),
            // Without a header only lines naming both a degree and a school count.
            None => (doc.lines().iter().filter(|l| !l.is_empty()).cloned().collect(), true),
        };

        let mut entries: Vec<Education> = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            let Some(degree_match) = self.degree_regex.find(line) else {
                continue;
            };

            let mut institution = self
                .institution_regex
                .find(line)
                .map(|m| (m.start(), clean_phrase(m.as_str())));

            if institution.is_none() && !require_institution {
                institution = lines
                    .get(idx + 1)
                    .filter(|next| !self.degree_regex.is_match(next))
                    .and_then(|next| self.institution_regex.find(next))
                    .map(|m| (usize::MAX, clean_phrase(m.as_str())));
            }

            if require_institution && institution.is_none() {
                continue;
            }

            let institution_start = institution.as_ref().map(|(pos, _)| *pos);
            let degree = self.degree_text(line, degree_match.start(), degree_match.end(), institution_start);
            let entry = Education {
                degree,
                institution: institution.map(|(_, name)| name).filter(|name| !name.is_empty()),
            };

            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }

        entries
    }

    /// Degree phrase from the keyword up to the first delimiter or the institution.
    fn degree_text(&self, line: &str, start: usize, keyword_end: usize, institution_start: Option<usize>) -> String {
        let rest = &line[start..];
        let mut end = rest.len();

        for delimiter in [",", "|", "(", ";", " - ", " from ", " at ", " From ", " At "] {
            if let Some(pos) = rest.find(delimiter) {
                end = end.min(pos);
            }
        }
        if let Some(inst) = institution_start.filter(|&pos| pos > start) {
            end = end.min(inst - start);
        }

        let degree = rest[..end].trim().trim_end_matches(['.', '-', ' ']).trim();
        if degree.is_empty() || degree.len() > 80 {
            line[start..keyword_end].to_string()
        } else {
            degree.to_string()
        }
    }
}

fn month_from(name: Option<&str>, number: Option<&str>) -> Option<i64> {
    if let Some(name) = name {
        let lower = name.to_lowercase();
        return MONTHS.iter().position(|m| *m == lower).map(|i| i as i64);
    }
    number
        .and_then(|n| n.parse::<i64>().ok())
        .filter(|n| (1..=12).contains(n))
        .map(|n| n - 1)
}

fn clean_phrase(text: &str) -> String {
    text.trim().trim_end_matches(['.', ',', '-']).trim().to_string()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Capitalize lowercase or shouting words; mixed case such as `McDonald` is kept.
fn capitalize_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let has_lower = word.chars().any(|c| c.is_lowercase());
            let has_upper = word.chars().any(|c| c.is_uppercase());
            if has_lower && has_upper {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Like [`capitalize_words`] but leaves short acronyms such as `QA` or `ML` alone.
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let is_acronym = word.len() <= 3 && word.chars().filter(|c| c.is_alphabetic()).all(|c| c.is_uppercase());
            if is_acronym {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::CandidateFitError;

    fn tables() -> ReferenceTables {
        ReferenceTables::from_config(&Config::default()).unwrap()
    }

    const RESUME: &str = "JOHN DOE
john.doe@example.com | +91 98765 43210 | Bengaluru, India

Summary
Backend developer with 6 years of experience building APIs.

Work Experience
Senior Software Engineer, Acme Corp
Jan 2020 - Dec 2023
Built microservices in Python and Golang on AWS with Docker and Kubernetes.

Software Engineer, Beta Labs
Jun 2017 - Dec 2019
Java and SQL services.

Education
B.Tech in Computer Science, Anna University, 2013 - 2017

Skills: Python, Java, SQL, Docker";

    #[test]
    fn test_extracts_full_profile() {
        let tables = tables();
        let profile = ProfileExtractor::new(&tables).extract(RESUME);

        assert_eq!(profile.name.as_deref(), Some("John Doe"));
        assert_eq!(profile.email.as_deref(), Some("john.doe@example.com"));
        assert_eq!(profile.phone.as_deref(), Some("+919876543210"));
        assert!(profile.skills.contains("Python"));
        assert!(profile.skills.contains("Kubernetes"));
        assert!(profile.skills.contains("Microservices"));
        assert_eq!(profile.detected_role.as_deref(), Some("Senior Software Engineer"));
        assert_eq!(profile.location.as_deref(), Some("Bangalore"));

        assert_eq!(profile.education.len(), 1);
        assert_eq!(profile.education[0].degree, "B.Tech in Computer Science");
        assert_eq!(profile.education[0].institution.as_deref(), Some("Anna University"));
    }

    #[test]
    fn test_experience_prefers_largest_plausible_candidate() {
        let tables = tables();
        let profile = ProfileExtractor::new(&tables).extract(RESUME);

        // Jun 2017 through Dec 2023 is 79 months; the summary claims 6 years.
        assert_eq!(profile.experience_years, 6.6);
    }

    #[test]
    fn test_overlapping_ranges_do_not_sum() {
        let tables = tables();
        let extractor = ProfileExtractor::new(&tables);

        let years = extractor.extract_years_from_text("Experience\nAcme 2015 - 2020\nSide gig 2016 - 2019");
        assert_eq!(years, 5.0);

        let years = extractor.extract_years_from_text("Experience\nAcme 2010 - 2012\nBeta 2014 - 2016");
        assert_eq!(years, 4.0);
    }

    #[test]
    fn test_explicit_years_and_implausible_values() {
        let tables = tables();
        let extractor = ProfileExtractor::new(&tables);

        assert_eq!(extractor.extract_years_from_text("5 years of experience in Python"), 5.0);
        assert_eq!(extractor.extract_years_from_text("3-5 years of hands-on experience building services"), 5.0);
        assert_eq!(extractor.extract_years_from_text("Experience: 4 yrs in retail banking"), 4.0);
        assert_eq!(extractor.extract_years_from_text("18 months of industry experience"), 1.5);
        assert_eq!(extractor.extract_years_from_text("Over 99 years of wisdom"), 0.0);
        assert_eq!(extractor.extract_years_from_text("No numbers at all"), 0.0);
    }

    #[test]
    fn test_durations_unrelated_to_experience_are_ignored() {
        let tables = tables();
        let profile = ProfileExtractor::new(&tables).extract(
            "Jane Roe\nAge: 42 years\n\nExperience\nAnalyst, Acme Corp (a 30 year old firm)\nJan 2022 - Dec 2023\n",
        );
        assert_eq!(profile.experience_years, 2.0);

        let extractor = ProfileExtractor::new(&tables);
        assert_eq!(extractor.extract_years_from_text("Volunteered 12 years with the scouts"), 0.0);
        assert_eq!(extractor.extract_years_from_text("Warranty of 3 years on every install"), 0.0);
    }

    #[test]
    fn test_present_resolves_without_wall_clock() {
        let mut config = Config::default();
        config.extraction.reference_year = Some(2024);
        let tables = ReferenceTables::from_config(&config).unwrap();
        let extractor = ProfileExtractor::new(&tables);

        assert_eq!(extractor.extract_years_from_text("Experience\nAcme 2019 - Present"), 5.0);

        // Without a reference year the latest year in the document is used.
        let tables = ReferenceTables::from_config(&Config::default()).unwrap();
        let extractor = ProfileExtractor::new(&tables);
        assert_eq!(
            extractor.extract_years_from_text("Experience\nBeta 2015 - 2018\nAcme 2018 - Present\nAward 2022"),
            7.0
        );
    }

    #[test]
    fn test_education_years_are_not_experience() {
        let tables = tables();
        let years = ProfileExtractor::new(&tables)
            .extract_years_from_text("Education\nBachelor of Science, Stanford University, 2010 - 2014");
        assert_eq!(years, 0.0);
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let tables = tables();
        let profile = ProfileExtractor::new(&tables).extract("just some words about gardening");

        assert_eq!(profile.name, None);
        assert_eq!(profile.email, None);
        assert_eq!(profile.phone, None);
        assert!(profile.skills.is_empty());
        assert_eq!(profile.experience_years, 0.0);
        assert!(profile.education.is_empty());
    }

    #[test]
    fn test_education_on_following_line() {
        let tables = tables();
        let profile = ProfileExtractor::new(&tables)
            .extract("Education\nMaster of Science in Data Science\nIndian Institute of Technology Bombay\n2018 - 2020");

        assert_eq!(profile.education.len(), 1);
        assert_eq!(profile.education[0].degree, "Master of Science in Data Science");
        assert_eq!(
            profile.education[0].institution.as_deref(),
            Some("Indian Institute of Technology Bombay")
        );
    }

    #[test]
    fn test_plural_degree_spellings() {
        let tables = tables();
        let profile = ProfileExtractor::new(&tables).extract(
            "Education\nBachelors in Computer Science, Anna University\nMasters in Data Science, Stanford University",
        );

        assert_eq!(
            profile.education,
            vec![
                Education {
                    degree: "Bachelors in Computer Science".to_string(),
                    institution: Some("Anna University".to_string()),
                },
                Education {
                    degree: "Masters in Data Science".to_string(),
                    institution: Some("Stanford University".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_extract_from_document_rejects_garbage() {
        let tables = tables();
        let result = ProfileExtractor::new(&tables).extract_from_document(b"", "resume.pdf");
        assert!(matches!(result, Err(CandidateFitError::UnreadableDocument(_))));
    }
}
