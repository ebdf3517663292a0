//! Skill vocabulary matching

use crate::error::{CandidateFitError, Result};
use crate::processing::text_processor::normalize_for_matching;
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Finds vocabulary skills in free text.
///
/// Patterns and input are both run through [`normalize_for_matching`], so a
/// match is only accepted when it starts and ends on a token boundary. This
/// keeps `java` from matching inside `javascript`.
pub struct SkillVocabulary {
    matcher: AhoCorasick,
    /// Canonical name for each pattern, by pattern index.
    canonical: Vec<String>,
    /// Normalized spelling (skills and aliases) to canonical name.
    lookup: BTreeMap<String, String>,
    skills: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillOccurrence {
    pub skill: String,
    /// Byte offsets into the normalized text.
    pub positions: Vec<usize>,
    pub count: usize,
}

impl SkillVocabulary {
    pub fn new(skills: &[String], aliases: &BTreeMap<String, String>) -> Result<Self> {
        let mut lookup: BTreeMap<String, String> = BTreeMap::new();

        for skill in skills {
            let key = normalize_for_matching(skill);
            if key.is_empty() {
                continue;
            }
            lookup.entry(key).or_insert_with(|| skill.clone());
        }

        let canonical_skills: BTreeSet<String> = lookup.values().cloned().collect();

        for (alias, target) in aliases {
            if !canonical_skills.contains(target) {
                return Err(CandidateFitError::Configuration(format!(
                    "Skill alias '{}' points to unknown skill '{}'",
                    alias, target
                )));
            }
            let key = normalize_for_matching(alias);
            if !key.is_empty() {
                // A canonical spelling always wins over an alias.
                lookup.entry(key).or_insert_with(|| target.clone());
            }
        }

        let patterns: Vec<&String> = lookup.keys().collect();
        let canonical: Vec<String> = lookup.values().cloned().collect();

        let matcher = AhoCorasick::new(&patterns).map_err(|e| {
            CandidateFitError::Configuration(format!("Failed to build skill matcher: {}", e))
        })?;

        log::debug!(
            "Built skill vocabulary with {} skills and {} patterns",
            canonical_skills.len(),
            patterns.len()
        );

        Ok(Self {
            matcher,
            canonical,
            lookup,
            skills: canonical_skills,
        })
    }

    /// Canonical skills mentioned in the text.
    pub fn detect(&self, text: &str) -> BTreeSet<String> {
        self.find_matches(text).into_iter().map(|o| o.skill).collect()
    }

    /// Every vocabulary skill in the text with its positions, ordered by skill name.
    pub fn find_matches(&self, text: &str) -> Vec<SkillOccurrence> {
        let normalized = normalize_for_matching(text);
        let bytes = normalized.as_bytes();

        let mut spans: Vec<(usize, usize, usize)> = self
            .matcher
            .find_overlapping_iter(&normalized)
            .filter(|m| {
                let starts_clean = m.start() == 0 || bytes[m.start() - 1] == b' ';
                let ends_clean = m.end() == bytes.len() || bytes[m.end()] == b' ';
                starts_clean && ends_clean
            })
            .map(|m| (m.start(), m.end(), m.pattern().as_usize()))
            .collect();

        // Longest match wins when spans overlap ("react native" over "react").
        spans.sort_by(|a, b| a.0.cmp(&b.0).then((b.1 - b.0).cmp(&(a.1 - a.0))));

        let mut occurrences: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut covered_until = 0;
        for (start, end, pattern) in spans {
            if start < covered_until {
                continue;
            }
            covered_until = end;
            occurrences
                .entry(self.canonical[pattern].clone())
                .or_default()
                .push(start);
        }

        occurrences
            .into_iter()
            .map(|(skill, positions)| SkillOccurrence {
                count: positions.len(),
                skill,
                positions,
            })
            .collect()
    }

    /// Resolve a spelling or alias to its canonical skill name.
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        self.lookup.get(&normalize_for_matching(name)).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReferenceConfig;

    fn vocabulary() -> SkillVocabulary {
        let reference = ReferenceConfig::default();
        SkillVocabulary::new(&reference.skills, &reference.skill_aliases).unwrap()
    }

    #[test]
    fn test_detects_canonical_names() {
        let skills = vocabulary().detect("5 years of experience in python, JAVA and aws.");
        let expected: BTreeSet<String> = ["AWS", "Java", "Python"].iter().map(|s| s.to_string()).collect();
        assert_eq!(skills, expected);
    }

    #[test]
    fn test_no_substring_false_positives() {
        let skills = vocabulary().detect("Built single page apps in JavaScript");
        assert!(skills.contains("JavaScript"));
        assert!(!skills.contains("Java"));
    }

    #[test]
    fn test_symbols_in_skill_names() {
        let skills = vocabulary().detect("Languages: C++, C#; frameworks: Node.js and ASP.NET");
        assert!(skills.contains("C++"));
        assert!(skills.contains("C#"));
        assert!(skills.contains("Node.js"));
        assert!(skills.contains("ASP.NET"));
    }

    #[test]
    fn test_aliases_and_longest_match() {
        let vocab = vocabulary();
        let skills = vocab.detect("Deployed on k8s, wrote React Native apps");
        assert!(skills.contains("Kubernetes"));
        assert!(skills.contains("React Native"));
        assert!(!skills.contains("React"));

        assert_eq!(vocab.canonical_name("postgres"), Some("PostgreSQL"));
        assert_eq!(vocab.canonical_name("Python"), Some("Python"));
        assert_eq!(vocab.canonical_name("cobol"), None);
    }

    #[test]
    fn test_occurrence_counts() {
        let matches = vocabulary().find_matches("Python and more Python, then SQL");
        let python = matches.iter().find(|m| m.skill == "Python").unwrap();
        assert_eq!(python.count, 2);
    }

    #[test]
    fn test_unknown_alias_target_rejected() {
        let mut aliases = BTreeMap::new();
        aliases.insert("rs".to_string(), "Rustlang".to_string());
        let result = SkillVocabulary::new(&["Rust".to_string()], &aliases);
        assert!(matches!(result, Err(CandidateFitError::Configuration(_))));
    }
}
