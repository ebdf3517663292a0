//! Skill gap scoring between a candidate and a job's requirements

use crate::processing::profile::CandidateProfile;
use crate::processing::reference::ReferenceTables;
use crate::processing::similarity::{SimilarityScorer, TextSimilarity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGapResult {
    /// Every vocabulary skill found in the requirements.
    pub job_skills: BTreeSet<String>,
    /// Skills the job asks for that the candidate has.
    pub matched: BTreeSet<String>,
    /// Skills the job asks for that the candidate lacks.
    pub missing: BTreeSet<String>,
    /// Share of required skills the candidate has, 0-100.
    pub match_percentage: u8,
    /// No vocabulary skill was found in the requirements, so the
    /// percentage is vacuously 100.
    pub low_confidence: bool,
    /// Whole-text similarity, when both texts have usable terms.
    pub similarity: Option<TextSimilarity>,
}

pub struct SkillGapScorer<'a> {
    tables: &'a ReferenceTables,
    similarity: SimilarityScorer,
}

impl<'a> SkillGapScorer<'a> {
    pub fn new(tables: &'a ReferenceTables) -> Self {
        Self {
            tables,
            similarity: SimilarityScorer::new(
                tables.scoring.strong_similarity_threshold,
                tables.scoring.moderate_similarity_threshold,
            ),
        }
    }

    /// Skill sets for the requirement text, plus TF-IDF similarity against
    /// the resume text.
    pub fn score(&self, profile: &CandidateProfile, requirement_text: &str) -> SkillGapResult {
        let mut result = self.score_skills(&profile.skills, requirement_text);
        result.similarity = self.similarity.compare(&profile.raw_text, requirement_text);
        result
    }

    /// Discrete skill comparison only.
    pub fn score_skills(&self, candidate_skills: &BTreeSet<String>, requirement_text: &str) -> SkillGapResult {
        let required = self.tables.vocabulary.detect(requirement_text);

        let matched: BTreeSet<String> = required.intersection(candidate_skills).cloned().collect();
        let missing: BTreeSet<String> = required.difference(candidate_skills).cloned().collect();

        let (match_percentage, low_confidence) = if required.is_empty() {
            log::warn!("No known skills found in job requirements; reporting a vacuous 100% match");
            (100, true)
        } else {
            let ratio = matched.len() as f64 / required.len() as f64;
            ((ratio * 100.0).round() as u8, false)
        };

        log::debug!(
            "Skill gap: {} matched, {} missing, {}%",
            matched.len(),
            missing.len(),
            match_percentage
        );

        SkillGapResult {
            job_skills: required,
            matched,
            missing,
            match_percentage,
            low_confidence,
            similarity: None,
        }
    }
}

impl SkillGapResult {
    /// Missing skills to work on first: high-value skills, then alphabetical.
    pub fn priority_missing(&self, high_value: &BTreeSet<String>, limit: usize) -> Vec<String> {
        let (mut first, rest): (Vec<&String>, Vec<&String>) =
            self.missing.iter().partition(|skill| high_value.contains(*skill));
        first.extend(rest);
        first.into_iter().take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn tables() -> ReferenceTables {
        ReferenceTables::from_config(&Config::default()).unwrap()
    }

    fn skills(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_matched_and_missing() {
        let tables = tables();
        let scorer = SkillGapScorer::new(&tables);

        let result = scorer.score_skills(&skills(&["Python", "Java", "AWS"]), "Python, Java, Docker, Kubernetes");

        assert_eq!(result.matched, skills(&["Java", "Python"]));
        assert_eq!(result.missing, skills(&["Docker", "Kubernetes"]));
        assert_eq!(result.match_percentage, 50);
        assert!(!result.low_confidence);
    }

    #[test]
    fn test_empty_requirements_are_vacuous_match() {
        let tables = tables();
        let result = SkillGapScorer::new(&tables).score_skills(&skills(&["Python"]), "Must be a friendly person");

        assert_eq!(result.match_percentage, 100);
        assert!(result.low_confidence);
        assert!(result.matched.is_empty());
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_percentage_rounds_to_nearest() {
        let tables = tables();
        let result = SkillGapScorer::new(&tables).score_skills(&skills(&["Python"]), "Python, Java, SQL");
        assert_eq!(result.match_percentage, 33);

        let result = SkillGapScorer::new(&tables).score_skills(&skills(&["Python", "Java"]), "Python, Java, SQL");
        assert_eq!(result.match_percentage, 67);
    }

    #[test]
    fn test_priority_missing_puts_high_value_first() {
        let tables = tables();
        let result = SkillGapScorer::new(&tables).score_skills(&BTreeSet::new(), "Angular, Bash, Kubernetes, AWS");

        let priority = result.priority_missing(&tables.high_value_skills, 3);
        assert_eq!(priority, vec!["AWS", "Kubernetes", "Angular"]);
    }
}
