//! Analysis engine combining skill gap, salary, career and location analysis

use crate::processing::career::{CareerAdvisor, CareerGrowth};
use crate::processing::location::{LocationAnalysis, LocationAnalyzer};
use crate::processing::profile::CandidateProfile;
use crate::processing::reference::{ReferenceTables, RoleMatch};
use crate::processing::salary::{SalaryModel, SalaryProjection};
use crate::processing::skill_gap::{SkillGapResult, SkillGapScorer};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A job to analyze a candidate against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    /// Free-text requirements or the full job description. Job files
    /// spell the key `requirements`.
    #[serde(alias = "requirements")]
    pub requirement_text: String,
}

impl JobRequirement {
    pub fn new(title: impl Into<String>, location: impl Into<String>, requirement_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            location: location.into(),
            requirement_text: requirement_text.into(),
        }
    }
}

/// Results that rest on a fallback rather than real data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConfidenceFlag {
    /// No vocabulary skill in the requirements; match percentage is vacuous.
    EmptyRequirementSkills,
    /// Role not in the salary table; industry average used.
    UnknownRole,
    /// Location not recognized; national averages used.
    UnknownLocation,
}

/// Complete analysis of one candidate against one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIAnalysis {
    /// Role used for the salary lookup.
    pub role: String,
    /// Location used for salary and market data, as given.
    pub target_location: String,
    pub skill_gap: SkillGapResult,
    pub salary: SalaryProjection,
    pub career: CareerGrowth,
    pub location: LocationAnalysis,
    pub low_confidence: Vec<ConfidenceFlag>,
}

impl AIAnalysis {
    pub fn is_low_confidence(&self) -> bool {
        !self.low_confidence.is_empty()
    }
}

/// Runs every analysis for a profile and a job.
///
/// Holds only shared references to the reference tables, so one engine can
/// serve any number of concurrent analyses.
pub struct AnalysisEngine<'a> {
    tables: &'a ReferenceTables,
    skill_gap: SkillGapScorer<'a>,
    salary: SalaryModel<'a>,
    career: CareerAdvisor<'a>,
    location: LocationAnalyzer<'a>,
}

impl<'a> AnalysisEngine<'a> {
    pub fn new(tables: &'a ReferenceTables) -> Self {
        Self {
            tables,
            skill_gap: SkillGapScorer::new(tables),
            salary: SalaryModel::new(tables),
            career: CareerAdvisor::new(&tables.high_value_skills),
            location: LocationAnalyzer::new(tables),
        }
    }

    /// Skill gap, then salary, career and location analysis.
    ///
    /// The job title is the role when present, otherwise the role detected
    /// in the resume. The job location likewise falls back to the resume's.
    pub fn analyze(&self, profile: &CandidateProfile, job: &JobRequirement) -> AIAnalysis {
        let start_time = Instant::now();

        let role = non_blank(&job.title)
            .or_else(|| profile.detected_role.as_deref().and_then(non_blank))
            .unwrap_or_default()
            .to_string();
        let location = non_blank(&job.location)
            .or_else(|| profile.location.as_deref().and_then(non_blank))
            .unwrap_or_default()
            .to_string();

        // 1. Skill gap
        let skill_gap = self.skill_gap.score(profile, &job.requirement_text);

        // 2. Salary, using only the skills the job asks for
        let salary = self
            .salary
            .project(&role, profile.experience_years, &location, &skill_gap.matched);

        // 3. Career growth, focused on what the job is missing
        let career = self.career.advise(profile.experience_years, Some(&skill_gap));

        // 4. Location market
        let location_analysis = self.location.analyze(&location, &profile.skills);

        let mut low_confidence = Vec::new();
        if skill_gap.low_confidence {
            low_confidence.push(ConfidenceFlag::EmptyRequirementSkills);
        }
        if salary.role_match == RoleMatch::Default {
            log::warn!("Unknown role '{}', using the industry average salary", role);
            low_confidence.push(ConfidenceFlag::UnknownRole);
        }
        if location_analysis.low_confidence {
            low_confidence.push(ConfidenceFlag::UnknownLocation);
        }

        log::info!(
            "Analysis for role '{}' finished in {}ms: {}% match, salary {}",
            role,
            start_time.elapsed().as_millis(),
            skill_gap.match_percentage,
            salary.projected_salary
        );

        AIAnalysis {
            role,
            target_location: location,
            skill_gap,
            salary,
            career,
            location: location_analysis,
            low_confidence,
        }
    }

    /// Analyze one profile against several jobs, in input order.
    pub fn analyze_all(&self, profile: &CandidateProfile, jobs: &[JobRequirement]) -> Vec<AIAnalysis> {
        jobs.iter().map(|job| self.analyze(profile, job)).collect()
    }

    pub fn get_stats(&self) -> AnalysisEngineStats {
        AnalysisEngineStats {
            skill_count: self.tables.vocabulary.len(),
            role_count: self.tables.roles.len(),
            location_count: self.tables.locations.len(),
        }
    }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisEngineStats {
    pub skill_count: usize,
    pub role_count: usize,
    pub location_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::processing::career::CareerLevel;
    use crate::processing::profile::ProfileExtractor;

    #[test]
    fn test_full_analysis() {
        let tables = ReferenceTables::from_config(&Config::default()).unwrap();
        let profile = ProfileExtractor::new(&tables).extract("5 years of experience in Python, Java, AWS");
        let job = JobRequirement::new("Backend Developer", "Hyderabad", "Python, Java, Docker, Kubernetes");

        let analysis = AnalysisEngine::new(&tables).analyze(&profile, &job);

        assert_eq!(analysis.skill_gap.match_percentage, 50);
        assert_eq!(analysis.career.current_level, CareerLevel::Senior);
        assert_eq!(analysis.salary.role_match, RoleMatch::Exact);
        assert_eq!(analysis.location.location.as_deref(), Some("hyderabad"));
        assert!(analysis.low_confidence.is_empty());
        assert_eq!(analysis.career.focus_skills, vec!["Docker", "Kubernetes"]);
        assert!(analysis.career.recommendations[0].contains("Docker"));
    }

    #[test]
    fn test_fallbacks_are_flagged() {
        let tables = ReferenceTables::from_config(&Config::default()).unwrap();
        let profile = ProfileExtractor::new(&tables).extract("Gardener who loves plants");
        let job = JobRequirement::new("", "Atlantis", "Must love plants");

        let analysis = AnalysisEngine::new(&tables).analyze(&profile, &job);

        assert_eq!(
            analysis.low_confidence,
            vec![
                ConfidenceFlag::EmptyRequirementSkills,
                ConfidenceFlag::UnknownRole,
                ConfidenceFlag::UnknownLocation
            ]
        );
        assert!(analysis.is_low_confidence());
    }

    #[test]
    fn test_detected_role_used_when_title_blank() {
        let tables = ReferenceTables::from_config(&Config::default()).unwrap();
        let profile = ProfileExtractor::new(&tables).extract("Experience\nData Scientist at Acme\n2019 - 2022\nPython");
        let job = JobRequirement::new("  ", "Pune", "Python");

        let analysis = AnalysisEngine::new(&tables).analyze(&profile, &job);
        assert_eq!(analysis.role, "Data Scientist");
        assert_eq!(analysis.salary.base_salary, 1_100_000);
    }

    #[test]
    fn test_serialized_field_names() {
        let tables = ReferenceTables::from_config(&Config::default()).unwrap();
        let profile = ProfileExtractor::new(&tables).extract("Pune\n4 years of experience with Python and SQL");
        let job = JobRequirement::new("Data Analyst", "Pune", "Python, Tableau, SQL");

        let value = serde_json::to_value(AnalysisEngine::new(&tables).analyze(&profile, &job)).unwrap();

        assert_eq!(value["target_location"], "Pune");
        assert!(value["salary"]["projected_salary"].is_u64());
        assert!(value["salary"]["salary_band"]["low"].is_u64());
        assert!(value["salary"]["salary_band"]["high"].is_u64());
        assert!(value["skill_gap"]["matched"].is_array());
        assert!(value["skill_gap"]["missing"].is_array());
        assert!(value["skill_gap"].get("similarity").is_some());
        assert!(value["career"]["path"]["Promotion"]["target"].is_string());
        assert_eq!(value["location"]["location"], "pune");
        assert!(value["location"]["matched_in_demand"].is_array());
        assert!(value["location"]["missing_in_demand"].is_array());
    }
}
