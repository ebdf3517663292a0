//! Report structures combining a profile, a job and its analysis

use crate::processing::analyzer::{AIAnalysis, ConfidenceFlag, JobRequirement};
use crate::processing::career::CareerLevel;
use crate::processing::profile::CandidateProfile;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Everything needed to render one candidate/job analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Headline numbers
    pub summary: ReportSummary,

    /// Extracted candidate profile
    pub profile: CandidateProfile,

    /// Job title and location as given; requirements text is not repeated
    pub job_title: String,
    pub job_location: String,

    /// Full analysis results
    pub analysis: AIAnalysis,

    /// Report metadata and generation info
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub candidate_name: Option<String>,
    pub match_percentage: u8,
    pub verdict: FitVerdict,
    pub career_level: CareerLevel,
    pub projected_salary: u64,
    /// Strengths worth leading with: matched skills, high-value first
    pub strengths: Vec<String>,
    /// Skills to work on first
    pub improvement_areas: Vec<String>,
    pub confidence_notes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitVerdict {
    Strong,
    Good,
    Partial,
    Weak,
}

impl FitVerdict {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            80..=u8::MAX => FitVerdict::Strong,
            60..=79 => FitVerdict::Good,
            40..=59 => FitVerdict::Partial,
            _ => FitVerdict::Weak,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            FitVerdict::Strong => "Strong fit: the candidate covers nearly every listed skill",
            FitVerdict::Good => "Good fit with a few gaps to close",
            FitVerdict::Partial => "Partial fit: significant skill gaps",
            FitVerdict::Weak => "Weak fit for this role",
        }
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    /// Version of the engine used
    pub engine_version: String,

    /// Resume file analyzed
    pub resume_file: String,

    /// Job description file analyzed, if the job came from a file
    pub job_file: Option<String>,
}

impl AnalysisReport {
    pub fn new(
        profile: CandidateProfile,
        job: &JobRequirement,
        analysis: AIAnalysis,
        resume_file: &str,
        job_file: Option<&str>,
    ) -> Self {
        let summary = Self::create_summary(&profile, &analysis);

        Self {
            summary,
            profile,
            job_title: job.title.clone(),
            job_location: job.location.clone(),
            analysis,
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                resume_file: resume_file.to_string(),
                job_file: job_file.map(|f| f.to_string()),
            },
        }
    }

    fn create_summary(profile: &CandidateProfile, analysis: &AIAnalysis) -> ReportSummary {
        let match_percentage = analysis.skill_gap.match_percentage;

        let mut strengths: Vec<String> = analysis
            .salary
            .bonus_skills
            .iter()
            .chain(
                analysis
                    .skill_gap
                    .matched
                    .iter()
                    .filter(|skill| !analysis.salary.bonus_skills.contains(*skill)),
            )
            .cloned()
            .collect();
        strengths.truncate(5);

        ReportSummary {
            candidate_name: profile.name.clone(),
            match_percentage,
            verdict: FitVerdict::from_percentage(match_percentage),
            career_level: analysis.career.current_level,
            projected_salary: analysis.salary.projected_salary,
            strengths,
            improvement_areas: analysis.career.focus_skills.clone(),
            confidence_notes: analysis.low_confidence.iter().map(confidence_note).collect(),
        }
    }
}

pub fn confidence_note(flag: &ConfidenceFlag) -> String {
    match flag {
        ConfidenceFlag::EmptyRequirementSkills => {
            "No known skills found in the job requirements; the match percentage is not meaningful".to_string()
        }
        ConfidenceFlag::UnknownRole => "Role not recognized; salary uses the industry average".to_string(),
        ConfidenceFlag::UnknownLocation => {
            "Location not recognized; market data uses national averages".to_string()
        }
    }
}
