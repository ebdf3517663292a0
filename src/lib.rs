//! Candidate profile extraction and job-fit analytics
//!
//! Turns a resume into a [`CandidateProfile`] and analyzes it against a job:
//! skill gap, salary projection, career growth and location market insights.
//!
//! ```no_run
//! use candidate_fit::{AnalysisEngine, Config, JobRequirement, ProfileExtractor, ReferenceTables};
//!
//! let tables = ReferenceTables::from_config(&Config::default())?;
//! let profile = ProfileExtractor::new(&tables).extract("5 years of experience in Python, Java, AWS");
//! let job = JobRequirement::new("Backend Developer", "Pune", "Python, Java, Docker, Kubernetes");
//! let analysis = AnalysisEngine::new(&tables).analyze(&profile, &job);
//! assert_eq!(analysis.skill_gap.match_percentage, 50);
//! # Ok::<(), candidate_fit::CandidateFitError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{CandidateFitError, Result};
pub use processing::analyzer::{AIAnalysis, AnalysisEngine, ConfidenceFlag, JobRequirement};
pub use processing::profile::{CandidateProfile, Education, ProfileExtractor};
pub use processing::reference::ReferenceTables;
