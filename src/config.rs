//! Configuration management for the candidate fit engine
//!
//! The reference tables (skill vocabulary, role salaries, location market
//! data) live here as plain serializable data. They are compiled once into
//! [`crate::processing::reference::ReferenceTables`] and never mutated.

use crate::error::{CandidateFitError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub reference: ReferenceConfig,
    pub extraction: ExtractionConfig,
    pub scoring: ScoringConfig,
    pub output: OutputConfig,
}

/// Static reference data shared by every analysis.
///
/// Plain values are declared before nested tables so the TOML serializer can
/// emit them in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Base salary used when a role is not in `role_salaries`.
    pub industry_average_salary: u64,
    /// Canonical skill names, as they should be displayed.
    pub skills: Vec<String>,
    /// Skills that earn the salary skill bonus.
    pub high_value_skills: Vec<String>,
    /// Alternative spellings mapped to a canonical skill name.
    pub skill_aliases: BTreeMap<String, String>,
    /// Role name to base salary.
    pub role_salaries: BTreeMap<String, u64>,
    pub national_average: LocationEntry,
    pub locations: BTreeMap<String, LocationEntry>,
    pub location_aliases: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationEntry {
    pub growth_pct: f64,
    pub market_strength: u8,
    pub salary_multiplier: f64,
    pub in_demand_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Inputs above this size are rejected before parsing.
    pub max_document_bytes: usize,
    /// Minimum non-whitespace characters for extracted text to count as readable.
    pub min_text_chars: usize,
    /// Minimum share of alphabetic characters among non-whitespace characters.
    pub min_alphabetic_ratio: f64,
    pub max_plausible_experience_years: f64,
    /// Year that "present" resolves to. When unset, the latest year in the
    /// document is used so extraction never depends on the wall clock.
    pub reference_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub experience_step: f64,
    pub experience_cap_years: f64,
    pub skill_bonus_step: f64,
    pub skill_bonus_cap: f64,
    pub salary_rounding: u64,
    pub strong_similarity_threshold: f32,
    pub moderate_similarity_threshold: f32,
    pub location_fuzzy_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn location(growth_pct: f64, market_strength: u8, salary_multiplier: f64, in_demand: &[&str]) -> LocationEntry {
    LocationEntry {
        growth_pct,
        market_strength,
        salary_multiplier,
        in_demand_skills: strings(in_demand),
    }
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        let skills = strings(&[
            // Programming languages
            "Python", "Java", "JavaScript", "TypeScript", "C++", "C#", "Rust", "Golang",
            "Ruby", "PHP", "Swift", "Kotlin", "Scala", "Perl", "MATLAB", "SQL", "Bash",
            "PowerShell",
            // Web frontend
            "HTML", "CSS", "React", "Angular", "Vue", "Svelte", "Bootstrap", "Tailwind",
            "jQuery", "SASS", "Webpack", "Next.js",
            // Web backend
            "Node.js", "Express.js", "Django", "Flask", "Spring Boot", "Laravel",
            "Ruby on Rails", "ASP.NET", "FastAPI", "NestJS", "GraphQL", "REST API",
            "Microservices",
            // Databases
            "MySQL", "PostgreSQL", "MongoDB", "Redis", "Oracle", "SQLite", "Cassandra",
            "DynamoDB", "Neo4j", "Elasticsearch", "Firebase",
            // Cloud and DevOps
            "AWS", "Azure", "GCP", "Docker", "Kubernetes", "Jenkins", "GitLab",
            "GitHub Actions", "Terraform", "Ansible", "CI/CD", "Linux", "Git",
            // Data science
            "Pandas", "NumPy", "Scikit-learn", "TensorFlow", "PyTorch", "Keras", "Spark",
            "Hadoop", "Kafka", "Airflow", "Machine Learning", "Deep Learning",
            "Data Science", "Statistics",
            // Mobile
            "React Native", "Flutter", "iOS", "Android",
            // Testing
            "Selenium", "Jest", "Cypress", "JUnit", "Pytest", "Playwright",
            // Tools and practices
            "Jira", "Figma", "Postman", "System Design", "Agile", "Scrum",
            // Soft skills
            "Communication", "Leadership", "Teamwork", "Problem Solving",
            "Project Management", "Mentoring",
        ]);

        let high_value_skills = strings(&[
            "AWS", "Azure", "GCP", "Kubernetes", "Docker", "Terraform", "Machine Learning",
            "Deep Learning", "TensorFlow", "PyTorch", "Data Science", "Spark", "Kafka",
            "React", "TypeScript", "Golang", "Rust", "Microservices", "System Design",
            "GraphQL",
        ]);

        let skill_aliases: BTreeMap<String, String> = [
            ("js", "JavaScript"),
            ("ts", "TypeScript"),
            ("k8s", "Kubernetes"),
            ("postgres", "PostgreSQL"),
            ("nodejs", "Node.js"),
            ("reactjs", "React"),
            ("react.js", "React"),
            ("vue.js", "Vue"),
            ("go lang", "Golang"),
            ("amazon web services", "AWS"),
            ("google cloud", "GCP"),
            ("sklearn", "Scikit-learn"),
            ("ml", "Machine Learning"),
            ("rest apis", "REST API"),
            ("restful", "REST API"),
        ]
        .iter()
        .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
        .collect();

        let role_salaries: BTreeMap<String, u64> = [
            ("software engineer", 800_000),
            ("software developer", 750_000),
            ("senior software engineer", 1_500_000),
            ("frontend developer", 700_000),
            ("backend developer", 850_000),
            ("full stack developer", 900_000),
            ("data scientist", 1_100_000),
            ("data analyst", 600_000),
            ("machine learning engineer", 1_300_000),
            ("devops engineer", 1_000_000),
            ("cloud engineer", 1_000_000),
            ("mobile developer", 800_000),
            ("qa engineer", 550_000),
            ("ui ux designer", 650_000),
            ("business analyst", 700_000),
            ("project manager", 1_200_000),
            ("product manager", 1_600_000),
            ("engineering manager", 2_500_000),
        ]
        .iter()
        .map(|(role, salary)| (role.to_string(), *salary))
        .collect();

        let locations: BTreeMap<String, LocationEntry> = [
            ("bangalore", location(15.0, 9, 1.20, &["Python", "Java", "React", "AWS", "Docker", "Kubernetes", "Machine Learning"])),
            ("hyderabad", location(14.0, 8, 1.15, &["Java", "Python", "AWS", "Azure", "SQL", "Data Science"])),
            ("chennai", location(13.0, 7, 1.08, &["Java", "Python", "SQL", "Angular", "Selenium"])),
            ("mumbai", location(12.0, 8, 1.10, &["Java", "Python", "SQL", "React", "AWS"])),
            ("gurgaon", location(12.0, 8, 1.10, &["Java", "Node.js", "React", "AWS", "Kubernetes"])),
            ("pune", location(11.0, 7, 1.05, &["Java", "Python", "AWS", "Docker", "Angular"])),
            ("noida", location(11.0, 7, 1.00, &["Java", "PHP", "React", "Node.js", "SQL"])),
            ("delhi", location(10.0, 7, 1.00, &["Java", "Python", "React", "SQL"])),
            ("remote", location(10.0, 6, 1.00, &["Python", "JavaScript", "React", "AWS", "Docker"])),
            ("kolkata", location(8.0, 5, 0.90, &["Java", "SQL", "PHP"])),
            ("ahmedabad", location(7.0, 5, 0.85, &["PHP", "Java", "SQL"])),
        ]
        .into_iter()
        .map(|(name, entry)| (name.to_string(), entry))
        .collect();

        let location_aliases: BTreeMap<String, String> = [
            ("bengaluru", "bangalore"),
            ("bombay", "mumbai"),
            ("new delhi", "delhi"),
            ("ncr", "delhi"),
            ("gurugram", "gurgaon"),
            ("madras", "chennai"),
            ("calcutta", "kolkata"),
            ("work from home", "remote"),
            ("wfh", "remote"),
        ]
        .iter()
        .map(|(alias, key)| (alias.to_string(), key.to_string()))
        .collect();

        Self {
            industry_average_salary: 600_000,
            skills,
            high_value_skills,
            skill_aliases,
            role_salaries,
            national_average: location(10.0, 5, 1.0, &["Python", "Java", "JavaScript", "SQL", "AWS"]),
            locations,
            location_aliases,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference: ReferenceConfig::default(),
            extraction: ExtractionConfig {
                max_document_bytes: 10 * 1024 * 1024,
                min_text_chars: 10,
                min_alphabetic_ratio: 0.3,
                max_plausible_experience_years: 50.0,
                reference_year: None,
            },
            scoring: ScoringConfig {
                experience_step: 0.04,
                experience_cap_years: 20.0,
                skill_bonus_step: 0.01,
                skill_bonus_cap: 0.20,
                salary_rounding: 1000,
                strong_similarity_threshold: 0.5,
                moderate_similarity_threshold: 0.25,
                location_fuzzy_threshold: 0.93,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load the user configuration, writing the defaults on first use.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CandidateFitError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("candidate-fit")
            .join("config.toml")
    }

    /// Reject tables the engine cannot honour its invariants with.
    pub fn validate(&self) -> Result<()> {
        let reference = &self.reference;

        if reference.skills.is_empty() {
            return Err(CandidateFitError::Configuration("Skill vocabulary is empty".to_string()));
        }
        if reference.industry_average_salary == 0 {
            return Err(CandidateFitError::Configuration(
                "industry_average_salary must be positive".to_string(),
            ));
        }
        if let Some((role, _)) = reference.role_salaries.iter().find(|(_, salary)| **salary == 0) {
            return Err(CandidateFitError::Configuration(format!(
                "Base salary for role '{}' must be positive",
                role
            )));
        }

        let entries = reference
            .locations
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
            .chain(std::iter::once(("national_average", &reference.national_average)));
        for (name, entry) in entries {
            if !(1..=10).contains(&entry.market_strength) {
                return Err(CandidateFitError::Configuration(format!(
                    "market_strength for '{}' must be between 1 and 10, got {}",
                    name, entry.market_strength
                )));
            }
            if !(entry.salary_multiplier > 0.0) {
                return Err(CandidateFitError::Configuration(format!(
                    "salary_multiplier for '{}' must be positive",
                    name
                )));
            }
        }

        for (alias, key) in &reference.location_aliases {
            if !reference.locations.contains_key(key) {
                return Err(CandidateFitError::Configuration(format!(
                    "Location alias '{}' points to unknown location '{}'",
                    alias, key
                )));
            }
        }

        let scoring = &self.scoring;
        if scoring.experience_step < 0.0 || scoring.skill_bonus_step < 0.0 || scoring.skill_bonus_cap < 0.0 {
            return Err(CandidateFitError::Configuration(
                "Salary multipliers must not be negative".to_string(),
            ));
        }
        if scoring.salary_rounding == 0 {
            return Err(CandidateFitError::Configuration("salary_rounding must be positive".to_string()));
        }
        if scoring.moderate_similarity_threshold > scoring.strong_similarity_threshold {
            return Err(CandidateFitError::Configuration(
                "moderate_similarity_threshold must not exceed strong_similarity_threshold".to_string(),
            ));
        }

        Ok(())
    }
}
