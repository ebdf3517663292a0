//! Integration tests for the candidate fit engine

use candidate_fit::input::manager::InputManager;
use candidate_fit::output::formatter::ReportGenerator;
use candidate_fit::output::report::AnalysisReport;
use candidate_fit::processing::career::{CareerAdvisor, CareerLevel};
use candidate_fit::processing::reference::LocationMatch;
use candidate_fit::processing::salary::SalaryModel;
use candidate_fit::processing::skill_gap::SkillGapScorer;
use candidate_fit::{
    AnalysisEngine, CandidateFitError, ConfidenceFlag, Config, JobRequirement, ProfileExtractor, ReferenceTables,
};
use std::collections::BTreeSet;
use std::path::Path;

fn tables() -> ReferenceTables {
    ReferenceTables::from_config(&Config::default()).unwrap()
}

fn manager() -> InputManager {
    InputManager::new(Config::default().extraction)
}

fn skills(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = manager();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("JOHN DOE"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = manager();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = manager();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    // Second extraction should use cache
    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = manager();
    let result = manager.extract_text(Path::new("tests/fixtures/unsupported.xyz")).await;
    assert!(matches!(result, Err(CandidateFitError::UnsupportedFileType(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = manager();
    let result = manager.extract_text(Path::new("tests/fixtures/nonexistent.txt")).await;
    assert!(matches!(result, Err(CandidateFitError::InvalidInput(_))));
}

#[tokio::test]
async fn test_empty_and_corrupted_pdfs_are_unreadable() {
    let mut manager = manager();

    let empty = manager.extract_text(Path::new("tests/fixtures/empty.pdf")).await;
    assert!(matches!(empty, Err(CandidateFitError::UnreadableDocument(_))));

    let corrupted = manager.extract_text(Path::new("tests/fixtures/corrupted.pdf")).await;
    let err = corrupted.unwrap_err();
    assert!(matches!(err, CandidateFitError::UnreadableDocument(_)));
    assert!(err.is_terminal_document_error());
}

#[test]
fn test_extract_from_document_bytes() {
    let tables = tables();
    let bytes = std::fs::read("tests/fixtures/sample_resume.txt").unwrap();
    let profile = ProfileExtractor::new(&tables)
        .extract_from_document(&bytes, "sample_resume.txt")
        .unwrap();

    assert_eq!(profile.name.as_deref(), Some("John Doe"));
    assert_eq!(profile.email.as_deref(), Some("john.doe@email.com"));
    assert_eq!(profile.phone.as_deref(), Some("5551234567"));
    assert_eq!(profile.location.as_deref(), Some("Bengaluru, India"));
    assert_eq!(profile.detected_role.as_deref(), Some("Senior Software Engineer"));
    // Jan 2016 through Dec 2023, overlapping nothing
    assert_eq!(profile.experience_years, 8.0);
    assert!(profile.skills.is_superset(&skills(&["React", "Node.js", "AWS", "Docker", "PostgreSQL", "CI/CD"])));
    assert!(!profile.skills.contains("Java"));

    assert_eq!(profile.education.len(), 1);
    assert_eq!(profile.education[0].degree, "Bachelor of Technology in Computer Science");
    assert_eq!(profile.education[0].institution.as_deref(), Some("Anna University"));
}

#[tokio::test]
async fn test_text_extraction_from_docx() {
    let mut manager = manager();
    let text = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.docx"))
        .await
        .unwrap();

    assert!(text.contains("Priya Sharma"));
    assert!(text.contains("Mar 2020 - Feb 2024"));
    assert!(!text.contains("<w:t>"));
}

#[test]
fn test_extract_profile_from_docx() {
    let tables = tables();
    let bytes = std::fs::read("tests/fixtures/sample_resume.docx").unwrap();
    let profile = ProfileExtractor::new(&tables)
        .extract_from_document(&bytes, "sample_resume.docx")
        .unwrap();

    assert_eq!(profile.name.as_deref(), Some("Priya Sharma"));
    assert_eq!(profile.email.as_deref(), Some("priya.sharma@example.com"));
    assert_eq!(profile.location.as_deref(), Some("Pune, India"));
    // Mar 2020 through Feb 2024
    assert_eq!(profile.experience_years, 4.0);
    assert!(profile.skills.is_superset(&skills(&["Python", "SQL"])));
    assert_eq!(profile.education.len(), 1);
    assert_eq!(profile.education[0].degree, "Masters in Data Science");
    assert_eq!(profile.education[0].institution.as_deref(), Some("University of Pune"));
}

#[test]
fn test_same_document_bytes_give_identical_profiles() {
    let tables = tables();
    let extractor = ProfileExtractor::new(&tables);

    for file in ["sample_resume.txt", "sample_resume.md", "sample_resume.docx"] {
        let bytes = std::fs::read(Path::new("tests/fixtures").join(file)).unwrap();
        let first = extractor.extract_from_document(&bytes, file).unwrap();
        let second = extractor.extract_from_document(&bytes, file).unwrap();

        assert_eq!(first, second, "profiles for {}", file);
        assert_eq!(first.raw_text, second.raw_text, "raw text for {}", file);
        assert!(!first.raw_text.is_empty());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_scenario_python_java_aws() {
    let tables = tables();
    let profile = ProfileExtractor::new(&tables).extract("5 years of experience in Python, Java, AWS");

    assert_eq!(profile.skills, skills(&["AWS", "Java", "Python"]));
    assert_eq!(profile.experience_years, 5.0);

    let gap = SkillGapScorer::new(&tables).score(&profile, "Python, Java, Docker, Kubernetes");
    assert_eq!(gap.matched, skills(&["Java", "Python"]));
    assert_eq!(gap.missing, skills(&["Docker", "Kubernetes"]));
    assert_eq!(gap.match_percentage, 50);
}

#[test]
fn test_empty_requirement_skills_is_full_match() {
    let tables = tables();
    let gap = SkillGapScorer::new(&tables).score_skills(&skills(&["Python"]), "");

    assert_eq!(gap.match_percentage, 100);
    assert!(gap.low_confidence);
}

#[test]
fn test_matched_and_missing_partition_requirements() {
    let tables = tables();
    let scorer = SkillGapScorer::new(&tables);
    let requirement_texts = [
        "Python, Java, Docker, Kubernetes",
        "React, TypeScript, CSS, Jest and Figma",
        "AWS, GCP, Azure, Terraform, Ansible, Linux",
        "SQL",
    ];
    let candidate = skills(&["Python", "React", "AWS", "Linux", "SQL"]);

    for text in requirement_texts {
        let required = tables.vocabulary.detect(text);
        let gap = scorer.score_skills(&candidate, text);

        let union: BTreeSet<String> = gap.matched.union(&gap.missing).cloned().collect();
        assert_eq!(union, required, "union for '{}'", text);
        assert_eq!(gap.job_skills, required);
        assert!(gap.matched.is_disjoint(&gap.missing));
        assert!(gap.matched.is_subset(&candidate));
        assert!(gap.match_percentage <= 100);
    }
}

#[test]
fn test_salary_is_monotonic_in_experience() {
    let tables = tables();
    let model = SalaryModel::new(&tables);
    let matched = skills(&["AWS", "Kubernetes"]);

    for (role, location) in [("Software Engineer", "Bangalore"), ("Astronaut", "Atlantis"), ("Data Analyst", "Pune")] {
        let mut previous = 0;
        for step in 0..=120 {
            let years = step as f64 * 0.25;
            let projection = model.project(role, years, location, &matched);

            assert!(projection.projected_salary >= previous, "{} at {} years", role, years);
            assert!(projection.projected_salary >= 1000);
            assert_eq!(projection.projected_salary % 1000, 0);
            previous = projection.projected_salary;
        }
    }
}

#[test]
fn test_career_levels_for_scenarios() {
    let high_value = BTreeSet::new();
    let advisor = CareerAdvisor::new(&high_value);

    let entry = advisor.advise(0.0, None);
    assert_eq!(entry.current_level, CareerLevel::Entry);
    assert_eq!(entry.next_level, Some(CareerLevel::Mid));

    let executive = advisor.advise(17.0, None);
    assert_eq!(executive.current_level, CareerLevel::Executive);
    assert_eq!(executive.next_level, None);
}

#[test]
fn test_every_experience_value_maps_to_one_level() {
    for step in 0..=400 {
        let years = step as f64 * 0.1;
        let level = CareerLevel::from_experience(years);

        assert!(years >= level.min_years());
        if let Some(max) = level.max_years() {
            assert!(years < max, "{} years classified as {:?}", years, level);
        }
    }
}

#[test]
fn test_unknown_location_falls_back_to_national_average() {
    let tables = tables();
    let profile = ProfileExtractor::new(&tables).extract("Python and SQL developer");
    let job = JobRequirement::new("Software Engineer", "Middle Of Nowhere", "Python, SQL");

    let analysis = AnalysisEngine::new(&tables).analyze(&profile, &job);

    assert_eq!(analysis.location.match_kind, LocationMatch::Default);
    assert_eq!(analysis.location.growth_pct, tables.locations.national_average().growth_pct);
    assert!(analysis.low_confidence.contains(&ConfidenceFlag::UnknownLocation));
    assert!(!analysis.low_confidence.contains(&ConfidenceFlag::UnknownRole));
}

#[test]
fn test_analysis_is_deterministic() {
    let tables = tables();
    let text = std::fs::read_to_string("tests/fixtures/sample_resume.txt").unwrap();
    let job = JobRequirement::new("Backend Developer", "Bangalore", "Python, Node.js, Docker, Kubernetes, Kafka");

    let first = {
        let profile = ProfileExtractor::new(&tables).extract(&text);
        AnalysisEngine::new(&tables).analyze(&profile, &job)
    };
    let second = {
        let profile = ProfileExtractor::new(&tables).extract(&text);
        AnalysisEngine::new(&tables).analyze(&profile, &job)
    };

    assert_eq!(first, second);
    assert_eq!(serde_json::to_string(&first).unwrap(), serde_json::to_string(&second).unwrap());
}

#[tokio::test]
async fn test_end_to_end_with_job_files() {
    let tables = tables();
    let mut manager = manager();

    let resume_text = manager.extract_text(Path::new("tests/fixtures/sample_resume.txt")).await.unwrap();
    let profile = ProfileExtractor::new(&tables).extract(&resume_text);

    let backend = manager.load_job(Path::new("tests/fixtures/backend_job.toml")).await.unwrap();
    let frontend = manager.load_job(Path::new("tests/fixtures/frontend_job.txt")).await.unwrap();

    let engine = AnalysisEngine::new(&tables);
    let analyses = engine.analyze_all(&profile, &[backend.clone(), frontend.clone()]);

    let backend_analysis = &analyses[0];
    assert_eq!(backend_analysis.skill_gap.match_percentage, 63);
    assert_eq!(backend_analysis.skill_gap.missing, skills(&["Kafka", "Kubernetes", "Terraform"]));
    assert_eq!(backend_analysis.salary.projected_salary, 1_373_000);
    assert_eq!(backend_analysis.career.current_level, CareerLevel::Senior);
    assert_eq!(backend_analysis.career.focus_skills, vec!["Kafka", "Kubernetes", "Terraform"]);

    // Plain text job: role and location come from the resume
    let frontend_analysis = &analyses[1];
    assert_eq!(frontend_analysis.role, "Senior Software Engineer");
    assert_eq!(frontend_analysis.location.location.as_deref(), Some("bangalore"));
    assert_eq!(frontend_analysis.skill_gap.match_percentage, 40);

    let reports: Vec<AnalysisReport> = analyses
        .into_iter()
        .zip([backend, frontend])
        .map(|(analysis, job)| AnalysisReport::new(profile.clone(), &job, analysis, "sample_resume.txt", None))
        .collect();

    let json = ReportGenerator::new()
        .generate_reports(&reports, &candidate_fit::config::OutputFormat::Json)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value.as_array().map(|a| a.len()), Some(2));
}
