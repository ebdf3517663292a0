//! Output formatters - console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::{CandidateFitError, Result};
use crate::output::report::*;
use crate::processing::career::CareerPath;
use crate::processing::profile::CandidateProfile;
use crate::processing::similarity::SimilarityTier;
use colored::{Color, Colorize};
use std::collections::BTreeSet;
use std::path::Path;

/// Trait for formatting analysis reports
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn format_profile(&self, profile: &CandidateProfile) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;

    /// Several reports (one per job) in a single document.
    fn format_reports(&self, reports: &[AnalysisReport]) -> Result<String> {
        let formatted = reports
            .iter()
            .map(|report| self.format_report(report))
            .collect::<Result<Vec<_>>>()?;
        Ok(formatted.join("\n"))
    }
}

/// Console formatter with colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for structured output
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn join_or_none(skills: &BTreeSet<String>) -> String {
    if skills.is_empty() {
        "none".to_string()
    } else {
        skills.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

fn format_money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn tier_label(tier: SimilarityTier) -> &'static str {
    match tier {
        SimilarityTier::Strong => "strong",
        SimilarityTier::Moderate => "moderate",
        SimilarityTier::Weak => "weak",
    }
}

fn growth_label(path: &CareerPath) -> String {
    match path {
        CareerPath::Promotion { target } => format!("Promotion to {}", target),
        CareerPath::Specialization => "Specialization".to_string(),
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match FitVerdict::from_percentage(score) {
            FitVerdict::Strong => ("STRONG", Color::Green),
            FitVerdict::Good => ("GOOD", Color::Yellow),
            FitVerdict::Partial => ("PARTIAL", Color::BrightYellow),
            FitVerdict::Weak => ("WEAK", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let analysis = &report.analysis;
        let mut output = String::new();

        let title = if report.job_title.is_empty() { analysis.role.as_str() } else { report.job_title.as_str() };
        output.push_str(&self.format_header(&format!("📊 JOB FIT ANALYSIS: {}", title), 1));
        output.push_str(&format!(
            "Generated: {}\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        if let Some(name) = &report.summary.candidate_name {
            output.push_str(&format!("Candidate: {}\n", name));
        }

        // Summary
        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Skill Match: {}% {}\n",
            report.summary.match_percentage,
            self.format_score_badge(report.summary.match_percentage)
        ));
        output.push_str(&format!(
            "Verdict: {}\n",
            self.colorize(report.summary.verdict.describe(), Color::Cyan)
        ));
        for note in &report.summary.confidence_notes {
            output.push_str(&format!("{} {}\n", self.colorize("⚠️  Low confidence:", Color::Yellow), note));
        }

        // Skills
        output.push_str(&self.format_header("Skills", 3));
        output.push_str(&format!(
            "✅ Matched: {}\n",
            self.colorize(&join_or_none(&analysis.skill_gap.matched), Color::Green)
        ));
        output.push_str(&format!(
            "❌ Missing: {}\n",
            self.colorize(&join_or_none(&analysis.skill_gap.missing), Color::Red)
        ));
        if let Some(similarity) = &analysis.skill_gap.similarity {
            output.push_str(&format!(
                "📝 Text similarity: {:.1}% ({})\n",
                similarity.score * 100.0,
                tier_label(similarity.tier)
            ));
        }

        // Salary
        output.push_str(&self.format_header("Salary Projection", 3));
        output.push_str(&format!(
            "💰 Estimated: {} (range {} - {})\n",
            self.colorize(&format_money(analysis.salary.projected_salary), Color::Green),
            format_money(analysis.salary.salary_band.low),
            format_money(analysis.salary.salary_band.high)
        ));
        if self.detailed {
            output.push_str(&format!(
                "   Base {} x experience {:.2} x location {:.2} x skills {:.2}\n",
                format_money(analysis.salary.base_salary),
                analysis.salary.experience_multiplier,
                analysis.salary.location_multiplier,
                analysis.salary.skill_bonus
            ));
            output.push_str(&format!("   Bonus skills: {}\n", join_or_none(&analysis.salary.bonus_skills)));
        }

        // Career
        output.push_str(&self.format_header("Career Growth", 3));
        output.push_str(&format!(
            "🎯 Level: {} ({:.1} years)\n",
            analysis.career.current_level, report.profile.experience_years
        ));
        output.push_str(&format!("📈 Path: {}", growth_label(&analysis.career.path)));
        match analysis.career.years_to_next_level {
            Some(years) => output.push_str(&format!(" in about {:.1} years\n", years)),
            None => output.push('\n'),
        }
        for (i, recommendation) in analysis.career.recommendations.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, recommendation));
        }

        // Location
        let location = &analysis.location;
        output.push_str(&self.format_header("Location Market", 3));
        output.push_str(&format!(
            "📍 {}: growth {:.1}%, market strength {}/10\n",
            location.location.as_deref().unwrap_or("National average"),
            location.growth_pct,
            location.market_strength
        ));
        output.push_str(&format!(
            "   In-demand skills you have: {}% ({})\n",
            location.user_skill_match,
            join_or_none(&location.matched_in_demand)
        ));
        if self.detailed {
            output.push_str(&format!("   In demand here, not on your resume: {}\n", join_or_none(&location.missing_in_demand)));
        }

        if self.detailed {
            output.push_str(&self.format_header("Candidate Profile", 3));
            output.push_str(&self.format_profile_body(&report.profile));
        }

        Ok(output)
    }

    fn format_profile(&self, profile: &CandidateProfile) -> Result<String> {
        let mut output = self.format_header("👤 CANDIDATE PROFILE", 1);
        output.push_str(&self.format_profile_body(profile));
        Ok(output)
    }

    fn format_reports(&self, reports: &[AnalysisReport]) -> Result<String> {
        let formatted = reports
            .iter()
            .map(|report| self.format_report(report))
            .collect::<Result<Vec<_>>>()?;
        Ok(formatted.join(&format!("\n{}\n", "─".repeat(60))))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl ConsoleFormatter {
    fn format_profile_body(&self, profile: &CandidateProfile) -> String {
        let missing = || self.colorize("not found", Color::BrightBlack);
        let mut output = String::new();

        output.push_str(&format!("Name: {}\n", profile.name.clone().unwrap_or_else(missing)));
        output.push_str(&format!("Email: {}\n", profile.email.clone().unwrap_or_else(missing)));
        output.push_str(&format!("Phone: {}\n", profile.phone.clone().unwrap_or_else(missing)));
        output.push_str(&format!("Location: {}\n", profile.location.clone().unwrap_or_else(missing)));
        output.push_str(&format!("Role: {}\n", profile.detected_role.clone().unwrap_or_else(missing)));
        output.push_str(&format!("Experience: {:.1} years\n", profile.experience_years));
        output.push_str(&format!("Skills ({}): {}\n", profile.skills.len(), join_or_none(&profile.skills)));

        if profile.education.is_empty() {
            output.push_str(&format!("Education: {}\n", missing()));
        } else {
            output.push_str("Education:\n");
            for entry in &profile.education {
                match &entry.institution {
                    Some(institution) => output.push_str(&format!("  - {}, {}\n", entry.degree, institution)),
                    None => output.push_str(&format!("  - {}\n", entry.degree)),
                }
            }
        }

        output
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_profile(&self, profile: &CandidateProfile) -> Result<String> {
        self.to_json(profile)
    }

    fn format_reports(&self, reports: &[AnalysisReport]) -> Result<String> {
        self.to_json(reports)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(score: u8) -> &'static str {
        match FitVerdict::from_percentage(score) {
            FitVerdict::Strong => "🟢 Strong",
            FitVerdict::Good => "🟡 Good",
            FitVerdict::Partial => "🟠 Partial",
            FitVerdict::Weak => "🔴 Weak",
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let analysis = &report.analysis;
        let mut output = String::new();

        output.push_str(&format!("# 📊 Job Fit Analysis: {}\n\n", analysis.role));

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Version:** {}\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.engine_version
            ));
            let resume_name = Path::new(&report.metadata.resume_file)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| report.metadata.resume_file.clone());
            output.push_str(&format!("**Resume:** `{}`", resume_name));
            if let Some(job_file) = &report.metadata.job_file {
                output.push_str(&format!(" | **Job:** `{}`", job_file));
            }
            output.push_str("\n\n");
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "**Skill Match:** {}% {}\n\n",
            report.summary.match_percentage,
            Self::markdown_score_badge(report.summary.match_percentage)
        ));
        output.push_str(&format!("**Verdict:** {}\n\n", report.summary.verdict.describe()));
        for note in &report.summary.confidence_notes {
            output.push_str(&format!("> ⚠️ {}\n", note));
        }
        if !report.summary.confidence_notes.is_empty() {
            output.push('\n');
        }

        output.push_str("## Skills\n\n");
        output.push_str("| Matched | Missing |\n");
        output.push_str("|---------|---------|\n");
        output.push_str(&format!(
            "| {} | {} |\n\n",
            join_or_none(&analysis.skill_gap.matched),
            join_or_none(&analysis.skill_gap.missing)
        ));
        if let Some(similarity) = &analysis.skill_gap.similarity {
            output.push_str(&format!(
                "Text similarity: **{:.1}%** ({})\n\n",
                similarity.score * 100.0,
                tier_label(similarity.tier)
            ));
        }

        output.push_str("## Salary Projection\n\n");
        output.push_str("| Estimate | Low | High | Base | Experience | Location | Skills |\n");
        output.push_str("|----------|-----|------|------|------------|----------|--------|\n");
        output.push_str(&format!(
            "| {} | {} | {} | {} | ×{:.2} | ×{:.2} | ×{:.2} |\n\n",
            format_money(analysis.salary.projected_salary),
            format_money(analysis.salary.salary_band.low),
            format_money(analysis.salary.salary_band.high),
            format_money(analysis.salary.base_salary),
            analysis.salary.experience_multiplier,
            analysis.salary.location_multiplier,
            analysis.salary.skill_bonus
        ));

        output.push_str("## Career Growth\n\n");
        output.push_str(&format!(
            "**Level:** {} ({:.1} years) | **Path:** {}\n\n",
            analysis.career.current_level,
            report.profile.experience_years,
            growth_label(&analysis.career.path)
        ));
        for (i, recommendation) in analysis.career.recommendations.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, recommendation));
        }
        output.push('\n');

        let location = &analysis.location;
        output.push_str("## Location Market\n\n");
        output.push_str(&format!(
            "- **Location:** {}\n- **Growth:** {:.1}%\n- **Market strength:** {}/10\n- **In-demand skills you have:** {}% ({})\n",
            location.location.as_deref().unwrap_or("National average"),
            location.growth_pct,
            location.market_strength,
            location.user_skill_match,
            join_or_none(&location.matched_in_demand)
        ));

        Ok(output)
    }

    fn format_profile(&self, profile: &CandidateProfile) -> Result<String> {
        let mut output = String::from("# 👤 Candidate Profile\n\n");
        let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "_not found_".to_string());

        output.push_str(&format!("- **Name:** {}\n", field(&profile.name)));
        output.push_str(&format!("- **Email:** {}\n", field(&profile.email)));
        output.push_str(&format!("- **Phone:** {}\n", field(&profile.phone)));
        output.push_str(&format!("- **Location:** {}\n", field(&profile.location)));
        output.push_str(&format!("- **Role:** {}\n", field(&profile.detected_role)));
        output.push_str(&format!("- **Experience:** {:.1} years\n", profile.experience_years));
        output.push_str(&format!("- **Skills:** {}\n", join_or_none(&profile.skills)));

        if !profile.education.is_empty() {
            output.push_str("\n## Education\n\n");
            for entry in &profile.education {
                match &entry.institution {
                    Some(institution) => output.push_str(&format!("- {}, {}\n", entry.degree, institution)),
                    None => output.push_str(&format!("- {}\n", entry.degree)),
                }
            }
        }

        Ok(output)
    }

    fn format_reports(&self, reports: &[AnalysisReport]) -> Result<String> {
        let formatted = reports
            .iter()
            .map(|report| self.format_report(report))
            .collect::<Result<Vec<_>>>()?;
        Ok(formatted.join("\n---\n\n"))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    fn formatter(&self, format: &OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        self.formatter(format).format_report(report)
    }

    pub fn generate_reports(&self, reports: &[AnalysisReport], format: &OutputFormat) -> Result<String> {
        if reports.is_empty() {
            return Err(CandidateFitError::OutputFormatting("No reports to format".to_string()));
        }
        self.formatter(format).format_reports(reports)
    }

    pub fn generate_profile(&self, profile: &CandidateProfile, format: &OutputFormat) -> Result<String> {
        self.formatter(format).format_profile(profile)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// Utility functions for saving reports
pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_fit{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_fit{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_fit{}.md", base_name, timestamp_suffix),
    }
}
