//! candidate-fit: resume profile extraction and job-fit analytics

use anyhow::{Context, Result};
use candidate_fit::cli::{self, Cli, Commands, ConfigAction};
use candidate_fit::config::{Config, OutputFormat};
use candidate_fit::input::InputManager;
use candidate_fit::output::formatter::{save_report_to_file, suggest_filename, ReportGenerator};
use candidate_fit::output::report::AnalysisReport;
use candidate_fit::processing::analyzer::{AnalysisEngine, JobRequirement};
use candidate_fit::processing::profile::ProfileExtractor;
use candidate_fit::processing::reference::ReferenceTables;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;

const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "md", "markdown"];
const JOB_EXTENSIONS: &[&str] = &["toml", "pdf", "docx", "txt", "md", "markdown"];

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {:#}", e);
        eprintln!("❌ {:#}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path).with_context(|| format!("reading {}", path.display())),
        None => Config::load().context("loading default configuration"),
    }
}

fn output_format(requested: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match requested {
        Some(format) => cli::parse_output_format(format).map_err(anyhow::Error::msg),
        None => Ok(config.output.format),
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Extract { resume, output } => {
            cli::validate_file_extension(&resume, DOCUMENT_EXTENSIONS)
                .map_err(|e| anyhow::anyhow!("Resume file: {}", e))?;
            let format = output_format(output.as_deref(), &config)?;

            let tables = ReferenceTables::from_config(&config).context("building reference tables")?;
            let mut input_manager = InputManager::new(config.extraction.clone());

            let text = input_manager
                .extract_text(&resume)
                .await
                .with_context(|| format!("extracting text from {}", resume.display()))?;
            let profile = ProfileExtractor::new(&tables).extract(&text);

            let generator = ReportGenerator::with_options(config.output.color_output, true, true, true);
            println!("{}", generator.generate_profile(&profile, &format)?);
        }

        Commands::Analyze {
            resume,
            job,
            title,
            location,
            detailed,
            output,
            save,
        } => {
            info!("Starting job fit analysis");

            cli::validate_file_extension(&resume, DOCUMENT_EXTENSIONS)
                .map_err(|e| anyhow::anyhow!("Resume file: {}", e))?;
            for job_path in &job {
                cli::validate_file_extension(job_path, JOB_EXTENSIONS)
                    .map_err(|e| anyhow::anyhow!("Job file {}: {}", job_path.display(), e))?;
            }
            let format = output_format(output.as_deref(), &config)?;
            let detailed = detailed || config.output.detailed;
            let is_console = format == OutputFormat::Console;

            let tables = ReferenceTables::from_config(&config).context("building reference tables")?;
            let mut input_manager = InputManager::new(config.extraction.clone());

            if is_console {
                println!("🚀 Job fit analysis");
                println!("📄 Resume: {}", resume.display());
            }

            let resume_text = input_manager
                .extract_text(&resume)
                .await
                .with_context(|| format!("extracting text from {}", resume.display()))?;
            let profile = ProfileExtractor::new(&tables).extract(&resume_text);

            let engine = AnalysisEngine::new(&tables);
            let stats = engine.get_stats();
            info!(
                "Reference data: {} skills, {} roles, {} locations",
                stats.skill_count, stats.role_count, stats.location_count
            );
            let progress = if is_console && job.len() > 1 {
                let bar = ProgressBar::new(job.len() as u64);
                bar.set_style(
                    ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                Some(bar)
            } else {
                None
            };

            let mut reports = Vec::with_capacity(job.len());
            for job_path in &job {
                if let Some(bar) = &progress {
                    bar.set_message(job_path.display().to_string());
                }

                let mut requirement: JobRequirement = input_manager
                    .load_job(job_path)
                    .await
                    .with_context(|| format!("loading job {}", job_path.display()))?;
                if let Some(title) = &title {
                    requirement.title = title.clone();
                }
                if let Some(location) = &location {
                    requirement.location = location.clone();
                }

                let analysis = engine.analyze(&profile, &requirement);
                reports.push(AnalysisReport::new(
                    profile.clone(),
                    &requirement,
                    analysis,
                    &resume.to_string_lossy(),
                    Some(job_path.to_string_lossy().as_ref()),
                ));

                if let Some(bar) = &progress {
                    bar.inc(1);
                }
            }
            if let Some(bar) = progress {
                bar.finish_and_clear();
            }

            let generator = ReportGenerator::with_options(config.output.color_output, detailed, true, true);
            let rendered = generator.generate_reports(&reports, &format)?;

            match save {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(suggest_filename(&format, &resume.to_string_lossy(), true))
                    } else {
                        path
                    };
                    // Saved console reports should not carry color codes.
                    let content = if is_console {
                        ReportGenerator::with_options(false, detailed, true, true).generate_reports(&reports, &format)?
                    } else {
                        rendered
                    };
                    save_report_to_file(&content, &path)
                        .with_context(|| format!("saving report to {}", path.display()))?;
                    println!("💾 Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("{}", toml::to_string_pretty(&config).context("serializing configuration")?);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                let path = config_path.unwrap_or_else(Config::config_path);
                Config::default().save_to(&path)?;
                println!("✅ Configuration reset: {}", path.display());
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.unwrap_or_else(Config::config_path).display());
            }
        },
    }

    Ok(())
}
