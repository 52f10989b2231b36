//! Candidate screener: score resumes against weighted job criteria

use candidate_screener::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use candidate_screener::config::{Config, OutputFormat};
use candidate_screener::error::{Result, ScreenerError};
use candidate_screener::input::InputManager;
use candidate_screener::output::formatter::save_report_to_file;
use candidate_screener::output::{CandidateRecord, ReportGenerator, ScreeningReport};
use candidate_screener::processing::criteria::{
    extract_criteria, load_criteria, save_criteria, CriterionSpec,
};
use candidate_screener::processing::embedding_manager::EmbeddingModelManager;
use candidate_screener::processing::screener::Screener;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if !config.output.color_output {
        colored::control::set_override(false);
    }

    if let Err(e) = run_command(cli.command, cli.config, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config_path: Option<PathBuf>, config: Config) -> Result<()> {
    match command {
        Commands::Screen {
            resume,
            job,
            criteria,
            embedding,
            detailed,
            output,
            save,
        } => {
            validate_input(&resume, "Resume file")?;
            validate_input(&job, "Job description file")?;
            let format = output_format(output.as_deref(), &config)?;

            let start_time = Instant::now();
            let mut input_manager = InputManager::new();
            let job_text = input_manager.extract_text(&job).await?;
            let resume_text = input_manager.extract_text(&resume).await?;
            let criteria = job_criteria(criteria.as_deref(), &job_text)?;

            let screener = Screener::from_config(&config, embedding.as_deref())?;
            let prepared = screener.prepare_job(&job_text, &criteria)?;
            let screening = screener.screen_prepared(&resume_text, &prepared)?;

            let record = CandidateRecord::from_screening(&display_name(&resume), &criteria, &screening);
            let report = ScreeningReport::new(
                &display_name(&job),
                screener.analyzer().model_name(),
                start_time.elapsed().as_millis() as u64,
                vec![record],
            );
            emit_report(&report, format, detailed, save.as_deref(), &config)?;
        }

        Commands::Batch {
            resumes,
            job,
            criteria,
            embedding,
            detailed,
            output,
            save,
            passed_only,
        } => {
            validate_input(&job, "Job description file")?;
            let format = output_format(output.as_deref(), &config)?;

            let files = cli::collect_resume_files(&resumes)?;
            if files.is_empty() {
                return Err(ScreenerError::InvalidInput("No resume files found".to_string()));
            }

            let start_time = Instant::now();
            let mut input_manager = InputManager::new().with_cache(false);
            let job_text = input_manager.extract_text(&job).await?;
            let criteria = job_criteria(criteria.as_deref(), &job_text)?;

            let screener = Screener::from_config(&config, embedding.as_deref())?;
            let prepared = screener.prepare_job(&job_text, &criteria)?;

            let progress = ProgressBar::new(files.len() as u64);
            progress.set_style(
                ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );

            let mut texts = Vec::with_capacity(files.len());
            for file in &files {
                progress.set_message(display_name(file));
                texts.push(input_manager.extract_text_lossy(file).await);
                progress.inc(1);
            }
            progress.finish_and_clear();

            info!("Screening {} candidates against {} criteria", files.len(), criteria.len());
            let mut records = Vec::with_capacity(files.len());
            for (file, result) in files.iter().zip(screener.screen_batch(&texts, &prepared)) {
                match result {
                    Ok(screening) => {
                        if passed_only && !screening.outcome.passed {
                            continue;
                        }
                        records.push(CandidateRecord::from_screening(&display_name(file), &criteria, &screening));
                    }
                    Err(e) => warn!("Skipping {}: {}", file.display(), e),
                }
            }

            let report = ScreeningReport::new(
                &display_name(&job),
                screener.analyzer().model_name(),
                start_time.elapsed().as_millis() as u64,
                records,
            )
            .ranked();
            emit_report(&report, format, detailed, save.as_deref(), &config)?;
        }

        Commands::Criteria { job, save } => {
            validate_input(&job, "Job description file")?;
            let job_text = InputManager::new().extract_text(&job).await?;
            let criteria = extract_criteria(&job_text);

            if criteria.is_empty() {
                warn!("No bullet points found in {}", job.display());
            }

            match save {
                Some(path) => {
                    save_criteria(&path, &criteria)?;
                    println!("✅ Saved {} criteria to {}", criteria.len(), path.display());
                    println!("💡 Edit weights and mark required criteria, then pass --criteria {}", path.display());
                }
                None => {
                    for (i, criterion) in criteria.iter().enumerate() {
                        println!("{}. {} (weight {})", i + 1, criterion.text, criterion.weight);
                    }
                }
            }
        }

        Commands::Models { action } => {
            let manager = EmbeddingModelManager::new(&config);
            match action {
                ModelAction::List => {
                    println!("🧠 Embedding Models\n");
                    for status in manager.list().await {
                        let marker = if status.model.name == config.models.default_embedding_model {
                            " (default)"
                        } else {
                            ""
                        };
                        let state = if status.downloaded { "✅ Downloaded" } else { "⬇️  Available" };
                        println!(
                            "  • {}{} ({}) - {} MB, {} dims [{}]",
                            status.model.name,
                            marker,
                            status.model.repo_id,
                            status.model.size_mb,
                            status.model.dimensions,
                            state
                        );
                        println!("    {}", status.model.description);
                    }
                    println!("\n📁 Models directory: {}", config.models_dir().display());
                }
                ModelAction::Download { model } => {
                    println!("⬇️  Downloading model: {}", model);
                    let path = manager.download(&model).await?;
                    println!("✅ Model '{}' ready", model);
                    println!("📁 Location: {}", path.display());
                }
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration ({})\n", path.display());
                    println!("Models Directory: {}", config.models_dir().display());
                    println!("Default Embedding Model: {}", config.models.default_embedding_model);
                    println!("\nScoring:");
                    println!("  Similarity threshold: {:.2}", config.scoring.similarity_threshold);
                    println!("  Similarity bonus: {}", config.scoring.similarity_bonus);
                    println!("  Pass mark: {}%", config.scoring.pass_mark);
                    println!("  Clamp score: {}", config.scoring.clamp_score);
                    println!("\nAnalysis:");
                    println!("  Default skill vocabulary: {}", config.analysis.include_default_skills);
                    println!("  Extra skills: {}", config.analysis.extra_skills.join(", "));
                }
                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset: {}", path.display());
                }
                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn validate_input(path: &Path, label: &str) -> Result<()> {
    cli::validate_file_extension(path, cli::SUPPORTED_EXTENSIONS)
        .map_err(|e| ScreenerError::InvalidInput(format!("{}: {}", label, e)))
}

fn output_format(output: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match output {
        Some(format) => cli::parse_output_format(format).map_err(ScreenerError::InvalidInput),
        None => Ok(config.output.format),
    }
}

/// Criteria from a TOML file, or the job description's bullet points
fn job_criteria(path: Option<&Path>, job_text: &str) -> Result<Vec<CriterionSpec>> {
    let criteria = match path {
        Some(path) => load_criteria(path)?,
        None => extract_criteria(job_text),
    };

    if criteria.is_empty() {
        warn!("No criteria found; scores will rest on overall similarity alone");
    } else {
        info!("Using {} criteria", criteria.len());
    }
    Ok(criteria)
}

fn emit_report(
    report: &ScreeningReport,
    format: OutputFormat,
    detailed: bool,
    save: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let use_colors = config.output.color_output && save.is_none();
    let generator = ReportGenerator::with_options(use_colors, detailed, true, true);
    let content = generator.generate_report(report, &format)?;

    match save {
        Some(path) => {
            save_report_to_file(&content, path)?;
            println!("💾 Report saved to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
