//! career-compass: career matching, skills gaps, automation risk and learning paths

use career_compass::analysis::courses::CourseQuery;
use career_compass::catalogue::snapshot::ArtifactWarning;
use career_compass::cli::{self, Cli, Commands, ConfigAction, ModelAction, OutputArgs};
use career_compass::config::{Config, OutputFormat};
use career_compass::error::{CareerError, Result};
use career_compass::output::formatter::{save_report_to_file, ReportGenerator};
use career_compass::pipeline::{CareerEngine, RecommendOptions};
use career_compass::processing::encoder_manager::EncoderModelManager;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, config_path).await {
        error!("Command failed: {}", e);
        process::exit(if e.is_input_error() { 2 } else { 1 });
    }
}

async fn run_command(command: Commands, config: Config, config_path: std::path::PathBuf) -> Result<()> {
    match command {
        Commands::Recommend {
            profile,
            top,
            courses_per_gap,
            output,
        } => {
            let raw = profile.to_raw_profile()?;
            let engine = load_engine(&config, output.detailed)?;
            let options = RecommendOptions {
                top_n: top,
                courses_per_gap,
                include_details: true,
            };
            let report = engine.recommend(&raw, &options).await?;
            let generator = generator(&config, &output);
            emit(generator.formatter(format(&config, &output)?).format_recommendations(&report)?, &output)
        }

        Commands::Quick { profile, top, output } => {
            let raw = profile.to_raw_profile()?;
            let engine = load_engine(&config, output.detailed)?;
            let report = engine.recommend_summary(&raw, top).await?;
            let generator = generator(&config, &output);
            emit(generator.formatter(format(&config, &output)?).format_recommendations(&report)?, &output)
        }

        Commands::Gap {
            occupation,
            profile,
            courses_per_gap,
            output,
        } => {
            let raw = profile.to_raw_profile()?;
            let engine = load_engine(&config, output.detailed)?;
            let result = engine.skills_gap_for(&raw, &occupation, courses_per_gap)?;
            let generator = generator(&config, &output);
            emit(generator.formatter(format(&config, &output)?).format_skills_gap(&result)?, &output)
        }

        Commands::Risk { occupation, output } => {
            let engine = load_engine(&config, output.detailed)?;
            let generator = generator(&config, &output);
            let formatter = generator.formatter(format(&config, &output)?);
            let rendered = match occupation {
                Some(query) => formatter.format_occupation_risk(&engine.risk_for(&query)?)?,
                None => formatter.format_risk_distribution(&engine.risk_distribution())?,
            };
            emit(rendered, &output)
        }

        Commands::Leaderboard {
            top,
            family,
            max_risk,
            output,
        } => {
            let family = family.as_deref().map(cli::parse_family).transpose()?;
            if let Some(max) = max_risk {
                if !(0.0..=100.0).contains(&max) {
                    return Err(CareerError::InvalidInput(format!("max-risk must be within 0-100, got {}", max)));
                }
            }
            let engine = load_engine(&config, output.detailed)?;
            let entries = engine.leaderboard(top, family, max_risk);
            let title = match family {
                Some(f) => format!("🏆 FUTURE-PROOF LEADERBOARD: {}", f),
                None => "🏆 FUTURE-PROOF LEADERBOARD".to_string(),
            };
            let generator = generator(&config, &output);
            emit(generator.formatter(format(&config, &output)?).format_occupations(&title, &entries)?, &output)
        }

        Commands::Courses {
            skill,
            level,
            top,
            min_quality,
            output,
        } => {
            let query = CourseQuery {
                top_k: top,
                level: level.as_deref().map(cli::parse_course_level).transpose()?,
                min_quality,
            };
            let engine = load_engine(&config, output.detailed)?;
            let hits = engine.search_courses(&skill, &query)?;
            let generator = generator(&config, &output);
            emit(generator.formatter(format(&config, &output)?).format_courses(&skill, &hits)?, &output)
        }

        Commands::Occupations { query, family, output } => {
            let family = family.as_deref().map(cli::parse_family).transpose()?;
            let engine = load_engine(&config, output.detailed)?;
            let generator = generator(&config, &output);
            let formatter = generator.formatter(format(&config, &output)?);
            let rendered = match query {
                Some(query) => formatter.format_occupation(&engine.occupation(&query)?)?,
                None => formatter.format_occupations("OCCUPATIONS", &engine.occupations(family))?,
            };
            emit(rendered, &output)
        }

        Commands::Families { output } => {
            let engine = load_engine(&config, output.detailed)?;
            let generator = generator(&config, &output);
            emit(generator.formatter(format(&config, &output)?).format_families(&engine.families())?, &output)
        }

        Commands::Dimensions { output } => {
            let engine = load_engine(&config, output.detailed)?;
            let generator = generator(&config, &output);
            emit(generator.formatter(format(&config, &output)?).format_dimensions(engine.skill_dimensions())?, &output)
        }

        Commands::Platforms { output } => {
            let engine = load_engine(&config, output.detailed)?;
            let generator = generator(&config, &output);
            emit(generator.formatter(format(&config, &output)?).format_platforms(&engine.course_platforms())?, &output)
        }

        Commands::Levels { output } => {
            let engine = load_engine(&config, output.detailed)?;
            let generator = generator(&config, &output);
            emit(generator.formatter(format(&config, &output)?).format_levels(&engine.course_levels())?, &output)
        }

        Commands::Models { action } => match action {
            ModelAction::List => {
                println!("📚 Encoder Models\n");
                let manager = EncoderModelManager::new(config.encoder.models_dir.clone()).await?;
                for (id, model) in manager.list_available_models() {
                    let status = if manager.is_model_downloaded(id) {
                        "✅ Downloaded"
                    } else {
                        "⬇️  Available"
                    };
                    println!(
                        "  • {} ({}) - {} MB, {} dims [{}]",
                        model.name, model.repo_id, model.size_mb, model.dimensions, status
                    );
                    println!("    {}", model.description);
                }
                println!("\nConfigured model: {}", config.encoder.model);
                Ok(())
            }

            ModelAction::Download { model, force } => {
                let mut manager = EncoderModelManager::new(config.encoder.models_dir.clone()).await?;
                let model_id = manager.resolve_model_id(&model).unwrap_or_else(|| model.clone());

                if !force && manager.is_model_downloaded(&model_id) {
                    println!("✅ Model '{}' is already downloaded!", model_id);
                    println!("💡 Use --force to re-download");
                    return Ok(());
                }

                let spinner = spinner(&format!("Downloading {}...", model_id));
                let result = manager.download_model(&model_id).await;
                spinner.finish_and_clear();

                let path = result?;
                println!("✅ Model '{}' downloaded successfully!", model_id);
                println!("📁 Location: {}", path.display());
                Ok(())
            }
        },

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| CareerError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("⚙️  Current Configuration ({})\n", config_path.display());
                println!("{}", content);
                Ok(())
            }

            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
                Ok(())
            }

            Some(ConfigAction::Reset) => {
                Config::default().save_to(&config_path)?;
                println!("✅ Configuration reset to defaults at {}", config_path.display());
                Ok(())
            }
        },
    }
}

fn load_engine(config: &Config, detailed: bool) -> Result<CareerEngine> {
    let spinner = spinner("Loading catalogue and models...");
    let loaded = CareerEngine::load(config);
    spinner.finish_and_clear();

    let (engine, warnings) = loaded?;
    report_warnings(&warnings, detailed);
    Ok(engine)
}

fn report_warnings(warnings: &[ArtifactWarning], detailed: bool) {
    if warnings.is_empty() {
        return;
    }
    if detailed {
        for warning in warnings {
            eprintln!("⚠️  {}: {}", warning.artifact, warning.message);
        }
    } else {
        let names: Vec<&str> = warnings.iter().map(|w| w.artifact.as_str()).collect();
        info!("Using fallbacks for: {}", names.join(", "));
    }
}

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn generator(config: &Config, output: &OutputArgs) -> ReportGenerator {
    ReportGenerator::with_options(config.output.color_output, output.detailed, true, true)
}

fn format(config: &Config, output: &OutputArgs) -> Result<OutputFormat> {
    match &output.output {
        Some(value) => cli::parse_output_format(value).map_err(CareerError::InvalidInput),
        None => Ok(config.output.format),
    }
}

fn emit(rendered: String, output: &OutputArgs) -> Result<()> {
    match &output.save {
        Some(path) => {
            save_report_to_file(&rendered, path)?;
            println!("💾 Saved to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
