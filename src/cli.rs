//! CLI interface for the career engine

use crate::catalogue::course::CourseLevel;
use crate::catalogue::occupation::CareerFamily;
use crate::config::OutputFormat;
use crate::error::{CareerError, Result};
use crate::processing::profile::RawProfile;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "career-compass")]
#[command(about = "Career matching, skills gap analysis, automation risk and learning paths")]
#[command(long_about = "Match an education and skills profile against an occupation catalogue, explain each match with a skills gap breakdown and automation risk score, and sequence courses that close the gaps")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full recommendations with gap analysis and learning paths
    Recommend {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Number of careers to return
        #[arg(short = 'n', long)]
        top: Option<usize>,

        /// Courses per skill gap and level
        #[arg(long)]
        courses_per_gap: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Ranked careers only, without gap or course detail
    Quick {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Number of careers to return
        #[arg(short = 'n', long)]
        top: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Skills gap and learning path for one occupation
    Gap {
        /// Occupation code or title
        occupation: String,

        #[command(flatten)]
        profile: ProfileArgs,

        /// Courses per skill gap and level
        #[arg(long)]
        courses_per_gap: Option<usize>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Automation risk for an occupation, or the catalogue-wide distribution
    Risk {
        /// Occupation code or title; omit for the distribution
        occupation: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Most future-proof occupations
    Leaderboard {
        /// Number of entries
        #[arg(short = 'n', long, default_value_t = 10)]
        top: usize,

        /// Restrict to one career family
        #[arg(short, long)]
        family: Option<String>,

        /// Exclude occupations above this risk score (0-100)
        #[arg(long)]
        max_risk: Option<f32>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Search courses for a skill
    Courses {
        /// Skill or topic
        skill: String,

        /// Restrict to foundation, intermediate or advanced
        #[arg(short, long)]
        level: Option<String>,

        /// Maximum number of courses
        #[arg(short = 'n', long, default_value_t = 10)]
        top: usize,

        /// Minimum quality score (0-1)
        #[arg(long, default_value_t = 0.0)]
        min_quality: f32,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List occupations, or show one in detail
    Occupations {
        /// Occupation code or title to show in detail
        query: Option<String>,

        /// Restrict to one career family
        #[arg(short, long)]
        family: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List career families
    Families {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// List the skill dimensions used in every skill vector
    Dimensions {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// List course platforms with course counts
    Platforms {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// List course levels and the user types each suits
    Levels {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Encoder model management commands
    Models {
        #[command(subcommand)]
        action: ModelAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

/// Profile fields; `--profile` loads them from a JSON file and flags override
#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    /// JSON file with profile fields
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// cbc, 8-4-4, diploma, graduate, postgraduate or professional
    #[arg(short, long)]
    pub user_type: Option<String>,

    /// Comma-separated skills
    #[arg(short, long)]
    pub skills: Option<String>,

    /// Comma-separated soft skills
    #[arg(long)]
    pub soft_skills: Option<String>,

    /// Career goals in free text
    #[arg(short, long)]
    pub goals: Option<String>,

    /// Interests in free text
    #[arg(short, long)]
    pub interests: Option<String>,

    /// CBC senior school pathway
    #[arg(long)]
    pub pathway: Option<String>,

    /// CBC track within the pathway
    #[arg(long)]
    pub track: Option<String>,

    /// 8-4-4 subject combination, comma-separated
    #[arg(long)]
    pub subjects: Option<String>,

    /// Degree or diploma programme
    #[arg(long)]
    pub degree: Option<String>,

    /// Industry for professionals
    #[arg(long)]
    pub industry: Option<String>,

    /// Major or specialisation
    #[arg(long)]
    pub major: Option<String>,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Output format: console, json, markdown
    #[arg(short, long)]
    pub output: Option<String>,

    /// Show every gap, course link and artifact warning
    #[arg(short, long)]
    pub detailed: bool,

    /// Save output to file
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ModelAction {
    /// List known encoder models
    List,

    /// Download an encoder model
    Download {
        /// Model name or HuggingFace repo ID
        model: String,

        /// Force re-download if model exists
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset,
}

impl ProfileArgs {
    /// Build the raw profile, reading `--profile` first if given
    pub fn to_raw_profile(&self) -> Result<RawProfile> {
        let mut raw = match &self.profile {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                serde_json::from_str::<RawProfile>(&content)?
            }
            None => RawProfile::default(),
        };

        let overrides = [
            (&mut raw.user_type, &self.user_type),
            (&mut raw.skills, &self.skills),
            (&mut raw.soft_skills, &self.soft_skills),
            (&mut raw.career_goals, &self.goals),
            (&mut raw.interests, &self.interests),
            (&mut raw.pathway, &self.pathway),
            (&mut raw.track, &self.track),
            (&mut raw.subject_combination, &self.subjects),
            (&mut raw.degree_programme, &self.degree),
            (&mut raw.industry, &self.industry),
            (&mut raw.major, &self.major),
        ];
        for (field, value) in overrides {
            if value.is_some() {
                *field = value.clone();
            }
        }
        Ok(raw)
    }
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> std::result::Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Accepts the display name or a compact form, e.g. "Arts & Media", "arts-media", "artsmedia"
pub fn parse_family(input: &str) -> Result<CareerFamily> {
    let compact = |s: &str| -> String {
        s.chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect()
    };
    let wanted = compact(input);

    CareerFamily::ALL
        .iter()
        .copied()
        .find(|family| compact(family.name()) == wanted || compact(&format!("{:?}", family)) == wanted)
        .ok_or_else(|| CareerError::InvalidInput(format!("Unknown career family: {}", input)))
}

pub fn parse_course_level(input: &str) -> Result<CourseLevel> {
    match input.trim().to_lowercase().as_str() {
        "foundation" | "beginner" | "introductory" => Ok(CourseLevel::Foundation),
        "intermediate" => Ok(CourseLevel::Intermediate),
        "advanced" | "expert" => Ok(CourseLevel::Advanced),
        _ => Err(CareerError::InvalidInput(format!(
            "Invalid course level: {}. Supported: foundation, intermediate, advanced",
            input
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_family_variants() {
        assert_eq!(parse_family("Arts & Media").unwrap(), CareerFamily::ArtsMedia);
        assert_eq!(parse_family("arts-media").unwrap(), CareerFamily::ArtsMedia);
        assert_eq!(parse_family("HEALTHCARE").unwrap(), CareerFamily::Healthcare);
        assert!(parse_family("astrology").is_err());
    }

    #[test]
    fn test_listing_subcommands_parse() {
        let cli = Cli::try_parse_from(["career-compass", "platforms", "-o", "json"]).unwrap();
        assert!(matches!(cli.command, Commands::Platforms { ref output } if output.output.as_deref() == Some("json")));
        assert!(matches!(
            Cli::try_parse_from(["career-compass", "dimensions", "--detailed"]).unwrap().command,
            Commands::Dimensions { ref output } if output.detailed
        ));
        assert!(matches!(
            Cli::try_parse_from(["career-compass", "levels"]).unwrap().command,
            Commands::Levels { .. }
        ));
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("MD").unwrap(), OutputFormat::Markdown);
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_flags_override_profile_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, r#"{"user_type": "diploma", "skills": "welding", "career_goals": "engineering"}"#).unwrap();

        let args = ProfileArgs {
            profile: Some(path),
            skills: Some("python, sql".to_string()),
            ..ProfileArgs::default()
        };
        let raw = args.to_raw_profile().unwrap();
        assert_eq!(raw.user_type.as_deref(), Some("diploma"));
        assert_eq!(raw.skills.as_deref(), Some("python, sql"));
        assert_eq!(raw.career_goals.as_deref(), Some("engineering"));
    }
}
