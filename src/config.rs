//! Configuration management for the career engine

use crate::error::{CareerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub encoder: EncoderConfig,
    pub retrieval: RetrievalConfig,
    pub gaps: GapConfig,
    pub risk: RiskConfig,
    pub learning: LearningConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub artifacts_dir: PathBuf,
    pub catalogue_file: String,
    pub courses_file: String,
    pub ranker_file: String,
    pub synonyms_file: String,
    pub curriculum_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderConfig {
    pub enabled: bool,
    pub model: String,
    pub models_dir: PathBuf,
    pub fallback_dimension: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub candidate_pool: usize,
    pub top_n: usize,
    pub max_top_n: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GapConfig {
    pub critical_threshold: f32,
    pub moderate_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    pub empirical_weight: f32,
    pub skill_weight: f32,
    pub demand_term_weight: f32,
    pub safety_term_weight: f32,
    pub wage_term_weight: f32,
    pub demand_weights: DemandWeights,
    pub thresholds: RiskThresholds,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DemandWeights {
    pub high: f32,
    pub medium: f32,
    pub low: f32,
}

/// Lower bounds of the Medium, High and Very High bands on the 0-100 scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub medium: f32,
    pub high: f32,
    pub very_high: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningConfig {
    pub courses_per_gap: usize,
    pub max_courses_per_gap: usize,
    pub max_courses_per_stage: usize,
    pub min_quality: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            critical_threshold: 2.0,
            moderate_threshold: 0.5,
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            empirical_weight: 0.5,
            skill_weight: 0.5,
            demand_term_weight: 0.4,
            safety_term_weight: 0.4,
            wage_term_weight: 0.2,
            demand_weights: DemandWeights {
                high: 100.0,
                medium: 60.0,
                low: 30.0,
            },
            thresholds: RiskThresholds {
                medium: 35.0,
                high: 55.0,
                very_high: 72.0,
            },
        }
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            courses_per_gap: 2,
            max_courses_per_gap: 5,
            max_courses_per_stage: 6,
            min_quality: 0.3,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            candidate_pool: 50,
            top_n: 5,
            max_top_n: 20,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".career-compass");

        Self {
            data: DataConfig {
                artifacts_dir: base_dir.join("artifacts"),
                catalogue_file: "occupations.json".to_string(),
                courses_file: "courses.json".to_string(),
                ranker_file: "career_ranker.json".to_string(),
                synonyms_file: "skill_synonyms.json".to_string(),
                curriculum_file: "curriculum_boosts.json".to_string(),
            },
            encoder: EncoderConfig {
                enabled: true,
                model: "minishlab/potion-base-8M".to_string(),
                models_dir: base_dir.join("models"),
                fallback_dimension: 256,
            },
            retrieval: RetrievalConfig::default(),
            gaps: GapConfig::default(),
            risk: RiskConfig::default(),
            learning: LearningConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| CareerError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CareerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("career-compass")
            .join("config.toml")
    }

    pub fn artifact_path(&self, file_name: &str) -> PathBuf {
        self.data.artifacts_dir.join(file_name)
    }

    pub fn validate(&self) -> Result<()> {
        let gaps = &self.gaps;
        if !(gaps.moderate_threshold > 0.0 && gaps.moderate_threshold < gaps.critical_threshold) {
            return Err(CareerError::Configuration(format!(
                "gap thresholds must satisfy 0 < moderate ({}) < critical ({})",
                gaps.moderate_threshold, gaps.critical_threshold
            )));
        }

        let t = &self.risk.thresholds;
        if !(0.0 < t.medium && t.medium < t.high && t.high < t.very_high && t.very_high <= 100.0) {
            return Err(CareerError::Configuration(
                "risk thresholds must be strictly increasing within (0, 100]".to_string(),
            ));
        }

        let blend = self.risk.empirical_weight + self.risk.skill_weight;
        let composite = self.risk.demand_term_weight
            + self.risk.safety_term_weight
            + self.risk.wage_term_weight;
        if blend <= 0.0 || composite <= 0.0 {
            return Err(CareerError::Configuration(
                "risk blend and future-proof weights must have a positive total".to_string(),
            ));
        }

        let r = &self.retrieval;
        if r.candidate_pool == 0 || r.top_n == 0 || r.top_n > r.candidate_pool {
            return Err(CareerError::Configuration(format!(
                "retrieval requires 0 < top_n ({}) <= candidate_pool ({})",
                r.top_n, r.candidate_pool
            )));
        }

        if self.encoder.fallback_dimension == 0 {
            return Err(CareerError::Configuration(
                "encoder.fallback_dimension must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retrieval.candidate_pool, 50);
        assert_eq!(config.retrieval.top_n, 5);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let first = Config::load_from(&path).unwrap();
        assert!(path.exists());

        let second = Config::load_from(&path).unwrap();
        assert_eq!(first.learning.courses_per_gap, second.learning.courses_per_gap);
        assert_eq!(first.output.format, second.output.format);
    }

    #[test]
    fn test_rejects_inverted_gap_thresholds() {
        let mut config = Config::default();
        config.gaps.moderate_threshold = 3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_top_n_above_pool() {
        let mut config = Config::default();
        config.retrieval.top_n = 60;
        assert!(config.validate().is_err());
    }
}
