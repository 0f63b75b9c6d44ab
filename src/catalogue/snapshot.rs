//! Immutable, shareable bundle of everything a recommendation reads

use crate::analysis::courses::CourseIndex;
use crate::analysis::risk::{RiskProfile, RiskScorer};
use crate::catalogue::course::Course;
use crate::catalogue::fallback::{demo_courses, demo_occupations};
use crate::catalogue::loader::{load_courses, load_occupations, LoadStats};
use crate::catalogue::occupation::Occupation;
use crate::config::Config;
use crate::error::Result;
use crate::matching::ranker::{select_scorer, CandidateScorer};
use crate::matching::retriever::OccupationIndex;
use crate::processing::curriculum::CurriculumTable;
use crate::processing::encoder::{select_encoder, VectorEncoder};
use crate::processing::synonyms::SynonymTable;
use crate::processing::text_processor::TextProcessor;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

/// A missing or unusable artifact that was replaced by a fallback
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactWarning {
    pub artifact: String,
    pub message: String,
}

impl ArtifactWarning {
    fn new(artifact: &str, message: impl Into<String>) -> Self {
        let warning = Self {
            artifact: artifact.to_string(),
            message: message.into(),
        };
        warn!("{}: {}", warning.artifact, warning.message);
        warning
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotStats {
    pub occupations: LoadStats,
    pub courses: LoadStats,
}

/// Inputs to a snapshot build
pub struct SnapshotParts {
    pub occupations: Vec<Occupation>,
    pub courses: Vec<Course>,
    pub synonyms: SynonymTable,
    pub curriculum: CurriculumTable,
    pub encoder: Arc<dyn VectorEncoder>,
    pub scorer: Arc<dyn CandidateScorer>,
}

pub struct CatalogueSnapshot {
    occupations: Vec<Occupation>,
    index: OccupationIndex,
    risk_profiles: Vec<RiskProfile>,
    courses: CourseIndex,
    synonyms: SynonymTable,
    curriculum: CurriculumTable,
    encoder: Arc<dyn VectorEncoder>,
    scorer: Arc<dyn CandidateScorer>,
    processor: TextProcessor,
    config: Config,
    warnings: Vec<ArtifactWarning>,
    stats: SnapshotStats,
    built_at: DateTime<Utc>,
}

impl CatalogueSnapshot {
    /// Embed the catalogue and precompute every risk profile
    pub fn build(parts: SnapshotParts, config: Config, warnings: Vec<ArtifactWarning>) -> Self {
        let start_time = Instant::now();

        let index = OccupationIndex::build(&parts.occupations, parts.encoder.as_ref());
        let risk_profiles = RiskScorer::new(config.risk.clone()).score_catalogue(&parts.occupations);
        let courses = CourseIndex::build(parts.courses);

        let stats = SnapshotStats {
            occupations: LoadStats {
                loaded: parts.occupations.len(),
                skipped: 0,
            },
            courses: LoadStats {
                loaded: courses.len(),
                skipped: 0,
            },
        };

        info!(
            "Snapshot built in {:.2?}: {} occupations, {} courses, encoder {}, ranker {}",
            start_time.elapsed(),
            parts.occupations.len(),
            courses.len(),
            parts.encoder.name(),
            parts.scorer.name()
        );

        Self {
            occupations: parts.occupations,
            index,
            risk_profiles,
            courses,
            synonyms: parts.synonyms,
            curriculum: parts.curriculum,
            encoder: parts.encoder,
            scorer: parts.scorer,
            processor: TextProcessor::new(),
            config,
            warnings,
            stats,
            built_at: Utc::now(),
        }
    }

    /// Load every artifact named by the config, substituting a fallback for
    /// anything missing or unusable
    pub fn load(config: &Config) -> Result<(Self, Vec<ArtifactWarning>)> {
        let mut warnings = Vec::new();

        let (occupations, occupation_stats) =
            load_occupations_or_builtin(&config.artifact_path(&config.data.catalogue_file), &mut warnings);
        let (courses, course_stats) =
            load_courses_or_builtin(&config.artifact_path(&config.data.courses_file), &mut warnings);

        let synonyms_path = config.artifact_path(&config.data.synonyms_file);
        let synonyms = if synonyms_path.exists() {
            match SynonymTable::with_overrides(&synonyms_path) {
                Ok(table) => table,
                Err(e) => {
                    warnings.push(ArtifactWarning::new(
                        "synonyms",
                        format!("{} unusable ({}); using built-in synonyms", synonyms_path.display(), e),
                    ));
                    SynonymTable::default_table()?
                }
            }
        } else {
            SynonymTable::default_table()?
        };

        let curriculum_path = config.artifact_path(&config.data.curriculum_file);
        let curriculum = if curriculum_path.exists() {
            CurriculumTable::with_overrides(&curriculum_path).unwrap_or_else(|e| {
                warnings.push(ArtifactWarning::new(
                    "curriculum",
                    format!("{} unusable ({}); using built-in boosts", curriculum_path.display(), e),
                ));
                CurriculumTable::default()
            })
        } else {
            CurriculumTable::default()
        };

        let (encoder, encoder_warning) = select_encoder(&config.encoder);
        if let Some(message) = encoder_warning {
            warnings.push(ArtifactWarning::new("encoder", message));
        }

        let (scorer, scorer_warning) = select_scorer(&config.artifact_path(&config.data.ranker_file));
        if let Some(message) = scorer_warning {
            warnings.push(ArtifactWarning::new("ranker", message));
        }

        let parts = SnapshotParts {
            occupations,
            courses,
            synonyms,
            curriculum,
            encoder,
            scorer,
        };
        let mut snapshot = Self::build(parts, config.clone(), warnings.clone());
        snapshot.stats = SnapshotStats {
            occupations: occupation_stats,
            courses: course_stats,
        };

        Ok((snapshot, warnings))
    }

    pub fn occupations(&self) -> &[Occupation] {
        &self.occupations
    }

    pub fn occupation(&self, index: usize) -> Option<&Occupation> {
        self.occupations.get(index)
    }

    pub fn risk_profile(&self, index: usize) -> Option<&RiskProfile> {
        self.risk_profiles.get(index)
    }

    pub fn risk_profiles(&self) -> &[RiskProfile] {
        &self.risk_profiles
    }

    pub fn index(&self) -> &OccupationIndex {
        &self.index
    }

    pub fn courses(&self) -> &CourseIndex {
        &self.courses
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn curriculum(&self) -> &CurriculumTable {
        &self.curriculum
    }

    pub fn encoder(&self) -> &dyn VectorEncoder {
        self.encoder.as_ref()
    }

    pub fn scorer(&self) -> &dyn CandidateScorer {
        self.scorer.as_ref()
    }

    pub fn processor(&self) -> &TextProcessor {
        &self.processor
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn warnings(&self) -> &[ArtifactWarning] {
        &self.warnings
    }

    pub fn stats(&self) -> SnapshotStats {
        self.stats
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Exact code, then case-insensitive exact title, then the first title
    /// containing the query
    pub fn find_occupation(&self, query: &str) -> Option<usize> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        let lower = query.to_lowercase();

        self.occupations
            .iter()
            .position(|o| o.code == query)
            .or_else(|| self.occupations.iter().position(|o| o.title.to_lowercase() == lower))
            .or_else(|| {
                self.occupations
                    .iter()
                    .position(|o| o.title.to_lowercase().contains(&lower))
            })
    }
}

fn load_occupations_or_builtin(path: &Path, warnings: &mut Vec<ArtifactWarning>) -> (Vec<Occupation>, LoadStats) {
    let reason = if path.exists() {
        match load_occupations(path) {
            Ok((occupations, stats)) if !occupations.is_empty() => return (occupations, stats),
            Ok((_, stats)) => format!("{} has no usable occupations ({} skipped)", path.display(), stats.skipped),
            Err(e) => format!("{} unreadable ({})", path.display(), e),
        }
    } else {
        format!("{} not found", path.display())
    };

    warnings.push(ArtifactWarning::new(
        "catalogue",
        format!("{}; using built-in demo catalogue", reason),
    ));
    let occupations = demo_occupations();
    let stats = LoadStats {
        loaded: occupations.len(),
        skipped: 0,
    };
    (occupations, stats)
}

fn load_courses_or_builtin(path: &Path, warnings: &mut Vec<ArtifactWarning>) -> (Vec<Course>, LoadStats) {
    let reason = if path.exists() {
        match load_courses(path) {
            Ok((courses, stats)) if !courses.is_empty() => return (courses, stats),
            Ok((_, stats)) => format!("{} has no usable courses ({} skipped)", path.display(), stats.skipped),
            Err(e) => format!("{} unreadable ({})", path.display(), e),
        }
    } else {
        format!("{} not found", path.display())
    };

    warnings.push(ArtifactWarning::new(
        "courses",
        format!("{}; using built-in demo courses", reason),
    ));
    let courses = demo_courses();
    let stats = LoadStats {
        loaded: courses.len(),
        skipped: 0,
    };
    (courses, stats)
}

/// Shared pointer to the current snapshot; a swap never disturbs readers
/// already holding the previous one
pub struct SnapshotHandle {
    current: RwLock<Arc<CatalogueSnapshot>>,
}

impl SnapshotHandle {
    pub fn new(snapshot: CatalogueSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn current(&self) -> Arc<CatalogueSnapshot> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Install a new snapshot, returning the one it replaced
    pub fn swap(&self, snapshot: CatalogueSnapshot) -> Arc<CatalogueSnapshot> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::ranker::SimilarityScorer;
    use crate::processing::encoder::HashingEncoder;
    use tempfile::TempDir;

    fn demo_snapshot() -> CatalogueSnapshot {
        let parts = SnapshotParts {
            occupations: demo_occupations(),
            courses: demo_courses(),
            synonyms: SynonymTable::default_table().unwrap(),
            curriculum: CurriculumTable::default(),
            encoder: Arc::new(HashingEncoder::new(64)),
            scorer: Arc::new(SimilarityScorer),
        };
        CatalogueSnapshot::build(parts, Config::default(), Vec::new())
    }

    #[test]
    fn test_build_precomputes_aligned_profiles() {
        let snapshot = demo_snapshot();
        assert_eq!(snapshot.risk_profiles().len(), snapshot.occupations().len());
        assert_eq!(snapshot.index().len(), snapshot.occupations().len());
        assert_eq!(snapshot.index().dimension(), 64);
        assert!(snapshot
            .risk_profiles()
            .iter()
            .all(|p| (0.0..=100.0).contains(&p.risk_score)));
    }

    #[test]
    fn test_find_occupation_lookup_order() {
        let snapshot = demo_snapshot();
        let by_code = snapshot.find_occupation("29-1141.00").unwrap();
        assert_eq!(snapshot.occupations()[by_code].title, "Registered Nurses");

        let by_title = snapshot.find_occupation("data scientists").unwrap();
        assert_eq!(snapshot.occupations()[by_title].code, "15-2051.00");

        let by_fragment = snapshot.find_occupation("Engineer").unwrap();
        assert_eq!(snapshot.occupations()[by_fragment].title, "Civil Engineers");

        assert!(snapshot.find_occupation("Astronaut").is_none());
        assert!(snapshot.find_occupation("  ").is_none());
    }

    #[test]
    fn test_swap_keeps_old_snapshot_alive_for_readers() {
        let handle = SnapshotHandle::new(demo_snapshot());
        let before = handle.current();
        let replaced = handle.swap(demo_snapshot());

        assert!(Arc::ptr_eq(&before, &replaced));
        assert!(!Arc::ptr_eq(&before, &handle.current()));
        assert_eq!(before.occupations().len(), handle.current().occupations().len());
    }

    #[test]
    fn test_missing_artifacts_fall_back_with_warnings() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.data.artifacts_dir = temp_dir.path().to_path_buf();
        config.encoder.enabled = false;

        let (snapshot, warnings) = CatalogueSnapshot::load(&config).unwrap();
        let artifacts: Vec<&str> = warnings.iter().map(|w| w.artifact.as_str()).collect();

        assert_eq!(artifacts, vec!["catalogue", "courses", "ranker"]);
        assert_eq!(snapshot.occupations().len(), demo_occupations().len());
        assert!(snapshot.scorer().is_fallback());
        assert!(snapshot.encoder().is_fallback());
        assert_eq!(snapshot.warnings().len(), 3);
    }
}
