//! Recommendation pipeline: normalize, retrieve, rank, then explain each
//! ranked career with a gap report, a risk profile and a learning path

use crate::analysis::courses::CourseQuery;
use crate::analysis::gap::{transferable_skills, GapReport, SkillsGapAnalyzer, TransferableSkill};
use crate::analysis::learning_path::{LearningPath, LearningPathBuilder};
use crate::analysis::risk::{RiskCategory, RiskProfile};
use crate::catalogue::course::{Course, CourseLevel};
use crate::catalogue::occupation::{CareerFamily, DemandLevel, Occupation};
use crate::catalogue::skills::{SkillDimension, SKILL_DIMENSIONS};
use crate::catalogue::snapshot::{ArtifactWarning, CatalogueSnapshot, SnapshotHandle, SnapshotParts};
use crate::config::Config;
use crate::error::{CareerError, Result};
use crate::matching::features::{CandidateFeatures, FeatureExtractor};
use crate::matching::ranker::{rank, RankedCandidate};
use crate::processing::profile::{ProfileNormalizer, RawProfile, ResolvedSkill, UserProfile, UserQuery, UserType};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendOptions {
    /// Defaults to `retrieval.top_n` from the config
    pub top_n: Option<usize>,
    /// Defaults to `learning.courses_per_gap` from the config
    pub courses_per_gap: Option<usize>,
    /// Quick mode skips gap reports and learning paths
    pub include_details: bool,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            top_n: None,
            courses_per_gap: None,
            include_details: true,
        }
    }
}

/// One ranked career with its explanation
#[derive(Debug, Clone, Serialize)]
pub struct CareerRecommendation {
    pub rank: usize,
    pub code: String,
    pub title: String,
    pub family: CareerFamily,
    pub zone: u8,
    pub demand: DemandLevel,
    pub median_wage: Option<f32>,
    /// Ranker score on 0-100; the clamped cosine similarity in degraded mode
    pub match_score: f32,
    pub similarity: f32,
    pub features: CandidateFeatures,
    pub risk: RiskProfile,
    pub gap_report: Option<GapReport>,
    pub learning_path: Option<LearningPath>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    pub user_type: UserType,
    pub education_zone: u8,
    pub resolved_skills: Vec<ResolvedSkill>,
    pub careers: Vec<CareerRecommendation>,
    pub transferable_skills: Vec<TransferableSkill>,
    pub warnings: Vec<ArtifactWarning>,
    pub encoder: String,
    pub ranker: String,
    /// True when the encoder or the ranker is running on its fallback
    pub degraded: bool,
    pub candidates_retrieved: usize,
    pub pipeline_ms: u64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillsGapResult {
    pub occupation: OccupationSummary,
    pub gap_report: GapReport,
    pub learning_path: LearningPath,
    pub risk: RiskProfile,
}

/// Catalogue listing entry
#[derive(Debug, Clone, Serialize)]
pub struct OccupationSummary {
    pub code: String,
    pub title: String,
    pub family: CareerFamily,
    pub zone: u8,
    pub demand: DemandLevel,
    pub median_wage: Option<f32>,
    pub risk_score: f32,
    pub risk_category: RiskCategory,
    pub future_proof_score: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OccupationRisk {
    pub occupation: OccupationSummary,
    pub risk: RiskProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct OccupationDetail {
    pub occupation: Occupation,
    pub risk: RiskProfile,
    /// Required levels above zero, highest first
    pub top_skills: Vec<(String, f32)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub category: RiskCategory,
    pub count: usize,
    pub percentage: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilyRisk {
    pub family: CareerFamily,
    pub occupations: usize,
    pub mean_risk: f32,
    pub mean_future_proof: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskDistribution {
    pub total: usize,
    pub mean_risk: f32,
    pub by_category: Vec<CategoryCount>,
    pub by_family: Vec<FamilyRisk>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseHit {
    pub course: Course,
    pub relevance_pct: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilySummary {
    pub family: CareerFamily,
    pub name: &'static str,
    pub occupations: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformCount {
    pub name: String,
    pub course_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformListing {
    pub platforms: Vec<PlatformCount>,
    pub total_courses: usize,
}

/// A learning-path stage with its course count and the user types that
/// favour it
#[derive(Debug, Clone, Serialize)]
pub struct LevelSummary {
    pub level: CourseLevel,
    pub course_count: usize,
    pub user_types: Vec<UserType>,
}

pub struct CareerEngine {
    handle: SnapshotHandle,
}

impl CareerEngine {
    /// Load every artifact, falling back per artifact; only internal
    /// failures are returned as errors
    pub fn load(config: &Config) -> Result<(Self, Vec<ArtifactWarning>)> {
        let (snapshot, warnings) = CatalogueSnapshot::load(config)?;
        Ok((
            Self {
                handle: SnapshotHandle::new(snapshot),
            },
            warnings,
        ))
    }

    pub fn from_parts(parts: SnapshotParts, config: Config) -> Self {
        Self {
            handle: SnapshotHandle::new(CatalogueSnapshot::build(parts, config, Vec::new())),
        }
    }

    pub fn snapshot(&self) -> Arc<CatalogueSnapshot> {
        self.handle.current()
    }

    /// Rebuild from the config and swap the result in; requests already
    /// running keep the snapshot they started with
    pub fn reload(&self, config: &Config) -> Result<Vec<ArtifactWarning>> {
        let (snapshot, warnings) = CatalogueSnapshot::load(config)?;
        self.handle.swap(snapshot);
        info!("Catalogue snapshot reloaded with {} warning(s)", warnings.len());
        Ok(warnings)
    }

    pub async fn recommend(&self, raw: &RawProfile, options: &RecommendOptions) -> Result<RecommendationReport> {
        let start_time = Instant::now();
        let snapshot = self.handle.current();
        let config = snapshot.config();

        let query = Arc::new(normalize(&snapshot, raw)?);

        let pool = config.retrieval.candidate_pool.max(1);
        let retrieved = snapshot.index().retrieve(&query.semantic_vector, pool);
        debug!("Retrieved {} candidates", retrieved.len());

        let extractor = FeatureExtractor::new(snapshot.processor(), config.risk.demand_weights);
        let features: Vec<CandidateFeatures> = retrieved
            .iter()
            .filter_map(|candidate| {
                let occupation = snapshot.occupation(candidate.index)?;
                let risk = snapshot.risk_profile(candidate.index)?;
                Some(extractor.extract(&query, occupation, risk, candidate.similarity))
            })
            .collect();

        let top_n = options
            .top_n
            .unwrap_or(config.retrieval.top_n)
            .clamp(1, config.retrieval.max_top_n.max(1))
            .min(retrieved.len());
        let ranked = rank(&retrieved, &features, snapshot.scorer(), top_n);
        debug!("Ranked {} candidates with {}", ranked.len(), snapshot.scorer().name());

        let courses_per_gap = options.courses_per_gap.unwrap_or(config.learning.courses_per_gap);
        let careers = explain_candidates(&snapshot, &query, &ranked, courses_per_gap, options.include_details).await;

        let reports: Vec<GapReport> = careers.iter().filter_map(|c| c.gap_report.clone()).collect();
        let degraded = snapshot.encoder().is_fallback() || snapshot.scorer().is_fallback();
        let pipeline_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Recommended {} careers from {} candidates in {} ms{}",
            careers.len(),
            retrieved.len(),
            pipeline_ms,
            if degraded { " (degraded mode)" } else { "" }
        );

        Ok(RecommendationReport {
            user_type: query.user_type,
            education_zone: query.education_zone,
            resolved_skills: query.resolved_skills.clone(),
            careers,
            transferable_skills: transferable_skills(&reports),
            warnings: snapshot.warnings().to_vec(),
            encoder: snapshot.encoder().name().to_string(),
            ranker: snapshot.scorer().name().to_string(),
            degraded,
            candidates_retrieved: retrieved.len(),
            pipeline_ms,
            generated_at: Utc::now(),
        })
    }

    pub async fn recommend_summary(&self, raw: &RawProfile, top_n: Option<usize>) -> Result<RecommendationReport> {
        let options = RecommendOptions {
            top_n,
            courses_per_gap: None,
            include_details: false,
        };
        self.recommend(raw, &options).await
    }

    pub fn skills_gap_for(
        &self,
        raw: &RawProfile,
        occupation_query: &str,
        courses_per_gap: Option<usize>,
    ) -> Result<SkillsGapResult> {
        let snapshot = self.handle.current();
        let query = normalize(&snapshot, raw)?;
        let index = lookup(&snapshot, occupation_query)?;
        let (occupation, risk) = occupation_and_risk(&snapshot, index, occupation_query)?;

        let config = snapshot.config();
        let gap_report = SkillsGapAnalyzer::new(config.gaps).analyze(&query.skill_vector, occupation);
        let learning_path = LearningPathBuilder::new(snapshot.courses(), snapshot.synonyms(), &config.learning)
            .build(
                &gap_report,
                courses_per_gap.unwrap_or(config.learning.courses_per_gap),
                query.user_type.course_levels(),
            );

        Ok(SkillsGapResult {
            occupation: summarize(occupation, risk),
            gap_report,
            learning_path,
            risk: risk.clone(),
        })
    }

    pub fn risk_for(&self, occupation_query: &str) -> Result<OccupationRisk> {
        let snapshot = self.handle.current();
        let index = lookup(&snapshot, occupation_query)?;
        let (occupation, risk) = occupation_and_risk(&snapshot, index, occupation_query)?;
        Ok(OccupationRisk {
            occupation: summarize(occupation, risk),
            risk: risk.clone(),
        })
    }

    /// Most future-proof occupations first, ties in catalogue order
    pub fn leaderboard(
        &self,
        top_n: usize,
        family: Option<CareerFamily>,
        max_risk: Option<f32>,
    ) -> Vec<OccupationSummary> {
        let snapshot = self.handle.current();
        let mut entries: Vec<OccupationSummary> = snapshot
            .occupations()
            .iter()
            .zip(snapshot.risk_profiles())
            .filter(|(o, _)| family.map_or(true, |f| o.family == f))
            .filter(|(_, r)| max_risk.map_or(true, |max| r.risk_score <= max))
            .map(|(o, r)| summarize(o, r))
            .collect();

        entries.sort_by(|a, b| b.future_proof_score.total_cmp(&a.future_proof_score));
        entries.truncate(top_n);
        entries
    }

    pub fn risk_distribution(&self) -> RiskDistribution {
        let snapshot = self.handle.current();
        let profiles = snapshot.risk_profiles();
        let total = profiles.len();

        let by_category = RiskCategory::ALL
            .iter()
            .map(|category| {
                let count = profiles.iter().filter(|r| r.risk_category == *category).count();
                CategoryCount {
                    category: *category,
                    count,
                    percentage: percentage(count, total),
                }
            })
            .collect();

        let by_family = CareerFamily::ALL
            .iter()
            .filter_map(|family| {
                let members: Vec<&RiskProfile> = snapshot
                    .occupations()
                    .iter()
                    .zip(profiles)
                    .filter(|(o, _)| o.family == *family)
                    .map(|(_, r)| r)
                    .collect();
                if members.is_empty() {
                    return None;
                }
                Some(FamilyRisk {
                    family: *family,
                    occupations: members.len(),
                    mean_risk: mean(members.iter().map(|r| r.risk_score)),
                    mean_future_proof: mean(members.iter().map(|r| r.future_proof_score)),
                })
            })
            .collect();

        RiskDistribution {
            total,
            mean_risk: mean(profiles.iter().map(|r| r.risk_score)),
            by_category,
            by_family,
        }
    }

    /// Courses for a skill term. A term that resolves to a skill dimension is
    /// expanded with that dimension's label and synonyms.
    pub fn search_courses(&self, skill: &str, options: &CourseQuery) -> Result<Vec<CourseHit>> {
        let skill = skill.trim();
        if skill.is_empty() {
            return Err(CareerError::InvalidInput("skill must not be empty".to_string()));
        }

        let snapshot = self.handle.current();
        let mut query = skill.to_string();
        if let Some(found) = snapshot.synonyms().resolve(skill) {
            query.push(' ');
            query.push_str(SKILL_DIMENSIONS[found.dimension].label);
            for term in snapshot.synonyms().terms_for(found.dimension) {
                query.push(' ');
                query.push_str(term);
            }
        }

        let hits = snapshot
            .courses()
            .search(&query, options)
            .into_iter()
            .filter_map(|found| {
                let course = snapshot.courses().course(found.index)?;
                Some(CourseHit {
                    course: course.clone(),
                    relevance_pct: found.relevance * 100.0,
                })
            })
            .collect();
        Ok(hits)
    }

    pub fn occupations(&self, family: Option<CareerFamily>) -> Vec<OccupationSummary> {
        let snapshot = self.handle.current();
        snapshot
            .occupations()
            .iter()
            .zip(snapshot.risk_profiles())
            .filter(|(o, _)| family.map_or(true, |f| o.family == f))
            .map(|(o, r)| summarize(o, r))
            .collect()
    }

    pub fn occupation(&self, query: &str) -> Result<OccupationDetail> {
        let snapshot = self.handle.current();
        let index = lookup(&snapshot, query)?;
        let (occupation, risk) = occupation_and_risk(&snapshot, index, query)?;

        let mut top_skills: Vec<(String, f32)> = occupation
            .skill_levels
            .iter()
            .zip(SKILL_DIMENSIONS.iter())
            .filter(|(level, _)| **level > 0.0)
            .map(|(level, dim)| (dim.label.to_string(), *level))
            .collect();
        top_skills.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(OccupationDetail {
            occupation: occupation.clone(),
            risk: risk.clone(),
            top_skills,
        })
    }

    pub fn skill_dimensions(&self) -> &'static [SkillDimension] {
        &SKILL_DIMENSIONS
    }

    /// Course counts per platform, largest first, ties by name
    pub fn course_platforms(&self) -> PlatformListing {
        let snapshot = self.handle.current();
        let courses = snapshot.courses().courses();

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for course in courses {
            *counts.entry(course.platform.as_str()).or_insert(0) += 1;
        }

        let mut platforms: Vec<PlatformCount> = counts
            .into_iter()
            .map(|(name, course_count)| PlatformCount {
                name: name.to_string(),
                course_count,
            })
            .collect();
        platforms.sort_by(|a, b| b.course_count.cmp(&a.course_count));

        PlatformListing {
            platforms,
            total_courses: courses.len(),
        }
    }

    pub fn course_levels(&self) -> Vec<LevelSummary> {
        let snapshot = self.handle.current();
        let courses = snapshot.courses().courses();
        CourseLevel::ORDERED
            .iter()
            .map(|level| LevelSummary {
                level: *level,
                course_count: courses.iter().filter(|c| c.level == *level).count(),
                user_types: UserType::ALL
                    .iter()
                    .copied()
                    .filter(|user_type| user_type.course_levels().contains(level))
                    .collect(),
            })
            .collect()
    }

    /// Families present in the catalogue, in registry order
    pub fn families(&self) -> Vec<FamilySummary> {
        let snapshot = self.handle.current();
        CareerFamily::ALL
            .iter()
            .map(|family| FamilySummary {
                family: *family,
                name: family.name(),
                occupations: snapshot.occupations().iter().filter(|o| o.family == *family).count(),
            })
            .filter(|summary| summary.occupations > 0)
            .collect()
    }
}

fn normalize(snapshot: &CatalogueSnapshot, raw: &RawProfile) -> Result<UserQuery> {
    let profile = UserProfile::from_raw(raw, snapshot.processor())?;
    ProfileNormalizer::new(
        snapshot.synonyms(),
        snapshot.curriculum(),
        snapshot.encoder(),
        snapshot.processor(),
    )
    .normalize(&profile)
}

fn lookup(snapshot: &CatalogueSnapshot, query: &str) -> Result<usize> {
    snapshot
        .find_occupation(query)
        .ok_or_else(|| CareerError::OccupationNotFound(query.trim().to_string()))
}

fn occupation_and_risk<'s>(
    snapshot: &'s CatalogueSnapshot,
    index: usize,
    query: &str,
) -> Result<(&'s Occupation, &'s RiskProfile)> {
    match (snapshot.occupation(index), snapshot.risk_profile(index)) {
        (Some(occupation), Some(risk)) => Ok((occupation, risk)),
        _ => Err(CareerError::OccupationNotFound(query.trim().to_string())),
    }
}

/// Gap, risk and path work per candidate on the blocking pool, merged back
/// in ranker order. A slot whose task failed is recomputed inline.
async fn explain_candidates(
    snapshot: &Arc<CatalogueSnapshot>,
    query: &Arc<UserQuery>,
    ranked: &[RankedCandidate],
    courses_per_gap: usize,
    include_details: bool,
) -> Vec<CareerRecommendation> {
    let mut tasks = JoinSet::new();
    for (slot, candidate) in ranked.iter().copied().enumerate() {
        let snapshot = Arc::clone(snapshot);
        let query = Arc::clone(query);
        tasks.spawn_blocking(move || {
            let explained = explain(&snapshot, &query, &candidate, slot + 1, courses_per_gap, include_details);
            (slot, explained)
        });
    }

    let mut slots: Vec<Option<CareerRecommendation>> = vec![None; ranked.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((slot, explained)) => {
                if let Some(entry) = slots.get_mut(slot) {
                    *entry = explained;
                }
            }
            Err(e) => warn!("Candidate analysis task failed: {}", e),
        }
    }

    slots
        .into_iter()
        .zip(ranked.iter())
        .enumerate()
        .filter_map(|(slot, (explained, candidate))| {
            explained.or_else(|| explain(snapshot, query, candidate, slot + 1, courses_per_gap, include_details))
        })
        .collect()
}

fn explain(
    snapshot: &CatalogueSnapshot,
    query: &UserQuery,
    candidate: &RankedCandidate,
    rank: usize,
    courses_per_gap: usize,
    include_details: bool,
) -> Option<CareerRecommendation> {
    let occupation = snapshot.occupation(candidate.index)?;
    let risk = snapshot.risk_profile(candidate.index)?;
    let config = snapshot.config();

    let (gap_report, learning_path) = if include_details {
        let report = SkillsGapAnalyzer::new(config.gaps).analyze(&query.skill_vector, occupation);
        let path = LearningPathBuilder::new(snapshot.courses(), snapshot.synonyms(), &config.learning)
            .build(&report, courses_per_gap, query.user_type.course_levels());
        (Some(report), Some(path))
    } else {
        (None, None)
    };

    Some(CareerRecommendation {
        rank,
        code: occupation.code.clone(),
        title: occupation.title.clone(),
        family: occupation.family,
        zone: occupation.zone,
        demand: occupation.demand,
        median_wage: occupation.median_wage,
        match_score: (candidate.score.clamp(0.0, 1.0) * 100.0 * 10.0).round() / 10.0,
        similarity: candidate.similarity,
        features: candidate.features,
        risk: risk.clone(),
        gap_report,
        learning_path,
    })
}

fn summarize(occupation: &Occupation, risk: &RiskProfile) -> OccupationSummary {
    OccupationSummary {
        code: occupation.code.clone(),
        title: occupation.title.clone(),
        family: occupation.family,
        zone: occupation.zone,
        demand: occupation.demand,
        median_wage: occupation.median_wage,
        risk_score: risk.risk_score,
        risk_category: risk.risk_category,
        future_proof_score: risk.future_proof_score,
    }
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

fn percentage(count: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        count as f32 / total as f32 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::fallback::{demo_courses, demo_occupations};
    use crate::matching::ranker::SimilarityScorer;
    use crate::processing::curriculum::CurriculumTable;
    use crate::processing::encoder::HashingEncoder;
    use crate::processing::synonyms::SynonymTable;

    fn engine() -> CareerEngine {
        let parts = SnapshotParts {
            occupations: demo_occupations(),
            courses: demo_courses(),
            synonyms: SynonymTable::default_table().unwrap(),
            curriculum: CurriculumTable::default(),
            encoder: Arc::new(HashingEncoder::new(256)),
            scorer: Arc::new(SimilarityScorer),
        };
        CareerEngine::from_parts(parts, Config::default())
    }

    fn healthcare_profile() -> RawProfile {
        RawProfile {
            user_type: Some("graduate".to_string()),
            skills: Some("patient care, biology, communication".to_string()),
            career_goals: Some("I want to work in healthcare".to_string()),
            ..RawProfile::default()
        }
    }

    #[tokio::test]
    async fn test_recommend_returns_ranked_careers() {
        let engine = engine();
        let report = engine.recommend(&healthcare_profile(), &RecommendOptions::default()).await.unwrap();

        assert_eq!(report.careers.len(), 5);
        assert!(report.degraded);
        for (i, career) in report.careers.iter().enumerate() {
            assert_eq!(career.rank, i + 1);
            assert!(career.gap_report.is_some());
            assert!(career.learning_path.is_some());
            assert!((0.0..=100.0).contains(&career.match_score));
        }
    }

    #[tokio::test]
    async fn test_summary_mode_skips_details() {
        let engine = engine();
        let report = engine.recommend_summary(&healthcare_profile(), Some(3)).await.unwrap();

        assert_eq!(report.careers.len(), 3);
        assert!(report.careers.iter().all(|c| c.gap_report.is_none() && c.learning_path.is_none()));
        assert!(report.transferable_skills.is_empty());
    }

    #[tokio::test]
    async fn test_empty_profile_is_rejected() {
        let engine = engine();
        let err = engine
            .recommend(&RawProfile::default(), &RecommendOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CareerError::InsufficientInput));
    }

    #[test]
    fn test_occupation_lookup_order() {
        let engine = engine();
        assert_eq!(engine.occupation("registered nurses").unwrap().occupation.title, "Registered Nurses");
        assert!(matches!(
            engine.risk_for("astronaut chef"),
            Err(CareerError::OccupationNotFound(_))
        ));
    }

    #[test]
    fn test_leaderboard_is_sorted_and_filtered() {
        let engine = engine();
        let board = engine.leaderboard(100, None, Some(50.0));
        assert!(board.windows(2).all(|w| w[0].future_proof_score >= w[1].future_proof_score));
        assert!(board.iter().all(|e| e.risk_score <= 50.0));

        let health = engine.leaderboard(3, Some(CareerFamily::Healthcare), None);
        assert!(health.len() <= 3);
        assert!(health.iter().all(|e| e.family == CareerFamily::Healthcare));
    }

    #[test]
    fn test_risk_distribution_counts_every_occupation() {
        let engine = engine();
        let distribution = engine.risk_distribution();
        let counted: usize = distribution.by_category.iter().map(|c| c.count).sum();
        assert_eq!(counted, distribution.total);

        let families: usize = distribution.by_family.iter().map(|f| f.occupations).sum();
        assert_eq!(families, distribution.total);
    }

    #[test]
    fn test_search_courses_rejects_blank_skill() {
        let engine = engine();
        assert!(matches!(
            engine.search_courses("  ", &CourseQuery::default()),
            Err(CareerError::InvalidInput(_))
        ));
        let hits = engine.search_courses("python", &CourseQuery::default()).unwrap();
        assert!(!hits.is_empty());
        assert!(hits.windows(2).all(|w| w[0].relevance_pct >= w[1].relevance_pct));
    }

    #[test]
    fn test_risk_for_matches_occupation_view() {
        let engine = engine();
        let risk = engine.risk_for("29-1141.00").unwrap();
        let detail = engine.occupation("29-1141.00").unwrap();
        assert_eq!(risk.occupation.title, "Registered Nurses");
        assert_eq!(risk.risk.risk_score, detail.risk.risk_score);
        assert_eq!(risk.occupation.risk_category, risk.risk.risk_category);
    }

    #[test]
    fn test_catalogue_listings() {
        let engine = engine();
        assert_eq!(engine.skill_dimensions().len(), 20);
        assert_eq!(engine.skill_dimensions()[14].key, "programming");

        let platforms = engine.course_platforms();
        let counted: usize = platforms.platforms.iter().map(|p| p.course_count).sum();
        assert_eq!(counted, platforms.total_courses);
        assert!(platforms.platforms.windows(2).all(|w| w[0].course_count >= w[1].course_count));

        let levels = engine.course_levels();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels.iter().map(|l| l.course_count).sum::<usize>(), platforms.total_courses);
        assert!(levels[0].user_types.contains(&UserType::Cbc));
        assert!(!levels[2].user_types.contains(&UserType::Cbc));
        assert!(levels[2].user_types.contains(&UserType::Postgraduate));
    }

    #[test]
    fn test_families_cover_catalogue() {
        let engine = engine();
        let total: usize = engine.families().iter().map(|f| f.occupations).sum();
        assert_eq!(total, engine.occupations(None).len());
    }
}
