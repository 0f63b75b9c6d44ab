//! Gap-driven course selection and sequencing into staged learning paths

use crate::analysis::courses::{CourseIndex, CourseQuery};
use crate::analysis::gap::{GapReport, SkillGap};
use crate::catalogue::course::CourseLevel;
use crate::catalogue::skills::SKILL_DIMENSIONS;
use crate::config::LearningConfig;
use crate::processing::synonyms::SynonymTable;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseRecommendation {
    pub course_id: String,
    pub title: String,
    pub platform: String,
    pub subject: String,
    pub level: CourseLevel,
    pub quality_score: Option<f32>,
    pub is_free: bool,
    pub duration_hours: Option<f32>,
    pub url: Option<String>,
    pub relevance_pct: f32,
    pub skill_gap: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningStage {
    pub level: CourseLevel,
    pub title: String,
    pub courses: Vec<CourseRecommendation>,
    pub hours: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LearningPath {
    pub stages: Vec<LearningStage>,
    pub total_hours: f32,
}

impl LearningPath {
    pub fn course_count(&self) -> usize {
        self.stages.iter().map(|s| s.courses.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

pub struct LearningPathBuilder<'a> {
    index: &'a CourseIndex,
    synonyms: &'a SynonymTable,
    config: &'a LearningConfig,
}

impl<'a> LearningPathBuilder<'a> {
    pub fn new(index: &'a CourseIndex, synonyms: &'a SynonymTable, config: &'a LearningConfig) -> Self {
        Self {
            index,
            synonyms,
            config,
        }
    }

    /// Search text for a gap: the dimension label, its key, and every synonym
    /// term that resolves to it
    pub fn gap_query(&self, gap: &SkillGap) -> String {
        let mut parts = vec![gap.label.to_string(), gap.dimension.replace('_', " ")];
        if let Some(idx) = gap.dimension_index() {
            parts.extend(self.synonyms.terms_for(idx).into_iter().map(str::to_string));
        }
        parts.join(" ")
    }

    /// Critical gaps first, then moderate, each in weighted-gap order. A
    /// course appears at most once in the whole path.
    ///
    /// Levels in `preferred` are filled first and take up to
    /// `courses_per_gap` courses per gap; every other level takes one.
    pub fn build(&self, report: &GapReport, courses_per_gap: usize, preferred: &[CourseLevel]) -> LearningPath {
        let per_gap = courses_per_gap.clamp(1, self.config.max_courses_per_gap.max(1));
        let stage_cap = self.config.max_courses_per_stage.max(1);

        let fill_order: Vec<CourseLevel> = preferred
            .iter()
            .copied()
            .chain(CourseLevel::ORDERED.into_iter().filter(|level| !preferred.contains(level)))
            .collect();

        let mut seen: HashSet<String> = HashSet::new();
        let mut stages: BTreeMap<CourseLevel, Vec<CourseRecommendation>> = BTreeMap::new();

        for gap in report.critical.iter().chain(report.moderate.iter()) {
            let query = self.gap_query(gap);

            for &level in &fill_order {
                let stage = stages.entry(level).or_default();
                if stage.len() >= stage_cap {
                    continue;
                }
                let allowance = if preferred.contains(&level) { per_gap } else { 1 };

                let options = CourseQuery {
                    top_k: self.index.len(),
                    level: Some(level),
                    min_quality: self.config.min_quality,
                };

                let mut taken = 0;
                for found in self.index.search(&query, &options) {
                    if taken >= allowance || stage.len() >= stage_cap {
                        break;
                    }
                    let Some(course) = self.index.course(found.index) else {
                        continue;
                    };
                    if !seen.insert(course.id.clone()) {
                        continue;
                    }

                    stage.push(CourseRecommendation {
                        course_id: course.id.clone(),
                        title: course.title.clone(),
                        platform: course.platform.clone(),
                        subject: course.subject.clone(),
                        level: course.level,
                        quality_score: course.quality_score,
                        is_free: course.is_free,
                        duration_hours: course.duration_hours,
                        url: course.url.clone(),
                        relevance_pct: (found.relevance * 100.0).clamp(0.0, 100.0),
                        skill_gap: gap.label,
                    });
                    taken += 1;
                }
            }
        }

        let stages: Vec<LearningStage> = stages
            .into_iter()
            .filter(|(_, courses)| !courses.is_empty())
            .map(|(level, courses)| {
                let hours = courses.iter().filter_map(|c| c.duration_hours).sum();
                LearningStage {
                    level,
                    title: stage_title(level),
                    courses,
                    hours,
                }
            })
            .collect();

        let total_hours = stages.iter().map(|s| s.hours).sum();

        debug!(
            "Learning path for {}: {} stages, {} courses",
            report.occupation_code,
            stages.len(),
            stages.iter().map(|s| s.courses.len()).sum::<usize>()
        );

        LearningPath { stages, total_hours }
    }
}

fn stage_title(level: CourseLevel) -> String {
    let focus = match level {
        CourseLevel::Foundation => "build the fundamentals",
        CourseLevel::Intermediate => "apply the skills",
        CourseLevel::Advanced => "specialise",
    };
    format!("{}: {}", level, focus)
}

/// Labels of every dimension with a course in the path
pub fn covered_gaps(path: &LearningPath) -> Vec<&'static str> {
    SKILL_DIMENSIONS
        .iter()
        .map(|d| d.label)
        .filter(|label| {
            path.stages
                .iter()
                .any(|s| s.courses.iter().any(|c| c.skill_gap == *label))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::gap::SkillsGapAnalyzer;
    use crate::catalogue::course::Course;
    use crate::catalogue::occupation::{CareerFamily, DemandLevel, Occupation};
    use crate::catalogue::skills::{skill_index, SKILL_DIM_COUNT};
    use crate::config::GapConfig;

    fn course(id: &str, title: &str, level: CourseLevel, hours: Option<f32>) -> Course {
        Course {
            id: id.to_string(),
            title: title.to_string(),
            platform: "edX".to_string(),
            subject: String::new(),
            skills_covered: String::new(),
            level,
            quality_score: Some(0.8),
            is_free: false,
            duration_hours: hours,
            url: None,
        }
    }

    fn report_with_gaps(dimensions: &[&str]) -> GapReport {
        let mut required = vec![0.0; SKILL_DIM_COUNT];
        for (rank, key) in dimensions.iter().enumerate() {
            required[skill_index(key).unwrap()] = 7.0 - rank as f32 * 0.5;
        }
        let occupation = Occupation {
            code: "15-2051.00".to_string(),
            title: "Data Scientists".to_string(),
            description: String::new(),
            family: CareerFamily::Technology,
            zone: 5,
            skill_levels: required,
            demand: DemandLevel::High,
            automation_risk: None,
            median_wage: None,
        };
        SkillsGapAnalyzer::new(GapConfig::default()).analyze(&vec![0.0; SKILL_DIM_COUNT], &occupation)
    }

    #[test]
    fn test_course_shared_by_two_gaps_appears_once() {
        let index = CourseIndex::build(vec![
            course("c1", "Python Programming and Statistics", CourseLevel::Foundation, Some(20.0)),
            course("c2", "Statistics with Excel", CourseLevel::Foundation, Some(10.0)),
        ]);
        let synonyms = SynonymTable::default_table().unwrap();
        let config = LearningConfig::default();
        let builder = LearningPathBuilder::new(&index, &synonyms, &config);

        let path = builder.build(&report_with_gaps(&["programming", "mathematics"]), 2, &CourseLevel::ORDERED);

        let ids: Vec<&str> = path
            .stages
            .iter()
            .flat_map(|s| s.courses.iter().map(|c| c.course_id.as_str()))
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"c1"));
        assert!(ids.contains(&"c2"));
        assert_eq!(path.course_count(), 2);
    }

    #[test]
    fn test_unknown_durations_add_nothing() {
        let index = CourseIndex::build(vec![
            course("c1", "Python Basics", CourseLevel::Foundation, Some(12.5)),
            course("c2", "Python Projects", CourseLevel::Intermediate, None),
            course("c3", "Advanced Python", CourseLevel::Advanced, Some(7.5)),
        ]);
        let synonyms = SynonymTable::default_table().unwrap();
        let config = LearningConfig::default();
        let path = LearningPathBuilder::new(&index, &synonyms, &config)
            .build(&report_with_gaps(&["programming"]), 2, &CourseLevel::ORDERED);

        assert_eq!(path.stages.len(), 3);
        assert_eq!(path.stages[0].level, CourseLevel::Foundation);
        assert_eq!(path.stages[1].hours, 0.0);
        assert!((path.total_hours - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_stages_are_omitted() {
        let index = CourseIndex::build(vec![course("c1", "Python Basics", CourseLevel::Foundation, Some(5.0))]);
        let synonyms = SynonymTable::default_table().unwrap();
        let config = LearningConfig::default();
        let path = LearningPathBuilder::new(&index, &synonyms, &config)
            .build(&report_with_gaps(&["programming"]), 2, &CourseLevel::ORDERED);

        assert_eq!(path.stages.len(), 1);
        assert_eq!(covered_gaps(&path), vec!["Programming"]);
    }

    #[test]
    fn test_stage_cap_is_respected() {
        let courses: Vec<Course> = (0..10)
            .map(|i| course(&format!("c{}", i), &format!("Python Course {}", i), CourseLevel::Foundation, Some(1.0)))
            .collect();
        let index = CourseIndex::build(courses);
        let synonyms = SynonymTable::default_table().unwrap();
        let config = LearningConfig {
            max_courses_per_stage: 3,
            ..LearningConfig::default()
        };
        let path = LearningPathBuilder::new(&index, &synonyms, &config)
            .build(&report_with_gaps(&["programming"]), 5, &CourseLevel::ORDERED);

        assert_eq!(path.stages[0].courses.len(), 3);
    }

    #[test]
    fn test_preferred_levels_get_the_full_allowance() {
        let index = CourseIndex::build(vec![
            course("f1", "Python Basics", CourseLevel::Foundation, Some(5.0)),
            course("f2", "Python for Beginners", CourseLevel::Foundation, Some(5.0)),
            course("f3", "Python First Steps", CourseLevel::Foundation, Some(5.0)),
            course("a1", "Advanced Python", CourseLevel::Advanced, Some(5.0)),
            course("a2", "Python Performance Engineering", CourseLevel::Advanced, Some(5.0)),
        ]);
        let synonyms = SynonymTable::default_table().unwrap();
        let config = LearningConfig::default();
        let builder = LearningPathBuilder::new(&index, &synonyms, &config);
        let report = report_with_gaps(&["programming"]);

        let beginner = builder.build(&report, 3, &[CourseLevel::Foundation]);
        assert_eq!(beginner.stages.len(), 2);
        assert_eq!(beginner.stages[0].level, CourseLevel::Foundation);
        assert_eq!(beginner.stages[0].courses.len(), 3);
        assert_eq!(beginner.stages[1].level, CourseLevel::Advanced);
        assert_eq!(beginner.stages[1].courses.len(), 1);

        let expert = builder.build(&report, 3, &[CourseLevel::Advanced]);
        assert_eq!(expert.stages[0].courses.len(), 1);
        assert_eq!(expert.stages[1].courses.len(), 2);
    }

    #[test]
    fn test_no_gaps_means_empty_path() {
        let index = CourseIndex::build(vec![course("c1", "Python Basics", CourseLevel::Foundation, Some(5.0))]);
        let synonyms = SynonymTable::default_table().unwrap();
        let config = LearningConfig::default();
        let path = LearningPathBuilder::new(&index, &synonyms, &config)
            .build(&report_with_gaps(&[]), 2, &CourseLevel::ORDERED);

        assert!(path.is_empty());
        assert_eq!(path.total_hours, 0.0);
    }
}
