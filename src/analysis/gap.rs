//! Skills gap analysis between a user and an occupation

use crate::catalogue::occupation::Occupation;
use crate::catalogue::skills::{clamp_level, SKILL_DIMENSIONS, SKILL_DIM_COUNT};
use crate::config::GapConfig;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GapClass {
    Critical,
    Moderate,
    Strength,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGap {
    pub dimension: &'static str,
    pub label: &'static str,
    pub required: f32,
    pub current: f32,
    pub gap: f32,
    pub importance: f32,
    pub weighted_gap: f32,
    pub class: GapClass,
}

impl SkillGap {
    pub fn dimension_index(&self) -> Option<usize> {
        SKILL_DIMENSIONS.iter().position(|d| d.key == self.dimension)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapReport {
    pub occupation_code: String,
    pub occupation_title: String,
    pub alignment_pct: f32,
    pub critical: Vec<SkillGap>,
    pub moderate: Vec<SkillGap>,
    pub strengths: Vec<SkillGap>,
}

impl GapReport {
    pub fn dimension_count(&self) -> usize {
        self.critical.len() + self.moderate.len() + self.strengths.len()
    }

    pub fn all_gaps(&self) -> impl Iterator<Item = &SkillGap> {
        self.critical
            .iter()
            .chain(self.moderate.iter())
            .chain(self.strengths.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferableSkill {
    pub dimension: &'static str,
    pub label: &'static str,
}

pub struct SkillsGapAnalyzer {
    config: GapConfig,
}

impl SkillsGapAnalyzer {
    pub fn new(config: GapConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, gap: f32) -> GapClass {
        if gap >= self.config.critical_threshold {
            GapClass::Critical
        } else if gap >= self.config.moderate_threshold {
            GapClass::Moderate
        } else {
            GapClass::Strength
        }
    }

    /// Compare user levels to the occupation's required levels on every
    /// dimension. Each dimension lands in exactly one partition.
    pub fn analyze(&self, user_levels: &[f32], occupation: &Occupation) -> GapReport {
        let required_total: f32 = occupation
            .skill_levels
            .iter()
            .take(SKILL_DIM_COUNT)
            .map(|l| clamp_level(*l))
            .sum();

        let mut critical = Vec::new();
        let mut moderate = Vec::new();
        let mut strengths = Vec::new();

        for (idx, dimension) in SKILL_DIMENSIONS.iter().enumerate() {
            let required = occupation.skill_levels.get(idx).copied().map(clamp_level).unwrap_or(0.0);
            let current = user_levels.get(idx).copied().map(clamp_level).unwrap_or(0.0);
            let gap = required - current;
            let importance = if required_total > 0.0 {
                required / required_total
            } else {
                0.0
            };
            let class = self.classify(gap);

            let entry = SkillGap {
                dimension: dimension.key,
                label: dimension.label,
                required,
                current,
                gap,
                importance,
                weighted_gap: gap * importance,
                class,
            };

            match class {
                GapClass::Critical => critical.push(entry),
                GapClass::Moderate => moderate.push(entry),
                GapClass::Strength => strengths.push(entry),
            }
        }

        let by_weighted_gap = |a: &SkillGap, b: &SkillGap| -> Ordering {
            b.weighted_gap.total_cmp(&a.weighted_gap)
        };
        critical.sort_by(by_weighted_gap);
        moderate.sort_by(by_weighted_gap);
        strengths.sort_by(|a, b| b.current.total_cmp(&a.current));

        GapReport {
            occupation_code: occupation.code.clone(),
            occupation_title: occupation.title.clone(),
            alignment_pct: skill_coverage(user_levels, &occupation.skill_levels) * 100.0,
            critical,
            moderate,
            strengths,
        }
    }
}

/// Mean over dimensions of how much of the required level the user covers,
/// in `[0, 1]`. Dimensions that require nothing count as covered.
pub fn skill_coverage(user_levels: &[f32], required_levels: &[f32]) -> f32 {
    let total: f32 = (0..SKILL_DIM_COUNT)
        .map(|idx| {
            let required = required_levels.get(idx).copied().map(clamp_level).unwrap_or(0.0);
            let current = user_levels.get(idx).copied().map(clamp_level).unwrap_or(0.0);
            if required <= 0.0 {
                1.0
            } else {
                current.min(required) / required
            }
        })
        .sum();

    (total / SKILL_DIM_COUNT as f32).clamp(0.0, 1.0)
}

/// Dimensions the user is strong in (non-zero level) for a strict majority
/// of the given reports, in registry order.
pub fn transferable_skills(reports: &[GapReport]) -> Vec<TransferableSkill> {
    if reports.is_empty() {
        return Vec::new();
    }

    SKILL_DIMENSIONS
        .iter()
        .filter(|dimension| {
            let strong_in = reports
                .iter()
                .filter(|report| {
                    report
                        .strengths
                        .iter()
                        .any(|s| s.dimension == dimension.key && s.current > 0.0)
                })
                .count();
            strong_in * 2 > reports.len()
        })
        .map(|dimension| TransferableSkill {
            dimension: dimension.key,
            label: dimension.label,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::occupation::{CareerFamily, DemandLevel};
    use crate::catalogue::skills::skill_index;

    fn occupation(levels: Vec<f32>) -> Occupation {
        Occupation {
            code: "15-1252.00".to_string(),
            title: "Software Developers".to_string(),
            description: String::new(),
            family: CareerFamily::Technology,
            zone: 4,
            skill_levels: levels,
            demand: DemandLevel::High,
            automation_risk: None,
            median_wage: None,
        }
    }

    #[test]
    fn test_every_dimension_lands_in_one_partition() {
        let analyzer = SkillsGapAnalyzer::new(GapConfig::default());
        let required: Vec<f32> = (0..SKILL_DIM_COUNT).map(|i| (i % 8) as f32).collect();
        let user: Vec<f32> = (0..SKILL_DIM_COUNT).map(|i| ((i * 3) % 7) as f32).collect();

        let report = analyzer.analyze(&user, &occupation(required));
        assert_eq!(report.dimension_count(), SKILL_DIM_COUNT);

        let mut keys: Vec<&str> = report.all_gaps().map(|g| g.dimension).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), SKILL_DIM_COUNT);
    }

    #[test]
    fn test_zero_gap_is_a_strength() {
        let analyzer = SkillsGapAnalyzer::new(GapConfig::default());
        let levels = vec![3.0; SKILL_DIM_COUNT];
        let report = analyzer.analyze(&levels, &occupation(levels.clone()));

        assert!(report.critical.is_empty());
        assert!(report.moderate.is_empty());
        assert_eq!(report.strengths.len(), SKILL_DIM_COUNT);
        assert!((report.alignment_pct - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_threshold_boundaries() {
        let analyzer = SkillsGapAnalyzer::new(GapConfig::default());
        assert_eq!(analyzer.classify(2.0), GapClass::Critical);
        assert_eq!(analyzer.classify(1.99), GapClass::Moderate);
        assert_eq!(analyzer.classify(0.5), GapClass::Moderate);
        assert_eq!(analyzer.classify(0.49), GapClass::Strength);
        assert_eq!(analyzer.classify(-3.0), GapClass::Strength);
    }

    #[test]
    fn test_critical_gaps_ordered_by_weighted_gap() {
        let analyzer = SkillsGapAnalyzer::new(GapConfig::default());
        let programming = skill_index("programming").unwrap();
        let maths = skill_index("mathematics").unwrap();

        let mut required = vec![0.0; SKILL_DIM_COUNT];
        required[programming] = 6.0;
        required[maths] = 4.0;
        let report = analyzer.analyze(&vec![0.0; SKILL_DIM_COUNT], &occupation(required));

        assert_eq!(report.critical.len(), 2);
        assert_eq!(report.critical[0].dimension, "programming");
        assert!((report.critical[0].importance - 0.6).abs() < 1e-6);
        assert!((report.critical[0].weighted_gap - 3.6).abs() < 1e-5);
        // 18 dimensions require nothing, 2 are uncovered
        assert!((report.alignment_pct - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_user_levels_are_clipped() {
        let analyzer = SkillsGapAnalyzer::new(GapConfig::default());
        let report = analyzer.analyze(&vec![12.0; SKILL_DIM_COUNT], &occupation(vec![7.0; SKILL_DIM_COUNT]));
        assert!(report.strengths.iter().all(|g| g.current == 7.0 && g.gap == 0.0));
    }

    #[test]
    fn test_transferable_skills_need_a_strict_majority() {
        let analyzer = SkillsGapAnalyzer::new(GapConfig::default());
        let programming = skill_index("programming").unwrap();

        let mut user = vec![0.0; SKILL_DIM_COUNT];
        user[programming] = 5.0;

        let mut needs_programming = vec![0.0; SKILL_DIM_COUNT];
        needs_programming[programming] = 7.0;

        let reports = vec![
            analyzer.analyze(&user, &occupation(vec![0.0; SKILL_DIM_COUNT])),
            analyzer.analyze(&user, &occupation(vec![0.0; SKILL_DIM_COUNT])),
            analyzer.analyze(&user, &occupation(needs_programming.clone())),
        ];
        let transferable = transferable_skills(&reports);
        assert_eq!(transferable.len(), 1);
        assert_eq!(transferable[0].dimension, "programming");

        let split = vec![reports[0].clone(), reports[2].clone()];
        assert!(transferable_skills(&split).is_empty());
        assert!(transferable_skills(&[]).is_empty());
    }
}
