//! Automation risk and future-proof scoring

use crate::catalogue::occupation::{DemandLevel, Occupation};
use crate::catalogue::skills::{clamp_level, AutomationAffinity, MAX_SKILL_LEVEL, SKILL_DIMENSIONS};
use crate::config::RiskConfig;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::Low,
        RiskCategory::Medium,
        RiskCategory::High,
        RiskCategory::VeryHigh,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
            RiskCategory::VeryHigh => "Very High",
        }
    }

    pub fn explanation(&self) -> &'static str {
        match self {
            RiskCategory::Low => {
                "Low automation risk: the work leans on judgment, creativity and social skills that AI handles poorly."
            }
            RiskCategory::Medium => {
                "Medium automation risk: parts of the work can be automated, but people still oversee it and handle the interpersonal side."
            }
            RiskCategory::High => {
                "High automation risk: many routine tasks are likely to be automated; shifting towards leadership and complex problem solving matters."
            }
            RiskCategory::VeryHigh => {
                "Very high automation risk: plan a move towards a lower-risk role or towards supervising automated systems."
            }
        }
    }

    pub fn mitigation_advice(&self) -> &'static [&'static str] {
        match self {
            RiskCategory::Low => &[
                "Keep deepening expertise in the core of the role.",
                "Use AI tools to take over the repetitive parts of the job.",
                "Follow how AI is being adopted in your sector.",
            ],
            RiskCategory::Medium => &[
                "List the tasks most likely to be automated and build skills beyond them.",
                "Grow leadership and creative problem-solving skills.",
                "Learn to work alongside AI tools rather than compete with them.",
            ],
            RiskCategory::High => &[
                "Prioritise management, creative or client-facing skills.",
                "Look at adjacent roles with lower automation risk.",
                "Pursue certifications in higher-complexity specialisations.",
            ],
            RiskCategory::VeryHigh => &[
                "Plan a transition into a lower-risk occupation.",
                "Build competence in auditing and overseeing automated systems.",
                "Work with a career counsellor on a reskilling roadmap.",
            ],
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskProfile {
    pub risk_score: f32,
    pub risk_category: RiskCategory,
    pub future_proof_score: f32,
    pub empirical_risk: Option<f32>,
    pub skill_derived_risk: f32,
    pub wage_percentile: Option<f32>,
    pub explanation: &'static str,
    pub mitigation_advice: &'static [&'static str],
}

pub struct RiskScorer {
    config: RiskConfig,
}

impl RiskScorer {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Weighted presence of routine dimensions minus weighted presence of
    /// human-centric ones, mapped from `[-1, 1]` onto `[0, 100]`.
    pub fn skill_derived_risk(&self, skill_levels: &[f32]) -> f32 {
        let presence = |affinity: AutomationAffinity| -> f32 {
            let mut weighted = 0.0;
            let mut total_weight = 0.0;
            for (idx, dimension) in SKILL_DIMENSIONS.iter().enumerate() {
                if dimension.automation != affinity {
                    continue;
                }
                let level = skill_levels.get(idx).copied().map(clamp_level).unwrap_or(0.0);
                weighted += dimension.automation_weight * level / MAX_SKILL_LEVEL;
                total_weight += dimension.automation_weight;
            }
            if total_weight > 0.0 {
                weighted / total_weight
            } else {
                0.0
            }
        };

        let raw = presence(AutomationAffinity::High) - presence(AutomationAffinity::Low);
        sanitize(((raw + 1.0) / 2.0) * 100.0)
    }

    /// Blend the empirical estimate with the skill-derived one; without an
    /// empirical value the skill-derived risk is used alone.
    pub fn blend(&self, empirical: Option<f32>, skill_derived: f32) -> f32 {
        match empirical.filter(|e| e.is_finite()) {
            Some(empirical) => {
                let total = self.config.empirical_weight + self.config.skill_weight;
                if total <= 0.0 {
                    return sanitize(skill_derived);
                }
                sanitize(
                    (self.config.empirical_weight * empirical.clamp(0.0, 100.0)
                        + self.config.skill_weight * skill_derived)
                        / total,
                )
            }
            None => sanitize(skill_derived),
        }
    }

    pub fn categorize(&self, score: f32) -> RiskCategory {
        let t = &self.config.thresholds;
        if score < t.medium {
            RiskCategory::Low
        } else if score < t.high {
            RiskCategory::Medium
        } else if score < t.very_high {
            RiskCategory::High
        } else {
            RiskCategory::VeryHigh
        }
    }

    pub fn demand_weight(&self, demand: DemandLevel) -> f32 {
        let weights = &self.config.demand_weights;
        match demand {
            DemandLevel::High => weights.high,
            DemandLevel::Medium => weights.medium,
            DemandLevel::Low => weights.low,
        }
    }

    /// Composite of demand, safety (100 - risk) and wage percentile. A missing
    /// wage renormalizes over the remaining two terms.
    pub fn future_proof(&self, demand: DemandLevel, risk_score: f32, wage_percentile: Option<f32>) -> f32 {
        let c = &self.config;
        let mut weighted = c.demand_term_weight * self.demand_weight(demand)
            + c.safety_term_weight * (100.0 - risk_score);
        let mut total = c.demand_term_weight + c.safety_term_weight;

        if let Some(wage) = wage_percentile.filter(|w| w.is_finite()) {
            weighted += c.wage_term_weight * wage;
            total += c.wage_term_weight;
        }

        if total <= 0.0 {
            return 0.0;
        }
        sanitize(weighted / total)
    }

    pub fn score(&self, occupation: &Occupation, wage_percentile: Option<f32>) -> RiskProfile {
        let skill_derived_risk = self.skill_derived_risk(&occupation.skill_levels);
        let risk_score = self.blend(occupation.automation_risk, skill_derived_risk);
        let risk_category = self.categorize(risk_score);

        RiskProfile {
            risk_score,
            risk_category,
            future_proof_score: self.future_proof(occupation.demand, risk_score, wage_percentile),
            empirical_risk: occupation.automation_risk,
            skill_derived_risk,
            wage_percentile,
            explanation: risk_category.explanation(),
            mitigation_advice: risk_category.mitigation_advice(),
        }
    }

    /// Profiles for a whole catalogue, aligned with its order
    pub fn score_catalogue(&self, occupations: &[Occupation]) -> Vec<RiskProfile> {
        let percentiles = wage_percentiles(occupations);
        occupations
            .iter()
            .zip(percentiles)
            .map(|(occupation, percentile)| self.score(occupation, percentile))
            .collect()
    }
}

/// Share of wage-bearing occupations earning at most this occupation's wage
pub fn wage_percentiles(occupations: &[Occupation]) -> Vec<Option<f32>> {
    let mut wages: Vec<f32> = occupations
        .iter()
        .filter_map(|o| o.median_wage)
        .filter(|w| w.is_finite())
        .collect();
    wages.sort_by(|a, b| a.total_cmp(b));

    occupations
        .iter()
        .map(|o| {
            let wage = o.median_wage.filter(|w| w.is_finite())?;
            if wages.is_empty() {
                return None;
            }
            let at_or_below = wages.partition_point(|w| *w <= wage);
            Some(at_or_below as f32 / wages.len() as f32 * 100.0)
        })
        .collect()
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::occupation::CareerFamily;
    use crate::catalogue::skills::SKILL_DIM_COUNT;

    fn scorer() -> RiskScorer {
        RiskScorer::new(RiskConfig::default())
    }

    fn occupation(levels: Vec<f32>, risk: Option<f32>, wage: Option<f32>) -> Occupation {
        Occupation {
            code: "43-9021.00".to_string(),
            title: "Data Entry Keyers".to_string(),
            description: String::new(),
            family: CareerFamily::Administration,
            zone: 2,
            skill_levels: levels,
            demand: DemandLevel::Low,
            automation_risk: risk,
            median_wage: wage,
        }
    }

    #[test]
    fn test_even_blend() {
        assert_eq!(scorer().blend(Some(80.0), 20.0), 50.0);
        assert_eq!(scorer().blend(None, 20.0), 20.0);
    }

    #[test]
    fn test_categories_are_monotonic() {
        let scorer = scorer();
        let mut previous = RiskCategory::Low;
        for step in 0..=1000 {
            let category = scorer.categorize(step as f32 / 10.0);
            assert!(category >= previous);
            previous = category;
        }
        assert_eq!(scorer.categorize(34.99), RiskCategory::Low);
        assert_eq!(scorer.categorize(35.0), RiskCategory::Medium);
        assert_eq!(scorer.categorize(55.0), RiskCategory::High);
        assert_eq!(scorer.categorize(72.0), RiskCategory::VeryHigh);
        assert_eq!(scorer.categorize(100.0), RiskCategory::VeryHigh);
    }

    #[test]
    fn test_skill_derived_risk_range() {
        let scorer = scorer();
        let mut routine = vec![0.0; SKILL_DIM_COUNT];
        let mut human = vec![0.0; SKILL_DIM_COUNT];
        for (idx, dimension) in SKILL_DIMENSIONS.iter().enumerate() {
            match dimension.automation {
                AutomationAffinity::High => routine[idx] = MAX_SKILL_LEVEL,
                AutomationAffinity::Low => human[idx] = MAX_SKILL_LEVEL,
                AutomationAffinity::Neutral => {}
            }
        }

        assert!((scorer.skill_derived_risk(&routine) - 100.0).abs() < 1e-3);
        assert!(scorer.skill_derived_risk(&human).abs() < 1e-3);
        assert!((scorer.skill_derived_risk(&vec![0.0; SKILL_DIM_COUNT]) - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_future_proof_formula() {
        let scorer = scorer();
        // 0.4 * 100 + 0.4 * (100 - 20) + 0.2 * 50
        let score = scorer.future_proof(DemandLevel::High, 20.0, Some(50.0));
        assert!((score - 82.0).abs() < 1e-4);

        // (0.4 * 30 + 0.4 * 60) / 0.8
        let score = scorer.future_proof(DemandLevel::Low, 40.0, None);
        assert!((score - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_wage_percentiles() {
        let occupations = vec![
            occupation(vec![0.0; SKILL_DIM_COUNT], None, Some(30_000.0)),
            occupation(vec![0.0; SKILL_DIM_COUNT], None, None),
            occupation(vec![0.0; SKILL_DIM_COUNT], None, Some(90_000.0)),
            occupation(vec![0.0; SKILL_DIM_COUNT], None, Some(60_000.0)),
            occupation(vec![0.0; SKILL_DIM_COUNT], None, Some(60_000.0)),
        ];
        let percentiles = wage_percentiles(&occupations);
        assert_eq!(percentiles[0], Some(25.0));
        assert_eq!(percentiles[1], None);
        assert_eq!(percentiles[2], Some(100.0));
        assert_eq!(percentiles[3], Some(75.0));
    }

    #[test]
    fn test_profile_is_bounded_and_explained() {
        let scorer = scorer();
        let profile = scorer.score(&occupation(vec![7.0; SKILL_DIM_COUNT], Some(250.0), Some(40_000.0)), Some(10.0));

        assert!((0.0..=100.0).contains(&profile.risk_score));
        assert!((0.0..=100.0).contains(&profile.future_proof_score));
        assert_eq!(profile.explanation, profile.risk_category.explanation());
        assert_eq!(profile.mitigation_advice.len(), 3);
    }
}
