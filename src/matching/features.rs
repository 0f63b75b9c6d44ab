//! Per-candidate features fed to the ranker

use crate::analysis::gap::skill_coverage;
use crate::analysis::risk::RiskProfile;
use crate::catalogue::occupation::{DemandLevel, Occupation};
use crate::config::DemandWeights;
use crate::processing::profile::UserQuery;
use crate::processing::text_processor::TextProcessor;
use serde::Serialize;
use std::collections::HashSet;

/// Feature order expected by ranker models
pub const FEATURE_NAMES: [&str; 6] = [
    "cosine_similarity",
    "skill_alignment",
    "zone_distance",
    "demand_weight",
    "risk_weight",
    "keyword_overlap",
];

/// Every value lies in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateFeatures {
    pub cosine_similarity: f32,
    pub skill_alignment: f32,
    pub zone_distance: f32,
    pub demand_weight: f32,
    pub risk_weight: f32,
    pub keyword_overlap: f32,
}

impl CandidateFeatures {
    pub fn to_array(&self) -> [f32; 6] {
        [
            self.cosine_similarity,
            self.skill_alignment,
            self.zone_distance,
            self.demand_weight,
            self.risk_weight,
            self.keyword_overlap,
        ]
    }
}

pub struct FeatureExtractor<'a> {
    processor: &'a TextProcessor,
    demand_weights: DemandWeights,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(processor: &'a TextProcessor, demand_weights: DemandWeights) -> Self {
        Self {
            processor,
            demand_weights,
        }
    }

    pub fn extract(
        &self,
        query: &UserQuery,
        occupation: &Occupation,
        risk: &RiskProfile,
        similarity: f32,
    ) -> CandidateFeatures {
        let zone_gap = (i16::from(occupation.zone) - i16::from(query.education_zone)).unsigned_abs();
        let demand = match occupation.demand {
            DemandLevel::High => self.demand_weights.high,
            DemandLevel::Medium => self.demand_weights.medium,
            DemandLevel::Low => self.demand_weights.low,
        };

        CandidateFeatures {
            cosine_similarity: unit(similarity),
            skill_alignment: unit(skill_coverage(&query.skill_vector, &occupation.skill_levels)),
            zone_distance: unit(f32::from(zone_gap) / 4.0),
            demand_weight: unit(demand / 100.0),
            risk_weight: unit((100.0 - risk.risk_score) / 100.0),
            keyword_overlap: self.keyword_overlap(query, occupation),
        }
    }

    /// Share of the user's goal and unresolved keywords found in the
    /// occupation's title, description or family keywords
    pub fn keyword_overlap(&self, query: &UserQuery, occupation: &Occupation) -> f32 {
        let user_tokens: HashSet<&str> = query
            .goal_tokens
            .iter()
            .chain(query.keyword_tokens.iter())
            .map(String::as_str)
            .collect();
        if user_tokens.is_empty() {
            return 0.0;
        }

        let mut occupation_tokens = self
            .processor
            .token_set(&format!("{} {}", occupation.title, occupation.description));
        occupation_tokens.extend(occupation.family.goal_keywords().iter().map(|k| k.to_string()));

        let hits = user_tokens
            .iter()
            .filter(|token| occupation_tokens.contains(**token))
            .count();
        unit(hits as f32 / user_tokens.len() as f32)
    }
}

fn unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::risk::RiskScorer;
    use crate::catalogue::fallback::demo_occupations;
    use crate::catalogue::skills::SKILL_DIM_COUNT;
    use crate::config::RiskConfig;
    use crate::processing::profile::UserType;

    fn query(goal_tokens: &[&str], zone: u8) -> UserQuery {
        UserQuery {
            user_type: UserType::Graduate,
            semantic_vector: Vec::new(),
            skill_vector: vec![0.0; SKILL_DIM_COUNT],
            education_zone: zone,
            resolved_skills: Vec::new(),
            keyword_tokens: Vec::new(),
            goal_tokens: goal_tokens.iter().map(|t| t.to_string()).collect(),
            goal_text: goal_tokens.join(" "),
        }
    }

    fn occupation(title: &str) -> Occupation {
        demo_occupations()
            .into_iter()
            .find(|o| o.title == title)
            .unwrap()
    }

    #[test]
    fn test_features_are_bounded() {
        let processor = TextProcessor::new();
        let config = RiskConfig::default();
        let extractor = FeatureExtractor::new(&processor, config.demand_weights);
        let scorer = RiskScorer::new(config);

        for occupation in demo_occupations() {
            let risk = scorer.score(&occupation, None);
            let features = extractor.extract(&query(&["healthcare"], 1), &occupation, &risk, -0.4);
            assert!(features.to_array().iter().all(|v| (0.0..=1.0).contains(v)));
            assert_eq!(features.cosine_similarity, 0.0);
        }
    }

    #[test]
    fn test_goal_keywords_hit_family_keywords() {
        let processor = TextProcessor::new();
        let extractor = FeatureExtractor::new(&processor, RiskConfig::default().demand_weights);
        let q = query(&["healthcare", "technology"], 4);

        let health_it = extractor.keyword_overlap(&q, &occupation("Health Information Technologists"));
        let retail = extractor.keyword_overlap(&q, &occupation("Retail Salespersons"));
        assert_eq!(health_it, 1.0);
        assert_eq!(retail, 0.0);
    }

    #[test]
    fn test_zone_distance_and_demand() {
        let processor = TextProcessor::new();
        let config = RiskConfig::default();
        let extractor = FeatureExtractor::new(&processor, config.demand_weights);
        let nurses = occupation("Registered Nurses");
        let risk = RiskScorer::new(config).score(&nurses, None);

        let features = extractor.extract(&query(&[], 5), &nurses, &risk, 0.5);
        assert!((features.zone_distance - 0.5).abs() < 1e-6);
        assert_eq!(features.demand_weight, 1.0);
        assert_eq!(features.keyword_overlap, 0.0);
    }
}
