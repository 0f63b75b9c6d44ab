//! Standardized skill dimensions shared by occupations and user profiles

use serde::{Deserialize, Serialize};

/// Upper bound of the skill level scale (O*NET level 0-7).
pub const MAX_SKILL_LEVEL: f32 = 7.0;

/// Number of skill dimensions in every skill vector.
pub const SKILL_DIM_COUNT: usize = 20;

/// How strongly a skill dimension signals routine, automatable work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutomationAffinity {
    /// Routine, rule-based work that automation handles well
    High,
    /// Human-centric work that resists automation
    Low,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkillDimension {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub automation: AutomationAffinity,
    pub automation_weight: f32,
}

const fn dim(
    key: &'static str,
    label: &'static str,
    description: &'static str,
    automation: AutomationAffinity,
    automation_weight: f32,
) -> SkillDimension {
    SkillDimension {
        key,
        label,
        description,
        automation,
        automation_weight,
    }
}

use AutomationAffinity::{High, Low, Neutral};

/// Fixed vector order for every skill vector in the system.
pub static SKILL_DIMENSIONS: [SkillDimension; SKILL_DIM_COUNT] = [
    dim("reading_comprehension", "Reading Comprehension", "understanding written sentences and documents", Neutral, 0.0),
    dim("writing", "Writing", "communicating effectively in writing reports documentation", High, 0.5),
    dim("speaking", "Speaking", "talking to others to convey information presentation", Neutral, 0.0),
    dim("mathematics", "Mathematics", "using mathematics statistics and calculation to solve problems", High, 0.8),
    dim("science", "Science", "using scientific rules and methods biology chemistry physics", Neutral, 0.0),
    dim("critical_thinking", "Critical Thinking", "using logic and reasoning to identify strengths and weaknesses", Low, 0.7),
    dim("active_learning", "Active Learning", "understanding the implications of new information research", Neutral, 0.0),
    dim("social_perceptiveness", "Social Perceptiveness", "being aware of others reactions empathy care", Low, 1.0),
    dim("coordination", "Coordination", "adjusting actions in relation to others teamwork leadership", Low, 0.6),
    dim("persuasion", "Persuasion", "persuading others to change their minds sales marketing", Low, 0.8),
    dim("negotiation", "Negotiation", "bringing others together and reconciling differences", Low, 0.8),
    dim("instructing", "Instructing", "teaching others how to do something training mentoring", Low, 0.8),
    dim("service_orientation", "Service Orientation", "actively looking for ways to help people customer service", Low, 0.7),
    dim("complex_problem_solving", "Complex Problem Solving", "identifying complex problems and implementing solutions", Low, 1.0),
    dim("programming", "Programming", "writing computer programs software development coding", High, 0.6),
    dim("systems_analysis", "Systems Analysis", "determining how a system should work data systems", Neutral, 0.0),
    dim("operations_monitoring", "Operations Monitoring", "watching gauges dials or indicators to make sure a machine is working", High, 1.0),
    dim("quality_control_analysis", "Quality Control Analysis", "conducting tests and inspections of products services or processes", High, 1.0),
    dim("equipment_maintenance", "Equipment Maintenance", "performing routine maintenance on equipment repair", High, 0.8),
    dim("judgment_and_decision_making", "Judgment and Decision Making", "considering costs and benefits to choose the most appropriate action", Low, 1.0),
];

/// Position of a dimension key in the skill vector.
pub fn skill_index(key: &str) -> Option<usize> {
    SKILL_DIMENSIONS.iter().position(|d| d.key == key)
}

/// Resolve a key or a display label (case-insensitive, `_`/space agnostic).
pub fn resolve_dimension(name: &str) -> Option<usize> {
    let normalized = name.trim().to_lowercase().replace(['_', '-'], " ");
    SKILL_DIMENSIONS.iter().position(|d| {
        d.key.replace('_', " ") == normalized || d.label.to_lowercase() == normalized
    })
}

pub fn zero_skill_vector() -> Vec<f32> {
    vec![0.0; SKILL_DIM_COUNT]
}

/// Clamp a level onto the bounded scale; non-finite values become 0.
pub fn clamp_level(level: f32) -> f32 {
    if level.is_finite() {
        level.clamp(0.0, MAX_SKILL_LEVEL)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_unique() {
        for (i, a) in SKILL_DIMENSIONS.iter().enumerate() {
            for b in SKILL_DIMENSIONS.iter().skip(i + 1) {
                assert_ne!(a.key, b.key);
            }
        }
    }

    #[test]
    fn test_resolve_by_key_and_label() {
        assert_eq!(resolve_dimension("critical_thinking"), Some(5));
        assert_eq!(resolve_dimension("Critical Thinking"), Some(5));
        assert_eq!(resolve_dimension("judgment-and-decision-making"), Some(19));
        assert_eq!(resolve_dimension("juggling"), None);
    }

    #[test]
    fn test_clamp_level() {
        assert_eq!(clamp_level(9.0), MAX_SKILL_LEVEL);
        assert_eq!(clamp_level(-1.0), 0.0);
        assert_eq!(clamp_level(f32::NAN), 0.0);
    }
}
