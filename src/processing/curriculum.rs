//! Education-track skill boosts
//!
//! Kenyan CBC pathways and tracks, KCSE (8-4-4) subjects, and field keywords
//! found in programme, industry and major names each add fixed increments to
//! selected skill dimensions.

use crate::catalogue::skills::resolve_dimension;
use crate::error::Result;
use crate::processing::text_processor::TextProcessor;
use log::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillBoost {
    pub dimension: usize,
    pub increment: f32,
}

type BoostTable = BTreeMap<String, Vec<SkillBoost>>;

#[derive(Debug, Clone)]
pub struct CurriculumTable {
    cbc_pathways: BoostTable,
    cbc_tracks: BoostTable,
    subjects: BoostTable,
    fields: Vec<(String, Vec<SkillBoost>)>,
}

/// Shape of the optional override file; every section is optional and maps
/// a name to `{"dimension_key": increment}`.
#[derive(Debug, Default, Deserialize)]
struct CurriculumOverrides {
    #[serde(default)]
    cbc_pathways: BTreeMap<String, BTreeMap<String, f32>>,
    #[serde(default)]
    cbc_tracks: BTreeMap<String, BTreeMap<String, f32>>,
    #[serde(default)]
    subjects: BTreeMap<String, BTreeMap<String, f32>>,
    #[serde(default)]
    fields: BTreeMap<String, BTreeMap<String, f32>>,
}

const CBC_PATHWAYS: &[(&str, &[(&str, f32)])] = &[
    (
        "stem",
        &[
            ("mathematics", 2.0),
            ("science", 2.0),
            ("critical_thinking", 1.0),
            ("complex_problem_solving", 1.0),
            ("programming", 0.5),
        ],
    ),
    (
        "social sciences",
        &[
            ("reading_comprehension", 1.5),
            ("writing", 1.5),
            ("speaking", 1.0),
            ("social_perceptiveness", 1.0),
            ("persuasion", 0.5),
        ],
    ),
    (
        "arts and sports science",
        &[
            ("speaking", 1.0),
            ("coordination", 1.5),
            ("social_perceptiveness", 0.5),
            ("instructing", 0.5),
            ("active_learning", 0.5),
        ],
    ),
];

const CBC_PATHWAY_ALIASES: &[(&str, &str)] = &[
    ("science technology engineering and mathematics", "stem"),
    ("social science", "social sciences"),
    ("arts and sports", "arts and sports science"),
    ("arts and sport science", "arts and sports science"),
];

const CBC_TRACKS: &[(&str, &[(&str, f32)])] = &[
    ("pure sciences", &[("science", 1.0), ("mathematics", 1.0)]),
    ("applied sciences", &[("science", 0.5), ("programming", 1.0), ("systems_analysis", 0.5)]),
    ("technical studies", &[("equipment_maintenance", 1.0), ("operations_monitoring", 0.5), ("quality_control_analysis", 0.5)]),
    ("languages and literature", &[("reading_comprehension", 1.0), ("writing", 1.0)]),
    ("humanities and business studies", &[("persuasion", 0.5), ("negotiation", 0.5), ("judgment_and_decision_making", 0.5)]),
    ("arts", &[("writing", 0.5), ("speaking", 0.5), ("active_learning", 0.5)]),
    ("sports", &[("coordination", 1.0), ("instructing", 0.5)]),
];

const KCSE_SUBJECTS: &[(&str, &[(&str, f32)])] = &[
    ("mathematics", &[("mathematics", 1.5)]),
    ("english", &[("reading_comprehension", 1.0), ("writing", 1.0)]),
    ("kiswahili", &[("speaking", 1.0), ("writing", 0.5)]),
    ("biology", &[("science", 1.0)]),
    ("chemistry", &[("science", 1.0), ("quality_control_analysis", 0.5)]),
    ("physics", &[("science", 1.0), ("mathematics", 0.5)]),
    ("history", &[("reading_comprehension", 0.5), ("writing", 0.5)]),
    ("geography", &[("science", 0.5), ("systems_analysis", 0.5)]),
    ("cre", &[("social_perceptiveness", 0.5)]),
    ("ire", &[("social_perceptiveness", 0.5)]),
    ("business studies", &[("persuasion", 0.5), ("mathematics", 0.5), ("judgment_and_decision_making", 0.5)]),
    ("computer studies", &[("programming", 1.5), ("systems_analysis", 0.5)]),
    ("agriculture", &[("science", 0.5), ("operations_monitoring", 0.5)]),
    ("home science", &[("service_orientation", 0.5), ("coordination", 0.5)]),
    ("art and design", &[("active_learning", 0.5), ("complex_problem_solving", 0.5)]),
    ("music", &[("speaking", 0.5), ("coordination", 0.5)]),
    ("french", &[("speaking", 0.5), ("writing", 0.5)]),
    ("german", &[("speaking", 0.5), ("writing", 0.5)]),
];

const FIELD_KEYWORDS: &[(&str, &[(&str, f32)])] = &[
    ("computer", &[("programming", 1.5), ("systems_analysis", 1.0)]),
    ("software", &[("programming", 1.5), ("systems_analysis", 1.0)]),
    ("information technology", &[("programming", 1.0), ("systems_analysis", 1.5)]),
    ("data science", &[("mathematics", 1.5), ("programming", 1.0)]),
    ("statistics", &[("mathematics", 1.5)]),
    ("mathematics", &[("mathematics", 1.5), ("critical_thinking", 0.5)]),
    ("engineering", &[("mathematics", 1.0), ("complex_problem_solving", 1.0), ("science", 0.5)]),
    ("nursing", &[("science", 1.0), ("social_perceptiveness", 1.0), ("service_orientation", 0.5)]),
    ("medicine", &[("science", 1.5), ("judgment_and_decision_making", 1.0)]),
    ("health", &[("science", 0.5), ("social_perceptiveness", 0.5), ("service_orientation", 0.5)]),
    ("clinical", &[("science", 1.0), ("quality_control_analysis", 0.5)]),
    ("pharmacy", &[("science", 1.5), ("quality_control_analysis", 1.0)]),
    ("business", &[("persuasion", 0.5), ("judgment_and_decision_making", 0.5), ("coordination", 0.5)]),
    ("commerce", &[("mathematics", 0.5), ("persuasion", 0.5)]),
    ("finance", &[("mathematics", 1.0), ("judgment_and_decision_making", 0.5)]),
    ("accounting", &[("mathematics", 1.0), ("quality_control_analysis", 0.5)]),
    ("economics", &[("mathematics", 1.0), ("critical_thinking", 0.5)]),
    ("education", &[("instructing", 1.5), ("speaking", 0.5)]),
    ("teaching", &[("instructing", 1.5), ("speaking", 0.5)]),
    ("law", &[("reading_comprehension", 1.0), ("writing", 1.0), ("negotiation", 0.5)]),
    ("journalism", &[("writing", 1.5), ("speaking", 0.5)]),
    ("communication", &[("writing", 1.0), ("speaking", 1.0)]),
    ("design", &[("complex_problem_solving", 0.5), ("active_learning", 0.5)]),
    ("agriculture", &[("science", 1.0), ("equipment_maintenance", 0.5)]),
    ("hospitality", &[("service_orientation", 1.5), ("coordination", 0.5)]),
    ("tourism", &[("service_orientation", 1.0), ("speaking", 0.5)]),
    ("sales", &[("persuasion", 1.5), ("service_orientation", 0.5)]),
    ("marketing", &[("persuasion", 1.5), ("writing", 0.5)]),
    ("social work", &[("social_perceptiveness", 1.5), ("service_orientation", 1.0)]),
    ("psychology", &[("social_perceptiveness", 1.5), ("science", 0.5)]),
    ("mechanical", &[("equipment_maintenance", 1.0), ("operations_monitoring", 0.5)]),
    ("electrical", &[("equipment_maintenance", 1.0), ("science", 0.5)]),
    ("manufacturing", &[("operations_monitoring", 1.0), ("quality_control_analysis", 1.0)]),
    ("logistics", &[("coordination", 1.0), ("operations_monitoring", 0.5)]),
];

impl Default for CurriculumTable {
    fn default() -> Self {
        Self {
            cbc_pathways: build_table(CBC_PATHWAYS),
            cbc_tracks: build_table(CBC_TRACKS),
            subjects: build_table(KCSE_SUBJECTS),
            fields: FIELD_KEYWORDS
                .iter()
                .map(|(keyword, boosts)| (keyword.to_string(), to_boosts(keyword, boosts.iter().copied())))
                .collect(),
        }
    }
}

impl CurriculumTable {
    /// Defaults merged with a JSON override file; entries in the file replace
    /// same-named defaults.
    pub fn with_overrides(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let overrides: CurriculumOverrides = serde_json::from_str(&content)?;
        let mut table = Self::default();

        for (name, boosts) in overrides.cbc_pathways {
            table
                .cbc_pathways
                .insert(normalize_name(&name), to_boosts(&name, boosts.into_iter()));
        }
        for (name, boosts) in overrides.cbc_tracks {
            table
                .cbc_tracks
                .insert(normalize_name(&name), to_boosts(&name, boosts.into_iter()));
        }
        for (name, boosts) in overrides.subjects {
            table
                .subjects
                .insert(normalize_name(&name), to_boosts(&name, boosts.into_iter()));
        }
        for (keyword, boosts) in overrides.fields {
            let keyword = normalize_name(&keyword);
            let boosts = to_boosts(&keyword, boosts.into_iter());
            match table.fields.iter_mut().find(|(k, _)| *k == keyword) {
                Some(entry) => entry.1 = boosts,
                None => table.fields.push((keyword, boosts)),
            }
        }

        debug!("Curriculum boosts extended from {}", path.display());
        Ok(table)
    }

    /// Boosts for a CBC pathway; `None` when the name is not a known pathway.
    pub fn pathway_boosts(&self, pathway: &str) -> Option<&[SkillBoost]> {
        let name = normalize_name(pathway);
        let canonical = CBC_PATHWAY_ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or(name);
        self.cbc_pathways.get(&canonical).map(Vec::as_slice)
    }

    pub fn track_boosts(&self, track: &str) -> Option<&[SkillBoost]> {
        self.cbc_tracks.get(&normalize_name(track)).map(Vec::as_slice)
    }

    pub fn subject_boosts(&self, subject: &str) -> Option<&[SkillBoost]> {
        self.subjects.get(&normalize_name(subject)).map(Vec::as_slice)
    }

    /// Every field keyword found in the text contributes its boosts once.
    pub fn field_boosts(&self, text: &str, processor: &TextProcessor) -> Vec<SkillBoost> {
        self.fields
            .iter()
            .filter(|(keyword, _)| processor.contains_phrase(text, keyword))
            .flat_map(|(_, boosts)| boosts.iter().copied())
            .collect()
    }
}

fn build_table(entries: &[(&str, &[(&str, f32)])]) -> BoostTable {
    entries
        .iter()
        .map(|(name, boosts)| (normalize_name(name), to_boosts(name, boosts.iter().copied())))
        .collect()
}

fn to_boosts<K: AsRef<str>>(owner: &str, boosts: impl Iterator<Item = (K, f32)>) -> Vec<SkillBoost> {
    boosts
        .filter_map(|(key, increment)| match resolve_dimension(key.as_ref()) {
            Some(dimension) if increment.is_finite() => Some(SkillBoost {
                dimension,
                increment,
            }),
            _ => {
                warn!("Ignoring boost '{}' for '{}'", key.as_ref(), owner);
                None
            }
        })
        .collect()
}

/// Lowercase, `&` as "and", punctuation dropped, whitespace collapsed
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .replace('&', " and ")
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '+' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::skills::skill_index;

    #[test]
    fn test_pathway_names_are_normalized() {
        let table = CurriculumTable::default();
        assert!(table.pathway_boosts("STEM").is_some());
        assert!(table.pathway_boosts("Arts & Sports Science").is_some());
        assert!(table.pathway_boosts("social-sciences").is_some());
        assert!(table.pathway_boosts("Social Science").is_some());
        assert!(table.pathway_boosts("Astrology").is_none());
    }

    #[test]
    fn test_stem_boosts_mathematics() {
        let table = CurriculumTable::default();
        let boosts = table.pathway_boosts("stem").unwrap();
        let maths = skill_index("mathematics").unwrap();
        assert!(boosts.iter().any(|b| b.dimension == maths && b.increment == 2.0));
    }

    #[test]
    fn test_field_keywords_match_whole_words() {
        let table = CurriculumTable::default();
        let processor = TextProcessor::new();
        let programming = skill_index("programming").unwrap();

        let boosts = table.field_boosts("BSc Computer Science", &processor);
        assert!(boosts.iter().any(|b| b.dimension == programming));

        assert!(table.field_boosts("Lawn care", &processor).is_empty());
    }

    #[test]
    fn test_overrides_replace_and_extend() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("curriculum_boosts.json");
        std::fs::write(
            &path,
            r#"{
                "subjects": {"Computer Studies": {"programming": 3.0}},
                "fields": {"actuarial": {"mathematics": 2.0, "unknown_skill": 1.0}}
            }"#,
        )
        .unwrap();

        let table = CurriculumTable::with_overrides(&path).unwrap();
        let programming = skill_index("programming").unwrap();
        assert_eq!(
            table.subject_boosts("computer studies").unwrap(),
            &[SkillBoost { dimension: programming, increment: 3.0 }]
        );

        let processor = TextProcessor::new();
        let boosts = table.field_boosts("Actuarial Science", &processor);
        assert_eq!(boosts.len(), 1);
    }
}
