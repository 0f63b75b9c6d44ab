//! Skill synonym table mapping free-text skill terms onto skill dimensions

use crate::catalogue::skills::{resolve_dimension, skill_index, SKILL_DIMENSIONS, SKILL_DIM_COUNT};
use crate::error::{CareerError, Result};
use aho_corasick::{AhoCorasick, MatchKind};
use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use strsim::jaro_winkler;

/// Minimum Jaro-Winkler similarity for a misspelled term to resolve.
pub const FUZZY_THRESHOLD: f32 = 0.92;

const MIN_FUZZY_LENGTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkillMatchKind {
    Synonym,
    Dimension,
    Fuzzy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillMatch {
    pub dimension: usize,
    pub matched_term: String,
    pub kind: SkillMatchKind,
    pub confidence: f32,
}

pub struct SynonymTable {
    entries: Vec<(String, usize)>,
    lookup: HashMap<String, usize>,
    matcher: AhoCorasick,
}

const DEFAULT_SYNONYMS: &[(&str, &str)] = &[
    // programming
    ("python", "programming"),
    ("java", "programming"),
    ("javascript", "programming"),
    ("typescript", "programming"),
    ("c++", "programming"),
    ("rust", "programming"),
    ("golang", "programming"),
    ("coding", "programming"),
    ("software development", "programming"),
    ("software engineering", "programming"),
    ("web development", "programming"),
    ("machine learning", "programming"),
    ("r programming", "programming"),
    // mathematics
    ("math", "mathematics"),
    ("maths", "mathematics"),
    ("statistics", "mathematics"),
    ("data analysis", "mathematics"),
    ("data analytics", "mathematics"),
    ("analytics", "mathematics"),
    ("excel", "mathematics"),
    ("numeracy", "mathematics"),
    ("calculus", "mathematics"),
    ("accounting", "mathematics"),
    ("bookkeeping", "mathematics"),
    ("financial analysis", "mathematics"),
    // science
    ("biology", "science"),
    ("chemistry", "science"),
    ("physics", "science"),
    ("laboratory", "science"),
    ("lab work", "science"),
    ("research methods", "science"),
    ("scientific research", "science"),
    // critical thinking
    ("analytical thinking", "critical_thinking"),
    ("analytical skills", "critical_thinking"),
    ("logic", "critical_thinking"),
    ("reasoning", "critical_thinking"),
    // writing
    ("report writing", "writing"),
    ("technical writing", "writing"),
    ("content writing", "writing"),
    ("copywriting", "writing"),
    ("documentation", "writing"),
    ("journalism", "writing"),
    // speaking
    ("communication", "speaking"),
    ("communication skills", "speaking"),
    ("public speaking", "speaking"),
    ("presentation", "speaking"),
    ("presentations", "speaking"),
    ("verbal communication", "speaking"),
    // reading comprehension
    ("reading", "reading_comprehension"),
    ("comprehension", "reading_comprehension"),
    ("literature", "reading_comprehension"),
    // active learning
    ("research", "active_learning"),
    ("self learning", "active_learning"),
    ("fast learner", "active_learning"),
    ("curiosity", "active_learning"),
    // social perceptiveness
    ("empathy", "social_perceptiveness"),
    ("emotional intelligence", "social_perceptiveness"),
    ("patient care", "social_perceptiveness"),
    ("counselling", "social_perceptiveness"),
    ("counseling", "social_perceptiveness"),
    ("caregiving", "social_perceptiveness"),
    // coordination
    ("teamwork", "coordination"),
    ("team work", "coordination"),
    ("collaboration", "coordination"),
    ("project management", "coordination"),
    ("organisation", "coordination"),
    ("organization", "coordination"),
    ("event planning", "coordination"),
    ("leadership", "coordination"),
    // persuasion
    ("sales", "persuasion"),
    ("marketing", "persuasion"),
    ("digital marketing", "persuasion"),
    ("influencing", "persuasion"),
    ("advocacy", "persuasion"),
    // negotiation
    ("conflict resolution", "negotiation"),
    ("mediation", "negotiation"),
    ("bargaining", "negotiation"),
    // instructing
    ("teaching", "instructing"),
    ("tutoring", "instructing"),
    ("mentoring", "instructing"),
    ("coaching", "instructing"),
    ("training", "instructing"),
    // service orientation
    ("customer service", "service_orientation"),
    ("customer care", "service_orientation"),
    ("hospitality", "service_orientation"),
    ("volunteering", "service_orientation"),
    ("helping people", "service_orientation"),
    // complex problem solving
    ("problem solving", "complex_problem_solving"),
    ("problem-solving", "complex_problem_solving"),
    ("design thinking", "complex_problem_solving"),
    ("innovation", "complex_problem_solving"),
    ("engineering design", "complex_problem_solving"),
    // systems analysis
    ("sql", "systems_analysis"),
    ("databases", "systems_analysis"),
    ("database management", "systems_analysis"),
    ("business analysis", "systems_analysis"),
    ("requirements analysis", "systems_analysis"),
    ("information systems", "systems_analysis"),
    ("networking", "systems_analysis"),
    // operations monitoring
    ("monitoring", "operations_monitoring"),
    ("process control", "operations_monitoring"),
    ("operations", "operations_monitoring"),
    ("logistics", "operations_monitoring"),
    // quality control
    ("quality control", "quality_control_analysis"),
    ("quality assurance", "quality_control_analysis"),
    ("software testing", "quality_control_analysis"),
    ("inspection", "quality_control_analysis"),
    ("auditing", "quality_control_analysis"),
    // equipment maintenance
    ("repair", "equipment_maintenance"),
    ("maintenance", "equipment_maintenance"),
    ("mechanics", "equipment_maintenance"),
    ("electrical repair", "equipment_maintenance"),
    ("troubleshooting", "equipment_maintenance"),
    ("plumbing", "equipment_maintenance"),
    // judgment
    ("decision making", "judgment_and_decision_making"),
    ("decision-making", "judgment_and_decision_making"),
    ("judgment", "judgment_and_decision_making"),
    ("judgement", "judgment_and_decision_making"),
    ("strategic planning", "judgment_and_decision_making"),
    ("management", "judgment_and_decision_making"),
];

impl SynonymTable {
    /// Build from (term, dimension index) pairs; a repeated term keeps the
    /// dimension of its last occurrence. Pairs naming a dimension outside
    /// the skill vector are skipped.
    pub fn new(pairs: Vec<(String, usize)>) -> Result<Self> {
        let mut entries: Vec<(String, usize)> = Vec::with_capacity(pairs.len());
        let mut lookup: HashMap<String, usize> = HashMap::new();

        for (term, dimension) in pairs {
            let term = normalize_term(&term);
            if term.is_empty() {
                continue;
            }
            if dimension >= SKILL_DIM_COUNT {
                warn!("Ignoring synonym '{}': skill dimension {} out of range", term, dimension);
                continue;
            }
            match lookup.insert(term.clone(), dimension) {
                Some(_) => {
                    if let Some(entry) = entries.iter_mut().find(|(t, _)| *t == term) {
                        entry.1 = dimension;
                    }
                }
                None => entries.push((term, dimension)),
            }
        }

        let patterns: Vec<&str> = entries.iter().map(|(term, _)| term.as_str()).collect();
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&patterns)
            .map_err(|e| CareerError::Artifact(format!("Failed to build synonym matcher: {}", e)))?;

        Ok(Self {
            entries,
            lookup,
            matcher,
        })
    }

    pub fn default_table() -> Result<Self> {
        Self::new(Self::default_pairs())
    }

    /// Defaults extended by a JSON object of `{"term": "dimension_key"}`
    pub fn with_overrides(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let overrides: BTreeMap<String, String> = serde_json::from_str(&content)?;

        let mut pairs = Self::default_pairs();
        for (term, key) in overrides {
            match resolve_dimension(&key) {
                Some(dimension) => pairs.push((term, dimension)),
                None => warn!("Ignoring synonym '{}': unknown skill dimension '{}'", term, key),
            }
        }

        debug!("Synonym table extended from {}", path.display());
        Self::new(pairs)
    }

    fn default_pairs() -> Vec<(String, usize)> {
        DEFAULT_SYNONYMS
            .iter()
            .filter_map(|(term, key)| skill_index(key).map(|idx| (term.to_string(), idx)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve one skill term: synonym table first, then dimension names,
    /// then the closest synonym by Jaro-Winkler similarity.
    pub fn resolve(&self, term: &str) -> Option<SkillMatch> {
        let normalized = normalize_term(term);
        if normalized.is_empty() {
            return None;
        }

        if let Some(&dimension) = self.lookup.get(&normalized) {
            return Some(SkillMatch {
                dimension,
                matched_term: normalized,
                kind: SkillMatchKind::Synonym,
                confidence: 1.0,
            });
        }

        if let Some(dimension) = resolve_dimension(&normalized) {
            return Some(SkillMatch {
                dimension,
                matched_term: SKILL_DIMENSIONS[dimension].label.to_lowercase(),
                kind: SkillMatchKind::Dimension,
                confidence: 1.0,
            });
        }

        if normalized.chars().count() < MIN_FUZZY_LENGTH {
            return None;
        }

        let mut best: Option<(f32, &str, usize)> = None;
        let candidates = self.entries.iter().map(|(t, d)| (t.as_str(), *d)).chain(
            SKILL_DIMENSIONS
                .iter()
                .enumerate()
                .map(|(idx, dim)| (dim.label, idx)),
        );

        for (candidate, dimension) in candidates {
            if candidate.chars().count() < MIN_FUZZY_LENGTH {
                continue;
            }
            let similarity = jaro_winkler(&normalized, &candidate.to_lowercase()) as f32;
            if similarity >= FUZZY_THRESHOLD && best.map_or(true, |(s, _, _)| similarity > s) {
                best = Some((similarity, candidate, dimension));
            }
        }

        best.map(|(confidence, candidate, dimension)| SkillMatch {
            dimension,
            matched_term: candidate.to_lowercase(),
            kind: SkillMatchKind::Fuzzy,
            confidence,
        })
    }

    /// Find every known synonym inside free text, on word boundaries
    pub fn scan(&self, text: &str) -> Vec<SkillMatch> {
        let bytes = text.as_bytes();
        let is_word_byte = |b: u8| b.is_ascii_alphanumeric() || b >= 0x80;

        self.matcher
            .find_iter(text)
            .filter(|m| {
                let start_ok = m.start() == 0 || !is_word_byte(bytes[m.start() - 1]);
                let end_ok = m.end() == bytes.len() || !is_word_byte(bytes[m.end()]);
                start_ok && end_ok
            })
            .map(|m| {
                let (term, dimension) = &self.entries[m.pattern().as_usize()];
                SkillMatch {
                    dimension: *dimension,
                    matched_term: term.clone(),
                    kind: SkillMatchKind::Synonym,
                    confidence: 1.0,
                }
            })
            .collect()
    }

    /// Terms mapped to a dimension, in table order
    pub fn terms_for(&self, dimension: usize) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, d)| *d == dimension)
            .map(|(term, _)| term.as_str())
            .collect()
    }
}

fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SynonymTable {
        SynonymTable::default_table().unwrap()
    }

    #[test]
    fn test_exact_synonyms_resolve() {
        let table = table();
        let programming = skill_index("programming").unwrap();
        let mathematics = skill_index("mathematics").unwrap();

        assert_eq!(table.resolve("Python").unwrap().dimension, programming);
        assert_eq!(table.resolve("  data   analysis ").unwrap().dimension, mathematics);
        assert_eq!(table.resolve("python").unwrap().kind, SkillMatchKind::Synonym);
    }

    #[test]
    fn test_dimension_names_resolve() {
        let table = table();
        let matched = table.resolve("Critical Thinking").unwrap();
        assert_eq!(matched.dimension, skill_index("critical_thinking").unwrap());
        assert_eq!(matched.kind, SkillMatchKind::Dimension);
    }

    #[test]
    fn test_misspelled_terms_resolve_fuzzily() {
        let table = table();
        let matched = table.resolve("statisticss").unwrap();
        assert_eq!(matched.kind, SkillMatchKind::Fuzzy);
        assert_eq!(matched.dimension, skill_index("mathematics").unwrap());
        assert!(matched.confidence >= FUZZY_THRESHOLD);
    }

    #[test]
    fn test_unrelated_terms_do_not_resolve() {
        let table = table();
        assert!(table.resolve("underwater basket weaving").is_none());
        assert!(table.resolve("xyz").is_none());
        assert!(table.resolve("   ").is_none());
    }

    #[test]
    fn test_scan_respects_word_boundaries() {
        let table = table();
        let found = table.scan("I enjoy Python and SQL but not javascripting");
        let terms: Vec<&str> = found.iter().map(|m| m.matched_term.as_str()).collect();
        assert_eq!(terms, vec!["python", "sql"]);
    }

    #[test]
    fn test_later_entries_override_earlier_ones() {
        let writing = skill_index("writing").unwrap();
        let speaking = skill_index("speaking").unwrap();
        let table = SynonymTable::new(vec![
            ("blogging".to_string(), writing),
            ("Blogging".to_string(), speaking),
        ])
        .unwrap();

        assert_eq!(table.len(), 1);
        assert_eq!(table.resolve("blogging").unwrap().dimension, speaking);
    }

    #[test]
    fn test_overrides_file_extends_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("skill_synonyms.json");
        std::fs::write(&path, r#"{"kotlin": "programming", "juggling": "no_such_dimension"}"#).unwrap();

        let table = SynonymTable::with_overrides(&path).unwrap();
        assert_eq!(
            table.resolve("kotlin").unwrap().dimension,
            skill_index("programming").unwrap()
        );
        assert!(table.resolve("juggling").is_none());
        assert!(table.len() > table.terms_for(skill_index("programming").unwrap()).len());
    }

    #[test]
    fn test_out_of_range_dimensions_are_skipped() {
        let table = SynonymTable::new(vec![
            ("python".to_string(), 14),
            ("astrology".to_string(), SKILL_DIM_COUNT),
            ("tarot".to_string(), usize::MAX),
        ])
        .unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.resolve("astrology").is_none());
        assert!(table.scan("astrology and tarot").is_empty());
        assert_eq!(table.resolve("python").unwrap().dimension, 14);
    }

    #[test]
    fn test_terms_for_dimension() {
        let table = table();
        let terms = table.terms_for(skill_index("instructing").unwrap());
        assert_eq!(terms[0], "teaching");
        assert!(terms.contains(&"tutoring"));
    }
}
