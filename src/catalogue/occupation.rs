//! Occupation catalogue entries

use crate::catalogue::skills::{clamp_level, SKILL_DIMENSIONS, SKILL_DIM_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Career family derived from the two-digit SOC major group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CareerFamily {
    Management,
    BusinessFinance,
    Technology,
    Engineering,
    Science,
    CommunityServices,
    Legal,
    Education,
    ArtsMedia,
    Healthcare,
    ProtectiveServices,
    Hospitality,
    FacilitiesMaintenance,
    PersonalCare,
    Sales,
    Administration,
    Agriculture,
    Construction,
    InstallationRepair,
    Production,
    Transportation,
    Military,
}

impl CareerFamily {
    pub const ALL: [CareerFamily; 22] = [
        CareerFamily::Management,
        CareerFamily::BusinessFinance,
        CareerFamily::Technology,
        CareerFamily::Engineering,
        CareerFamily::Science,
        CareerFamily::CommunityServices,
        CareerFamily::Legal,
        CareerFamily::Education,
        CareerFamily::ArtsMedia,
        CareerFamily::Healthcare,
        CareerFamily::ProtectiveServices,
        CareerFamily::Hospitality,
        CareerFamily::FacilitiesMaintenance,
        CareerFamily::PersonalCare,
        CareerFamily::Sales,
        CareerFamily::Administration,
        CareerFamily::Agriculture,
        CareerFamily::Construction,
        CareerFamily::InstallationRepair,
        CareerFamily::Production,
        CareerFamily::Transportation,
        CareerFamily::Military,
    ];

    /// Authoritative mapping from the SOC major-group prefix.
    pub fn from_code(code: &str) -> Option<Self> {
        let prefix = code.trim().get(0..2)?;
        let family = match prefix {
            "11" => CareerFamily::Management,
            "13" => CareerFamily::BusinessFinance,
            "15" => CareerFamily::Technology,
            "17" => CareerFamily::Engineering,
            "19" => CareerFamily::Science,
            "21" => CareerFamily::CommunityServices,
            "23" => CareerFamily::Legal,
            "25" => CareerFamily::Education,
            "27" => CareerFamily::ArtsMedia,
            "29" | "31" => CareerFamily::Healthcare,
            "33" => CareerFamily::ProtectiveServices,
            "35" => CareerFamily::Hospitality,
            "37" => CareerFamily::FacilitiesMaintenance,
            "39" => CareerFamily::PersonalCare,
            "41" => CareerFamily::Sales,
            "43" => CareerFamily::Administration,
            "45" => CareerFamily::Agriculture,
            "47" => CareerFamily::Construction,
            "49" => CareerFamily::InstallationRepair,
            "51" => CareerFamily::Production,
            "53" => CareerFamily::Transportation,
            "55" => CareerFamily::Military,
            _ => return None,
        };
        Some(family)
    }

    pub fn name(&self) -> &'static str {
        match self {
            CareerFamily::Management => "Management",
            CareerFamily::BusinessFinance => "Business & Finance",
            CareerFamily::Technology => "Technology",
            CareerFamily::Engineering => "Engineering",
            CareerFamily::Science => "Science",
            CareerFamily::CommunityServices => "Community Services",
            CareerFamily::Legal => "Legal",
            CareerFamily::Education => "Education",
            CareerFamily::ArtsMedia => "Arts & Media",
            CareerFamily::Healthcare => "Healthcare",
            CareerFamily::ProtectiveServices => "Protective Services",
            CareerFamily::Hospitality => "Hospitality",
            CareerFamily::FacilitiesMaintenance => "Facilities & Maintenance",
            CareerFamily::PersonalCare => "Personal Care",
            CareerFamily::Sales => "Sales",
            CareerFamily::Administration => "Administration",
            CareerFamily::Agriculture => "Agriculture",
            CareerFamily::Construction => "Construction",
            CareerFamily::InstallationRepair => "Installation & Repair",
            CareerFamily::Production => "Production",
            CareerFamily::Transportation => "Transportation",
            CareerFamily::Military => "Military",
        }
    }

    /// Goal words that point a user towards this family.
    pub fn goal_keywords(&self) -> &'static [&'static str] {
        match self {
            CareerFamily::Management => &["management", "manager", "leadership", "lead", "executive"],
            CareerFamily::BusinessFinance => &["business", "finance", "financial", "accounting", "banking", "economics"],
            CareerFamily::Technology => &["technology", "tech", "software", "computer", "data", "ai", "digital", "it"],
            CareerFamily::Engineering => &["engineering", "engineer", "design", "mechanical", "electrical", "civil"],
            CareerFamily::Science => &["science", "research", "laboratory", "environment", "biology", "chemistry"],
            CareerFamily::CommunityServices => &["community", "social", "counselling", "counseling", "welfare"],
            CareerFamily::Legal => &["law", "legal", "justice", "lawyer"],
            CareerFamily::Education => &["teaching", "teacher", "education", "school", "training"],
            CareerFamily::ArtsMedia => &["art", "arts", "media", "design", "music", "film", "journalism", "creative"],
            CareerFamily::Healthcare => &["health", "healthcare", "medical", "medicine", "nursing", "hospital", "clinical"],
            CareerFamily::ProtectiveServices => &["security", "police", "protective", "safety"],
            CareerFamily::Hospitality => &["hospitality", "food", "cooking", "chef", "restaurant", "tourism"],
            CareerFamily::FacilitiesMaintenance => &["cleaning", "grounds", "facilities"],
            CareerFamily::PersonalCare => &["care", "beauty", "fitness", "childcare"],
            CareerFamily::Sales => &["sales", "selling", "retail", "marketing"],
            CareerFamily::Administration => &["administration", "office", "clerical", "secretary"],
            CareerFamily::Agriculture => &["agriculture", "farming", "farm", "forestry", "fishing"],
            CareerFamily::Construction => &["construction", "building", "carpentry", "plumbing"],
            CareerFamily::InstallationRepair => &["repair", "maintenance", "mechanic", "installation"],
            CareerFamily::Production => &["manufacturing", "production", "factory"],
            CareerFamily::Transportation => &["transport", "logistics", "driving", "aviation", "shipping"],
            CareerFamily::Military => &["military", "army", "defence", "defense"],
        }
    }
}

impl fmt::Display for CareerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DemandLevel {
    Low,
    Medium,
    High,
}

impl DemandLevel {
    /// Interpret free-text demand or growth labels; anything unrecognised is Medium.
    pub fn parse_label(label: &str) -> Self {
        let lower = label.trim().to_lowercase();
        if lower.contains("high") || lower.contains("fast") {
            DemandLevel::High
        } else if lower.contains("low")
            || lower.contains("slow")
            || lower.contains("decline")
            || lower.contains("little")
        {
            DemandLevel::Low
        } else {
            DemandLevel::Medium
        }
    }
}

impl fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DemandLevel::Low => "Low",
            DemandLevel::Medium => "Medium",
            DemandLevel::High => "High",
        };
        write!(f, "{}", label)
    }
}

/// Immutable catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Occupation {
    pub code: String,
    pub title: String,
    pub description: String,
    pub family: CareerFamily,
    pub zone: u8,
    pub skill_levels: Vec<f32>,
    pub demand: DemandLevel,
    /// Empirical automation risk on the 0-100 scale
    pub automation_risk: Option<f32>,
    pub median_wage: Option<f32>,
}

/// Occupation record as stored in catalogue files.
#[derive(Debug, Clone, Deserialize)]
pub struct OccupationRecord {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub zone: u8,
    pub skill_levels: Vec<f32>,
    #[serde(default)]
    pub demand: Option<String>,
    #[serde(default)]
    pub automation_risk: Option<f32>,
    #[serde(default)]
    pub median_wage: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordIssue {
    UnknownFamilyCode(String),
    SkillVectorLength { expected: usize, found: usize },
    ZoneOutOfRange(u8),
    EmptyTitle,
}

impl fmt::Display for RecordIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordIssue::UnknownFamilyCode(code) => write!(f, "unknown SOC family prefix in code '{}'", code),
            RecordIssue::SkillVectorLength { expected, found } => {
                write!(f, "skill vector has {} values, expected {}", found, expected)
            }
            RecordIssue::ZoneOutOfRange(zone) => write!(f, "education zone {} outside 1-5", zone),
            RecordIssue::EmptyTitle => write!(f, "missing title"),
        }
    }
}

impl TryFrom<OccupationRecord> for Occupation {
    type Error = RecordIssue;

    fn try_from(record: OccupationRecord) -> Result<Self, Self::Error> {
        let title = record.title.trim().to_string();
        if title.is_empty() {
            return Err(RecordIssue::EmptyTitle);
        }

        let family = CareerFamily::from_code(&record.code)
            .ok_or_else(|| RecordIssue::UnknownFamilyCode(record.code.clone()))?;

        if record.skill_levels.len() != SKILL_DIM_COUNT {
            return Err(RecordIssue::SkillVectorLength {
                expected: SKILL_DIM_COUNT,
                found: record.skill_levels.len(),
            });
        }

        if !(1..=5).contains(&record.zone) {
            return Err(RecordIssue::ZoneOutOfRange(record.zone));
        }

        let automation_risk = record
            .automation_risk
            .filter(|r| r.is_finite())
            .map(|r| r.clamp(0.0, 100.0));
        let median_wage = record.median_wage.filter(|w| w.is_finite() && *w > 0.0);

        Ok(Occupation {
            code: record.code.trim().to_string(),
            title,
            description: record.description,
            family,
            zone: record.zone,
            skill_levels: record.skill_levels.into_iter().map(clamp_level).collect(),
            demand: record
                .demand
                .as_deref()
                .map(DemandLevel::parse_label)
                .unwrap_or(DemandLevel::Medium),
            automation_risk,
            median_wage,
        })
    }
}

impl Occupation {
    /// Text used to embed the occupation for retrieval.
    pub fn embedding_text(&self) -> String {
        let mut ranked: Vec<(usize, f32)> = self.skill_levels.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));

        let top_skills: Vec<&str> = ranked
            .iter()
            .take(5)
            .filter(|(_, level)| *level > 0.0)
            .map(|(i, _)| SKILL_DIMENSIONS[*i].label)
            .collect();

        format!(
            "{}. {}. {}. Key skills: {}",
            self.title,
            self.family.name(),
            self.description,
            top_skills.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(code: &str, levels: usize) -> OccupationRecord {
        OccupationRecord {
            code: code.to_string(),
            title: "Software Developers".to_string(),
            description: String::new(),
            zone: 4,
            skill_levels: vec![3.0; levels],
            demand: Some("Much faster than average".to_string()),
            automation_risk: Some(130.0),
            median_wage: None,
        }
    }

    #[test]
    fn test_family_from_code_prefix() {
        assert_eq!(CareerFamily::from_code("15-1252.00"), Some(CareerFamily::Technology));
        assert_eq!(CareerFamily::from_code("29-1141.00"), Some(CareerFamily::Healthcare));
        assert_eq!(CareerFamily::from_code("31-1131.00"), Some(CareerFamily::Healthcare));
        assert_eq!(CareerFamily::from_code("99-0000.00"), None);
        assert_eq!(CareerFamily::from_code("1"), None);
    }

    #[test]
    fn test_demand_label_parsing() {
        assert_eq!(DemandLevel::parse_label("High"), DemandLevel::High);
        assert_eq!(DemandLevel::parse_label("Much faster than average"), DemandLevel::High);
        assert_eq!(DemandLevel::parse_label("Declining"), DemandLevel::Low);
        assert_eq!(DemandLevel::parse_label("Average"), DemandLevel::Medium);
        assert_eq!(DemandLevel::parse_label(""), DemandLevel::Medium);
    }

    #[test]
    fn test_record_conversion() {
        let occupation = Occupation::try_from(record("15-1252.00", SKILL_DIM_COUNT)).unwrap();
        assert_eq!(occupation.family, CareerFamily::Technology);
        assert_eq!(occupation.demand, DemandLevel::High);
        assert_eq!(occupation.automation_risk, Some(100.0));
    }

    #[test]
    fn test_short_skill_vector_is_rejected() {
        let err = Occupation::try_from(record("15-1252.00", 3)).unwrap_err();
        assert_eq!(
            err,
            RecordIssue::SkillVectorLength {
                expected: SKILL_DIM_COUNT,
                found: 3
            }
        );
    }

    #[test]
    fn test_unknown_family_is_rejected() {
        let err = Occupation::try_from(record("98-1000.00", SKILL_DIM_COUNT)).unwrap_err();
        assert!(matches!(err, RecordIssue::UnknownFamilyCode(_)));
    }
}
