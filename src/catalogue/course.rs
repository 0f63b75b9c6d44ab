//! Course corpus records

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CourseLevel {
    Foundation,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    pub const ORDERED: [CourseLevel; 3] = [
        CourseLevel::Foundation,
        CourseLevel::Intermediate,
        CourseLevel::Advanced,
    ];

    /// Map the level tags used by course platforms onto the three stages.
    pub fn parse_tag(tag: &str) -> Self {
        let lower = tag.trim().to_lowercase();
        if lower.contains("advanced") || lower.contains("expert") {
            CourseLevel::Advanced
        } else if lower.contains("intermediate") {
            CourseLevel::Intermediate
        } else {
            CourseLevel::Foundation
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CourseLevel::Foundation => "Foundation",
            CourseLevel::Intermediate => "Intermediate",
            CourseLevel::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub platform: String,
    pub subject: String,
    pub skills_covered: String,
    pub level: CourseLevel,
    pub quality_score: Option<f32>,
    pub is_free: bool,
    pub duration_hours: Option<f32>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub skills_covered: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub quality_score: Option<f32>,
    #[serde(default)]
    pub is_free: Option<bool>,
    #[serde(default)]
    pub duration_hours: Option<f32>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Course {
    /// Convert a stored record; records without a title are unusable.
    pub fn from_record(record: CourseRecord) -> Option<Self> {
        let title = record.title.trim().to_string();
        if title.is_empty() {
            return None;
        }

        let platform = record
            .platform
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        let id = record
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("{}|{}", title.to_lowercase(), platform.to_lowercase()));

        Some(Course {
            id,
            title,
            platform,
            subject: record.subject.unwrap_or_default(),
            skills_covered: record.skills_covered.unwrap_or_default(),
            level: record
                .level
                .as_deref()
                .map(CourseLevel::parse_tag)
                .unwrap_or(CourseLevel::Foundation),
            quality_score: record.quality_score.filter(|q| q.is_finite()).map(|q| q.clamp(0.0, 1.0)),
            is_free: record.is_free.unwrap_or(false),
            duration_hours: record.duration_hours.filter(|h| h.is_finite() && *h >= 0.0),
            url: record.url.filter(|u| !u.trim().is_empty()),
        })
    }

    /// Text indexed for lexical search; the title counts three times.
    pub fn search_text(&self) -> String {
        format!(
            "{t} {t} {t} {} {}",
            self.skills_covered,
            self.subject,
            t = self.title
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_tags() {
        assert_eq!(CourseLevel::parse_tag("Beginner"), CourseLevel::Foundation);
        assert_eq!(CourseLevel::parse_tag("Intermediate"), CourseLevel::Intermediate);
        assert_eq!(CourseLevel::parse_tag("Expert"), CourseLevel::Advanced);
        assert_eq!(CourseLevel::parse_tag("Mixed"), CourseLevel::Foundation);
    }

    #[test]
    fn test_identity_falls_back_to_title_and_platform() {
        let record: CourseRecord = serde_json::from_str(
            r#"{"title": "Python for Everybody", "platform": "Coursera", "duration_hours": 30}"#,
        )
        .unwrap();
        let course = Course::from_record(record).unwrap();
        assert_eq!(course.id, "python for everybody|coursera");
        assert_eq!(course.duration_hours, Some(30.0));
        assert_eq!(course.quality_score, None);
    }

    #[test]
    fn test_blank_title_is_skipped() {
        let record: CourseRecord = serde_json::from_str(r#"{"title": "   "}"#).unwrap();
        assert!(Course::from_record(record).is_none());
    }
}
