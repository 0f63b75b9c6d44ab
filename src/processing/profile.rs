//! User profiles and their normalization into a query

use crate::catalogue::course::CourseLevel;
use crate::catalogue::skills::{clamp_level, zero_skill_vector, SKILL_DIMENSIONS};
use crate::error::{CareerError, Result};
use crate::processing::curriculum::{CurriculumTable, SkillBoost};
use crate::processing::encoder::VectorEncoder;
use crate::processing::synonyms::{SkillMatchKind, SynonymTable};
use crate::processing::text_processor::TextProcessor;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Added to a dimension for each skill the user lists explicitly.
pub const EXPLICIT_SKILL_INCREMENT: f32 = 2.5;

/// Added to a dimension for each skill phrase found in goals or interests.
pub const IMPLIED_SKILL_INCREMENT: f32 = 1.0;

/// Profile as received at the request boundary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawProfile {
    pub user_type: Option<String>,
    pub skills: Option<String>,
    pub soft_skills: Option<String>,
    pub career_goals: Option<String>,
    pub interests: Option<String>,
    pub pathway: Option<String>,
    pub track: Option<String>,
    pub subject_combination: Option<String>,
    pub degree_programme: Option<String>,
    pub industry: Option<String>,
    pub major: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "cbc")]
    Cbc,
    #[serde(rename = "8-4-4")]
    LegacyCurriculum,
    #[serde(rename = "diploma")]
    Diploma,
    #[serde(rename = "graduate")]
    Graduate,
    #[serde(rename = "postgraduate")]
    Postgraduate,
    #[serde(rename = "professional")]
    Professional,
}

impl UserType {
    pub const ALL: [UserType; 6] = [
        UserType::Cbc,
        UserType::LegacyCurriculum,
        UserType::Diploma,
        UserType::Graduate,
        UserType::Postgraduate,
        UserType::Professional,
    ];

    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "cbc" => Ok(UserType::Cbc),
            "8-4-4" | "844" | "kcse" => Ok(UserType::LegacyCurriculum),
            "diploma" | "tvet" => Ok(UserType::Diploma),
            "graduate" | "undergraduate" => Ok(UserType::Graduate),
            "postgraduate" | "masters" | "phd" => Ok(UserType::Postgraduate),
            "professional" => Ok(UserType::Professional),
            _ => Err(CareerError::UnknownUserType(value.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Cbc => "cbc",
            UserType::LegacyCurriculum => "8-4-4",
            UserType::Diploma => "diploma",
            UserType::Graduate => "graduate",
            UserType::Postgraduate => "postgraduate",
            UserType::Professional => "professional",
        }
    }

    /// Education zone (1-5) the user type is comparable to
    pub fn education_zone(&self) -> u8 {
        match self {
            UserType::Cbc | UserType::LegacyCurriculum => 2,
            UserType::Diploma => 3,
            UserType::Graduate | UserType::Professional => 4,
            UserType::Postgraduate => 5,
        }
    }

    /// Course levels this learner is ready for; learning paths fill these first
    pub fn course_levels(&self) -> &'static [CourseLevel] {
        match self {
            UserType::Cbc => &[CourseLevel::Foundation],
            UserType::LegacyCurriculum | UserType::Diploma => &[CourseLevel::Foundation, CourseLevel::Intermediate],
            UserType::Graduate | UserType::Professional => &[CourseLevel::Intermediate, CourseLevel::Advanced],
            UserType::Postgraduate => &[CourseLevel::Advanced],
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EducationTrack {
    Cbc {
        pathway: Option<String>,
        track: Option<String>,
    },
    LegacyCurriculum {
        subjects: Vec<String>,
    },
    Diploma {
        programme: Option<String>,
    },
    Graduate {
        degree_programme: Option<String>,
    },
    Postgraduate {
        degree_programme: Option<String>,
        specialisation: Option<String>,
    },
    Professional {
        industry: Option<String>,
        major: Option<String>,
    },
}

impl EducationTrack {
    pub fn user_type(&self) -> UserType {
        match self {
            EducationTrack::Cbc { .. } => UserType::Cbc,
            EducationTrack::LegacyCurriculum { .. } => UserType::LegacyCurriculum,
            EducationTrack::Diploma { .. } => UserType::Diploma,
            EducationTrack::Graduate { .. } => UserType::Graduate,
            EducationTrack::Postgraduate { .. } => UserType::Postgraduate,
            EducationTrack::Professional { .. } => UserType::Professional,
        }
    }

    /// Free text naming the user's field of study or work
    pub fn field_text(&self) -> String {
        let parts: Vec<&str> = match self {
            EducationTrack::Cbc { .. } | EducationTrack::LegacyCurriculum { .. } => Vec::new(),
            EducationTrack::Diploma { programme } => programme.iter().map(String::as_str).collect(),
            EducationTrack::Graduate { degree_programme } => {
                degree_programme.iter().map(String::as_str).collect()
            }
            EducationTrack::Postgraduate {
                degree_programme,
                specialisation,
            } => degree_programme
                .iter()
                .chain(specialisation.iter())
                .map(String::as_str)
                .collect(),
            EducationTrack::Professional { industry, major } => {
                industry.iter().chain(major.iter()).map(String::as_str).collect()
            }
        };
        parts.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub education: EducationTrack,
    pub skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub goal: String,
    pub interests: String,
}

impl UserProfile {
    pub fn from_raw(raw: &RawProfile, processor: &TextProcessor) -> Result<Self> {
        let split = |field: &Option<String>| {
            field
                .as_deref()
                .map(|text| processor.split_terms(text))
                .unwrap_or_default()
        };
        let text = |field: &Option<String>| {
            field
                .as_deref()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
        };

        let skills = split(&raw.skills);
        let goal = text(&raw.career_goals).unwrap_or_default();
        if skills.is_empty() && goal.is_empty() {
            return Err(CareerError::InsufficientInput);
        }

        let user_type = match text(&raw.user_type) {
            Some(value) => UserType::parse(&value)?,
            None => UserType::Graduate,
        };

        let education = match user_type {
            UserType::Cbc => EducationTrack::Cbc {
                pathway: text(&raw.pathway),
                track: text(&raw.track),
            },
            UserType::LegacyCurriculum => EducationTrack::LegacyCurriculum {
                subjects: split(&raw.subject_combination),
            },
            UserType::Diploma => EducationTrack::Diploma {
                programme: text(&raw.degree_programme).or_else(|| text(&raw.major)),
            },
            UserType::Graduate => EducationTrack::Graduate {
                degree_programme: text(&raw.degree_programme).or_else(|| text(&raw.major)),
            },
            UserType::Postgraduate => EducationTrack::Postgraduate {
                degree_programme: text(&raw.degree_programme),
                specialisation: text(&raw.major),
            },
            UserType::Professional => EducationTrack::Professional {
                industry: text(&raw.industry),
                major: text(&raw.major).or_else(|| text(&raw.degree_programme)),
            },
        };

        Ok(Self {
            education,
            skills,
            soft_skills: split(&raw.soft_skills),
            goal,
            interests: text(&raw.interests).unwrap_or_default(),
        })
    }
}

impl TryFrom<RawProfile> for UserProfile {
    type Error = CareerError;

    fn try_from(raw: RawProfile) -> Result<Self> {
        Self::from_raw(&raw, &TextProcessor::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSkill {
    pub term: String,
    pub dimension: &'static str,
    pub kind: SkillMatchKind,
}

/// Normalized form of a profile used by every downstream stage
#[derive(Debug, Clone, Serialize)]
pub struct UserQuery {
    pub user_type: UserType,
    #[serde(skip)]
    pub semantic_vector: Vec<f32>,
    pub skill_vector: Vec<f32>,
    pub education_zone: u8,
    pub resolved_skills: Vec<ResolvedSkill>,
    pub keyword_tokens: Vec<String>,
    pub goal_tokens: Vec<String>,
    pub goal_text: String,
}

pub struct ProfileNormalizer<'a> {
    synonyms: &'a SynonymTable,
    curriculum: &'a CurriculumTable,
    encoder: &'a dyn VectorEncoder,
    processor: &'a TextProcessor,
}

impl<'a> ProfileNormalizer<'a> {
    pub fn new(
        synonyms: &'a SynonymTable,
        curriculum: &'a CurriculumTable,
        encoder: &'a dyn VectorEncoder,
        processor: &'a TextProcessor,
    ) -> Self {
        Self {
            synonyms,
            curriculum,
            encoder,
            processor,
        }
    }

    pub fn normalize(&self, profile: &UserProfile) -> Result<UserQuery> {
        if profile.skills.is_empty() && profile.goal.trim().is_empty() {
            return Err(CareerError::InsufficientInput);
        }

        let mut skill_vector = zero_skill_vector();
        let mut resolved_skills = Vec::new();
        let mut keyword_tokens = Vec::new();

        for term in profile.skills.iter().chain(profile.soft_skills.iter()) {
            match self.synonyms.resolve(term) {
                Some(found) => {
                    skill_vector[found.dimension] += EXPLICIT_SKILL_INCREMENT;
                    resolved_skills.push(ResolvedSkill {
                        term: term.clone(),
                        dimension: SKILL_DIMENSIONS[found.dimension].key,
                        kind: found.kind,
                    });
                }
                None => keyword_tokens.extend(self.processor.term_tokens(term)),
            }
        }

        let implied_text = format!("{} {}", profile.goal, profile.interests);
        let mut implied_terms = HashSet::new();
        for found in self.synonyms.scan(&implied_text) {
            if implied_terms.insert(found.matched_term) {
                skill_vector[found.dimension] += IMPLIED_SKILL_INCREMENT;
            }
        }

        for boost in self.education_boosts(&profile.education, &mut keyword_tokens)? {
            skill_vector[boost.dimension] += boost.increment;
        }

        for level in skill_vector.iter_mut() {
            *level = clamp_level(*level);
        }

        let field_text = profile.education.field_text();
        keyword_tokens.extend(self.processor.tokenize(&field_text));
        dedupe_in_place(&mut keyword_tokens);

        let mut goal_tokens = self.processor.tokenize(&implied_text);
        dedupe_in_place(&mut goal_tokens);

        let labels: Vec<&str> = resolved_skills
            .iter()
            .filter_map(|skill| {
                SKILL_DIMENSIONS
                    .iter()
                    .find(|d| d.key == skill.dimension)
                    .map(|d| d.label)
            })
            .collect();

        let semantic_text = [
            profile.skills.join(", "),
            profile.goal.clone(),
            profile.soft_skills.join(", "),
            profile.interests.clone(),
            field_text,
            labels.join(", "),
        ]
        .iter()
        .filter(|part| !part.trim().is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join(". ");

        let semantic_vector = self.encoder.encode(&semantic_text);

        debug!(
            "Normalized profile: {} resolved skills, {} keyword tokens, {} goal tokens",
            resolved_skills.len(),
            keyword_tokens.len(),
            goal_tokens.len()
        );

        let user_type = profile.education.user_type();
        Ok(UserQuery {
            user_type,
            semantic_vector,
            skill_vector,
            education_zone: user_type.education_zone(),
            resolved_skills,
            keyword_tokens,
            goal_tokens,
            goal_text: profile.goal.clone(),
        })
    }

    fn education_boosts(
        &self,
        education: &EducationTrack,
        keyword_tokens: &mut Vec<String>,
    ) -> Result<Vec<SkillBoost>> {
        let mut boosts = Vec::new();

        match education {
            EducationTrack::Cbc { pathway, track } => {
                if let Some(pathway) = pathway {
                    let found = self.curriculum.pathway_boosts(pathway).ok_or_else(|| {
                        CareerError::InvalidProfileField {
                            field: "pathway".to_string(),
                            value: pathway.clone(),
                        }
                    })?;
                    boosts.extend_from_slice(found);
                }
                if let Some(track) = track {
                    match self.curriculum.track_boosts(track) {
                        Some(found) => boosts.extend_from_slice(found),
                        None => keyword_tokens.extend(self.processor.tokenize(track)),
                    }
                }
            }
            EducationTrack::LegacyCurriculum { subjects } => {
                for subject in subjects {
                    match self.curriculum.subject_boosts(subject) {
                        Some(found) => boosts.extend_from_slice(found),
                        None => keyword_tokens.extend(self.processor.tokenize(subject)),
                    }
                }
            }
            other => {
                boosts.extend(
                    self.curriculum
                        .field_boosts(&other.field_text(), self.processor),
                );
            }
        }

        Ok(boosts)
    }
}

fn dedupe_in_place(tokens: &mut Vec<String>) {
    let mut seen = HashSet::new();
    tokens.retain(|token| seen.insert(token.clone()));
}
