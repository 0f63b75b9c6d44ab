//! Lexical course search over the course corpus

use crate::catalogue::course::{Course, CourseLevel};
use crate::processing::text_processor::TextProcessor;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Matches at or below this relevance are noise.
pub const MIN_RELEVANCE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseQuery {
    pub top_k: usize,
    pub level: Option<CourseLevel>,
    pub min_quality: f32,
}

impl Default for CourseQuery {
    fn default() -> Self {
        Self {
            top_k: 10,
            level: None,
            min_quality: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CourseMatch {
    pub index: usize,
    pub relevance: f32,
}

type SparseVector = HashMap<String, f32>;

/// TF-IDF index with sublinear term frequency and smoothed IDF
pub struct CourseIndex {
    courses: Vec<Course>,
    documents: Vec<SparseVector>,
    idf: HashMap<String, f32>,
    processor: TextProcessor,
}

impl CourseIndex {
    pub fn build(courses: Vec<Course>) -> Self {
        let processor = TextProcessor::new();
        let term_counts: Vec<HashMap<String, f32>> = courses
            .iter()
            .map(|course| count_terms(&processor, &course.search_text()))
            .collect();

        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for counts in &term_counts {
            for term in counts.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n = courses.len() as f32;
        let idf: HashMap<String, f32> = document_frequency
            .into_iter()
            .map(|(term, df)| (term.to_string(), ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0))
            .collect();

        let documents = term_counts
            .into_iter()
            .map(|counts| weigh(counts, &idf))
            .collect();

        debug!("Course index built over {} courses, {} terms", courses.len(), idf.len());

        Self {
            courses,
            documents,
            idf,
            processor,
        }
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn course(&self, index: usize) -> Option<&Course> {
        self.courses.get(index)
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Courses ranked by cosine relevance to the query, then corpus order.
    /// Courses without a quality score count as quality 0.
    pub fn search(&self, query: &str, options: &CourseQuery) -> Vec<CourseMatch> {
        let query_vector = weigh(count_terms(&self.processor, query), &self.idf);
        if query_vector.is_empty() || options.top_k == 0 {
            return Vec::new();
        }

        let mut matches: Vec<CourseMatch> = self
            .documents
            .iter()
            .enumerate()
            .filter(|(idx, _)| {
                let course = &self.courses[*idx];
                options.level.map_or(true, |level| course.level == level)
                    && course.quality_score.unwrap_or(0.0) >= options.min_quality
            })
            .filter_map(|(idx, document)| {
                let relevance: f32 = query_vector
                    .iter()
                    .filter_map(|(term, weight)| document.get(term).map(|w| w * weight))
                    .sum();
                (relevance.is_finite() && relevance > MIN_RELEVANCE)
                    .then_some(CourseMatch { index: idx, relevance })
            })
            .collect();

        matches.sort_by(|a, b| b.relevance.total_cmp(&a.relevance).then(a.index.cmp(&b.index)));
        matches.truncate(options.top_k);
        matches
    }
}

fn count_terms(processor: &TextProcessor, text: &str) -> HashMap<String, f32> {
    let mut counts = HashMap::new();
    for term in processor.terms_with_bigrams(text) {
        *counts.entry(term).or_insert(0.0) += 1.0;
    }
    counts
}

/// Sublinear TF times IDF, L2-normalized; terms outside the vocabulary drop out
fn weigh(counts: HashMap<String, f32>, idf: &HashMap<String, f32>) -> SparseVector {
    let mut vector: SparseVector = counts
        .into_iter()
        .filter_map(|(term, count)| idf.get(&term).map(|w| (term, (1.0 + count.ln()) * w)))
        .collect();

    let norm: f32 = vector.values().map(|w| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::fallback::demo_courses;

    fn course(title: &str, skills: &str, level: CourseLevel, quality: Option<f32>) -> Course {
        Course {
            id: title.to_lowercase(),
            title: title.to_string(),
            platform: "Coursera".to_string(),
            subject: String::new(),
            skills_covered: skills.to_string(),
            level,
            quality_score: quality,
            is_free: true,
            duration_hours: None,
            url: None,
        }
    }

    #[test]
    fn test_title_matches_rank_first() {
        let index = CourseIndex::build(vec![
            course("Business Writing", "emails, python reports", CourseLevel::Foundation, Some(0.9)),
            course("Python for Everybody", "variables, loops", CourseLevel::Foundation, Some(0.9)),
            course("Negotiation Skills", "bargaining", CourseLevel::Foundation, Some(0.9)),
        ]);

        let matches = index.search("python", &CourseQuery::default());
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].index, 1);
        assert!(matches[0].relevance > matches[1].relevance);
    }

    #[test]
    fn test_filters_apply() {
        let index = CourseIndex::build(vec![
            course("Statistics Basics", "statistics", CourseLevel::Foundation, Some(0.9)),
            course("Applied Statistics", "statistics", CourseLevel::Advanced, Some(0.9)),
            course("Statistics Refresher", "statistics", CourseLevel::Advanced, None),
        ]);

        let query = CourseQuery {
            top_k: 10,
            level: Some(CourseLevel::Advanced),
            min_quality: 0.3,
        };
        let matches = index.search("statistics", &query);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].index, 1);
    }

    #[test]
    fn test_unknown_vocabulary_returns_nothing() {
        let index = CourseIndex::build(demo_courses());
        assert!(index.search("zzzz qqqq", &CourseQuery::default()).is_empty());
        assert!(index.search("", &CourseQuery::default()).is_empty());
    }

    #[test]
    fn test_top_k_truncates() {
        let index = CourseIndex::build(demo_courses());
        let query = CourseQuery {
            top_k: 1,
            ..CourseQuery::default()
        };
        assert!(index.search("programming python data", &query).len() <= 1);
    }
}
