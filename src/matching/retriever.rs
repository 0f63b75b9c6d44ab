//! Dense candidate retrieval over the occupation embedding index

use crate::catalogue::occupation::Occupation;
use crate::processing::encoder::{l2_normalize, VectorEncoder};
use log::{debug, warn};
use ndarray::{Array1, Array2, ArrayView1};
use serde::Serialize;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RetrievedCandidate {
    pub index: usize,
    pub similarity: f32,
}

/// Row `i` is the L2-normalized embedding of catalogue occupation `i`
pub struct OccupationIndex {
    embeddings: Array2<f32>,
}

impl OccupationIndex {
    pub fn build(occupations: &[Occupation], encoder: &dyn VectorEncoder) -> Self {
        let start_time = Instant::now();
        let dimension = encoder.dimension();
        let texts: Vec<String> = occupations.iter().map(Occupation::embedding_text).collect();

        let mut flat = Vec::with_capacity(occupations.len() * dimension);
        for mut vector in encoder.encode_batch(&texts) {
            vector.resize(dimension, 0.0);
            for value in vector.iter_mut() {
                if !value.is_finite() {
                    *value = 0.0;
                }
            }
            l2_normalize(&mut vector);
            flat.extend(vector);
        }
        flat.resize(occupations.len() * dimension, 0.0);

        let embeddings = Array2::from_shape_vec((occupations.len(), dimension), flat).unwrap_or_else(|e| {
            warn!("Occupation index shape mismatch ({}), using empty embeddings", e);
            Array2::zeros((occupations.len(), dimension))
        });

        debug!(
            "Occupation index built: {} x {} in {:.2?}",
            occupations.len(),
            dimension,
            start_time.elapsed()
        );

        Self { embeddings }
    }

    pub fn len(&self) -> usize {
        self.embeddings.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.nrows() == 0
    }

    pub fn dimension(&self) -> usize {
        self.embeddings.ncols()
    }

    /// Cosine similarity of the query against every row. A query of the
    /// wrong length or zero norm scores 0 everywhere.
    pub fn similarities(&self, query: &[f32]) -> Vec<f32> {
        if query.len() != self.dimension() {
            return vec![0.0; self.len()];
        }

        let mut normalized: Vec<f32> = query
            .iter()
            .map(|v| if v.is_finite() { *v } else { 0.0 })
            .collect();
        l2_normalize(&mut normalized);

        let scores: Array1<f32> = self.embeddings.dot(&ArrayView1::from(&normalized[..]));
        scores
            .iter()
            // `+ 0.0` folds -0.0 into 0.0 so exact ties compare equal
            .map(|s| if s.is_finite() { s.clamp(-1.0, 1.0) + 0.0 } else { 0.0 })
            .collect()
    }

    /// Top `k` occupations by similarity, ties broken by catalogue order
    pub fn retrieve(&self, query: &[f32], k: usize) -> Vec<RetrievedCandidate> {
        let mut candidates: Vec<RetrievedCandidate> = self
            .similarities(query)
            .into_iter()
            .enumerate()
            .map(|(index, similarity)| RetrievedCandidate { index, similarity })
            .collect();

        candidates.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then(a.index.cmp(&b.index))
        });
        candidates.truncate(k.min(self.len()));
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::fallback::demo_occupations;
    use crate::processing::encoder::HashingEncoder;

    #[test]
    fn test_retrieve_is_sorted_and_bounded() {
        let occupations = demo_occupations();
        let encoder = HashingEncoder::new(128);
        let index = OccupationIndex::build(&occupations, &encoder);

        let query = encoder.encode("registered nurses providing nursing care to patients");
        let results = index.retrieve(&query, 5);

        assert_eq!(results.len(), 5);
        assert!(results.windows(2).all(|w| w[0].similarity >= w[1].similarity));
        assert_eq!(occupations[results[0].index].title, "Registered Nurses");
    }

    #[test]
    fn test_k_is_clamped_to_catalogue_size() {
        let occupations = demo_occupations();
        let encoder = HashingEncoder::new(64);
        let index = OccupationIndex::build(&occupations, &encoder);

        let results = index.retrieve(&encoder.encode("software"), 500);
        assert_eq!(results.len(), occupations.len());
    }

    #[test]
    fn test_zero_query_ties_fall_back_to_catalogue_order() {
        let occupations = demo_occupations();
        let encoder = HashingEncoder::new(64);
        let index = OccupationIndex::build(&occupations, &encoder);

        let results = index.retrieve(&vec![0.0; 64], 3);
        let indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(results.iter().all(|r| r.similarity == 0.0));
    }

    #[test]
    fn test_mismatched_query_length_scores_zero() {
        let occupations = demo_occupations();
        let index = OccupationIndex::build(&occupations, &HashingEncoder::new(32));
        assert!(index.similarities(&[1.0, 0.0]).iter().all(|s| *s == 0.0));
    }
}
