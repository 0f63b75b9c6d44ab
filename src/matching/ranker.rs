//! Candidate re-ranking
//!
//! A trained gradient-boosted tree ensemble scores each retrieved candidate
//! from its features. Without a usable model, candidates keep their
//! retrieval order through `SimilarityScorer`, which ranks on the raw
//! retrieval cosine in [-1, 1].

use crate::error::{CareerError, Result};
use crate::matching::features::{CandidateFeatures, FEATURE_NAMES};
use crate::matching::retriever::RetrievedCandidate;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

pub trait CandidateScorer: Send + Sync {
    fn name(&self) -> &str;

    /// `similarity` is the unclamped retrieval cosine
    fn score(&self, features: &CandidateFeatures, similarity: f32) -> f32;

    fn is_fallback(&self) -> bool {
        false
    }
}

/// Scores by the retrieval cosine alone
pub struct SimilarityScorer;

impl SimilarityScorer {
    pub const NAME: &'static str = "similarity-fallback";
}

impl CandidateScorer for SimilarityScorer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn score(&self, _features: &CandidateFeatures, similarity: f32) -> f32 {
        similarity
    }

    fn is_fallback(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    Leaf {
        leaf: f32,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeEnsemble {
    #[serde(default)]
    pub name: Option<String>,
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub base_score: f32,
    pub trees: Vec<Tree>,
}

pub struct GradientBoostedScorer {
    name: String,
    base_score: f32,
    trees: Vec<Tree>,
    /// Model feature slot -> position in `CandidateFeatures::to_array`
    feature_map: Vec<usize>,
}

impl GradientBoostedScorer {
    pub fn from_json(json: &str) -> Result<Self> {
        let ensemble: TreeEnsemble = serde_json::from_str(json)
            .map_err(|e| CareerError::RankerModel(format!("invalid ranker JSON: {}", e)))?;
        Self::from_ensemble(ensemble)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let scorer = Self::from_json(&content)?;
        info!(
            "Loaded ranker {} ({} trees) from {}",
            scorer.name,
            scorer.trees.len(),
            path.display()
        );
        Ok(scorer)
    }

    pub fn from_ensemble(ensemble: TreeEnsemble) -> Result<Self> {
        let feature_map = ensemble
            .feature_names
            .iter()
            .map(|name| {
                FEATURE_NAMES.iter().position(|known| known == name).ok_or_else(|| {
                    CareerError::RankerModel(format!("unknown feature '{}'", name))
                })
            })
            .collect::<Result<Vec<usize>>>()?;

        if !ensemble.base_score.is_finite() {
            return Err(CareerError::RankerModel("base_score is not finite".to_string()));
        }
        if ensemble.trees.is_empty() {
            return Err(CareerError::RankerModel("ensemble has no trees".to_string()));
        }

        for (tree_idx, tree) in ensemble.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(CareerError::RankerModel(format!("tree {} is empty", tree_idx)));
            }
            for (node_idx, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= feature_map.len() {
                            return Err(CareerError::RankerModel(format!(
                                "tree {} node {}: feature index {} out of range",
                                tree_idx, node_idx, feature
                            )));
                        }
                        if !threshold.is_finite() {
                            return Err(CareerError::RankerModel(format!(
                                "tree {} node {}: threshold is not finite",
                                tree_idx, node_idx
                            )));
                        }
                        for child in [*left, *right] {
                            if child <= node_idx || child >= tree.nodes.len() {
                                return Err(CareerError::RankerModel(format!(
                                    "tree {} node {}: child {} must point forward within the tree",
                                    tree_idx, node_idx, child
                                )));
                            }
                        }
                    }
                    TreeNode::Leaf { leaf } => {
                        if !leaf.is_finite() {
                            return Err(CareerError::RankerModel(format!(
                                "tree {} node {}: leaf value is not finite",
                                tree_idx, node_idx
                            )));
                        }
                    }
                }
            }
        }

        Ok(Self {
            name: ensemble.name.unwrap_or_else(|| "gradient-boosted".to_string()),
            base_score: ensemble.base_score,
            trees: ensemble.trees,
            feature_map,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    fn tree_output(&self, tree: &Tree, values: &[f32; 6]) -> f32 {
        // Children always point forward, so the walk terminates
        let mut node_idx = 0;
        loop {
            match &tree.nodes[node_idx] {
                TreeNode::Leaf { leaf } => return *leaf,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = values[self.feature_map[*feature]];
                    node_idx = if value < *threshold { *left } else { *right };
                }
            }
        }
    }
}

impl CandidateScorer for GradientBoostedScorer {
    fn name(&self) -> &str {
        &self.name
    }

    fn score(&self, features: &CandidateFeatures, _similarity: f32) -> f32 {
        let values = features.to_array();
        let margin: f32 = self.base_score
            + self
                .trees
                .iter()
                .map(|tree| self.tree_output(tree, &values))
                .sum::<f32>();
        1.0 / (1.0 + (-margin).exp())
    }
}

/// Load the ranker model, or fall back to similarity ordering. The returned
/// string, when present, explains the fallback.
pub fn select_scorer(path: &Path) -> (Arc<dyn CandidateScorer>, Option<String>) {
    if !path.exists() {
        let message = format!(
            "ranker model not found at {}; ranking by similarity",
            path.display()
        );
        return (Arc::new(SimilarityScorer), Some(message));
    }

    match GradientBoostedScorer::load(path) {
        Ok(scorer) => (Arc::new(scorer), None),
        Err(e) => {
            let message = format!("ranker model unusable ({}); ranking by similarity", e);
            (Arc::new(SimilarityScorer), Some(message))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub index: usize,
    pub similarity: f32,
    pub score: f32,
    pub features: CandidateFeatures,
}

/// Order retrieved candidates by ranker score and keep the best `top_n`.
/// Ties fall back to catalogue order. The top retrieved candidate always
/// survives: if it ranks outside `top_n` it takes the last slot.
pub fn rank(
    candidates: &[RetrievedCandidate],
    features: &[CandidateFeatures],
    scorer: &dyn CandidateScorer,
    top_n: usize,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<(usize, RankedCandidate)> = candidates
        .iter()
        .zip(features.iter())
        .enumerate()
        .map(|(position, (candidate, features))| {
            let score = scorer.score(features, candidate.similarity);
            (
                position,
                RankedCandidate {
                    index: candidate.index,
                    similarity: candidate.similarity,
                    score: if score.is_finite() { score + 0.0 } else { 0.0 },
                    features: *features,
                },
            )
        })
        .collect();

    ranked.sort_by(|(_, a), (_, b)| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));

    let keep = top_n.min(ranked.len());
    let top_retrieved_rank = ranked.iter().position(|(position, _)| *position == 0);

    let mut selected: Vec<RankedCandidate> = ranked.iter().take(keep).map(|(_, c)| *c).collect();
    if let Some(rank_of_top) = top_retrieved_rank {
        if rank_of_top >= keep && keep > 0 {
            selected[keep - 1] = ranked[rank_of_top].1;
        }
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(cosine: f32, alignment: f32) -> CandidateFeatures {
        CandidateFeatures {
            cosine_similarity: cosine,
            skill_alignment: alignment,
            zone_distance: 0.0,
            demand_weight: 0.5,
            risk_weight: 0.5,
            keyword_overlap: 0.0,
        }
    }

    const ALIGNMENT_MODEL: &str = r#"{
        "name": "test-ranker",
        "feature_names": ["skill_alignment", "cosine_similarity"],
        "base_score": -0.5,
        "trees": [
            {"nodes": [
                {"feature": 0, "threshold": 0.5, "left": 1, "right": 2},
                {"leaf": -1.0},
                {"leaf": 1.5}
            ]},
            {"nodes": [{"leaf": 0.25}]}
        ]
    }"#;

    #[test]
    fn test_tree_ensemble_prediction() {
        let scorer = GradientBoostedScorer::from_json(ALIGNMENT_MODEL).unwrap();
        assert_eq!(scorer.name(), "test-ranker");
        assert_eq!(scorer.tree_count(), 2);

        let high = scorer.score(&features(0.1, 0.9), 0.1);
        let low = scorer.score(&features(0.9, 0.1), 0.9);
        let expected_high = 1.0 / (1.0 + (-(-0.5f32 + 1.5 + 0.25)).exp());
        assert!((high - expected_high).abs() < 1e-6);
        assert!(high > low);
    }

    #[test]
    fn test_invalid_models_are_rejected() {
        let unknown_feature = r#"{"feature_names": ["salary"], "trees": [{"nodes": [{"leaf": 0.0}]}]}"#;
        let backwards = r#"{"feature_names": ["cosine_similarity"], "trees": [{"nodes": [
            {"leaf": 0.0},
            {"feature": 0, "threshold": 0.5, "left": 0, "right": 0}
        ]}]}"#;
        let out_of_range = r#"{"feature_names": ["cosine_similarity"], "trees": [{"nodes": [
            {"feature": 3, "threshold": 0.5, "left": 1, "right": 2},
            {"leaf": 0.0},
            {"leaf": 1.0}
        ]}]}"#;
        let no_trees = r#"{"feature_names": ["cosine_similarity"], "trees": []}"#;

        for json in [unknown_feature, backwards, out_of_range, no_trees, "not json"] {
            assert!(matches!(
                GradientBoostedScorer::from_json(json),
                Err(CareerError::RankerModel(_))
            ));
        }
    }

    #[test]
    fn test_missing_model_falls_back_to_similarity() {
        let (scorer, warning) = select_scorer(Path::new("/nonexistent/career_ranker.json"));
        assert!(scorer.is_fallback());
        assert!(warning.is_some());
    }

    #[test]
    fn test_similarity_ranking_preserves_retrieval_order() {
        let candidates = vec![
            RetrievedCandidate { index: 4, similarity: 0.9 },
            RetrievedCandidate { index: 1, similarity: 0.5 },
            RetrievedCandidate { index: 2, similarity: 0.5 },
            RetrievedCandidate { index: 0, similarity: -0.2 },
            RetrievedCandidate { index: 3, similarity: -0.3 },
        ];
        let feats: Vec<CandidateFeatures> = candidates
            .iter()
            .map(|c| features(c.similarity.max(0.0), 0.0))
            .collect();

        let ranked = rank(&candidates, &feats, &SimilarityScorer, 4);
        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![4, 1, 2, 0]);
    }

    #[test]
    fn test_top_retrieved_candidate_is_never_dropped() {
        let scorer = GradientBoostedScorer::from_json(ALIGNMENT_MODEL).unwrap();
        let candidates: Vec<RetrievedCandidate> = (0..4)
            .map(|i| RetrievedCandidate { index: i, similarity: 1.0 - i as f32 * 0.1 })
            .collect();
        // The most similar candidate has the worst alignment
        let feats = vec![features(1.0, 0.0), features(0.9, 1.0), features(0.8, 1.0), features(0.7, 1.0)];

        let ranked = rank(&candidates, &feats, &scorer, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked[1].index, 0);
        assert!(ranked.iter().all(|r| candidates.iter().any(|c| c.index == r.index)));
    }

    #[test]
    fn test_constant_scores_fall_back_to_catalogue_order() {
        let json = r#"{"feature_names": ["skill_alignment"], "trees": [{"nodes": [{"leaf": 0.3}]}]}"#;
        let scorer = GradientBoostedScorer::from_json(json).unwrap();
        let candidates = vec![
            RetrievedCandidate { index: 9, similarity: 0.9 },
            RetrievedCandidate { index: 2, similarity: 0.8 },
            RetrievedCandidate { index: 5, similarity: 0.7 },
        ];
        let feats: Vec<CandidateFeatures> = candidates.iter().map(|c| features(c.similarity, 0.5)).collect();

        let ranked = rank(&candidates, &feats, &scorer, 3);
        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![2, 5, 9]);

        // Only two slots: index 9 was retrieved first, so it replaces the last one
        let ranked = rank(&candidates, &feats, &scorer, 2);
        let order: Vec<usize> = ranked.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![2, 9]);
    }

    #[test]
    fn test_similarity_scorer_separates_negative_cosines() {
        let candidates = vec![
            RetrievedCandidate { index: 6, similarity: -0.1 },
            RetrievedCandidate { index: 1, similarity: -0.4 },
        ];
        let feats = vec![features(0.0, 0.0), features(0.0, 0.0)];

        let ranked = rank(&candidates, &feats, &SimilarityScorer, 2);
        assert_eq!(ranked[0].index, 6);
        assert_eq!(ranked[0].score, -0.1);
        assert_eq!(ranked[1].index, 1);
    }

    #[test]
    fn test_top_n_is_bounded_by_candidates() {
        let candidates = vec![RetrievedCandidate { index: 7, similarity: 0.3 }];
        let ranked = rank(&candidates, &[features(0.3, 0.0)], &SimilarityScorer, 5);
        assert_eq!(ranked.len(), 1);
        assert!(rank(&[], &[], &SimilarityScorer, 5).is_empty());
    }
}
