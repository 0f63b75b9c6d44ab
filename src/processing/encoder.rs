//! Text encoders for semantic retrieval
//!
//! The primary encoder wraps a Model2Vec static model. When the model cannot
//! be loaded the engine falls back to a deterministic feature-hashing encoder,
//! so retrieval keeps working in degraded mode.

use crate::config::EncoderConfig;
use crate::error::{CareerError, Result};
use crate::processing::text_processor::TextProcessor;
use log::{debug, info, warn};
use model2vec_rs::model::StaticModel;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Maps text to a fixed-length vector; every call on one encoder returns
/// vectors of the same dimension.
pub trait VectorEncoder: Send + Sync {
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    fn encode(&self, text: &str) -> Vec<f32>;

    fn encode_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        texts.iter().map(|text| self.encode(text)).collect()
    }

    /// True for the lexical fallback encoder
    fn is_fallback(&self) -> bool {
        false
    }
}

pub struct Model2VecEncoder {
    model: StaticModel,
    model_name: String,
    dimension: usize,
}

impl Model2VecEncoder {
    pub fn load(model_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec encoder from: {}", model_path.display());

        let model = StaticModel::from_pretrained(model_path, None, None, None)?;

        let dimension = model.encode_single("occupation").len();
        if dimension == 0 {
            return Err(CareerError::Encoder(format!(
                "model {} produced an empty embedding",
                model_name
            )));
        }

        info!(
            "Encoder {} loaded in {:.2?} ({} dimensions)",
            model_name,
            start_time.elapsed(),
            dimension
        );

        Ok(Self {
            model,
            model_name: model_name.to_string(),
            dimension,
        })
    }

    fn conform(&self, mut vector: Vec<f32>) -> Vec<f32> {
        vector.resize(self.dimension, 0.0);
        for value in vector.iter_mut() {
            if !value.is_finite() {
                *value = 0.0;
            }
        }
        vector
    }
}

impl VectorEncoder for Model2VecEncoder {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encode(&self, text: &str) -> Vec<f32> {
        self.conform(self.model.encode_single(text))
    }

    fn encode_batch(&self, texts: &[String]) -> Vec<Vec<f32>> {
        self.model
            .encode(texts)
            .into_iter()
            .map(|vector| self.conform(vector))
            .collect()
    }
}

/// Signed feature hashing over unigrams and bigrams with sublinear term
/// frequency. Output is L2-normalized.
pub struct HashingEncoder {
    dimension: usize,
    processor: TextProcessor,
}

impl HashingEncoder {
    pub const NAME: &'static str = "hashing-fallback";

    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
            processor: TextProcessor::new(),
        }
    }

    fn fnv1a(term: &str) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in term.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        hash
    }
}

impl VectorEncoder for HashingEncoder {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn encode(&self, text: &str) -> Vec<f32> {
        let mut counts: std::collections::HashMap<String, f32> = std::collections::HashMap::new();
        for term in self.processor.terms_with_bigrams(text) {
            *counts.entry(term).or_insert(0.0) += 1.0;
        }

        let mut vector = vec![0.0f32; self.dimension];
        for (term, count) in counts {
            let hash = Self::fnv1a(&term);
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if (hash >> 63) & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign * (1.0 + count.ln());
        }

        l2_normalize(&mut vector);
        vector
    }

    fn is_fallback(&self) -> bool {
        true
    }
}

pub fn l2_normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 && norm.is_finite() {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

/// Resolve the configured model to a local directory when one exists,
/// otherwise hand the repo id to the model loader.
pub fn resolve_model_location(config: &EncoderConfig) -> PathBuf {
    let direct = PathBuf::from(&config.model);
    if direct.exists() {
        return direct;
    }

    let by_name = config.models_dir.join(&config.model);
    if by_name.exists() {
        return by_name;
    }

    if let Some(short_name) = config.model.rsplit('/').next() {
        let by_short_name = config.models_dir.join(short_name);
        if by_short_name.exists() {
            return by_short_name;
        }
    }

    direct
}

/// Pick the encoder for a snapshot. The returned string, when present,
/// explains why the fallback encoder is in use.
pub fn select_encoder(config: &EncoderConfig) -> (Arc<dyn VectorEncoder>, Option<String>) {
    let fallback = || Arc::new(HashingEncoder::new(config.fallback_dimension)) as Arc<dyn VectorEncoder>;

    if !config.enabled {
        debug!("Semantic encoder disabled, using hashing encoder");
        return (fallback(), None);
    }

    let location = resolve_model_location(config);
    match Model2VecEncoder::load(&location, &config.model) {
        Ok(encoder) => (Arc::new(encoder), None),
        Err(e) => {
            warn!("Falling back to hashing encoder: {}", e);
            (
                fallback(),
                Some(format!(
                    "semantic encoder '{}' unavailable ({}); using lexical hashing encoder",
                    config.model, e
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_hashing_encoder_is_deterministic_and_normalized() {
        let encoder = HashingEncoder::new(64);
        let a = encoder.encode("software developer building web applications");
        let b = encoder.encode("software developer building web applications");

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_hashing_encoder_prefers_shared_vocabulary() {
        let encoder = HashingEncoder::new(256);
        let query = encoder.encode("python programming data analysis");
        let close = encoder.encode("data analysis with python programming");
        let far = encoder.encode("nursing patient care hospital ward");

        assert!(dot(&query, &close) > dot(&query, &far));
    }

    #[test]
    fn test_empty_text_encodes_to_zero_vector() {
        let encoder = HashingEncoder::new(32);
        let vector = encoder.encode("   ");
        assert!(vector.iter().all(|v| *v == 0.0));
        assert_eq!(dot(&vector, &vector), 0.0);
    }

    #[test]
    fn test_l2_normalize_leaves_zero_vectors() {
        let mut zero = vec![0.0; 4];
        l2_normalize(&mut zero);
        assert!(zero.iter().all(|v| *v == 0.0));

        let mut vector = vec![3.0, 4.0];
        l2_normalize(&mut vector);
        assert!((vector[0] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_missing_model_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        // An existing but empty model directory keeps the loader offline
        std::fs::create_dir_all(temp_dir.path().join("empty-model")).unwrap();
        let config = EncoderConfig {
            enabled: true,
            model: temp_dir.path().join("empty-model").to_string_lossy().into_owned(),
            models_dir: temp_dir.path().to_path_buf(),
            fallback_dimension: 48,
        };

        let (encoder, warning) = select_encoder(&config);
        assert!(encoder.is_fallback());
        assert_eq!(encoder.dimension(), 48);
        assert!(warning.is_some());
    }

    #[test]
    fn test_disabled_encoder_uses_fallback_silently() {
        let config = EncoderConfig {
            enabled: false,
            model: "minishlab/potion-base-8M".to_string(),
            models_dir: PathBuf::from("/nonexistent"),
            fallback_dimension: 16,
        };
        let (encoder, warning) = select_encoder(&config);
        assert_eq!(encoder.name(), HashingEncoder::NAME);
        assert!(warning.is_none());
    }
}
