//! Embedding backends and vector similarity

use crate::config::Config;
use crate::error::{Result, ScreenerError};
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Turns text into fixed-length dense vectors.
///
/// Implementations must be deterministic and safe to share between threads;
/// one instance is built per process and reused for every screening.
pub trait Embedder: Send + Sync {
    /// Encode `texts` in order, one vector per text
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn encode_single(&self, text: &str) -> Result<Vec<f32>> {
        self.encode(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| ScreenerError::Embedding("Embedder returned no vector".to_string()))
    }

    fn model_name(&self) -> &str;
}

/// Model2Vec static embeddings
pub struct Model2VecEmbedder {
    model: StaticModel,
    model_name: String,
    max_tokens: usize,
    batch_size: usize,
}

impl Model2VecEmbedder {
    /// Load from a local model directory or a Hugging Face repo id
    pub fn load(repo_or_path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let start_time = Instant::now();
        let repo_or_path = repo_or_path.as_ref();

        info!("Loading Model2Vec embedding model from: {}", repo_or_path.display());

        let model = StaticModel::from_pretrained(repo_or_path, None, None, None)
            .map_err(|e| ScreenerError::ModelLoading(format!(
                "Failed to load embedding model '{}': {}",
                repo_or_path.display(),
                e
            )))?;

        info!("Model loaded successfully in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: repo_or_path.to_string_lossy().into_owned(),
            max_tokens: config.models.max_tokens,
            batch_size: config.models.batch_size.max(1),
        })
    }

    /// Load the configured default model, or `model` when given
    pub fn from_config(config: &Config, model: Option<&str>) -> Result<Self> {
        let name = model.unwrap_or(&config.models.default_embedding_model);
        let location = Self::resolve_location(config, name);
        Self::load(location, config)
    }

    /// Prefer a downloaded copy under the models directory, then the registry repo id
    fn resolve_location(config: &Config, name: &str) -> PathBuf {
        let local_path = config.models_dir().join(name);
        if local_path.exists() {
            return local_path;
        }

        match config.get_model_by_name(name) {
            Some(model) => {
                let local_path = config.models_dir().join(&model.name);
                if local_path.exists() {
                    local_path
                } else {
                    PathBuf::from(&model.repo_id)
                }
            }
            None => PathBuf::from(name),
        }
    }
}

impl Embedder for Model2VecEmbedder {
    fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let start_time = Instant::now();
        let embeddings = self
            .model
            .encode_with_args(texts, Some(self.max_tokens), self.batch_size);

        if embeddings.len() != texts.len() {
            return Err(ScreenerError::Embedding(format!(
                "Expected {} embeddings, model returned {}",
                texts.len(),
                embeddings.len()
            )));
        }

        debug!("Encoded {} texts in {:.2?}", texts.len(), start_time.elapsed());
        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Cosine similarity between two embeddings.
///
/// Zero-norm vectors score 0. The result is always finite.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ScreenerError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let score = dot_product / (norm_a * norm_b);
    if score.is_finite() {
        Ok(score.clamp(-1.0, 1.0))
    } else {
        Ok(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors() {
        let v = vec![0.3, -1.2, 4.0];
        let score = cosine_similarity(&v, &v).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_and_opposite_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 0.0);
        let opposite = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((opposite + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_dimension_mismatch_is_an_error() {
        assert!(matches!(
            cosine_similarity(&[1.0], &[1.0, 2.0]),
            Err(ScreenerError::Embedding(_))
        ));
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("no-such-model");
        std::fs::create_dir_all(&missing).unwrap();

        let result = Model2VecEmbedder::load(&missing, &Config::default());
        assert!(matches!(result, Err(ScreenerError::ModelLoading(_))));
    }
}
