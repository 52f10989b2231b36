//! Downloading and locating Model2Vec embedding models

use crate::config::{AvailableModel, Config};
use crate::error::{Result, ScreenerError};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files fetched for a model; `model.safetensors` and `tokenizer.json` are required
const MODEL_FILES: &[(&str, bool)] = &[
    ("model.safetensors", true),
    ("tokenizer.json", true),
    ("config.json", false),
    ("README.md", false),
];

#[derive(Debug, Clone)]
pub struct ModelStatus {
    pub model: AvailableModel,
    pub downloaded: bool,
}

/// Manages the local model directory for the models listed in the configuration
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: Vec<AvailableModel>,
}

impl EmbeddingModelManager {
    pub fn new(config: &Config) -> Self {
        Self {
            models_dir: config.models_dir().clone(),
            available_models: config.models.available_models.clone(),
        }
    }

    pub fn model_dir(&self, name: &str) -> PathBuf {
        self.models_dir.join(name)
    }

    /// Resolve a model by name, repo id or case-insensitive display of either
    pub fn resolve(&self, name: &str) -> Option<&AvailableModel> {
        let lower = name.to_lowercase();
        self.available_models
            .iter()
            .find(|m| m.name == name || m.repo_id == name)
            .or_else(|| {
                self.available_models
                    .iter()
                    .find(|m| m.name.to_lowercase() == lower || m.repo_id.to_lowercase() == lower)
            })
    }

    pub async fn is_downloaded(&self, name: &str) -> bool {
        is_model_directory(&self.model_dir(name)).await
    }

    pub async fn list(&self) -> Vec<ModelStatus> {
        let mut statuses = Vec::with_capacity(self.available_models.len());
        for model in &self.available_models {
            statuses.push(ModelStatus {
                downloaded: self.is_downloaded(&model.name).await,
                model: model.clone(),
            });
        }
        statuses
    }

    /// Download a model from the Hugging Face Hub into the models directory
    pub async fn download(&self, name: &str) -> Result<PathBuf> {
        let model = self
            .resolve(name)
            .ok_or_else(|| ScreenerError::ModelLoading(format!("Unknown embedding model: {}", name)))?
            .clone();

        let model_dir = self.model_dir(&model.name);
        if self.is_downloaded(&model.name).await {
            info!("Model {} already present at {}", model.name, model_dir.display());
            return Ok(model_dir);
        }

        info!("Downloading {} ({} MB) from {}", model.name, model.size_mb, model.repo_id);
        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| ScreenerError::ModelLoading(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(model.repo_id.clone());

        for (file, required) in MODEL_FILES {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await?;
                    info!("Downloaded {}", file);
                }
                Err(e) if *required => {
                    return Err(ScreenerError::ModelLoading(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
                Err(e) => warn!("Optional file {} not available: {}", file, e),
            }
        }

        Ok(model_dir)
    }
}

async fn is_model_directory(path: &Path) -> bool {
    for (file, required) in MODEL_FILES {
        if *required && fs::metadata(path.join(file)).await.is_err() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(dir: &TempDir) -> EmbeddingModelManager {
        let mut config = Config::default();
        config.models.models_dir = dir.path().to_path_buf();
        EmbeddingModelManager::new(&config)
    }

    #[test]
    fn test_resolve_model() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);

        assert_eq!(manager.resolve("potion-base-8M").unwrap().name, "potion-base-8M");
        assert_eq!(
            manager.resolve("minishlab/potion-base-8M").unwrap().name,
            "potion-base-8M"
        );
        assert_eq!(manager.resolve("POTION-BASE-8M").unwrap().name, "potion-base-8M");
        assert!(manager.resolve("gpt-2").is_none());
    }

    #[tokio::test]
    async fn test_download_status() {
        let dir = TempDir::new().unwrap();
        let manager = manager(&dir);
        assert!(manager.list().await.iter().all(|s| !s.downloaded));

        let model_dir = manager.model_dir("potion-base-8M");
        std::fs::create_dir_all(&model_dir).unwrap();
        std::fs::write(model_dir.join("model.safetensors"), b"").unwrap();
        assert!(!manager.is_downloaded("potion-base-8M").await);

        std::fs::write(model_dir.join("tokenizer.json"), b"{}").unwrap();
        assert!(manager.is_downloaded("potion-base-8M").await);

        let statuses = manager.list().await;
        let downloaded: Vec<&str> = statuses
            .iter()
            .filter(|s| s.downloaded)
            .map(|s| s.model.name.as_str())
            .collect();
        assert_eq!(downloaded, vec!["potion-base-8M"]);
    }

    #[tokio::test]
    async fn test_unknown_model_is_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            manager(&dir).download("gpt-2").await,
            Err(ScreenerError::ModelLoading(_))
        ));
    }
}
