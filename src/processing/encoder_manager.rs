//! Encoder model management for downloading Model2Vec models

use crate::error::{CareerError, Result};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Information about a downloadable encoder model
#[derive(Debug, Clone, Serialize)]
pub struct EncoderModelInfo {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    pub dimensions: u32,
}

/// Handles download and discovery of encoder models under the models dir
pub struct EncoderModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, EncoderModelInfo>,
    downloaded_models: BTreeSet<String>,
}

impl EncoderModelManager {
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        if !models_dir.exists() {
            fs::create_dir_all(&models_dir).await.map_err(|e| {
                CareerError::Encoder(format!("Failed to create models directory: {}", e))
            })?;
        }

        let mut manager = Self {
            models_dir,
            available_models: Self::known_models(),
            downloaded_models: BTreeSet::new(),
        };

        manager.scan_downloaded_models().await?;
        Ok(manager)
    }

    fn known_models() -> BTreeMap<String, EncoderModelInfo> {
        let mut models = BTreeMap::new();

        models.insert(
            "potion-base-8M".to_string(),
            EncoderModelInfo {
                name: "Potion Base 8M".to_string(),
                repo_id: "minishlab/potion-base-8M".to_string(),
                size_mb: 33,
                description: "Default static embeddings for occupation retrieval".to_string(),
                dimensions: 256,
            },
        );

        models.insert(
            "potion-base-32M".to_string(),
            EncoderModelInfo {
                name: "Potion Base 32M".to_string(),
                repo_id: "minishlab/potion-base-32M".to_string(),
                size_mb: 130,
                description: "Larger vocabulary, better recall on niche job titles".to_string(),
                dimensions: 512,
            },
        );

        models.insert(
            "potion-multilingual-128M".to_string(),
            EncoderModelInfo {
                name: "Potion Multilingual 128M".to_string(),
                repo_id: "minishlab/potion-multilingual-128M".to_string(),
                size_mb: 500,
                description: "Multilingual embeddings for mixed English/Kiswahili profiles".to_string(),
                dimensions: 256,
            },
        );

        models
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() && Self::is_valid_model_directory(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    async fn is_valid_model_directory(path: &Path) -> bool {
        for file in ["tokenizer.json", "model.safetensors", "config.json"] {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    /// Download a model from the Hugging Face Hub into `<models_dir>/<model_id>`
    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let model_id = self
            .resolve_model_id(model_id)
            .ok_or_else(|| CareerError::Encoder(format!("Unknown encoder model: {}", model_id)))?;
        let model_info = self
            .available_models
            .get(&model_id)
            .cloned()
            .ok_or_else(|| CareerError::Encoder(format!("Unknown encoder model: {}", model_id)))?;

        let model_dir = self.models_dir.join(&model_id);
        if self.downloaded_models.contains(&model_id) {
            return Ok(model_dir);
        }

        info!(
            "Downloading encoder model {} ({} MB) from {}",
            model_info.name, model_info.size_mb, model_info.repo_id
        );

        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| CareerError::Encoder(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(model_info.repo_id.clone());

        for file in ["model.safetensors", "tokenizer.json", "config.json", "README.md"] {
            match repo.get(file).await {
                Ok(cached_path) => {
                    fs::copy(&cached_path, model_dir.join(file)).await.map_err(|e| {
                        CareerError::Encoder(format!("Failed to copy {}: {}", file, e))
                    })?;
                    info!("Downloaded {}", file);
                }
                Err(e) if file == "README.md" => {
                    warn!("Optional file {} not found: {}", file, e);
                }
                Err(e) => {
                    return Err(CareerError::Encoder(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
            }
        }

        self.downloaded_models.insert(model_id);
        Ok(model_dir)
    }

    pub fn list_available_models(&self) -> Vec<(&str, &EncoderModelInfo)> {
        self.available_models
            .iter()
            .map(|(id, info)| (id.as_str(), info))
            .collect()
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Accepts a model id, a repo id or a display name (case-insensitive)
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.available_models.contains_key(input) {
            return Some(input.to_string());
        }

        let lower = input.to_lowercase();
        self.available_models
            .iter()
            .find(|(_, info)| info.repo_id == input || info.name.to_lowercase() == lower)
            .map(|(id, _)| id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_manager_creation() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EncoderModelManager::new(temp_dir.path().join("models")).await.unwrap();
        assert!(!manager.list_available_models().is_empty());
        assert!(!manager.is_model_downloaded("potion-base-8M"));
    }

    #[tokio::test]
    async fn test_resolve_model_id() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EncoderModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();

        assert_eq!(manager.resolve_model_id("potion-base-8M"), Some("potion-base-8M".to_string()));
        assert_eq!(
            manager.resolve_model_id("minishlab/potion-base-8M"),
            Some("potion-base-8M".to_string())
        );
        assert_eq!(manager.resolve_model_id("potion base 8m"), Some("potion-base-8M".to_string()));
        assert_eq!(manager.resolve_model_id("bert-base"), None);
    }

    #[tokio::test]
    async fn test_existing_model_directory_is_detected() {
        let temp_dir = TempDir::new().unwrap();
        let model_dir = temp_dir.path().join("potion-base-8M");
        std::fs::create_dir_all(&model_dir).unwrap();
        for file in ["tokenizer.json", "model.safetensors", "config.json"] {
            std::fs::write(model_dir.join(file), b"{}").unwrap();
        }

        let manager = EncoderModelManager::new(temp_dir.path().to_path_buf()).await.unwrap();
        assert!(manager.is_model_downloaded("potion-base-8M"));
    }
}
