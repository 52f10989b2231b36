//! Configuration management for the candidate screener

use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub models: ModelConfig,
    pub extraction: ExtractionConfig,
    pub analysis: AnalysisConfig,
    pub scoring: ScoringConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_embedding_model: String,
    /// Texts are truncated to this many tokens before pooling
    pub max_tokens: usize,
    pub batch_size: usize,
    pub available_models: Vec<AvailableModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableModel {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub dimensions: u32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Lines at or above this many characters are never taken as the candidate name
    pub name_max_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub include_default_skills: bool,
    pub extra_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Semantic similarity above which a criterion counts as met
    pub similarity_threshold: f32,
    /// Points the overall similarity bonus can contribute
    pub similarity_bonus: f32,
    /// Minimum percentage for a pass verdict
    pub pass_mark: f32,
    pub clamp_score: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".candidate-screener")
            .join("models");

        Self {
            models_dir,
            default_embedding_model: "potion-base-8M".to_string(),
            max_tokens: 512,
            batch_size: 32,
            available_models: vec![
                AvailableModel {
                    name: "potion-base-8M".to_string(),
                    repo_id: "minishlab/potion-base-8M".to_string(),
                    size_mb: 33,
                    dimensions: 256,
                    description: "Compact static embeddings, good default for screening".to_string(),
                },
                AvailableModel {
                    name: "m2v-base".to_string(),
                    repo_id: "minishlab/M2V_base_output".to_string(),
                    size_mb: 90,
                    dimensions: 256,
                    description: "Model2Vec base embeddings model".to_string(),
                },
                AvailableModel {
                    name: "m2v-large".to_string(),
                    repo_id: "minishlab/M2V_large_output".to_string(),
                    size_mb: 250,
                    dimensions: 512,
                    description: "Higher-capacity Model2Vec embeddings model".to_string(),
                },
            ],
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self { name_max_length: 60 }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            include_default_skills: true,
            extra_skills: Vec::new(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.70,
            similarity_bonus: 10.0,
            pass_mark: 50.0,
            clamp_score: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
        }
    }
}

impl Config {
    /// Load from the user config directory, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("candidate-screener")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        let scoring = &self.scoring;
        if !(0.0..=1.0).contains(&scoring.similarity_threshold) {
            return Err(ScreenerError::Configuration(format!(
                "scoring.similarity_threshold must be within [0, 1], got {}",
                scoring.similarity_threshold
            )));
        }
        if !scoring.similarity_bonus.is_finite() || scoring.similarity_bonus < 0.0 {
            return Err(ScreenerError::Configuration(format!(
                "scoring.similarity_bonus must be a non-negative number, got {}",
                scoring.similarity_bonus
            )));
        }
        if !scoring.pass_mark.is_finite() {
            return Err(ScreenerError::Configuration(
                "scoring.pass_mark must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }

    pub fn get_model_by_name(&self, name: &str) -> Option<&AvailableModel> {
        self.models
            .available_models
            .iter()
            .find(|m| m.name == name || m.repo_id == name)
    }
}
