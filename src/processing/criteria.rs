//! Job criteria: definitions, validation and extraction from job descriptions

use crate::error::{Result, ScreenerError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Position of a criterion within its job's ordered criteria list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriterionId(pub usize);

/// A single weighted requirement of a job posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionSpec {
    pub text: String,
    #[serde(default = "default_weight")]
    pub weight: f32,
    #[serde(default)]
    pub required: bool,
}

fn default_weight() -> f32 {
    1.0
}

impl CriterionSpec {
    pub fn new(text: impl Into<String>, weight: f32, required: bool) -> Self {
        Self {
            text: text.into(),
            weight,
            required,
        }
    }

    pub fn optional(text: impl Into<String>, weight: f32) -> Self {
        Self::new(text, weight, false)
    }

    pub fn required(text: impl Into<String>, weight: f32) -> Self {
        Self::new(text, weight, true)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CriteriaFile {
    #[serde(default)]
    criteria: Vec<CriterionSpec>,
}

/// Reject criteria that would make scores meaningless.
///
/// Duplicate texts are allowed; each entry is scored on its own.
pub fn validate_criteria(criteria: &[CriterionSpec]) -> Result<()> {
    for (index, criterion) in criteria.iter().enumerate() {
        if criterion.text.trim().is_empty() {
            return Err(ScreenerError::InvalidCriterion {
                index,
                reason: "text is empty".to_string(),
            });
        }
        if !criterion.weight.is_finite() || criterion.weight <= 0.0 {
            return Err(ScreenerError::InvalidCriterion {
                index,
                reason: format!("weight must be a positive number, got {}", criterion.weight),
            });
        }
    }
    Ok(())
}

/// Turn the bullet points of a job description into criteria.
///
/// Every line starting with `•`, `-` or `*` becomes an optional criterion of weight 1.
pub fn extract_criteria(job_description: &str) -> Vec<CriterionSpec> {
    job_description
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix(['•', '-', '*']))
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| CriterionSpec::optional(text, 1.0))
        .collect()
}

/// Load criteria from a TOML file of `[[criteria]]` tables
pub fn load_criteria(path: &Path) -> Result<Vec<CriterionSpec>> {
    let content = std::fs::read_to_string(path)?;
    let file: CriteriaFile = toml::from_str(&content)?;
    validate_criteria(&file.criteria)?;
    Ok(file.criteria)
}

pub fn save_criteria(path: &Path, criteria: &[CriterionSpec]) -> Result<()> {
    let file = CriteriaFile {
        criteria: criteria.to_vec(),
    };
    std::fs::write(path, toml::to_string_pretty(&file)?)?;
    Ok(())
}
