use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{bayes::DEFAULT_ALPHA, dataset::DatasetConfig};

/// Everything one train/evaluate run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub dataset: DatasetConfig,
    pub train_fraction: f64,
    /// Seed for the train/test shuffle.
    pub seed: u64,
    pub alpha: f64,
    pub stop_words: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            train_fraction: 0.8,
            seed: 42,
            alpha: DEFAULT_ALPHA,
            stop_words: false,
        }
    }
}

/// Load an experiment configuration from a JSON file. Missing keys fall back
/// to their defaults.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ExperimentConfig> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config: {}", path.as_ref().display()))?;
    let config: ExperimentConfig = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}
