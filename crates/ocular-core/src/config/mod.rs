//! Configuration management for Ocular.
//!
//! Configuration is loaded from a YAML file passed on the command line.
//! All sections and fields are optional; missing values fall back to the
//! defaults on each struct. A missing file is an error — startup aborts
//! rather than silently serving defaults.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Local model settings
    pub model: ModelConfig,

    /// Routed backend (OpenRouter) settings
    pub openrouter: OpenRouterConfig,

    /// Application metadata
    pub app: AppMeta,
}

impl Config {
    /// Load configuration from a specific file path.
    ///
    /// Fails if the file is missing or unparsable, validates the result,
    /// and partitions the sampling arguments into standard/extra buckets.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        config.model.partition_sampling_args();
        Ok(config)
    }

    /// Serialize the config to a YAML string.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
