//! Configuration validation.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Check that the loaded values can actually serve requests.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.model.name.is_empty() {
            return Err(ConfigError::ValidationError(
                "model.name must not be empty".into(),
            ));
        }
        if self.model.base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "model.base_url must not be empty".into(),
            ));
        }
        if self.model.allowed_mime_types.is_empty() {
            return Err(ConfigError::ValidationError(
                "model.allowed_mime_types must not be empty".into(),
            ));
        }
        if self.openrouter.enabled && self.openrouter.base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "openrouter.base_url must not be empty when openrouter is enabled".into(),
            ));
        }
        for model in &self.openrouter.models {
            if model.name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "openrouter.models entries must have a name".into(),
                ));
            }
        }
        Ok(())
    }
}
