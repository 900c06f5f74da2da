//! Configuration validation and error reporting

use super::types::Config;
use crate::error::{ConfigError, Result};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the configuration is invalid.
    pub fn validate(config: &Config) -> Result<()> {
        if config.sync_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "sync interval must be at least 1 second".to_string(),
            ));
        }

        if config.log_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("log path cannot be empty".to_string()));
        }

        for pattern in &config.exclude {
            if pattern.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "exclude pattern cannot be empty".to_string(),
                ));
            }
        }

        for pattern in &config.include {
            if pattern.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "include pattern cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
