//! Configuration types for QueryEngine

use crate::error::{Result, SdkError};
use flowq_runtime::DEFAULT_REGEX_SIZE_LIMIT;
use serde::{Deserialize, Serialize};

/// Main engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cache compiled paths by their text
    pub enable_path_cache: bool,

    /// Compiled-size budget for `matches` patterns, in bytes
    pub regex_size_limit: usize,

    /// Log contained evaluation failures at warn level (debug otherwise)
    pub log_failures: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            enable_path_cache: true,
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
            log_failures: true,
        }
    }

    /// Parse a configuration from JSON; absent fields keep their defaults
    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).map_err(|e| SdkError::ConfigError(e.to_string()))
    }

    /// Enable path caching
    pub fn enable_path_cache(mut self, enable: bool) -> Self {
        self.enable_path_cache = enable;
        self
    }

    /// Set the regex size budget
    pub fn with_regex_size_limit(mut self, limit: usize) -> Self {
        self.regex_size_limit = limit;
        self
    }

    /// Log contained failures at warn level
    pub fn log_failures(mut self, enable: bool) -> Self {
        self.log_failures = enable;
        self
    }

    /// Check the configuration for values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.regex_size_limit == 0 {
            return Err(SdkError::ConfigError(
                "regex_size_limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.enable_path_cache);
        assert!(config.log_failures);
        assert_eq!(config.regex_size_limit, 1 << 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_setters() {
        let config = EngineConfig::new()
            .enable_path_cache(false)
            .with_regex_size_limit(4096)
            .log_failures(false);
        assert!(!config.enable_path_cache);
        assert_eq!(config.regex_size_limit, 4096);
        assert!(!config.log_failures);
    }

    #[test]
    fn test_from_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{"log_failures": false}"#).unwrap();
        assert!(!config.log_failures);
        assert!(config.enable_path_cache);

        assert!(EngineConfig::from_json_str("{oops").is_err());
    }

    #[test]
    fn test_zero_regex_budget_is_rejected() {
        let config = EngineConfig::new().with_regex_size_limit(0);
        assert!(matches!(config.validate(), Err(SdkError::ConfigError(_))));
    }
}
