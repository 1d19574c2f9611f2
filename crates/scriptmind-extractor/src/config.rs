//! Configuration for the Extractor

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the extraction pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Chunk window size (characters)
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    pub chunk_overlap: usize,

    /// How far back from a window edge to look for a line break (characters)
    pub newline_search_window: usize,

    /// Maximum time for a single extraction call (seconds)
    pub extraction_timeout_secs: u64,

    /// Extraction calls in flight per category; 1 means sequential
    pub max_concurrency: usize,

    /// Error characters kept in a placeholder diagnostic
    pub diagnostic_chars: usize,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.chunk_size == 0 {
            return Err(invalid("chunk_size must be greater than 0"));
        }
        if self.chunk_overlap == 0 {
            return Err(invalid("chunk_overlap must be greater than 0"));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(invalid("chunk_overlap must be smaller than chunk_size"));
        }
        if self.extraction_timeout_secs == 0 {
            return Err(invalid("extraction_timeout_secs must be greater than 0"));
        }
        if self.max_concurrency == 0 {
            return Err(invalid("max_concurrency must be greater than 0"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> ExtractorError {
    ExtractorError::InvalidConfiguration(message.to_string())
}

impl Default for ExtractorConfig {
    /// Default configuration: 6000/500 character windows, sequential calls
    fn default() -> Self {
        Self {
            chunk_size: 6000,
            chunk_overlap: 500,
            newline_search_window: 200,
            extraction_timeout_secs: 120,
            max_concurrency: 1,
            diagnostic_chars: 200,
        }
    }
}

impl ExtractorConfig {
    /// Aggressive preset: smaller chunks, shorter timeouts, parallel calls
    pub fn aggressive() -> Self {
        Self {
            chunk_size: 4000,
            chunk_overlap: 300,
            newline_search_window: 200,
            extraction_timeout_secs: 60,
            max_concurrency: 4,
            diagnostic_chars: 200,
        }
    }

    /// Lenient preset: larger chunks and longer timeouts for slow local models
    pub fn lenient() -> Self {
        Self {
            chunk_size: 10_000,
            chunk_overlap: 800,
            newline_search_window: 400,
            extraction_timeout_secs: 300,
            max_concurrency: 1,
            diagnostic_chars: 200,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| invalid(&format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self).map_err(|e| invalid(&format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_size, 6000);
        assert_eq!(config.chunk_overlap, 500);
        assert_eq!(config.extraction_timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ExtractorConfig::aggressive().validate().is_ok());
        assert!(ExtractorConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_overlap_must_be_smaller_than_window() {
        let config = ExtractorConfig {
            chunk_size: 500,
            chunk_overlap: 500,
            ..ExtractorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ExtractorError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_concurrency_is_invalid() {
        let config = ExtractorConfig {
            max_concurrency: 0,
            ..ExtractorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::aggressive();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ExtractorConfig::from_toml("max_concurrency = 3").unwrap();
        assert_eq!(parsed.max_concurrency, 3);
        assert_eq!(parsed.chunk_size, 6000);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(ExtractorConfig::from_toml("chunk_size = 10\nchunk_overlap = 20").is_err());
    }
}
