//! Configuration for the tile decode pipeline.

use alert_common::{AlertError, AlertResult};
use serde::{Deserialize, Serialize};

/// Tunables for [`crate::TileDecodePipeline`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of decoded tiles kept in the cache.
    pub cache_entries: usize,

    /// Minimum pixels in a tile before rows are decoded in parallel.
    pub parallel_threshold: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            // 512 tiles of 256x256 RGBA is 128 MB
            cache_entries: 512,
            parallel_threshold: 4096, // 64x64 or larger
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("DECODE_CACHE_ENTRIES") {
            if let Ok(entries) = val.parse() {
                config.cache_entries = entries;
            }
        }

        if let Ok(val) = std::env::var("DECODE_PARALLEL_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                config.parallel_threshold = threshold;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> AlertResult<()> {
        if self.cache_entries == 0 {
            return Err(AlertError::Config("cache_entries must be > 0".to_string()));
        }

        if self.parallel_threshold == 0 {
            return Err(AlertError::Config("parallel_threshold must be > 0".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        let config = PipelineConfig {
            cache_entries: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            parallel_threshold: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
