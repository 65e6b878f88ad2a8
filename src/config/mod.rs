//! Configuration loading and management

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::error::ConfigError;

/// Tunables for the filter/cache machinery of one host application
///
/// Defaults match observed production behavior: 300 ms search debounce,
/// 20 items per page, one-hour filter snapshots, five-minute query cache.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ClientConfig {
    /// Search debounce interval in milliseconds
    #[validate(range(min = 50, max = 5000))]
    pub debounce_ms: u64,

    /// Default page size for list queries
    #[validate(range(min = 1, max = 100))]
    pub default_limit: u32,

    /// Freshness window for persisted filter snapshots, in seconds
    #[validate(range(min = 1))]
    pub filter_cache_max_age_secs: u64,

    /// Freshness window for cached query pages, in seconds
    #[validate(range(min = 1))]
    pub query_cache_max_age_secs: u64,

    /// Version tag stamped into persisted filter snapshots; bump it to
    /// invalidate snapshots from older builds
    pub filter_cache_version: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            default_limit: 20,
            filter_cache_max_age_secs: 60 * 60,
            query_cache_max_age_secs: 5 * 60,
            filter_cache_version: "v1".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }

    /// Search debounce interval
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Freshness window for persisted filter snapshots
    pub fn filter_cache_max_age(&self) -> Duration {
        Duration::from_secs(self.filter_cache_max_age_secs)
    }

    /// Freshness window for cached query pages
    pub fn query_cache_max_age(&self) -> Duration {
        Duration::from_secs(self.query_cache_max_age_secs)
    }
}
