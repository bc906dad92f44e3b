//! Analysis configuration.
//!
//! Tunables for the aggregate views. Every field has a default, so an
//! empty or partial `mvnscope.toml` is valid:
//!
//! ```toml
//! other_threshold_percent = 2.0
//! top_conflicts = 10
//! max_group_entries = 10
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Default share (in percent) below which entries collapse into "Other".
pub const DEFAULT_OTHER_THRESHOLD: f64 = 2.0;

/// Default number of conflict groups kept for display.
pub const DEFAULT_TOP_CONFLICTS: usize = 10;

/// Default number of entries kept in the group-weight distribution.
pub const DEFAULT_MAX_GROUP_ENTRIES: usize = 10;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// The configuration file is not valid TOML for this schema.
    #[error("Failed to parse config: {0}")]
    TomlError(#[from] toml::de::Error),

    /// A value is outside its allowed range.
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

/// Settings for conflict and weight analysis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Entries whose share of all nodes is below this percentage are
    /// merged into a single "Other" entry.
    pub other_threshold_percent: f64,

    /// Number of conflict groups kept for display.
    pub top_conflicts: usize,

    /// Number of entries kept in the group-weight distribution.
    pub max_group_entries: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            other_threshold_percent: DEFAULT_OTHER_THRESHOLD,
            top_conflicts: DEFAULT_TOP_CONFLICTS,
            max_group_entries: DEFAULT_MAX_GROUP_ENTRIES,
        }
    }
}

impl AnalysisConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Example
    ///
    /// ```
    /// use mvnscope::config::AnalysisConfig;
    ///
    /// let config = AnalysisConfig::from_toml_str("top_conflicts = 5").unwrap();
    /// assert_eq!(config.top_conflicts, 5);
    /// assert_eq!(config.other_threshold_percent, 2.0);
    /// ```
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded analysis config");
        Ok(config)
    }

    /// Checks that all values are in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&self.other_threshold_percent) {
            return Err(ConfigError::InvalidValue(format!(
                "other_threshold_percent must be between 0 and 100, got {}",
                self.other_threshold_percent
            )));
        }
        Ok(())
    }
}
