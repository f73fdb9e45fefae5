//! Configuration management for econet.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `econet.toml` file
//! 3. User config `~/.config/econet/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::interactions::SubjectFilter;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Species roster source.
    pub roster: RosterConfig,

    /// Interaction lookup service.
    pub interactions: InteractionsConfig,

    /// Species metadata service.
    pub metadata: MetadataConfig,

    /// Graph construction options.
    pub graph: GraphConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./econet.toml` (project local)
    /// 2. `~/.config/econet/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides are applied in every case.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(LOCAL_CONFIG_FILE).exists() {
            return Self::from_file(LOCAL_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(path) = std::env::var("ECONET_ROSTER_PATH") {
            self.roster.path = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var("ECONET_GLOBI_URL") {
            self.interactions.base_url = url;
        }
        if let Ok(url) = std::env::var("ECONET_INAT_URL") {
            self.metadata.base_url = url;
        }
        if let Ok(secs) = std::env::var("ECONET_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("ECONET_TIMEOUT_SECS={secs}")))?;
            self.interactions.timeout_secs = secs;
            self.metadata.timeout_secs = secs;
        }
        if let Ok(enabled) = std::env::var("ECONET_METADATA_ENABLED") {
            self.metadata.enabled = matches!(
                enabled.to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        Ok(())
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interactions.timeout_secs == 0 || self.metadata.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".to_string()));
        }
        if self.interactions.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("interactions.base_url is empty".to_string()));
        }
        if self.metadata.enabled && self.metadata.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("metadata.base_url is empty".to_string()));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Roster CSV configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Path to the roster CSV.
    pub path: PathBuf,

    /// Zero-based index of the scientific-name column.
    pub name_column: usize,

    /// Leading rows to skip before species records begin.
    pub header_rows: usize,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_ROSTER_PATH),
            name_column: DEFAULT_NAME_COLUMN,
            header_rows: DEFAULT_HEADER_ROWS,
        }
    }
}

/// Interaction lookup configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionsConfig {
    /// Base URL of the interaction API.
    pub base_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// How strictly record subjects must match the queried species.
    pub subject_filter: SubjectFilter,
}

impl Default for InteractionsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GLOBI_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            subject_filter: SubjectFilter::default(),
        }
    }
}

impl InteractionsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Metadata resolver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Whether nodes are decorated with common names and categories.
    pub enabled: bool,

    /// Base URL of the taxonomy API.
    pub base_url: String,

    /// Bearer token. When absent, the `token_env` variable is used.
    #[serde(skip_serializing)]
    pub api_token: Option<String>,

    /// Environment variable re-read when the token must be refreshed.
    pub token_env: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Minimum spacing between requests in milliseconds.
    pub min_interval_ms: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_INAT_URL.to_string(),
            api_token: None,
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            min_interval_ms: DEFAULT_METADATA_INTERVAL_MS,
        }
    }
}

impl MetadataConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

/// Graph construction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Species whose relations are expanded. Empty means the whole roster.
    pub subjects: Vec<String>,

    /// Also query predators of each subject.
    pub include_predators: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.roster.name_column, DEFAULT_NAME_COLUMN);
        assert_eq!(config.roster.header_rows, DEFAULT_HEADER_ROWS);
        assert_eq!(config.interactions.base_url, DEFAULT_GLOBI_URL);
        assert_eq!(config.metadata.min_interval_ms, DEFAULT_METADATA_INTERVAL_MS);
        assert!(config.metadata.enabled);
        assert!(config.graph.subjects.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[roster]"));
        assert!(toml_str.contains("[interactions]"));
        assert!(toml_str.contains("[metadata]"));
        assert!(toml_str.contains("[graph]"));
    }

    #[test]
    fn test_token_not_serialized() {
        let mut config = Config::default();
        config.metadata.api_token = Some("secret-token".to_string());
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(!toml_str.contains("secret-token"));
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let mut config = Config::default();
        config.interactions.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
