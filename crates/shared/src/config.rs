//! Configuration management for the Jellyfin catalog source.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// Preference store settings
    pub store: StoreConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Media server settings
    pub server: ServerConfig,

    /// Client identity reported to the server
    #[serde(default)]
    pub client: ClientConfig,

    /// Session handling
    #[serde(default)]
    pub session: SessionConfig,

    /// Episode naming settings
    #[serde(default)]
    pub episodes: EpisodeConfig,

    /// Catalog filter settings
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Preference store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store file path (relative to data directory or absolute)
    pub path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Media server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server base URL, without trailing slash
    pub base_url: String,

    /// Account used for the automatic login
    pub username: String,

    /// Password for the account (may be empty)
    #[serde(default)]
    pub password: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Client identity configuration.
///
/// The device id is not configurable; it is generated once and kept in the
/// preference store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub client_name: String,
    pub version: String,
    pub device_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_name: "jellyfin-source".to_string(),
            version: "0.1.0".to_string(),
            device_name: std::env::consts::OS.to_string(),
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Fail requests immediately when the automatic login fails.
    ///
    /// When disabled, requests are still sent with an empty token.
    pub fail_fast: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { fail_fast: true }
    }
}

/// Optional details appended to the episode info line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EpisodeDetail {
    Overview,
    Size,
    Runtime,
}

/// Episode naming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeConfig {
    /// Name template, e.g. `{number} - {title}`
    pub template: String,

    /// Text prepended to every episode title
    #[serde(default)]
    pub prefix: String,

    /// Details shown in the episode info line
    #[serde(default)]
    pub details: Vec<EpisodeDetail>,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            template: "{number} - {title}".to_string(),
            prefix: String::new(),
            details: Vec::new(),
        }
    }
}

/// Catalog filter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Library folders offered as the category filter
    #[serde(default)]
    pub categories: Vec<CategoryConfig>,
}

/// A named library folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub parent_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            store: StoreConfig {
                path: "preferences.db".to_string(),
            },
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: true,
                json_format: false,
            },
            server: ServerConfig {
                base_url: "http://localhost:8096".to_string(),
                username: "guest".to_string(),
                password: String::new(),
                timeout_secs: default_timeout_secs(),
            },
            client: ClientConfig::default(),
            session: SessionConfig::default(),
            episodes: EpisodeConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::from_file(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            Self::default()
        })
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            "Configuration saved successfully"
        );

        Ok(())
    }

    /// Get the path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the path for the preference store file
    pub fn store_path(&self) -> PathBuf {
        self.resolve(&self.store.path)
    }

    /// Get the path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.logging.log_dir)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir().join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.root_dir, "data");
        assert_eq!(config.store.path, "preferences.db");
        assert_eq!(config.server.timeout_secs, 30);
        assert_eq!(config.episodes.template, "{number} - {title}");
        assert!(config.episodes.details.is_empty());
        assert!(config.session.fail_fast);
    }

    #[test]
    fn test_save_and_load_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let mut original_config = Config::default();
        original_config.episodes.details = vec![EpisodeDetail::Size, EpisodeDetail::Runtime];
        original_config.catalog.categories.push(CategoryConfig {
            name: "Movies".to_string(),
            parent_id: "9403711afa65061e9967086eac702a66".to_string(),
        });
        original_config.save(&config_path)?;

        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path)?;
        assert_eq!(loaded_config.server.base_url, original_config.server.base_url);
        assert_eq!(
            loaded_config.episodes.details,
            vec![EpisodeDetail::Size, EpisodeDetail::Runtime]
        );
        assert_eq!(loaded_config.catalog.categories.len(), 1);
        assert_eq!(loaded_config.catalog.categories[0].name, "Movies");

        Ok(())
    }

    #[test]
    fn test_optional_sections_default() -> Result<()> {
        let content = r#"
            [data]
            root_dir = "/srv/source"

            [store]
            path = "prefs.db"

            [logging]
            log_dir = "logs"
            default_level = "debug"
            console = false
            file = true
            json_format = true

            [server]
            base_url = "http://10.20.30.50"
            username = "bijoy"
        "#;
        let config: Config = toml::from_str(content)?;

        assert_eq!(config.server.password, "");
        assert_eq!(config.server.timeout_secs, 30);
        assert!(config.session.fail_fast);
        assert_eq!(config.episodes.template, "{number} - {title}");
        assert!(config.catalog.categories.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        // Should return default config without error
        assert_eq!(config.data.root_dir, "data");
    }

    #[test]
    fn test_load_or_default_on_malformed_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[server\nbase_url = ")?;

        assert!(Config::from_file(&config_path).is_err());
        let config = Config::load_or_default(&config_path);
        assert_eq!(config.server.base_url, "http://localhost:8096");
        Ok(())
    }

    #[test]
    fn test_path_resolution() {
        let mut config = Config::default();

        assert!(config.store_path().ends_with("data/preferences.db"));
        assert!(config.log_dir().ends_with("data/logs"));

        config.store.path = "/var/lib/source/prefs.db".to_string();
        assert_eq!(config.store_path(), PathBuf::from("/var/lib/source/prefs.db"));
    }
}
