//! Core configuration struct and loading logic.
//!
//! This module provides the main [`Config`] struct which aggregates all
//! configuration options for the corkboard application.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::ApiConfig;
use crate::columns::ColumnsConfig;
use crate::env::apply_env_overrides;
use crate::error::Result;
use crate::persistence::{Locations, read_config_file, write_config_file};

/// The main configuration struct for the corkboard application.
///
/// # Examples
///
/// ```
/// use corkboard_config::{ApiConfig, Config};
///
/// let config = Config::default();
/// assert_eq!(config.columns.defaults.len(), 4);
///
/// let config = Config {
///     api: ApiConfig::with_base_url("https://tasks.example.com/api"),
///     ..Config::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Task service connection settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Column defaults and layout storage.
    #[serde(default)]
    pub columns: ColumnsConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the default file locations and environment.
    ///
    /// Searches for configuration files in the following order:
    ///
    /// 1. Local: `./corkboard.json5` or `./corkboard.json`
    /// 2. User: `~/.config/corkboard/config.json5` or `~/.config/corkboard/config.json`
    ///
    /// If no file is found the defaults are used. `CORKBOARD_*` environment
    /// variables are applied on top either way.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is found but cannot be
    /// read or parsed, an environment variable is malformed, or the result
    /// fails validation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use corkboard_config::Config;
    ///
    /// # fn example() -> corkboard_config::Result<()> {
    /// let config = Config::load()?;
    /// println!("Task service at {}", config.api.base_url);
    /// # Ok(())
    /// # }
    /// ```
    pub fn load() -> Result<Self> {
        let mut config = match Locations::current().find_config() {
            Some(path) => read_config_file(&path)?,
            None => Self::default(),
        };
        apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a specific file, then applies environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the result
    /// fails validation.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let mut config: Config = read_config_file(path)?;
        apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a specific file without consulting the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails
    /// validation.
    pub fn read_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a file as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        write_config_file(path, self)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any section fails validation.
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;
        self.columns.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::ConfigError;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config, Config::new());
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn deserialize_partial() {
        let config: Config =
            serde_json::from_str(r#"{"api": {"base_url": "http://tasks.local/api"}}"#).unwrap();
        assert_eq!(config.api.base_url, "http://tasks.local/api");
        assert_eq!(config.columns, ColumnsConfig::default());
    }

    #[test]
    fn read_json5_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corkboard.json5");
        std::fs::write(
            &path,
            r#"
            {
                api: { base_url: "https://tasks.example.com/api", timeout_secs: 5 },
                columns: {
                    defaults: ["Backlog", "Doing", "Done"],
                    store_dir: "/srv/corkboard/columns",
                },
            }
            "#,
        )
        .unwrap();

        let config = Config::read_file(&path).unwrap();
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.columns.defaults, vec!["Backlog", "Doing", "Done"]);
        assert_eq!(
            config.columns.store_dir,
            Some(PathBuf::from("/srv/corkboard/columns"))
        );
    }

    #[test]
    fn read_file_rejects_invalid_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("corkboard.json");
        std::fs::write(&path, r#"{"columns": {"defaults": ["Done", "Done"]}}"#).unwrap();

        let err = Config::read_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColumns { .. }));
    }

    #[test]
    fn save_and_read_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let original = Config {
            api: ApiConfig::with_base_url("https://tasks.example.com/api"),
            columns: ColumnsConfig {
                defaults: vec!["Open".to_string(), "Closed".to_string()],
                store_dir: None,
            },
        };

        original.save_to(&path).unwrap();
        assert_eq!(Config::read_file(&path).unwrap(), original);
    }

    #[test]
    fn store_dir_not_serialized_when_none() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(!json.contains("store_dir"));
    }
}
