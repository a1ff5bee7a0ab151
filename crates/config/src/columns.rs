//! Column layout settings.
//!
//! This module provides [`ColumnsConfig`]: the column set new projects start
//! with and where per-project layouts are stored.

use std::collections::HashSet;
use std::path::PathBuf;

use corkboard_protocol::default_column_names;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::persistence::Locations;

/// Configuration for board columns.
///
/// # Examples
///
/// ```
/// use corkboard_config::ColumnsConfig;
///
/// let config = ColumnsConfig::default();
/// assert_eq!(config.defaults.len(), 4);
/// assert!(config.store_dir.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnsConfig {
    /// Ordered column names for projects without a stored layout.
    #[serde(default = "default_column_names")]
    pub defaults: Vec<String>,

    /// Directory holding one layout file per project.
    ///
    /// Falls back to the user data directory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            defaults: default_column_names(),
            store_dir: None,
        }
    }
}

impl ColumnsConfig {
    /// Returns the directory column layouts are stored in.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is configured and the user data
    /// directory cannot be determined.
    pub fn resolved_store_dir(&self) -> Result<PathBuf> {
        match &self.store_dir {
            Some(dir) => Ok(dir.clone()),
            None => Locations::current().columns_dir(),
        }
    }

    /// Validates the default column set.
    ///
    /// # Errors
    ///
    /// Returns an error if the set is empty, contains a blank name, or
    /// contains the same name twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use corkboard_config::ColumnsConfig;
    ///
    /// let mut config = ColumnsConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.defaults.push("To Do".to_string());
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.defaults.is_empty() {
            return Err(ConfigError::InvalidColumns {
                reason: "at least one default column is required".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for name in &self.defaults {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidColumns {
                    reason: "column names cannot be blank".to_string(),
                });
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::InvalidColumns {
                    reason: format!("duplicate column name \"{name}\""),
                });
            }
        }

        Ok(())
    }
}
