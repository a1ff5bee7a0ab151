//! Where corkboard keeps its files, and how config files are read and
//! written.
//!
//! Config files are JSON5 (plain JSON parses too) and are written back as
//! pretty-printed JSON. [`Locations`] decides which file is used:
//!
//! 1. `corkboard.json5` or `corkboard.json` in the working directory
//! 2. `config.json5` or `config.json` in the user config directory
//!    (`~/.config/corkboard/` on Linux)
//!
//! Per-project column layouts go to the user data directory
//! (`~/.local/share/corkboard/columns/` on Linux) unless configured.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ConfigError, Result};

const LOCAL_FILE_NAMES: [&str; 2] = ["corkboard.json5", "corkboard.json"];
const USER_FILE_NAMES: [&str; 2] = ["config.json5", "config.json"];
const APP_DIR: &str = "corkboard";
const COLUMNS_DIR: &str = "columns";

/// The directories corkboard looks in.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use corkboard_config::persistence::Locations;
///
/// let locations = Locations {
///     working_dir: Path::new("/work").to_path_buf(),
///     config_dir: None,
///     data_dir: Some(Path::new("/data").to_path_buf()),
/// };
/// assert_eq!(
///     locations.columns_dir().unwrap(),
///     Path::new("/data/corkboard/columns")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locations {
    /// Searched first for `corkboard.json5`/`corkboard.json`.
    pub working_dir: PathBuf,
    /// Platform config directory, without the `corkboard` component.
    pub config_dir: Option<PathBuf>,
    /// Platform data directory, without the `corkboard` component.
    pub data_dir: Option<PathBuf>,
}

impl Locations {
    /// Returns the locations of the current user and working directory.
    #[must_use]
    pub fn current() -> Self {
        Self {
            working_dir: PathBuf::from("."),
            config_dir: dirs::config_dir(),
            data_dir: dirs::data_dir(),
        }
    }

    /// Returns the first config file that exists.
    #[must_use]
    pub fn find_config(&self) -> Option<PathBuf> {
        let local = LOCAL_FILE_NAMES.iter().map(|name| self.working_dir.join(name));
        let user = self
            .config_dir
            .iter()
            .flat_map(|dir| USER_FILE_NAMES.iter().map(move |name| dir.join(APP_DIR).join(name)));
        local.chain(user).find(|path| path.is_file())
    }

    /// Returns the directory holding per-project column layouts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHomeDirectory`] if there is no data
    /// directory.
    pub fn columns_dir(&self) -> Result<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(APP_DIR).join(COLUMNS_DIR))
            .ok_or(ConfigError::NoHomeDirectory)
    }
}

/// Parses a JSON5 (or JSON) file.
///
/// # Errors
///
/// Returns [`ConfigError::ReadFile`] if the file cannot be read and
/// [`ConfigError::ParseJson5`] if it does not parse.
pub fn read_config_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json5::from_str(&content)?)
}

/// Writes a value as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Returns [`ConfigError::WriteFile`] if the file or its directory cannot be
/// written.
pub fn write_config_file<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let write_error = |source| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).map_err(write_error)
}
