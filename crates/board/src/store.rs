//! Column layout storage.
//!
//! Layouts are kept per project under the key `statuses-<projectId>` as an
//! ordered JSON array of column names. Two stores are provided:
//!
//! - [`FileColumnStore`]: one JSON file per key in a directory
//! - [`MemoryColumnStore`]: a shared in-memory map
//!
//! # Directory Structure
//!
//! ```text
//! ~/.local/share/corkboard/       # Linux
//! ~/Library/Application Support/corkboard/  # macOS
//! └── columns/
//!     ├── statuses-1.json
//!     └── statuses-42.json
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use corkboard_protocol::ProjectId;
use tracing::{debug, instrument, warn};

use crate::error::StoreError;

/// A specialized Result type for column store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Returns the storage key for a project's column layout.
///
/// # Examples
///
/// ```
/// use corkboard_board::store::column_key;
///
/// assert_eq!(column_key(42), "statuses-42");
/// ```
#[must_use]
pub fn column_key(project_id: ProjectId) -> String {
    format!("statuses-{project_id}")
}

/// Key-value storage for ordered column name lists.
pub trait ColumnStore {
    /// Loads the list stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if stored data exists but cannot be read.
    fn load(&self, key: &str) -> StoreResult<Option<Vec<String>>>;

    /// Stores `columns` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be written.
    fn save(&self, key: &str, columns: &[String]) -> StoreResult<()>;

    /// Removes the value stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if existing data cannot be removed.
    fn remove(&self, key: &str) -> StoreResult<()>;
}

/// Column store writing one JSON file per key.
///
/// # Examples
///
/// ```no_run
/// use corkboard_board::store::{ColumnStore, FileColumnStore};
///
/// # fn example() -> Result<(), corkboard_board::StoreError> {
/// let store = FileColumnStore::with_path("/tmp/corkboard-columns")?;
/// store.save("statuses-1", &["Backlog".to_string(), "Done".to_string()])?;
/// assert_eq!(store.load("statuses-1")?.map(|c| c.len()), Some(2));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileColumnStore {
    base_path: PathBuf,
}

impl FileColumnStore {
    /// Creates a store in `base_path`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    #[instrument(skip_all, fields(base_path = %base_path.as_ref().display()))]
    pub fn with_path(base_path: impl AsRef<Path>) -> StoreResult<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        if !base_path.exists() {
            debug!(?base_path, "creating column store directory");
            fs::create_dir_all(&base_path)?;
        }
        Ok(Self { base_path })
    }

    /// Returns the directory layouts are stored in.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Returns the file path for a key.
    ///
    /// Path separators and dots are replaced so keys cannot escape the
    /// store directory.
    fn path_for(&self, key: &str) -> PathBuf {
        let safe_key = key.replace(['/', '\\', '.'], "_");
        self.base_path.join(format!("{safe_key}.json"))
    }
}

impl ColumnStore for FileColumnStore {
    #[instrument(skip(self))]
    fn load(&self, key: &str) -> StoreResult<Option<Vec<String>>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let columns: Vec<String> = serde_json::from_str(&content).map_err(|e| {
                    warn!(?path, error = %e, "failed to parse column layout");
                    e
                })?;
                debug!(count = columns.len(), "loaded column layout");
                Ok(Some(columns))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(?path, "no stored column layout");
                Ok(None)
            }
            Err(e) => {
                warn!(?path, error = %e, "failed to read column layout");
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self, columns), fields(count = columns.len()))]
    fn save(&self, key: &str, columns: &[String]) -> StoreResult<()> {
        let path = self.path_for(key);
        let content = serde_json::to_string_pretty(columns)?;
        fs::write(&path, content)?;
        debug!(?path, "saved column layout");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&self, key: &str) -> StoreResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Column store kept in memory.
///
/// Clones share the same map, so a layout saved through one handle is
/// visible through every other.
#[derive(Debug, Clone, Default)]
pub struct MemoryColumnStore {
    layouts: Arc<Mutex<HashMap<String, Vec<String>>>>,
}

impl MemoryColumnStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<String>>> {
        self.layouts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ColumnStore for MemoryColumnStore {
    fn load(&self, key: &str) -> StoreResult<Option<Vec<String>>> {
        Ok(self.lock().get(key).cloned())
    }

    fn save(&self, key: &str, columns: &[String]) -> StoreResult<()> {
        self.lock().insert(key.to_string(), columns.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.lock().remove(key);
        Ok(())
    }
}
