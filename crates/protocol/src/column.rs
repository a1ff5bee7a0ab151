//! Board column types.
//!
//! A column is a named status. Its identity is its name, which is unique
//! within a project, and its position comes from the project's ordered
//! column list.

use serde::{Deserialize, Serialize};

/// Columns a project starts with until its layout is first changed.
pub const DEFAULT_COLUMNS: [&str; 4] = ["To Do", "Work In Progress", "Under Review", "Completed"];

/// Returns the default column names as owned strings.
///
/// # Examples
///
/// ```
/// use corkboard_protocol::default_column_names;
///
/// let names = default_column_names();
/// assert_eq!(names.first().map(String::as_str), Some("To Do"));
/// assert_eq!(names.len(), 4);
/// ```
#[must_use]
pub fn default_column_names() -> Vec<String> {
    DEFAULT_COLUMNS.iter().map(ToString::to_string).collect()
}

/// A single column (status) on a project's board.
///
/// # Examples
///
/// ```
/// use corkboard_protocol::Column;
///
/// let columns = Column::from_names(["To Do", "Completed"]);
/// assert_eq!(columns[1].id, "Completed");
/// assert_eq!(columns[1].order, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// The column name, unique within a project.
    pub id: String,
    /// Zero-based position from the left.
    pub order: usize,
}

impl Column {
    /// Creates a column at the given position.
    #[must_use]
    pub fn new(id: impl Into<String>, order: usize) -> Self {
        Self {
            id: id.into(),
            order,
        }
    }

    /// Builds positioned columns from an ordered list of names.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .enumerate()
            .map(|(order, name)| Self::new(name, order))
            .collect()
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.id
    }
}
