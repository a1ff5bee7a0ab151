//! Error types for board operations.

use corkboard_protocol::{ProtocolError, TaskId};

/// Errors raised by the column store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing a layout file failed.
    #[error("I/O error in column store: {0}")]
    Io(#[from] std::io::Error),

    /// A stored layout is not a JSON array of names.
    #[error("invalid column layout: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while working with a board.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// A column with this name already exists in the project.
    #[error("column \"{0}\" already exists")]
    DuplicateColumn(String),

    /// Column names cannot be empty or whitespace.
    #[error("column name cannot be empty")]
    InvalidColumnName,

    /// No column with this name exists in the project.
    #[error("column \"{0}\" not found")]
    ColumnNotFound(String),

    /// The column still holds tasks and cannot be deleted.
    #[error("column \"{column}\" still holds {tasks} task(s)")]
    ColumnNotEmpty {
        /// The column that was to be deleted.
        column: String,
        /// How many tasks it holds.
        tasks: usize,
    },

    /// The operation needs the board's tasks, which are not loaded.
    #[error("board tasks are unavailable: {0}")]
    NotLoaded(String),

    /// The task is not on the board.
    #[error("task {0} not found on the board")]
    TaskNotFound(TaskId),

    /// Fetching the project's tasks failed.
    ///
    /// Distinct from a project that simply has no tasks.
    #[error("failed to load tasks: {0}")]
    LoadFailed(#[source] corkboard_api::Error),

    /// A task service call made directly by the board failed.
    #[error(transparent)]
    Api(#[from] corkboard_api::Error),

    /// A task creation request was rejected before being sent.
    #[error("invalid task: {0}")]
    InvalidTask(#[from] ProtocolError),

    /// The column store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A specialized Result type for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;
