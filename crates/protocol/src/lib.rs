//! Shared protocol types for the corkboard application.
//!
//! This crate defines the data model shared by every corkboard component:
//! tasks as the task service returns them, board columns, and the payloads
//! exchanged with the drag-and-drop gesture layer.
//!
//! # Overview
//!
//! The crate is organized into the following modules:
//!
//! - [`task`]: The `Task` record, priorities, people, attachments, comments
//! - [`column`]: Board columns and the default column set
//! - [`drag`]: Drag payloads and drop targets
//! - [`dummy`]: Demo tasks for running without a service
//! - [`error`]: Error types for protocol operations
//!
//! # Examples
//!
//! ```
//! use corkboard_protocol::{Column, DragPayload, Task, default_column_names};
//!
//! let columns = Column::from_names(default_column_names());
//! let task = Task::new(1, 42, "Write the changelog").with_status("To Do");
//!
//! assert!(task.is_in(columns[0].name()));
//! assert_eq!(DragPayload::task(task.id), DragPayload::Task { task_id: 1 });
//! ```

pub mod column;
pub mod drag;
pub mod dummy;
pub mod error;
pub mod task;

// Re-export primary types at crate root for convenience
pub use column::{Column, DEFAULT_COLUMNS, default_column_names};
pub use drag::{DragPayload, DropTarget};
pub use error::{ProtocolError, Result};
pub use task::{
    Attachment, Comment, Comments, NewTask, Priority, ProjectId, Task, TaskId, User,
};
