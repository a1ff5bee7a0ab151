//! Board state for corkboard.
//!
//! This crate holds everything a Kanban board client keeps in memory for one
//! project: which columns exist and in what order, which tasks sit in which
//! column, how drag gestures translate into moves and reorders, and how
//! optimistic changes are reconciled with the task service.
//!
//! # Overview
//!
//! - [`registry`]: Per-project ordered column lists backed by a [`ColumnStore`]
//! - [`store`]: File and in-memory column stores
//! - [`placement`]: Grouping tasks by column
//! - [`drag`]: Turning gesture events into intents
//! - [`sync`]: The task cache and its optimistic requests
//! - [`board`]: The [`Board`] tying the above together
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use corkboard_api::MemoryTaskService;
//! use corkboard_board::{Board, ColumnRegistry, SyncEvent};
//! use corkboard_board::store::MemoryColumnStore;
//! use corkboard_protocol::Task;
//!
//! # async fn example() -> corkboard_board::Result<()> {
//! let service = Arc::new(MemoryTaskService::with_tasks(vec![
//!     Task::new(1, 1, "Write docs").with_status("To Do"),
//! ]));
//! let mut board = Board::new(1, ColumnRegistry::new(MemoryColumnStore::new()), service);
//! board.load().await?;
//!
//! // The move shows up at once and is confirmed later.
//! board.move_task(1, "Completed")?;
//! assert_eq!(board.view()?.column("Completed").map(|c| c.count()), Some(1));
//!
//! while let Some(event) = board.next_event().await {
//!     if let SyncEvent::StatusReverted { error, .. } = event {
//!         eprintln!("move failed: {error}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod board;
pub mod drag;
pub mod error;
pub mod placement;
pub mod registry;
pub mod store;
pub mod sync;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export primary types at crate root for convenience
pub use board::{Board, BoardView, ColumnView, LoadState, NewTaskContext};
pub use drag::{DragCoordinator, DragEvent, DragIntent, IgnoreReason};
pub use error::{BoardError, Result, StoreError};
pub use placement::{Placement, group_by_column, tasks_by_column};
pub use registry::ColumnRegistry;
pub use store::{ColumnStore, FileColumnStore, MemoryColumnStore};
pub use sync::{Generation, SyncEvent, SyncLayer};
