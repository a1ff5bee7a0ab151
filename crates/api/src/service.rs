//! The task service contract.
//!
//! Everything the board needs from the backend fits in four calls. The
//! trait is object safe so boards can hold an `Arc<dyn TaskService>` and
//! hand clones of it to spawned requests.

use async_trait::async_trait;
use corkboard_protocol::{NewTask, ProjectId, Task, TaskId};

use crate::error::Result;

/// Remote task operations used by the board.
///
/// Paths are relative to the service's base URL:
///
/// | Method | Path | Body | Returns |
/// |--------|------|------|---------|
/// | `GET` | `tasks?projectId=<id>` | | `Vec<Task>` |
/// | `PATCH` | `tasks/<id>/status` | `{"status": "..."}` | `Task` |
/// | `DELETE` | `tasks/<id>` | | nothing |
/// | `POST` | `tasks` | [`NewTask`] | `Task` |
#[async_trait]
pub trait TaskService: std::fmt::Debug + Send + Sync {
    /// Fetches every task of a project.
    async fn fetch_tasks(&self, project_id: ProjectId) -> Result<Vec<Task>>;

    /// Moves a task to another column and returns the updated record.
    async fn update_task_status(&self, task_id: TaskId, status: &str) -> Result<Task>;

    /// Deletes a task.
    async fn delete_task(&self, task_id: TaskId) -> Result<()>;

    /// Creates a task and returns it with its server-assigned id.
    async fn create_task(&self, task: &NewTask) -> Result<Task>;
}
