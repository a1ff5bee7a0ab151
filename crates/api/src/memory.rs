//! In-process task service.
//!
//! [`MemoryTaskService`] keeps tasks in memory and answers the same four
//! calls as the HTTP client. The CLI uses it for `--demo` runs and the
//! integration tests use it as a stand-in backend.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use corkboard_protocol::{NewTask, ProjectId, Task, TaskId};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::service::TaskService;

/// Status code reported while the service is switched offline.
const OFFLINE_STATUS: u16 = 503;

#[derive(Debug, Default)]
struct State {
    tasks: Vec<Task>,
    next_id: TaskId,
    offline: bool,
    requests: Vec<String>,
}

/// A [`TaskService`] backed by a vector of tasks.
///
/// # Examples
///
/// ```
/// use corkboard_api::{MemoryTaskService, TaskService};
/// use corkboard_protocol::dummy::demo_tasks;
///
/// # async fn example() -> corkboard_api::Result<()> {
/// let service = MemoryTaskService::with_tasks(demo_tasks(1));
/// let moved = service.update_task_status(1, "Completed").await?;
/// assert!(moved.is_in("Completed"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryTaskService {
    state: Mutex<State>,
}

impl MemoryTaskService {
    /// Creates an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service holding `tasks`. New ids continue after the
    /// highest existing one.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(State {
                tasks,
                next_id,
                ..State::default()
            }),
        }
    }

    /// Makes every following call fail with HTTP 503 until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Returns a snapshot of the stored tasks.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.lock().tasks.clone()
    }

    /// Returns the calls received so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records a request and locks the state, failing when offline.
    fn begin(&self, request: String) -> Result<MutexGuard<'_, State>> {
        let mut state = self.lock();
        debug!(%request, "memory task service request");
        state.requests.push(request);
        if state.offline {
            return Err(Error::Status {
                status: OFFLINE_STATUS,
                body: "service offline".to_string(),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl TaskService for MemoryTaskService {
    #[instrument(skip(self))]
    async fn fetch_tasks(&self, project_id: ProjectId) -> Result<Vec<Task>> {
        let state = self.begin(format!("GET tasks?projectId={project_id}"))?;
        Ok(state
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn update_task_status(&self, task_id: TaskId, status: &str) -> Result<Task> {
        let mut state = self.begin(format!("PATCH tasks/{task_id}/status {status}"))?;
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(Error::TaskNotFound(task_id))?;
        task.status = Some(status.to_string());
        Ok(task.clone())
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, task_id: TaskId) -> Result<()> {
        let mut state = self.begin(format!("DELETE tasks/{task_id}"))?;
        let index = state
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(Error::TaskNotFound(task_id))?;
        state.tasks.remove(index);
        Ok(())
    }

    #[instrument(skip(self, task), fields(project_id = task.project_id))]
    async fn create_task(&self, task: &NewTask) -> Result<Task> {
        let mut state = self.begin(format!("POST tasks {}", task.title))?;
        let id = state.next_id.max(1);
        state.next_id = id + 1;
        let created = task.clone().into_task(id);
        state.tasks.push(created.clone());
        Ok(created)
    }
}
