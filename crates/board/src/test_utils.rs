//! Test utilities for the board crate.
//!
//! [`FakeService`] is a scriptable [`TaskService`]: it records every call,
//! can fail or panic on selected requests, and can hold status updates behind a gate so
//! tests control when in-flight requests finish.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use corkboard_api::{Error, Result, TaskService};
use corkboard_protocol::{NewTask, ProjectId, Task, TaskId};
use tokio::sync::Semaphore;

#[derive(Debug, Default)]
struct FakeState {
    tasks: Vec<Task>,
    requests: Vec<String>,
    failing_statuses: HashSet<String>,
    panicking_statuses: HashSet<String>,
    fail_fetch: bool,
    fail_deletes: bool,
    gate: Option<Arc<Semaphore>>,
    next_id: TaskId,
}

/// In-memory task service with failure injection.
///
/// Requests are logged as `"GET <project>"`, `"PATCH <id> <status>"`,
/// `"DELETE <id>"` and `"POST <title>"`.
#[derive(Debug, Default)]
pub(crate) struct FakeService {
    state: Mutex<FakeState>,
}

impl FakeService {
    pub(crate) fn with_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self {
            state: Mutex::new(FakeState {
                tasks,
                next_id,
                ..FakeState::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Returns the requests received so far.
    pub(crate) fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    /// Makes status updates to `status` fail with HTTP 500.
    pub(crate) fn fail_status(&self, status: &str) {
        self.lock().failing_statuses.insert(status.to_string());
    }

    /// Makes status updates to `status` panic instead of answering.
    pub(crate) fn panic_on_status(&self, status: &str) {
        self.lock().panicking_statuses.insert(status.to_string());
    }

    /// Makes task fetches fail with HTTP 503.
    pub(crate) fn fail_fetch(&self) {
        self.lock().fail_fetch = true;
    }

    /// Makes deletions fail with HTTP 500.
    pub(crate) fn fail_deletes(&self) {
        self.lock().fail_deletes = true;
    }

    /// Holds status updates until permits are added to the returned gate.
    ///
    /// A request is logged before it waits at the gate.
    pub(crate) fn gate_updates(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.lock().gate = Some(Arc::clone(&gate));
        gate
    }

    /// Yields until at least `count` requests were received.
    pub(crate) async fn wait_for_requests(&self, count: usize) {
        while self.lock().requests.len() < count {
            tokio::task::yield_now().await;
        }
    }
}

fn server_error(status: u16) -> Error {
    Error::Status {
        status,
        body: "injected failure".to_string(),
    }
}

#[async_trait]
impl TaskService for FakeService {
    async fn fetch_tasks(&self, project_id: ProjectId) -> Result<Vec<Task>> {
        let mut state = self.lock();
        state.requests.push(format!("GET {project_id}"));
        if state.fail_fetch {
            return Err(server_error(503));
        }
        Ok(state
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update_task_status(&self, task_id: TaskId, status: &str) -> Result<Task> {
        let gate = {
            let mut state = self.lock();
            state.requests.push(format!("PATCH {task_id} {status}"));
            state.gate.clone()
        };
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
        if self.lock().panicking_statuses.contains(status) {
            panic!("update to {status} blew up");
        }

        let mut state = self.lock();
        if state.failing_statuses.contains(status) {
            return Err(server_error(500));
        }
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(Error::TaskNotFound(task_id))?;
        task.status = Some(status.to_string());
        Ok(task.clone())
    }

    async fn delete_task(&self, task_id: TaskId) -> Result<()> {
        let mut state = self.lock();
        state.requests.push(format!("DELETE {task_id}"));
        if state.fail_deletes {
            return Err(server_error(500));
        }
        state.tasks.retain(|t| t.id != task_id);
        Ok(())
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task> {
        let mut state = self.lock();
        state.requests.push(format!("POST {}", task.title));
        let id = state.next_id.max(1);
        state.next_id = id + 1;
        let created = task.clone().into_task(id);
        state.tasks.push(created.clone());
        Ok(created)
    }
}
