//! Optimistic task synchronization.
//!
//! [`SyncLayer`] owns the board's task cache. Status changes and deletions
//! are applied to the cache at once and then sent to the task service on
//! spawned Tokio tasks. Those tasks never touch the cache: they report back
//! over a channel and the owner applies the outcome through
//! [`SyncLayer::next_event`], [`SyncLayer::drain_events`] or
//! [`SyncLayer::settle`].
//!
//! # Ordering
//!
//! Every status change gets a generation number. Requests for one task are
//! chained, so each waits for the previous one and they reach the service in
//! the order they were issued. A queued request that has been superseded by
//! a newer change before its turn comes is not sent at all.
//!
//! Only the outcome of the newest change for a task affects what is shown:
//!
//! | Outcome | Newest change | Older change |
//! |---------|---------------|--------------|
//! | success | task replaced by the server record | confirmed status updated |
//! | failure | status reverted to the last confirmed one | dropped |
//! | skipped | n/a | dropped |
//!
//! Nothing is retried.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use corkboard_api::TaskService;
use corkboard_protocol::{Task, TaskId};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::error::{BoardError, Result};

/// Sequence number of a status change. Later changes have larger numbers.
pub type Generation = u64;

/// A change in the cache caused by a finished request.
#[derive(Debug)]
pub enum SyncEvent {
    /// The newest status change for a task was accepted.
    StatusConfirmed {
        /// The moved task.
        task_id: TaskId,
        /// The status the service recorded.
        status: Option<String>,
    },
    /// The newest status change for a task failed and was rolled back.
    StatusReverted {
        /// The task whose move failed.
        task_id: TaskId,
        /// The status shown again.
        restored: Option<String>,
        /// Why the service refused.
        error: corkboard_api::Error,
    },
    /// A deletion was accepted.
    TaskDeleted {
        /// The deleted task.
        task_id: TaskId,
    },
    /// A deletion failed and the task was put back.
    DeleteReverted {
        /// The restored task.
        task_id: TaskId,
        /// Why the service refused.
        error: corkboard_api::Error,
    },
}

impl SyncEvent {
    /// Returns the task the event concerns.
    #[must_use]
    pub fn task_id(&self) -> TaskId {
        match self {
            Self::StatusConfirmed { task_id, .. }
            | Self::StatusReverted { task_id, .. }
            | Self::TaskDeleted { task_id }
            | Self::DeleteReverted { task_id, .. } => *task_id,
        }
    }

    /// Returns the service error for failed requests.
    #[must_use]
    pub fn error(&self) -> Option<&corkboard_api::Error> {
        match self {
            Self::StatusReverted { error, .. } | Self::DeleteReverted { error, .. } => Some(error),
            Self::StatusConfirmed { .. } | Self::TaskDeleted { .. } => None,
        }
    }
}

/// What a spawned request reports back.
#[derive(Debug)]
enum Completion {
    Status {
        task_id: TaskId,
        generation: Generation,
        outcome: Option<corkboard_api::Result<Task>>,
    },
    Delete {
        task_id: TaskId,
        result: corkboard_api::Result<()>,
    },
}

/// Bookkeeping for a task with requests in flight.
#[derive(Debug)]
struct Pending {
    /// Newest generation issued for the task, shared with spawned requests.
    latest: Arc<AtomicU64>,
    /// Status the newest change asked for.
    desired: Option<String>,
    /// Last status the service is known to hold.
    confirmed: Option<String>,
    /// Statuses asked for by requests spawned and not yet applied.
    requested: Vec<(Generation, String)>,
    /// Requests spawned and not yet applied.
    in_flight: usize,
    /// The most recently spawned request, which the next one waits for.
    tail: Option<JoinHandle<()>>,
}

impl Pending {
    fn new(confirmed: Option<String>) -> Self {
        Self {
            latest: Arc::new(AtomicU64::new(0)),
            desired: confirmed.clone(),
            confirmed,
            requested: Vec::new(),
            in_flight: 0,
            tail: None,
        }
    }

    fn is_latest(&self, generation: Generation) -> bool {
        self.latest.load(Ordering::Acquire) == generation
    }

    /// Returns `true` if the task may end up in `status` once its requests
    /// finish.
    fn may_settle_in(&self, status: &str) -> bool {
        self.confirmed.as_deref() == Some(status)
            || self.requested.iter().any(|(_, requested)| requested == status)
    }
}

/// A task taken off the board while its deletion is in flight.
#[derive(Debug)]
struct Removed {
    index: usize,
    task: Task,
}

/// The task cache and its link to the task service.
#[derive(Debug)]
pub struct SyncLayer {
    service: Arc<dyn TaskService>,
    tasks: Vec<Task>,
    pending: HashMap<TaskId, Pending>,
    removed: HashMap<TaskId, Removed>,
    next_generation: Generation,
    outstanding: usize,
    tx: UnboundedSender<Completion>,
    rx: UnboundedReceiver<Completion>,
}

impl SyncLayer {
    /// Creates an empty cache talking to `service`.
    #[must_use]
    pub fn new(service: Arc<dyn TaskService>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            service,
            tasks: Vec::new(),
            pending: HashMap::new(),
            removed: HashMap::new(),
            next_generation: 1,
            outstanding: 0,
            tx,
            rx,
        }
    }

    /// Returns the task service.
    #[must_use]
    pub fn service(&self) -> &Arc<dyn TaskService> {
        &self.service
    }

    /// Returns the cached tasks as currently displayed.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns a cached task.
    #[must_use]
    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Returns the number of requests whose outcome has not been applied.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Returns `true` if a status change or deletion for the task is in
    /// flight.
    #[must_use]
    pub fn is_pending(&self, task_id: TaskId) -> bool {
        self.pending.get(&task_id).is_some_and(|p| p.in_flight > 0)
    }

    /// Returns how many tasks sit in `status` or may return to it.
    ///
    /// Besides the tasks shown there, this counts tasks whose status change
    /// away from it or whose deletion is still in flight, since a rollback
    /// would put them back.
    #[must_use]
    pub fn tasks_referencing(&self, status: &str) -> usize {
        let shown = self.tasks.iter().filter(|t| t.is_in(status)).map(|t| t.id);
        let removed = self
            .removed
            .iter()
            .filter(|(_, removed)| removed.task.is_in(status))
            .map(|(id, _)| *id);
        let pending = self
            .pending
            .iter()
            .filter(|(_, pending)| pending.may_settle_in(status))
            .map(|(id, _)| *id);
        shown.chain(removed).chain(pending).collect::<HashSet<_>>().len()
    }

    /// Replaces the cache with a fresh list from the service.
    ///
    /// Tasks with changes still in flight keep showing the newest requested
    /// status; the fetched status becomes their confirmed one.
    pub fn replace_all(&mut self, mut tasks: Vec<Task>) {
        for task in &mut tasks {
            if let Some(pending) = self.pending.get_mut(&task.id) {
                if pending.in_flight > 0 {
                    pending.confirmed = task.status.clone();
                    task.status = pending.desired.clone();
                }
            }
        }
        tasks.retain(|task| !self.removed.contains_key(&task.id));
        debug!(count = tasks.len(), "task cache replaced");
        self.tasks = tasks;
    }

    /// Adds a task created on the service.
    ///
    /// A cached task with the same id is replaced in place.
    pub fn insert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    /// Moves a task to `status` and sends the change to the service.
    ///
    /// Returns `Ok(None)` without sending anything if the task already shows
    /// that status, or the generation of the new change otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskNotFound`] if the task is not cached.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[instrument(skip(self))]
    pub fn apply_status_change(&mut self, task_id: TaskId, status: &str) -> Result<Option<Generation>> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(BoardError::TaskNotFound(task_id))?;

        if task.is_in(status) {
            debug!("task already in column, nothing to send");
            return Ok(None);
        }

        let previous = task.status.replace(status.to_string());
        let generation = self.next_generation;
        self.next_generation += 1;

        let pending = self
            .pending
            .entry(task_id)
            .or_insert_with(|| Pending::new(previous));
        pending.latest.store(generation, Ordering::Release);
        pending.desired = Some(status.to_string());
        pending.requested.push((generation, status.to_string()));
        pending.in_flight += 1;

        let handle = spawn_status_request(
            Arc::clone(&self.service),
            self.tx.clone(),
            pending.tail.take(),
            Arc::clone(&pending.latest),
            task_id,
            generation,
            status.to_string(),
        );
        pending.tail = Some(handle);
        self.outstanding += 1;

        debug!(generation, "status change sent");
        Ok(Some(generation))
    }

    /// Removes a task and sends the deletion to the service.
    ///
    /// The deletion waits for the task's pending status changes to be sent
    /// first; any that are still queued are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskNotFound`] if the task is not cached.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[instrument(skip(self))]
    pub fn delete_task(&mut self, task_id: TaskId) -> Result<()> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(BoardError::TaskNotFound(task_id))?;
        let task = self.tasks.remove(index);

        let generation = self.next_generation;
        self.next_generation += 1;

        let pending = self
            .pending
            .entry(task_id)
            .or_insert_with(|| Pending::new(task.status.clone()));
        pending.latest.store(generation, Ordering::Release);
        pending.in_flight += 1;

        let previous = pending.tail.take();
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        pending.tail = Some(tokio::spawn(async move {
            let reporter = Reporter::new(
                tx,
                Completion::Delete {
                    task_id,
                    result: Err(corkboard_api::Error::Interrupted),
                },
            );
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            let result = service.delete_task(task_id).await;
            reporter.send(Completion::Delete { task_id, result });
        }));

        self.removed.insert(task_id, Removed { index, task });
        self.outstanding += 1;
        debug!("deletion sent");
        Ok(())
    }

    /// Waits for the next request to finish and applies it.
    ///
    /// Returns `None` once no requests are outstanding. Finished requests
    /// that change nothing visible are applied without producing an event.
    pub async fn next_event(&mut self) -> Option<SyncEvent> {
        while self.outstanding > 0 {
            let completion = self.rx.recv().await?;
            if let Some(event) = self.apply(completion) {
                return Some(event);
            }
        }
        None
    }

    /// Applies every request that has already finished, without waiting.
    pub fn drain_events(&mut self) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            events.extend(self.apply(completion));
        }
        events
    }

    /// Waits for every outstanding request and applies them all.
    pub async fn settle(&mut self) -> Vec<SyncEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }

    fn apply(&mut self, completion: Completion) -> Option<SyncEvent> {
        self.outstanding = self.outstanding.saturating_sub(1);
        match completion {
            Completion::Status {
                task_id,
                generation,
                outcome,
            } => self.apply_status(task_id, generation, outcome),
            Completion::Delete { task_id, result } => self.apply_delete(task_id, result),
        }
    }

    fn apply_status(
        &mut self,
        task_id: TaskId,
        generation: Generation,
        outcome: Option<corkboard_api::Result<Task>>,
    ) -> Option<SyncEvent> {
        let pending = self.pending.get_mut(&task_id)?;
        pending.in_flight = pending.in_flight.saturating_sub(1);
        pending.requested.retain(|(g, _)| *g != generation);
        let latest = pending.is_latest(generation);

        let event = match outcome {
            None => {
                debug!(task_id, generation, "superseded change was not sent");
                None
            }
            Some(Ok(record)) => {
                pending.confirmed = record.status.clone();
                if latest {
                    let status = record.status.clone();
                    if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
                        *task = record;
                    }
                    Some(SyncEvent::StatusConfirmed { task_id, status })
                } else {
                    debug!(task_id, generation, "stale change confirmed");
                    None
                }
            }
            Some(Err(error)) if latest => {
                let restored = pending.confirmed.clone();
                pending.desired = restored.clone();
                warn!(task_id, %error, "status change failed, reverting");
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == task_id) {
                    task.status = restored.clone();
                }
                Some(SyncEvent::StatusReverted {
                    task_id,
                    restored,
                    error,
                })
            }
            Some(Err(error)) => {
                debug!(task_id, generation, %error, "stale change failed");
                None
            }
        };

        self.forget_if_idle(task_id);
        event
    }

    fn apply_delete(
        &mut self,
        task_id: TaskId,
        result: corkboard_api::Result<()>,
    ) -> Option<SyncEvent> {
        if let Some(pending) = self.pending.get_mut(&task_id) {
            pending.in_flight = pending.in_flight.saturating_sub(1);
        }
        let removed = self.removed.remove(&task_id);

        let event = match result {
            Ok(()) => {
                debug!(task_id, "task deleted");
                self.pending.remove(&task_id);
                Some(SyncEvent::TaskDeleted { task_id })
            }
            Err(error) => {
                warn!(task_id, %error, "deletion failed, restoring task");
                if let Some(Removed { index, mut task }) = removed {
                    if let Some(pending) = self.pending.get(&task_id) {
                        task.status = pending.confirmed.clone();
                    }
                    let index = index.min(self.tasks.len());
                    self.tasks.insert(index, task);
                }
                Some(SyncEvent::DeleteReverted { task_id, error })
            }
        };

        self.forget_if_idle(task_id);
        event
    }

    fn forget_if_idle(&mut self, task_id: TaskId) {
        if self.pending.get(&task_id).is_some_and(|p| p.in_flight == 0) {
            self.pending.remove(&task_id);
        }
    }
}

/// Spawns a status request that runs after `previous` and is skipped if
/// `latest` has moved past `generation` by then.
fn spawn_status_request(
    service: Arc<dyn TaskService>,
    tx: UnboundedSender<Completion>,
    previous: Option<JoinHandle<()>>,
    latest: Arc<AtomicU64>,
    task_id: TaskId,
    generation: Generation,
    status: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let reporter = Reporter::new(
            tx,
            Completion::Status {
                task_id,
                generation,
                outcome: Some(Err(corkboard_api::Error::Interrupted)),
            },
        );
        if let Some(previous) = previous {
            let _ = previous.await;
        }

        let outcome = if latest.load(Ordering::Acquire) == generation {
            Some(service.update_task_status(task_id, &status).await)
        } else {
            None
        };

        reporter.send(Completion::Status {
            task_id,
            generation,
            outcome,
        });
    })
}

/// Sends a spawned request's completion exactly once.
///
/// If the request never reports (it panicked or its task was dropped), the
/// fallback completion is sent on drop so the owner does not wait forever.
struct Reporter {
    tx: UnboundedSender<Completion>,
    fallback: Option<Completion>,
}

impl Reporter {
    fn new(tx: UnboundedSender<Completion>, fallback: Completion) -> Self {
        Self {
            tx,
            fallback: Some(fallback),
        }
    }

    fn send(mut self, completion: Completion) {
        self.fallback = None;
        let _ = self.tx.send(completion);
    }
}

impl Drop for Reporter {
    fn drop(&mut self) {
        if let Some(completion) = self.fallback.take() {
            warn!("request ended without reporting back");
            let _ = self.tx.send(completion);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeService;

    fn task(id: TaskId, status: &str) -> Task {
        Task::new(id, 1, format!("task {id}")).with_status(status)
    }

    fn layer(service: &Arc<FakeService>, tasks: Vec<Task>) -> SyncLayer {
        let mut layer = SyncLayer::new(Arc::clone(service) as Arc<dyn TaskService>);
        layer.replace_all(tasks);
        layer
    }

    fn status_of(layer: &SyncLayer, id: TaskId) -> Option<&str> {
        layer.task(id).and_then(|t| t.status.as_deref())
    }

    #[tokio::test]
    async fn move_is_applied_before_the_service_answers() {
        let service = Arc::new(FakeService::with_tasks(vec![task(1, "To Do")]));
        let mut layer = layer(&service, vec![task(1, "To Do")]);

        let generation = layer.apply_status_change(1, "Completed").unwrap();
        assert!(generation.is_some());
        assert_eq!(status_of(&layer, 1), Some("Completed"));
        assert!(layer.is_pending(1));

        let events = layer.settle().await;
        assert!(matches!(
            events.as_slice(),
            [SyncEvent::StatusConfirmed { task_id: 1, status: Some(s) }] if s == "Completed"
        ));
        assert_eq!(service.requests(), ["PATCH 1 Completed"]);
        assert!(!layer.is_pending(1));
        assert_eq!(layer.outstanding(), 0);
    }

    #[tokio::test]
    async fn move_to_current_column_sends_nothing() {
        let service = Arc::new(FakeService::default());
        let mut layer = layer(&service, vec![task(1, "To Do")]);

        assert_eq!(layer.apply_status_change(1, "To Do").unwrap(), None);
        assert!(layer.settle().await.is_empty());
        assert!(service.requests().is_empty());
    }

    #[tokio::test]
    async fn unknown_task_is_an_error() {
        let service = Arc::new(FakeService::default());
        let mut layer = layer(&service, vec![]);

        assert!(matches!(
            layer.apply_status_change(4, "To Do"),
            Err(BoardError::TaskNotFound(4))
        ));
        assert!(matches!(layer.delete_task(4), Err(BoardError::TaskNotFound(4))));
    }

    #[tokio::test]
    async fn failed_move_reverts_to_confirmed_status() {
        let service = Arc::new(FakeService::with_tasks(vec![task(1, "To Do")]));
        service.fail_status("Work In Progress");
        let mut layer = layer(&service, vec![task(1, "To Do")]);

        layer.apply_status_change(1, "Work In Progress").unwrap();
        let events = layer.settle().await;

        match events.as_slice() {
            [SyncEvent::StatusReverted { task_id: 1, restored, error }] => {
                assert_eq!(restored.as_deref(), Some("To Do"));
                assert!(matches!(error, corkboard_api::Error::Status { status: 500, .. }));
            }
            other => panic!("unexpected events: {other:?}"),
        }
        assert_eq!(status_of(&layer, 1), Some("To Do"));
    }

    #[tokio::test]
    async fn rapid_moves_only_send_the_newest() {
        let service = Arc::new(FakeService::with_tasks(vec![task(1, "To Do")]));
        let mut layer = layer(&service, vec![task(1, "To Do")]);

        layer.apply_status_change(1, "Work In Progress").unwrap();
        layer.apply_status_change(1, "Under Review").unwrap();
        layer.apply_status_change(1, "Completed").unwrap();

        let events = layer.settle().await;
        assert_eq!(events.len(), 1);
        assert_eq!(service.requests(), ["PATCH 1 Completed"]);
        assert_eq!(status_of(&layer, 1), Some("Completed"));
    }

    #[tokio::test]
    async fn queued_change_waits_for_in_flight_one() {
        let service = Arc::new(FakeService::with_tasks(vec![task(1, "To Do")]));
        let gate = service.gate_updates();
        let mut layer = layer(&service, vec![task(1, "To Do")]);

        layer.apply_status_change(1, "Work In Progress").unwrap();
        service.wait_for_requests(1).await;

        layer.apply_status_change(1, "Under Review").unwrap();
        layer.apply_status_change(1, "Completed").unwrap();
        tokio::task::yield_now().await;
        assert_eq!(service.requests(), ["PATCH 1 Work In Progress"]);

        gate.add_permits(10);
        let events = layer.settle().await;

        assert_eq!(
            service.requests(),
            ["PATCH 1 Work In Progress", "PATCH 1 Completed"]
        );
        assert_eq!(events.len(), 1);
        assert_eq!(status_of(&layer, 1), Some("Completed"));
    }

    #[tokio::test]
    async fn stale_success_becomes_the_rollback_target() {
        let service = Arc::new(FakeService::with_tasks(vec![task(1, "To Do")]));
        service.fail_status("Completed");
        let gate = service.gate_updates();
        let mut layer = layer(&service, vec![task(1, "To Do")]);

        layer.apply_status_change(1, "Work In Progress").unwrap();
        service.wait_for_requests(1).await;
        layer.apply_status_change(1, "Completed").unwrap();

        gate.add_permits(10);
        let events = layer.settle().await;

        match events.as_slice() {
            [SyncEvent::StatusReverted { restored, .. }] => {
                assert_eq!(restored.as_deref(), Some("Work In Progress"));
            }
            other => panic!("unexpected events: {other:?}"),
        }
        assert_eq!(status_of(&layer, 1), Some("Work In Progress"));
    }

    #[tokio::test]
    async fn stale_failure_is_dropped() {
        let service = Arc::new(FakeService::with_tasks(vec![task(1, "To Do")]));
        service.fail_status("Work In Progress");
        let gate = service.gate_updates();
        let mut layer = layer(&service, vec![task(1, "To Do")]);

        layer.apply_status_change(1, "Work In Progress").unwrap();
        service.wait_for_requests(1).await;
        layer.apply_status_change(1, "Completed").unwrap();

        gate.add_permits(10);
        let events = layer.settle().await;

        assert!(matches!(events.as_slice(), [SyncEvent::StatusConfirmed { .. }]));
        assert_eq!(status_of(&layer, 1), Some("Completed"));
    }

    #[tokio::test]
    async fn confirmed_record_replaces_cached_task() {
        let mut stored = task(1, "To Do");
        stored.points = Some(8);
        let service = Arc::new(FakeService::with_tasks(vec![stored]));
        let mut layer = layer(&service, vec![task(1, "To Do")]);

        layer.apply_status_change(1, "Completed").unwrap();
        layer.settle().await;

        assert_eq!(layer.task(1).and_then(|t| t.points), Some(8));
    }

    #[tokio::test]
    async fn other_tasks_are_independent() {
        let service = Arc::new(FakeService::with_tasks(vec![task(1, "To Do"), task(2, "To Do")]));
        service.fail_status("Under Review");
        let mut layer = layer(&service, vec![task(1, "To Do"), task(2, "To Do")]);

        layer.apply_status_change(1, "Completed").unwrap();
        layer.apply_status_change(2, "Under Review").unwrap();
        let events = layer.settle().await;

        assert_eq!(events.len(), 2);
        assert_eq!(status_of(&layer, 1), Some("Completed"));
        assert_eq!(status_of(&layer, 2), Some("To Do"));
    }

    #[tokio::test]
    async fn delete_removes_then_confirms() {
        let service = Arc::new(FakeService::with_tasks(vec![task(1, "To Do"), task(2, "To Do")]));
        let mut layer = layer(&service, vec![task(1, "To Do"), task(2, "To Do")]);

        layer.delete_task(1).unwrap();
        assert!(layer.task(1).is_none());

        let events = layer.settle().await;
        assert!(matches!(events.as_slice(), [SyncEvent::TaskDeleted { task_id: 1 }]));
        assert_eq!(service.requests(), ["DELETE 1"]);
        assert_eq!(layer.tasks().len(), 1);
    }

    #[tokio::test]
    async fn failed_delete_restores_task_in_place() {
        let service = Arc::new(FakeService::with_tasks(vec![]));
        service.fail_deletes();
        let tasks = vec![task(1, "To Do"), task(2, "To Do"), task(3, "To Do")];
        let mut layer = layer(&service, tasks);

        layer.delete_task(2).unwrap();
        let events = layer.settle().await;

        assert!(matches!(events.as_slice(), [SyncEvent::DeleteReverted { task_id: 2, .. }]));
        assert!(events[0].error().is_some());
        let ids: Vec<_> = layer.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids, [1, 2, 3]);
    }

    #[tokio::test]
    async fn delete_waits_for_pending_move_and_drops_queued_ones() {
        let service = Arc::new(FakeService::with_tasks(vec![task(1, "To Do")]));
        let gate = service.gate_updates();
        let mut layer = layer(&service, vec![task(1, "To Do")]);

        layer.apply_status_change(1, "Work In Progress").unwrap();
        service.wait_for_requests(1).await;
        layer.apply_status_change(1, "Completed").unwrap();
        layer.delete_task(1).unwrap();

        gate.add_permits(10);
        let events = layer.settle().await;

        assert_eq!(service.requests(), ["PATCH 1 Work In Progress", "DELETE 1"]);
        assert!(matches!(events.as_slice(), [SyncEvent::TaskDeleted { task_id: 1 }]));
        assert!(layer.tasks().is_empty());
    }

    #[tokio::test]
    async fn refresh_keeps_in_flight_moves_visible() {
        let service = Arc::new(FakeService::with_tasks(vec![task(1, "To Do")]));
        let gate = service.gate_updates();
        let mut layer = layer(&service, vec![task(1, "To Do")]);

        layer.apply_status_change(1, "Completed").unwrap();
        layer.replace_all(vec![task(1, "To Do"), task(2, "Under Review")]);
        assert_eq!(status_of(&layer, 1), Some("Completed"));
        assert_eq!(layer.tasks().len(), 2);

        gate.add_permits(1);
        layer.settle().await;
        assert_eq!(status_of(&layer, 1), Some("Completed"));
    }

    #[tokio::test]
    async fn drain_applies_finished_requests_only() {
        let service = Arc::new(FakeService::with_tasks(vec![task(1, "To Do")]));
        let gate = service.gate_updates();
        let mut layer = layer(&service, vec![task(1, "To Do")]);

        layer.apply_status_change(1, "Completed").unwrap();
        assert!(layer.drain_events().is_empty());
        assert_eq!(layer.outstanding(), 1);

        gate.add_permits(1);
        assert!(layer.next_event().await.is_some());
        assert!(layer.next_event().await.is_none());
    }

    #[tokio::test]
    async fn panicked_request_still_settles() {
        let service = Arc::new(FakeService::with_tasks(vec![task(1, "To Do")]));
        service.panic_on_status("Completed");
        let mut layer = layer(&service, vec![task(1, "To Do")]);

        layer.apply_status_change(1, "Completed").unwrap();
        let events = layer.settle().await;

        match events.as_slice() {
            [SyncEvent::StatusReverted { restored, error, .. }] => {
                assert_eq!(restored.as_deref(), Some("To Do"));
                assert!(matches!(error, corkboard_api::Error::Interrupted));
            }
            other => panic!("unexpected events: {other:?}"),
        }
        assert_eq!(layer.outstanding(), 0);
        assert_eq!(status_of(&layer, 1), Some("To Do"));
    }

    #[tokio::test]
    async fn referencing_counts_tasks_that_may_come_back() {
        let tasks = vec![
            task(1, "Under Review"),
            task(2, "Under Review"),
            task(3, "Under Review"),
            task(4, "To Do"),
        ];
        let service = Arc::new(FakeService::with_tasks(tasks.clone()));
        let gate = service.gate_updates();
        let mut layer = layer(&service, tasks);
        assert_eq!(layer.tasks_referencing("Under Review"), 3);

        layer.apply_status_change(1, "Completed").unwrap();
        layer.delete_task(2).unwrap();
        layer.apply_status_change(4, "Under Review").unwrap();
        layer.apply_status_change(4, "Completed").unwrap();

        assert_eq!(layer.tasks_referencing("Under Review"), 4);
        assert_eq!(layer.tasks_referencing("To Do"), 1);
        assert_eq!(layer.tasks_referencing("Work In Progress"), 0);

        gate.add_permits(10);
        layer.settle().await;
        assert_eq!(layer.tasks_referencing("Under Review"), 1);
    }

    #[tokio::test]
    async fn insert_adds_or_replaces() {
        let service = Arc::new(FakeService::default());
        let mut layer = layer(&service, vec![task(1, "To Do")]);

        layer.insert(task(2, "Completed"));
        layer.insert(task(1, "Under Review"));

        assert_eq!(layer.tasks().len(), 2);
        assert_eq!(status_of(&layer, 1), Some("Under Review"));
    }
}
