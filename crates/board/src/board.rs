//! One project's board.
//!
//! [`Board`] ties the column registry, the synchronized task cache and the
//! drag coordinator together and produces [`BoardView`] snapshots for
//! rendering.

use std::fmt;
use std::sync::Arc;

use corkboard_api::TaskService;
use corkboard_protocol::{Column, NewTask, ProjectId, Task, TaskId};
use tracing::{debug, info, instrument, warn};

use crate::drag::{DragCoordinator, DragEvent, DragIntent};
use crate::error::{BoardError, Result};
use crate::placement::group_by_column;
use crate::registry::ColumnRegistry;
use crate::store::ColumnStore;
use crate::sync::{Generation, SyncEvent, SyncLayer};

/// Whether the board's tasks have been fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// No fetch has been attempted.
    #[default]
    NotLoaded,
    /// A fetch is in progress.
    Loading,
    /// Tasks were fetched.
    Ready,
    /// The last fetch failed with this message.
    Failed(String),
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLoaded => write!(f, "not loaded"),
            Self::Loading => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
            Self::Failed(message) => write!(f, "failed: {message}"),
        }
    }
}

/// A column and the tasks it holds.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView {
    pub column: Column,
    pub tasks: Vec<Task>,
}

impl ColumnView {
    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.column.name()
    }

    /// Returns the number of tasks in the column.
    #[must_use]
    pub fn count(&self) -> usize {
        self.tasks.len()
    }
}

/// A snapshot of a board, ready to render.
///
/// Renders as a plain text outline:
///
/// ```text
/// Project 1 (ready)
///
/// To Do (1)
///   #1 Set up the repository [High]
///
/// Completed (0)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    pub project_id: ProjectId,
    pub state: LoadState,
    pub columns: Vec<ColumnView>,
    /// Tasks whose status names no column.
    pub unassigned: Vec<Task>,
}

impl BoardView {
    /// Returns a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnView> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Returns the column names in display order.
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(ColumnView::name).collect()
    }
}

fn write_task(f: &mut fmt::Formatter<'_>, task: &Task) -> fmt::Result {
    write!(f, "  #{} {}", task.id, task.title)?;
    if let Some(priority) = task.priority {
        write!(f, " [{}]", priority.display_name())?;
    }
    if let Some(assignee) = &task.assignee {
        write!(f, " @{}", assignee.username)?;
    }
    writeln!(f)
}

impl fmt::Display for BoardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Project {} ({})", self.project_id, self.state)?;
        for column in &self.columns {
            writeln!(f)?;
            writeln!(f, "{} ({})", column.name(), column.count())?;
            for task in &column.tasks {
                write_task(f, task)?;
            }
        }
        if !self.unassigned.is_empty() {
            writeln!(f)?;
            writeln!(f, "Unassigned ({})", self.unassigned.len())?;
            for task in &self.unassigned {
                write_task(f, task)?;
            }
        }
        Ok(())
    }
}

/// What a new-task form needs to know about the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskContext {
    pub project_id: ProjectId,
    /// Column names the new task may be placed in.
    pub statuses: Vec<String>,
}

impl NewTaskContext {
    /// Starts a creation request in the first column.
    #[must_use]
    pub fn draft(&self, title: impl Into<String>) -> NewTask {
        NewTask {
            title: title.into(),
            status: self.statuses.first().cloned(),
            project_id: self.project_id,
            ..NewTask::default()
        }
    }
}

/// The board of one project.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use corkboard_api::MemoryTaskService;
/// use corkboard_board::{Board, ColumnRegistry};
/// use corkboard_board::store::MemoryColumnStore;
/// use corkboard_protocol::dummy::demo_tasks;
///
/// # async fn example() -> corkboard_board::Result<()> {
/// let service = Arc::new(MemoryTaskService::with_tasks(demo_tasks(1)));
/// let registry = ColumnRegistry::new(MemoryColumnStore::new());
/// let mut board = Board::new(1, registry, service);
///
/// board.load().await?;
/// board.move_task(1, "Completed")?;
/// board.settle().await;
///
/// println!("{}", board.view()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Board<S> {
    project_id: ProjectId,
    registry: ColumnRegistry<S>,
    sync: SyncLayer,
    drag: DragCoordinator,
    state: LoadState,
}

impl<S: ColumnStore> Board<S> {
    /// Creates an unloaded board.
    pub fn new(
        project_id: ProjectId,
        registry: ColumnRegistry<S>,
        service: Arc<dyn TaskService>,
    ) -> Self {
        Self {
            project_id,
            registry,
            sync: SyncLayer::new(service),
            drag: DragCoordinator::new(),
            state: LoadState::NotLoaded,
        }
    }

    /// Returns the project id.
    #[must_use]
    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the load state.
    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Returns the column registry.
    #[must_use]
    pub fn registry(&self) -> &ColumnRegistry<S> {
        &self.registry
    }

    /// Returns the cached tasks.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        self.sync.tasks()
    }

    /// Returns the project's columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored layout cannot be read.
    pub fn columns(&self) -> Result<Vec<Column>> {
        self.registry.list_columns(self.project_id)
    }

    /// Fetches the project's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::LoadFailed`] if the service call fails. The
    /// board then reports [`LoadState::Failed`] and keeps its previous
    /// tasks.
    #[instrument(skip(self), fields(project_id = self.project_id))]
    pub async fn load(&mut self) -> Result<()> {
        self.state = LoadState::Loading;
        let service = Arc::clone(self.sync.service());
        match service.fetch_tasks(self.project_id).await {
            Ok(tasks) => {
                info!(count = tasks.len(), "board loaded");
                self.sync.replace_all(tasks);
                self.state = LoadState::Ready;
                Ok(())
            }
            Err(error) => {
                warn!(%error, "failed to load board");
                self.state = LoadState::Failed(error.to_string());
                Err(BoardError::LoadFailed(error))
            }
        }
    }

    /// Fetches the tasks again, for example after a task was created
    /// elsewhere.
    ///
    /// # Errors
    ///
    /// Same as [`Board::load`].
    pub async fn refresh(&mut self) -> Result<()> {
        self.load().await
    }

    /// Returns a snapshot for rendering.
    ///
    /// Until the tasks are loaded every column is empty and the state says
    /// why.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored layout cannot be read.
    pub fn view(&self) -> Result<BoardView> {
        let columns = self.columns()?;
        let tasks: &[Task] = if self.state == LoadState::Ready {
            self.sync.tasks()
        } else {
            &[]
        };

        let placement = group_by_column(tasks, &columns);
        let column_views = placement
            .groups()
            .iter()
            .map(|(column, tasks)| ColumnView {
                column: (*column).clone(),
                tasks: tasks.iter().map(|t| (*t).clone()).collect(),
            })
            .collect();
        let unassigned = placement.unassigned().iter().map(|t| (*t).clone()).collect();

        Ok(BoardView {
            project_id: self.project_id,
            state: self.state.clone(),
            columns: column_views,
            unassigned,
        })
    }

    /// Moves a task to another column.
    ///
    /// Returns `Ok(None)` if the task is already there.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ColumnNotFound`] if `to` is not a column of the
    /// project and [`BoardError::TaskNotFound`] if the task is not on the
    /// board.
    #[instrument(skip(self))]
    pub fn move_task(&mut self, task_id: TaskId, to: &str) -> Result<Option<Generation>> {
        if !self.registry.column_names(self.project_id)?.iter().any(|c| c == to) {
            return Err(BoardError::ColumnNotFound(to.to_string()));
        }
        self.sync.apply_status_change(task_id, to)
    }

    /// Feeds a gesture event through the drag coordinator and carries out
    /// the resulting intent.
    ///
    /// # Errors
    ///
    /// Returns the error of the move or reorder the gesture triggered.
    pub fn handle_drag(&mut self, event: DragEvent) -> Result<DragIntent> {
        let intent = self.drag.handle(event);
        match &intent {
            DragIntent::MoveTask { task_id, to } => {
                self.move_task(*task_id, to)?;
            }
            DragIntent::ReorderColumn { moved, target } => {
                self.reorder_column(moved, target)?;
            }
            DragIntent::Ignore(reason) => debug!(?reason, "drag event ignored"),
        }
        Ok(intent)
    }

    /// Appends a column.
    ///
    /// # Errors
    ///
    /// See [`ColumnRegistry::add_column`].
    pub fn add_column(&mut self, name: &str) -> Result<Column> {
        self.registry.add_column(self.project_id, name)
    }

    /// Moves column `moved` to the position of `target`.
    ///
    /// # Errors
    ///
    /// See [`ColumnRegistry::reorder_column`].
    pub fn reorder_column(&mut self, moved: &str, target: &str) -> Result<bool> {
        self.registry.reorder_column(self.project_id, moved, target)
    }

    /// Deletes a column that holds no tasks.
    ///
    /// Tasks whose move out of the column or whose deletion is still in
    /// flight count as held, since a rollback would put them back.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotLoaded`] unless the tasks are loaded,
    /// [`BoardError::ColumnNotEmpty`] if the column holds tasks, leaving both
    /// the column and its tasks untouched, or [`BoardError::ColumnNotFound`]
    /// if there is no such column.
    #[instrument(skip(self))]
    pub fn delete_column(&mut self, name: &str) -> Result<()> {
        if self.state != LoadState::Ready {
            return Err(BoardError::NotLoaded(self.state.to_string()));
        }
        let tasks = self.sync.tasks_referencing(name);
        if tasks > 0 {
            return Err(BoardError::ColumnNotEmpty {
                column: name.to_string(),
                tasks,
            });
        }
        self.registry.remove_column(self.project_id, name)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::TaskNotFound`] if the task is not on the board.
    pub fn delete_task(&mut self, task_id: TaskId) -> Result<()> {
        self.sync.delete_task(task_id)
    }

    /// Returns what a new-task form needs.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored layout cannot be read.
    pub fn new_task_context(&self) -> Result<NewTaskContext> {
        Ok(NewTaskContext {
            project_id: self.project_id,
            statuses: self.registry.column_names(self.project_id)?,
        })
    }

    /// Creates a task on the service and adds it to the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidTask`] if the request has a blank title,
    /// [`BoardError::ColumnNotFound`] if its status is not a column of the
    /// project and [`BoardError::Api`] if the service refuses it.
    #[instrument(skip(self, task), fields(project_id = self.project_id))]
    pub async fn create_task(&mut self, task: NewTask) -> Result<Task> {
        task.validate()?;
        if let Some(status) = &task.status {
            if !self.registry.column_names(self.project_id)?.contains(status) {
                return Err(BoardError::ColumnNotFound(status.clone()));
            }
        }
        let created = self.sync.service().create_task(&task).await?;
        info!(task_id = created.id, "task created");
        self.sync.insert(created.clone());
        Ok(created)
    }

    /// Waits for the next finished request and applies it.
    pub async fn next_event(&mut self) -> Option<SyncEvent> {
        self.sync.next_event().await
    }

    /// Applies requests that already finished.
    pub fn drain_events(&mut self) -> Vec<SyncEvent> {
        self.sync.drain_events()
    }

    /// Waits for every outstanding request.
    pub async fn settle(&mut self) -> Vec<SyncEvent> {
        self.sync.settle().await
    }
}
