//! Task-related types for the Kanban board.
//!
//! This module defines the task record exchanged with the task service,
//! together with the people, attachments and comments hanging off it.
//! Field names follow the service's camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};

/// Server-assigned identifier for a task.
pub type TaskId = i64;

/// Identifier of the project a task belongs to.
pub type ProjectId = i64;

/// Priority of a task.
///
/// # Examples
///
/// ```
/// use corkboard_protocol::Priority;
///
/// let json = serde_json::to_string(&Priority::Urgent).unwrap();
/// assert_eq!(json, r#""Urgent""#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Drop everything else.
    Urgent,
    /// Should be picked up next.
    High,
    /// Normal priority.
    Medium,
    /// Can wait.
    Low,
    /// Not planned yet.
    Backlog,
}

impl Priority {
    /// Returns all priorities from most to least pressing.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Urgent,
            Self::High,
            Self::Medium,
            Self::Low,
            Self::Backlog,
        ]
    }

    /// Returns the display name of the priority.
    ///
    /// # Examples
    ///
    /// ```
    /// use corkboard_protocol::Priority;
    ///
    /// assert_eq!(Priority::Medium.display_name(), "Medium");
    /// ```
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Urgent => "Urgent",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Backlog => "Backlog",
        }
    }
}

/// A user as embedded in task records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// Identity-provider user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clerk_user_id: Option<String>,
    /// Display name.
    pub username: String,
    /// Contact address.
    #[serde(default)]
    pub email: String,
    /// Relative URL of the avatar.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A file attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: i64,
    #[serde(rename = "fileURL")]
    pub file_url: String,
    pub file_name: String,
    pub task_id: TaskId,
    pub uploaded_by_id: i64,
}

/// A single comment left on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub task_id: TaskId,
    pub user_id: i64,
}

/// Comments on a task.
///
/// The service returns either a list of comment records or, for older
/// records, a single free-text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Comments {
    /// Structured comment records.
    List(Vec<Comment>),
    /// A single free-text note.
    Text(String),
}

impl Comments {
    /// Returns the number of comments.
    ///
    /// A non-empty free-text note counts as one comment.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::List(list) => list.len(),
            Self::Text(text) if text.trim().is_empty() => 0,
            Self::Text(_) => 1,
        }
    }
}

/// A task on the board.
///
/// `status` is the name of the column the task sits in. A task with no
/// status, or with a status no column carries, is unassigned.
///
/// # Examples
///
/// ```
/// use corkboard_protocol::Task;
///
/// let task = Task::new(1, 7, "Write release notes").with_status("To Do");
/// assert_eq!(task.status.as_deref(), Some("To Do"));
/// assert_eq!(task.project_id, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned identifier.
    pub id: TaskId,
    /// Short summary of the task.
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Name of the column this task is placed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Comma-delimited tag list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    /// Project the task belongs to.
    pub project_id: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<User>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Comments>,
}

impl Task {
    /// Creates a task with only the required fields set.
    #[must_use]
    pub fn new(id: TaskId, project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            status: None,
            priority: None,
            tags: None,
            start_date: None,
            due_date: None,
            points: None,
            project_id,
            author_user_id: None,
            assigned_user_id: None,
            author: None,
            assignee: None,
            attachments: Vec::new(),
            comments: None,
        }
    }

    /// Sets the status, consuming and returning the task.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the priority, consuming and returning the task.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Returns `true` if the task currently sits in `column`.
    ///
    /// # Examples
    ///
    /// ```
    /// use corkboard_protocol::Task;
    ///
    /// let task = Task::new(1, 1, "Ship it").with_status("Completed");
    /// assert!(task.is_in("Completed"));
    /// assert!(!task.is_in("completed"));
    /// ```
    #[must_use]
    pub fn is_in(&self, column: &str) -> bool {
        self.status.as_deref() == Some(column)
    }

    /// Splits the comma-delimited tags, dropping blanks.
    ///
    /// # Examples
    ///
    /// ```
    /// use corkboard_protocol::Task;
    ///
    /// let mut task = Task::new(1, 1, "Tagged");
    /// task.tags = Some("Network, Deploy,,".to_string());
    /// assert_eq!(task.tag_list(), vec!["Network", "Deploy"]);
    /// ```
    #[must_use]
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the number of comments on the task.
    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.comments.as_ref().map_or(0, Comments::count)
    }
}

/// Body of a task creation request.
///
/// Built by the new-task form and sent as-is to the service, which assigns
/// the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    pub project_id: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_user_id: Option<i64>,
}

impl NewTask {
    /// Creates a creation request with a title and target column.
    #[must_use]
    pub fn new(project_id: ProjectId, title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: Some(status.into()),
            project_id,
            ..Self::default()
        }
    }

    /// Checks the request before it is sent.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidTaskTitle`] if the title is blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use corkboard_protocol::NewTask;
    ///
    /// assert!(NewTask::new(1, "Triage inbox", "To Do").validate().is_ok());
    /// assert!(NewTask::new(1, "  ", "To Do").validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ProtocolError::InvalidTaskTitle);
        }
        Ok(())
    }

    /// Turns the request into the task the service would return for `id`.
    ///
    /// Used by in-memory services and the demo board.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            tags: self.tags,
            start_date: self.start_date,
            due_date: self.due_date,
            points: self.points,
            project_id: self.project_id,
            author_user_id: self.author_user_id,
            assigned_user_id: self.assigned_user_id,
            author: None,
            assignee: None,
            attachments: Vec::new(),
            comments: None,
        }
    }
}
