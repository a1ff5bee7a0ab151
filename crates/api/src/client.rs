//! REST client for the task service.
//!
//! This module provides [`HttpTaskService`], the [`TaskService`]
//! implementation that talks JSON over HTTP to the real backend.

use async_trait::async_trait;
use corkboard_config::ApiConfig;
use corkboard_protocol::{NewTask, ProjectId, Task, TaskId};
use reqwest::{Client, Response, Url};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::service::TaskService;

/// Body of a status change request.
#[derive(Debug, Serialize)]
struct StatusUpdate<'a> {
    status: &'a str,
}

/// Task service client over HTTP.
///
/// # Examples
///
/// ```no_run
/// use corkboard_api::{HttpTaskService, TaskService};
/// use corkboard_config::ApiConfig;
///
/// # async fn example() -> corkboard_api::Result<()> {
/// let service = HttpTaskService::new(&ApiConfig::default())?;
/// let tasks = service.fetch_tasks(1).await?;
/// println!("{} tasks", tasks.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTaskService {
    /// The underlying HTTP client.
    inner: Client,
    /// Base URL, always ending in `/` so relative joins keep its path.
    base_url: Url,
}

impl HttpTaskService {
    /// Creates a client from the API configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the base URL cannot be parsed, or
    /// [`Error::Http`] if the HTTP client fails to initialize.
    #[instrument(skip(config), fields(base_url = %config.base_url))]
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = parse_base_url(&config.base_url)?;
        let inner = Client::builder().timeout(config.timeout()).build()?;
        debug!("created task service client");
        Ok(Self { inner, base_url })
    }

    /// Returns the base URL requests are made against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves an endpoint path against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| Error::InvalidUrl {
            url: format!("{}{path}", self.base_url),
            reason: e.to_string(),
        })
    }
}

/// Parses the configured base URL, appending a trailing slash if missing.
fn parse_base_url(raw: &str) -> Result<Url> {
    let normalized = format!("{}/", raw.trim().trim_end_matches('/'));
    let url = Url::parse(&normalized).map_err(|e| Error::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(Error::InvalidUrl {
            url: raw.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}

/// Turns non-success responses into [`Error::Status`].
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = status.as_u16(), "task service rejected request");
    Err(Error::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl TaskService for HttpTaskService {
    #[instrument(skip(self))]
    async fn fetch_tasks(&self, project_id: ProjectId) -> Result<Vec<Task>> {
        let url = self.endpoint("tasks")?;
        let response = self
            .inner
            .get(url)
            .query(&[("projectId", project_id)])
            .send()
            .await?;
        let tasks: Vec<Task> = check_status(response).await?.json().await?;
        debug!(count = tasks.len(), "fetched tasks");
        Ok(tasks)
    }

    #[instrument(skip(self))]
    async fn update_task_status(&self, task_id: TaskId, status: &str) -> Result<Task> {
        let url = self.endpoint(&format!("tasks/{task_id}/status"))?;
        let response = self
            .inner
            .patch(url)
            .json(&StatusUpdate { status })
            .send()
            .await?;
        let task = check_status(response).await?.json().await?;
        debug!("task status updated");
        Ok(task)
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, task_id: TaskId) -> Result<()> {
        let url = self.endpoint(&format!("tasks/{task_id}"))?;
        let response = self.inner.delete(url).send().await?;
        check_status(response).await?;
        debug!("task deleted");
        Ok(())
    }

    #[instrument(skip(self, task), fields(project_id = task.project_id))]
    async fn create_task(&self, task: &NewTask) -> Result<Task> {
        let url = self.endpoint("tasks")?;
        let response = self.inner.post(url).json(task).send().await?;
        let created: Task = check_status(response).await?.json().await?;
        debug!(task_id = created.id, "task created");
        Ok(created)
    }
}
