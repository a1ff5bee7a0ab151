//! Error types for task service operations.
//!
//! This module defines the errors that can occur while talking to the task
//! service, whether the request never got an answer or the service refused
//! it.

use corkboard_protocol::TaskId;

/// Errors that can occur during task service operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be sent or its response could not be read.
    #[error("task service request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("task service returned HTTP {status}{}", format_body(.body))]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, possibly empty.
        body: String,
    },

    /// The requested task does not exist on the service.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    /// The request stopped before the service answered.
    #[error("task service request was interrupted")]
    Interrupted,

    /// The configured base URL cannot be used.
    #[error("invalid task service URL {url:?}: {reason}")]
    InvalidUrl {
        /// The configured URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Formats the response body for the status error message.
fn format_body(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

impl Error {
    /// Returns `true` if the service reported that the resource is gone.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::TaskNotFound(_) => true,
            Self::Status { status, .. } => *status == 404,
            Self::Http(err) => err.status().is_some_and(|s| s.as_u16() == 404),
            Self::InvalidUrl { .. } | Self::Interrupted => false,
        }
    }
}

/// A specialized Result type for task service operations.
pub type Result<T> = std::result::Result<T, Error>;
