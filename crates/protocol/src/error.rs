//! Error types for the corkboard-protocol crate.
//!
//! This module defines the errors that can occur when decoding protocol
//! types or validating requests before they are sent.

use thiserror::Error;

/// Errors that can occur during protocol operations.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Failed to deserialize a protocol type from JSON.
    #[error("failed to deserialize from JSON: {0}")]
    DeserializationFailed(#[source] serde_json::Error),

    /// A task title was empty or blank.
    #[error("invalid task title: title cannot be empty")]
    InvalidTaskTitle,
}

/// A specialized Result type for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
