//! Drag-and-drop payloads and drop targets.
//!
//! Two kinds of things can be dragged on a board: task cards and column
//! headers. Both travel through the same gesture substrate, so every
//! payload carries a `kind` tag and every drop target says which part of a
//! column the pointer is over.

use serde::{Deserialize, Serialize};

use crate::error::{ProtocolError, Result};
use crate::task::TaskId;

/// What is being dragged.
///
/// Payloads arrive from the gesture layer as JSON tagged by `kind`. Kinds
/// this crate does not know about deserialize to [`DragPayload::Unknown`]
/// so they can be ignored instead of failing.
///
/// # Examples
///
/// ```
/// use corkboard_protocol::DragPayload;
///
/// let payload: DragPayload = serde_json::from_str(r#"{"kind":"task","taskId":3}"#).unwrap();
/// assert_eq!(payload, DragPayload::Task { task_id: 3 });
///
/// let other: DragPayload = serde_json::from_str(r#"{"kind":"file"}"#).unwrap();
/// assert_eq!(other, DragPayload::Unknown);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum DragPayload {
    /// A task card.
    Task {
        /// The dragged task.
        task_id: TaskId,
    },
    /// A column header.
    Column {
        /// Name of the dragged column.
        column_id: String,
    },
    /// Anything else the gesture layer reports.
    #[serde(other)]
    Unknown,
}

impl DragPayload {
    /// Creates a task payload.
    #[must_use]
    pub const fn task(task_id: TaskId) -> Self {
        Self::Task { task_id }
    }

    /// Decodes a payload handed over by the gesture layer.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::DeserializationFailed`] if the input is not
    /// a JSON object with a `kind` tag.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(ProtocolError::DeserializationFailed)
    }

    /// Creates a column payload.
    #[must_use]
    pub fn column(column_id: impl Into<String>) -> Self {
        Self::Column {
            column_id: column_id.into(),
        }
    }
}

/// The part of a column the pointer is over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "zone", content = "column", rename_all = "snake_case")]
pub enum DropTarget {
    /// The body of a column, where task cards are listed.
    ColumnBody(String),
    /// The header of a column, which is itself draggable.
    ColumnHeader(String),
}

impl DropTarget {
    /// Returns the name of the column under the pointer.
    ///
    /// # Examples
    ///
    /// ```
    /// use corkboard_protocol::DropTarget;
    ///
    /// assert_eq!(DropTarget::ColumnBody("To Do".into()).column(), "To Do");
    /// ```
    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::ColumnBody(name) | Self::ColumnHeader(name) => name,
        }
    }
}
