//! Drag gesture interpretation.
//!
//! The gesture layer reports raw events: a drag begins with a payload, the
//! pointer hovers over parts of columns, and the drag ends with a drop or a
//! cancel. [`DragCoordinator`] turns that stream into board intents.
//!
//! Task cards move only when dropped on a column body. Column headers
//! reorder live while hovering, which means the hovered header swaps place
//! with the dragged one; repeated hover events over that same header are
//! swallowed so the pair does not swap back and forth.

use corkboard_protocol::{DragPayload, DropTarget, TaskId};
use tracing::debug;

/// A raw gesture event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    /// A drag started carrying this payload.
    Begin(DragPayload),
    /// The pointer is over a drop target.
    Hover(DropTarget),
    /// The payload was released over a drop target.
    Drop(DropTarget),
    /// The drag was abandoned.
    Cancel,
}

/// What the board should do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragIntent {
    /// Move a task to another column.
    MoveTask { task_id: TaskId, to: String },
    /// Move column `moved` to the position of column `target`.
    ReorderColumn { moved: String, target: String },
    /// Nothing to do.
    Ignore(IgnoreReason),
}

/// Why an event produced no intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// A gesture just started.
    Started,
    /// There is no gesture in progress.
    NoActiveGesture,
    /// The payload kind is not one the board handles.
    UnknownPayload,
    /// The target zone does not accept this payload kind.
    WrongTarget,
    /// A task card is hovering; it only moves on drop.
    AwaitingDrop,
    /// A column is over its own header.
    SameColumn,
    /// This header was already handled during the gesture.
    AlreadyHovered,
    /// A column drag ended; its reorders already happened while hovering.
    Finished,
    /// The gesture was cancelled.
    Cancelled,
}

#[derive(Debug, Clone)]
struct Gesture {
    payload: DragPayload,
    last_header: Option<String>,
}

/// Turns gesture events into [`DragIntent`]s.
///
/// # Examples
///
/// ```
/// use corkboard_board::drag::{DragCoordinator, DragEvent, DragIntent};
/// use corkboard_protocol::{DragPayload, DropTarget};
///
/// let mut drag = DragCoordinator::new();
/// drag.handle(DragEvent::Begin(DragPayload::task(7)));
///
/// let intent = drag.handle(DragEvent::Drop(DropTarget::ColumnBody("Completed".into())));
/// assert_eq!(
///     intent,
///     DragIntent::MoveTask { task_id: 7, to: "Completed".into() }
/// );
/// assert!(!drag.is_active());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DragCoordinator {
    gesture: Option<Gesture>,
}

impl DragCoordinator {
    /// Creates a coordinator with no gesture in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` while a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Returns the payload of the gesture in progress.
    #[must_use]
    pub fn payload(&self) -> Option<&DragPayload> {
        self.gesture.as_ref().map(|g| &g.payload)
    }

    /// Interprets one event.
    pub fn handle(&mut self, event: DragEvent) -> DragIntent {
        let intent = match event {
            DragEvent::Begin(payload) => self.begin(payload),
            DragEvent::Hover(target) => self.hover(target),
            DragEvent::Drop(target) => self.drop(target),
            DragEvent::Cancel => match self.gesture.take() {
                Some(_) => DragIntent::Ignore(IgnoreReason::Cancelled),
                None => DragIntent::Ignore(IgnoreReason::NoActiveGesture),
            },
        };
        debug!(?intent, "drag event handled");
        intent
    }

    fn begin(&mut self, payload: DragPayload) -> DragIntent {
        if payload == DragPayload::Unknown {
            self.gesture = None;
            return DragIntent::Ignore(IgnoreReason::UnknownPayload);
        }
        self.gesture = Some(Gesture {
            payload,
            last_header: None,
        });
        DragIntent::Ignore(IgnoreReason::Started)
    }

    fn hover(&mut self, target: DropTarget) -> DragIntent {
        let Some(gesture) = self.gesture.as_mut() else {
            return DragIntent::Ignore(IgnoreReason::NoActiveGesture);
        };

        match (&gesture.payload, target) {
            (DragPayload::Column { column_id }, DropTarget::ColumnHeader(header)) => {
                if gesture.last_header.as_deref() == Some(header.as_str()) {
                    return DragIntent::Ignore(IgnoreReason::AlreadyHovered);
                }
                let moved = column_id.clone();
                gesture.last_header = Some(header.clone());
                if moved == header {
                    return DragIntent::Ignore(IgnoreReason::SameColumn);
                }
                DragIntent::ReorderColumn {
                    moved,
                    target: header,
                }
            }
            (DragPayload::Task { .. }, DropTarget::ColumnBody(_)) => {
                DragIntent::Ignore(IgnoreReason::AwaitingDrop)
            }
            (DragPayload::Unknown, _) => DragIntent::Ignore(IgnoreReason::UnknownPayload),
            _ => DragIntent::Ignore(IgnoreReason::WrongTarget),
        }
    }

    fn drop(&mut self, target: DropTarget) -> DragIntent {
        let Some(gesture) = self.gesture.take() else {
            return DragIntent::Ignore(IgnoreReason::NoActiveGesture);
        };

        match (gesture.payload, target) {
            (DragPayload::Task { task_id }, DropTarget::ColumnBody(to)) => {
                DragIntent::MoveTask { task_id, to }
            }
            (DragPayload::Column { .. }, DropTarget::ColumnHeader(_)) => {
                DragIntent::Ignore(IgnoreReason::Finished)
            }
            (DragPayload::Unknown, _) => DragIntent::Ignore(IgnoreReason::UnknownPayload),
            _ => DragIntent::Ignore(IgnoreReason::WrongTarget),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(name: &str) -> DropTarget {
        DropTarget::ColumnBody(name.to_string())
    }

    fn header(name: &str) -> DropTarget {
        DropTarget::ColumnHeader(name.to_string())
    }

    fn reorder(moved: &str, target: &str) -> DragIntent {
        DragIntent::ReorderColumn {
            moved: moved.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn task_moves_only_on_drop() {
        let mut drag = DragCoordinator::new();
        assert_eq!(
            drag.handle(DragEvent::Begin(DragPayload::task(3))),
            DragIntent::Ignore(IgnoreReason::Started)
        );
        assert_eq!(
            drag.handle(DragEvent::Hover(body("Completed"))),
            DragIntent::Ignore(IgnoreReason::AwaitingDrop)
        );
        assert_eq!(
            drag.handle(DragEvent::Drop(body("Completed"))),
            DragIntent::MoveTask {
                task_id: 3,
                to: "Completed".to_string()
            }
        );
        assert!(!drag.is_active());
    }

    #[test]
    fn task_dropped_on_header_is_ignored() {
        let mut drag = DragCoordinator::new();
        drag.handle(DragEvent::Begin(DragPayload::task(3)));
        assert_eq!(
            drag.handle(DragEvent::Drop(header("Completed"))),
            DragIntent::Ignore(IgnoreReason::WrongTarget)
        );
        assert!(!drag.is_active());
    }

    #[test]
    fn column_reorders_on_hover() {
        let mut drag = DragCoordinator::new();
        drag.handle(DragEvent::Begin(DragPayload::column("Completed")));

        assert_eq!(drag.handle(DragEvent::Hover(header("Under Review"))), reorder("Completed", "Under Review"));
        assert_eq!(
            drag.handle(DragEvent::Hover(header("Work In Progress"))),
            reorder("Completed", "Work In Progress")
        );
        assert_eq!(
            drag.handle(DragEvent::Drop(header("Work In Progress"))),
            DragIntent::Ignore(IgnoreReason::Finished)
        );
    }

    #[test]
    fn repeated_hover_over_same_header_fires_once() {
        let mut drag = DragCoordinator::new();
        drag.handle(DragEvent::Begin(DragPayload::column("To Do")));

        assert_eq!(drag.handle(DragEvent::Hover(header("Completed"))), reorder("To Do", "Completed"));
        for _ in 0..5 {
            assert_eq!(
                drag.handle(DragEvent::Hover(header("Completed"))),
                DragIntent::Ignore(IgnoreReason::AlreadyHovered)
            );
        }

        // Leaving and coming back is a new hover.
        assert_eq!(drag.handle(DragEvent::Hover(header("To Do"))), DragIntent::Ignore(IgnoreReason::SameColumn));
        assert_eq!(drag.handle(DragEvent::Hover(header("Completed"))), reorder("To Do", "Completed"));
    }

    #[test]
    fn column_over_body_is_wrong_target() {
        let mut drag = DragCoordinator::new();
        drag.handle(DragEvent::Begin(DragPayload::column("To Do")));
        assert_eq!(
            drag.handle(DragEvent::Hover(body("Completed"))),
            DragIntent::Ignore(IgnoreReason::WrongTarget)
        );
        assert!(drag.is_active());
    }

    #[test]
    fn unknown_payload_never_mutates() {
        let mut drag = DragCoordinator::new();
        assert_eq!(
            drag.handle(DragEvent::Begin(DragPayload::Unknown)),
            DragIntent::Ignore(IgnoreReason::UnknownPayload)
        );
        assert!(!drag.is_active());
        assert_eq!(
            drag.handle(DragEvent::Drop(body("To Do"))),
            DragIntent::Ignore(IgnoreReason::NoActiveGesture)
        );
    }

    #[test]
    fn payload_decoded_from_gesture_json() {
        let mut drag = DragCoordinator::new();
        let payload = DragPayload::from_json(r#"{"kind":"sticker","id":4}"#).unwrap();
        assert_eq!(
            drag.handle(DragEvent::Begin(payload)),
            DragIntent::Ignore(IgnoreReason::UnknownPayload)
        );
    }

    #[test]
    fn cancel_ends_gesture() {
        let mut drag = DragCoordinator::new();
        drag.handle(DragEvent::Begin(DragPayload::task(1)));
        assert_eq!(drag.payload(), Some(&DragPayload::task(1)));

        assert_eq!(drag.handle(DragEvent::Cancel), DragIntent::Ignore(IgnoreReason::Cancelled));
        assert_eq!(drag.handle(DragEvent::Cancel), DragIntent::Ignore(IgnoreReason::NoActiveGesture));
        assert_eq!(
            drag.handle(DragEvent::Drop(body("To Do"))),
            DragIntent::Ignore(IgnoreReason::NoActiveGesture)
        );
    }

    #[test]
    fn events_without_gesture_are_ignored() {
        let mut drag = DragCoordinator::new();
        assert_eq!(
            drag.handle(DragEvent::Hover(header("To Do"))),
            DragIntent::Ignore(IgnoreReason::NoActiveGesture)
        );
    }

    #[test]
    fn new_begin_replaces_gesture() {
        let mut drag = DragCoordinator::new();
        drag.handle(DragEvent::Begin(DragPayload::column("To Do")));
        drag.handle(DragEvent::Begin(DragPayload::task(9)));
        assert_eq!(
            drag.handle(DragEvent::Drop(body("Completed"))),
            DragIntent::MoveTask {
                task_id: 9,
                to: "Completed".to_string()
            }
        );
    }
}
