//! Domain events for the To-do context.

use helperbot_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

/// Emitted when a task is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAdded {
    /// The trimmed task text.
    pub task: String,
}

/// Emitted when a task is removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRemoved {
    /// 0-based index of the removed task.
    pub index: usize,
    /// The removed task text.
    pub task: String,
}

/// Event payload variants for the To-do context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoEventKind {
    /// A task was appended.
    TaskAdded(TaskAdded),
    /// A task was removed.
    TaskRemoved(TaskRemoved),
}

/// Domain event envelope for the To-do context.
#[derive(Debug, Clone)]
pub struct TodoEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: TodoEventKind,
}

impl TodoEventKind {
    /// Stable event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TaskAdded(_) => "todo.task_added",
            Self::TaskRemoved(_) => "todo.task_removed",
        }
    }
}

impl DomainEvent for TodoEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
