//! Aggregate root for the To-do context.

use helperbot_core::aggregate::AggregateRoot;
use helperbot_core::config::{Config, ConfigPatch};
use helperbot_core::conversation::ConversationKey;
use helperbot_core::event::EventMetadata;
use thiserror::Error;
use uuid::Uuid;

use super::events::{TaskAdded, TaskRemoved, TodoEvent, TodoEventKind};

/// Rejections of to-do commands. None of them mutates the list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    /// The task text was blank after trimming.
    #[error("task text is empty")]
    EmptyTask,

    /// There is nothing to remove.
    #[error("to-do list is empty")]
    ListEmpty,

    /// The position was not a number in `[1, len]`.
    #[error("invalid position {position:?} for a list of {len}")]
    InvalidPosition {
        /// The position as typed.
        position: String,
        /// Current list length.
        len: usize,
    },
}

/// The to-do projection of one conversation's config.
#[derive(Debug)]
pub struct TodoList {
    key: ConversationKey,
    pub(crate) tasks: Vec<String>,
    uncommitted_events: Vec<TodoEvent>,
}

impl TodoList {
    /// Projects the list out of a merged config.
    #[must_use]
    pub fn from_config(key: ConversationKey, config: &Config) -> Self {
        Self {
            key,
            tasks: config.todo_list.clone(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Tasks in insertion order.
    #[must_use]
    pub fn tasks(&self) -> &[String] {
        &self.tasks
    }

    /// Appends a trimmed task and returns it.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::EmptyTask` if the text is blank.
    pub fn add(&mut self, task: &str, correlation_id: Uuid) -> Result<String, TodoError> {
        let task = task.trim();
        if task.is_empty() {
            return Err(TodoError::EmptyTask);
        }
        self.record(
            correlation_id,
            TodoEventKind::TaskAdded(TaskAdded {
                task: task.to_owned(),
            }),
        );
        Ok(task.to_owned())
    }

    /// Removes the task at a 1-based `position` and returns it. The order
    /// of the remaining tasks is preserved.
    ///
    /// # Errors
    ///
    /// Returns `TodoError::ListEmpty` if there are no tasks, or
    /// `TodoError::InvalidPosition` if `position` is not an integer in
    /// `[1, len]`.
    pub fn remove(&mut self, position: &str, correlation_id: Uuid) -> Result<String, TodoError> {
        if self.tasks.is_empty() {
            return Err(TodoError::ListEmpty);
        }
        let len = self.tasks.len();
        let index = position
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=len).contains(n))
            .map(|n| n - 1)
            .ok_or_else(|| TodoError::InvalidPosition {
                position: position.trim().to_owned(),
                len,
            })?;
        let task = self.tasks[index].clone();
        self.record(
            correlation_id,
            TodoEventKind::TaskRemoved(TaskRemoved {
                index,
                task: task.clone(),
            }),
        );
        Ok(task)
    }

    fn record(&mut self, correlation_id: Uuid, kind: TodoEventKind) {
        let event = TodoEvent {
            metadata: EventMetadata {
                event_type: kind.event_type().to_owned(),
                conversation: self.key.path(),
                correlation_id,
            },
            kind,
        };
        self.apply(&event);
        self.uncommitted_events.push(event);
    }
}

impl AggregateRoot for TodoList {
    type Event = TodoEvent;

    fn conversation(&self) -> &ConversationKey {
        &self.key
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            TodoEventKind::TaskAdded(payload) => self.tasks.push(payload.task.clone()),
            TodoEventKind::TaskRemoved(payload) => {
                if payload.index < self.tasks.len() {
                    self.tasks.remove(payload.index);
                }
            }
        }
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }

    fn pending_patch(&self) -> ConfigPatch {
        if self.uncommitted_events.is_empty() {
            return ConfigPatch::default();
        }
        ConfigPatch {
            todo_list: Some(self.tasks.clone()),
            ..ConfigPatch::default()
        }
    }
}
