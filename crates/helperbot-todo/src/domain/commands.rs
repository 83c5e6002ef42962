//! Commands for the To-do context.

use helperbot_core::command::Command;
use uuid::Uuid;

/// Command to append a task.
#[derive(Debug, Clone)]
pub struct AddTask {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Raw task text; trimmed before use.
    pub task: String,
}

/// Command to remove the task at a 1-based position.
#[derive(Debug, Clone)]
pub struct RemoveTask {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Raw position text as typed by the user.
    pub position: String,
}

impl Command for AddTask {
    fn command_type(&self) -> &'static str {
        "todo.add_task"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl Command for RemoveTask {
    fn command_type(&self) -> &'static str {
        "todo.remove_task"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
