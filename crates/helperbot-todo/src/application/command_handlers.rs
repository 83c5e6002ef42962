//! Command handlers for the To-do context.
//!
//! Rejected commands reply with a corrective message and write nothing.

use helperbot_conversation::application::context::ConversationContext;
use helperbot_core::error::DomainError;
use helperbot_core::reply::ReplyMessage;
use tracing::{debug, info};

use super::query_handlers::EMPTY_LIST;
use crate::domain::aggregates::{TodoError, TodoList};
use crate::domain::commands::{AddTask, RemoveTask};

const ADD_USAGE: &str = "追加するタスクを「やることリスト追加 タスク名」の形式で入力してください。";
const INVALID_POSITION: &str = "正しい番号を入力してください。";

fn list_for(context: &ConversationContext<'_>) -> TodoList {
    TodoList::from_config(context.key().clone(), context.config())
}

fn rejection_reply(error: &TodoError) -> Vec<ReplyMessage> {
    let text = match error {
        TodoError::EmptyTask => ADD_USAGE,
        TodoError::ListEmpty => EMPTY_LIST,
        TodoError::InvalidPosition { .. } => INVALID_POSITION,
    };
    vec![ReplyMessage::text(text)]
}

/// Handles `AddTask`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store write fails.
pub async fn handle_add_task(
    command: &AddTask,
    context: &mut ConversationContext<'_>,
) -> Result<Vec<ReplyMessage>, DomainError> {
    let mut list = list_for(context);
    let task = match list.add(&command.task, command.correlation_id) {
        Ok(task) => task,
        Err(error) => {
            debug!(conversation = %context.key(), %error, "task rejected");
            return Ok(rejection_reply(&error));
        }
    };
    context.commit(&mut list).await?;
    info!(conversation = %context.key(), len = list.tasks().len(), "task added");
    Ok(vec![ReplyMessage::text(format!("「{task}」を追加しました。"))])
}

/// Handles `RemoveTask`.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the store write fails.
pub async fn handle_remove_task(
    command: &RemoveTask,
    context: &mut ConversationContext<'_>,
) -> Result<Vec<ReplyMessage>, DomainError> {
    let mut list = list_for(context);
    let task = match list.remove(&command.position, command.correlation_id) {
        Ok(task) => task,
        Err(error) => {
            debug!(conversation = %context.key(), %error, "removal rejected");
            return Ok(rejection_reply(&error));
        }
    };
    context.commit(&mut list).await?;
    info!(conversation = %context.key(), len = list.tasks().len(), "task removed");
    Ok(vec![ReplyMessage::text(format!("「{task}」を削除しました。"))])
}
