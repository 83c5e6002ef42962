//! Query handlers for the To-do context.

use helperbot_conversation::application::context::ConversationContext;
use helperbot_core::reply::ReplyMessage;

/// Reply when there are no tasks.
pub const EMPTY_LIST: &str = "やることリストは空です。";

/// Renders the list as a 1-based numbered message.
#[must_use]
pub fn handle_show_list(context: &ConversationContext<'_>) -> Vec<ReplyMessage> {
    let tasks = &context.config().todo_list;
    if tasks.is_empty() {
        return vec![ReplyMessage::text(EMPTY_LIST)];
    }
    let lines = tasks
        .iter()
        .enumerate()
        .map(|(i, task)| format!("{}. {task}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    vec![ReplyMessage::text(format!("やることリスト:\n{lines}"))]
}
