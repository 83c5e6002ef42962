//! Outbound reply messages and the sender abstraction.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::DomainError;

/// Most messages a single reply token accepts.
pub const MAX_MESSAGES_PER_REPLY: usize = 5;

/// A tappable suggestion that sends `text` when pressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickReplyAction {
    /// Button label.
    pub label: String,
    /// Text sent on tap.
    pub text: String,
}

impl QuickReplyAction {
    /// A button whose label is also the text it sends.
    #[must_use]
    pub fn literal(text: &str) -> Self {
        Self {
            label: text.to_owned(),
            text: text.to_owned(),
        }
    }
}

/// One outbound text segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplyMessage {
    /// Plain text body.
    pub text: String,
    /// Suggested replies; empty for none.
    pub quick_replies: Vec<QuickReplyAction>,
}

impl ReplyMessage {
    /// A plain text segment.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quick_replies: Vec::new(),
        }
    }

    /// Attaches quick-reply buttons.
    #[must_use]
    pub fn with_quick_replies(mut self, actions: Vec<QuickReplyAction>) -> Self {
        self.quick_replies = actions;
        self
    }
}

/// Folds a batch into at most [`MAX_MESSAGES_PER_REPLY`] segments.
///
/// Overflowing segments are joined by newlines into the last slot, which
/// keeps the quick replies of the final segment.
#[must_use]
pub fn fold_messages(mut messages: Vec<ReplyMessage>) -> Vec<ReplyMessage> {
    if messages.len() <= MAX_MESSAGES_PER_REPLY {
        return messages;
    }
    let overflow = messages.split_off(MAX_MESSAGES_PER_REPLY - 1);
    let quick_replies = overflow
        .last()
        .map(|m| m.quick_replies.clone())
        .unwrap_or_default();
    let text = overflow
        .into_iter()
        .map(|m| m.text)
        .collect::<Vec<_>>()
        .join("\n");
    messages.push(ReplyMessage {
        text,
        quick_replies,
    });
    messages
}

/// Sends replies addressed by a reply token.
#[async_trait]
pub trait ReplySender: Send + Sync {
    /// Sends `messages` in order as one reply.
    async fn reply(
        &self,
        reply_token: &str,
        messages: &[ReplyMessage],
        notification_disabled: bool,
    ) -> Result<(), DomainError>;
}
