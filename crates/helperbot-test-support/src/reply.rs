//! Test reply senders — mock `ReplySender` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use helperbot_core::error::DomainError;
use helperbot_core::reply::{ReplyMessage, ReplySender};

/// One captured reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReply {
    /// Reply token the reply was addressed to.
    pub reply_token: String,
    /// Messages in send order.
    pub messages: Vec<ReplyMessage>,
    /// Whether notifications were suppressed.
    pub notification_disabled: bool,
}

impl SentReply {
    /// Message texts in send order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.messages.iter().map(|m| m.text.as_str()).collect()
    }
}

/// Records every reply and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingReplySender {
    sent: Mutex<Vec<SentReply>>,
}

impl RecordingReplySender {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all sent replies.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn sent(&self) -> Vec<SentReply> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReplySender for RecordingReplySender {
    async fn reply(
        &self,
        reply_token: &str,
        messages: &[ReplyMessage],
        notification_disabled: bool,
    ) -> Result<(), DomainError> {
        self.sent.lock().unwrap().push(SentReply {
            reply_token: reply_token.to_owned(),
            messages: messages.to_vec(),
            notification_disabled,
        });
        Ok(())
    }
}

/// A reply sender that always fails.
#[derive(Debug)]
pub struct FailingReplySender;

#[async_trait]
impl ReplySender for FailingReplySender {
    async fn reply(
        &self,
        _reply_token: &str,
        _messages: &[ReplyMessage],
        _notification_disabled: bool,
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("reply endpoint returned 500".into()))
    }
}
