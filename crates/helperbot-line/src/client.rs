//! Reply API client.

use async_trait::async_trait;
use helperbot_core::error::DomainError;
use helperbot_core::reply::{QuickReplyAction, ReplyMessage, ReplySender, fold_messages};
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument, warn};

/// Public Messaging API endpoint.
pub const DEFAULT_LINE_API_BASE_URL: &str = "https://api.line.me";

/// Longest text a single message may carry, in UTF-16 code units.
pub const MAX_TEXT_LENGTH: usize = 5000;

/// Cuts `text` at a character boundary so it fits [`MAX_TEXT_LENGTH`].
fn truncate_text(text: &str) -> &str {
    let mut units = 0;
    for (index, ch) in text.char_indices() {
        units += ch.len_utf16();
        if units > MAX_TEXT_LENGTH {
            return &text[..index];
        }
    }
    text
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyRequest<'a> {
    reply_token: &'a str,
    messages: Vec<TextMessage<'a>>,
    notification_disabled: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    quick_reply: Option<QuickReply<'a>>,
}

#[derive(Debug, Serialize)]
struct QuickReply<'a> {
    items: Vec<QuickReplyItem<'a>>,
}

#[derive(Debug, Serialize)]
struct QuickReplyItem<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    action: MessageAction<'a>,
}

#[derive(Debug, Serialize)]
struct MessageAction<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    label: &'a str,
    text: &'a str,
}

impl<'a> From<&'a QuickReplyAction> for QuickReplyItem<'a> {
    fn from(action: &'a QuickReplyAction) -> Self {
        Self {
            kind: "action",
            action: MessageAction {
                kind: "message",
                label: &action.label,
                text: &action.text,
            },
        }
    }
}

impl<'a> From<&'a ReplyMessage> for TextMessage<'a> {
    fn from(message: &'a ReplyMessage) -> Self {
        let quick_reply = (!message.quick_replies.is_empty()).then(|| QuickReply {
            items: message.quick_replies.iter().map(QuickReplyItem::from).collect(),
        });
        Self {
            kind: "text",
            text: truncate_text(&message.text),
            quick_reply,
        }
    }
}

/// Sends replies through `POST {base}/v2/bot/message/reply`.
#[derive(Clone)]
pub struct LineReplyClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl std::fmt::Debug for LineReplyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineReplyClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl LineReplyClient {
    /// Creates a client authenticated with a channel access token.
    #[must_use]
    pub fn new(client: Client, base_url: &str, access_token: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            access_token,
        }
    }
}

/// Serializes a reply, folding it to the per-reply message limit.
fn reply_body(
    reply_token: &str,
    messages: &[ReplyMessage],
    notification_disabled: bool,
) -> Result<Vec<u8>, serde_json::Error> {
    let folded = fold_messages(messages.to_vec());
    let request = ReplyRequest {
        reply_token,
        messages: folded.iter().map(TextMessage::from).collect(),
        notification_disabled,
    };
    serde_json::to_vec(&request)
}

#[async_trait]
impl ReplySender for LineReplyClient {
    #[instrument(skip(self, reply_token, messages), fields(count = messages.len()))]
    async fn reply(
        &self,
        reply_token: &str,
        messages: &[ReplyMessage],
        notification_disabled: bool,
    ) -> Result<(), DomainError> {
        if messages.is_empty() {
            return Ok(());
        }
        let body = reply_body(reply_token, messages, notification_disabled)
            .map_err(|e| DomainError::Infrastructure(format!("reply serialization failed: {e}")))?;
        let response = self
            .client
            .post(format!("{}/v2/bot/message/reply", self.base_url))
            .bearer_auth(&self.access_token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| DomainError::Infrastructure(format!("reply request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let request_id = response
                .headers()
                .get("x-line-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
                .to_owned();
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, request_id = %request_id, detail = %detail, "reply rejected");
            return Err(DomainError::Infrastructure(format!("reply returned {status}")));
        }
        debug!("reply sent");
        Ok(())
    }
}
