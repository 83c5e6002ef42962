//! Webhook request body types.
//!
//! Only the fields the bot reads are modeled; everything else is ignored.

use helperbot_core::conversation::{ConversationKey, InboundEvent};
use helperbot_core::error::DomainError;
use serde::Deserialize;
use uuid::Uuid;

/// The body LINE posts to the webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackRequest {
    /// Bot user id the events were sent to.
    #[serde(default)]
    pub destination: Option<String>,
    /// Events in delivery order.
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One webhook event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// Event type, e.g. `message`, `follow`, `join`.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Where the event happened.
    #[serde(default)]
    pub source: Option<EventSource>,
    /// Token for a single reply; absent for events that cannot be replied to.
    #[serde(default)]
    pub reply_token: Option<String>,
    /// Message payload for `message` events.
    #[serde(default)]
    pub message: Option<EventMessage>,
    /// LINE's id for this event.
    #[serde(default)]
    pub webhook_event_id: Option<String>,
}

/// Event source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventSource {
    /// One-to-one chat.
    #[serde(rename_all = "camelCase")]
    User {
        /// The user.
        user_id: String,
    },
    /// Group chat.
    #[serde(rename_all = "camelCase")]
    Group {
        /// The group.
        group_id: String,
        /// The sender, when they have consented to sharing it.
        #[serde(default)]
        user_id: Option<String>,
    },
    /// Multi-person chat.
    #[serde(rename_all = "camelCase")]
    Room {
        /// The room.
        room_id: String,
        /// The sender, when known.
        #[serde(default)]
        user_id: Option<String>,
    },
    /// A source type this bot does not know.
    #[serde(other)]
    Unknown,
}

/// Message payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventMessage {
    /// Text message.
    Text {
        /// Message id.
        #[serde(default)]
        id: Option<String>,
        /// Message text.
        text: String,
    },
    /// Stickers, images, and everything else.
    #[serde(other)]
    Other,
}

impl EventSource {
    /// Conversation key and sender of this source.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnsupportedSource` for unknown source types.
    pub fn conversation(&self) -> Result<(ConversationKey, Option<String>), DomainError> {
        match self {
            Self::User { user_id } => Ok((ConversationKey::user(user_id), Some(user_id.clone()))),
            Self::Group { group_id, user_id } => {
                Ok((ConversationKey::group(group_id), user_id.clone()))
            }
            Self::Room { room_id, user_id } => Ok((ConversationKey::room(room_id), user_id.clone())),
            Self::Unknown => Err(DomainError::UnsupportedSource("unknown source type".into())),
        }
    }
}

impl WebhookEvent {
    /// Text of a text message event, if this is one.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match (&*self.event_type, &self.message) {
            ("message", Some(EventMessage::Text { text, .. })) => Some(text),
            _ => None,
        }
    }

    /// Normalizes this event for the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnsupportedSource` if the source is missing or
    /// of an unknown type.
    pub fn to_inbound(&self, correlation_id: Uuid) -> Result<InboundEvent, DomainError> {
        let source = self.source.as_ref().ok_or_else(|| {
            DomainError::UnsupportedSource(format!("{} event without a source", self.event_type))
        })?;
        let (conversation, user_id) = source.conversation()?;
        Ok(InboundEvent {
            correlation_id,
            conversation,
            user_id,
            reply_token: self.reply_token.clone(),
            text: self.text().map(str::to_owned),
        })
    }
}
