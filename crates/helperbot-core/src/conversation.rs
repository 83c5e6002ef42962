//! Conversation identity and the normalized inbound event.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User id used when the platform does not disclose who sent a message.
pub const ANONYMOUS_USER: &str = "anonymous";

/// The kind of conversation an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    /// A one-to-one chat with a single user.
    User,
    /// A group chat.
    Group,
    /// A multi-person room.
    Room,
}

impl ConversationKind {
    /// Path segment used by the conversation store.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
            Self::Room => "room",
        }
    }
}

/// Identifies one conversation and therefore one `Config` record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationKey {
    /// Conversation kind.
    pub kind: ConversationKind,
    /// Platform identifier of the user, group, or room.
    pub id: String,
}

impl ConversationKey {
    /// Creates a key for a one-to-one conversation.
    #[must_use]
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            kind: ConversationKind::User,
            id: id.into(),
        }
    }

    /// Creates a key for a group conversation.
    #[must_use]
    pub fn group(id: impl Into<String>) -> Self {
        Self {
            kind: ConversationKind::Group,
            id: id.into(),
        }
    }

    /// Creates a key for a room conversation.
    #[must_use]
    pub fn room(id: impl Into<String>) -> Self {
        Self {
            kind: ConversationKind::Room,
            id: id.into(),
        }
    }

    /// Store path relative to the data root, e.g. `group/C123`.
    #[must_use]
    pub fn path(&self) -> String {
        format!("{}/{}", self.kind.as_str(), self.id)
    }

    /// Whether this is a direct one-to-one conversation.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.kind == ConversationKind::User
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.as_str(), self.id)
    }
}

/// A platform-neutral inbound event, already resolved to its conversation.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    /// Correlation ID for tracing this event through the system.
    pub correlation_id: Uuid,
    /// The conversation this event belongs to.
    pub conversation: ConversationKey,
    /// The sending user, when the platform provides one.
    pub user_id: Option<String>,
    /// Single-use token for replying to this event.
    pub reply_token: Option<String>,
    /// Message text, present only for text message events.
    pub text: Option<String>,
}

impl InboundEvent {
    /// The acting user's id, falling back to [`ANONYMOUS_USER`].
    #[must_use]
    pub fn acting_user(&self) -> &str {
        self.user_id.as_deref().unwrap_or(ANONYMOUS_USER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_prefixes_kind() {
        assert_eq!(ConversationKey::user("U1").path(), "user/U1");
        assert_eq!(ConversationKey::group("C9").path(), "group/C9");
        assert_eq!(ConversationKey::room("R3").path(), "room/R3");
    }

    #[test]
    fn test_only_user_conversations_are_direct() {
        assert!(ConversationKey::user("U1").is_direct());
        assert!(!ConversationKey::group("C1").is_direct());
        assert!(!ConversationKey::room("R1").is_direct());
    }

    #[test]
    fn test_acting_user_falls_back_to_anonymous() {
        let event = InboundEvent {
            correlation_id: Uuid::new_v4(),
            conversation: ConversationKey::group("C1"),
            user_id: None,
            reply_token: None,
            text: None,
        };

        assert_eq!(event.acting_user(), ANONYMOUS_USER);
    }
}
