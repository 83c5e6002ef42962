//! Conversation store abstraction.

use async_trait::async_trait;

use crate::config::{Config, ConfigPatch, StoredConfig};
use crate::conversation::ConversationKey;
use crate::error::DomainError;

/// Remote mapping from conversation key to its `Config` record.
///
/// Last write wins; there are no transactions. Callers that need
/// read-modify-write consistency serialize per conversation themselves.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Reads the whole stored record. A conversation with nothing stored
    /// yields `StoredConfig::default()`.
    async fn load(&self, key: &ConversationKey) -> Result<StoredConfig, DomainError>;

    /// Overwrites the whole record.
    async fn replace(&self, key: &ConversationKey, config: &Config) -> Result<(), DomainError>;

    /// Shallow top-level merge of the present patch fields.
    async fn update(&self, key: &ConversationKey, patch: &ConfigPatch) -> Result<(), DomainError>;
}
