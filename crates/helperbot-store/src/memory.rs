//! Process-local `ConversationStore`, for development and tests.

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::{Map, Value};

use helperbot_core::config::{Config, ConfigPatch, StoredConfig};
use helperbot_core::conversation::ConversationKey;
use helperbot_core::error::DomainError;
use helperbot_core::store::ConversationStore;

/// Keeps raw JSON records in memory with the same shallow-merge semantics
/// as the remote store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    records: DashMap<ConversationKey, Value>,
}

impl InMemoryConversationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations with a record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no conversation has a record yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn to_object<T: serde::Serialize>(value: &T) -> Result<Map<String, Value>, DomainError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(DomainError::Infrastructure(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(e) => Err(DomainError::Infrastructure(format!("serialization failed: {e}"))),
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn load(&self, key: &ConversationKey) -> Result<StoredConfig, DomainError> {
        let raw = self
            .records
            .get(key)
            .map_or(Value::Null, |record| record.value().clone());
        StoredConfig::from_json(raw)
    }

    async fn replace(&self, key: &ConversationKey, config: &Config) -> Result<(), DomainError> {
        let fields = to_object(config)?;
        self.records.insert(key.clone(), Value::Object(fields));
        Ok(())
    }

    async fn update(&self, key: &ConversationKey, patch: &ConfigPatch) -> Result<(), DomainError> {
        let fields = to_object(patch)?;
        let mut record = self
            .records
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        match record.value_mut() {
            Value::Object(existing) => existing.extend(fields),
            other => *other = Value::Object(fields),
        }
        Ok(())
    }
}
