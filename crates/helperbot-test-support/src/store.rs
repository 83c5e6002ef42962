//! Test stores — mock `ConversationStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use helperbot_core::config::{Config, ConfigPatch, StoredConfig};
use helperbot_core::conversation::ConversationKey;
use helperbot_core::error::DomainError;
use helperbot_core::store::ConversationStore;
use serde_json::Value;

/// An in-memory store that keeps raw JSON records and records every write.
///
/// Reads and writes yield to the scheduler once, so concurrent callers
/// interleave the way they would against a remote store.
#[derive(Debug, Default)]
pub struct RecordingConversationStore {
    records: Mutex<HashMap<String, Value>>,
    replaced: Mutex<Vec<(ConversationKey, Config)>>,
    updates: Mutex<Vec<(ConversationKey, ConfigPatch)>>,
}

impl RecordingConversationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one raw record.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_record(key: &ConversationKey, record: Value) -> Self {
        let store = Self::default();
        store.records.lock().unwrap().insert(key.path(), record);
        store
    }

    /// Create a store holding one complete config.
    ///
    /// # Panics
    ///
    /// Panics if the config cannot be serialized.
    #[must_use]
    pub fn with_config(key: &ConversationKey, config: &Config) -> Self {
        Self::with_record(key, serde_json::to_value(config).unwrap())
    }

    /// Returns the raw record currently stored for `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn record(&self, key: &ConversationKey) -> Option<Value> {
        self.records.lock().unwrap().get(&key.path()).cloned()
    }

    /// Returns the stored record for `key` merged with defaults.
    ///
    /// # Panics
    ///
    /// Panics if the stored record is malformed.
    pub fn config(&self, key: &ConversationKey) -> Config {
        let raw = self.record(key).unwrap_or(Value::Null);
        StoredConfig::from_json(raw).unwrap().merge_with_defaults()
    }

    /// Returns a snapshot of all whole-record writes.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn replaced(&self) -> Vec<(ConversationKey, Config)> {
        self.replaced.lock().unwrap().clone()
    }

    /// Returns a snapshot of all partial updates.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn updates(&self) -> Vec<(ConversationKey, ConfigPatch)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationStore for RecordingConversationStore {
    async fn load(&self, key: &ConversationKey) -> Result<StoredConfig, DomainError> {
        let raw = self.record(key).unwrap_or(Value::Null);
        tokio::task::yield_now().await;
        StoredConfig::from_json(raw)
    }

    async fn replace(&self, key: &ConversationKey, config: &Config) -> Result<(), DomainError> {
        let value = serde_json::to_value(config)
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?;
        self.records.lock().unwrap().insert(key.path(), value);
        self.replaced
            .lock()
            .unwrap()
            .push((key.clone(), config.clone()));
        Ok(())
    }

    async fn update(&self, key: &ConversationKey, patch: &ConfigPatch) -> Result<(), DomainError> {
        tokio::task::yield_now().await;
        let Value::Object(fields) = serde_json::to_value(patch)
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?
        else {
            return Err(DomainError::Infrastructure("patch is not an object".into()));
        };
        {
            let mut records = self.records.lock().unwrap();
            let record = records
                .entry(key.path())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
            if !record.is_object() {
                *record = Value::Object(serde_json::Map::new());
            }
            if let Value::Object(existing) = record {
                existing.extend(fields);
            }
        }
        self.updates.lock().unwrap().push((key.clone(), patch.clone()));
        Ok(())
    }
}

/// A store that always returns an infrastructure error. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingConversationStore;

#[async_trait]
impl ConversationStore for FailingConversationStore {
    async fn load(&self, _key: &ConversationKey) -> Result<StoredConfig, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn replace(&self, _key: &ConversationKey, _config: &Config) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn update(
        &self,
        _key: &ConversationKey,
        _patch: &ConfigPatch,
    ) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
