//! Per-conversation serialization.
//!
//! Events for one conversation must not interleave their read-modify-write
//! cycles against the store. Each conversation gets its own async mutex;
//! events for different conversations never wait on each other.

use std::sync::Arc;

use dashmap::DashMap;
use helperbot_core::conversation::ConversationKey;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-conversation locks.
///
/// Entries are created on demand and pruned once no task holds or waits
/// on them.
#[derive(Debug, Clone, Default)]
pub struct ConversationLocks {
    locks: Arc<DashMap<ConversationKey, Arc<Mutex<()>>>>,
}

impl ConversationLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until `key` is free and returns a guard holding it.
    pub async fn acquire(&self, key: &ConversationKey) -> ConversationGuard {
        let lock = self.locks.entry(key.clone()).or_default().clone();
        let guard = lock.lock_owned().await;
        ConversationGuard {
            guard: Some(guard),
            key: key.clone(),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Number of conversations with a live lock entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no lock entries are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive hold on one conversation; released on drop.
#[derive(Debug)]
pub struct ConversationGuard {
    guard: Option<OwnedMutexGuard<()>>,
    key: ConversationKey,
    locks: Arc<DashMap<ConversationKey, Arc<Mutex<()>>>>,
}

impl Drop for ConversationGuard {
    fn drop(&mut self) {
        // The guard owns one reference to the mutex; release it before
        // checking whether the map holds the last one.
        drop(self.guard.take());
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}
