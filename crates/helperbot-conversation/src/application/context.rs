//! A loaded conversation and its update path.

use helperbot_core::aggregate::AggregateRoot;
use helperbot_core::config::{Config, ConfigPatch};
use helperbot_core::conversation::ConversationKey;
use helperbot_core::error::DomainError;
use helperbot_core::event::DomainEvent;
use helperbot_core::store::ConversationStore;
use tracing::debug;

/// The merged config of one conversation plus the store it came from.
///
/// Updates are written to the store first and mirrored into the local
/// snapshot only when the write succeeded.
pub struct ConversationContext<'a> {
    key: ConversationKey,
    config: Config,
    store: &'a dyn ConversationStore,
}

impl<'a> ConversationContext<'a> {
    /// Wraps an already merged config.
    #[must_use]
    pub fn new(key: ConversationKey, config: Config, store: &'a dyn ConversationStore) -> Self {
        Self { key, config, store }
    }

    /// The conversation key.
    #[must_use]
    pub fn key(&self) -> &ConversationKey {
        &self.key
    }

    /// The current config snapshot.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Applies a shallow partial update. Empty patches are not sent.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store write fails.
    pub async fn update(&mut self, patch: ConfigPatch) -> Result<(), DomainError> {
        if patch.is_empty() {
            return Ok(());
        }
        self.store.update(&self.key, &patch).await?;
        self.config.apply(&patch);
        Ok(())
    }

    /// Persists every uncommitted event of `aggregate` as one update.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the store write fails; the
    /// aggregate keeps its uncommitted events in that case.
    pub async fn commit<A: AggregateRoot>(&mut self, aggregate: &mut A) -> Result<(), DomainError> {
        for event in aggregate.uncommitted_events() {
            debug!(
                conversation = %self.key,
                event_type = event.event_type(),
                correlation_id = %event.metadata().correlation_id,
                "committing domain event"
            );
        }
        self.update(aggregate.pending_patch()).await?;
        aggregate.clear_uncommitted_events();
        Ok(())
    }
}
