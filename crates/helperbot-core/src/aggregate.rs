//! Aggregate root abstraction.

use crate::config::ConfigPatch;
use crate::conversation::ConversationKey;
use crate::event::DomainEvent;

/// Trait for aggregates projected out of a conversation's `Config`.
///
/// Command methods record events and apply them immediately; the pending
/// events are then folded into a single [`ConfigPatch`] for persistence.
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the conversation this aggregate belongs to.
    fn conversation(&self) -> &ConversationKey;

    /// Apply an event to mutate internal state.
    fn apply(&mut self, event: &Self::Event);

    /// Returns uncommitted events produced by command handling.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Clears uncommitted events after persistence.
    fn clear_uncommitted_events(&mut self);

    /// The partial update that persists every uncommitted event.
    fn pending_patch(&self) -> ConfigPatch;
}
