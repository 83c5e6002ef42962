//! Domain event abstractions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata attached to every domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Type name for logging and routing.
    pub event_type: String,
    /// Store path of the conversation this event belongs to.
    pub conversation: String,
    /// Correlation ID for tracing a command through its effects.
    pub correlation_id: Uuid,
}

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;
}
