//! Helperbot Store — `ConversationStore` implementations.
//!
//! Records live under the `data` namespace, one per conversation path
//! (`user/{id}`, `group/{id}`, `room/{id}`).

pub mod firebase;
pub mod memory;

pub use firebase::FirebaseConversationStore;
pub use memory::InMemoryConversationStore;

/// Root namespace every conversation record lives under.
pub const ROOT_NAMESPACE: &str = "data";
