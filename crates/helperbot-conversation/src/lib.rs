//! Helperbot — per-conversation state.
//!
//! Loads each conversation's `Config`, migrates it to the current schema by
//! filling defaults, and serializes work per conversation so concurrent
//! events cannot lose each other's updates.

pub mod application;
