//! Helperbot — To-do bounded context.
//!
//! A per-conversation ordered list of free-form tasks, addressed by 1-based
//! position in the user-facing protocol.

pub mod application;
pub mod domain;
