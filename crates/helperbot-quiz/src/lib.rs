//! Helperbot — Quiz bounded context.
//!
//! Owns the per-conversation quiz state machine (idle / active), answer
//! judging, per-user scoring, and the question bank.

pub mod application;
pub mod domain;
