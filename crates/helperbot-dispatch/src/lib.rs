//! Helperbot Dispatch — from inbound text to a reply batch.
//!
//! The domain layer is an ordered rule table that turns text into a
//! [`domain::commands::BotCommand`]; the application layer executes the
//! command against the conversation and sends the reply.

pub mod application;
pub mod domain;
