//! Dispatch domain model.

pub mod commands;
pub mod replies;
pub mod rules;
