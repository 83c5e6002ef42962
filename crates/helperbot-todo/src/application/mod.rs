//! To-do application services.

pub mod command_handlers;
pub mod query_handlers;
