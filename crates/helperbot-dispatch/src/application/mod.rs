//! Dispatch application services.

pub mod dispatcher;
pub mod processor;
pub mod services;
