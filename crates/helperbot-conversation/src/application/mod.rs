//! Application services for conversation state.

pub mod context;
pub mod locks;
pub mod merger;
