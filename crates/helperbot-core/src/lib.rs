//! Helperbot Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that all bounded
//! contexts depend on. It contains no infrastructure code.

pub mod aggregate;
pub mod command;
pub mod config;
pub mod conversation;
pub mod error;
pub mod event;
pub mod lookup;
pub mod reply;
pub mod rng;
pub mod store;
