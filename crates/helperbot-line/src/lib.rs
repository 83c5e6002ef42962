//! Helperbot LINE — Messaging API wire formats and clients.

pub mod client;
pub mod signature;
pub mod webhook;

pub use client::LineReplyClient;
pub use webhook::{CallbackRequest, WebhookEvent};
