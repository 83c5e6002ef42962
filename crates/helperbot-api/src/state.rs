//! Shared application state.

use std::sync::Arc;

use helperbot_dispatch::application::services::BotServices;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Event processing collaborators.
    pub services: BotServices,
    /// Channel secret used to verify webhook signatures.
    pub channel_secret: Arc<str>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(services: BotServices, channel_secret: &str) -> Self {
        Self {
            services,
            channel_secret: Arc::from(channel_secret),
        }
    }
}
