//! Helperbot API — the webhook HTTP server.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Builds the application router.
pub fn build_router(state: state::AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::webhook::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
