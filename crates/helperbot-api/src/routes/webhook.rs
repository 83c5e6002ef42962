//! Webhook endpoint: verify, parse, then process every event concurrently.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use futures::future::join_all;
use helperbot_dispatch::application::processor::{EventOutcome, process_event};
use helperbot_dispatch::application::services::BotServices;
use helperbot_line::signature::{self, SIGNATURE_HEADER};
use helperbot_line::{CallbackRequest, WebhookEvent};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Response body for an accepted webhook batch.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Always `success`; per-event failures are reported in `results`.
    pub status: &'static str,
    /// One outcome per event, in request order.
    pub results: Vec<EventOutcome>,
}

/// POST /webhook
#[instrument(skip_all, fields(body_len = body.len()))]
async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::InvalidSignature)?;
    if !signature::verify(&state.channel_secret, &body, signature) {
        warn!("rejected webhook with bad signature");
        return Err(ApiError::InvalidSignature);
    }

    let request: CallbackRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::MalformedBody(e.to_string()))?;
    info!(events = request.events.len(), "webhook received");

    let results = join_all(
        request
            .events
            .iter()
            .map(|event| handle_event(&state.services, event)),
    )
    .await;

    Ok(Json(WebhookResponse {
        status: "success",
        results,
    }))
}

async fn handle_event(services: &BotServices, event: &WebhookEvent) -> EventOutcome {
    match event.to_inbound(Uuid::new_v4()) {
        Ok(inbound) => process_event(services, &inbound).await,
        Err(e) => {
            warn!(error = %e, event_type = %event.event_type, "event dropped");
            EventOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

/// Returns the webhook router.
pub fn router() -> Router<AppState> {
    Router::new().route("/webhook", post(receive))
}
