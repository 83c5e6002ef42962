//! Per-event processing: serialize, merge, dispatch, reply.

use helperbot_conversation::application::merger;
use helperbot_core::conversation::InboundEvent;
use helperbot_core::error::DomainError;
use helperbot_core::reply::ReplyMessage;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use super::dispatcher;
use super::services::BotServices;
use crate::domain::replies::APOLOGY;

/// Result of processing one event, as reported in the webhook response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EventOutcome {
    /// A reply was sent.
    Ok,
    /// Nothing needed sending.
    Skipped,
    /// The event failed; an apology was attempted.
    Failed {
        /// Error summary.
        reason: String,
    },
}

/// Processes one event. Never fails the caller: errors are logged, an
/// apology is attempted, and the outcome is `Failed`.
#[instrument(skip_all, fields(conversation = %event.conversation, correlation_id = %event.correlation_id))]
pub async fn process_event(services: &BotServices, event: &InboundEvent) -> EventOutcome {
    match run(services, event).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "event processing failed");
            if let Some(token) = event.reply_token.as_deref() {
                let apology = [ReplyMessage::text(APOLOGY)];
                if let Err(reply_error) = services.replies.reply(token, &apology, false).await {
                    warn!(error = %reply_error, "apology could not be sent");
                }
            }
            EventOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}

async fn run(services: &BotServices, event: &InboundEvent) -> Result<EventOutcome, DomainError> {
    let _guard = services.locks.acquire(&event.conversation).await;
    let mut context = merger::open(&event.conversation, services.store.as_ref()).await?;

    let (Some(text), Some(token)) = (event.text.as_deref(), event.reply_token.as_deref()) else {
        return Ok(EventOutcome::Skipped);
    };
    let text = text.trim();

    let messages = dispatcher::handle_text(services, &mut context, event, text).await?;
    if messages.is_empty() {
        return Ok(EventOutcome::Skipped);
    }

    services
        .replies
        .reply(token, &messages, context.config().is_silent)
        .await?;
    info!(count = messages.len(), "reply sent");
    Ok(EventOutcome::Ok)
}
