//! Executes the command an inbound text resolves to.

use helperbot_conversation::application::context::ConversationContext;
use helperbot_core::config::ConfigPatch;
use helperbot_core::conversation::InboundEvent;
use helperbot_core::error::DomainError;
use helperbot_core::reply::ReplyMessage;
use helperbot_core::rng::DeterministicRng;
use helperbot_quiz::application::command_handlers as quiz;
use helperbot_quiz::domain::commands::{
    EndQuiz, NextQuestion, ResetScore, ShowScore, StartQuiz, SubmitAnswer,
};
use helperbot_todo::application::{command_handlers as todo, query_handlers as todo_queries};
use helperbot_todo::domain::commands::{AddTask, RemoveTask};
use tracing::{debug, instrument, warn};

use super::services::BotServices;
use crate::domain::commands::BotCommand;
use crate::domain::replies;
use crate::domain::rules::{self, DispatchState};

/// Resolves `text` to a command, falling back to the quiz answer path or
/// the help menu. `None` means the text is ignored.
#[must_use]
pub fn classify(text: &str, state: &DispatchState, direct: bool) -> Option<BotCommand> {
    if let Some((rule, command)) = rules::resolve(text, state) {
        debug!(rule = rule.name, "rule matched");
        return Some(command);
    }
    if state.quiz_active {
        Some(BotCommand::SubmitAnswer(text.to_owned()))
    } else if direct {
        Some(BotCommand::Help)
    } else {
        None
    }
}

/// Dispatches trimmed `text` and returns the reply batch. An empty batch
/// means nothing should be sent.
///
/// # Errors
///
/// Returns `DomainError` if a store write fails or the RNG is poisoned.
/// Lookup failures are answered with a retry hint instead.
#[instrument(skip_all, fields(conversation = %event.conversation, correlation_id = %event.correlation_id))]
pub async fn handle_text(
    services: &BotServices,
    context: &mut ConversationContext<'_>,
    event: &InboundEvent,
    text: &str,
) -> Result<Vec<ReplyMessage>, DomainError> {
    let state = DispatchState {
        quiz_active: context.config().quiz_status,
        debug_commands: services.debug_commands,
        answers_enabled: services.answers.is_some(),
    };
    let Some(command) = classify(text, &state, event.conversation.is_direct()) else {
        return Ok(Vec::new());
    };
    debug!(command = command.name(), "dispatching");
    execute(services, context, event, command).await
}

fn with_rng<T>(
    services: &BotServices,
    f: impl FnOnce(&mut dyn DeterministicRng) -> T,
) -> Result<T, DomainError> {
    let mut rng = services
        .rng
        .lock()
        .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
    Ok(f(&mut *rng))
}

#[allow(clippy::too_many_lines)]
async fn execute(
    services: &BotServices,
    context: &mut ConversationContext<'_>,
    event: &InboundEvent,
    command: BotCommand,
) -> Result<Vec<ReplyMessage>, DomainError> {
    let correlation_id = event.correlation_id;
    let user_id = event.acting_user().to_owned();
    let bank = services.questions.as_ref();
    let rng = services.rng.as_ref();

    match command {
        BotCommand::StartQuiz => {
            quiz::handle_start_quiz(&StartQuiz { correlation_id, user_id }, context, bank, rng)
                .await
        }
        BotCommand::EndQuiz => quiz::handle_end_quiz(&EndQuiz { correlation_id }, context).await,
        BotCommand::NextQuestion => {
            quiz::handle_next_question(&NextQuestion { correlation_id }, context, bank, rng).await
        }
        BotCommand::ShowScore => {
            quiz::handle_show_score(&ShowScore { correlation_id, user_id }, context).await
        }
        BotCommand::ResetScore => {
            quiz::handle_reset_score(&ResetScore { correlation_id, user_id }, context).await
        }
        BotCommand::SubmitAnswer(answer) => {
            let command = SubmitAnswer {
                correlation_id,
                user_id,
                answer,
            };
            quiz::handle_submit_answer(&command, context, bank, rng).await
        }
        BotCommand::IgnoreInternal => Ok(Vec::new()),
        BotCommand::DumpConfig => {
            let dump = serde_json::to_string(context.config())
                .map_err(|e| DomainError::Infrastructure(format!("config dump failed: {e}")))?;
            Ok(vec![ReplyMessage::text(dump)])
        }
        BotCommand::CoinFlip => {
            let yes = with_rng(services, |rng| rng.next_f64() < 0.5)?;
            Ok(vec![ReplyMessage::text(if yes { "Yes" } else { "No" })])
        }
        BotCommand::RandomNumber => {
            let value = with_rng(services, |rng| rng.next_f64())?;
            Ok(vec![ReplyMessage::text(value.to_string())])
        }
        BotCommand::RandomLetter => {
            let offset = with_rng(services, |rng| rng.next_u32_range(0, 25))?;
            let letter = char::from_u32(u32::from(b'A') + offset.min(25)).unwrap_or('A');
            Ok(vec![ReplyMessage::text(letter.to_string())])
        }
        BotCommand::Greeting(reply) => Ok(vec![ReplyMessage::text(reply)]),
        BotCommand::Fortune => with_rng(services, replies::fortune),
        BotCommand::Weather => {
            let zone = context.config().weather_zone.clone();
            match services.weather.forecast(&zone).await {
                Ok(forecast) => Ok(replies::weather(&forecast)),
                Err(error) => {
                    warn!(%zone, %error, "weather lookup failed");
                    Ok(vec![ReplyMessage::text(replies::WEATHER_UNAVAILABLE)])
                }
            }
        }
        BotCommand::SetWeatherZone(code) => {
            let code = code.trim();
            if !replies::is_valid_zone(code) {
                return Ok(vec![ReplyMessage::text(replies::ZONE_FORMAT_ERROR)]);
            }
            context
                .update(ConfigPatch {
                    weather_zone: Some(code.to_owned()),
                    ..ConfigPatch::default()
                })
                .await?;
            Ok(vec![ReplyMessage::text(format!(
                "天気ゾーンを「{code}」に設定しました。"
            ))])
        }
        BotCommand::Earthquake => match services.earthquakes.latest().await {
            Ok(report) => Ok(replies::earthquake(&report)),
            Err(error) => {
                warn!(%error, "earthquake lookup failed");
                Ok(vec![ReplyMessage::text(replies::EARTHQUAKE_UNAVAILABLE)])
            }
        },
        BotCommand::ShowTodoList => Ok(todo_queries::handle_show_list(context)),
        BotCommand::AddTodo(task) => {
            todo::handle_add_task(&AddTask { correlation_id, task }, context).await
        }
        BotCommand::RemoveTodo(position) => {
            todo::handle_remove_task(
                &RemoveTask {
                    correlation_id,
                    position,
                },
                context,
            )
            .await
        }
        BotCommand::SetSilent(silent) => {
            context
                .update(ConfigPatch {
                    is_silent: Some(silent),
                    ..ConfigPatch::default()
                })
                .await?;
            let reply = if silent {
                replies::SILENT_ON
            } else {
                replies::SILENT_OFF
            };
            Ok(vec![ReplyMessage::text(reply)])
        }
        BotCommand::Ask(question) => {
            let Some(answers) = services.answers.as_ref() else {
                return Ok(Vec::new());
            };
            match answers.answer(&question).await {
                Ok(answer) => Ok(vec![ReplyMessage::text(answer)]),
                Err(error) => {
                    warn!(%error, "answer lookup failed");
                    Ok(vec![ReplyMessage::text(replies::ANSWER_UNAVAILABLE)])
                }
            }
        }
        BotCommand::Help => Ok(replies::help_menu()),
    }
}
