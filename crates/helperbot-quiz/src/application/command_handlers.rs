//! Command handlers for the Quiz context.
//!
//! Each handler projects a `QuizSession` out of the conversation config,
//! runs the command, commits the resulting events as one partial update,
//! and returns the reply batch.

use std::sync::Mutex;

use helperbot_conversation::application::context::ConversationContext;
use helperbot_core::error::DomainError;
use helperbot_core::reply::{QuickReplyAction, ReplyMessage};
use helperbot_core::rng::DeterministicRng;
use tracing::info;

use crate::domain::aggregates::{Judgement, QuizError, QuizSession};
use crate::domain::commands::{
    EndQuiz, NextQuestion, ResetScore, ShowScore, StartQuiz, SubmitAnswer,
};
use crate::domain::questions::QuestionBank;

const ANSWER_PROMPT: &str = "答えを入力してください！";
const NEXT_QUESTION: &str = "次の問題です！";
const QUIZ_ENDED: &str = "クイズを終了しました！";
const START_HINT: &str = "クイズを開始するには「クイズ」と入力してください。";
const CORRECT: &str = "正解です！";
const SCORE_RESET: &str = "スコアをリセットしました！";

fn session_for(context: &ConversationContext<'_>) -> QuizSession {
    QuizSession::from_config(context.key().clone(), context.config())
}

fn lock_rng(
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> Result<std::sync::MutexGuard<'_, dyn DeterministicRng + Send + 'static>, DomainError> {
    rng.lock()
        .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))
}

/// The question text followed by the answer prompt, which carries the
/// in-quiz quick replies.
fn question_messages(
    bank: &QuestionBank,
    question_index: usize,
) -> Result<[ReplyMessage; 2], DomainError> {
    let question = bank.get(question_index).ok_or_else(|| {
        DomainError::Infrastructure(format!("question {question_index} is not in the bank"))
    })?;
    Ok([
        ReplyMessage::text(question.question.clone()),
        ReplyMessage::text(ANSWER_PROMPT).with_quick_replies(vec![
            QuickReplyAction::literal("次のクイズ"),
            QuickReplyAction::literal("クイズ終了"),
        ]),
    ])
}

fn start_hint() -> Vec<ReplyMessage> {
    vec![ReplyMessage::text(START_HINT)]
}

/// Handles `StartQuiz`: resets the acting user's score and poses the first
/// question. Starting while a quiz runs restarts it.
///
/// # Errors
///
/// Returns `DomainError` if the RNG lock is poisoned or the store write fails.
pub async fn handle_start_quiz(
    command: &StartQuiz,
    context: &mut ConversationContext<'_>,
    bank: &QuestionBank,
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> Result<Vec<ReplyMessage>, DomainError> {
    let mut session = session_for(context);

    // Lock RNG only for the synchronous domain method, never across an await.
    let question_index = {
        let mut rng_guard = lock_rng(rng)?;
        session.start(&command.user_id, command.correlation_id, bank, &mut *rng_guard)
    };

    context.commit(&mut session).await?;
    info!(
        conversation = %context.key(),
        question_index,
        "quiz started"
    );

    let mut messages = vec![ReplyMessage::text(format!(
        "現在のスコア: {}点",
        session.score_of(&command.user_id)
    ))];
    messages.extend(question_messages(bank, question_index)?);
    Ok(messages)
}

/// Handles `EndQuiz`. Ending while idle only replies with the start hint.
///
/// # Errors
///
/// Returns `DomainError` if the store write fails.
pub async fn handle_end_quiz(
    command: &EndQuiz,
    context: &mut ConversationContext<'_>,
) -> Result<Vec<ReplyMessage>, DomainError> {
    let mut session = session_for(context);
    match session.end(command.correlation_id) {
        Ok(()) => {}
        Err(QuizError::NotActive) => return Ok(start_hint()),
    }
    context.commit(&mut session).await?;
    info!(conversation = %context.key(), "quiz ended");
    Ok(vec![ReplyMessage::text(QUIZ_ENDED)])
}

/// Handles `NextQuestion`. Skipping while idle only replies with the start
/// hint.
///
/// # Errors
///
/// Returns `DomainError` if the RNG lock is poisoned or the store write fails.
pub async fn handle_next_question(
    command: &NextQuestion,
    context: &mut ConversationContext<'_>,
    bank: &QuestionBank,
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> Result<Vec<ReplyMessage>, DomainError> {
    let mut session = session_for(context);
    let posed = {
        let mut rng_guard = lock_rng(rng)?;
        session.next_question(command.correlation_id, bank, &mut *rng_guard)
    };
    let Ok(question_index) = posed else {
        return Ok(start_hint());
    };

    context.commit(&mut session).await?;

    let mut messages = vec![ReplyMessage::text(NEXT_QUESTION)];
    messages.extend(question_messages(bank, question_index)?);
    Ok(messages)
}

/// Handles `SubmitAnswer`: judges the answer, updates the score, and
/// appends the next question to the same batch.
///
/// # Errors
///
/// Returns `DomainError` if the RNG lock is poisoned or the store write fails.
pub async fn handle_submit_answer(
    command: &SubmitAnswer,
    context: &mut ConversationContext<'_>,
    bank: &QuestionBank,
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> Result<Vec<ReplyMessage>, DomainError> {
    let mut session = session_for(context);
    let judged = {
        let mut rng_guard = lock_rng(rng)?;
        session.submit_answer(
            &command.user_id,
            &command.answer,
            command.correlation_id,
            bank,
            &mut *rng_guard,
        )
    };
    let Ok(outcome) = judged else {
        return Ok(start_hint());
    };

    context.commit(&mut session).await?;

    let mut messages = match &outcome.judgement {
        Judgement::Correct => vec![
            ReplyMessage::text(CORRECT),
            ReplyMessage::text(format!("+10点！ 現在のスコア: {}点", outcome.score)),
        ],
        Judgement::Incorrect { expected } => vec![
            ReplyMessage::text(format!("残念ながら不正解です。正解は「{expected}」でした。")),
            ReplyMessage::text(format!("現在のスコア: {}点", outcome.score)),
        ],
        Judgement::Unjudged => Vec::new(),
    };
    info!(
        conversation = %context.key(),
        judgement = ?outcome.judgement,
        score = outcome.score,
        "answer judged"
    );
    messages.push(ReplyMessage::text(NEXT_QUESTION));
    messages.extend(question_messages(bank, outcome.next_question)?);
    Ok(messages)
}

/// Handles `ShowScore`, persisting a zero entry for a first-time user.
///
/// # Errors
///
/// Returns `DomainError` if the store write fails.
pub async fn handle_show_score(
    command: &ShowScore,
    context: &mut ConversationContext<'_>,
) -> Result<Vec<ReplyMessage>, DomainError> {
    let mut session = session_for(context);
    let score = session.ensure_score(&command.user_id, command.correlation_id);
    context.commit(&mut session).await?;
    Ok(vec![ReplyMessage::text(format!(
        "あなたの現在のスコアは {score} 点です！"
    ))])
}

/// Handles `ResetScore`.
///
/// # Errors
///
/// Returns `DomainError` if the store write fails.
pub async fn handle_reset_score(
    command: &ResetScore,
    context: &mut ConversationContext<'_>,
) -> Result<Vec<ReplyMessage>, DomainError> {
    let mut session = session_for(context);
    session.reset_score(&command.user_id, command.correlation_id);
    context.commit(&mut session).await?;
    Ok(vec![ReplyMessage::text(SCORE_RESET)])
}
