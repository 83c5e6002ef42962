//! Aggregate root for the Quiz context.
//!
//! State machine:
//!
//! ```text
//! Idle   --start-->  Active(q)
//! Active --start-->  Active(q')        (restart; acting user's score := 0)
//! Active --end-->    Idle
//! Active --next-->   Active(q')
//! Active --answer--> Active(q')        (judge, score, then pose q')
//! ```
//!
//! `q'` is drawn uniformly and may equal `q`.

use std::collections::BTreeMap;

use helperbot_core::aggregate::AggregateRoot;
use helperbot_core::config::{Config, ConfigPatch};
use helperbot_core::conversation::ConversationKey;
use helperbot_core::event::EventMetadata;
use helperbot_core::rng::DeterministicRng;
use thiserror::Error;
use uuid::Uuid;

use super::events::{
    AnswerJudged, QuestionPosed, QuizEvent, QuizEventKind, QuizStarted, ScoreSet,
};
use super::questions::QuestionBank;

/// Points awarded for a correct answer.
pub const POINTS_PER_CORRECT_ANSWER: u32 = 10;

/// Rejections of quiz commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The command needs a running quiz.
    #[error("no quiz is running")]
    NotActive,
}

/// Whether a quiz is running, and which question is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStatus {
    /// No quiz is running.
    Idle,
    /// A quiz is running with the given question posed.
    Active {
        /// Index into the question bank.
        question_index: usize,
    },
}

/// Result of judging one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Judgement {
    /// The answer matched exactly.
    Correct,
    /// The answer did not match.
    Incorrect {
        /// The expected answer, revealed to the players.
        expected: String,
    },
    /// The stored question index no longer exists in the bank; nothing
    /// was judged.
    Unjudged,
}

/// Everything a handler needs to reply to an answer attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    /// How the answer was judged.
    pub judgement: Judgement,
    /// The answering user's score after judging.
    pub score: u32,
    /// The question posed after judging.
    pub next_question: usize,
}

/// The quiz projection of one conversation's config.
#[derive(Debug)]
pub struct QuizSession {
    key: ConversationKey,
    pub(crate) status: QuizStatus,
    pub(crate) scores: BTreeMap<String, u32>,
    uncommitted_events: Vec<QuizEvent>,
}

impl QuizSession {
    /// Projects the quiz state out of a merged config.
    #[must_use]
    pub fn from_config(key: ConversationKey, config: &Config) -> Self {
        let status = if config.quiz_status {
            QuizStatus::Active {
                question_index: config.current_question,
            }
        } else {
            QuizStatus::Idle
        };
        Self {
            key,
            status,
            scores: config.user_scores.clone(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub fn status(&self) -> QuizStatus {
        self.status
    }

    /// The user's score, 0 when absent.
    #[must_use]
    pub fn score_of(&self, user_id: &str) -> u32 {
        self.scores.get(user_id).copied().unwrap_or(0)
    }

    /// Starts (or restarts) the quiz: resets the acting user's score and
    /// poses a random question. Returns the posed question index.
    pub fn start(
        &mut self,
        user_id: &str,
        correlation_id: Uuid,
        bank: &QuestionBank,
        rng: &mut dyn DeterministicRng,
    ) -> usize {
        self.record(
            correlation_id,
            QuizEventKind::ScoreReset(ScoreSet {
                user_id: user_id.to_owned(),
                score: 0,
            }),
        );
        let question_index = bank.pick(rng);
        self.record(
            correlation_id,
            QuizEventKind::QuizStarted(QuizStarted { question_index }),
        );
        question_index
    }

    /// Ends the running quiz. The current question index is left as is.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotActive` if no quiz is running.
    pub fn end(&mut self, correlation_id: Uuid) -> Result<(), QuizError> {
        self.ensure_active()?;
        self.record(correlation_id, QuizEventKind::QuizEnded);
        Ok(())
    }

    /// Poses a new random question. Returns the posed question index.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotActive` if no quiz is running.
    pub fn next_question(
        &mut self,
        correlation_id: Uuid,
        bank: &QuestionBank,
        rng: &mut dyn DeterministicRng,
    ) -> Result<usize, QuizError> {
        self.ensure_active()?;
        Ok(self.pose(correlation_id, bank, rng))
    }

    /// Judges an answer against the current question, then poses the next
    /// one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotActive` if no quiz is running.
    pub fn submit_answer(
        &mut self,
        user_id: &str,
        answer: &str,
        correlation_id: Uuid,
        bank: &QuestionBank,
        rng: &mut dyn DeterministicRng,
    ) -> Result<AnswerOutcome, QuizError> {
        let question_index = self.ensure_active()?;

        let judgement = match bank.get(question_index) {
            None => Judgement::Unjudged,
            Some(question) => {
                self.ensure_score(user_id, correlation_id);
                let correct = answer.trim() == question.answer;
                self.record(
                    correlation_id,
                    QuizEventKind::AnswerJudged(AnswerJudged {
                        user_id: user_id.to_owned(),
                        correct,
                        awarded: if correct { POINTS_PER_CORRECT_ANSWER } else { 0 },
                    }),
                );
                if correct {
                    Judgement::Correct
                } else {
                    Judgement::Incorrect {
                        expected: question.answer.clone(),
                    }
                }
            }
        };

        let next_question = self.pose(correlation_id, bank, rng);
        Ok(AnswerOutcome {
            judgement,
            score: self.score_of(user_id),
            next_question,
        })
    }

    /// Returns the user's score, creating a zero entry when absent.
    pub fn ensure_score(&mut self, user_id: &str, correlation_id: Uuid) -> u32 {
        if !self.scores.contains_key(user_id) {
            self.record(
                correlation_id,
                QuizEventKind::ScoreInitialized(ScoreSet {
                    user_id: user_id.to_owned(),
                    score: 0,
                }),
            );
        }
        self.score_of(user_id)
    }

    /// Sets the user's score to zero.
    pub fn reset_score(&mut self, user_id: &str, correlation_id: Uuid) {
        self.record(
            correlation_id,
            QuizEventKind::ScoreReset(ScoreSet {
                user_id: user_id.to_owned(),
                score: 0,
            }),
        );
    }

    fn ensure_active(&self) -> Result<usize, QuizError> {
        match self.status {
            QuizStatus::Active { question_index } => Ok(question_index),
            QuizStatus::Idle => Err(QuizError::NotActive),
        }
    }

    fn pose(
        &mut self,
        correlation_id: Uuid,
        bank: &QuestionBank,
        rng: &mut dyn DeterministicRng,
    ) -> usize {
        let question_index = bank.pick(rng);
        self.record(
            correlation_id,
            QuizEventKind::QuestionPosed(QuestionPosed { question_index }),
        );
        question_index
    }

    fn record(&mut self, correlation_id: Uuid, kind: QuizEventKind) {
        let event = QuizEvent {
            metadata: EventMetadata {
                event_type: kind.event_type().to_owned(),
                conversation: self.key.path(),
                correlation_id,
            },
            kind,
        };
        self.apply(&event);
        self.uncommitted_events.push(event);
    }
}

impl AggregateRoot for QuizSession {
    type Event = QuizEvent;

    fn conversation(&self) -> &ConversationKey {
        &self.key
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            QuizEventKind::QuizStarted(payload) => {
                self.status = QuizStatus::Active {
                    question_index: payload.question_index,
                };
            }
            QuizEventKind::QuestionPosed(payload) => {
                self.status = QuizStatus::Active {
                    question_index: payload.question_index,
                };
            }
            QuizEventKind::QuizEnded => {
                self.status = QuizStatus::Idle;
            }
            QuizEventKind::AnswerJudged(payload) => {
                let score = self.scores.entry(payload.user_id.clone()).or_insert(0);
                *score = score.saturating_add(payload.awarded);
            }
            QuizEventKind::ScoreInitialized(payload) | QuizEventKind::ScoreReset(payload) => {
                self.scores.insert(payload.user_id.clone(), payload.score);
            }
        }
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }

    fn pending_patch(&self) -> ConfigPatch {
        let mut patch = ConfigPatch::default();
        if self.uncommitted_events.iter().any(|e| e.kind.touches_status()) {
            match self.status {
                QuizStatus::Active { question_index } => {
                    patch.quiz_status = Some(true);
                    patch.current_question = Some(question_index);
                }
                QuizStatus::Idle => patch.quiz_status = Some(false),
            }
        }
        if self.uncommitted_events.iter().any(|e| e.kind.touches_scores()) {
            patch.user_scores = Some(self.scores.clone());
        }
        patch
    }
}
