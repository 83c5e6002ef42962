//! Domain events for the Quiz context.

use helperbot_core::event::{DomainEvent, EventMetadata};
use serde::{Deserialize, Serialize};

/// Emitted when a quiz starts and its first question is posed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizStarted {
    /// Index of the first question.
    pub question_index: usize,
}

/// Emitted when a new question replaces the current one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPosed {
    /// Index of the new question.
    pub question_index: usize,
}

/// Emitted when an answer attempt has been judged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerJudged {
    /// The answering user.
    pub user_id: String,
    /// Whether the answer matched exactly.
    pub correct: bool,
    /// Points added to the user's score.
    pub awarded: u32,
}

/// Emitted when a user's score entry is set to a fixed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSet {
    /// The user whose score changed.
    pub user_id: String,
    /// The new score.
    pub score: u32,
}

/// Event payload variants for the Quiz context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizEventKind {
    /// A quiz has started.
    QuizStarted(QuizStarted),
    /// The quiz has ended.
    QuizEnded,
    /// A new question is current.
    QuestionPosed(QuestionPosed),
    /// An answer was judged.
    AnswerJudged(AnswerJudged),
    /// A missing score entry was created.
    ScoreInitialized(ScoreSet),
    /// A score was reset.
    ScoreReset(ScoreSet),
}

/// Domain event envelope for the Quiz context.
#[derive(Debug, Clone)]
pub struct QuizEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: QuizEventKind,
}

impl QuizEventKind {
    /// Stable event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::QuizStarted(_) => "quiz.started",
            Self::QuizEnded => "quiz.ended",
            Self::QuestionPosed(_) => "quiz.question_posed",
            Self::AnswerJudged(_) => "quiz.answer_judged",
            Self::ScoreInitialized(_) => "quiz.score_initialized",
            Self::ScoreReset(_) => "quiz.score_reset",
        }
    }

    /// Whether this event changes the quiz status or current question.
    #[must_use]
    pub fn touches_status(&self) -> bool {
        matches!(
            self,
            Self::QuizStarted(_) | Self::QuizEnded | Self::QuestionPosed(_)
        )
    }

    /// Whether this event changes the score map.
    #[must_use]
    pub fn touches_scores(&self) -> bool {
        match self {
            Self::AnswerJudged(judged) => judged.awarded > 0,
            Self::ScoreInitialized(_) | Self::ScoreReset(_) => true,
            _ => false,
        }
    }
}

impl DomainEvent for QuizEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
