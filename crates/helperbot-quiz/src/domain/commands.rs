//! Commands for the Quiz context.

use helperbot_core::command::Command;
use uuid::Uuid;

/// Command to start (or restart) a quiz.
#[derive(Debug, Clone)]
pub struct StartQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user who asked for the quiz; their score is reset.
    pub user_id: String,
}

/// Command to end the running quiz.
#[derive(Debug, Clone)]
pub struct EndQuiz {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

/// Command to skip to another question.
#[derive(Debug, Clone)]
pub struct NextQuestion {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

/// Command carrying an answer attempt.
#[derive(Debug, Clone)]
pub struct SubmitAnswer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The answering user.
    pub user_id: String,
    /// Raw answer text.
    pub answer: String,
}

/// Command to show a user's score.
#[derive(Debug, Clone)]
pub struct ShowScore {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user whose score is shown.
    pub user_id: String,
}

/// Command to reset a user's score to zero.
#[derive(Debug, Clone)]
pub struct ResetScore {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The user whose score is reset.
    pub user_id: String,
}

macro_rules! impl_command {
    ($($ty:ident => $name:literal),* $(,)?) => {
        $(
            impl Command for $ty {
                fn command_type(&self) -> &'static str {
                    $name
                }

                fn correlation_id(&self) -> Uuid {
                    self.correlation_id
                }
            }
        )*
    };
}

impl_command! {
    StartQuiz => "quiz.start",
    EndQuiz => "quiz.end",
    NextQuestion => "quiz.next_question",
    SubmitAnswer => "quiz.submit_answer",
    ShowScore => "quiz.show_score",
    ResetScore => "quiz.reset_score",
}
