//! Everything event processing depends on.

use std::sync::{Arc, Mutex};

use helperbot_conversation::application::locks::ConversationLocks;
use helperbot_core::lookup::{AnswerSource, EarthquakeSource, WeatherSource};
use helperbot_core::reply::ReplySender;
use helperbot_core::rng::{DeterministicRng, SystemRng};
use helperbot_core::store::ConversationStore;
use helperbot_quiz::domain::questions::QuestionBank;

/// Shared collaborators for event processing. Cheap to clone.
#[derive(Clone)]
pub struct BotServices {
    /// Conversation config store.
    pub store: Arc<dyn ConversationStore>,
    /// Reply channel.
    pub replies: Arc<dyn ReplySender>,
    /// Per-conversation serialization.
    pub locks: ConversationLocks,
    /// Shared RNG; lock only around synchronous calls.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Weather lookups.
    pub weather: Arc<dyn WeatherSource>,
    /// Earthquake lookups.
    pub earthquakes: Arc<dyn EarthquakeSource>,
    /// AI answerer; `None` disables questions.
    pub answers: Option<Arc<dyn AnswerSource>>,
    /// Quiz questions.
    pub questions: Arc<QuestionBank>,
    /// Enables `!!db`.
    pub debug_commands: bool,
}

impl BotServices {
    /// Creates services with an OS-seeded RNG, the built-in question bank,
    /// no AI answerer, and debug commands off.
    #[must_use]
    pub fn new(
        store: Arc<dyn ConversationStore>,
        replies: Arc<dyn ReplySender>,
        weather: Arc<dyn WeatherSource>,
        earthquakes: Arc<dyn EarthquakeSource>,
    ) -> Self {
        Self {
            store,
            replies,
            locks: ConversationLocks::new(),
            rng: Arc::new(Mutex::new(SystemRng::new())),
            weather,
            earthquakes,
            answers: None,
            questions: Arc::new(QuestionBank::builtin()),
            debug_commands: false,
        }
    }

    /// Replaces the RNG.
    #[must_use]
    pub fn with_rng(mut self, rng: Arc<Mutex<dyn DeterministicRng + Send>>) -> Self {
        self.rng = rng;
        self
    }

    /// Enables AI answers.
    #[must_use]
    pub fn with_answers(mut self, answers: Arc<dyn AnswerSource>) -> Self {
        self.answers = Some(answers);
        self
    }

    /// Replaces the question bank.
    #[must_use]
    pub fn with_questions(mut self, questions: QuestionBank) -> Self {
        self.questions = Arc::new(questions);
        self
    }

    /// Toggles debug commands.
    #[must_use]
    pub fn with_debug_commands(mut self, enabled: bool) -> Self {
        self.debug_commands = enabled;
        self
    }
}

impl std::fmt::Debug for BotServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotServices")
            .field("locks", &self.locks)
            .field("answers_enabled", &self.answers.is_some())
            .field("questions", &self.questions.len())
            .field("debug_commands", &self.debug_commands)
            .finish_non_exhaustive()
    }
}
