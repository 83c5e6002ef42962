//! The ordered command rule table.
//!
//! Rules are evaluated top to bottom; the first rule whose matcher and gate
//! both pass wins. While a quiz is running only `Always` rules can match,
//! so everything else falls through to the answer path.

use std::sync::LazyLock;

use regex::Regex;

use super::commands::BotCommand;

/// When a rule may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Always, including during a quiz.
    Always,
    /// Only while no quiz is running.
    Idle,
    /// Only when debug commands are enabled.
    Debug,
    /// Only when an AI answerer is configured and no quiz is running.
    Ask,
}

/// What the gates look at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchState {
    /// A quiz is running in this conversation.
    pub quiz_active: bool,
    /// `!!db` and friends are enabled.
    pub debug_commands: bool,
    /// An AI answerer is configured.
    pub answers_enabled: bool,
}

impl Gate {
    /// Whether the gate is open in `state`.
    #[must_use]
    pub fn allows(self, state: &DispatchState) -> bool {
        match self {
            Self::Always => true,
            Self::Idle => !state.quiz_active,
            Self::Debug => state.debug_commands,
            Self::Ask => state.answers_enabled && !state.quiz_active,
        }
    }
}

/// How a rule recognizes text.
#[derive(Debug)]
pub enum Matcher {
    /// The whole text equals the literal.
    Exact(&'static str),
    /// The pattern matches; capture group 1, when present, is the argument.
    Pattern(Regex),
}

impl Matcher {
    /// Returns the argument (or the whole text) when the matcher accepts
    /// `text`.
    #[must_use]
    pub fn accept<'t>(&self, text: &'t str) -> Option<&'t str> {
        match self {
            Self::Exact(literal) => (text == *literal).then_some(text),
            Self::Pattern(regex) => regex.captures(text).map(|captures| {
                captures
                    .get(1)
                    .map_or(text, |argument| argument.as_str())
            }),
        }
    }
}

/// One row of the rule table.
#[derive(Debug)]
pub struct CommandRule {
    /// Name used in logs and tests.
    pub name: &'static str,
    /// Text recognizer.
    pub matcher: Matcher,
    /// Availability gate.
    pub gate: Gate,
    /// Builds the command from the matched argument.
    pub build: fn(&str) -> BotCommand,
}

fn exact(
    name: &'static str,
    literal: &'static str,
    gate: Gate,
    build: fn(&str) -> BotCommand,
) -> CommandRule {
    CommandRule {
        name,
        matcher: Matcher::Exact(literal),
        gate,
        build,
    }
}

fn pattern(
    name: &'static str,
    regex: &str,
    gate: Gate,
    build: fn(&str) -> BotCommand,
) -> CommandRule {
    CommandRule {
        name,
        matcher: Matcher::Pattern(
            Regex::new(regex).unwrap_or_else(|e| panic!("invalid pattern for rule {name}: {e}")),
        ),
        gate,
        build,
    }
}

/// The rule table, in priority order.
pub static RULES: LazyLock<Vec<CommandRule>> = LazyLock::new(|| {
    vec![
        exact("quiz_start", "クイズ", Gate::Always, |_| BotCommand::StartQuiz),
        exact("quiz_end", "クイズ終了", Gate::Always, |_| BotCommand::EndQuiz),
        exact("quiz_next", "次のクイズ", Gate::Always, |_| BotCommand::NextQuestion),
        exact("score_show", "スコア", Gate::Always, |_| BotCommand::ShowScore),
        exact("score_reset", "リセット", Gate::Always, |_| BotCommand::ResetScore),
        pattern("internal", "^ANSWER:", Gate::Always, |_| BotCommand::IgnoreInternal),
        exact("debug_dump", "!!db", Gate::Debug, |_| BotCommand::DumpConfig),
        exact("coin_flip", "判定", Gate::Idle, |_| BotCommand::CoinFlip),
        exact("random_number", "数字", Gate::Idle, |_| BotCommand::RandomNumber),
        exact("random_letter", "アルファベット", Gate::Idle, |_| BotCommand::RandomLetter),
        exact("fortune", "占い", Gate::Idle, |_| BotCommand::Fortune),
        exact("weather", "天気", Gate::Idle, |_| BotCommand::Weather),
        pattern("weather_zone", r"^天気ゾーン\s*(.*)$", Gate::Idle, |code| {
            BotCommand::SetWeatherZone(code.to_owned())
        }),
        exact("earthquake", "地震", Gate::Idle, |_| BotCommand::Earthquake),
        exact("todo_list", "やることリスト", Gate::Idle, |_| BotCommand::ShowTodoList),
        pattern("todo_add", r"(?s)^やることリスト追加\s*(.*)$", Gate::Idle, |task| {
            BotCommand::AddTodo(task.to_owned())
        }),
        pattern("todo_remove", r"^やることリスト削除\s*(.*)$", Gate::Idle, |position| {
            BotCommand::RemoveTodo(position.to_owned())
        }),
        exact("silent_on", "通知オフ", Gate::Idle, |_| BotCommand::SetSilent(true)),
        exact("silent_off", "通知オン", Gate::Idle, |_| BotCommand::SetSilent(false)),
        // Greetings match anywhere in the text, so they go after every
        // prefixed command.
        pattern("thanks", "ありがとう", Gate::Idle, |_| BotCommand::Greeting("どういたしまして")),
        pattern("goodbye", "さようなら", Gate::Idle, |_| BotCommand::Greeting("またね")),
        pattern("good_morning", "おはようございます", Gate::Idle, |_| {
            BotCommand::Greeting("おはようございます")
        }),
        pattern("hello", "こんにちは", Gate::Idle, |_| BotCommand::Greeting("こんにちは")),
        pattern("good_evening", "こんばんは", Gate::Idle, |_| BotCommand::Greeting("こんばんは")),
        pattern("ask", r"[?？]$", Gate::Ask, |question| BotCommand::Ask(question.to_owned())),
    ]
});

/// Finds the first rule that accepts `text` in `state`.
#[must_use]
pub fn resolve(text: &str, state: &DispatchState) -> Option<(&'static CommandRule, BotCommand)> {
    RULES.iter().find_map(|rule| {
        if !rule.gate.allows(state) {
            return None;
        }
        let argument = rule.matcher.accept(text)?;
        Some((rule, (rule.build)(argument)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> DispatchState {
        DispatchState::default()
    }

    fn quiz() -> DispatchState {
        DispatchState {
            quiz_active: true,
            ..DispatchState::default()
        }
    }

    fn command(text: &str, state: &DispatchState) -> Option<BotCommand> {
        resolve(text, state).map(|(_, command)| command)
    }

    #[test]
    fn test_all_rules_build() {
        assert_eq!(RULES.len(), 25);
        let mut names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RULES.len());
    }

    #[test]
    fn test_quiz_commands_match_exactly() {
        assert_eq!(command("クイズ", &idle()), Some(BotCommand::StartQuiz));
        assert_eq!(command("クイズ終了", &idle()), Some(BotCommand::EndQuiz));
        assert_eq!(command("次のクイズ", &quiz()), Some(BotCommand::NextQuestion));
        assert_eq!(command("スコア", &quiz()), Some(BotCommand::ShowScore));
        assert_eq!(command("リセット", &quiz()), Some(BotCommand::ResetScore));
        assert_eq!(command("クイズしたい", &idle()), None);
    }

    #[test]
    fn test_quiz_locks_out_idle_commands() {
        // Arrange
        let texts = ["天気", "占い", "地震", "やることリスト", "こんにちは", "判定"];

        // Act / Assert
        for text in texts {
            assert!(command(text, &idle()).is_some(), "{text} should match when idle");
            assert_eq!(command(text, &quiz()), None, "{text} should be locked during a quiz");
        }
    }

    #[test]
    fn test_greetings_match_anywhere_in_text() {
        assert_eq!(
            command("いつもありがとう！", &idle()),
            Some(BotCommand::Greeting("どういたしまして"))
        );
        assert_eq!(
            command("みなさんこんばんは", &idle()),
            Some(BotCommand::Greeting("こんばんは"))
        );
    }

    #[test]
    fn test_prefixed_commands_win_over_greeting_substrings() {
        assert_eq!(
            command("やることリスト追加 ありがとうカードを書く", &idle()),
            Some(BotCommand::AddTodo("ありがとうカードを書く".to_owned()))
        );
        assert_eq!(
            command("やることリスト削除 こんにちは", &idle()),
            Some(BotCommand::RemoveTodo("こんにちは".to_owned()))
        );
        assert_eq!(
            command("天気ゾーン こんばんは", &idle()),
            Some(BotCommand::SetWeatherZone("こんばんは".to_owned()))
        );
    }

    #[test]
    fn test_weather_zone_captures_argument() {
        assert_eq!(command("天気", &idle()), Some(BotCommand::Weather));
        assert_eq!(
            command("天気ゾーン 270000", &idle()),
            Some(BotCommand::SetWeatherZone("270000".to_owned()))
        );
        assert_eq!(
            command("天気ゾーン abcdef", &idle()),
            Some(BotCommand::SetWeatherZone("abcdef".to_owned()))
        );
        assert_eq!(
            command("天気ゾーン", &idle()),
            Some(BotCommand::SetWeatherZone(String::new()))
        );
    }

    #[test]
    fn test_todo_rules_capture_payload() {
        assert_eq!(
            command("やることリスト追加 牛乳を買う", &idle()),
            Some(BotCommand::AddTodo("牛乳を買う".to_owned()))
        );
        assert_eq!(
            command("やることリスト追加　卵", &idle()),
            Some(BotCommand::AddTodo("卵".to_owned()))
        );
        assert_eq!(
            command("やることリスト削除 2", &idle()),
            Some(BotCommand::RemoveTodo("2".to_owned()))
        );
        assert_eq!(command("やることリスト", &idle()), Some(BotCommand::ShowTodoList));
    }

    #[test]
    fn test_internal_answer_prefix_is_ignored_even_during_quiz() {
        assert_eq!(command("ANSWER:東京", &quiz()), Some(BotCommand::IgnoreInternal));
    }

    #[test]
    fn test_debug_dump_requires_flag() {
        let debug = DispatchState {
            debug_commands: true,
            ..DispatchState::default()
        };

        assert_eq!(command("!!db", &idle()), None);
        assert_eq!(command("!!db", &debug), Some(BotCommand::DumpConfig));
    }

    #[test]
    fn test_ask_requires_answerer_and_idle() {
        let answers = DispatchState {
            answers_enabled: true,
            ..DispatchState::default()
        };
        let answers_in_quiz = DispatchState {
            quiz_active: true,
            ..answers
        };

        assert_eq!(command("日本一高い山は？", &idle()), None);
        assert_eq!(
            command("日本一高い山は？", &answers),
            Some(BotCommand::Ask("日本一高い山は？".to_owned()))
        );
        assert_eq!(
            command("why?", &answers),
            Some(BotCommand::Ask("why?".to_owned()))
        );
        assert_eq!(command("日本一高い山は？", &answers_in_quiz), None);
    }

    #[test]
    fn test_earlier_rules_win() {
        let answers = DispatchState {
            answers_enabled: true,
            ..DispatchState::default()
        };

        let (rule, command) = resolve("こんにちは？", &answers).unwrap();

        assert_eq!(rule.name, "hello");
        assert_eq!(command, BotCommand::Greeting("こんにちは"));
    }

    #[test]
    fn test_silent_toggles() {
        assert_eq!(command("通知オフ", &idle()), Some(BotCommand::SetSilent(true)));
        assert_eq!(command("通知オン", &idle()), Some(BotCommand::SetSilent(false)));
    }
}
