//! The tagged command type every rule produces.

/// A recognized chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// `クイズ`
    StartQuiz,
    /// `クイズ終了`
    EndQuiz,
    /// `次のクイズ`
    NextQuestion,
    /// `スコア`
    ShowScore,
    /// `リセット`
    ResetScore,
    /// Text addressed to another bot; never answered.
    IgnoreInternal,
    /// `!!db`
    DumpConfig,
    /// `判定`
    CoinFlip,
    /// `数字`
    RandomNumber,
    /// `アルファベット`
    RandomLetter,
    /// Greeting echo with a fixed reply.
    Greeting(&'static str),
    /// `占い`
    Fortune,
    /// `天気`
    Weather,
    /// `天気ゾーン <code>`; the code is validated on execution.
    SetWeatherZone(String),
    /// `地震`
    Earthquake,
    /// `やることリスト`
    ShowTodoList,
    /// `やることリスト追加 <task>`
    AddTodo(String),
    /// `やることリスト削除 <n>`
    RemoveTodo(String),
    /// `通知オフ` / `通知オン`
    SetSilent(bool),
    /// Free-text question for the AI answerer.
    Ask(String),
    /// Unmatched text while a quiz is running.
    SubmitAnswer(String),
    /// Unmatched text in a one-to-one conversation.
    Help,
}

impl BotCommand {
    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartQuiz => "start_quiz",
            Self::EndQuiz => "end_quiz",
            Self::NextQuestion => "next_question",
            Self::ShowScore => "show_score",
            Self::ResetScore => "reset_score",
            Self::IgnoreInternal => "ignore_internal",
            Self::DumpConfig => "dump_config",
            Self::CoinFlip => "coin_flip",
            Self::RandomNumber => "random_number",
            Self::RandomLetter => "random_letter",
            Self::Greeting(_) => "greeting",
            Self::Fortune => "fortune",
            Self::Weather => "weather",
            Self::SetWeatherZone(_) => "set_weather_zone",
            Self::Earthquake => "earthquake",
            Self::ShowTodoList => "show_todo_list",
            Self::AddTodo(_) => "add_todo",
            Self::RemoveTodo(_) => "remove_todo",
            Self::SetSilent(_) => "set_silent",
            Self::Ask(_) => "ask",
            Self::SubmitAnswer(_) => "submit_answer",
            Self::Help => "help",
        }
    }
}
