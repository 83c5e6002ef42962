//! The question bank.

use helperbot_core::error::DomainError;
use helperbot_core::rng::{self, DeterministicRng};
use serde::{Deserialize, Serialize};

/// One question and its exact expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// Text shown to the players.
    pub question: String,
    /// Answer compared verbatim (case-sensitive) to the trimmed input.
    pub answer: String,
}

impl QuizQuestion {
    fn new(question: &str, answer: &str) -> Self {
        Self {
            question: question.to_owned(),
            answer: answer.to_owned(),
        }
    }
}

/// File layout accepted by [`QuestionBank::from_yaml`].
#[derive(Debug, Deserialize)]
struct QuestionBankFile {
    questions: Vec<QuizQuestion>,
}

/// A non-empty, immutable list of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<QuizQuestion>,
}

impl QuestionBank {
    /// Builds a bank, trimming every entry.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the bank is empty or any entry
    /// has a blank question or answer.
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, DomainError> {
        if questions.is_empty() {
            return Err(DomainError::Validation("question bank is empty".into()));
        }
        let questions = questions
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                let question = entry.question.trim().to_owned();
                let answer = entry.answer.trim().to_owned();
                if question.is_empty() || answer.is_empty() {
                    return Err(DomainError::Validation(format!(
                        "question {} has a blank question or answer",
                        index + 1
                    )));
                }
                Ok(QuizQuestion { question, answer })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { questions })
    }

    /// Parses a YAML document of the form `questions: [{question, answer}]`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the document is malformed or the
    /// resulting bank is invalid.
    pub fn from_yaml(source: &str) -> Result<Self, DomainError> {
        let file: QuestionBankFile = serde_yaml::from_str(source)
            .map_err(|e| DomainError::Validation(format!("question bank is malformed: {e}")))?;
        Self::new(file.questions)
    }

    /// The bank shipped with the bot.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            questions: vec![
                QuizQuestion::new("日本の首都は？", "東京"),
                QuizQuestion::new("1+1は？", "2"),
                QuizQuestion::new("世界で一番大きな大陸は？", "ユーラシア"),
                QuizQuestion::new("太陽系で一番大きな惑星は？", "木星"),
                QuizQuestion::new("日本の国鳥は？", "キジ"),
                QuizQuestion::new("世界で一番長い川は？", "ナイル川"),
                QuizQuestion::new("日本の国花は？", "桜"),
                QuizQuestion::new("世界で一番高い山は？", "エベレスト"),
                QuizQuestion::new("日本の国魚は？", "錦鯉"),
                QuizQuestion::new("世界で一番大きな海は？", "太平洋"),
                QuizQuestion::new("世界で一番大きな湖は？", "カスピ海"),
                QuizQuestion::new("世界で一番大きな砂漠は？", "サハラ砂漠"),
                QuizQuestion::new("日本で一番長い川は？", "信濃川"),
                QuizQuestion::new("日本で一番大きな湖は？", "琵琶湖"),
            ],
        }
    }

    /// The question at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }

    /// Number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Picks a uniformly random question index. Repeats are possible.
    pub fn pick(&self, rng: &mut dyn DeterministicRng) -> usize {
        rng::pick_index(rng, self.questions.len()).unwrap_or(0)
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use helperbot_core::error::DomainError;
    use helperbot_test_support::SequenceRng;

    use super::{QuestionBank, QuizQuestion};

    #[test]
    fn test_builtin_bank_has_no_blank_entries() {
        let bank = QuestionBank::builtin();

        let rebuilt = QuestionBank::new((0..bank.len()).filter_map(|i| bank.get(i).cloned()).collect());

        assert_eq!(rebuilt.unwrap(), bank);
    }

    #[test]
    fn test_empty_bank_is_rejected() {
        assert!(matches!(
            QuestionBank::new(Vec::new()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_entries_are_trimmed_and_blank_answers_rejected() {
        let bank = QuestionBank::new(vec![QuizQuestion {
            question: " 2+2は？ ".to_owned(),
            answer: " 4\n".to_owned(),
        }])
        .unwrap();
        assert_eq!(bank.get(0).unwrap().answer, "4");

        let blank = QuestionBank::new(vec![QuizQuestion {
            question: "空？".to_owned(),
            answer: "   ".to_owned(),
        }]);
        assert!(blank.is_err());
    }

    #[test]
    fn test_from_yaml_reads_question_list() {
        // Arrange
        let source = "questions:\n  - question: 日本の首都は？\n    answer: 東京\n  - question: 1+1は？\n    answer: \"2\"\n";

        // Act
        let bank = QuestionBank::from_yaml(source).unwrap();

        // Assert
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get(1).unwrap().answer, "2");
    }

    #[test]
    fn test_from_yaml_rejects_malformed_documents() {
        assert!(QuestionBank::from_yaml("questions: 3").is_err());
        assert!(QuestionBank::from_yaml("questions: []").is_err());
    }

    #[test]
    fn test_pick_uses_rng_value() {
        let bank = QuestionBank::builtin();
        let mut rng = SequenceRng::new(vec![5]);

        assert_eq!(bank.pick(&mut rng), 5);
    }
}
