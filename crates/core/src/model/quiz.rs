use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSpecError {
    #[error("quiz must offer at least one choice")]
    NoChoices,

    #[error("answer index {index} is outside {len} choices")]
    AnswerOutOfRange { index: usize, len: usize },
}

/// A single-choice question attached to a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSpec {
    pub prompt: String,
    pub choices: Vec<String>,
    /// Index of the correct choice; authored files spell it `answer`.
    #[serde(alias = "answer")]
    pub answer_index: usize,
}

impl QuizSpec {
    /// Checks that the answer index addresses an existing choice.
    ///
    /// # Errors
    ///
    /// Returns `QuizSpecError` when there are no choices or the answer is out of range.
    pub fn validate(&self) -> Result<(), QuizSpecError> {
        if self.choices.is_empty() {
            return Err(QuizSpecError::NoChoices);
        }
        if self.answer_index >= self.choices.len() {
            return Err(QuizSpecError::AnswerOutOfRange {
                index: self.answer_index,
                len: self.choices.len(),
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn is_valid_choice(&self, index: usize) -> bool {
        index < self.choices.len()
    }

    /// A stored answer is only meaningful when it addresses a choice.
    #[must_use]
    pub fn restore_choice(&self, stored: Option<i64>) -> Option<usize> {
        let index = usize::try_from(stored?).ok()?;
        self.is_valid_choice(index).then_some(index)
    }

    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.answer_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> QuizSpec {
        QuizSpec {
            prompt: "Pick".into(),
            choices: vec!["A".into(), "B".into(), "C".into()],
            answer_index: 1,
        }
    }

    #[test]
    fn accepts_authored_answer_key() {
        let parsed: QuizSpec =
            serde_json::from_str(r#"{"prompt":"Pick","choices":["A","B","C"],"answer":1}"#)
                .unwrap();
        assert_eq!(parsed, spec());
    }

    #[test]
    fn validate_rejects_out_of_range_answer() {
        let mut bad = spec();
        bad.answer_index = 3;
        assert_eq!(
            bad.validate(),
            Err(QuizSpecError::AnswerOutOfRange { index: 3, len: 3 })
        );
        assert!(spec().validate().is_ok());
    }

    #[test]
    fn restore_treats_out_of_range_as_unanswered() {
        let quiz = spec();
        assert_eq!(quiz.restore_choice(Some(2)), Some(2));
        assert_eq!(quiz.restore_choice(Some(3)), None);
        assert_eq!(quiz.restore_choice(Some(-1)), None);
        assert_eq!(quiz.restore_choice(None), None);
    }
}
