use services::{QuizPhase, QuizState};

pub const QUIZ_HEADING: &str = "Check Your Understanding";
pub const CORRECT_MESSAGE: &str = "Correct.";
pub const INCORRECT_MESSAGE: &str = "Not correct. Please review the lesson and try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizChoiceVm {
    pub index: usize,
    pub label: String,
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizVm {
    pub prompt: String,
    pub choices: Vec<QuizChoiceVm>,
    pub result: Option<&'static str>,
}

impl From<&QuizState> for QuizVm {
    fn from(quiz: &QuizState) -> Self {
        let selected = quiz.phase.selected();
        let choices = quiz
            .spec
            .choices
            .iter()
            .enumerate()
            .map(|(index, label)| QuizChoiceVm {
                index,
                label: label.clone(),
                checked: selected == Some(index),
            })
            .collect();
        let result = match quiz.phase {
            QuizPhase::Unanswered => None,
            QuizPhase::Answered { correct: true, .. } => Some(CORRECT_MESSAGE),
            QuizPhase::Answered { correct: false, .. } => Some(INCORRECT_MESSAGE),
        };
        Self {
            prompt: quiz.spec.prompt.clone(),
            choices,
            result,
        }
    }
}
