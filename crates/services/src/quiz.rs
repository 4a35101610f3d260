use std::sync::Arc;

use lesson_core::model::{LessonId, ModuleId, QuizSpec};

use crate::error::QuizError;
use crate::progress_service::ProgressService;

/// Keys that can reach a focused choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizKey {
    Enter,
    Space,
    Other,
}

/// A user gesture aimed at one choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizInput {
    Pointer { choice: usize },
    Key { choice: usize, key: QuizKey },
}

impl QuizInput {
    /// The choice this input selects; pointer activation and Enter/Space are equivalent.
    #[must_use]
    pub fn activated_choice(self) -> Option<usize> {
        match self {
            QuizInput::Pointer { choice }
            | QuizInput::Key {
                choice,
                key: QuizKey::Enter | QuizKey::Space,
            } => Some(choice),
            QuizInput::Key {
                key: QuizKey::Other,
                ..
            } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Unanswered,
    Answered { choice: usize, correct: bool },
}

impl QuizPhase {
    #[must_use]
    pub fn selected(self) -> Option<usize> {
        match self {
            QuizPhase::Unanswered => None,
            QuizPhase::Answered { choice, .. } => Some(choice),
        }
    }
}

/// Quiz of one lesson plus its current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizState {
    pub module_id: ModuleId,
    pub lesson_id: LessonId,
    pub spec: QuizSpec,
    pub phase: QuizPhase,
}

/// Runs single-choice quizzes whose answers live in the progress store.
#[derive(Clone)]
pub struct QuizEngine {
    progress: Arc<ProgressService>,
}

impl QuizEngine {
    #[must_use]
    pub fn new(progress: Arc<ProgressService>) -> Self {
        Self { progress }
    }

    /// Open the quiz of a lesson, restoring a stored answer.
    ///
    /// Returns `None` when the lesson has no quiz. A stored answer outside the
    /// choices is treated as unanswered.
    #[must_use]
    pub fn open(
        &self,
        module_id: &ModuleId,
        lesson_id: &LessonId,
        spec: Option<&QuizSpec>,
    ) -> Option<QuizState> {
        let spec = spec?.clone();
        let stored = self.progress.answer(module_id, lesson_id);
        let phase = match spec.restore_choice(stored) {
            Some(choice) => QuizPhase::Answered {
                choice,
                correct: spec.is_correct(choice),
            },
            None => QuizPhase::Unanswered,
        };
        Some(QuizState {
            module_id: module_id.clone(),
            lesson_id: lesson_id.clone(),
            spec,
            phase,
        })
    }

    /// Apply one input, persisting the selection.
    ///
    /// Returns `Ok(None)` for inputs that do not activate a choice.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::ChoiceOutOfRange` for a choice the quiz does not offer.
    /// Returns `QuizError::Progress` if the answer cannot be persisted; the phase
    /// is then left unchanged.
    pub async fn select(
        &self,
        quiz: &mut QuizState,
        input: QuizInput,
    ) -> Result<Option<QuizPhase>, QuizError> {
        let Some(choice) = input.activated_choice() else {
            return Ok(None);
        };
        if !quiz.spec.is_valid_choice(choice) {
            return Err(QuizError::ChoiceOutOfRange {
                choice,
                len: quiz.spec.choices.len(),
            });
        }
        self.progress
            .set_answer(&quiz.module_id, &quiz.lesson_id, choice)
            .await?;
        quiz.phase = QuizPhase::Answered {
            choice,
            correct: quiz.spec.is_correct(choice),
        };
        Ok(Some(quiz.phase))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    fn spec() -> QuizSpec {
        QuizSpec {
            prompt: "Which is B?".into(),
            choices: vec!["A".into(), "B".into(), "C".into()],
            answer_index: 1,
        }
    }

    fn ids() -> (ModuleId, LessonId) {
        (ModuleId::new("m1").unwrap(), LessonId::new("l1").unwrap())
    }

    async fn engine() -> (QuizEngine, Arc<ProgressService>) {
        let progress = Arc::new(ProgressService::open(Arc::new(InMemoryRepository::new())).await);
        (QuizEngine::new(Arc::clone(&progress)), progress)
    }

    #[tokio::test]
    async fn answers_overwrite_and_survive_reopening() {
        let (engine, progress) = engine().await;
        let (m, l) = ids();
        let spec = spec();

        let mut quiz = engine.open(&m, &l, Some(&spec)).unwrap();
        assert_eq!(quiz.phase, QuizPhase::Unanswered);

        let phase = engine
            .select(&mut quiz, QuizInput::Pointer { choice: 0 })
            .await
            .unwrap();
        assert_eq!(phase, Some(QuizPhase::Answered { choice: 0, correct: false }));
        assert_eq!(progress.answer(&m, &l), Some(0));

        let phase = engine
            .select(
                &mut quiz,
                QuizInput::Key {
                    choice: 1,
                    key: QuizKey::Enter,
                },
            )
            .await
            .unwrap();
        assert_eq!(phase, Some(QuizPhase::Answered { choice: 1, correct: true }));
        assert_eq!(progress.answer(&m, &l), Some(1));

        let reopened = engine.open(&m, &l, Some(&spec)).unwrap();
        assert_eq!(reopened.phase, QuizPhase::Answered { choice: 1, correct: true });
    }

    #[tokio::test]
    async fn space_matches_pointer_and_other_keys_are_ignored() {
        let (engine, progress) = engine().await;
        let (m, l) = ids();
        let mut quiz = engine.open(&m, &l, Some(&spec())).unwrap();

        let ignored = engine
            .select(
                &mut quiz,
                QuizInput::Key {
                    choice: 2,
                    key: QuizKey::Other,
                },
            )
            .await
            .unwrap();
        assert_eq!(ignored, None);
        assert_eq!(progress.answer(&m, &l), None);

        let spaced = engine
            .select(
                &mut quiz,
                QuizInput::Key {
                    choice: 2,
                    key: QuizKey::Space,
                },
            )
            .await
            .unwrap();
        assert_eq!(spaced, Some(QuizPhase::Answered { choice: 2, correct: false }));
    }

    #[tokio::test]
    async fn stored_answer_out_of_range_is_unanswered() {
        let (engine, progress) = engine().await;
        let (m, l) = ids();
        progress
            .import_snapshot(r#"{"answers":{"m1":{"l1":7}}}"#)
            .await
            .unwrap();
        let quiz = engine.open(&m, &l, Some(&spec())).unwrap();
        assert_eq!(quiz.phase, QuizPhase::Unanswered);

        progress
            .import_snapshot(r#"{"answers":{"m1":{"l1":-1}}}"#)
            .await
            .unwrap();
        let quiz = engine.open(&m, &l, Some(&spec())).unwrap();
        assert_eq!(quiz.phase, QuizPhase::Unanswered);
    }

    #[tokio::test]
    async fn invalid_choice_is_rejected_and_lessons_without_quiz_have_none() {
        let (engine, _progress) = engine().await;
        let (m, l) = ids();
        assert!(engine.open(&m, &l, None).is_none());

        let mut quiz = engine.open(&m, &l, Some(&spec())).unwrap();
        assert!(matches!(
            engine.select(&mut quiz, QuizInput::Pointer { choice: 3 }).await,
            Err(QuizError::ChoiceOutOfRange { choice: 3, len: 3 })
        ));
        assert_eq!(quiz.phase, QuizPhase::Unanswered);
    }
}
