use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lesson_core::model::{LessonId, ModuleId, ProgressState};
use storage::repository::KeyValueRepository;

use crate::error::ProgressError;

/// Key of the progress blob in the value store.
pub const PROGRESS_KEY: &str = "ol_progress";

/// Suggested file name for exported progress.
pub const EXPORT_FILE_NAME: &str = "offline_learning_progress.json";

/// Explicit user answer to the "erase local progress" prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    Cancelled,
}

/// Owns the single progress blob: reads it whole, writes it whole on every mutation.
///
/// Writers are serialized so the stored blob always matches the last applied
/// mutation.
pub struct ProgressService {
    repo: Arc<dyn KeyValueRepository>,
    state: Mutex<ProgressState>,
    writes: tokio::sync::Mutex<()>,
}

impl ProgressService {
    /// Open the store and load the persisted state.
    pub async fn open(repo: Arc<dyn KeyValueRepository>) -> Self {
        let service = Self {
            repo,
            state: Mutex::new(ProgressState::empty()),
            writes: tokio::sync::Mutex::new(()),
        };
        service.load().await;
        service
    }

    fn state(&self) -> MutexGuard<'_, ProgressState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-read the persisted blob, replacing the in-memory state.
    ///
    /// Missing, corrupt, or unreadable data yields the empty state.
    pub async fn load(&self) -> ProgressState {
        let _gate = self.writes.lock().await;
        let loaded = match self.repo.get_value(PROGRESS_KEY).await {
            Ok(Some(raw)) => ProgressState::from_json(&raw).unwrap_or_else(|| {
                log::warn!("stored progress is not a JSON object; starting empty");
                ProgressState::empty()
            }),
            Ok(None) => ProgressState::empty(),
            Err(err) => {
                log::warn!("could not read stored progress: {err}");
                ProgressState::empty()
            }
        };
        *self.state() = loaded.clone();
        loaded
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressState {
        self.state().clone()
    }

    #[must_use]
    pub fn answer(&self, module: &ModuleId, lesson: &LessonId) -> Option<i64> {
        self.state().answer(module, lesson)
    }

    #[must_use]
    pub fn is_visited(&self, module: &ModuleId, lesson: &LessonId) -> bool {
        self.state().is_visited(module, lesson)
    }

    #[must_use]
    pub fn visited_count(&self, module: &ModuleId) -> usize {
        self.state().visited_count(module)
    }

    /// # Errors
    ///
    /// Returns `ProgressError` if the updated state cannot be persisted.
    pub async fn mark_visited(&self, module: &ModuleId, lesson: &LessonId) -> Result<(), ProgressError> {
        self.update(|state| state.mark_visited(module, lesson)).await
    }

    /// Record the selected choice, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the updated state cannot be persisted.
    pub async fn set_answer(
        &self,
        module: &ModuleId,
        lesson: &LessonId,
        choice: usize,
    ) -> Result<(), ProgressError> {
        let choice = i64::try_from(choice).unwrap_or(i64::MAX);
        self.update(|state| state.set_answer(module, lesson, choice))
            .await
    }

    /// Pretty JSON of the current state, identical in shape to the stored blob.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Serialize` if the state cannot be encoded.
    pub fn export_snapshot(&self) -> Result<String, ProgressError> {
        Ok(serde_json::to_string_pretty(&*self.state())?)
    }

    /// Replace the whole state with an imported snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::InvalidSnapshot` unless `raw` is a JSON object; the
    /// current state and the stored blob are then left untouched.
    /// Returns `ProgressError::Storage` if the imported state cannot be persisted.
    pub async fn import_snapshot(&self, raw: &str) -> Result<ProgressState, ProgressError> {
        let imported = ProgressState::from_json(raw).ok_or(ProgressError::InvalidSnapshot)?;
        let _gate = self.writes.lock().await;
        self.persist(&imported).await?;
        *self.state() = imported.clone();
        log::info!("progress imported");
        Ok(imported)
    }

    /// Erase all progress, but only with an explicit confirmation.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the empty state cannot be persisted.
    pub async fn clear(&self, confirmation: Confirmation) -> Result<ClearOutcome, ProgressError> {
        if confirmation == Confirmation::Declined {
            return Ok(ClearOutcome::Cancelled);
        }
        let _gate = self.writes.lock().await;
        let empty = ProgressState::empty();
        self.persist(&empty).await?;
        *self.state() = empty;
        log::info!("progress cleared");
        Ok(ClearOutcome::Cleared)
    }

    async fn update(&self, apply: impl FnOnce(&mut ProgressState)) -> Result<(), ProgressError> {
        let _gate = self.writes.lock().await;
        let mut next = self.snapshot();
        apply(&mut next);
        self.persist(&next).await?;
        *self.state() = next;
        Ok(())
    }

    async fn persist(&self, state: &ProgressState) -> Result<(), ProgressError> {
        let raw = serde_json::to_string(state)?;
        self.repo.put_value(PROGRESS_KEY, &raw).await?;
        Ok(())
    }
}
