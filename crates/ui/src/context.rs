use std::sync::Arc;

use lesson_core::model::ModulesIndex;
use services::{CatalogLoader, OfflineGateway, ProgressService, QuizEngine};

pub trait UiApp: Send + Sync {
    fn modules_index(&self) -> ModulesIndex;

    fn gateway(&self) -> Arc<OfflineGateway>;
    fn loader(&self) -> Arc<CatalogLoader>;
    fn progress(&self) -> Arc<ProgressService>;
    fn quiz(&self) -> Arc<QuizEngine>;
}

#[derive(Clone)]
pub struct AppContext {
    modules_index: Arc<ModulesIndex>,

    gateway: Arc<OfflineGateway>,
    loader: Arc<CatalogLoader>,
    progress: Arc<ProgressService>,
    quiz: Arc<QuizEngine>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            modules_index: Arc::new(app.modules_index()),
            gateway: app.gateway(),
            loader: app.loader(),
            progress: app.progress(),
            quiz: app.quiz(),
        }
    }

    /// Catalog loaded once at startup; it does not change for the session.
    #[must_use]
    pub fn modules_index(&self) -> Arc<ModulesIndex> {
        Arc::clone(&self.modules_index)
    }

    #[must_use]
    pub fn gateway(&self) -> Arc<OfflineGateway> {
        Arc::clone(&self.gateway)
    }

    #[must_use]
    pub fn loader(&self) -> Arc<CatalogLoader> {
        Arc::clone(&self.loader)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizEngine> {
        Arc::clone(&self.quiz)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
