use std::sync::Arc;

use lesson_core::model::CacheManifest;
use storage::repository::Storage;

use crate::catalog::CatalogLoader;
use crate::config::ContentConfig;
use crate::error::AppServicesError;
use crate::gateway::{GatewayState, OfflineGateway};
use crate::network::Network;
use crate::progress_service::ProgressService;
use crate::quiz::QuizEngine;

/// Assembles the app-facing services around one gateway and one progress store.
#[derive(Clone)]
pub struct AppServices {
    gateway: Arc<OfflineGateway>,
    loader: Arc<CatalogLoader>,
    progress: Arc<ProgressService>,
    quiz: Arc<QuizEngine>,
}

impl AppServices {
    /// Wire services over `storage` without touching the gateway lifecycle.
    pub async fn new(storage: Storage, network: Arc<dyn Network>, manifest: CacheManifest) -> Self {
        let gateway = Arc::new(OfflineGateway::new(
            manifest,
            Arc::clone(&storage.caches),
            network,
        ));
        let loader = Arc::new(CatalogLoader::new(Arc::clone(&gateway)));
        let progress = Arc::new(ProgressService::open(Arc::clone(&storage.values)).await);
        let quiz = Arc::new(QuizEngine::new(Arc::clone(&progress)));
        Self {
            gateway,
            loader,
            progress,
            quiz,
        }
    }

    /// Build services backed by `SQLite` and bring the offline cache up.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Sqlite` if storage initialization fails. Gateway
    /// failures are not errors: the app then runs network-only.
    pub async fn from_config(
        db_url: &str,
        config: &ContentConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let services = Self::new(storage, config.source.network(), config.manifest()).await;
        services.start_offline_cache().await;
        Ok(services)
    }

    /// Resume the stored cache generation, or install and activate a new one.
    ///
    /// Failures are logged and leave the gateway inactive.
    pub async fn start_offline_cache(&self) -> GatewayState {
        match self.gateway.restore().await {
            Ok(true) => return self.gateway.state(),
            Ok(false) => {}
            Err(err) => log::warn!("could not restore offline cache: {err}"),
        }
        if self.gateway.state() == GatewayState::Uninstalled {
            if let Err(err) = self.gateway.install().await {
                log::warn!("offline cache unavailable, running network-only: {err}");
                return self.gateway.state();
            }
        }
        if let Err(err) = self.gateway.activate().await {
            log::warn!("offline cache not activated: {err}");
        }
        self.gateway.state()
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
