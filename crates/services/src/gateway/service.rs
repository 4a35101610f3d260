use std::sync::{Arc, Mutex, PoisonError};

use lesson_core::model::CacheManifest;
use storage::repository::{CacheStore, StorageError};

use super::policy::ResourceClass;
use super::request::{GatewayRequest, GatewayResponse};
use crate::error::{GatewayError, NetworkError};
use crate::network::Network;

/// Lifecycle of the gateway's cache generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayState {
    Uninstalled,
    Installing,
    Installed,
    Activating,
    Activated,
}

#[derive(Debug)]
struct Lifecycle {
    state: GatewayState,
    clients_claimed: bool,
}

/// Intercepts resource fetches and applies the cache policy of each resource class.
///
/// Until the gateway is activated every request goes straight to the network and
/// the cache is neither read nor written.
pub struct OfflineGateway {
    manifest: CacheManifest,
    caches: Arc<dyn CacheStore>,
    network: Arc<dyn Network>,
    lifecycle: Mutex<Lifecycle>,
}

impl OfflineGateway {
    #[must_use]
    pub fn new(
        manifest: CacheManifest,
        caches: Arc<dyn CacheStore>,
        network: Arc<dyn Network>,
    ) -> Self {
        Self {
            manifest,
            caches,
            network,
            lifecycle: Mutex::new(Lifecycle {
                state: GatewayState::Uninstalled,
                clients_claimed: false,
            }),
        }
    }

    #[must_use]
    pub fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    #[must_use]
    pub fn state(&self) -> GatewayState {
        self.lifecycle().state
    }

    /// Whether activation took over clients that were already open.
    #[must_use]
    pub fn clients_claimed(&self) -> bool {
        self.lifecycle().clients_claimed
    }

    fn lifecycle(&self) -> std::sync::MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(
        &self,
        from: GatewayState,
        to: GatewayState,
        action: &'static str,
    ) -> Result<(), GatewayError> {
        let mut lifecycle = self.lifecycle();
        if lifecycle.state != from {
            return Err(GatewayError::InvalidTransition {
                state: lifecycle.state,
                action,
            });
        }
        lifecycle.state = to;
        Ok(())
    }

    fn set_state(&self, state: GatewayState) {
        self.lifecycle().state = state;
    }

    /// Fetch every manifest asset into the cache generation named by the manifest.
    ///
    /// Responses are staged in memory and only written once every asset arrived
    /// with a 2xx status, so a failed install leaves no partial generation behind.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidTransition` unless the gateway is uninstalled.
    /// Returns `GatewayError::Install` if any asset fails to fetch.
    /// Returns `GatewayError::Storage` if the staged responses cannot be written.
    /// On any failure the gateway is uninstalled again.
    pub async fn install(&self) -> Result<(), GatewayError> {
        self.transition(
            GatewayState::Uninstalled,
            GatewayState::Installing,
            "install",
        )?;
        log::info!(
            "installing cache {} ({} assets)",
            self.manifest.cache_name(),
            self.manifest.len()
        );

        match self.populate().await {
            Ok(()) => {
                self.set_state(GatewayState::Installed);
                log::info!("cache {} installed", self.manifest.cache_name());
                Ok(())
            }
            Err(err) => {
                self.set_state(GatewayState::Uninstalled);
                log::warn!("install of {} failed: {err}", self.manifest.cache_name());
                Err(err)
            }
        }
    }

    async fn populate(&self) -> Result<(), GatewayError> {
        let mut staged = Vec::with_capacity(self.manifest.len());
        for asset in self.manifest.assets() {
            let request = GatewayRequest::get(asset)?;
            let response =
                self.network
                    .fetch(&request)
                    .await
                    .map_err(|err| GatewayError::Install {
                        asset: asset.to_owned(),
                        reason: err.to_string(),
                    })?;
            if !response.is_success() {
                return Err(GatewayError::Install {
                    asset: asset.to_owned(),
                    reason: format!("status {}", response.status),
                });
            }
            staged.push((request.cache_key(), response.to_record()));
        }

        let name = self.manifest.cache_name();
        let written = async {
            self.caches.open_cache(name).await?;
            for (key, record) in &staged {
                self.caches.put_entry(name, key, record).await?;
            }
            Ok::<(), StorageError>(())
        }
        .await;
        if let Err(err) = written {
            if let Err(cleanup) = self.caches.delete_cache(name).await {
                log::warn!("could not discard partial cache {name}: {cleanup}");
            }
            return Err(err.into());
        }
        Ok(())
    }

    /// Delete every other cache generation and claim open clients.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidTransition` unless the gateway is installed.
    /// Returns `GatewayError::Storage` if stale generations cannot be removed;
    /// the gateway then stays installed.
    pub async fn activate(&self) -> Result<(), GatewayError> {
        self.transition(
            GatewayState::Installed,
            GatewayState::Activating,
            "activate",
        )?;
        if let Err(err) = self.prune_stale_generations().await {
            self.set_state(GatewayState::Installed);
            return Err(err);
        }
        self.claim();
        log::info!("cache {} activated", self.manifest.cache_name());
        Ok(())
    }

    /// Resume a generation activated by an earlier run.
    ///
    /// Returns `Ok(true)` and activates the gateway when the current generation is
    /// stored and holds every manifest asset; returns `Ok(false)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidTransition` unless the gateway is uninstalled.
    /// Returns `GatewayError::Storage` if the cache store cannot be read.
    pub async fn restore(&self) -> Result<bool, GatewayError> {
        let state = self.state();
        if state != GatewayState::Uninstalled {
            return Err(GatewayError::InvalidTransition {
                state,
                action: "restore",
            });
        }

        let name = self.manifest.cache_name();
        let keys = match self.caches.keys(name).await {
            Ok(keys) => keys,
            Err(StorageError::NotFound) => return Ok(false),
            Err(err) => return Err(err.into()),
        };
        let complete = self.manifest.assets().all(|asset| {
            GatewayRequest::get(asset)
                .map(|request| keys.contains(&request.cache_key()))
                .unwrap_or(false)
        });
        if !complete {
            log::info!("stored cache {name} is incomplete; reinstall required");
            return Ok(false);
        }

        self.transition(
            GatewayState::Uninstalled,
            GatewayState::Activating,
            "restore",
        )?;
        if let Err(err) = self.prune_stale_generations().await {
            self.set_state(GatewayState::Uninstalled);
            return Err(err);
        }
        self.claim();
        log::info!("cache {name} restored");
        Ok(true)
    }

    async fn prune_stale_generations(&self) -> Result<(), GatewayError> {
        let current = self.manifest.cache_name();
        for name in self.caches.cache_names().await? {
            if name != current {
                self.caches.delete_cache(&name).await?;
                log::info!("deleted stale cache {name}");
            }
        }
        Ok(())
    }

    fn claim(&self) {
        let mut lifecycle = self.lifecycle();
        lifecycle.state = GatewayState::Activated;
        lifecycle.clients_claimed = true;
    }

    /// Request keys stored in the current generation, sorted.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Storage` if the cache store cannot be read.
    pub async fn cached_keys(&self) -> Result<Vec<String>, GatewayError> {
        match self.caches.keys(self.manifest.cache_name()).await {
            Ok(keys) => Ok(keys),
            Err(StorageError::NotFound) => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Answer one resource request.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Unavailable` when the network fails and the active
    /// cache holds no entry for the request.
    pub async fn handle(&self, request: &GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        if self.state() != GatewayState::Activated || !request.is_cacheable() {
            return self.fetch(request).await.map_err(|source| unavailable(request, source));
        }

        match ResourceClass::classify(request, &self.manifest) {
            ResourceClass::CacheFirst => self.cache_first(request).await,
            ResourceClass::NetworkFirst => self.network_first(request).await,
        }
    }

    async fn cache_first(&self, request: &GatewayRequest) -> Result<GatewayResponse, GatewayError> {
        if let Some(hit) = self.cached(request).await {
            log::debug!("cache hit {request}");
            return Ok(hit);
        }
        log::debug!("cache miss {request}");
        let response = self
            .fetch(request)
            .await
            .map_err(|source| unavailable(request, source))?;
        self.store(request, &response).await;
        Ok(response)
    }

    async fn network_first(
        &self,
        request: &GatewayRequest,
    ) -> Result<GatewayResponse, GatewayError> {
        match self.fetch(request).await {
            Ok(response) => {
                self.store(request, &response).await;
                Ok(response)
            }
            Err(source) => {
                log::debug!("network failed for {request}: {source}");
                self.cached(request)
                    .await
                    .ok_or_else(|| unavailable(request, source))
            }
        }
    }

    async fn fetch(&self, request: &GatewayRequest) -> Result<GatewayResponse, NetworkError> {
        self.network.fetch(request).await
    }

    async fn cached(&self, request: &GatewayRequest) -> Option<GatewayResponse> {
        match self
            .caches
            .match_entry(self.manifest.cache_name(), &request.cache_key())
            .await
        {
            Ok(entry) => entry.map(GatewayResponse::from_record),
            Err(err) => {
                log::warn!("cache read failed for {request}: {err}");
                None
            }
        }
    }

    /// Only 2xx responses are kept.
    async fn store(&self, request: &GatewayRequest, response: &GatewayResponse) {
        if !response.is_success() {
            return;
        }
        if let Err(err) = self
            .caches
            .put_entry(
                self.manifest.cache_name(),
                &request.cache_key(),
                &response.to_record(),
            )
            .await
        {
            log::warn!("cache write failed for {request}: {err}");
        }
    }
}

fn unavailable(request: &GatewayRequest, source: NetworkError) -> GatewayError {
    GatewayError::Unavailable {
        key: request.cache_key(),
        source,
    }
}
