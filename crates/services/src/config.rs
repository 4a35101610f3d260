use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use lesson_core::model::CacheManifest;
use url::Url;

use crate::error::ConfigError;
use crate::network::{DirectoryNetwork, HttpNetwork, Network};

pub const CONTENT_URL_VAR: &str = "LESSONS_CONTENT_URL";
pub const CACHE_VERSION_VAR: &str = "LESSONS_CACHE_VERSION";

/// Content directory used when no origin is configured.
pub const DEFAULT_CONTENT_DIR: &str = "content";
pub const DEFAULT_CACHE_VERSION: u32 = 1;

/// Where static content is served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    Http(Url),
    Directory(PathBuf),
}

impl ContentSource {
    /// `http(s)://` values name a remote origin; anything else is a local directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a malformed URL.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(raw).map_err(|_| ConfigError::InvalidValue {
                name: CONTENT_URL_VAR,
                raw: raw.to_owned(),
            })?;
            return Ok(ContentSource::Http(url));
        }
        if raw.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: CONTENT_URL_VAR,
                raw: raw.to_owned(),
            });
        }
        Ok(ContentSource::Directory(PathBuf::from(raw)))
    }

    #[must_use]
    pub fn network(&self) -> Arc<dyn Network> {
        match self {
            ContentSource::Http(base) => Arc::new(HttpNetwork::new(base.clone())),
            ContentSource::Directory(root) => Arc::new(DirectoryNetwork::new(root.clone())),
        }
    }
}

/// Content origin and cache generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentConfig {
    pub source: ContentSource,
    pub cache_version: u32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            source: ContentSource::Directory(PathBuf::from(DEFAULT_CONTENT_DIR)),
            cache_version: DEFAULT_CACHE_VERSION,
        }
    }
}

impl ContentConfig {
    /// Read `LESSONS_CONTENT_URL` and `LESSONS_CACHE_VERSION`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a variable is set but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(CONTENT_URL_VAR).filter(|raw| !raw.trim().is_empty()) {
            config.source = ContentSource::parse(&raw)?;
        }
        if let Some(raw) = lookup(CACHE_VERSION_VAR).filter(|raw| !raw.trim().is_empty()) {
            config.cache_version = parse_cache_version(&raw)?;
        }
        Ok(config)
    }

    /// Default shell manifest for the configured generation.
    #[must_use]
    pub fn manifest(&self) -> CacheManifest {
        CacheManifest::default_shell(self.cache_version)
    }
}

/// # Errors
///
/// Returns `ConfigError::InvalidValue` unless `raw` is a non-negative integer.
pub fn parse_cache_version(raw: &str) -> Result<u32, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: CACHE_VERSION_VAR,
        raw: raw.to_owned(),
    })
}
