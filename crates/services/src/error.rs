//! Shared error types for the services crate.

use thiserror::Error;

use lesson_core::model::ModuleId;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::gateway::GatewayState;

/// Errors emitted by `Network` adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NetworkError {
    #[error("network is offline")]
    Offline,
    #[error("path escapes the content root: {0}")]
    InvalidPath(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("invalid content url: {0}")]
    Url(#[from] url::ParseError),
}

/// Errors emitted by `OfflineGateway`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    #[error("cannot {action} while the gateway is {state:?}")]
    InvalidTransition {
        state: GatewayState,
        action: &'static str,
    },
    #[error("install failed fetching {asset}: {reason}")]
    Install { asset: String, reason: String },
    #[error("resource unavailable: {key}")]
    Unavailable {
        key: String,
        #[source]
        source: NetworkError,
    },
    #[error("invalid request target: {target:?}")]
    InvalidRequest { target: String },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CatalogLoader`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoaderError {
    #[error("module id cannot be used as a path segment: {0}")]
    InvalidModuleId(ModuleId),
    #[error("{path} returned status {status}")]
    Status { path: String, status: u16 },
    #[error("{path} is not valid content: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("snapshot is not a JSON object")]
    InvalidSnapshot,
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizEngine`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("choice {choice} is outside {len} choices")]
    ChoiceOutOfRange { choice: usize, len: usize },
    #[error(transparent)]
    Progress(#[from] ProgressError),
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid {name} value: {raw}")]
    InvalidValue { name: &'static str, raw: String },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
