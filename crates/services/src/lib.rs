#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod network;
pub mod progress_service;
pub mod quiz;

pub use app_services::AppServices;
pub use catalog::{CatalogLoader, MODULES_INDEX_PATH, lessons_path};
pub use config::{ContentConfig, ContentSource};
pub use error::{
    AppServicesError, ConfigError, GatewayError, LoaderError, NetworkError, ProgressError,
    QuizError,
};
pub use gateway::{
    GatewayRequest, GatewayResponse, GatewayState, Method, OfflineGateway, ResourceClass,
    ResponseSource,
};
pub use network::{DirectoryNetwork, HttpNetwork, MemoryNetwork, Network, OfflineSwitch};
pub use progress_service::{
    ClearOutcome, Confirmation, EXPORT_FILE_NAME, PROGRESS_KEY, ProgressService,
};
pub use quiz::{QuizEngine, QuizInput, QuizKey, QuizPhase, QuizState};
