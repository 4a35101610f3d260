#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    CacheEntryRecord, CacheStore, InMemoryRepository, KeyValueRepository, Storage, StorageError,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
