use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;

use super::{Network, content_type_for};
use crate::error::NetworkError;
use crate::gateway::{GatewayRequest, GatewayResponse};

/// Serves responses from an in-memory table keyed by request path.
///
/// Useful for bundled content and for tests; unknown paths answer 404.
#[derive(Clone, Default)]
pub struct MemoryNetwork {
    files: Arc<Mutex<HashMap<String, GatewayResponse>>>,
    fetches: Arc<AtomicUsize>,
}

impl MemoryNetwork {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `path` with status 200 and a content type guessed from the path.
    #[must_use]
    pub fn with_file(self, path: &str, body: impl Into<Vec<u8>>) -> Self {
        self.insert(path, body);
        self
    }

    pub fn insert(&self, path: &str, body: impl Into<Vec<u8>>) {
        let response = GatewayResponse::ok(content_type_for(path), body);
        self.insert_response(path, response);
    }

    pub fn insert_response(&self, path: &str, response: GatewayResponse) {
        let key = normalize(path);
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, response);
    }

    pub fn remove(&self, path: &str) {
        self.files
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&normalize(path));
    }

    /// Number of fetches served so far, including 404s.
    #[must_use]
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

fn normalize(path: &str) -> String {
    GatewayRequest::get(path).map_or_else(|_| path.to_owned(), |request| request.path().to_owned())
}

#[async_trait]
impl Network for MemoryNetwork {
    async fn fetch(&self, request: &GatewayRequest) -> Result<GatewayResponse, NetworkError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(files
            .get(request.path())
            .cloned()
            .unwrap_or_else(GatewayResponse::not_found))
    }
}
