use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{Network, content_type_for};
use crate::error::NetworkError;
use crate::gateway::{GatewayRequest, GatewayResponse, Method, ResponseSource};

const INDEX_FILE: &str = "index.html";

/// Serves content from a local directory, the way a static file server would.
#[derive(Debug, Clone)]
pub struct DirectoryNetwork {
    root: PathBuf,
}

impl DirectoryNetwork {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File backing a request path. Directory paths map to their `index.html`.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidPath` for paths that would leave the root.
    pub fn file_for(&self, request: &GatewayRequest) -> Result<PathBuf, NetworkError> {
        let path = request.path_only();
        let mut file = self.root.clone();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            if segment == "." || segment == ".." || segment.contains('\\') {
                return Err(NetworkError::InvalidPath(path.to_owned()));
            }
            file.push(segment);
        }
        if path.ends_with('/') {
            file.push(INDEX_FILE);
        }
        Ok(file)
    }
}

fn status_only(status: u16) -> GatewayResponse {
    GatewayResponse {
        status,
        content_type: None,
        body: Vec::new(),
        source: ResponseSource::Network,
    }
}

#[async_trait]
impl Network for DirectoryNetwork {
    async fn fetch(&self, request: &GatewayRequest) -> Result<GatewayResponse, NetworkError> {
        if !matches!(request.method(), Method::Get | Method::Head) {
            return Ok(status_only(405));
        }
        let file = self.file_for(request)?;
        let body = match tokio::fs::read(&file).await {
            Ok(body) => body,
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => {
                return Ok(GatewayResponse::not_found());
            }
            Err(err) => return Err(err.into()),
        };
        let content_type = content_type_for(&file.to_string_lossy()).map(str::to_owned);
        let body = if request.method() == Method::Head {
            Vec::new()
        } else {
            body
        };
        Ok(GatewayResponse {
            status: 200,
            content_type,
            body,
            source: ResponseSource::Network,
        })
    }
}
