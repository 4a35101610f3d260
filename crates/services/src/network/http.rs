use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use super::Network;
use crate::error::NetworkError;
use crate::gateway::{GatewayRequest, GatewayResponse, Method, ResponseSource};

/// Upper bound on one request, body included; a stalled origin then counts as offline.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches content from an HTTP(S) origin.
#[derive(Clone)]
pub struct HttpNetwork {
    client: Client,
    base: Url,
    timeout: Duration,
}

impl HttpNetwork {
    /// Request paths are resolved below `base`, which is treated as a directory.
    #[must_use]
    pub fn new(mut base: Url) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            client: Client::new(),
            base,
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute URL for a request path.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::Url` if the path cannot be joined to the base.
    pub fn resolve(&self, request: &GatewayRequest) -> Result<Url, NetworkError> {
        Ok(self.base.join(request.path().trim_start_matches('/'))?)
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, request: &GatewayRequest) -> Result<GatewayResponse, NetworkError> {
        let url = self.resolve(request)?;
        log::debug!("http fetch {} {url}", request.method());
        let response = self
            .client
            .request(http_method(request.method()), url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?.to_vec();

        Ok(GatewayResponse {
            status,
            content_type,
            body,
            source: ResponseSource::Network,
        })
    }
}
