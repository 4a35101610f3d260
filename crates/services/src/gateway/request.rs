use std::fmt;

use storage::CacheEntryRecord;
use url::Url;

use crate::error::GatewayError;

/// Base used to resolve relative request paths.
const LOCAL_ORIGIN: &str = "http://localhost/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource request entering the gateway.
///
/// The path is normalised to start with `/` and keeps its query string; only
/// the origin is dropped, so the same resource always maps to one cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GatewayRequest {
    method: Method,
    path: String,
}

impl GatewayRequest {
    /// Build a request from an absolute URL or a path relative to the app root.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidRequest` if `target` cannot be parsed.
    pub fn new(method: Method, target: &str) -> Result<Self, GatewayError> {
        let invalid = || GatewayError::InvalidRequest {
            target: target.to_owned(),
        };
        let trimmed = target.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }
        let base = Url::parse(LOCAL_ORIGIN).map_err(|_| invalid())?;
        let url = base.join(trimmed).map_err(|_| invalid())?;
        let mut path = url.path().to_owned();
        if let Some(query) = url.query() {
            path.push('?');
            path.push_str(query);
        }
        Ok(Self { method, path })
    }

    /// Shorthand for a `GET` request.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::InvalidRequest` if `target` cannot be parsed.
    pub fn get(target: &str) -> Result<Self, GatewayError> {
        Self::new(Method::Get, target)
    }

    #[must_use]
    pub fn method(&self) -> Method {
        self.method
    }

    /// Path plus query, always starting with `/`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path without the query string.
    #[must_use]
    pub fn path_only(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }

    /// Only `GET` responses are ever read from or written to the cache.
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        self.method == Method::Get
    }

    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

impl fmt::Display for GatewayRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Network,
    Cache,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub source: ResponseSource,
}

impl GatewayResponse {
    /// A network response with status 200.
    #[must_use]
    pub fn ok(content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: content_type.map(str::to_owned),
            body: body.into(),
            source: ResponseSource::Network,
        }
    }

    /// A network response with status 404 and an empty body.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            status: 404,
            content_type: None,
            body: Vec::new(),
            source: ResponseSource::Network,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub(crate) fn to_record(&self) -> CacheEntryRecord {
        CacheEntryRecord {
            status: self.status,
            content_type: self.content_type.clone(),
            body: self.body.clone(),
        }
    }

    pub(crate) fn from_record(record: CacheEntryRecord) -> Self {
        Self {
            status: record.status,
            content_type: record.content_type,
            body: record.body,
            source: ResponseSource::Cache,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_and_absolute_targets_share_a_key() {
        let relative = GatewayRequest::get("modules/index.json").unwrap();
        let rooted = GatewayRequest::get("/modules/index.json").unwrap();
        let absolute = GatewayRequest::get("https://lessons.example.org/modules/index.json").unwrap();
        assert_eq!(relative.cache_key(), "GET /modules/index.json");
        assert_eq!(relative, rooted);
        assert_eq!(rooted, absolute);
    }

    #[test]
    fn query_is_part_of_the_key() {
        let request = GatewayRequest::get("/search?q=fractions").unwrap();
        assert_eq!(request.path(), "/search?q=fractions");
        assert_eq!(request.path_only(), "/search");
    }

    #[test]
    fn only_get_is_cacheable() {
        assert!(GatewayRequest::get("/a").unwrap().is_cacheable());
        assert!(!GatewayRequest::new(Method::Post, "/a").unwrap().is_cacheable());
        assert!(GatewayRequest::get("  ").is_err());
    }

    #[test]
    fn cached_record_round_trip_marks_source() {
        let response = GatewayResponse::ok(Some("text/html"), "<p>shell</p>");
        let restored = GatewayResponse::from_record(response.to_record());
        assert_eq!(restored.body, response.body);
        assert_eq!(restored.source, ResponseSource::Cache);
    }
}
