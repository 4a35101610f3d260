use lesson_core::model::CacheManifest;

use super::request::GatewayRequest;

/// Suffixes of shell assets and content bundles.
const CACHE_FIRST_SUFFIXES: &[&str] = &[
    ".html", ".css", ".js", ".json", ".svg", ".png", ".jpg", ".jpeg", ".webp", ".ogg", ".mp3",
    ".wav",
];

/// Content bundles live under this prefix.
const CONTENT_PREFIX: &str = "/modules/";

/// Fetch policy for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    /// Serve from the active cache, fill it from the network on a miss.
    CacheFirst,
    /// Try the network, fall back to the active cache.
    NetworkFirst,
}

impl ResourceClass {
    /// Classifies a request by its path alone.
    ///
    /// Manifest assets, the app root, content bundles and static asset suffixes are
    /// cache-first; everything else is network-first.
    #[must_use]
    pub fn classify(request: &GatewayRequest, manifest: &CacheManifest) -> Self {
        let path = request.path_only();
        if path == "/" || manifest.contains(path) || manifest.contains(request.path()) {
            return ResourceClass::CacheFirst;
        }
        if path.starts_with(CONTENT_PREFIX) {
            return ResourceClass::CacheFirst;
        }
        let lower = path.to_ascii_lowercase();
        if CACHE_FIRST_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix)) {
            return ResourceClass::CacheFirst;
        }
        ResourceClass::NetworkFirst
    }
}
