use std::collections::BTreeSet;

use thiserror::Error;

/// Prefix of every cache generation name.
pub const CACHE_NAME_PREFIX: &str = "offline-lessons-v";

/// Shell assets pre-populated on install when no manifest is configured.
pub const DEFAULT_SHELL_ASSETS: &[&str] = &["/index.html", "/modules/index.json"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ManifestError {
    #[error("cache name cannot be empty")]
    EmptyCacheName,

    #[error("manifest asset path cannot be empty")]
    EmptyAsset,
}

/// Versioned cache name plus the assets fetched into it on install.
///
/// The name must change whenever the manifest or the served content changes so
/// activation can discard the previous generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheManifest {
    cache_name: String,
    assets: BTreeSet<String>,
}

impl CacheManifest {
    /// Build a manifest from a cache name and asset paths.
    ///
    /// Asset paths are normalised to start with `/`.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError` for an empty name or an empty asset path.
    pub fn new(
        cache_name: impl Into<String>,
        assets: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<Self, ManifestError> {
        let cache_name = cache_name.into().trim().to_owned();
        if cache_name.is_empty() {
            return Err(ManifestError::EmptyCacheName);
        }
        let assets = assets
            .into_iter()
            .map(|asset| normalize_asset_path(asset.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { cache_name, assets })
    }

    /// Manifest named `offline-lessons-v<version>` holding the default shell assets.
    #[must_use]
    pub fn default_shell(version: u32) -> Self {
        Self {
            cache_name: versioned_cache_name(version),
            assets: DEFAULT_SHELL_ASSETS.iter().map(|asset| (*asset).to_owned()).collect(),
        }
    }

    #[must_use]
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn assets(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.assets.contains(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[must_use]
pub fn versioned_cache_name(version: u32) -> String {
    format!("{CACHE_NAME_PREFIX}{version}")
}

fn normalize_asset_path(raw: &str) -> Result<String, ManifestError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ManifestError::EmptyAsset);
    }
    // "./" names the app root.
    let trimmed = raw.strip_prefix("./").unwrap_or(raw);
    if trimmed.starts_with('/') {
        Ok(trimmed.to_owned())
    } else {
        Ok(format!("/{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assets_are_normalised_and_deduplicated() {
        let manifest =
            CacheManifest::new("shell-v1", ["/shell", "shell", "./data.json"]).unwrap();
        assert_eq!(manifest.assets().collect::<Vec<_>>(), vec!["/data.json", "/shell"]);
        assert!(manifest.contains("/shell"));
    }

    #[test]
    fn rejects_empty_parts() {
        assert_eq!(
            CacheManifest::new(" ", ["/a"]).unwrap_err(),
            ManifestError::EmptyCacheName
        );
        assert_eq!(
            CacheManifest::new("v1", ["  "]).unwrap_err(),
            ManifestError::EmptyAsset
        );
    }

    #[test]
    fn default_shell_is_versioned() {
        let manifest = CacheManifest::default_shell(3);
        assert_eq!(manifest.cache_name(), "offline-lessons-v3");
        assert_eq!(manifest.len(), DEFAULT_SHELL_ASSETS.len());
    }
}
