use reqwest::Url;

use super::error::OfflineError;
use super::http::cache_key;

/// Prefix of every cache generation name
pub const CACHE_PREFIX: &str = "worktime-pwa";

/// Version tag of the current shell
pub const DEFAULT_CACHE_VERSION: &str = "v1";

/// Assets needed to render the application offline, relative to the scope.
pub const CORE_ASSETS: [&str; 7] = [
    "./",
    "./index.html",
    "./styles.css",
    "./app.js",
    "./manifest.webmanifest",
    "./icons/icon-192.png",
    "./icons/icon-512.png",
];

/// Where fresh navigations are stored
pub const ROOT_DOCUMENT: &str = "./index.html";

/// The shell served by one cache generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellManifest {
    scope: Url,
    cache_name: String,
    assets: Vec<Url>,
    root_document: Url,
}

impl ShellManifest {
    /// Manifest of the core assets under `scope`, for cache `version`.
    pub fn new(scope: Url, version: &str) -> Result<Self, OfflineError> {
        if !matches!(scope.scheme(), "http" | "https") {
            return Err(OfflineError::InvalidUrl(scope.to_string()));
        }

        // Relative asset paths resolve against a directory
        let mut scope = scope;
        if !scope.path().ends_with('/') {
            let path = format!("{}/", scope.path());
            scope.set_path(&path);
        }
        scope.set_query(None);
        scope.set_fragment(None);

        let root_document = join(&scope, ROOT_DOCUMENT)?;
        let mut manifest = Self {
            scope,
            cache_name: format!("{}-{}", CACHE_PREFIX, version),
            assets: Vec::new(),
            root_document,
        };
        manifest.assets = manifest.resolve(&CORE_ASSETS)?;
        Ok(manifest)
    }

    /// Parse `scope` and build the manifest for `version`.
    pub fn parse(scope: &str, version: &str) -> Result<Self, OfflineError> {
        let url = Url::parse(scope).map_err(|e| OfflineError::InvalidUrl(format!("{}: {}", scope, e)))?;
        Self::new(url, version)
    }

    /// Replace the precached asset list.
    pub fn with_assets(mut self, assets: &[&str]) -> Result<Self, OfflineError> {
        self.assets = self.resolve(assets)?;
        Ok(self)
    }

    fn resolve(&self, paths: &[&str]) -> Result<Vec<Url>, OfflineError> {
        paths.iter().map(|path| join(&self.scope, path)).collect()
    }

    pub fn scope(&self) -> &Url {
        &self.scope
    }

    /// Name of the cache generation, e.g. `worktime-pwa-v1`
    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn assets(&self) -> &[Url] {
        &self.assets
    }

    pub fn root_document(&self) -> &Url {
        &self.root_document
    }

    pub fn root_document_key(&self) -> String {
        cache_key(&self.root_document)
    }

    pub fn asset_keys(&self) -> Vec<String> {
        self.assets.iter().map(cache_key).collect()
    }

    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.scope.origin()
    }

    /// Resolve a path relative to the scope
    pub fn url_for(&self, path: &str) -> Result<Url, OfflineError> {
        join(&self.scope, path)
    }
}

fn join(base: &Url, path: &str) -> Result<Url, OfflineError> {
    base.join(path)
        .map_err(|e| OfflineError::InvalidUrl(format!("{}: {}", path, e)))
}
