//! In-memory fakes for exercising the worker without a network.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::cache::{CacheError, CacheStorage, MemoryCacheStorage};
use super::fetch::{FetchError, Fetcher};
use super::http::{Request, Response};
use super::manifest::{ShellManifest, CORE_ASSETS};

pub const SCOPE: &str = "https://worktime.example.com/app/";

/// A scripted network that counts every fetch.
///
/// Unknown URLs answer 404; `set_online(false)` and `fail` simulate network
/// errors.
#[derive(Default)]
pub struct FakeNetwork {
    routes: Mutex<HashMap<String, Response>>,
    failing: Mutex<HashSet<String>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl FakeNetwork {
    pub fn serve(&self, url: &str, response: Response) {
        self.routes.lock().unwrap().insert(url.to_string(), response);
    }

    pub fn fail(&self, url: &str) {
        self.failing.lock().unwrap().insert(url.to_string());
    }

    pub fn set_online(&self, online: bool) {
        self.offline.store(!online, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for FakeNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let url = request.url.as_str();
        if self.offline.load(Ordering::SeqCst) || self.failing.lock().unwrap().contains(url) {
            return Err(FetchError::Unreachable(url.to_string()));
        }
        Ok(self
            .routes
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| Response::new(404, "not found")))
    }
}

/// A network serving every core asset under `SCOPE`. Each body is the asset
/// path without its `./` prefix; the scope root answers `root`.
pub fn shell_network() -> FakeNetwork {
    let manifest = ShellManifest::parse(SCOPE, "v1").unwrap();
    let network = FakeNetwork::default();
    for path in CORE_ASSETS {
        let body = match path.trim_start_matches("./") {
            "" => "root",
            name => name,
        };
        let url = manifest.url_for(path).unwrap();
        network.serve(url.as_str(), Response::new(200, body));
    }
    network
}

/// Memory cache whose reads and writes can be made to fail.
#[derive(Default)]
pub struct FlakyCache {
    inner: MemoryCacheStorage,
    failing: AtomicBool,
}

impl FlakyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), CacheError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CacheError::Unavailable("quota exceeded".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheStorage for FlakyCache {
    async fn open(&self, name: &str) -> Result<(), CacheError> {
        self.check()?;
        self.inner.open(name).await
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        self.check()?;
        self.inner.keys().await
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        self.check()?;
        self.inner.delete(name).await
    }

    async fn get(&self, name: &str, key: &str) -> Result<Option<Response>, CacheError> {
        self.check()?;
        self.inner.get(name, key).await
    }

    async fn put(&self, name: &str, key: &str, response: Response) -> Result<(), CacheError> {
        self.check()?;
        self.inner.put(name, key, response).await
    }

    async fn entry_keys(&self, name: &str) -> Result<Vec<String>, CacheError> {
        self.check()?;
        self.inner.entry_keys(name).await
    }
}
