//! Lifecycle and fetch strategies of the offline worker.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use reqwest::Url;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::cache::CacheStorage;
use super::error::OfflineError;
use super::fetch::{FetchError, Fetcher};
use super::http::{cache_key, Request, Response};
use super::manifest::ShellManifest;

/// Maximum concurrent asset downloads during installation.
const MAX_CONCURRENT_FETCHES: usize = 4;

/// Worker lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Created, not yet installed
    Parsed,
    Installing,
    /// Installed and waiting to be activated
    Installed,
    Activating,
    /// Intercepting fetches
    Activated,
    /// Installation failed; this worker will never activate
    Redundant,
}

impl WorkerState {
    pub fn is_waiting(&self) -> bool {
        *self == WorkerState::Installed
    }

    pub fn is_active(&self) -> bool {
        *self == WorkerState::Activated
    }
}

/// Where an intercepted response came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Network,
    Cache,
    /// Synthesized because neither network nor cache could answer
    Offline,
}

/// Decision for one intercepted request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not intercepted; the request goes to the network untouched
    Passthrough,
    Respond {
        response: Response,
        source: ResponseSource,
    },
}

/// How `start` brought the worker up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Startup {
    /// Reused a complete cache generation from an earlier run
    Restored,
    /// Downloaded the shell
    Installed,
}

/// A page that may be controlled by the worker.
pub struct ClientHandle {
    controller: watch::Receiver<Option<String>>,
}

impl ClientHandle {
    /// Cache generation controlling this page, if any
    pub fn controller(&self) -> Option<String> {
        self.controller.borrow().clone()
    }

    pub fn is_controlled(&self) -> bool {
        self.controller.borrow().is_some()
    }

    /// Wait until the controlling worker changes
    pub async fn controller_change(&mut self) -> Option<String> {
        if self.controller.changed().await.is_err() {
            return None;
        }
        self.controller.borrow_and_update().clone()
    }
}

/// Serves the application shell from a versioned cache.
///
/// Fetches are only intercepted once the worker is `Activated`; until then
/// `handle_fetch` returns `Passthrough`.
pub struct OfflineWorker<F, C> {
    manifest: ShellManifest,
    fetcher: F,
    caches: C,
    skip_waiting: bool,
    state: watch::Sender<WorkerState>,
    controller: watch::Sender<Option<String>>,
}

impl<F: Fetcher, C: CacheStorage> OfflineWorker<F, C> {
    pub fn new(manifest: ShellManifest, fetcher: F, caches: C) -> Self {
        let (state, _) = watch::channel(WorkerState::Parsed);
        let (controller, _) = watch::channel(None);
        Self {
            manifest,
            fetcher,
            caches,
            skip_waiting: true,
            state,
            controller,
        }
    }

    /// Whether a successful install activates right away (default: true)
    pub fn with_skip_waiting(mut self, skip_waiting: bool) -> Self {
        self.skip_waiting = skip_waiting;
        self
    }

    pub fn manifest(&self) -> &ShellManifest {
        &self.manifest
    }

    pub fn caches(&self) -> &C {
        &self.caches
    }

    pub fn state(&self) -> WorkerState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<WorkerState> {
        self.state.subscribe()
    }

    /// Register an open page. It becomes controlled when the worker claims clients.
    pub fn connect_client(&self) -> ClientHandle {
        ClientHandle {
            controller: self.controller.subscribe(),
        }
    }

    /// Move from one of `from` to `to`, atomically.
    fn transition(
        &self,
        from: &[WorkerState],
        to: WorkerState,
        action: &'static str,
    ) -> Result<(), OfflineError> {
        let mut result = Ok(());
        self.state.send_if_modified(|state| {
            if from.contains(state) {
                *state = to;
                true
            } else {
                result = Err(OfflineError::InvalidState {
                    action,
                    state: *state,
                });
                false
            }
        });
        result
    }

    fn set_state(&self, state: WorkerState) {
        self.state.send_replace(state);
    }

    /// Download every shell asset into the current cache generation.
    ///
    /// Nothing is stored unless all assets download with a 2xx status. On
    /// failure the worker becomes `Redundant` and the error is returned.
    pub async fn install(&self) -> Result<(), OfflineError> {
        self.transition(&[WorkerState::Parsed], WorkerState::Installing, "install")?;
        let name = self.manifest.cache_name();
        info!(cache = name, assets = self.manifest.assets().len(), "Installing offline shell");

        if let Err(e) = self.precache().await {
            warn!(cache = name, error = %e, "Shell installation failed");
            self.set_state(WorkerState::Redundant);
            return Err(e);
        }

        self.set_state(WorkerState::Installed);
        info!(cache = name, "Offline shell installed");

        if self.skip_waiting {
            self.activate().await?;
        }
        Ok(())
    }

    async fn precache(&self) -> Result<(), OfflineError> {
        let name = self.manifest.cache_name();
        let existed = self.caches.has(name).await?;

        let downloads: Vec<Result<(String, Response), OfflineError>> =
            stream::iter(self.manifest.assets().iter().cloned())
                .map(|url| self.download(url))
                .buffer_unordered(MAX_CONCURRENT_FETCHES)
                .collect()
                .await;
        let entries = downloads.into_iter().collect::<Result<Vec<_>, _>>()?;

        self.caches.open(name).await?;
        if let Err(e) = self.caches.put_all(name, entries).await {
            if !existed {
                if let Err(cleanup) = self.caches.delete(name).await {
                    warn!(cache = name, error = %cleanup, "Failed to discard partial cache");
                }
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Fetch one shell asset, requiring a 2xx status
    async fn download(&self, url: Url) -> Result<(String, Response), OfflineError> {
        let request = Request::get(url);
        let response = self
            .fetcher
            .fetch(&request)
            .await
            .map_err(|source| OfflineError::AssetFetch {
                url: request.url.to_string(),
                source,
            })?;
        if !response.is_ok() {
            return Err(OfflineError::AssetStatus {
                url: request.url.to_string(),
                status: response.status,
            });
        }
        debug!(url = %request.url, bytes = response.body.len(), "Precached");
        Ok((request.cache_key(), response))
    }

    /// Activate a worker left waiting by `with_skip_waiting(false)`.
    pub async fn skip_waiting(&self) -> Result<usize, OfflineError> {
        let state = self.state();
        if !state.is_waiting() {
            return Err(OfflineError::InvalidState {
                action: "skip_waiting",
                state,
            });
        }
        self.activate().await
    }

    /// Purge every other cache generation and take control of open pages.
    ///
    /// Returns the number of generations deleted. On a storage error the
    /// worker stays installed so activation can be retried.
    pub async fn activate(&self) -> Result<usize, OfflineError> {
        self.transition(&[WorkerState::Installed], WorkerState::Activating, "activate")?;

        let purged = match self.purge_stale_generations().await {
            Ok(purged) => purged,
            Err(e) => {
                warn!(error = %e, "Activation failed");
                self.set_state(WorkerState::Installed);
                return Err(e);
            }
        };

        self.claim();
        self.set_state(WorkerState::Activated);
        info!(cache = self.manifest.cache_name(), purged, "Offline shell active");
        Ok(purged)
    }

    async fn purge_stale_generations(&self) -> Result<usize, OfflineError> {
        let current = self.manifest.cache_name();
        let mut purged = 0;
        for name in self.caches.keys().await? {
            if name != current && self.caches.delete(&name).await? {
                debug!(cache = %name, "Purged stale cache generation");
                purged += 1;
            }
        }
        Ok(purged)
    }

    fn claim(&self) {
        self.controller
            .send_replace(Some(self.manifest.cache_name().to_string()));
    }

    /// Resume from a cache generation written by an earlier run.
    ///
    /// Activates without touching the network when the current generation
    /// already holds every shell asset. Returns `false` if it does not.
    pub async fn restore(&self) -> Result<bool, OfflineError> {
        let state = self.state();
        if state != WorkerState::Parsed {
            return Err(OfflineError::InvalidState {
                action: "restore",
                state,
            });
        }

        let name = self.manifest.cache_name();
        if !self.caches.has(name).await? {
            return Ok(false);
        }
        let stored: HashSet<String> = self.caches.entry_keys(name).await?.into_iter().collect();
        let missing = self
            .manifest
            .asset_keys()
            .into_iter()
            .filter(|key| !stored.contains(key))
            .count();
        if missing > 0 {
            debug!(cache = name, missing, "Cached shell incomplete, not restoring");
            return Ok(false);
        }

        self.transition(&[WorkerState::Parsed], WorkerState::Installed, "restore")?;
        self.activate().await?;
        Ok(true)
    }

    /// Restore a previous generation if possible, otherwise install.
    pub async fn start(&self) -> Result<Startup, OfflineError> {
        if self.restore().await? {
            return Ok(Startup::Restored);
        }
        self.install().await?;
        Ok(Startup::Installed)
    }

    /// Decide how to answer one request issued by a page.
    pub async fn handle_fetch(&self, request: &Request) -> FetchOutcome {
        if !self.state().is_active() {
            return FetchOutcome::Passthrough;
        }
        if !self.manifest.is_same_origin(&request.url) {
            debug!(url = %request.url, "Cross-origin request, not intercepted");
            return FetchOutcome::Passthrough;
        }
        if !request.is_get() {
            return FetchOutcome::Passthrough;
        }

        if request.is_navigation() {
            self.network_first(request).await
        } else {
            self.cache_first(request).await
        }
    }

    async fn network_first(&self, request: &Request) -> FetchOutcome {
        let root_key = self.manifest.root_document_key();
        match self.fetcher.fetch(request).await {
            Ok(fresh) => {
                self.store(&root_key, fresh.clone()).await;
                FetchOutcome::Respond {
                    response: fresh,
                    source: ResponseSource::Network,
                }
            }
            Err(e) => {
                warn!(url = %request.url, error = %e, "Navigation failed, falling back to cache");
                match self.lookup(&root_key).await {
                    Some(cached) => FetchOutcome::Respond {
                        response: cached,
                        source: ResponseSource::Cache,
                    },
                    None => FetchOutcome::Respond {
                        response: Response::offline(),
                        source: ResponseSource::Offline,
                    },
                }
            }
        }
    }

    async fn cache_first(&self, request: &Request) -> FetchOutcome {
        let key = request.cache_key();
        if let Some(cached) = self.lookup(&key).await {
            return FetchOutcome::Respond {
                response: cached,
                source: ResponseSource::Cache,
            };
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.store(&key, response.clone()).await;
                FetchOutcome::Respond {
                    response,
                    source: ResponseSource::Network,
                }
            }
            Err(e) => {
                warn!(url = %request.url, error = %e, "Asset not cached and network failed");
                FetchOutcome::Respond {
                    response: Response::unavailable(),
                    source: ResponseSource::Offline,
                }
            }
        }
    }

    /// Cache read; a storage error counts as a miss
    async fn lookup(&self, key: &str) -> Option<Response> {
        match self.caches.get(self.manifest.cache_name(), key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(key, error = %e, "Cache read failed");
                None
            }
        }
    }

    /// Cache write; failures only lose the copy
    async fn store(&self, key: &str, response: Response) {
        if let Err(e) = self.caches.put(self.manifest.cache_name(), key, response).await {
            warn!(key, error = %e, "Cache write failed");
        }
    }

    /// Answer a request the way the page sees it: intercepted when the
    /// worker responds, straight from the network otherwise.
    pub async fn fetch_through(
        &self,
        request: &Request,
    ) -> Result<(Response, Option<ResponseSource>), FetchError> {
        match self.handle_fetch(request).await {
            FetchOutcome::Respond { response, source } => Ok((response, Some(source))),
            FetchOutcome::Passthrough => Ok((self.fetcher.fetch(request).await?, None)),
        }
    }

    /// Whether `url` is stored in the current generation
    pub async fn is_cached(&self, url: &Url) -> bool {
        self.lookup(&cache_key(url)).await.is_some()
    }
}

impl<F, C> OfflineWorker<F, C>
where
    F: Fetcher + 'static,
    C: CacheStorage + 'static,
{
    /// Handle a fetch event as its own task.
    pub fn dispatch(self: &Arc<Self>, request: Request) -> JoinHandle<FetchOutcome> {
        let worker = Arc::clone(self);
        tokio::spawn(async move { worker.handle_fetch(&request).await })
    }
}
