//! Offline cache controller for the application shell.
//!
//! The `OfflineWorker` intercepts requests issued by the page and answers
//! them from a versioned cache generation:
//!
//! - navigations are network-first, falling back to the cached root document
//!   and finally to a synthetic `Offline` page
//! - same-origin assets are cache-first
//! - cross-origin and non-GET requests pass through untouched
//!
//! Network access (`Fetcher`) and storage (`CacheStorage`) are injected so the
//! lifecycle can run against reqwest and the disk, or against in-memory fakes.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod http;
pub mod manifest;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CacheError, CacheStorage, CachedData, DiskCacheStorage, MemoryCacheStorage};
pub use error::OfflineError;
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use http::{cache_key, Request, RequestMode, Response};
pub use manifest::{ShellManifest, CACHE_PREFIX, CORE_ASSETS, DEFAULT_CACHE_VERSION, ROOT_DOCUMENT};
pub use worker::{ClientHandle, FetchOutcome, OfflineWorker, ResponseSource, Startup, WorkerState};
