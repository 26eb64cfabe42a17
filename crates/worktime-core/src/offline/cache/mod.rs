//! Versioned response caches.
//!
//! A `CacheStorage` holds named caches (generations), each mapping a request
//! key to a captured `Response`. Two backends are provided:
//!
//! - `MemoryCacheStorage`: process-local, used in tests and for ephemeral runs
//! - `DiskCacheStorage`: one JSON file per generation, survives restarts

pub mod disk;
pub mod memory;
pub mod storage;

pub use disk::{CachedData, DiskCacheStorage};
pub use memory::MemoryCacheStorage;
pub use storage::{CacheError, CacheStorage};
