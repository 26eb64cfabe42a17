use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::offline::http::Response;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse cache file: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid cache name: {0}")]
    InvalidName(String),

    #[error("Cache storage unavailable: {0}")]
    Unavailable(String),
}

/// Named caches of responses, keyed by request URL.
///
/// Implementations serialize their own writes; callers may share one storage
/// between concurrent tasks.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the named cache if it does not exist yet
    async fn open(&self, name: &str) -> Result<(), CacheError>;

    /// Names of all existing caches
    async fn keys(&self) -> Result<Vec<String>, CacheError>;

    async fn has(&self, name: &str) -> Result<bool, CacheError> {
        Ok(self.keys().await?.iter().any(|k| k == name))
    }

    /// Delete a whole cache. Returns whether it existed.
    async fn delete(&self, name: &str) -> Result<bool, CacheError>;

    async fn get(&self, name: &str, key: &str) -> Result<Option<Response>, CacheError>;

    /// Store `response` under `key`, creating the cache if needed
    async fn put(&self, name: &str, key: &str, response: Response) -> Result<(), CacheError>;

    /// Store several entries at once
    async fn put_all(&self, name: &str, entries: Vec<(String, Response)>) -> Result<(), CacheError> {
        for (key, response) in entries {
            self.put(name, &key, response).await?;
        }
        Ok(())
    }

    /// Request keys stored in the named cache
    async fn entry_keys(&self, name: &str) -> Result<Vec<String>, CacheError>;
}

#[async_trait]
impl<T: CacheStorage + ?Sized> CacheStorage for Arc<T> {
    async fn open(&self, name: &str) -> Result<(), CacheError> {
        (**self).open(name).await
    }

    async fn keys(&self) -> Result<Vec<String>, CacheError> {
        (**self).keys().await
    }

    async fn has(&self, name: &str) -> Result<bool, CacheError> {
        (**self).has(name).await
    }

    async fn delete(&self, name: &str) -> Result<bool, CacheError> {
        (**self).delete(name).await
    }

    async fn get(&self, name: &str, key: &str) -> Result<Option<Response>, CacheError> {
        (**self).get(name, key).await
    }

    async fn put(&self, name: &str, key: &str, response: Response) -> Result<(), CacheError> {
        (**self).put(name, key, response).await
    }

    async fn put_all(&self, name: &str, entries: Vec<(String, Response)>) -> Result<(), CacheError> {
        (**self).put_all(name, entries).await
    }

    async fn entry_keys(&self, name: &str) -> Result<Vec<String>, CacheError> {
        (**self).entry_keys(name).await
    }
}
