use thiserror::Error;

use super::cache::CacheError;
use super::fetch::FetchError;
use super::worker::WorkerState;

#[derive(Error, Debug)]
pub enum OfflineError {
    #[error("Failed to fetch shell asset {url}: {source}")]
    AssetFetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Shell asset {url} returned status {status}")]
    AssetStatus { url: String, status: u16 },

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Invalid shell URL: {0}")]
    InvalidUrl(String),

    #[error("Cannot {action} while worker is {state:?}")]
    InvalidState {
        action: &'static str,
        state: WorkerState,
    },
}
