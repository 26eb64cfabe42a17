//! Network access for the offline worker.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use thiserror::Error;
use tracing::debug;

use super::http::{Request, Response};

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid request method: {0}")]
    InvalidMethod(String),

    #[error("Network unreachable: {0}")]
    Unreachable(String),
}

/// Something that can perform a request over the network.
///
/// `Err` means the network failed. HTTP error statuses are returned as
/// ordinary responses.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        (**self).fetch(request).await
    }
}

/// Fetcher backed by reqwest.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        let method = Method::from_bytes(request.method.to_ascii_uppercase().as_bytes())
            .map_err(|_| FetchError::InvalidMethod(request.method.clone()))?;

        let response = self
            .client
            .request(method, request.url.clone())
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        debug!(url = %request.url, status, bytes = body.len(), "Fetched");
        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Url;

    #[tokio::test]
    async fn test_http_fetcher_reports_connection_failure() {
        let fetcher = HttpFetcher::new().unwrap();
        // Nothing listens on the discard port
        let request = Request::get(Url::parse("http://127.0.0.1:9/").unwrap());
        let result = fetcher.fetch(&request).await;
        assert!(matches!(result, Err(FetchError::Network(_))));
    }

    #[tokio::test]
    async fn test_http_fetcher_rejects_bad_method() {
        let fetcher = HttpFetcher::new().unwrap();
        let request =
            Request::get(Url::parse("http://127.0.0.1:9/").unwrap()).with_method("BAD METHOD");
        let result = fetcher.fetch(&request).await;
        assert!(matches!(result, Err(FetchError::InvalidMethod(_))));
    }
}
