use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Fetch mode of an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    /// Top-level document load
    Navigate,
    SameOrigin,
    NoCors,
    #[default]
    Cors,
}

/// A request issued by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: Url,
    pub method: String,
    pub mode: RequestMode,
}

impl Request {
    /// Subresource GET request
    pub fn get(url: Url) -> Self {
        Self {
            url,
            method: "GET".to_string(),
            mode: RequestMode::default(),
        }
    }

    /// Top-level navigation to `url`
    pub fn navigate(url: Url) -> Self {
        Self {
            mode: RequestMode::Navigate,
            ..Self::get(url)
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// Key under which a response to this request is cached
    pub fn cache_key(&self) -> String {
        cache_key(&self.url)
    }
}

/// Cache key for `url`: the absolute URL without its fragment.
pub fn cache_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

/// A captured HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Body of the synthetic response returned to a navigation with no network
/// and no cached document
const OFFLINE_BODY: &str = "Offline";

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First value of header `name`, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Status in the 200-299 range
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Last-resort answer to a navigation while offline
    pub fn offline() -> Self {
        Self::new(200, OFFLINE_BODY).with_header("Content-Type", "text/plain")
    }

    /// Answer to an uncached asset request while offline
    pub fn unavailable() -> Self {
        Self::new(503, OFFLINE_BODY).with_header("Content-Type", "text/plain")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_cache_key_drops_fragment_keeps_query() {
        assert_eq!(
            cache_key(&url("https://example.com/app/app.js?v=2#top")),
            "https://example.com/app/app.js?v=2"
        );
    }

    #[test]
    fn test_request_kinds() {
        let nav = Request::navigate(url("https://example.com/"));
        assert!(nav.is_navigation());
        assert!(nav.is_get());

        let post = Request::get(url("https://example.com/api")).with_method("post");
        assert!(!post.is_navigation());
        assert!(!post.is_get());
    }

    #[test]
    fn test_offline_response() {
        let response = Response::offline();
        assert_eq!(response.status, 200);
        assert!(response.is_ok());
        assert_eq!(response.header("content-type"), Some("text/plain"));
        assert_eq!(response.text(), "Offline");
        assert!(!Response::unavailable().is_ok());
    }
}
