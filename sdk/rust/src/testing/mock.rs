//! In-memory HTTP backend for tests.
//!
//! `MockBackend` serves canned responses per URL and records every request,
//! so executor and pagination behaviour can be checked without sockets.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpBackend, HttpRequest, RawResponse};
use crate::link::Relation;
use crate::transport::HttpTransport;

/// A canned response, or a simulated network failure.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Status code to return
    pub status: u16,
    /// Response headers
    pub headers: Vec<(String, String)>,
    /// Raw body
    pub body: Vec<u8>,
    /// If set, the backend fails with `Error::Transport` instead
    pub transport_error: Option<String>,
}

impl MockResponse {
    /// A response with the given status and JSON body text.
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.as_bytes().to_vec(),
            transport_error: None,
        }
    }

    /// A 200 response carrying `items` as a JSON array.
    pub fn page(items: &[serde_json::Value]) -> Self {
        let body = serde_json::Value::Array(items.to_vec()).to_string();
        Self::json(200, &body)
    }

    /// A simulated network failure.
    pub fn transport_error(message: &str) -> Self {
        Self {
            status: 0,
            headers: Vec::new(),
            body: Vec::new(),
            transport_error: Some(message.to_string()),
        }
    }

    /// Add a header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a `link` header built from `(relation, path)` pairs.
    #[must_use]
    pub fn with_links(self, base_url: &str, links: &[(Relation, &str)]) -> Self {
        if links.is_empty() {
            return self;
        }
        let header = link_header(base_url, links);
        self.with_header("link", &header)
    }

    fn to_result(&self) -> Result<RawResponse> {
        if let Some(message) = &self.transport_error {
            return Err(Error::Transport(message.clone()));
        }
        Ok(RawResponse::new(
            self.status,
            self.headers.iter().map(|(k, v)| (k.as_str(), v.clone())),
            self.body.clone(),
        ))
    }
}

/// Render a GitHub-style Link header.
#[must_use]
pub fn link_header(base_url: &str, links: &[(Relation, &str)]) -> String {
    links
        .iter()
        .map(|(rel, path)| format!("<{}/{}>; rel=\"{}\"", base_url.trim_end_matches('/'), path, rel))
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Default)]
struct MockBackendInner {
    routes: HashMap<String, VecDeque<MockResponse>>,
    requests: Vec<HttpRequest>,
}

/// In-memory `HttpBackend`.
///
/// Responses are matched on the request URL (query parameters passed
/// separately are not part of the key). Responses queued for the same URL
/// are returned in FIFO order; the last one keeps being served once the
/// queue is down to it.
#[derive(Clone, Default)]
pub struct MockBackend {
    inner: Arc<Mutex<MockBackendInner>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `url`.
    pub fn push(&self, url: impl Into<String>, response: MockResponse) {
        self.lock()
            .routes
            .entry(url.into())
            .or_default()
            .push_back(response);
    }

    /// All requests seen so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.lock().requests.clone()
    }

    /// Number of requests made to `url`.
    pub fn request_count(&self, url: &str) -> usize {
        self.lock().requests.iter().filter(|r| r.url == url).count()
    }

    /// A transport pointed at `base_url` that sends through this backend.
    pub fn transport(&self, base_url: &str) -> Arc<HttpTransport> {
        let config = ClientConfig::new("2022-11-28", "ghclient-mock", "mock-token")
            .with_base_url(base_url);
        Arc::new(HttpTransport::with_backend(config, Arc::new(self.clone())))
    }

    /// Forget recorded requests, keeping the routes.
    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockBackendInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl HttpBackend for MockBackend {
    async fn get(&self, request: HttpRequest) -> Result<RawResponse> {
        let mut inner = self.lock();
        inner.requests.push(request.clone());

        let queue = inner.routes.get_mut(&request.url).ok_or_else(|| {
            Error::Transport(format!("no mock response registered for GET {}", request.url))
        })?;

        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };

        response
            .ok_or_else(|| {
                Error::Transport(format!("no mock response registered for GET {}", request.url))
            })?
            .to_result()
    }
}
