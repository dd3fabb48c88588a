//! Request executor.
//!
//! Issues GETs against the configured base URL with the fixed GitHub headers,
//! waits out exhausted rate limits, and turns fatal status codes into typed
//! errors before anyone looks at the body.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{AccessKind, Error, Result};
use crate::http::{HttpBackend, HttpRequest, RawResponse, ReqwestBackend};
use crate::link::relative_path;
use crate::pagination::Page;
use crate::rate_limit::{check_rate_limit, RequestOutcome};

/// Executes commands against the GitHub API.
///
/// Holds no mutable state, so one instance is shared (via `Arc`) by every
/// resource client, resource handle and paginated list.
pub struct HttpTransport {
    config: ClientConfig,
    headers: Vec<(String, String)>,
    backend: Arc<dyn HttpBackend>,
}

impl HttpTransport {
    /// Create a transport backed by reqwest.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let backend = ReqwestBackend::with_timeout(config.timeout())?;
        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Create a transport over any backend.
    pub fn with_backend(config: ClientConfig, backend: Arc<dyn HttpBackend>) -> Self {
        let headers = config.headers();
        Self {
            config,
            headers,
            backend,
        }
    }

    /// Execute a command, retrying while the rate limit is exhausted.
    ///
    /// # Arguments
    ///
    /// * `path` - Server-relative command, e.g. `repos/rust-lang/rust`
    /// * `query` - Query parameters used as request filters
    ///
    /// # Errors
    ///
    /// * `Error::Access` for 401/403/404/422, carrying the command path
    /// * `Error::Transport` on network failures
    /// * `Error::RateLimited` if the budget is exhausted and waiting is disabled
    pub async fn execute(&self, path: &str, query: &[(&str, &str)]) -> Result<RawResponse> {
        let command = path.trim_start_matches('/');
        let request = HttpRequest {
            url: self.url_for(command),
            headers: self.headers.clone(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        };

        loop {
            let response = self.backend.get(request.clone()).await?;
            tracing::debug!(command, status = response.status, "GET");

            match check_rate_limit(response, Utc::now()) {
                RequestOutcome::Ready(response) => return classify(command, response),
                RequestOutcome::RetryAfter(wait) => {
                    if !self.config.wait_on_rate_limit() {
                        return Err(Error::RateLimited {
                            wait,
                            command: command.to_string(),
                        });
                    }
                    tracing::warn!(
                        command,
                        wait_secs = wait.as_secs(),
                        "Rate limit exhausted, waiting before retry"
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Join a command onto the base URL. Commands taken from Link headers
    /// still carry the base URL's own path (`api/v3` on Enterprise hosts),
    /// which is dropped here.
    fn url_for(&self, command: &str) -> String {
        let base = self.config.base_url();
        let base_path = relative_path(base);
        let command = match command.strip_prefix(base_path) {
            Some(rest) if !base_path.is_empty() && (rest.is_empty() || rest.starts_with('/')) => {
                rest.trim_start_matches('/')
            }
            _ => command,
        };
        format!("{base}/{command}")
    }

    /// Execute a command and deserialize the JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute), plus `Error::Serialization` for
    /// bodies that do not decode as `T`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        self.execute(path, query).await?.json()
    }

    /// Execute a listing command and return its page of items and links.
    ///
    /// # Errors
    ///
    /// Same as [`get_json`](Self::get_json).
    pub async fn get_page(&self, path: &str, query: &[(&str, &str)]) -> Result<Page> {
        let response = self.execute(path, query).await?;
        Page::from_response(&response)
    }

    /// Get the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }
}

fn classify(command: &str, response: RawResponse) -> Result<RawResponse> {
    match AccessKind::from_status(response.status) {
        Some(kind) => {
            tracing::debug!(command, status = response.status, "Access error");
            Err(Error::Access {
                kind,
                command: command.to_string(),
            })
        }
        None => Ok(response),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::Value;

    use super::*;
    use crate::link::Relation;
    use crate::testing::{MockBackend, MockResponse};

    fn transport(backend: &MockBackend) -> HttpTransport {
        let config = ClientConfig::new("2022-11-28", "ghclient-tests", "secret")
            .with_base_url("https://api.example.com");
        HttpTransport::with_backend(config, Arc::new(backend.clone()))
    }

    #[tokio::test]
    async fn test_execute_attaches_fixed_headers() {
        let backend = MockBackend::new();
        backend.push(
            "https://api.example.com/user/repos",
            MockResponse::json(200, "[]"),
        );
        let transport = transport(&backend);

        transport
            .execute("user/repos", &[("visibility", "public")])
            .await
            .expect("request should succeed");

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.header("Authorization"), Some("token secret"));
        assert_eq!(request.header("X-GitHub-Api-Version"), Some("2022-11-28"));
        assert_eq!(request.header("User-Agent"), Some("ghclient-tests"));
        assert_eq!(request.header("Accept"), Some("application/vnd.github+json"));
        assert_eq!(
            request.query,
            vec![("visibility".to_string(), "public".to_string())]
        );
    }

    #[tokio::test]
    async fn test_leading_slash_is_normalised() {
        let backend = MockBackend::new();
        backend.push(
            "https://api.example.com/repos/acme/widget/commits",
            MockResponse::json(200, "[]"),
        );
        let transport = transport(&backend);

        transport
            .execute("/repos/acme/widget/commits", &[])
            .await
            .expect("request should succeed");
    }

    #[tokio::test]
    async fn test_enterprise_base_path_is_not_doubled() {
        let backend = MockBackend::new();
        backend.push(
            "https://ghe.example.com/api/v3/user/repos?page=2",
            MockResponse::json(200, "[]"),
        );
        backend.push(
            "https://ghe.example.com/api/v3/api/v3x",
            MockResponse::json(200, "[]"),
        );
        let transport = backend.transport("https://ghe.example.com/api/v3");

        transport
            .execute("api/v3/user/repos?page=2", &[])
            .await
            .expect("link path with base prefix");
        transport
            .execute("api/v3x", &[])
            .await
            .expect("unrelated prefix is kept");
    }

    #[tokio::test]
    async fn test_not_found_carries_command_and_skips_body() {
        let backend = MockBackend::new();
        backend.push(
            "https://api.example.com/repos/acme/widget",
            MockResponse::json(404, "this is not json"),
        );
        let transport = transport(&backend);

        let err = transport
            .get_json::<Value>("repos/acme/widget", &[])
            .await
            .unwrap_err();

        assert_eq!(err.access_kind(), Some(AccessKind::NotFound));
        assert_eq!(err.command(), Some("repos/acme/widget"));
    }

    #[tokio::test]
    async fn test_each_access_status_is_classified() {
        for (status, kind) in [
            (401, AccessKind::AuthenticationRequired),
            (403, AccessKind::Forbidden),
            (404, AccessKind::NotFound),
            (422, AccessKind::ValidationFailed),
        ] {
            let backend = MockBackend::new();
            backend.push(
                "https://api.example.com/user",
                MockResponse::json(status, "{}"),
            );
            let err = transport(&backend).execute("user", &[]).await.unwrap_err();
            assert_eq!(err.access_kind(), Some(kind));
        }
    }

    #[tokio::test]
    async fn test_server_errors_are_not_access_errors() {
        let backend = MockBackend::new();
        backend.push(
            "https://api.example.com/user",
            MockResponse::json(502, "bad gateway"),
        );

        let response = transport(&backend)
            .execute("user", &[])
            .await
            .expect("5xx is passed through");
        assert_eq!(response.status, 502);
    }

    #[tokio::test]
    async fn test_transport_failure_is_surfaced() {
        let backend = MockBackend::new();
        backend.push(
            "https://api.example.com/user",
            MockResponse::transport_error("connection reset by peer"),
        );

        let err = transport(&backend).execute("user", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_waits_then_retries_identical_request() {
        let backend = MockBackend::new();
        let reset = Utc::now().timestamp() + 5;
        backend.push(
            "https://api.example.com/user/repos",
            MockResponse::json(403, "{}")
                .with_header("x-ratelimit-remaining", "0")
                .with_header("x-ratelimit-reset", &reset.to_string()),
        );
        backend.push(
            "https://api.example.com/user/repos",
            MockResponse::json(200, "[]").with_header("x-ratelimit-remaining", "4999"),
        );
        let transport = transport(&backend);

        let started = tokio::time::Instant::now();
        transport
            .execute("user/repos", &[("page", "2")])
            .await
            .expect("retry should succeed");
        let waited = started.elapsed();

        assert!(waited >= Duration::from_secs(4), "waited {waited:?}");
        assert!(waited <= Duration::from_secs(6), "waited {waited:?}");

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], requests[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_retries_every_exhaustion_event() {
        let backend = MockBackend::new();
        for _ in 0..3 {
            backend.push(
                "https://api.example.com/user",
                MockResponse::json(200, "{}")
                    .with_header("x-ratelimit-remaining", "0")
                    .with_header("retry-after", "1"),
            );
        }
        backend.push("https://api.example.com/user", MockResponse::json(200, "{}"));

        transport(&backend)
            .execute("user", &[])
            .await
            .expect("eventually succeeds");
        assert_eq!(backend.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_rate_limit_without_waiting() {
        let backend = MockBackend::new();
        backend.push(
            "https://api.example.com/user",
            MockResponse::json(403, "{}")
                .with_header("x-ratelimit-remaining", "0")
                .with_header("retry-after", "42"),
        );
        let config = ClientConfig::new("2022-11-28", "ghclient-tests", "secret")
            .with_base_url("https://api.example.com")
            .with_wait_on_rate_limit(false);
        let transport = HttpTransport::with_backend(config, Arc::new(backend.clone()));

        let err = transport.execute("user", &[]).await.unwrap_err();
        assert_eq!(err.retry_after(), Some(Duration::from_secs(42)));
        assert_eq!(err.command(), Some("user"));
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_get_page_reads_items_and_links() {
        let backend = MockBackend::new();
        backend.push(
            "https://api.example.com/user/repos",
            MockResponse::json(200, r#"[{"id": 1}, {"id": 2}]"#).with_header(
                "Link",
                r#"<https://api.example.com/user/repos?page=2>; rel="next""#,
            ),
        );

        let page = transport(&backend)
            .get_page("user/repos", &[])
            .await
            .expect("page");
        assert_eq!(page.len(), 2);
        assert_eq!(page.link(Relation::Next), Some("user/repos?page=2"));
    }
}
