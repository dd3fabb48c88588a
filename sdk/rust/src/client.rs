//! Main client.
//!
//! Owns the shared transport and hands out one resource client per API area.

use std::sync::Arc;

use crate::clients::{CommitsClient, ContentsClient, ReposClient, UsersClient};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::HttpBackend;
use crate::transport::HttpTransport;

/// Main client for the GitHub REST API.
///
/// # Example
///
/// ```rust,ignore
/// use ghclient::{ClientConfig, GitHubClient};
///
/// let client = GitHubClient::new(ClientConfig::new("2022-11-28", "my-tool", &token))?;
///
/// let repo = client.repos().get("rust-lang", "rust").await?;
/// let mut commits = repo.commits(&[("per_page", "100")]).await?;
/// while let Some(commit) = commits.next_item().await? {
///     println!("{}", commit.sha().unwrap_or_default());
/// }
/// ```
pub struct GitHubClient {
    transport: Arc<HttpTransport>,
    repos: ReposClient,
    users: UsersClient,
    commits: CommitsClient,
    contents: ContentsClient,
}

impl GitHubClient {
    /// Create a client that talks HTTP via reqwest.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_transport(Arc::new(HttpTransport::new(config)?)))
    }

    /// Create a client over a custom backend (a proxy, a recorder, or
    /// [`MockBackend`](crate::testing::MockBackend) in tests).
    pub fn with_backend(config: ClientConfig, backend: Arc<dyn HttpBackend>) -> Self {
        Self::from_transport(Arc::new(HttpTransport::with_backend(config, backend)))
    }

    /// Create a client from environment variables.
    ///
    /// Reads:
    /// - `AUTH_TOKEN`: Personal access token (required)
    /// - `GITHUB_API_VERSION`: API version header (default: 2022-11-28)
    /// - `GITHUB_BASE_URL`: API root (default: <https://api.github.com>)
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if the token is not set.
    pub fn from_env(user_agent: &str) -> Result<Self> {
        Self::new(ClientConfig::from_env(user_agent)?)
    }

    fn from_transport(transport: Arc<HttpTransport>) -> Self {
        Self {
            repos: ReposClient::new(Arc::clone(&transport)),
            users: UsersClient::new(Arc::clone(&transport)),
            commits: CommitsClient::new(Arc::clone(&transport)),
            contents: ContentsClient::new(Arc::clone(&transport)),
            transport,
        }
    }

    /// Get the underlying HTTP transport (for advanced use cases).
    #[must_use]
    pub fn transport(&self) -> &Arc<HttpTransport> {
        &self.transport
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    /// Get the repos client.
    #[must_use]
    pub fn repos(&self) -> &ReposClient {
        &self.repos
    }

    /// Get the users client.
    #[must_use]
    pub fn users(&self) -> &UsersClient {
        &self.users
    }

    /// Get the commits client.
    #[must_use]
    pub fn commits(&self) -> &CommitsClient {
        &self.commits
    }

    /// Get the contents client.
    #[must_use]
    pub fn contents(&self) -> &ContentsClient {
        &self.contents
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::DEFAULT_BASE_URL;
    use crate::testing::{MockBackend, MockResponse};

    #[test]
    fn test_client_creation() {
        let client = GitHubClient::new(ClientConfig::new("2022-11-28", "tests", "t0ken"))
            .expect("Client creation should succeed");

        assert_eq!(client.transport().base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.config().api_version(), "2022-11-28");
    }

    #[test]
    fn test_client_with_custom_base_url_and_timeout() {
        let config = ClientConfig::new("2022-11-28", "tests", "t0ken")
            .with_base_url("https://ghe.example.com/api/v3/")
            .with_timeout(Duration::from_secs(60));
        let client = GitHubClient::new(config).expect("Client creation should succeed");

        assert_eq!(client.transport().base_url(), "https://ghe.example.com/api/v3");
        assert_eq!(client.config().timeout(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_resource_clients_share_transport() {
        let backend = MockBackend::new();
        backend.push(
            "https://api.example.com/repos/acme/widget",
            MockResponse::json(200, r#"{"full_name": "acme/widget"}"#),
        );
        backend.push(
            "https://api.example.com/users/acme",
            MockResponse::json(200, r#"{"login": "acme"}"#),
        );
        let config = ClientConfig::new("2022-11-28", "tests", "t0ken")
            .with_base_url("https://api.example.com");
        let client = GitHubClient::with_backend(config, Arc::new(backend.clone()));

        client.repos().get("acme", "widget").await.expect("repo");
        client.users().get("acme").await.expect("user");

        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests
            .iter()
            .all(|r| r.header("Authorization") == Some("token t0ken")));
    }
}
