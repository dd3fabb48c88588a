//! Client configuration.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// Default base URL for the GitHub API.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Default `X-GitHub-Api-Version`.
pub const DEFAULT_API_VERSION: &str = "2022-11-28";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the bearer token.
pub const TOKEN_ENV_VAR: &str = "AUTH_TOKEN";

/// Immutable settings used to build the fixed headers of every request.
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) api_version: String,
    pub(crate) user_agent: String,
    pub(crate) token: String,
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
    pub(crate) wait_on_rate_limit: bool,
}

impl ClientConfig {
    /// Create a configuration with an explicit token.
    pub fn new(api_version: &str, user_agent: &str, token: &str) -> Self {
        Self {
            api_version: api_version.to_string(),
            user_agent: user_agent.to_string(),
            token: token.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            wait_on_rate_limit: true,
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `AUTH_TOKEN` - Bearer token (required)
    /// * `GITHUB_API_VERSION` - API version (optional, default: 2022-11-28)
    /// * `GITHUB_BASE_URL` - Base URL (optional, default: <https://api.github.com>)
    ///
    /// # Errors
    ///
    /// Returns an error if `AUTH_TOKEN` is not set.
    pub fn from_env(user_agent: &str) -> Result<Self> {
        Self::from_lookup(user_agent, |key| env::var(key).ok())
    }

    fn from_lookup<F>(user_agent: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup(TOKEN_ENV_VAR).ok_or_else(|| {
            Error::Configuration(format!("{TOKEN_ENV_VAR} environment variable not set"))
        })?;
        let api_version =
            lookup("GITHUB_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let mut config = Self::new(&api_version, user_agent, &token);
        if let Some(base_url) = lookup("GITHUB_BASE_URL") {
            config = config.with_base_url(&base_url);
        }
        Ok(config)
    }

    /// Point the client at another host (GitHub Enterprise, test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// When disabled, an exhausted rate limit surfaces as
    /// `Error::RateLimited` instead of sleeping and retrying.
    #[must_use]
    pub fn with_wait_on_rate_limit(mut self, wait: bool) -> Self {
        self.wait_on_rate_limit = wait;
        self
    }

    #[must_use]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn wait_on_rate_limit(&self) -> bool {
        self.wait_on_rate_limit
    }

    /// Headers attached to every request.
    pub(crate) fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Authorization".to_string(), format!("token {}", self.token)),
            ("X-GitHub-Api-Version".to_string(), self.api_version.clone()),
            ("User-Agent".to_string(), self.user_agent.clone()),
            (
                "Accept".to_string(),
                "application/vnd.github+json".to_string(),
            ),
        ]
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_version", &self.api_version)
            .field("user_agent", &self.user_agent)
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("wait_on_rate_limit", &self.wait_on_rate_limit)
            .finish()
    }
}
