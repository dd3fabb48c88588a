//! Users resource client.

use std::sync::Arc;

use serde_json::Value;

use super::encode_path;
use crate::error::Result;
use crate::pagination::PaginatedList;
use crate::transport::HttpTransport;
use crate::types::{Repository, User};

/// Client for user lookups.
pub struct UsersClient {
    transport: Arc<HttpTransport>,
}

impl UsersClient {
    /// Create a new users client.
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Get a user by login.
    ///
    /// # Errors
    ///
    /// Returns `Error::Access` with kind `NotFound` for unknown logins.
    pub async fn get(&self, login: &str) -> Result<User> {
        let fields: Value = self
            .transport
            .get_json(&format!("users/{}", encode_path(login)?), &[])
            .await?;
        Ok(User::new(Arc::clone(&self.transport), fields))
    }

    /// Get the user the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns `Error::Access` (401) without a valid token.
    pub async fn authenticated(&self) -> Result<User> {
        let fields: Value = self.transport.get_json("user", &[]).await?;
        Ok(User::new(Arc::clone(&self.transport), fields))
    }

    /// List a user's public repositories.
    ///
    /// # Errors
    ///
    /// Returns an error if the first page cannot be fetched.
    pub async fn list_repositories(
        &self,
        login: &str,
        filters: &[(&str, &str)],
    ) -> Result<PaginatedList<Repository>> {
        PaginatedList::fetch(
            Arc::clone(&self.transport),
            &format!("users/{}/repos", encode_path(login)?),
            filters,
        )
        .await
    }
}
