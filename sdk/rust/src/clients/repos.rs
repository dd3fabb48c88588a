//! Repositories resource client.

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::pagination::PaginatedList;
use crate::transport::HttpTransport;
use crate::types::{RepoRef, Repository};

/// Client for repository lookups and listings.
pub struct ReposClient {
    transport: Arc<HttpTransport>,
}

impl ReposClient {
    /// Create a new repos client.
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Get repository information.
    ///
    /// # Errors
    ///
    /// Returns `Error::Access` with kind `NotFound` if the repository does
    /// not exist or is not visible to the token.
    pub async fn get(&self, owner: &str, repo: &str) -> Result<Repository> {
        self.fetch(&RepoRef::new(owner, repo)).await
    }

    /// Get a repository by its `owner/name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRepository` for malformed names, otherwise as
    /// [`get`](Self::get).
    pub async fn get_by_name(&self, full_name: &str) -> Result<Repository> {
        self.fetch(&RepoRef::parse(full_name)?).await
    }

    async fn fetch(&self, repo: &RepoRef) -> Result<Repository> {
        let fields: Value = self.transport.get_json(&repo.path(), &[]).await?;
        Ok(Repository::new(Arc::clone(&self.transport), fields))
    }

    /// List repositories the authenticated user can access.
    ///
    /// # Arguments
    ///
    /// * `filters` - e.g. `visibility`, `affiliation`, `sort`, `per_page`
    ///
    /// # Errors
    ///
    /// Returns `Error::Access` (401/403) if the token is missing or lacks
    /// permission.
    pub async fn list_for_authenticated_user(
        &self,
        filters: &[(&str, &str)],
    ) -> Result<PaginatedList<Repository>> {
        PaginatedList::fetch(Arc::clone(&self.transport), "user/repos", filters).await
    }

    /// List all public repositories in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the first page cannot be fetched.
    pub async fn list_public(&self, filters: &[(&str, &str)]) -> Result<PaginatedList<Repository>> {
        PaginatedList::fetch(Arc::clone(&self.transport), "repositories", filters).await
    }
}
