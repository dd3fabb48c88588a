//! Commits resource client.

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::pagination::PaginatedList;
use crate::transport::HttpTransport;
use crate::types::{Commit, IntoRepoRef};

/// Client for commit lookups and history listings.
pub struct CommitsClient {
    transport: Arc<HttpTransport>,
}

impl CommitsClient {
    /// Create a new commits client.
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Get a single commit.
    ///
    /// # Arguments
    ///
    /// * `repo` - `"owner/name"`, `("owner", "name")`, a `RepoRef` or a `&Repository`
    /// * `reference` - SHA, branch or tag name
    ///
    /// # Errors
    ///
    /// Returns `Error::Access` with kind `NotFound` (or `ValidationFailed` for
    /// unknown refs).
    pub async fn get(&self, repo: impl IntoRepoRef, reference: &str) -> Result<Commit> {
        let repo = repo.into_repo_ref()?;
        let fields: Value = self
            .transport
            .get_json(&format!("{}/commits/{reference}", repo.path()), &[])
            .await?;
        Ok(Commit::new(Arc::clone(&self.transport), fields))
    }

    /// List commits, newest first.
    ///
    /// # Arguments
    ///
    /// * `filters` - e.g. `sha`, `path`, `author`, `since`, `until`, `per_page`
    ///
    /// # Errors
    ///
    /// Returns an error if the first page cannot be fetched.
    pub async fn list(
        &self,
        repo: impl IntoRepoRef,
        filters: &[(&str, &str)],
    ) -> Result<PaginatedList<Commit>> {
        let repo = repo.into_repo_ref()?;
        PaginatedList::fetch(
            Arc::clone(&self.transport),
            &format!("{}/commits", repo.path()),
            filters,
        )
        .await
    }
}
