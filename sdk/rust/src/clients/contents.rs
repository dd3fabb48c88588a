//! Contents resource client.

use std::sync::Arc;

use serde_json::Value;

use super::encode_path;
use crate::error::Result;
use crate::transport::HttpTransport;
use crate::types::{Contents, IntoRepoRef};

/// Client for reading files and directories.
pub struct ContentsClient {
    transport: Arc<HttpTransport>,
}

impl ContentsClient {
    /// Create a new contents client.
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Get a file or directory listing.
    ///
    /// # Arguments
    ///
    /// * `repo` - Repository to read from
    /// * `path` - Path inside the repository; empty for the root
    /// * `reference` - Branch, tag or SHA (default branch if `None`)
    ///
    /// # Errors
    ///
    /// Returns `Error::Access` with kind `NotFound` if the path does not exist.
    pub async fn get(
        &self,
        repo: impl IntoRepoRef,
        path: &str,
        reference: Option<&str>,
    ) -> Result<Contents> {
        let repo = repo.into_repo_ref()?;
        let command = format!(
            "{}/contents/{}",
            repo.path(),
            encode_path(path.trim_start_matches('/'))?
        );
        let query: Vec<(&str, &str)> = reference.map(|r| ("ref", r)).into_iter().collect();

        let value: Value = self.transport.get_json(&command, &query).await?;
        Ok(Contents::from_value(&self.transport, value))
    }
}
