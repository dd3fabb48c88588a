//! Repository handle.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{bool_field, object_field, str_field, u64_field, Commit, Contents, User};
use crate::clients::{CommitsClient, ContentsClient};
use crate::error::{Error, Result};
use crate::pagination::{FromJson, PaginatedList};
use crate::transport::HttpTransport;

/// A GitHub repository.
#[derive(Clone)]
pub struct Repository {
    transport: Arc<HttpTransport>,
    fields: Value,
}

impl Repository {
    pub fn new(transport: Arc<HttpTransport>, fields: Value) -> Self {
        Self { transport, fields }
    }

    /// Raw access to any field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn fields(&self) -> &Value {
        &self.fields
    }

    #[must_use]
    pub fn id(&self) -> Option<u64> {
        u64_field(&self.fields, "id")
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        str_field(&self.fields, "name")
    }

    /// `owner/name`
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        str_field(&self.fields, "full_name")
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        str_field(&self.fields, "description")
    }

    #[must_use]
    pub fn default_branch(&self) -> Option<&str> {
        str_field(&self.fields, "default_branch")
    }

    #[must_use]
    pub fn html_url(&self) -> Option<&str> {
        str_field(&self.fields, "html_url")
    }

    #[must_use]
    pub fn is_private(&self) -> Option<bool> {
        bool_field(&self.fields, "private")
    }

    #[must_use]
    pub fn is_fork(&self) -> Option<bool> {
        bool_field(&self.fields, "fork")
    }

    #[must_use]
    pub fn stargazers_count(&self) -> Option<u64> {
        u64_field(&self.fields, "stargazers_count")
    }

    /// The owning user or organization.
    #[must_use]
    pub fn owner(&self) -> Option<User> {
        object_field(&self.fields, "owner").map(|v| User::new(Arc::clone(&self.transport), v))
    }

    /// The repository this one was forked from.
    #[must_use]
    pub fn parent(&self) -> Option<Repository> {
        self.nested("parent")
    }

    /// The root of the fork network.
    #[must_use]
    pub fn source(&self) -> Option<Repository> {
        self.nested("source")
    }

    #[must_use]
    pub fn template_repository(&self) -> Option<Repository> {
        self.nested("template_repository")
    }

    fn nested(&self, name: &str) -> Option<Repository> {
        object_field(&self.fields, name).map(|v| Self::new(Arc::clone(&self.transport), v))
    }

    /// Owner and name, from `full_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `full_name` is missing or malformed.
    pub fn repo_ref(&self) -> Result<RepoRef> {
        let full_name = self.full_name().ok_or(Error::MissingField("full_name"))?;
        RepoRef::parse(full_name)
    }

    /// Fetch one commit of this repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit is not found.
    pub async fn commit(&self, reference: &str) -> Result<Commit> {
        CommitsClient::new(Arc::clone(&self.transport))
            .get(self, reference)
            .await
    }

    /// List commits of this repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the first page cannot be fetched.
    pub async fn commits(&self, filters: &[(&str, &str)]) -> Result<PaginatedList<Commit>> {
        CommitsClient::new(Arc::clone(&self.transport))
            .list(self, filters)
            .await
    }

    /// Fetch a file or directory listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist.
    pub async fn contents(&self, path: &str, reference: Option<&str>) -> Result<Contents> {
        ContentsClient::new(Arc::clone(&self.transport))
            .get(self, path, reference)
            .await
    }
}

impl FromJson for Repository {
    fn from_json(transport: &Arc<HttpTransport>, value: Value) -> Self {
        Self::new(Arc::clone(transport), value)
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Owner and name identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    /// Parse `owner/name`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidRepository` unless the input is exactly two
    /// non-empty segments.
    pub fn parse(full_name: &str) -> Result<Self> {
        match full_name.split('/').collect::<Vec<_>>().as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self::new(owner, name)),
            _ => Err(Error::InvalidRepository(full_name.to_string())),
        }
    }

    /// `repos/{owner}/{name}`
    #[must_use]
    pub fn path(&self) -> String {
        format!("repos/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Anything that names a repository: `"owner/name"`, `("owner", "name")`,
/// a [`RepoRef`] or a fetched [`Repository`].
pub trait IntoRepoRef {
    /// # Errors
    ///
    /// Returns an error if the value does not name a repository.
    fn into_repo_ref(self) -> Result<RepoRef>;
}

impl IntoRepoRef for &str {
    fn into_repo_ref(self) -> Result<RepoRef> {
        RepoRef::parse(self)
    }
}

impl IntoRepoRef for &String {
    fn into_repo_ref(self) -> Result<RepoRef> {
        RepoRef::parse(self)
    }
}

impl IntoRepoRef for (&str, &str) {
    fn into_repo_ref(self) -> Result<RepoRef> {
        RepoRef::parse(&format!("{}/{}", self.0, self.1))
    }
}

impl IntoRepoRef for RepoRef {
    fn into_repo_ref(self) -> Result<RepoRef> {
        Ok(self)
    }
}

impl IntoRepoRef for &RepoRef {
    fn into_repo_ref(self) -> Result<RepoRef> {
        Ok(self.clone())
    }
}

impl IntoRepoRef for &Repository {
    fn into_repo_ref(self) -> Result<RepoRef> {
        self.repo_ref()
    }
}
