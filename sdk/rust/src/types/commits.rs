//! Commit handle.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{object_field, str_field, User};
use crate::pagination::FromJson;
use crate::transport::HttpTransport;

/// A commit as returned by the commits API.
///
/// `author` and `committer` are the linked GitHub accounts, which may be
/// absent for commits made with unknown e-mail addresses; the git-level
/// identity lives under `commit`.
#[derive(Clone)]
pub struct Commit {
    transport: Arc<HttpTransport>,
    fields: Value,
}

impl Commit {
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
    pub fn sha(&self) -> Option<&str> {
        str_field(&self.fields, "sha")
    }

    #[must_use]
    pub fn html_url(&self) -> Option<&str> {
        str_field(&self.fields, "html_url")
    }

    /// Commit message from the git data.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.fields
            .get("commit")
            .and_then(|c| str_field(c, "message"))
    }

    #[must_use]
    pub fn author(&self) -> Option<User> {
        self.user("author")
    }

    #[must_use]
    pub fn committer(&self) -> Option<User> {
        self.user("committer")
    }

    fn user(&self, name: &str) -> Option<User> {
        object_field(&self.fields, name).map(|v| User::new(Arc::clone(&self.transport), v))
    }
}

impl FromJson for Commit {
    fn from_json(transport: &Arc<HttpTransport>, value: Value) -> Self {
        Self::new(Arc::clone(transport), value)
    }
}

impl fmt::Debug for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commit")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
