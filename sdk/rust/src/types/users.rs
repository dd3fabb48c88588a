//! User handle.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::{str_field, u64_field, Repository};
use crate::clients::UsersClient;
use crate::error::{Error, Result};
use crate::pagination::{FromJson, PaginatedList};
use crate::transport::HttpTransport;

/// A GitHub user or organization account.
#[derive(Clone)]
pub struct User {
    transport: Arc<HttpTransport>,
    fields: Value,
}

impl User {
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
    pub fn login(&self) -> Option<&str> {
        str_field(&self.fields, "login")
    }

    #[must_use]
    pub fn id(&self) -> Option<u64> {
        u64_field(&self.fields, "id")
    }

    /// Display name; often absent on nested user objects.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        str_field(&self.fields, "name")
    }

    /// `User` or `Organization`.
    #[must_use]
    pub fn account_type(&self) -> Option<&str> {
        str_field(&self.fields, "type")
    }

    #[must_use]
    pub fn html_url(&self) -> Option<&str> {
        str_field(&self.fields, "html_url")
    }

    /// List this user's public repositories.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle has no `login` or the first page
    /// cannot be fetched.
    pub async fn repositories(&self, filters: &[(&str, &str)]) -> Result<PaginatedList<Repository>> {
        let login = self.login().ok_or(Error::MissingField("login"))?;
        UsersClient::new(Arc::clone(&self.transport))
            .list_repositories(login, filters)
            .await
    }
}

impl FromJson for User {
    fn from_json(transport: &Arc<HttpTransport>, value: Value) -> Self {
        Self::new(Arc::clone(transport), value)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}
