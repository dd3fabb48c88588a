//! Repository contents.

use std::fmt;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::Value;

use super::{str_field, u64_field};
use crate::error::{Error, Result};
use crate::link::relative_path;
use crate::pagination::FromJson;
use crate::transport::HttpTransport;

/// A file, directory, symlink or submodule entry.
#[derive(Clone)]
pub struct Content {
    transport: Arc<HttpTransport>,
    fields: Value,
}

impl Content {
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
    pub fn name(&self) -> Option<&str> {
        str_field(&self.fields, "name")
    }

    #[must_use]
    pub fn path(&self) -> Option<&str> {
        str_field(&self.fields, "path")
    }

    #[must_use]
    pub fn sha(&self) -> Option<&str> {
        str_field(&self.fields, "sha")
    }

    #[must_use]
    pub fn size(&self) -> Option<u64> {
        u64_field(&self.fields, "size")
    }

    /// `file`, `dir`, `symlink` or `submodule`.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        str_field(&self.fields, "type")
    }

    #[must_use]
    pub fn download_url(&self) -> Option<&str> {
        str_field(&self.fields, "download_url")
    }

    /// Decode the inline file content.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` if there is no inline content, the encoding is
    /// not base64, or the payload is malformed.
    pub fn decoded_content(&self) -> Result<Vec<u8>> {
        let content = str_field(&self.fields, "content")
            .ok_or_else(|| Error::Decode("no inline content".to_string()))?;
        match str_field(&self.fields, "encoding") {
            Some("base64") | None => {}
            Some(other) => return Err(Error::Decode(format!("unsupported encoding: {other}"))),
        }
        let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
        BASE64
            .decode(compact)
            .map_err(|e| Error::Decode(e.to_string()))
    }

    /// Fetch this entry again through its API `url`. For a directory entry
    /// this yields the directory listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry has no `url` or the request fails.
    pub async fn fetch(&self) -> Result<Contents> {
        let url = str_field(&self.fields, "url").ok_or(Error::MissingField("url"))?;
        let value: Value = self
            .transport
            .get_json(relative_path(url), &[])
            .await?;
        Ok(Contents::from_value(&self.transport, value))
    }
}

impl FromJson for Content {
    fn from_json(transport: &Arc<HttpTransport>, value: Value) -> Self {
        Self::new(Arc::clone(transport), value)
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Content")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

/// Result of a contents lookup: one file or a directory listing.
#[derive(Debug, Clone)]
pub enum Contents {
    File(Content),
    Directory(Vec<Content>),
}

impl Contents {
    /// A JSON array is a directory listing, anything else a single entry.
    pub fn from_value(transport: &Arc<HttpTransport>, value: Value) -> Self {
        match value {
            Value::Array(entries) => Self::Directory(
                entries
                    .into_iter()
                    .map(|v| Content::from_json(transport, v))
                    .collect(),
            ),
            other => Self::File(Content::from_json(transport, other)),
        }
    }

    #[must_use]
    pub fn as_file(&self) -> Option<&Content> {
        match self {
            Self::File(content) => Some(content),
            Self::Directory(_) => None,
        }
    }

    #[must_use]
    pub fn as_directory(&self) -> Option<&[Content]> {
        match self {
            Self::File(_) => None,
            Self::Directory(entries) => Some(entries),
        }
    }
}
