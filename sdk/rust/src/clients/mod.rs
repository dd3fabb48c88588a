//! Resource clients.

use url::Url;

use crate::config::DEFAULT_BASE_URL;
use crate::error::{Error, Result};

pub mod commits;
pub mod contents;
pub mod repos;
pub mod users;

// Re-exports
pub use commits::CommitsClient;
pub use contents::ContentsClient;
pub use repos::ReposClient;
pub use users::UsersClient;

/// Percent-encode each `/`-separated segment of a caller-supplied path so
/// `?`, `#`, `%` and spaces stay inside the path.
pub(crate) fn encode_path(path: &str) -> Result<String> {
    let mut url = Url::parse(DEFAULT_BASE_URL)?;
    url.path_segments_mut()
        .map_err(|()| Error::Configuration(format!("cannot build paths on {DEFAULT_BASE_URL}")))?
        .clear()
        .extend(path.split('/'));
    Ok(url.path().trim_start_matches('/').to_string())
}
