//! GitHub REST API client for Rust
//!
//! An async client over the GitHub v3 REST API: typed handles for
//! repositories, users, commits and file contents, with lazily fetched,
//! bidirectional pagination that follows the server's `Link` headers and
//! waits out rate limits on its own.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ghclient::{ClientConfig, GitHubClient};
//!
//! let client = GitHubClient::from_env("my-tool")?;
//!
//! let mut repos = client.repos().list_for_authenticated_user(&[]).await?;
//! println!("{} repositories", repos.count().await?);
//!
//! // Newest last: walk the same listing backwards
//! let mut newest_first = repos.reversed();
//! if let Some(repo) = newest_first.next_item().await? {
//!     println!("{}", repo.full_name().unwrap_or_default());
//! }
//! ```
//!
//! # Testing
//!
//! [`testing::MockBackend`] serves canned responses so code built on this
//! crate can be tested without network access.

pub mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod http;
pub mod link;
pub mod pagination;
pub mod rate_limit;
pub mod testing;
pub mod transport;
pub mod types;

// Re-exports
pub use client::GitHubClient;
pub use clients::{CommitsClient, ContentsClient, ReposClient, UsersClient};
pub use config::{ClientConfig, DEFAULT_API_VERSION, DEFAULT_BASE_URL};
pub use error::{AccessKind, Error, Result};
pub use http::{HttpBackend, HttpRequest, RawResponse, ReqwestBackend};
pub use link::{parse_link_header, Links, Relation};
pub use pagination::{FromJson, Page, PaginatedList, Step};
pub use transport::HttpTransport;
pub use types::{Commit, Content, Contents, IntoRepoRef, RepoRef, Repository, User};
