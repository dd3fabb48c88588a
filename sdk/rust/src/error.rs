//! Error types for the GitHub client.
//!
//! Status codes that make a request fatal are mapped to an [`AccessKind`]
//! through a fixed lookup table; everything else the client can fail with is
//! a variant of [`Error`].

use std::time::Duration;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the GitHub client.
#[derive(Error, Debug)]
pub enum Error {
    /// The server refused the command (401, 403, 404 or 422).
    #[error("{}: {command}", .kind.message())]
    Access {
        kind: AccessKind,
        command: String,
    },

    /// The rate limit is exhausted and waiting was disabled.
    #[error("Rate limit exceeded for {command} (retry after {}s)", .wait.as_secs())]
    RateLimited { wait: Duration, command: String },

    /// Network-level failure: DNS, timeout, connection reset.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body was not the JSON we expected
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// File content could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Paginated lookup ran out of pages before reaching the index.
    #[error("Index {index} out of range")]
    IndexOutOfRange { index: isize },

    /// Repository name not in `owner/repo` form
    #[error("Invalid repository name: {0}")]
    InvalidRepository(String),

    /// A resource lacks a field needed for a follow-up call
    #[error("Missing field in response: {0}")]
    MissingField(&'static str),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Get the access error kind, if this is an access error.
    #[must_use]
    pub fn access_kind(&self) -> Option<AccessKind> {
        match self {
            Self::Access { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Get the command path that produced the error.
    #[must_use]
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::Access { command, .. } | Self::RateLimited { command, .. } => Some(command),
            _ => None,
        }
    }

    /// Check if this is a 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.access_kind() == Some(AccessKind::NotFound)
    }

    /// Get the wait duration for rate limited errors.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { wait, .. } => Some(*wait),
            _ => None,
        }
    }

    /// Check if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Transport(_))
    }
}

/// Kinds of access errors derived from HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessKind {
    /// 401
    AuthenticationRequired,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 422
    ValidationFailed,
}

const ACCESS_TABLE: [(u16, AccessKind, &str); 4] = [
    (401, AccessKind::AuthenticationRequired, "Requires authentication"),
    (403, AccessKind::Forbidden, "Forbidden"),
    (404, AccessKind::NotFound, "Resource not found"),
    (
        422,
        AccessKind::ValidationFailed,
        "Validation failed, or the endpoint has been spammed",
    ),
];

impl AccessKind {
    /// Classify a status code. Statuses outside the table are not errors here.
    #[must_use]
    pub fn from_status(status: u16) -> Option<Self> {
        ACCESS_TABLE
            .iter()
            .find(|(code, _, _)| *code == status)
            .map(|(_, kind, _)| *kind)
    }

    /// The status code this kind was derived from.
    #[must_use]
    pub fn status(self) -> u16 {
        ACCESS_TABLE
            .iter()
            .find(|(_, kind, _)| *kind == self)
            .map_or(0, |(code, _, _)| *code)
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(self) -> &'static str {
        ACCESS_TABLE
            .iter()
            .find(|(_, kind, _)| *kind == self)
            .map_or("Access error", |(_, _, msg)| *msg)
    }
}
