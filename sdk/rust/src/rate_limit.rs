//! Rate-limit detection and backoff computation.
//!
//! GitHub reports the remaining request budget on every response. When it
//! reads exactly zero the request has to be retried after
//! `max(retry-after, reset - now)` seconds.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::http::RawResponse;

pub const REMAINING_HEADER: &str = "x-ratelimit-remaining";
pub const RESET_HEADER: &str = "x-ratelimit-reset";
pub const RETRY_AFTER_HEADER: &str = "retry-after";

/// What the executor should do with a response.
#[derive(Debug)]
pub enum RequestOutcome {
    /// Budget left; hand the response on.
    Ready(RawResponse),
    /// Budget exhausted; wait, then resend the identical request.
    RetryAfter(Duration),
}

/// Rate-limit fields read from response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitHeaders {
    pub remaining: Option<u64>,
    /// Unix timestamp (seconds) at which the budget resets.
    pub reset: Option<i64>,
    /// Seconds.
    pub retry_after: Option<u64>,
}

impl RateLimitHeaders {
    /// Parse the rate-limit headers. Unparsable values count as absent.
    #[must_use]
    pub fn from_response(response: &RawResponse) -> Self {
        Self {
            remaining: parse(response, REMAINING_HEADER),
            reset: parse(response, RESET_HEADER),
            retry_after: parse(response, RETRY_AFTER_HEADER),
        }
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Time to wait before retrying, or `None` if budget remains.
    #[must_use]
    pub fn wait_duration(&self, now: DateTime<Utc>) -> Option<Duration> {
        if !self.is_exhausted() {
            return None;
        }
        let retry_after = i64::try_from(self.retry_after.unwrap_or(0)).unwrap_or(i64::MAX);
        let until_reset = self.reset.map_or(0, |reset| reset.saturating_sub(now.timestamp()));
        let secs = retry_after.max(until_reset).max(0);
        Some(Duration::from_secs(secs.unsigned_abs()))
    }

    /// When the budget resets, if reported.
    #[must_use]
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        self.reset.and_then(|ts| DateTime::from_timestamp(ts, 0))
    }
}

fn parse<T: std::str::FromStr>(response: &RawResponse, name: &str) -> Option<T> {
    response.header(name).and_then(|v| v.trim().parse().ok())
}

/// Decide whether `response` is usable or must be retried later.
#[must_use]
pub fn check_rate_limit(response: RawResponse, now: DateTime<Utc>) -> RequestOutcome {
    match RateLimitHeaders::from_response(&response).wait_duration(now) {
        Some(wait) => RequestOutcome::RetryAfter(wait),
        None => RequestOutcome::Ready(response),
    }
}
