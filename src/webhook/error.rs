//! Error types for webhook delivery.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Error type for HTTP transport operations.
///
/// Describes what went wrong before any HTTP response was received.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out.
    ///
    /// The server did not respond within the client's configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// A non-success HTTP response from the webhook endpoint.
///
/// `retry_after` is only meaningful for rate-limit responses (429) and is
/// zero for every other status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookError {
    /// HTTP status code returned by the endpoint
    pub status: http::StatusCode,
    /// How long to wait before sending again
    pub retry_after: Duration,
    /// Raw response body text
    pub body: String,
}

impl WebhookError {
    /// Creates a rate-limit error (status 429).
    #[must_use]
    pub fn rate_limited(retry_after: Duration, body: impl Into<String>) -> Self {
        Self {
            status: http::StatusCode::TOO_MANY_REQUESTS,
            retry_after,
            body: body.into(),
        }
    }

    /// Creates an error for any other non-success status.
    #[must_use]
    pub fn status(status: http::StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            retry_after: Duration::ZERO,
            body: body.into(),
        }
    }

    /// Returns true if the endpoint asked the caller to slow down.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status == http::StatusCode::TOO_MANY_REQUESTS
    }
}

impl fmt::Display for WebhookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_rate_limited() && self.retry_after.is_zero() {
            write!(f, "rate limited: retry after 0s")
        } else if self.is_rate_limited() {
            write!(f, "rate limited: retry after {:?}", self.retry_after)
        } else {
            write!(f, "webhook error {}: {}", self.status.as_u16(), self.body)
        }
    }
}

impl std::error::Error for WebhookError {}

/// Outcome of a failed send.
///
/// Keeps the structured [`WebhookError`] apart from failures that happen
/// before a response exists, so callers can match on rate limits without
/// inspecting transport errors.
#[derive(Debug, Error)]
pub enum SendError {
    /// The message could not be encoded as JSON. No request was sent.
    #[error("Failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The request never produced a response.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The endpoint answered with a non-success status.
    #[error(transparent)]
    Webhook(#[from] WebhookError),

    /// The blocking wrapper could not start its runtime.
    #[error("Failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl SendError {
    /// Returns the webhook error, if the endpoint responded.
    #[must_use]
    pub const fn as_webhook(&self) -> Option<&WebhookError> {
        match self {
            Self::Webhook(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the requested delay if this is a rate-limit response.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        self.as_webhook()
            .filter(|e| e.is_rate_limited())
            .map(|e| e.retry_after)
    }
}
