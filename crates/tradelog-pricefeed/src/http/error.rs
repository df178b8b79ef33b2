/*
[INPUT]:  Error sources (HTTP transport, upstream status codes, payload parsing)
[OUTPUT]: Structured error types shared by both upstream price clients
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for upstream price feeds
#[derive(Error, Debug)]
pub enum FeedError {
    /// HTTP request failed (connect error, timeout, TLS, ...)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("upstream error (status {status}): {body}")]
    Api { status: u16, body: String },

    /// Payload did not deserialize into the expected shape
    #[error("deserialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL joining/parsing failed
    #[error("invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Structurally valid response that still cannot be used
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Client construction / configuration problem
    #[error("configuration error: {0}")]
    Config(String),
}

impl FeedError {
    /// True when the request died on the wire rather than being rejected
    /// by the upstream. Timeouts fall in here.
    pub fn is_transport(&self) -> bool {
        matches!(self, FeedError::Http(_))
    }

    /// True when the underlying reqwest error was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FeedError::Http(err) if err.is_timeout())
    }

    /// Create an upstream error from a status code and response body
    pub fn api_error(status: StatusCode, body: impl Into<String>) -> Self {
        FeedError::Api {
            status: status.as_u16(),
            body: body.into(),
        }
    }
}

/// Result type alias for price feed operations
pub type Result<T> = std::result::Result<T, FeedError>;
