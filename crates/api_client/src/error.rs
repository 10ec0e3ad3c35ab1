//! Error types for the transport client
//!
//! Three outcomes are kept apart:
//! - [`ConfigError`]: the client or a service proxy could not be built.
//!   Raised synchronously, before any network activity.
//! - [`TransportError`]: the call itself failed (DNS, refused connection,
//!   timeout, undecodable body). Never retried here.
//! - [`RemoteError`]: the call succeeded but the service answered with a
//!   non-2xx status. Only produced on request via
//!   [`ApiResponse::into_result`](crate::ApiResponse::into_result).

use std::time::Duration;

use thiserror::Error;

/// Errors raised while building a client or binding a service proxy
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Base URL could not be parsed or uses an unsupported scheme
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// An operation requires an auth strategy that was never registered
    #[error(
        "Operation '{operation}' of {surface} requires auth strategy '{name}', which is not registered"
    )]
    MissingAuthStrategy {
        /// Name of the service surface
        surface: &'static str,
        /// Operation that declared the requirement
        operation: &'static str,
        /// The missing strategy name
        name: String,
    },

    /// The underlying HTTP client could not be initialized
    #[error("HTTP client initialization failed: {0}")]
    HttpClient(String),

    /// Configuration sources could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that prevent a call from producing an HTTP response
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection to the service could not be established
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("Request timed out{}", timeout_suffix(.timeout.as_ref()))]
    Timeout {
        /// The configured total timeout; `None` when the HTTP client was supplied pre-built
        timeout: Option<Duration>,
    },

    /// Request could not be built or sent
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Request body could not be encoded as JSON
    #[error("Failed to encode request body: {0}")]
    Encode(String),

    /// Response body could not be read from the connection
    #[error("Failed to read response body: {0}")]
    ResponseBody(String),

    /// A successful response carried a body that does not match the declared shape
    #[error("Malformed response body (HTTP {status}): {message}")]
    Decode {
        /// HTTP status of the response
        status: u16,
        /// Decoder error message
        message: String,
    },

    /// The blocking executor could not be started
    #[error("Blocking runtime unavailable: {0}")]
    Runtime(String),
}

impl TransportError {
    /// Returns true if re-issuing the same call might succeed
    ///
    /// This client never retries on its own; the flag is for callers that
    /// layer their own retry policy on top.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::Timeout { .. } | Self::ResponseBody(_)
        )
    }

    /// Classify a reqwest send error
    pub(crate) fn from_send(err: &reqwest::Error, timeout: Option<Duration>) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout }
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::RequestFailed(err.to_string())
        }
    }
}

fn timeout_suffix(timeout: Option<&Duration>) -> String {
    timeout.map_or_else(String::new, |t| format!(" after {t:?}"))
}

/// A non-2xx answer from the remote service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Remote service returned HTTP {status}")]
pub struct RemoteError {
    /// HTTP status code
    pub status: u16,
    /// Raw error body, if the service sent one
    pub body: Option<String>,
}
