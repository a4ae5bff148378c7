//! HTTP transport port

use async_trait::async_trait;
use beacon_domain::{HttpRequest, HttpResponse};
use thiserror::Error;

/// Errors raised when no HTTP response was received at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The call exceeded its timeout.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// The timeout that was exceeded.
        timeout_ms: u64,
    },

    /// Host name resolution failed.
    #[error("could not resolve host {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connection-level failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The URL could not be used.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Anything else the HTTP library reports.
    #[error("{0}")]
    Other(String),
}

/// Port for sending HTTP requests.
///
/// Implementations must return every HTTP response, error statuses
/// included, as `Ok`. `Err` means no response was received.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network failure or timeout.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
