//! Application error types

use beacon_domain::{DomainError, ErrorEnvelope, HttpResponse, StatusCode};
use thiserror::Error;

use crate::ports::{StorageError, TransportError};

/// Errors returned by the API client and the services built on it.
///
/// `Clone` so a single refresh failure can be handed to every request that
/// was queued behind it.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// No response was received.
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    /// 401 that could not be recovered by refreshing the credential.
    #[error("unauthorized: {}", .0.message())]
    Unauthorized(ErrorEnvelope),

    /// Any other non-success status.
    #[error("HTTP {status}: {}", .envelope.message())]
    Status {
        /// Response status.
        status: StatusCode,
        /// Error envelope from the body, or synthesized from the status.
        envelope: ErrorEnvelope,
    },

    /// A success body did not match the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Reading or writing stored credentials failed.
    #[error("credential storage error: {0}")]
    Storage(String),

    /// The request could not be built.
    #[error("invalid request: {0}")]
    Request(#[from] DomainError),

    /// The configured base URL and the path do not form a valid URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The refresh this request was waiting on was abandoned.
    #[error("credential refresh was abandoned")]
    Cancelled,
}

/// Coarse classification used by callers to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// No response received. Retry policy belongs to the caller.
    NetworkFailure,
    /// The session is unusable; credentials have been cleared.
    AuthenticationInvalid,
    /// The server rejected the request (4xx other than 401, or 5xx).
    ValidationOrServerError,
    /// Local failure: decoding, storage, request building.
    Internal,
}

impl ApiError {
    /// Builds the error for a non-success response.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        let envelope = response.error_envelope();
        if response.status.is_unauthorized() {
            Self::Unauthorized(envelope)
        } else {
            Self::Status {
                status: response.status,
                envelope,
            }
        }
    }

    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ApiErrorKind {
        match self {
            Self::Network(_) => ApiErrorKind::NetworkFailure,
            Self::Unauthorized(_) => ApiErrorKind::AuthenticationInvalid,
            Self::Status { .. } => ApiErrorKind::ValidationOrServerError,
            Self::Decode(_)
            | Self::Storage(_)
            | Self::Request(_)
            | Self::InvalidUrl(_)
            | Self::Cancelled => ApiErrorKind::Internal,
        }
    }

    /// Returns the HTTP status, if a response was received.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the error in the backend's envelope shape.
    #[must_use]
    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            Self::Unauthorized(envelope) | Self::Status { envelope, .. } => envelope.clone(),
            other => ErrorEnvelope::new(other.to_string()),
        }
    }

    /// Returns the message meant for display (`error.message`).
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Unauthorized(envelope) | Self::Status { envelope, .. } => {
                envelope.message().to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error.to_string())
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_response_classification() {
        let unauthorized = ApiError::from_response(&HttpResponse::new(
            401,
            r#"{"error":{"message":"token expired"}}"#,
        ));
        assert_eq!(unauthorized.kind(), ApiErrorKind::AuthenticationInvalid);
        assert_eq!(unauthorized.message(), "token expired");

        let invalid = ApiError::from_response(&HttpResponse::new(
            422,
            r#"{"error":{"message":"validation failed","details":{"q":"too short"}}}"#,
        ));
        assert_eq!(invalid.kind(), ApiErrorKind::ValidationOrServerError);
        assert_eq!(invalid.status(), Some(StatusCode(422)));
        assert!(invalid.envelope().error.details.is_some());
    }

    #[test]
    fn test_network_errors_get_synthesized_envelope() {
        let error = ApiError::from(TransportError::Timeout { timeout_ms: 15_000 });
        assert_eq!(error.kind(), ApiErrorKind::NetworkFailure);
        assert_eq!(
            error.envelope().message(),
            "network error: request timed out after 15000 ms"
        );
        assert_eq!(error.status(), None);
    }
}
