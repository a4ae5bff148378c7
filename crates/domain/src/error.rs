//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The timeline window name is not one of `today`, `week` or `upcoming`.
    #[error("unknown timeline window: {0}")]
    UnknownTimelineWindow(String),

    /// A value could not be turned into query parameters.
    #[error("invalid query parameters: {0}")]
    InvalidQuery(String),

    /// A request body could not be serialized.
    #[error("invalid body: {0}")]
    InvalidBody(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
