//! Response types
//!
//! Raw HTTP responses as returned by a transport, before envelope decoding.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::envelope::ErrorEnvelope;

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// 401 Unauthorized.
    pub const UNAUTHORIZED: Self = Self(401);

    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is a 4xx client error status.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// Returns true if this is a 5xx server error status.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.0 >= 500 && self.0 < 600
    }

    /// Returns true for 401 Unauthorized.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.0 == 401
    }

    /// Returns the canonical reason phrase for common status codes.
    #[must_use]
    pub const fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// A raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponse {
    /// Response status.
    pub status: StatusCode,
    /// Raw body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response from a status and body.
    #[must_use]
    pub fn new(status: impl Into<StatusCode>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: status.into(),
            body: body.into(),
        }
    }

    /// Creates a JSON response.
    #[must_use]
    pub fn json(status: impl Into<StatusCode>, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the deserializer error if the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Returns the error envelope carried by this response.
    ///
    /// Bodies that are not an envelope get one synthesized from the status
    /// reason so callers can always read `error.message`.
    #[must_use]
    pub fn error_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::parse(&self.body)
            .unwrap_or_else(|| ErrorEnvelope::new(self.status.reason_phrase()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_categories() {
        assert!(StatusCode(204).is_success());
        assert!(StatusCode(422).is_client_error());
        assert!(StatusCode(503).is_server_error());
        assert!(StatusCode::UNAUTHORIZED.is_unauthorized());
        assert_eq!(StatusCode(404).to_string(), "404 Not Found");
    }

    #[test]
    fn test_error_envelope_fallback() {
        let response = HttpResponse::new(502, "upstream down");
        assert_eq!(response.error_envelope().message(), "Bad Gateway");

        let response = HttpResponse::new(400, r#"{"error":{"message":"bad email"}}"#);
        assert_eq!(response.error_envelope().message(), "bad email");
    }
}
