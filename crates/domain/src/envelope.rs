//! Wire envelopes shared by every backend endpoint.
//!
//! Successful responses are wrapped as `{ "data": T }`, failures as
//! `{ "error": { "message": "...", "details": ... } }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Success envelope: `{ "data": T }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// The wrapped resource.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wraps a value in the success envelope.
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { data }
    }

    /// Unwraps the envelope, returning the bare resource.
    #[must_use]
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Error envelope: `{ "error": { "message": string, "details"?: any } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error payload.
    pub error: ErrorBody,
}

/// Inner payload of [`ErrorEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message, meant for display.
    pub message: String,
    /// Optional structured details (validation failures and the like).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorEnvelope {
    /// Creates an envelope with only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
                details: None,
            },
        }
    }

    /// Attaches structured details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.error.details = Some(details);
        self
    }

    /// Returns the display message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.error.message
    }

    /// Tries to read an error envelope out of a raw response body.
    #[must_use]
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}

/// Pagination metadata for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedMeta {
    /// Total number of items across all pages.
    pub total: u64,
    /// Current page, 1-based.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
}

/// A page of items with its metadata.
///
/// The page is the whole response body. Some list endpoints send only
/// `{ "data": [...] }`, so `meta` is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Pagination metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginatedMeta>,
}

/// `?page=&per_page=` for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageQuery {
    /// Page number, 1-based.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_error_envelope_wire_format() {
        let envelope = ErrorEnvelope::new("invalid credentials");
        assert_eq!(
            serde_json::to_string(&envelope).unwrap(),
            r#"{"error":{"message":"invalid credentials"}}"#
        );

        let envelope = ErrorEnvelope::new("validation failed")
            .with_details(json!({"email": "required"}));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"error": {"message": "validation failed", "details": {"email": "required"}}})
        );
    }

    #[test]
    fn test_error_envelope_parse() {
        let parsed = ErrorEnvelope::parse(br#"{"error":{"message":"not found"}}"#).unwrap();
        assert_eq!(parsed.message(), "not found");
        assert!(parsed.error.details.is_none());

        assert!(ErrorEnvelope::parse(b"<html>bad gateway</html>").is_none());
    }

    #[test]
    fn test_page_without_meta() {
        let page: PaginatedResponse<u32> = serde_json::from_str(r#"{"data":[4,5]}"#).unwrap();
        assert_eq!(page.data, vec![4, 5]);
        assert_eq!(page.meta, None);

        let page: PaginatedResponse<u32> = serde_json::from_value(
            json!({"data": [], "meta": {"total": 41, "page": 3, "per_page": 20}}),
        )
        .unwrap();
        assert_eq!(page.meta.map(|meta| meta.total), Some(41));
    }

    #[test]
    fn test_success_envelope_unwrap() {
        let response: ApiResponse<Vec<u32>> = serde_json::from_str(r#"{"data":[1,2,3]}"#).unwrap();
        assert_eq!(response.into_data(), vec![1, 2, 3]);
    }
}
