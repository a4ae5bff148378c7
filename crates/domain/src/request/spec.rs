//! Request descriptors.
//!
//! [`ApiRequest`] is what callers build: a method, a path relative to the
//! API base URL, query pairs and an optional JSON body. [`HttpRequest`] is
//! the fully resolved wire request handed to a transport.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::HttpMethod;
use crate::error::{DomainError, DomainResult};

/// Name of the header carrying the bearer credential.
pub const AUTHORIZATION: &str = "Authorization";

/// A request against the backend API, relative to its base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the API base, e.g. `/tracking/42`.
    pub path: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    /// Optional JSON body.
    pub body: Option<Value>,
    /// Extra headers. `Authorization` is managed by the client.
    pub headers: Vec<(String, String)>,
    retried: bool,
}

impl ApiRequest {
    /// Creates a request with no query, body or headers.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
            retried: false,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    /// Creates a PUT request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    /// Creates a PATCH request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Appends a single query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends every field of a serializable struct as query parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `params` does not serialize to a flat object.
    pub fn with_query_params<S: Serialize>(mut self, params: &S) -> DomainResult<Self> {
        self.query.extend(query_pairs(params)?);
        Ok(self)
    }

    /// Sets a JSON body from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn with_json<S: Serialize>(mut self, body: &S) -> DomainResult<Self> {
        let value =
            serde_json::to_value(body).map_err(|e| DomainError::InvalidBody(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Adds an extra header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Whether this request is already a replay after a credential refresh.
    #[must_use]
    pub const fn is_retry(&self) -> bool {
        self.retried
    }

    /// Marks this request as a replay. A replay is never refreshed again.
    #[must_use]
    pub const fn into_retry(mut self) -> Self {
        self.retried = true;
        self
    }

    /// Short `METHOD /path` description for logs.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// Flattens a serializable value into query pairs.
///
/// `null` fields are skipped, scalars are stringified, and arrays repeat
/// the key once per element.
///
/// # Errors
///
/// Returns an error if the value is not an object or holds nested objects.
pub fn query_pairs<S: Serialize>(params: &S) -> DomainResult<Vec<(String, String)>> {
    let value =
        serde_json::to_value(params).map_err(|e| DomainError::InvalidQuery(e.to_string()))?;

    let map = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => {
            return Err(DomainError::InvalidQuery(format!(
                "expected an object, got {other}"
            )));
        }
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_to_string(item)? {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar_to_string(other)? {
                    pairs.push((key, text));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar_to_string(value: Value) -> DomainResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => Err(DomainError::InvalidQuery(
            "nested values are not supported".to_string(),
        )),
    }
}

/// A fully resolved request ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL including the encoded query string.
    pub url: String,
    /// Headers to send.
    pub headers: Vec<(String, String)>,
    /// Serialized body, if any.
    pub body: Option<Vec<u8>>,
    /// Per-call timeout.
    pub timeout: Duration,
}

impl HttpRequest {
    /// Looks up a header value, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the bearer credential carried by this request, if any.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.header(AUTHORIZATION)
            .and_then(|value| value.strip_prefix("Bearer "))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Serialize)]
    struct Filters {
        status: Option<String>,
        page: Option<u32>,
        unread: bool,
        tags: Vec<&'static str>,
    }

    #[test]
    fn test_query_pairs_flatten() {
        let filters = Filters {
            status: Some("read".to_string()),
            page: None,
            unread: true,
            tags: vec!["a", "b"],
        };
        let mut pairs = query_pairs(&filters).unwrap();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("status".to_string(), "read".to_string()),
                ("tags".to_string(), "a".to_string()),
                ("tags".to_string(), "b".to_string()),
                ("unread".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_rejects_non_objects() {
        assert!(query_pairs(&json!([1, 2])).is_err());
        assert!(query_pairs(&json!({"nested": {"a": 1}})).is_err());
        assert!(query_pairs(&()).unwrap().is_empty());
    }

    #[test]
    fn test_retry_flag() {
        let request = ApiRequest::get("/tracking");
        assert!(!request.is_retry());
        let replay = request.into_retry();
        assert!(replay.is_retry());
        assert_eq!(replay.describe(), "GET /tracking");
    }

    #[test]
    fn test_bearer_token_lookup() {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "http://localhost/api/v1/me".to_string(),
            headers: vec![("authorization".to_string(), "Bearer abc".to_string())],
            body: None,
            timeout: Duration::from_secs(15),
        };
        assert_eq!(request.bearer_token(), Some("abc"));
    }
}
