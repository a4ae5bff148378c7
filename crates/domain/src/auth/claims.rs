//! Read-only decoding of JWT payloads.
//!
//! The client only peeks at the expiry and subject claims to decide when to
//! refresh. Signatures are not checked and the claims are never used for
//! authorization decisions.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while decoding a token payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    /// The token does not have three dot-separated segments.
    #[error("malformed token: expected header.payload.signature")]
    Malformed,

    /// The payload segment is not valid base64.
    #[error("payload is not valid base64: {0}")]
    Encoding(String),

    /// The payload is not a JSON object with the expected claims.
    #[error("payload is not valid claims JSON: {0}")]
    Json(String),

    /// The payload has no `exp` claim.
    #[error("token has no expiry claim")]
    MissingExpiry,
}

/// Claims the client cares about.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    /// Expiry as seconds since the Unix epoch.
    pub exp: Option<i64>,
    /// Subject, the user id on most deployments.
    #[serde(default)]
    pub sub: Option<String>,
    /// Alternate user id claim.
    #[serde(default)]
    pub user_id: Option<String>,
}

impl Claims {
    /// Returns the expiry instant.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimsError::MissingExpiry`] when the claim is absent or
    /// out of range.
    pub fn expires_at(&self) -> Result<DateTime<Utc>, ClaimsError> {
        self.exp
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
            .ok_or(ClaimsError::MissingExpiry)
    }

    /// Returns `sub`, falling back to `user_id`.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref().or(self.user_id.as_deref())
    }
}

/// Decodes the payload segment of a JWT.
///
/// # Errors
///
/// Returns an error if the token is not three segments, the payload is not
/// base64 (url-safe, padded or not), or the JSON does not parse.
pub fn decode_claims(token: &str) -> Result<Claims, ClaimsError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(ClaimsError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .or_else(|_| STANDARD.decode(pad(payload)))
        .map_err(|e| ClaimsError::Encoding(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| ClaimsError::Json(e.to_string()))
}

fn pad(segment: &str) -> String {
    match segment.len() % 4 {
        2 => format!("{segment}=="),
        3 => format!("{segment}="),
        _ => segment.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn token_with(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_decode_expiry_and_subject() {
        let claims = decode_claims(&token_with(r#"{"exp":1700000000,"sub":"user-1"}"#)).unwrap();
        assert_eq!(claims.exp, Some(1_700_000_000));
        assert_eq!(claims.subject(), Some("user-1"));
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_subject_falls_back_to_user_id() {
        let claims = decode_claims(&token_with(r#"{"exp":1,"user_id":"u-9"}"#)).unwrap();
        assert_eq!(claims.subject(), Some("u-9"));
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let payload = STANDARD.encode(r#"{"exp":42}"#);
        let claims = decode_claims(&format!("h.{payload}.s")).unwrap();
        assert_eq!(claims.exp, Some(42));
    }

    #[test]
    fn test_decode_failures() {
        assert_eq!(decode_claims("not-a-jwt"), Err(ClaimsError::Malformed));
        assert_eq!(decode_claims("a.b.c.d"), Err(ClaimsError::Malformed));
        assert!(matches!(
            decode_claims("h.!!!.s"),
            Err(ClaimsError::Encoding(_))
        ));
        assert!(matches!(
            decode_claims(&token_with("not json")),
            Err(ClaimsError::Json(_))
        ));
    }

    #[test]
    fn test_missing_expiry() {
        let claims = decode_claims(&token_with(r#"{"sub":"x"}"#)).unwrap();
        assert_eq!(claims.expires_at(), Err(ClaimsError::MissingExpiry));
    }
}
