//! Authentication payloads exchanged with the backend.

use serde::{Deserialize, Serialize};

/// Credential pair issued by login, register and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer token.
    pub access_token: String,
    /// Longer-lived token exchanged for a new pair.
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

impl TokenPair {
    /// Creates a new credential pair.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: u64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_in,
        }
    }

    /// Returns the Authorization header value for the access token.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        bearer_header(&self.access_token)
    }
}

/// Formats an access token as an `Authorization` header value.
#[must_use]
pub fn bearer_header(access_token: &str) -> String {
    format!("Bearer {access_token}")
}

/// `POST /auth/login` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// `POST /auth/register` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Account email.
    pub email: String,
    /// Public username.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// `POST /auth/refresh` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// The refresh credential to exchange.
    pub refresh_token: String,
}

/// `POST /auth/logout` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// The refresh credential to revoke.
    pub refresh_token: String,
}
