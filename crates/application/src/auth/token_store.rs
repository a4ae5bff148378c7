//! Credential store with expiry checks.
//!
//! Wraps a [`CredentialStorage`] backend under two fixed keys and decodes
//! the access token's `exp` claim to tell whether it should be refreshed.

use std::fmt;
use std::sync::Arc;

use beacon_domain::{TokenPair, decode_claims};
use chrono::Duration;

use crate::ports::{Clock, CredentialStorage, StorageError};

/// Storage key of the access credential.
pub const ACCESS_TOKEN_KEY: &str = "bb_access_token";
/// Storage key of the refresh credential.
pub const REFRESH_TOKEN_KEY: &str = "bb_refresh_token";
/// A token is treated as expired this many seconds before its `exp` claim.
pub const EXPIRY_LEEWAY_SECONDS: i64 = 30;

/// Access and refresh credential store.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn CredentialStorage>,
    clock: Arc<dyn Clock>,
    leeway: Duration,
}

impl TokenStore {
    /// Create a token store over the given storage and clock.
    #[must_use]
    pub fn new(storage: Arc<dyn CredentialStorage>, clock: Arc<dyn Clock>) -> Self {
        Self {
            storage,
            clock,
            leeway: Duration::seconds(EXPIRY_LEEWAY_SECONDS),
        }
    }

    /// Returns the access credential, if stored.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read.
    pub async fn get_access(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(ACCESS_TOKEN_KEY).await
    }

    /// Returns the refresh credential, if stored.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read.
    pub async fn get_refresh(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(REFRESH_TOKEN_KEY).await
    }

    /// Stores both credentials.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be written.
    pub async fn set(&self, access: &str, refresh: &str) -> Result<(), StorageError> {
        self.storage
            .set_many(&[(ACCESS_TOKEN_KEY, access), (REFRESH_TOKEN_KEY, refresh)])
            .await
    }

    /// Stores a credential pair issued by the backend.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be written.
    pub async fn set_pair(&self, pair: &TokenPair) -> Result<(), StorageError> {
        self.set(&pair.access_token, &pair.refresh_token).await
    }

    /// Removes both credentials.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be written.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.storage
            .remove_many(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY])
            .await
    }

    /// True iff an access credential is stored. Expiry is not checked.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read.
    pub async fn is_authenticated(&self) -> Result<bool, StorageError> {
        Ok(self.get_access().await?.is_some())
    }

    /// Whether `token` is expired, counting the 30 second leeway.
    ///
    /// Tokens whose payload cannot be decoded count as expired.
    #[must_use]
    pub fn is_expired(&self, token: &str) -> bool {
        self.seconds_until_expiry(token)
            .is_none_or(|remaining| remaining <= self.leeway.num_seconds())
    }

    /// Seconds until the token's `exp` claim, or `None` if it cannot be decoded.
    #[must_use]
    pub fn seconds_until_expiry(&self, token: &str) -> Option<i64> {
        let expires_at = decode_claims(token).ok()?.expires_at().ok()?;
        Some((expires_at - self.clock.now()).num_seconds())
    }

    /// The user id embedded in a token (`sub`, then `user_id`).
    #[must_use]
    pub fn user_id(token: &str) -> Option<String> {
        decode_claims(token)
            .ok()
            .and_then(|claims| claims.subject().map(String::from))
    }

    /// Get token status for display.
    ///
    /// # Errors
    /// Returns an error if the storage cannot be read.
    pub async fn status(&self) -> Result<TokenStatus, StorageError> {
        let Some(access) = self.get_access().await? else {
            return Ok(TokenStatus::NotAuthenticated);
        };

        if self.is_expired(&access) {
            return Ok(TokenStatus::Expired {
                can_refresh: self.get_refresh().await?.is_some(),
            });
        }

        Ok(TokenStatus::Valid {
            seconds_remaining: self.seconds_until_expiry(&access).unwrap_or_default(),
        })
    }
}

impl fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenStore")
            .field("leeway", &self.leeway)
            .finish_non_exhaustive()
    }
}

/// Status of the stored session for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenStatus {
    /// No access credential is stored.
    NotAuthenticated,
    /// The access credential is usable.
    Valid {
        /// Seconds until the `exp` claim.
        seconds_remaining: i64,
    },
    /// The access credential is expired or undecodable.
    Expired {
        /// Whether a refresh credential is available.
        can_refresh: bool,
    },
}

impl TokenStatus {
    /// Get a user-friendly display message.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "Not signed in".to_string(),
            Self::Valid { seconds_remaining } => {
                let secs = *seconds_remaining;
                if secs > 3600 {
                    format!("Signed in, token valid for {} hours", secs / 3600)
                } else if secs > 60 {
                    format!("Signed in, token valid for {} minutes", secs / 60)
                } else {
                    format!("Signed in, token valid for {secs} seconds")
                }
            }
            Self::Expired { can_refresh: true } => {
                "Token expired (will refresh on next request)".to_string()
            }
            Self::Expired { can_refresh: false } => "Token expired, sign in again".to_string(),
        }
    }
}
