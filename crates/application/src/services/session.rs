//! Sign-in state and the current user's profile.

use std::sync::Arc;

use beacon_domain::{
    ApiRequest, LoginRequest, LogoutRequest, RegisterDeviceRequest, RegisterRequest, TokenPair,
    UpdateProfileRequest, UserDevice, UserProfile,
};
use tokio::sync::RwLock;

use super::shows::require_id;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::query::QueryCache;

/// Whether a user is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No usable credentials.
    #[default]
    SignedOut,
    /// Credentials are stored and `/me` answered.
    SignedIn(UserProfile),
}

impl SessionState {
    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::SignedOut => None,
        }
    }

    /// Returns true when signed in.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }
}

/// Login, logout, session bootstrap and profile management.
#[derive(Debug, Clone)]
pub struct SessionService {
    client: ApiClient,
    cache: QueryCache,
    state: Arc<RwLock<SessionState>>,
}

impl SessionService {
    /// Creates the service in the signed-out state.
    #[must_use]
    pub fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self {
            client,
            cache,
            state: Arc::new(RwLock::new(SessionState::SignedOut)),
        }
    }

    /// The last known session state.
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Signs in with email and password, then loads the profile.
    ///
    /// # Errors
    /// Returns the client error. Nothing is stored if the login fails.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<UserProfile> {
        self.sign_in(ApiRequest::post("/auth/login").with_json(request)?)
            .await
    }

    /// Creates an account, then loads the profile.
    ///
    /// # Errors
    /// Returns the client error. Nothing is stored if registration fails.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<UserProfile> {
        self.sign_in(ApiRequest::post("/auth/register").with_json(request)?)
            .await
    }

    /// Revokes the refresh credential on a best-effort basis, then forgets
    /// the session. Never fails on the network call or on reading the
    /// stored credential; the cache and signed-in state are always reset.
    ///
    /// # Errors
    /// Returns an error only if local credentials cannot be cleared.
    pub async fn logout(&self) -> ApiResult<()> {
        let refresh_token = self
            .client
            .tokens()
            .get_refresh()
            .await
            .unwrap_or_else(|error| {
                tracing::warn!(%error, "Failed to read refresh credential, skipping revoke");
                None
            });

        if let Some(refresh_token) = refresh_token {
            let revoke = ApiRequest::post("/auth/logout").with_json(&LogoutRequest { refresh_token });
            let outcome = match revoke {
                Ok(request) => self.client.execute_unit(request).await,
                Err(error) => Err(error.into()),
            };
            if let Err(error) = outcome {
                tracing::debug!(%error, "Ignoring logout failure");
            }
        }

        let cleared = self.client.tokens().clear().await;
        self.cache.clear().await;
        *self.state.write().await = SessionState::SignedOut;
        cleared?;
        tracing::info!("Signed out");
        Ok(())
    }

    /// Rebuilds the session from stored credentials.
    ///
    /// An expired access credential is refreshed first. Any failure clears
    /// the stored credentials and reports [`SessionState::SignedOut`].
    pub async fn restore(&self) -> SessionState {
        let state = match self.try_restore().await {
            Ok(Some(profile)) => SessionState::SignedIn(profile),
            Ok(None) => SessionState::SignedOut,
            Err(error) => {
                tracing::info!(%error, "Stored session is no longer valid");
                if let Err(error) = self.client.tokens().clear().await {
                    tracing::warn!(%error, "Failed to clear stored credentials");
                }
                SessionState::SignedOut
            }
        };

        *self.state.write().await = state.clone();
        state
    }

    /// Loads the current user's profile.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn me(&self) -> ApiResult<UserProfile> {
        let profile: UserProfile = self.client.get("/me").await?.into_data();
        *self.state.write().await = SessionState::SignedIn(profile.clone());
        Ok(profile)
    }

    /// Updates the username or timezone.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> ApiResult<UserProfile> {
        let profile: UserProfile = self.client.patch("/me", request).await?.into_data();
        *self.state.write().await = SessionState::SignedIn(profile.clone());
        Ok(profile)
    }

    /// Registers a push-notification device.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn register_device(&self, request: &RegisterDeviceRequest) -> ApiResult<UserDevice> {
        Ok(self.client.post("/me/devices", request).await?.into_data())
    }

    /// Removes a push-notification device.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn unregister_device(&self, device_id: &str) -> ApiResult<()> {
        require_id(device_id)?;
        self.client
            .delete_unit(&format!("/me/devices/{device_id}"))
            .await
    }

    async fn sign_in(&self, request: ApiRequest) -> ApiResult<UserProfile> {
        let pair: TokenPair = self.client.execute(request).await?.into_data();
        self.client.tokens().set_pair(&pair).await?;
        tracing::info!("Signed in");
        self.me().await
    }

    async fn try_restore(&self) -> ApiResult<Option<UserProfile>> {
        let tokens = self.client.tokens();
        let Some(access) = tokens.get_access().await? else {
            return Ok(None);
        };

        if tokens.is_expired(&access) {
            tracing::debug!("Stored access credential expired, refreshing");
            self.client.refresh_session().await?;
        }

        self.me().await.map(Some)
    }
}
