//! Authenticated API client.
//!
//! Every request carries the stored access credential. A 401 triggers one
//! shared credential refresh; requests that fail while it runs wait for its
//! outcome and then replay themselves once.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use beacon_domain::request::AUTHORIZATION;
use beacon_domain::{
    ApiRequest, ApiResponse, DomainError, ErrorEnvelope, HttpRequest, HttpResponse, PageQuery,
    PaginatedResponse, RefreshRequest, TokenPair, bearer_header,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::{RefreshCoordinator, RefreshLease, RefreshTicket, TokenStore};
use crate::error::{ApiError, ApiResult};
use crate::ports::{HttpTransport, SIGN_IN_PATH, SignInRedirect};

/// Path of the credential refresh endpoint, relative to the base URL.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Per-call ceiling applied to every HTTP call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Base URL the web app falls back to when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, e.g. `https://api.example.com/api/v1`.
    pub base_url: Url,
    /// Per-call timeout.
    pub timeout: Duration,
    /// Optional `User-Agent` header.
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Creates a config with the default timeout.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Parses the base URL.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidUrl`] if `base_url` is not absolute.
    pub fn parse(base_url: &str) -> ApiResult<Self> {
        Url::parse(base_url)
            .map(Self::new)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Resolves a request path and query against the base URL.
    ///
    /// The path is appended to the base, so `/tracking` under
    /// `http://host/api/v1` becomes `http://host/api/v1/tracking`.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidUrl`] if the result is not a valid URL.
    pub fn endpoint(&self, request: &ApiRequest) -> ApiResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = request.path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{base}/{path}"))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", request.path)))?;
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// What a lost session does besides clearing credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionEnd {
    Redirect,
    Silent,
}

/// HTTP client for the Beacon backend with transparent credential refresh.
///
/// Clones share the transport, credential store and refresh state.
#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn HttpTransport>,
    tokens: TokenStore,
    refresh: Arc<RefreshCoordinator>,
    sign_in: Option<Arc<dyn SignInRedirect>>,
}

impl ApiClient {
    /// Creates a client with its own refresh state and no sign-in redirect.
    #[must_use]
    pub fn new(config: ClientConfig, transport: Arc<dyn HttpTransport>, tokens: TokenStore) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            tokens,
            refresh: Arc::new(RefreshCoordinator::new()),
            sign_in: None,
        }
    }

    /// Installs the hook invoked when the session ends.
    #[must_use]
    pub fn with_sign_in_redirect(mut self, sign_in: Arc<dyn SignInRedirect>) -> Self {
        self.sign_in = Some(sign_in);
        self
    }

    /// The connection settings.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The credential store.
    #[must_use]
    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// The shared refresh state.
    #[must_use]
    pub const fn refresh_coordinator(&self) -> &Arc<RefreshCoordinator> {
        &self.refresh
    }

    /// `GET path`.
    ///
    /// # Errors
    /// See [`ApiClient::send`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<ApiResponse<T>> {
        self.execute(ApiRequest::get(path)).await
    }

    /// `GET path?page=&per_page=`, decoding the whole body as a page.
    ///
    /// # Errors
    /// See [`ApiClient::send`]. Also returns [`ApiError::Decode`] if the body
    /// is not a page of `T`.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: PageQuery,
    ) -> ApiResult<PaginatedResponse<T>> {
        let response = self
            .send(ApiRequest::get(path).with_query_params(&page)?)
            .await?;
        decode(&response)
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    /// See [`ApiClient::send`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.execute(ApiRequest::post(path).with_json(body)?).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    /// See [`ApiClient::send`].
    pub async fn put<T, B>(&self, path: &str, body: &B) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.execute(ApiRequest::put(path).with_json(body)?).await
    }

    /// `PATCH path` with a JSON body.
    ///
    /// # Errors
    /// See [`ApiClient::send`].
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> ApiResult<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize,
    {
        self.execute(ApiRequest::patch(path).with_json(body)?).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    /// See [`ApiClient::send`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<ApiResponse<T>> {
        self.execute(ApiRequest::delete(path)).await
    }

    /// `DELETE path`, discarding the body.
    ///
    /// # Errors
    /// See [`ApiClient::send`].
    pub async fn delete_unit(&self, path: &str) -> ApiResult<()> {
        self.execute_unit(ApiRequest::delete(path)).await
    }

    /// Sends a request and decodes the `{ data }` envelope.
    ///
    /// # Errors
    /// See [`ApiClient::send`]. Also returns [`ApiError::Decode`] if the body
    /// does not match `T`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> ApiResult<ApiResponse<T>> {
        let response = self.send(request).await?;
        decode(&response)
    }

    /// Sends a request and discards the body.
    ///
    /// # Errors
    /// See [`ApiClient::send`].
    pub async fn execute_unit(&self, request: ApiRequest) -> ApiResult<()> {
        self.send(request).await.map(drop)
    }

    /// Sends a request, recovering once from an expired credential.
    ///
    /// # Errors
    /// - [`ApiError::Network`] when no response was received
    /// - [`ApiError::Unauthorized`] when the session could not be recovered
    /// - [`ApiError::Status`] for any other non-success status
    pub async fn send(&self, request: ApiRequest) -> ApiResult<HttpResponse> {
        let sent_with = self.tokens.get_access().await?;
        let response = self.dispatch(&request, sent_with.as_deref()).await?;

        if response.status.is_unauthorized() && !request.is_retry() {
            let failure = response.error_envelope();
            let access = self
                .refreshed_access(&request, sent_with.as_deref(), failure, SessionEnd::Redirect)
                .await?;
            return self.replay(request, &access).await;
        }

        check(response)
    }

    /// Exchanges the refresh credential for a new pair, joining an
    /// in-flight refresh if there is one.
    ///
    /// Returns the new access credential. The sign-in redirect is never
    /// fired from here; callers decide what a lost session means.
    ///
    /// # Errors
    /// Returns [`ApiError::Unauthorized`] if there is no refresh credential
    /// or the backend rejects it. Credentials are cleared in both cases.
    pub async fn refresh_session(&self) -> ApiResult<String> {
        let request = ApiRequest::post(REFRESH_PATH);
        let current = self.tokens.get_access().await?;
        self.refreshed_access(
            &request,
            current.as_deref(),
            ErrorEnvelope::new("no refresh credential"),
            SessionEnd::Silent,
        )
        .await
    }

    async fn refreshed_access(
        &self,
        request: &ApiRequest,
        sent_with: Option<&str>,
        failure: ErrorEnvelope,
        end: SessionEnd,
    ) -> ApiResult<String> {
        match self.refresh.join(request) {
            RefreshTicket::Leader(lease) => {
                self.lead_refresh(lease, request, sent_with, failure, end)
                    .await
            }
            RefreshTicket::Waiter(waiter) => waiter.wait().await,
        }
    }

    /// Runs the refresh as the single leader.
    ///
    /// Storage is only read once the lease is held, so a credential pair
    /// stored by a refresh that finished in the meantime is picked up
    /// instead of spending an already rotated refresh credential.
    async fn lead_refresh(
        &self,
        lease: RefreshLease,
        request: &ApiRequest,
        sent_with: Option<&str>,
        failure: ErrorEnvelope,
        end: SessionEnd,
    ) -> ApiResult<String> {
        let stored = match self.tokens.get_access().await {
            Ok(stored) => stored,
            Err(error) => return abandon(lease, error.into()),
        };
        if let Some(current) = stored.filter(|current| Some(current.as_str()) != sent_with) {
            tracing::debug!(request = %request.describe(), "Credential already refreshed, skipping refresh");
            lease.resolve(&Ok(current.clone()));
            return Ok(current);
        }

        let refresh_token = match self.tokens.get_refresh().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::info!(request = %request.describe(), "No refresh credential, ending session");
                self.tokens_cleared().await;
                let result = abandon(lease, ApiError::Unauthorized(failure));
                self.session_ended(end);
                return result;
            }
            Err(error) => return abandon(lease, error.into()),
        };

        let pair = match self.refresh_credentials(&refresh_token).await {
            Ok(pair) => pair,
            Err(error) => {
                self.tokens_cleared().await;
                let result = abandon(lease, session_error(error));
                self.session_ended(end);
                return result;
            }
        };

        if let Err(error) = self.tokens.set_pair(&pair).await {
            return abandon(lease, error.into());
        }

        lease.resolve(&Ok(pair.access_token.clone()));
        Ok(pair.access_token)
    }

    /// Calls the refresh endpoint directly. A 401 here is never recovered.
    async fn refresh_credentials(&self, refresh_token: &str) -> ApiResult<TokenPair> {
        let request = ApiRequest::post(REFRESH_PATH).with_json(&RefreshRequest {
            refresh_token: refresh_token.to_string(),
        })?;
        let response = check(self.dispatch(&request, None).await?)?;
        decode::<ApiResponse<TokenPair>>(&response).map(ApiResponse::into_data)
    }

    async fn replay(&self, request: ApiRequest, access: &str) -> ApiResult<HttpResponse> {
        let request = request.into_retry();
        tracing::debug!(request = %request.describe(), "Replaying with refreshed credential");
        check(self.dispatch(&request, Some(access)).await?)
    }

    async fn tokens_cleared(&self) {
        match self.tokens.clear().await {
            Ok(()) => tracing::info!("Cleared stored credentials"),
            Err(error) => tracing::warn!(%error, "Failed to clear stored credentials"),
        }
    }

    fn session_ended(&self, end: SessionEnd) {
        if end == SessionEnd::Silent {
            return;
        }
        if let Some(sign_in) = &self.sign_in {
            sign_in.redirect(SIGN_IN_PATH);
        }
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        access: Option<&str>,
    ) -> ApiResult<HttpResponse> {
        let http_request = self.build(request, access)?;
        tracing::debug!(
            request = %request.describe(),
            authenticated = access.is_some(),
            retry = request.is_retry(),
            "Sending request"
        );

        let response = self.transport.send(http_request).await?;
        tracing::debug!(request = %request.describe(), status = %response.status, "Received response");
        Ok(response)
    }

    fn build(&self, request: &ApiRequest, access: Option<&str>) -> ApiResult<HttpRequest> {
        let url = self.config.endpoint(request)?;

        let mut headers = vec![("Accept".to_string(), "application/json".to_string())];
        if let Some(user_agent) = &self.config.user_agent {
            headers.push(("User-Agent".to_string(), user_agent.clone()));
        }
        headers.extend(
            request
                .headers
                .iter()
                .filter(|(name, _)| !name.eq_ignore_ascii_case(AUTHORIZATION))
                .cloned(),
        );

        let body = match &request.body {
            Some(value) => {
                headers.push(("Content-Type".to_string(), "application/json".to_string()));
                Some(
                    serde_json::to_vec(value)
                        .map_err(|e| DomainError::InvalidBody(e.to_string()))?,
                )
            }
            None => None,
        };

        if let Some(token) = access {
            headers.push((AUTHORIZATION.to_string(), bearer_header(token)));
        }

        Ok(HttpRequest {
            method: request.method,
            url: url.into(),
            headers,
            body,
            timeout: self.config.timeout,
        })
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("refresh", &self.refresh)
            .field("sign_in", &self.sign_in.is_some())
            .finish_non_exhaustive()
    }
}

/// Awaits a client call and strips the `{ data }` envelope.
///
/// # Errors
/// Passes through the call's error unchanged.
pub async fn unwrap<T, F>(response: F) -> ApiResult<T>
where
    F: Future<Output = ApiResult<ApiResponse<T>>>,
{
    response.await.map(ApiResponse::into_data)
}

fn check(response: HttpResponse) -> ApiResult<HttpResponse> {
    if response.status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(&response))
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> ApiResult<T> {
    response
        .decode()
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Rejects every waiter with `error` and hands it back to the leader.
fn abandon(lease: RefreshLease, error: ApiError) -> ApiResult<String> {
    lease.resolve(&Err(error.clone()));
    Err(error)
}

/// A rejected refresh ends the session, whatever status it came back with.
fn session_error(error: ApiError) -> ApiError {
    match error {
        ApiError::Status { envelope, .. } => ApiError::Unauthorized(envelope),
        other => other,
    }
}
