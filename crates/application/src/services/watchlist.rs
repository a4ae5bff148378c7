//! Watchlist: shows queued to watch later.

use beacon_domain::{
    AddToWatchlistRequest, ApiRequest, PageQuery, PaginatedResponse, UpdateWatchlistRequest,
    WatchlistItem,
};
use chrono::Duration;

use super::shows::require_id;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::query::{QueryCache, QueryKey};

/// Watchlist pages change only through this client.
pub const WATCHLIST_STALE_TIME: Duration = Duration::minutes(5);

/// The user's watchlist.
#[derive(Debug, Clone)]
pub struct WatchlistService {
    client: ApiClient,
    cache: QueryCache,
}

impl WatchlistService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self { client, cache }
    }

    /// Cache key prefix of every watchlist page.
    #[must_use]
    pub fn list_key() -> QueryKey {
        QueryKey::from("watchlist")
    }

    /// One page of the watchlist.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn list(&self, page: PageQuery) -> ApiResult<PaginatedResponse<WatchlistItem>> {
        let key = Self::list_key().with(page.page).with(page.per_page);
        self.cache
            .fetch(key, WATCHLIST_STALE_TIME, || async {
                self.client.get_page("/watchlist", page).await
            })
            .await
    }

    /// Queues a show.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn add(&self, request: &AddToWatchlistRequest) -> ApiResult<()> {
        require_id(&request.show_id)?;
        self.client
            .execute_unit(ApiRequest::post("/watchlist").with_json(request)?)
            .await?;
        self.cache.invalidate(&Self::list_key()).await;
        Ok(())
    }

    /// Changes priority or notes of a queued show.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn update(&self, show_id: &str, request: &UpdateWatchlistRequest) -> ApiResult<()> {
        require_id(show_id)?;
        let request = ApiRequest::patch(format!("/watchlist/{show_id}")).with_json(request)?;
        self.client.execute_unit(request).await?;
        self.cache.invalidate(&Self::list_key()).await;
        Ok(())
    }

    /// Removes a show from the watchlist.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn remove(&self, show_id: &str) -> ApiResult<()> {
        require_id(show_id)?;
        self.client
            .delete_unit(&format!("/watchlist/{show_id}"))
            .await?;
        self.cache.invalidate(&Self::list_key()).await;
        Ok(())
    }
}
