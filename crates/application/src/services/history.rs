//! Watch history, stats and per-show progress.

use beacon_domain::{
    ApiRequest, HistoryStats, MarkWatchedRequest, PageQuery, PaginatedResponse, ShowProgress,
    UpdateHistoryRequest, WatchHistoryEntry,
};
use chrono::Duration;

use super::shows::require_id;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::query::{QueryCache, QueryKey};

/// History pages, stats and progress.
pub const HISTORY_STALE_TIME: Duration = Duration::minutes(5);

/// What the user has watched.
#[derive(Debug, Clone)]
pub struct HistoryService {
    client: ApiClient,
    cache: QueryCache,
}

impl HistoryService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self { client, cache }
    }

    /// Cache key prefix of everything history related.
    #[must_use]
    pub fn list_key() -> QueryKey {
        QueryKey::from("history")
    }

    /// Cache key of the totals.
    #[must_use]
    pub fn stats_key() -> QueryKey {
        QueryKey::new(["history", "stats"])
    }

    /// Cache key of one show's progress.
    #[must_use]
    pub fn progress_key(show_id: &str) -> QueryKey {
        QueryKey::new(["history", "progress"]).with(show_id)
    }

    /// One page of watched episodes, newest first.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn list(&self, page: PageQuery) -> ApiResult<PaginatedResponse<WatchHistoryEntry>> {
        let key = Self::list_key().with(page.page).with(page.per_page);
        self.cache
            .fetch(key, HISTORY_STALE_TIME, || async {
                self.client.get_page("/history", page).await
            })
            .await
    }

    /// Episode and show totals.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn stats(&self) -> ApiResult<HistoryStats> {
        self.cache
            .fetch(Self::stats_key(), HISTORY_STALE_TIME, || async {
                Ok(self.client.get("/history/stats").await?.into_data())
            })
            .await
    }

    /// How far the user is through a show.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn progress(&self, show_id: &str) -> ApiResult<ShowProgress> {
        require_id(show_id)?;
        self.cache
            .fetch(Self::progress_key(show_id), HISTORY_STALE_TIME, || async {
                let path = format!("/history/progress/{show_id}");
                Ok(self.client.get(&path).await?.into_data())
            })
            .await
    }

    /// Records a watched episode.
    ///
    /// # Errors
    /// Returns [`crate::ApiError::Request`] for an invalid request without
    /// calling the backend, otherwise the client error.
    pub async fn mark_watched(&self, request: &MarkWatchedRequest) -> ApiResult<()> {
        require_id(&request.show_id)?;
        request.validate()?;
        self.client
            .execute_unit(ApiRequest::post("/history").with_json(request)?)
            .await?;
        self.cache.invalidate(&Self::list_key()).await;
        Ok(())
    }

    /// Changes the rating or notes of an entry.
    ///
    /// # Errors
    /// Returns [`crate::ApiError::Request`] for a rating outside 1 to 10,
    /// otherwise the client error.
    pub async fn update(&self, entry_id: &str, request: &UpdateHistoryRequest) -> ApiResult<()> {
        require_id(entry_id)?;
        request.validate()?;
        let request = ApiRequest::patch(format!("/history/{entry_id}")).with_json(request)?;
        self.client.execute_unit(request).await?;
        self.cache.invalidate(&Self::list_key()).await;
        Ok(())
    }

    /// Deletes an entry.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn remove(&self, entry_id: &str) -> ApiResult<()> {
        require_id(entry_id)?;
        self.client
            .delete_unit(&format!("/history/{entry_id}"))
            .await?;
        self.cache.invalidate(&Self::list_key()).await;
        Ok(())
    }
}
