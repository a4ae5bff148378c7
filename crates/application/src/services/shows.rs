//! Show catalog queries.

use beacon_domain::{ApiRequest, DomainError, Episode, Season, Show, SyncStatus};
use chrono::Duration;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::query::{QueryCache, QueryKey};

/// Search results rarely change.
pub const SEARCH_STALE_TIME: Duration = Duration::hours(1);
/// Show and season details.
pub const DETAIL_STALE_TIME: Duration = Duration::minutes(15);
/// Upcoming episode lists.
pub const UPCOMING_STALE_TIME: Duration = Duration::minutes(10);
/// Catalog sync status.
pub const SYNC_STATUS_STALE_TIME: Duration = Duration::minutes(30);

/// Shortest search term sent to the backend.
pub const MIN_SEARCH_LEN: usize = 2;

/// Read access to the show catalog.
#[derive(Debug, Clone)]
pub struct ShowService {
    client: ApiClient,
    cache: QueryCache,
}

impl ShowService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self { client, cache }
    }

    /// Searches the catalog by title.
    ///
    /// Terms shorter than two characters return an empty list without a request.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn search(&self, query: &str) -> ApiResult<Vec<Show>> {
        if query.chars().count() < MIN_SEARCH_LEN {
            return Ok(Vec::new());
        }

        let key = QueryKey::from("show-search").with(query);
        self.cache
            .fetch(key, SEARCH_STALE_TIME, || async {
                let request = ApiRequest::get("/shows/search").with_query("q", query);
                Ok(self.client.execute(request).await?.into_data())
            })
            .await
    }

    /// Loads a show with its seasons and ratings.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidQuery`] for an empty id, otherwise the client error.
    pub async fn detail(&self, show_id: &str) -> ApiResult<Show> {
        require_id(show_id)?;
        let key = QueryKey::from("show-detail").with(show_id);
        self.cache
            .fetch(key, DETAIL_STALE_TIME, || async {
                Ok(self.client.get(&format!("/shows/{show_id}")).await?.into_data())
            })
            .await
    }

    /// Loads one season with its episodes. Seasons are numbered from 1.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidQuery`] for an empty id or season 0,
    /// otherwise the client error.
    pub async fn season(&self, show_id: &str, season_number: u32) -> ApiResult<Season> {
        require_id(show_id)?;
        if season_number == 0 {
            return Err(DomainError::InvalidQuery("season numbers start at 1".to_string()).into());
        }

        let key = QueryKey::from("season-detail")
            .with(show_id)
            .with(season_number);
        self.cache
            .fetch(key, DETAIL_STALE_TIME, || async {
                let path = format!("/shows/{show_id}/seasons/{season_number}");
                Ok(self.client.get(&path).await?.into_data())
            })
            .await
    }

    /// Lists episodes that have not aired yet.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidQuery`] for an empty id, otherwise the client error.
    pub async fn upcoming_episodes(&self, show_id: &str) -> ApiResult<Vec<Episode>> {
        require_id(show_id)?;
        let key = QueryKey::from("upcoming-episodes").with(show_id);
        self.cache
            .fetch(key, UPCOMING_STALE_TIME, || async {
                let request = ApiRequest::get(format!("/shows/{show_id}/episodes"))
                    .with_query("upcoming", "true");
                Ok(self.client.execute(request).await?.into_data())
            })
            .await
    }

    /// When the show was last synced from upstream catalogs.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidQuery`] for an empty id, otherwise the client error.
    pub async fn sync_status(&self, show_id: &str) -> ApiResult<SyncStatus> {
        require_id(show_id)?;
        let key = QueryKey::from("sync-status").with(show_id);
        self.cache
            .fetch(key, SYNC_STATUS_STALE_TIME, || async {
                let path = format!("/shows/{show_id}/sync-status");
                Ok(self.client.get(&path).await?.into_data())
            })
            .await
    }
}

pub(crate) fn require_id(id: &str) -> Result<(), DomainError> {
    if id.trim().is_empty() {
        Err(DomainError::InvalidQuery("an id is required".to_string()))
    } else {
        Ok(())
    }
}
