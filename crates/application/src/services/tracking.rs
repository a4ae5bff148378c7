//! Tracked shows: list, follow, unfollow and preferences.

use beacon_domain::{ApiRequest, TrackShowRequest, TrackedShow, UpdateTrackingRequest};
use chrono::Duration;

use super::shows::require_id;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::query::{QueryCache, QueryKey};

/// Tracked lists change only through this client.
pub const TRACKING_STALE_TIME: Duration = Duration::minutes(10);

/// The user's tracked shows.
#[derive(Debug, Clone)]
pub struct TrackingService {
    client: ApiClient,
    cache: QueryCache,
}

impl TrackingService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self { client, cache }
    }

    /// Cache key of the tracked list.
    #[must_use]
    pub fn list_key() -> QueryKey {
        QueryKey::from("tracking")
    }

    /// Cache key of the favorites list.
    #[must_use]
    pub fn favorites_key() -> QueryKey {
        QueryKey::new(["tracking", "favorites"])
    }

    /// Every tracked show.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn list(&self) -> ApiResult<Vec<TrackedShow>> {
        self.cache
            .fetch(Self::list_key(), TRACKING_STALE_TIME, || async {
                Ok(self.client.get("/tracking").await?.into_data())
            })
            .await
    }

    /// Tracked shows marked as favorite.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn favorites(&self) -> ApiResult<Vec<TrackedShow>> {
        self.cache
            .fetch(Self::favorites_key(), TRACKING_STALE_TIME, || async {
                Ok(self.client.get("/tracking/favorites").await?.into_data())
            })
            .await
    }

    /// Starts tracking a show.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn track(&self, request: &TrackShowRequest) -> ApiResult<()> {
        let result = self
            .client
            .execute_unit(ApiRequest::post("/tracking").with_json(request)?)
            .await;
        if result.is_ok() {
            self.invalidate_with_timeline().await;
        }
        result
    }

    /// Stops tracking a show.
    ///
    /// The show disappears from the cached list immediately and comes back
    /// if the request fails.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn untrack(&self, show_id: &str) -> ApiResult<()> {
        require_id(show_id)?;
        let snapshot = self
            .cache
            .optimistic::<Vec<TrackedShow>, _>(&Self::list_key(), |shows| {
                shows.retain(|show| show.show_id != show_id);
            })
            .await;

        let result = self
            .client
            .delete_unit(&format!("/tracking/{show_id}"))
            .await;
        if result.is_err() {
            snapshot.rollback().await;
        }
        self.invalidate_with_timeline().await;
        result
    }

    /// Flips the favorite flag of a tracked show.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn toggle_favorite(&self, show_id: &str) -> ApiResult<()> {
        require_id(show_id)?;
        let snapshot = self
            .cache
            .optimistic::<Vec<TrackedShow>, _>(&Self::list_key(), |shows| {
                for show in shows.iter_mut().filter(|show| show.show_id == show_id) {
                    show.is_favorite = !show.is_favorite;
                }
            })
            .await;

        let result = self
            .client
            .execute_unit(ApiRequest::post(format!("/tracking/{show_id}/favorite")))
            .await;
        if result.is_err() {
            snapshot.rollback().await;
        }
        self.cache.invalidate(&Self::list_key()).await;
        result
    }

    /// Changes notification preferences or the favorite flag.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn update(&self, show_id: &str, request: &UpdateTrackingRequest) -> ApiResult<()> {
        require_id(show_id)?;
        let request = ApiRequest::patch(format!("/tracking/{show_id}")).with_json(request)?;
        self.client.execute_unit(request).await?;
        self.cache.invalidate(&Self::list_key()).await;
        Ok(())
    }

    async fn invalidate_with_timeline(&self) {
        self.cache.invalidate(&Self::list_key()).await;
        self.cache.invalidate(&QueryKey::from("timeline")).await;
    }
}
