//! Notification inbox.

use beacon_domain::{
    ApiRequest, NotificationFilters, PaginatedNotifications, UnreadCount,
};
use chrono::Duration;

use super::shows::require_id;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::query::{QueryCache, QueryKey};

/// Notification pages.
pub const LIST_STALE_TIME: Duration = Duration::minutes(1);
/// The unread badge is polled.
pub const COUNT_STALE_TIME: Duration = Duration::seconds(30);

/// Notification queries and read markers.
#[derive(Debug, Clone)]
pub struct NotificationService {
    client: ApiClient,
    cache: QueryCache,
}

impl NotificationService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self { client, cache }
    }

    /// Cache key prefix of every notification page.
    #[must_use]
    pub fn list_key() -> QueryKey {
        QueryKey::from("notifications")
    }

    /// Cache key of the unread count.
    #[must_use]
    pub fn count_key() -> QueryKey {
        QueryKey::from("notifications-count")
    }

    /// One page of notifications. The backend nests the page inside the
    /// `{ data }` envelope.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn list(&self, filters: &NotificationFilters) -> ApiResult<PaginatedNotifications> {
        let key = Self::list_key().with(
            serde_json::to_string(filters).unwrap_or_default(),
        );
        self.cache
            .fetch(key, LIST_STALE_TIME, || async {
                let request = ApiRequest::get("/notifications").with_query_params(filters)?;
                Ok(self.client.execute(request).await?.into_data())
            })
            .await
    }

    /// Number of unread notifications.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn unread_count(&self) -> ApiResult<UnreadCount> {
        self.cache
            .fetch(Self::count_key(), COUNT_STALE_TIME, || async {
                Ok(self
                    .client
                    .get("/notifications/unread-count")
                    .await?
                    .into_data())
            })
            .await
    }

    /// Marks one notification as read.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn mark_read(&self, id: &str) -> ApiResult<()> {
        require_id(id)?;
        self.client
            .execute_unit(ApiRequest::patch(format!("/notifications/{id}/read")))
            .await?;
        self.invalidate().await;
        Ok(())
    }

    /// Marks every notification as read. The cached count drops to zero
    /// right away and is restored if the request fails.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn mark_all_read(&self) -> ApiResult<()> {
        let snapshot = self
            .cache
            .optimistic::<UnreadCount, _>(&Self::count_key(), |unread| unread.count = 0)
            .await;

        let result = self
            .client
            .execute_unit(ApiRequest::post("/notifications/read-all"))
            .await;
        if result.is_err() {
            snapshot.rollback().await;
        }
        self.invalidate().await;
        result
    }

    async fn invalidate(&self) {
        self.cache.invalidate(&Self::list_key()).await;
        self.cache.invalidate(&Self::count_key()).await;
    }
}
