//! Timeline of upcoming and recent events for tracked shows.

use beacon_domain::{ApiRequest, DomainError, TimelineEvent, TimelineWindow};
use chrono::Duration;

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::query::{QueryCache, QueryKey};

/// Fixed windows change often.
pub const WINDOW_STALE_TIME: Duration = Duration::minutes(2);
/// Explicit date ranges.
pub const RANGE_STALE_TIME: Duration = Duration::minutes(5);

/// Timeline queries.
#[derive(Debug, Clone)]
pub struct TimelineService {
    client: ApiClient,
    cache: QueryCache,
}

impl TimelineService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self { client, cache }
    }

    /// Events in one of the fixed windows.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn window(&self, window: TimelineWindow) -> ApiResult<Vec<TimelineEvent>> {
        let key = QueryKey::from("timeline").with(window);
        self.cache
            .fetch(key, WINDOW_STALE_TIME, || async {
                let path = format!("/timeline/{window}");
                Ok(self.client.get(&path).await?.into_data())
            })
            .await
    }

    /// Events between two dates (`YYYY-MM-DD`, inclusive).
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidQuery`] if either bound is empty,
    /// otherwise the client error.
    pub async fn range(&self, from: &str, to: &str) -> ApiResult<Vec<TimelineEvent>> {
        if from.is_empty() || to.is_empty() {
            return Err(
                DomainError::InvalidQuery("both from and to are required".to_string()).into(),
            );
        }

        let key = QueryKey::new(["timeline", "range", from, to]);
        self.cache
            .fetch(key, RANGE_STALE_TIME, || async {
                let request = ApiRequest::get("/timeline")
                    .with_query("from", from)
                    .with_query("to", to);
                Ok(self.client.execute(request).await?.into_data())
            })
            .await
    }
}
