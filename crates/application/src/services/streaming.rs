//! Where a show can be streamed, rented or bought.

use beacon_domain::{ApiRequest, StreamingOptions};
use chrono::Duration;

use super::shows::require_id;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::query::{QueryCache, QueryKey};

/// Provider lists move slowly; the backend caches them for half a day.
pub const STREAMING_STALE_TIME: Duration = Duration::hours(12);

/// Streaming availability lookups.
#[derive(Debug, Clone)]
pub struct StreamingService {
    client: ApiClient,
    cache: QueryCache,
}

impl StreamingService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self { client, cache }
    }

    /// Cache key of one show's options in one region.
    #[must_use]
    pub fn options_key(show_id: &str, region: &str) -> QueryKey {
        QueryKey::from("streaming").with(show_id).with(region)
    }

    /// Providers for a show in `region`, e.g. `IN` or `US`.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn options(&self, show_id: &str, region: &str) -> ApiResult<StreamingOptions> {
        require_id(show_id)?;
        let region = region.trim().to_ascii_uppercase();
        self.cache
            .fetch(
                Self::options_key(show_id, &region),
                STREAMING_STALE_TIME,
                || async {
                    let request = ApiRequest::get(format!("/streaming/{show_id}"))
                        .with_query("region", &region);
                    Ok(self.client.execute(request).await?.into_data())
                },
            )
            .await
    }
}
