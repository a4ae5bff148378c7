//! Cinema showtimes for movies and cinemas near a location.

use beacon_domain::{ApiRequest, CinemasNearby, Geolocation, ShowtimesResponse};
use chrono::{Duration, NaiveDate};

use super::shows::require_id;
use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::query::{QueryCache, QueryKey};

/// Listings are cached for five minutes on the backend too.
pub const SHOWTIMES_STALE_TIME: Duration = Duration::minutes(5);

/// Showtime and cinema lookups.
#[derive(Debug, Clone)]
pub struct ShowtimesService {
    client: ApiClient,
    cache: QueryCache,
}

impl ShowtimesService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: ApiClient, cache: QueryCache) -> Self {
        Self { client, cache }
    }

    /// Cache key of a showtime lookup. `None` dates key as `today`.
    #[must_use]
    pub fn showtimes_key(show_id: &str, at: Geolocation, date: Option<NaiveDate>) -> QueryKey {
        QueryKey::from("showtimes")
            .with(show_id)
            .with(at)
            .with(date.map_or_else(|| "today".to_string(), |date| date.to_string()))
    }

    /// Cache key of a nearby-cinemas lookup.
    #[must_use]
    pub fn cinemas_key(at: Geolocation) -> QueryKey {
        QueryKey::from("cinemas").with(at)
    }

    /// Where and when a movie plays near `at`. Without a date the backend
    /// uses its current day.
    ///
    /// # Errors
    /// Returns the client error. The backend answers 500 for shows that are
    /// not movies.
    pub async fn showtimes(
        &self,
        show_id: &str,
        at: Geolocation,
        date: Option<NaiveDate>,
    ) -> ApiResult<ShowtimesResponse> {
        require_id(show_id)?;
        self.cache
            .fetch(
                Self::showtimes_key(show_id, at, date),
                SHOWTIMES_STALE_TIME,
                || async {
                    let mut request = located(ApiRequest::get(format!("/showtimes/{show_id}")), at);
                    if let Some(date) = date {
                        request = request.with_query("date", date.format("%Y-%m-%d").to_string());
                    }
                    Ok(self.client.execute(request).await?.into_data())
                },
            )
            .await
    }

    /// Cinemas near `at`, nearest first.
    ///
    /// # Errors
    /// Returns the client error.
    pub async fn cinemas_nearby(&self, at: Geolocation) -> ApiResult<CinemasNearby> {
        self.cache
            .fetch(Self::cinemas_key(at), SHOWTIMES_STALE_TIME, || async {
                let request = located(ApiRequest::get("/cinemas/nearby"), at);
                Ok(self.client.execute(request).await?.into_data())
            })
            .await
    }
}

/// Sends the location both as `geolocation=lat;lng` and as separate
/// `lat`/`lng` parameters; backend versions read one or the other.
fn located(request: ApiRequest, at: Geolocation) -> ApiRequest {
    request
        .with_query("geolocation", at.to_string())
        .with_query("lat", at.lat().to_string())
        .with_query("lng", at.lng().to_string())
}
