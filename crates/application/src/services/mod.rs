//! Resource services over the API client and query cache.
//!
//! Each service owns the cache keys, stale times and invalidation rules of
//! one backend resource.

mod history;
mod notifications;
mod session;
mod shows;
mod showtimes;
mod streaming;
mod timeline;
mod tracking;
mod watchlist;

pub use history::{HISTORY_STALE_TIME, HistoryService};
pub use notifications::{COUNT_STALE_TIME, LIST_STALE_TIME, NotificationService};
pub use session::{SessionService, SessionState};
pub use shows::{
    DETAIL_STALE_TIME, MIN_SEARCH_LEN, SEARCH_STALE_TIME, SYNC_STATUS_STALE_TIME, ShowService,
    UPCOMING_STALE_TIME,
};
pub use showtimes::{SHOWTIMES_STALE_TIME, ShowtimesService};
pub use streaming::{STREAMING_STALE_TIME, StreamingService};
pub use timeline::{RANGE_STALE_TIME, TimelineService, WINDOW_STALE_TIME};
pub use tracking::{TRACKING_STALE_TIME, TrackingService};
pub use watchlist::{WATCHLIST_STALE_TIME, WatchlistService};

use crate::client::ApiClient;
use crate::query::QueryCache;

/// Every service, sharing one client and one cache.
#[derive(Debug, Clone)]
pub struct BeaconServices {
    /// Sign-in state and profile.
    pub session: SessionService,
    /// Show catalog.
    pub shows: ShowService,
    /// Tracked shows.
    pub tracking: TrackingService,
    /// Timeline events.
    pub timeline: TimelineService,
    /// Notification inbox.
    pub notifications: NotificationService,
    /// Shows queued to watch.
    pub watchlist: WatchlistService,
    /// Watched episodes.
    pub history: HistoryService,
    /// Streaming providers.
    pub streaming: StreamingService,
    /// Cinema showtimes.
    pub showtimes: ShowtimesService,
}

impl BeaconServices {
    /// Wires every service to the same client and cache.
    #[must_use]
    pub fn new(client: &ApiClient, cache: &QueryCache) -> Self {
        Self {
            session: SessionService::new(client.clone(), cache.clone()),
            shows: ShowService::new(client.clone(), cache.clone()),
            tracking: TrackingService::new(client.clone(), cache.clone()),
            timeline: TimelineService::new(client.clone(), cache.clone()),
            notifications: NotificationService::new(client.clone(), cache.clone()),
            watchlist: WatchlistService::new(client.clone(), cache.clone()),
            history: HistoryService::new(client.clone(), cache.clone()),
            streaming: StreamingService::new(client.clone(), cache.clone()),
            showtimes: ShowtimesService::new(client.clone(), cache.clone()),
        }
    }
}
