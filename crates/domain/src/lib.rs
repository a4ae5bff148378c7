//! Beacon Domain - Core types
//!
//! This crate defines the domain model for the Beacon show-tracking client:
//! the wire envelopes, request and response descriptors, credentials, and
//! the backend's resource shapes. All types here are pure Rust with no I/O.

pub mod auth;
pub mod envelope;
pub mod error;
pub mod history;
pub mod notification;
pub mod request;
pub mod response;
pub mod show;
pub mod showtimes;
pub mod streaming;
pub mod timeline;
pub mod tracking;
pub mod user;
pub mod watchlist;

pub use auth::{
    Claims, ClaimsError, LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest, TokenPair,
    bearer_header, decode_claims,
};
pub use envelope::{
    ApiResponse, ErrorBody, ErrorEnvelope, PageQuery, PaginatedMeta, PaginatedResponse,
};
pub use error::{DomainError, DomainResult};
pub use history::{
    HistoryStats, MarkWatchedRequest, NextEpisode, ShowProgress, UpdateHistoryRequest,
    WatchHistoryEntry,
};
pub use notification::{
    Notification, NotificationFilters, NotificationStatus, PaginatedNotifications, UnreadCount,
};
pub use request::{ApiRequest, HttpMethod, HttpRequest};
pub use response::{HttpResponse, StatusCode};
pub use show::{Episode, Season, Show, ShowRatings, SyncStatus};
pub use showtimes::{
    Cinema, CinemaShowtime, CinemasNearby, FilmShowtime, Geolocation, ShowtimesResponse,
};
pub use streaming::{DEFAULT_REGION, StreamingOptions, WatchProvider};
pub use timeline::{TimelineEvent, TimelineWindow};
pub use tracking::{TrackShowRequest, TrackedShow, UpdateTrackingRequest};
pub use user::{RegisterDeviceRequest, UpdateProfileRequest, UserDevice, UserProfile};
pub use watchlist::{
    AddToWatchlistRequest, UpdateWatchlistRequest, WatchlistItem, WatchlistPriority,
};
