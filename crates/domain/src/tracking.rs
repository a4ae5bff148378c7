//! Tracked show (subscription) types.

use serde::{Deserialize, Serialize};

/// A show the user tracks, with its notification preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedShow {
    /// Tracked show id.
    pub show_id: String,
    /// Show title.
    pub show_title: String,
    /// Poster URL.
    #[serde(default)]
    pub poster_url: String,
    /// Whether the show is a favorite.
    pub is_favorite: bool,
    /// Notify when a new episode airs.
    pub notify_new_episode: bool,
    /// Notify when a new season is announced.
    pub notify_new_season: bool,
    /// Notify on status changes (renewed, cancelled, ...).
    pub notify_status_change: bool,
    /// Lead time for episode reminders.
    pub notify_hours_before: u32,
    /// Last watched season.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_watched_season: Option<u32>,
    /// Last watched episode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_watched_episode: Option<u32>,
    /// Production status.
    pub status: String,
    /// Next known air date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_episode_date: Option<String>,
}

/// `POST /tracking` body. Identify the show by `show_id` or `tmdb_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackShowRequest {
    /// Internal show id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_id: Option<String>,
    /// TMDB id, for shows not yet imported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<i64>,
    /// Mark as favorite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    /// Notify on new episodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_new_episode: Option<bool>,
    /// Notify on new seasons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_new_season: Option<bool>,
    /// Notify on status changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_status_change: Option<bool>,
    /// Reminder lead time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_hours_before: Option<u32>,
}

impl TrackShowRequest {
    /// Tracks a show by its internal id with default preferences.
    #[must_use]
    pub fn by_show_id(show_id: impl Into<String>) -> Self {
        Self {
            show_id: Some(show_id.into()),
            ..Self::default()
        }
    }
}

/// `PATCH /tracking/{show_id}` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTrackingRequest {
    /// Mark as favorite.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
    /// Notify on new episodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_new_episode: Option<bool>,
    /// Notify on new seasons.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_new_season: Option<bool>,
    /// Notify on status changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_status_change: Option<bool>,
    /// Reminder lead time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_hours_before: Option<u32>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_track_request_omits_unset_preferences() {
        let body = TrackShowRequest::by_show_id("s1");
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"show_id":"s1"}"#);
    }
}
