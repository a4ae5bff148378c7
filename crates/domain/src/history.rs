//! Watch history types.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::show::{Episode, Show};

/// Ratings run from 1 to 10.
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// One watched episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchHistoryEntry {
    /// Entry id.
    pub id: String,
    /// Owner.
    pub user_id: String,
    /// Show watched.
    pub show_id: String,
    /// Season number.
    pub season_number: u32,
    /// Episode number within the season.
    pub episode_number: u32,
    /// Episode id, when the episode is known to the catalog.
    #[serde(default)]
    pub episode_id: Option<String>,
    /// Rating, 1 to 10.
    #[serde(default)]
    pub rating: Option<u8>,
    /// Notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// When it was watched.
    pub watched_at: String,
    /// The show.
    #[serde(default)]
    pub show: Option<Show>,
    /// The episode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<Episode>,
}

/// `POST /history` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkWatchedRequest {
    /// Show watched.
    pub show_id: String,
    /// Season number.
    pub season_number: u32,
    /// Episode number.
    pub episode_number: u32,
    /// Rating, 1 to 10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// RFC 3339 timestamp; the backend uses now when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched_at: Option<String>,
}

impl MarkWatchedRequest {
    /// Marks one episode watched now, without rating or notes.
    #[must_use]
    pub fn episode(show_id: impl Into<String>, season_number: u32, episode_number: u32) -> Self {
        Self {
            show_id: show_id.into(),
            season_number,
            episode_number,
            rating: None,
            notes: None,
            watched_at: None,
        }
    }

    /// Checks what the backend would reject.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidBody`] for a zero season or episode
    /// number or a rating outside 1 to 10.
    pub fn validate(&self) -> DomainResult<()> {
        if self.season_number == 0 || self.episode_number == 0 {
            return Err(DomainError::InvalidBody(
                "season and episode numbers start at 1".to_string(),
            ));
        }
        validate_rating(self.rating)
    }
}

/// `PATCH /history/{id}` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateHistoryRequest {
    /// New rating, 1 to 10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// New notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateHistoryRequest {
    /// Checks the rating range.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidBody`] for a rating outside 1 to 10.
    pub fn validate(&self) -> DomainResult<()> {
        validate_rating(self.rating)
    }
}

fn validate_rating(rating: Option<u8>) -> DomainResult<()> {
    match rating {
        Some(rating) if !RATING_RANGE.contains(&rating) => Err(DomainError::InvalidBody(
            format!("rating must be 1-10, got {rating}"),
        )),
        _ => Ok(()),
    }
}

/// `GET /history/stats` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryStats {
    /// Episodes watched.
    pub total_episodes: u64,
    /// Distinct shows watched.
    pub total_shows: u64,
}

/// Season and episode of the next unwatched episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextEpisode {
    /// Season number.
    pub season_number: u32,
    /// Episode number.
    pub episode_number: u32,
}

/// `GET /history/progress/{show_id}` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowProgress {
    /// Episodes known for the show.
    pub total_episodes: u32,
    /// Episodes watched.
    pub watched_episodes: u32,
    /// Percentage with two decimals.
    pub percent_complete: f64,
    /// Next episode after the furthest one watched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_episode: Option<NextEpisode>,
}
