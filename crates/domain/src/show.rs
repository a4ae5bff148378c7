//! Show catalog types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ratings keyed by source (`imdb_rating`, `rotten_tomatoes`, ...).
pub type ShowRatings = BTreeMap<String, Option<String>>;

/// A single episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    /// Episode id.
    pub id: String,
    /// Parent show id.
    pub show_id: String,
    /// Parent season id.
    pub season_id: String,
    /// Season number.
    pub season_number: u32,
    /// Episode number within the season.
    pub episode_number: u32,
    /// Title.
    #[serde(default)]
    pub title: Option<String>,
    /// Synopsis.
    #[serde(default)]
    pub overview: Option<String>,
    /// Air date (`YYYY-MM-DD`).
    #[serde(default)]
    pub air_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime_minutes: Option<u32>,
    /// Still image URL.
    #[serde(default)]
    pub still_url: Option<String>,
}

/// A season with its episodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    /// Season id.
    pub id: String,
    /// Parent show id.
    pub show_id: String,
    /// Season number.
    pub season_number: u32,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Synopsis.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster URL.
    #[serde(default)]
    pub poster_url: Option<String>,
    /// Premiere date.
    #[serde(default)]
    pub air_date: Option<String>,
    /// Announced episode count.
    #[serde(default)]
    pub episode_count: Option<u32>,
    /// Episodes known so far.
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// A show as returned by search and detail endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Show {
    /// Show id.
    pub id: String,
    /// Title.
    pub title: String,
    /// `tv` or `movie`.
    pub media_type: String,
    /// Production status.
    #[serde(default)]
    pub status: Option<String>,
    /// Synopsis.
    #[serde(default)]
    pub overview: Option<String>,
    /// Poster URL.
    #[serde(default)]
    pub poster_url: Option<String>,
    /// Backdrop URL.
    #[serde(default)]
    pub backdrop_url: Option<String>,
    /// Genres.
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    /// Broadcasting network.
    #[serde(default)]
    pub network: Option<String>,
    /// Premiere date.
    #[serde(default)]
    pub premiere_date: Option<String>,
    /// TMDB id.
    #[serde(default)]
    pub tmdb_id: Option<i64>,
    /// IMDb id.
    #[serde(default)]
    pub imdb_id: Option<String>,
    /// Seasons, only on the detail endpoint.
    #[serde(default)]
    pub seasons: Option<Vec<Season>>,
    /// Ratings, only on the detail endpoint.
    #[serde(default)]
    pub ratings: Option<ShowRatings>,
}

/// `GET /shows/{id}/sync-status` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Last metadata sync.
    pub last_synced_at: String,
    /// Number of seasons stored.
    pub seasons_count: u32,
    /// Number of episodes stored.
    pub episodes_count: u32,
}
