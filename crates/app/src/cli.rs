//! Command-line surface.

use std::path::PathBuf;

use beacon_domain::{
    DEFAULT_REGION, Geolocation, MarkWatchedRequest, NotificationFilters, PageQuery,
    TimelineWindow, TrackShowRequest, WatchlistPriority,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Beacon show-tracking client.
#[derive(Debug, Parser)]
#[command(name = "beacon", version, about = "Track TV shows against a Beacon server")]
pub struct Cli {
    /// API root, e.g. `http://localhost:8080/api/v1`.
    #[arg(long, global = true, env = "BEACON_API_URL")]
    pub api_url: Option<String>,

    /// Settings file.
    #[arg(long, global = true, default_value = "beacon.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with email and password.
    Login(LoginArgs),
    /// Create an account and sign in.
    Register(RegisterArgs),
    /// Revoke the session and forget stored credentials.
    Logout,
    /// Show the signed-in profile.
    Whoami,
    /// Show whether stored credentials are usable.
    Status,
    /// Search the show catalog.
    Search {
        /// Search term, at least two characters.
        query: String,
    },
    /// Show details.
    Show {
        /// Show id.
        id: String,
    },
    /// Season details with episodes.
    Season {
        /// Show id.
        id: String,
        /// Season number, starting at 1.
        number: u32,
    },
    /// Upcoming episodes of a show.
    Upcoming {
        /// Show id.
        id: String,
    },
    /// Start tracking a show.
    Track(TrackArgs),
    /// Stop tracking a show.
    Untrack {
        /// Show id.
        id: String,
    },
    /// Toggle the favorite flag of a tracked show.
    Favorite {
        /// Show id.
        id: String,
    },
    /// List tracked shows.
    Tracking {
        /// Only favorites.
        #[arg(long)]
        favorites: bool,
    },
    /// Timeline events for a window or a date range.
    Timeline(TimelineArgs),
    /// List notifications.
    Notifications(NotificationArgs),
    /// Mark one notification as read.
    Read {
        /// Notification id.
        id: String,
    },
    /// Mark every notification as read.
    ReadAll,
    /// Number of unread notifications.
    Unread,
    /// Shows queued to watch later.
    #[command(subcommand)]
    Watchlist(WatchlistCommand),
    /// Watched episodes.
    #[command(subcommand)]
    History(HistoryCommand),
    /// Where a show can be streamed, rented or bought.
    Streaming {
        /// Show id.
        id: String,
        /// Region code.
        #[arg(long, default_value = DEFAULT_REGION)]
        region: String,
    },
    /// Cinema showtimes of a movie near a location.
    Showtimes {
        /// Show id of a movie.
        id: String,
        /// Location as `lat;lng`.
        #[arg(long, allow_hyphen_values = true)]
        at: Geolocation,
        /// Day, `YYYY-MM-DD`. Defaults to the server's today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Cinemas near a location.
    Cinemas {
        /// Location as `lat;lng`.
        #[arg(long, allow_hyphen_values = true)]
        at: Geolocation,
    },
}

/// `watchlist` subcommands.
#[derive(Debug, Subcommand)]
pub enum WatchlistCommand {
    /// List queued shows.
    List(PageArgs),
    /// Queue a show.
    Add {
        /// Show id.
        id: String,
        /// `high`, `medium` or `low`.
        #[arg(long)]
        priority: Option<WatchlistPriority>,
        /// Notes.
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change priority or notes.
    Update {
        /// Show id.
        id: String,
        /// `high`, `medium` or `low`.
        #[arg(long)]
        priority: Option<WatchlistPriority>,
        /// Notes.
        #[arg(long)]
        notes: Option<String>,
    },
    /// Remove a show.
    Remove {
        /// Show id.
        id: String,
    },
}

/// `history` subcommands.
#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List watched episodes.
    List(PageArgs),
    /// Episode and show totals.
    Stats,
    /// Progress through one show.
    Progress {
        /// Show id.
        id: String,
    },
    /// Mark an episode watched.
    Watched(WatchedArgs),
    /// Rate or annotate an entry.
    Update {
        /// History entry id.
        id: String,
        /// Rating, 1 to 10.
        #[arg(long)]
        rating: Option<u8>,
        /// Notes.
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete an entry.
    Remove {
        /// History entry id.
        id: String,
    },
}

/// Page selection.
#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page number.
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Page size.
    #[arg(long, default_value_t = 20)]
    pub per_page: u32,
}

impl From<PageArgs> for PageQuery {
    fn from(args: PageArgs) -> Self {
        Self {
            page: args.page,
            per_page: args.per_page,
        }
    }
}

/// Episode for `history watched`.
#[derive(Debug, Args)]
pub struct WatchedArgs {
    /// Show id.
    pub id: String,
    /// Season number.
    pub season: u32,
    /// Episode number.
    pub episode: u32,
    /// Rating, 1 to 10.
    #[arg(long)]
    pub rating: Option<u8>,
    /// Notes.
    #[arg(long)]
    pub notes: Option<String>,
}

impl WatchedArgs {
    /// Builds the request body.
    pub fn into_request(self) -> MarkWatchedRequest {
        MarkWatchedRequest {
            rating: self.rating,
            notes: self.notes,
            ..MarkWatchedRequest::episode(self.id, self.season, self.episode)
        }
    }
}

/// Credentials for `login`.
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email.
    #[arg(long)]
    pub email: String,
    /// Account password.
    #[arg(long, env = "BEACON_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// New account for `register`.
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Account email.
    #[arg(long)]
    pub email: String,
    /// Public username.
    #[arg(long)]
    pub username: String,
    /// Account password.
    #[arg(long, env = "BEACON_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Show to track.
#[derive(Debug, Args)]
pub struct TrackArgs {
    /// Internal show id.
    #[arg(conflicts_with = "tmdb_id", required_unless_present = "tmdb_id")]
    pub id: Option<String>,
    /// TMDB id, for shows not imported yet.
    #[arg(long)]
    pub tmdb_id: Option<i64>,
    /// Mark as favorite right away.
    #[arg(long)]
    pub favorite: bool,
}

impl TrackArgs {
    /// Builds the request body.
    pub fn into_request(self) -> TrackShowRequest {
        TrackShowRequest {
            show_id: self.id,
            tmdb_id: self.tmdb_id,
            is_favorite: self.favorite.then_some(true),
            ..TrackShowRequest::default()
        }
    }
}

/// Window or date range.
#[derive(Debug, Args)]
pub struct TimelineArgs {
    /// `today`, `week` or `upcoming`.
    #[arg(default_value = "week", conflicts_with_all = ["from", "to"])]
    pub window: TimelineWindow,
    /// Range start date.
    #[arg(long, requires = "to")]
    pub from: Option<String>,
    /// Range end date.
    #[arg(long, requires = "from")]
    pub to: Option<String>,
}

/// Notification filters.
#[derive(Debug, Args)]
pub struct NotificationArgs {
    /// Status filter, e.g. `unread`.
    #[arg(long)]
    pub status: Option<String>,
    /// Notification type filter.
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// Page number.
    #[arg(long)]
    pub page: Option<u32>,
    /// Page size.
    #[arg(long)]
    pub per_page: Option<u32>,
}

impl From<NotificationArgs> for NotificationFilters {
    fn from(args: NotificationArgs) -> Self {
        Self {
            status: args.status,
            kind: args.kind,
            page: args.page,
            per_page: args.per_page,
            ..Self::default()
        }
    }
}
