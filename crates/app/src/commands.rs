//! Command execution against the wired services.

use std::sync::Arc;

use anyhow::{Context, Result};
use beacon_application::ports::SignInRedirect;
use beacon_application::{ApiClient, BeaconServices, QueryCache, SessionState, TokenStore};
use beacon_domain::{
    AddToWatchlistRequest, LoginRequest, RegisterRequest, UpdateHistoryRequest,
    UpdateWatchlistRequest,
};
use beacon_infrastructure::{FileCredentialStorage, ReqwestHttpClient, Settings, SystemClock};
use serde::Serialize;

use crate::cli::{Cli, Command, HistoryCommand, WatchlistCommand};

/// Tells the user to sign in again once the session is gone.
#[derive(Debug, Default)]
struct LoginHint;

impl SignInRedirect for LoginHint {
    fn redirect(&self, entry_point: &str) {
        tracing::warn!(entry_point, "Session expired, run `beacon login` to sign in again");
    }
}

/// Everything a command needs.
pub struct AppContext {
    client: ApiClient,
    services: BeaconServices,
}

impl AppContext {
    /// Builds the client stack from settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let config = settings.client_config()?;
        let credentials = settings.credentials_path()?;
        tracing::debug!(path = %credentials.display(), "Using credential file");

        let clock = Arc::new(SystemClock::new());
        let transport = ReqwestHttpClient::with_user_agent(&settings.user_agent)
            .context("failed to build HTTP client")?;
        let tokens = TokenStore::new(
            Arc::new(FileCredentialStorage::new(credentials)),
            clock.clone(),
        );
        let client = ApiClient::new(config, Arc::new(transport), tokens)
            .with_sign_in_redirect(Arc::new(LoginHint));
        let cache = QueryCache::new(clock);
        let services = BeaconServices::new(&client, &cache);

        Ok(Self { client, services })
    }
}

/// Runs one command and prints its result.
pub async fn run(cli: Cli, context: AppContext) -> Result<()> {
    let AppContext { client, services } = context;

    match cli.command {
        Command::Login(args) => {
            let profile = services
                .session
                .login(&LoginRequest {
                    email: args.email,
                    password: args.password,
                })
                .await?;
            print_json(&profile)
        }
        Command::Register(args) => {
            let profile = services
                .session
                .register(&RegisterRequest {
                    email: args.email,
                    username: args.username,
                    password: args.password,
                })
                .await?;
            print_json(&profile)
        }
        Command::Logout => {
            services.session.logout().await?;
            println!("Signed out");
            Ok(())
        }
        Command::Whoami => match services.session.restore().await {
            SessionState::SignedIn(profile) => print_json(&profile),
            SessionState::SignedOut => {
                println!("Not signed in");
                Ok(())
            }
        },
        Command::Status => {
            let status = client.tokens().status().await?;
            println!("{}", status.display_message());
            Ok(())
        }
        Command::Search { query } => print_json(&services.shows.search(&query).await?),
        Command::Show { id } => print_json(&services.shows.detail(&id).await?),
        Command::Season { id, number } => print_json(&services.shows.season(&id, number).await?),
        Command::Upcoming { id } => print_json(&services.shows.upcoming_episodes(&id).await?),
        Command::Track(args) => {
            services.tracking.track(&args.into_request()).await?;
            println!("Tracking");
            Ok(())
        }
        Command::Untrack { id } => {
            services.tracking.untrack(&id).await?;
            println!("No longer tracking {id}");
            Ok(())
        }
        Command::Favorite { id } => {
            services.tracking.toggle_favorite(&id).await?;
            println!("Toggled favorite for {id}");
            Ok(())
        }
        Command::Tracking { favorites } => {
            let shows = if favorites {
                services.tracking.favorites().await?
            } else {
                services.tracking.list().await?
            };
            print_json(&shows)
        }
        Command::Timeline(args) => {
            let events = match (args.from, args.to) {
                (Some(from), Some(to)) => services.timeline.range(&from, &to).await?,
                _ => services.timeline.window(args.window).await?,
            };
            print_json(&events)
        }
        Command::Notifications(args) => {
            print_json(&services.notifications.list(&args.into()).await?)
        }
        Command::Read { id } => {
            services.notifications.mark_read(&id).await?;
            println!("Marked {id} as read");
            Ok(())
        }
        Command::ReadAll => {
            services.notifications.mark_all_read().await?;
            println!("Marked all notifications as read");
            Ok(())
        }
        Command::Unread => print_json(&services.notifications.unread_count().await?),
        Command::Watchlist(command) => run_watchlist(command, &services).await,
        Command::History(command) => run_history(command, &services).await,
        Command::Streaming { id, region } => {
            let options = services.streaming.options(&id, &region).await?;
            if options.is_unavailable() {
                tracing::info!(show = %id, region = %options.region, "No streaming providers");
            }
            print_json(&options)
        }
        Command::Showtimes { id, at, date } => {
            print_json(&services.showtimes.showtimes(&id, at, date).await?)
        }
        Command::Cinemas { at } => print_json(&services.showtimes.cinemas_nearby(at).await?),
    }
}

async fn run_watchlist(command: WatchlistCommand, services: &BeaconServices) -> Result<()> {
    match command {
        WatchlistCommand::List(page) => print_json(&services.watchlist.list(page.into()).await?),
        WatchlistCommand::Add {
            id,
            priority,
            notes,
        } => {
            services
                .watchlist
                .add(&AddToWatchlistRequest {
                    show_id: id.clone(),
                    priority,
                    notes,
                })
                .await?;
            println!("Added {id} to the watchlist");
            Ok(())
        }
        WatchlistCommand::Update {
            id,
            priority,
            notes,
        } => {
            services
                .watchlist
                .update(&id, &UpdateWatchlistRequest { priority, notes })
                .await?;
            println!("Updated {id}");
            Ok(())
        }
        WatchlistCommand::Remove { id } => {
            services.watchlist.remove(&id).await?;
            println!("Removed {id} from the watchlist");
            Ok(())
        }
    }
}

async fn run_history(command: HistoryCommand, services: &BeaconServices) -> Result<()> {
    match command {
        HistoryCommand::List(page) => print_json(&services.history.list(page.into()).await?),
        HistoryCommand::Stats => print_json(&services.history.stats().await?),
        HistoryCommand::Progress { id } => print_json(&services.history.progress(&id).await?),
        HistoryCommand::Watched(args) => {
            let request = args.into_request();
            services.history.mark_watched(&request).await?;
            println!(
                "Marked S{:02}E{:02} watched",
                request.season_number, request.episode_number
            );
            Ok(())
        }
        HistoryCommand::Update { id, rating, notes } => {
            services
                .history
                .update(&id, &UpdateHistoryRequest { rating, notes })
                .await?;
            println!("Updated {id}");
            Ok(())
        }
        HistoryCommand::Remove { id } => {
            services.history.remove(&id).await?;
            println!("Removed {id}");
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}
