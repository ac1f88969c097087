use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::collections::{BTreeMap, HashSet};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use will_win::backend::cache::CacheConfig;
use will_win::backend::{create_client, rest, BackendClient, BackendError, NewLeague, Snapshot};
use will_win::catalog::Catalog;
use will_win::config::{get_config_path, load_config, validate_config, Config};
use will_win::credentials::{
    ensure_access_token, resolve_credentials, resolve_url, CredentialError, Credentials,
    ENV_URL_VAR,
};
use will_win::fetch::{load_snapshot_or_cached, Source};
use will_win::output;
use will_win::scoring::{
    compare_ballots, display_name, league_standings, ranked_nominees, resolve_friend, winner_map,
    Ballot, PickKind, RankedNominee,
};
use will_win::share::{write_card, ShareCard};
use will_win::state::{AppState, PickRejected};
use will_win::stderr_buffer::BufferedStderr;
use will_win::tui::{resolve_theme, App, Connection, Theme};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_LOCKED: i32 = 5;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
enum CardFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum LeagueCommand {
    /// Create a league for this show and print its invite code
    Create {
        /// League name
        name: String,
    },
    /// Join a league with an invite code
    Join {
        invite_code: String,
    },
}

#[derive(Subcommand, Debug)]
enum CacheCommand {
    /// Delete cached snapshots
    Clear,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show your ballot with progress and community share (default)
    Picks,
    /// Set or clear your Will Win / Should Win pick for a category
    #[command(group(
        ArgGroup::new("change")
            .required(true)
            .multiple(true)
            .args(["will", "should", "clear_will", "clear_should"])
    ))]
    Pick {
        /// Category id, as shown by `will-win categories`
        category: String,
        /// Nominee you think will win
        #[arg(long, conflicts_with = "clear_will")]
        will: Option<String>,
        /// Nominee you think should win
        #[arg(long, conflicts_with = "clear_should")]
        should: Option<String>,
        #[arg(long)]
        clear_will: bool,
        #[arg(long)]
        clear_should: bool,
    },
    /// List categories and nominees
    Categories {
        /// Glob matched against category id or name, e.g. "best_*"
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Community consensus per category
    Community {
        #[arg(short, long)]
        filter: Option<String>,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Scores once results are published, entrants before that
    Leaderboard {
        /// Restrict to one league's members
        #[arg(long)]
        league: Option<String>,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Compare your ballot with someone else's
    Compare {
        /// User id, display name or email
        friend: String,
    },
    /// Leagues you belong to
    Leagues,
    /// Create or join a league
    League {
        #[command(subcommand)]
        command: LeagueCommand,
    },
    /// Render a shareable summary of your ballot
    Share {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t)]
        format: CardFormat,
    },
    /// Interactive ballot
    Tui {
        #[arg(long, value_enum, default_value_t)]
        theme: Theme,
    },
    /// Create a config file interactively
    Init,
    /// Manage the offline snapshot cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Parser, Debug)]
#[command(name = "will-win")]
#[command(about = "Will Win / Should Win awards ballots", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/will-win/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Always fetch live data; never read or write the snapshot cache
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Failures that map to an exit code of their own
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    Auth(String),
}

fn exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if cause.is::<PickRejected>() {
            return EXIT_LOCKED;
        }
        if cause.is::<CredentialError>() {
            return EXIT_AUTH;
        }
        if let Some(e) = cause.downcast_ref::<CliError>() {
            return match e {
                CliError::Config(_) => EXIT_CONFIG,
                CliError::Auth(_) => EXIT_AUTH,
            };
        }
        if let Some(e) = cause.downcast_ref::<BackendError>() {
            return if e.is_auth() { EXIT_AUTH } else { EXIT_NETWORK };
        }
    }
    EXIT_CONFIG
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "warn,will_win=debug" } else { "warn" })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(BufferedStderr)
                .with_target(verbose)
                .with_ansi(std::io::stderr().is_terminal())
                .without_time(),
        )
        .init();
}

fn load_validated_config(path: Option<PathBuf>) -> Result<Config> {
    let config = load_config(path).map_err(|e| CliError::Config(format!("{:#}", e)))?;

    if let Err(errors) = validate_config(&config) {
        return Err(CliError::Config(format!(
            "Config errors:\n  - {}",
            errors.join("\n  - ")
        ))
        .into());
    }

    Ok(config)
}

/// Commands that never touch the backend work without a config file
fn config_or_default(path: Option<PathBuf>) -> Result<Config> {
    if path.is_none() && !get_config_path().exists() {
        return Ok(Config::default());
    }
    load_validated_config(path)
}

/// Catalog spelling of a nominee typed on the command line
fn canonical_nominee(catalog: &Catalog, category_id: &str, input: &str) -> String {
    let input = input.trim();
    catalog
        .category(category_id)
        .and_then(|c| c.nominees.iter().find(|n| n.eq_ignore_ascii_case(input)))
        .cloned()
        .unwrap_or_else(|| input.to_string())
}

/// A configured client for one show
struct Session {
    config: Config,
    catalog: Catalog,
    base_url: String,
    credentials: Credentials,
    client: BackendClient,
    cache_config: CacheConfig,
}

impl Session {
    fn open(config: Config, no_cache: bool) -> Result<Self> {
        let base_url = resolve_url(&config).ok_or_else(|| {
            CliError::Config(format!(
                "No backend URL: set {} or backend.url in the config file",
                ENV_URL_VAR
            ))
        })?;
        let credentials = resolve_credentials(&config)?;
        let client = create_client(&base_url, &credentials)
            .map_err(|e| CliError::Config(format!("{:#}", e)))?;

        Ok(Self {
            catalog: config.catalog(),
            config,
            base_url,
            credentials,
            client,
            cache_config: CacheConfig { enabled: !no_cache },
        })
    }

    fn user_id(&self) -> Result<String> {
        Ok(self.credentials.user_id()?.to_string())
    }

    /// Writes need the user's token; the client is rebuilt when one is added
    fn make_writable(&mut self) -> Result<()> {
        let added = ensure_access_token(&mut self.credentials)
            .map_err(|e| CliError::Auth(format!("{:#}", e)))?;
        if added {
            self.client = create_client(&self.base_url, &self.credentials)?;
        }
        Ok(())
    }

    /// Fetch everything for the show into an `AppState`, falling back to the
    /// cache when offline
    async fn load_state(&self, user_id: Option<String>) -> Result<AppState> {
        let (snapshot, source) =
            load_snapshot_or_cached(&self.client, &self.catalog.id, &self.cache_config).await?;

        if source == Source::Cache {
            let age = snapshot
                .fetched_at
                .map(|t| output::format_age(Utc::now() - t))
                .unwrap_or_else(|| "unknown".to_string());
            eprintln!("Offline: showing cached ballots ({} old)", age);
        }

        let mut state = AppState::new(self.catalog.clone(), user_id);
        state.apply_snapshot(snapshot, source == Source::Cache);
        Ok(state)
    }
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        eprintln!("Failed to install rustls crypto provider");
        std::process::exit(EXIT_CONFIG);
    }

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let start_time = Instant::now();
    let code = match run(cli).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code(&e)
        }
    };
    debug!(elapsed = ?start_time.elapsed(), code, "finished");

    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<()> {
    let command = cli.command.unwrap_or(Commands::Picks);
    let config_path = cli.config.map(PathBuf::from);
    let use_colors = output::should_use_colors();

    match command {
        Commands::Init => {
            will_win::config::init::run_init_wizard(config_path)
                .map_err(|e| CliError::Config(format!("{:#}", e)))?;
        }

        Commands::Cache {
            command: CacheCommand::Clear,
        } => {
            will_win::backend::cache::clear_cache()?;
            println!("Cache cleared.");
        }

        Commands::Categories { filter } => {
            let catalog = config_or_default(config_path)?.catalog();
            let categories = catalog
                .filter(filter.as_deref())
                .map_err(|e| CliError::Config(format!("{:#}", e)))?;
            println!("{}", output::format_categories(&categories, use_colors));
        }

        Commands::Picks => {
            let session = Session::open(load_validated_config(config_path)?, cli.no_cache)?;
            let user_id = session.user_id()?;
            let state = session.load_state(Some(user_id)).await?;

            println!("{}", state.catalog.headline());
            println!(
                "{} · {}",
                state.phase().label(),
                output::format_progress(&state.progress, use_colors)
            );
            println!();
            println!(
                "{}",
                output::format_ballot(&state.catalog, &state.ballot, &state.aggregates, use_colors)
            );
        }

        Commands::Pick {
            category,
            will,
            should,
            clear_will,
            clear_should,
        } => {
            let mut session = Session::open(load_validated_config(config_path)?, cli.no_cache)?;
            let user_id = session.user_id()?;
            session.make_writable()?;

            // Lock state must be live; a cached snapshot could let a closed ballot through
            let show_id = session.catalog.id.clone();
            let (picks, status) = futures::try_join!(
                rest::fetch_user_picks(&session.client, &show_id, &user_id),
                rest::fetch_show_status(&session.client, &show_id),
            )
            .context("Failed to fetch your ballot")?;

            let mut state = AppState::new(session.catalog.clone(), Some(user_id));
            state.apply_snapshot(
                Snapshot {
                    show_id,
                    picks,
                    status,
                    fetched_at: Some(Utc::now()),
                    ..Default::default()
                },
                false,
            );

            let will = will.map(|n| canonical_nominee(&session.catalog, &category, &n));
            let should = should.map(|n| canonical_nominee(&session.catalog, &category, &n));

            let mut row = None;
            if clear_will || will.is_some() {
                row = Some(state.set_pick(&category, PickKind::WillWin, will.as_deref())?);
            }
            if clear_should || should.is_some() {
                row = Some(state.set_pick(&category, PickKind::ShouldWin, should.as_deref())?);
            }
            let row = row.ok_or_else(|| CliError::Config("Nothing to change".to_string()))?;

            rest::upsert_pick(&session.client, &row)
                .await
                .context("Failed to save pick")?;

            let name = session
                .catalog
                .category(&category)
                .map_or(category.as_str(), |c| c.name.as_str());
            println!(
                "Saved {}: {} {} · {} {}",
                name,
                PickKind::WillWin.symbol(),
                row.will().unwrap_or("-"),
                PickKind::ShouldWin.symbol(),
                row.should().unwrap_or("-"),
            );
            println!("{}", output::format_progress(&state.progress, use_colors));
        }

        Commands::Community { filter, format } => {
            let session = Session::open(load_validated_config(config_path)?, cli.no_cache)?;
            let user_id = session.credentials.user_id.clone();
            let state = session.load_state(user_id).await?;
            let categories = state
                .catalog
                .filter(filter.as_deref())
                .map_err(|e| CliError::Config(format!("{:#}", e)))?;

            match format {
                OutputFormat::Table => println!(
                    "{}",
                    output::format_consensus(&categories, &state.aggregates, use_colors)
                ),
                OutputFormat::Tsv => print!(
                    "{}",
                    output::format_consensus_tsv(&categories, &state.aggregates)
                ),
                OutputFormat::Json => {
                    let ranked: BTreeMap<&str, Vec<RankedNominee>> = categories
                        .iter()
                        .map(|c| {
                            let rows = state
                                .aggregates
                                .get(&c.id)
                                .map(|consensus| ranked_nominees(consensus, Some(*c)))
                                .unwrap_or_default();
                            (c.id.as_str(), rows)
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&ranked)?);
                }
            }
        }

        Commands::Leaderboard { league, format } => {
            let session = Session::open(load_validated_config(config_path)?, cli.no_cache)?;
            let me = session.credentials.user_id.clone();
            let state = session.load_state(me.clone()).await?;

            let standings = match &league {
                None => state.standings.clone(),
                Some(league_id) => {
                    let found = rest::fetch_league(&session.client, league_id).await?;
                    let found = found.ok_or_else(|| {
                        CliError::Config(format!("No league with id '{}'", league_id))
                    })?;
                    let members: HashSet<String> =
                        rest::fetch_league_members(&session.client, &found.id)
                            .await?
                            .into_iter()
                            .map(|m| m.user_id)
                            .collect();
                    debug!(league = %found.name, members = members.len(), "league leaderboard");
                    if format == OutputFormat::Table {
                        println!("{}", found.name);
                        println!();
                    }
                    league_standings(
                        state.status(),
                        &state.snapshot.picks,
                        &members,
                        &state.snapshot.profiles,
                        &winner_map(&state.snapshot.winners),
                    )
                }
            };

            match format {
                OutputFormat::Table => println!(
                    "{}",
                    output::format_leaderboard(&standings, me.as_deref(), use_colors)
                ),
                OutputFormat::Tsv => print!("{}", output::format_leaderboard_tsv(&standings)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&standings)?),
            }
        }

        Commands::Compare { friend } => {
            let session = Session::open(load_validated_config(config_path)?, cli.no_cache)?;
            let user_id = session.user_id()?;
            let state = session.load_state(Some(user_id)).await?;

            let friend_id = resolve_friend(&state.snapshot.profiles, &state.snapshot.picks, &friend)
                .ok_or_else(|| CliError::Config(format!("No user matching '{}'", friend)))?;
            let theirs = Ballot::for_user(&state.snapshot.picks, &friend_id, &state.catalog.id);
            let comparison = compare_ballots(&state.ballot, &theirs, &state.catalog.categories);
            let friend_name = display_name(&state.snapshot.profiles, &friend_id);

            println!(
                "{}",
                output::format_comparison(&comparison, friend_name, use_colors)
            );
        }

        Commands::Leagues => {
            let session = Session::open(load_validated_config(config_path)?, cli.no_cache)?;
            let user_id = session.user_id()?;
            let leagues =
                rest::fetch_leagues_for_user(&session.client, &session.catalog.id, &user_id)
                    .await
                    .context("Failed to fetch leagues")?;
            println!("{}", output::format_leagues(&leagues, use_colors));
        }

        Commands::League { command } => {
            let mut session = Session::open(load_validated_config(config_path)?, cli.no_cache)?;
            let user_id = session.user_id()?;
            session.make_writable()?;

            match command {
                LeagueCommand::Create { name } => {
                    let name = name.trim().to_string();
                    if name.is_empty() {
                        return Err(CliError::Config("League name cannot be empty".to_string()).into());
                    }
                    let league = rest::create_league(
                        &session.client,
                        &NewLeague {
                            name,
                            show_id: session.catalog.id.clone(),
                            owner_id: user_id,
                        },
                    )
                    .await
                    .context("Failed to create league")?;

                    println!("Created league '{}' ({})", league.name, league.id);
                    match &league.invite_code {
                        Some(code) => println!("Invite code: {}", code),
                        None => println!("No invite code was assigned yet."),
                    }
                }
                LeagueCommand::Join { invite_code } => {
                    let league = rest::find_league_by_invite(&session.client, invite_code.trim())
                        .await?
                        .ok_or_else(|| {
                            CliError::Config(format!("No league with invite code '{}'", invite_code))
                        })?;
                    if league.show_id != session.catalog.id {
                        return Err(CliError::Config(format!(
                            "League '{}' is for {}, not {}",
                            league.name, league.show_id, session.catalog.id
                        ))
                        .into());
                    }

                    rest::join_league(&session.client, &league.id, &user_id)
                        .await
                        .context("Failed to join league")?;
                    println!("Joined league '{}'", league.name);
                }
            }
        }

        Commands::Share { output: path, format } => {
            let session = Session::open(load_validated_config(config_path)?, cli.no_cache)?;
            let user_id = session.user_id()?;
            let state = session.load_state(Some(user_id.clone())).await?;

            let name = display_name(&state.snapshot.profiles, &user_id);
            let card = ShareCard::new(&state.catalog, &state.ballot, name);
            let contents = match format {
                CardFormat::Text => card.render_text(),
                CardFormat::Json => card.render_json()?,
            };

            match path {
                Some(path) => {
                    write_card(&path, &contents)?;
                    eprintln!("Wrote share card to {}", path.display());
                }
                None => println!("{}", contents),
            }
        }

        Commands::Tui { theme } => {
            let mut session = Session::open(load_validated_config(config_path)?, cli.no_cache)?;
            let user_id = session.credentials.user_id.clone();
            if user_id.is_some() {
                session.make_writable()?;
            }

            let refresh_interval = session
                .config
                .refresh_interval()
                .map_err(|e| CliError::Config(format!("{:#}", e)))?;
            let state = AppState::new(session.catalog.clone(), user_id);
            let app = App::new(state, refresh_interval, resolve_theme(theme));

            will_win::tui::run_tui(
                app,
                Connection {
                    client: session.client,
                    base_url: session.base_url,
                    credentials: session.credentials,
                    cache_config: session.cache_config,
                },
            )
            .await?;
        }
    }

    Ok(())
}
