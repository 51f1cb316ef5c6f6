use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commander_stats::api::{build_router, cors_layer, state::AppState};
use commander_stats::calculate::{calculate, filter_games};
use commander_stats::config::AppConfig;
use commander_stats::models::{parse_player_counts, Filter, PlayStats};
use commander_stats::repository::Repository;
use commander_stats::storage::StorageConfig;

#[derive(Parser)]
#[command(name = "commander-stats")]
#[command(about = "Commander game tracker with deck and player statistics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print deck and player statistics
    Stats {
        /// Participant counts to include (e.g. "2,4"); default: all observed
        #[arg(long)]
        players: Option<String>,

        /// Minimum games for a deck to be listed
        #[arg(long)]
        min_plays_per_deck: Option<u32>,

        /// Minimum games for a player to be listed
        #[arg(long)]
        min_plays_per_player: Option<u32>,

        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Check every stored game for contiguous, distinct places
    Validate,

    /// Add a player
    AddPlayer {
        /// Player name
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir.clone() {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level.clone() {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting commander-stats v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Serve { host, port } => {
            let repo = Repository::load(storage)?;
            let state = AppState::new(repo, config.stats);
            let app = build_router(state).layer(cors_layer(&config.server.cors_origin));

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Stats {
            players,
            min_plays_per_deck,
            min_plays_per_player,
            json,
        } => {
            let repo = Repository::load(storage)?;
            let games = repo.games();

            let mut filter = Filter::default_for(games)
                .with_min_plays_per_deck(min_plays_per_deck.unwrap_or(config.stats.min_plays_per_deck))
                .with_min_plays_per_player(
                    min_plays_per_player.unwrap_or(config.stats.min_plays_per_player),
                );
            if let Some(raw) = players {
                let counts = parse_player_counts(&raw)
                    .with_context(|| format!("invalid --players list {:?}", raw))?;
                filter = filter.with_players(counts);
            }

            let stats = calculate(games, &filter);

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
                return Ok(());
            }

            println!(
                "{} of {} games eligible (player counts {:?}, observed {:?})",
                filter_games(games, &filter).len(),
                games.len(),
                filter.players,
                filter.existing_player_counts()
            );
            println!();
            print_table(
                "Decks",
                repo.decks()
                    .iter()
                    .map(|d| (d.name.as_str(), stats.deck(d.id))),
            );
            println!();
            print_table(
                "Players",
                repo.players()
                    .iter()
                    .map(|p| (p.name.as_str(), stats.player(p.id))),
            );
        }
        Commands::Validate => {
            let repo = Repository::load(storage)?;
            let mut failures = 0;
            for game in repo.games() {
                if let Err(e) = game.validate_places() {
                    tracing::error!("{}", e);
                    failures += 1;
                }
            }
            if failures > 0 {
                bail!("{} of {} games failed validation", failures, repo.games().len());
            }
            println!("All {} games valid", repo.games().len());
        }
        Commands::AddPlayer { name } => {
            let mut repo = Repository::load(storage)?;
            let player = repo.create_player(&name)?;
            println!("Added player {} ({})", player.name, player.id);
        }
    }

    Ok(())
}

/// Print a stats table; entities without enough games show dashes.
fn print_table<'a>(title: &str, rows: impl Iterator<Item = (&'a str, Option<&'a PlayStats>)>) {
    let mut rows: Vec<_> = rows.collect();
    rows.sort_by_key(|(name, _)| name.to_lowercase());

    println!(
        "{:<30} {:>5} {:>5} {:>7} {:>5} {:>5} {:>7} {:>6} {:>4}",
        title, "Games", "Wins", "Winrate", "Best", "Worst", "Average", "Median", "Mode"
    );
    for (name, stats) in rows {
        match stats {
            Some(s) => println!(
                "{:<30} {:>5} {:>5} {:>6.1}% {:>5} {:>5} {:>7.2} {:>6.1} {:>4}",
                name,
                s.games,
                s.wins,
                s.win_rate * 100.0,
                s.placing_best,
                s.placing_worst,
                s.placing_average,
                s.placing_median,
                s.placing_mode
            ),
            None => println!(
                "{:<30} {:>5} {:>5} {:>7} {:>5} {:>5} {:>7} {:>6} {:>4}",
                name, "-", "-", "-", "-", "-", "-", "-", "-"
            ),
        }
    }
}
