use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use americano::api::state::AppState;
use americano::config::AppConfig;
use americano::engine::{LeaderboardRow, Score};
use americano::models::{Game, Tournament};
use americano::storage::{StorageConfig, TournamentStore};

#[derive(Parser)]
#[command(name = "americano")]
#[command(about = "Padel Americano round scheduler")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

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

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },

    /// Create a new tournament
    Create {
        /// Tournament name
        #[arg(long)]
        name: String,

        /// Comma-separated player names
        #[arg(long, value_delimiter = ',')]
        players: Vec<String>,

        /// Number of courts (defaults to the configured value)
        #[arg(long)]
        courts: Option<u32>,
    },

    /// List stored tournaments
    List,

    /// Show a tournament and its current round
    Show {
        /// Tournament ID
        id: String,
    },

    /// Schedule the next round
    NextRound {
        /// Tournament ID
        id: String,
    },

    /// Submit scores for the current round, one per court (e.g. 6-3)
    Scores {
        /// Tournament ID
        id: String,

        /// Round number
        round: u32,

        /// Scores in court order
        #[arg(required = true)]
        scores: Vec<String>,
    },

    /// Print the leaderboard
    Leaderboard {
        /// Tournament ID
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(std::path::Path::new(&cli.config))
        .with_context(|| format!("Failed to load config from {}", cli.config))?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(dir);
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    let json = cli.json_logs;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::debug!("Starting americano v{}", env!("CARGO_PKG_VERSION"));

    let store = TournamentStore::new(&StorageConfig::new(config.data_dir.clone()));

    match cli.command {
        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let state = AppState {
                store: Arc::new(store),
                config: Arc::new(config),
                write_lock: Arc::new(tokio::sync::Mutex::new(())),
            };
            let mut app = americano::api::build_router(state);
            if access_log {
                app = app.layer(TraceLayer::new_for_http());
            }

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Create {
            name,
            players,
            courts,
        } => {
            let players = players
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            let courts = courts.unwrap_or(config.tournament.default_courts);
            let tournament = Tournament::create(name, players, courts)?;
            store.save(&tournament)?;
            println!("Created tournament {} ({})", tournament.id, tournament.name);
        }
        Commands::List => {
            let summaries = store.list()?;
            if summaries.is_empty() {
                println!("No tournaments yet.");
            }
            for s in summaries {
                println!("{:<12} {}", s.id, s.name);
            }
        }
        Commands::Show { id } => {
            let tournament = load(&store, &id)?;
            let engine = &tournament.americano;
            println!("{} ({})", tournament.name, tournament.id);
            println!("Created:  {}", tournament.created_at.format("%Y-%m-%d %H:%M"));
            println!("Players:  {}", engine.players().join(", "));
            println!("Courts:   {}", engine.courts());
            let (round, games) = tournament.current_round();
            if round == 0 {
                println!("No rounds scheduled yet.");
            } else {
                println!();
                print_round(round, games);
            }
        }
        Commands::NextRound { id } => {
            let mut tournament = load(&store, &id)?;
            let games = tournament.next_round()?;
            store.save(&tournament)?;
            print_round(tournament.americano.round_idx(), &games);
        }
        Commands::Scores { id, round, scores } => {
            let mut tournament = load(&store, &id)?;
            tournament.submit_scores(round, &scores)?;
            store.save(&tournament)?;
            print_leaderboard(&tournament.leaderboard());
        }
        Commands::Leaderboard { id } => {
            let tournament = load(&store, &id)?;
            print_leaderboard(&tournament.leaderboard());
        }
    }

    Ok(())
}

fn load(store: &TournamentStore, raw_id: &str) -> Result<Tournament> {
    let id = TournamentStore::parse_id(raw_id)?;
    Ok(store.load(&id)?)
}

fn print_round(round: u32, games: &[Game]) {
    println!("Round {}", round);
    for game in games {
        let score = match (game.score_a, game.score_b) {
            (Some(a), Some(b)) => Score::new(a, b).to_string(),
            _ => "-".to_string(),
        };
        println!(
            "  Court {}: {:<24} vs {:<24} {}",
            game.court,
            game.team_a.to_string(),
            game.team_b.to_string(),
            score
        );
    }
}

fn print_leaderboard(rows: &[LeaderboardRow]) {
    println!(
        "{:>3}  {:<20} {:>6} {:>7} {:>4} {:>4} {:>5}",
        "#", "Player", "Points", "Matches", "GF", "GA", "Diff"
    );
    for (rank, row) in rows.iter().enumerate() {
        println!(
            "{:>3}  {:<20} {:>6} {:>7} {:>4} {:>4} {:>+5}",
            rank + 1,
            row.player,
            row.points,
            row.matches_played,
            row.games_for,
            row.games_against,
            row.game_difference()
        );
    }
}
