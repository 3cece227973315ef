//! Shuffle CLI Tool
//!
//! Offline shuffles and player lookups against a JSON dump of round history.
//!
//! Usage:
//!   cargo run --bin shuffle-cli -- --help
//!   cargo run --bin shuffle-cli -- --rounds rounds.json shuffle -p 1=1500 -p 2=1200 -p 3=900 -p 4=2000
//!   cargo run --bin shuffle-cli -- --rounds rounds.json player --id 1 --rating 1500

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use skill_shuffle::config::{validate_config, AppConfig};
use skill_shuffle::history::{HistoryStore, InMemoryHistoryStore};
use skill_shuffle::service::ShuffleService;
use skill_shuffle::types::{PlayerId, ShuffleRequest};

#[derive(Parser)]
#[command(name = "shuffle-cli")]
#[command(about = "Run skill-shuffle balancing against a JSON file of rounds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON array of rounds; omit to treat every player as new
    #[arg(short, long, value_name = "FILE")]
    rounds: Option<PathBuf>,

    /// Configuration file for skill and balance settings
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Balance a roster into two teams
    Shuffle {
        /// Roster entry as ID=RATING, in roster order
        #[arg(short, long = "player", value_name = "ID=RATING", value_parser = parse_entry)]
        players: Vec<(PlayerId, i64)>,
    },
    /// Show a player's faction-adjusted skills
    Player {
        /// Player ID
        #[arg(short, long)]
        id: PlayerId,
        /// Player's current rating
        #[arg(short, long)]
        rating: i64,
    },
}

fn parse_entry(entry: &str) -> Result<(PlayerId, i64)> {
    let (id, rating) = entry
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Expected ID=RATING, got '{}'", entry))?;

    Ok((id.trim().parse()?, rating.trim().parse()?))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };
    validate_config(&config)?;

    let store: Arc<dyn HistoryStore> = match &cli.rounds {
        Some(path) => Arc::new(InMemoryHistoryStore::from_json_file(path)?),
        None => Arc::new(InMemoryHistoryStore::default()),
    };
    let service = ShuffleService::from_config(store, &config);

    match cli.command {
        Commands::Shuffle { players } => {
            let request = ShuffleRequest {
                player_ids: players.iter().map(|(id, _)| *id).collect(),
                ratings: players.iter().map(|(_, rating)| *rating).collect(),
            };

            let result = service.shuffle(request).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);

            if !result.success {
                std::process::exit(2);
            }
        }

        Commands::Player { id, rating } => {
            let response = service.player_skill(id, rating).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
