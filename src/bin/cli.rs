//! scoreboard CLI
//!
//! Command-line interface for per-level leaderboards stored on disk.

use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::{fmt, EnvFilter};

use scoreboard::codec;
use scoreboard::{identifier_for, Config, FileStore, HighScores, Player, SortOrder};

/// scoreboard CLI
#[derive(Parser, Debug)]
#[command(name = "scoreboard")]
#[command(about = "Persistent per-level high score tables")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./scoreboard_data")]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a score to a level and print the rank it reached (0 = not placed)
    Add {
        /// Level name
        level: String,

        /// Player name
        name: String,

        /// Score
        #[arg(allow_negative_numbers = true)]
        score: i64,

        /// Records kept for the level
        #[arg(short, long, default_value = "100")]
        limit: usize,

        /// Rank lower scores first
        #[arg(short, long)]
        ascending: bool,

        /// Extra field stored with the record (key=value, repeatable)
        #[arg(short, long = "extra", value_parser = parse_extra)]
        extras: Vec<(String, Value)>,
    },

    /// Print the ranked records of a level
    Get {
        /// Level name
        level: String,

        /// Print the stored JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Delete every record of a level
    Reset {
        /// Level name
        level: String,
    },

    /// Print the storage key of a level
    Key {
        /// Level name
        level: String,
    },

    /// Run a short example session against the "Test" level
    Demo,
}

/// Parse `key=value`; the value is read as JSON when it parses, else as text
fn parse_extra(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    if key.is_empty() {
        return Err("extra field name is empty".to_string());
    }
    if Player::is_reserved(key) {
        return Err(format!("'{}' is a base field and cannot be an extra", key));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn run(args: Args) -> scoreboard::Result<()> {
    let config = Config::builder().data_dir(&args.data_dir).build()?;
    let store = FileStore::open(&config)?;
    let board = HighScores::new(store, config);

    match args.command {
        Commands::Add {
            level,
            name,
            score,
            limit,
            ascending,
            extras,
        } => {
            let mut player = Player::new(name, score);
            for (key, value) in extras {
                player = player.with_extra(key, value);
            }
            let rank = board.add_high_score_with(
                &level,
                player,
                limit,
                SortOrder::from_ascending(ascending),
            )?;
            println!("{}", rank);
        }
        Commands::Get { level, json } => {
            let players: Vec<Player> = board.get_high_scores(&level)?;
            if json {
                println!("{}", codec::encode_pretty(&players)?);
            } else {
                print_table(&players);
            }
        }
        Commands::Reset { level } => {
            board.reset_high_scores(&level)?;
        }
        Commands::Key { level } => {
            println!("{}", identifier_for(&level));
        }
        Commands::Demo => {
            board.reset_high_scores("Test")?;

            let rank = board.add_high_score(
                "Test",
                Player::new("Test-Kun", 10).with_extra("extra", "Test-Stk"),
            )?;
            tracing::info!("Test-Kun placed at rank {}", rank);

            board.add_high_score_with(
                "Test",
                Player::new("aest-Kun", 1).with_extra("extra", "yes"),
                5,
                SortOrder::Ascending,
            )?;

            let players: Vec<Player> = board.get_high_scores("Test")?;
            println!("{}", codec::encode_pretty(&players)?);
        }
    }

    Ok(())
}

fn print_table(players: &[Player]) {
    if players.is_empty() {
        println!("(no scores)");
        return;
    }

    for (index, player) in players.iter().enumerate() {
        let extras: Vec<String> = player
            .extra
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();
        println!(
            "{:>3}  {:<20} {:>10}  {}",
            index + 1,
            player.name,
            player.score,
            extras.join(" ")
        );
    }
}

fn main() {
    // Initialize tracing/logging (stderr, so stdout stays machine-readable)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,scoreboard=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!("scoreboard v{}, data directory: {}", scoreboard::VERSION, args.data_dir);

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
