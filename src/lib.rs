//! # scoreboard
//!
//! Persistent per-level leaderboards:
//! - Ranked merge of each new score (score, then name as tie-break)
//! - Per-level capacity with the lowest-ranked records dropped
//! - Rank reporting for the exact record just added
//! - Durable storage behind a small key-value port
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   HighScores (board)                         │
//! │        load → append → sort → truncate → store               │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │                              │
//!                ▼                              ▼
//!        ┌──────────────┐              ┌─────────────────┐
//!        │    Codec     │              │  KeyValueStore  │
//!        │ (JSON text)  │              │  "Highscores-*" │
//!        └──────────────┘              └────────┬────────┘
//!                                               │
//!                                 ┌─────────────┴────────────┐
//!                                 ▼                          ▼
//!                          ┌─────────────┐           ┌─────────────┐
//!                          │ MemoryStore │           │  FileStore  │
//!                          │  (RwLock)   │           │ (snapshot)  │
//!                          └─────────────┘           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use scoreboard::{HighScores, MemoryStore, Player};
//!
//! let board = HighScores::with_store(MemoryStore::new());
//! let rank = board.add_high_score("L1", Player::new("A", 10)).unwrap();
//! assert_eq!(rank, 1);
//!
//! let scores: Vec<Player> = board.get_high_scores("L1").unwrap();
//! assert_eq!(scores[0].name, "A");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod codec;
pub mod storage;
pub mod board;
pub mod schedule;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ScoreError, Result};
pub use config::{Config, SyncStrategy};
pub use record::{Player, PlayerRecord, SortOrder};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use board::{identifier_for, HighScores, KEY_PREFIX};
pub use schedule::{Scheduler, TaskId};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of scoreboard
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
