//! Configuration for scoreboard
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, ScoreError};
use crate::record::SortOrder;

/// Main configuration for a scoreboard instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for the durable store
    /// Internal structure:
    ///   {data_dir}/
    ///     └── highscores.prefs   (all levels, one entry per level key)
    pub data_dir: PathBuf,

    /// How hard a flush pushes data towards the disk
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Ranking Configuration
    // -------------------------------------------------------------------------
    /// Records kept per level when the caller gives no explicit limit
    pub default_limit: usize,

    /// Score direction used when the caller gives no explicit order
    pub default_order: SortOrder,
}

/// Flush sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync the file and its directory on every flush (safest, slowest)
    EveryFlush,

    /// Rename into place and leave syncing to the OS
    OsBuffered,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./scoreboard_data"),
            sync_strategy: SyncStrategy::EveryFlush,
            default_limit: 100,
            default_order: SortOrder::Descending,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the flush sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the default per-level capacity
    pub fn default_limit(mut self, limit: usize) -> Self {
        self.config.default_limit = limit;
        self
    }

    /// Set the default score direction
    pub fn default_order(mut self, order: SortOrder) -> Self {
        self.config.default_order = order;
        self
    }

    pub fn build(self) -> Result<Config> {
        if self.config.default_limit == 0 {
            return Err(ScoreError::Config(
                "default_limit must be at least 1".to_string(),
            ));
        }
        Ok(self.config)
    }
}
