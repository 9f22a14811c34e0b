//! Ranked Store
//!
//! Per-level leaderboards over a [`KeyValueStore`].
//!
//! ## Responsibilities
//! - Name the storage key of each level
//! - Merge a new record into the stored set, re-rank, and cap it
//! - Report the rank the new record landed on
//! - Load and reset a level's set
//!
//! Nothing is cached between calls: every operation loads from the store
//! and, when it mutates, writes back and flushes before returning.
//!
//! ## Concurrency
//! `add_high_score` is a load → modify → store cycle with no lock of its
//! own. Two callers adding to the same level at once can lose one update.
//! Serialize adds per level if a `HighScores` is shared across threads.

use tracing::{debug, warn};

use crate::codec;
use crate::config::Config;
use crate::error::{Result, ScoreError};
use crate::record::{PlayerRecord, SortOrder};
use crate::storage::KeyValueStore;

/// Namespace prefix for every level key
pub const KEY_PREFIX: &str = "Highscores-";

/// Storage key for a level's record set
///
/// Total and deterministic: any level name, including the empty string, maps
/// to `"Highscores-" + level_name`.
pub fn identifier_for(level_name: &str) -> String {
    format!("{}{}", KEY_PREFIX, level_name)
}

/// Leaderboards for any number of levels, persisted through `S`
pub struct HighScores<S: KeyValueStore> {
    store: S,
    config: Config,
}

impl<S: KeyValueStore> HighScores<S> {
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    /// Wrap a store with the default config (limit 100, descending)
    pub fn with_store(store: S) -> Self {
        Self::new(store, Config::default())
    }

    /// Delete every record of a level
    ///
    /// Resetting a level that has nothing stored is a no-op. The deletion is
    /// flushed before returning.
    pub fn reset_high_scores(&self, level_name: &str) -> Result<()> {
        let key = identifier_for(level_name);
        self.store.delete(&key)?;
        self.store.flush()?;

        debug!(key = %key, "reset high scores");
        Ok(())
    }

    /// Add a record using the configured limit and order
    ///
    /// See [`HighScores::add_high_score_with`].
    pub fn add_high_score<T: PlayerRecord>(&self, level_name: &str, record: T) -> Result<usize> {
        self.add_high_score_with(
            level_name,
            record,
            self.config.default_limit,
            self.config.default_order,
        )
    }

    /// Add a record to a level and return the rank it landed on
    ///
    /// Steps:
    /// 1. Load the stored set (empty if absent or unreadable)
    /// 2. Append the record
    /// 3. Stable sort by score in `order`, then name ascending
    /// 4. Keep the first `limit` records
    /// 5. Store and flush
    ///
    /// Returns the 1-based rank of this exact record, or `0` if the cap cut
    /// it. A stored record equal to the new one never stands in for it.
    pub fn add_high_score_with<T: PlayerRecord>(
        &self,
        level_name: &str,
        record: T,
        limit: usize,
        order: SortOrder,
    ) -> Result<usize> {
        if limit == 0 {
            return Err(ScoreError::InvalidLimit(limit));
        }

        let key = identifier_for(level_name);

        // Tag every record with its load position; the new one gets the last tag
        let mut tagged: Vec<(usize, T)> = self.load::<T>(&key)?.into_iter().enumerate().collect();
        let new_tag = tagged.len();
        tagged.push((new_tag, record));

        tagged.sort_by(|(_, a), (_, b)| order.compare(a, b));
        tagged.truncate(limit);

        let rank = tagged
            .iter()
            .position(|(tag, _)| *tag == new_tag)
            .map(|index| index + 1)
            .unwrap_or(0);

        let records: Vec<T> = tagged.into_iter().map(|(_, record)| record).collect();
        let text = codec::encode(&records)?;

        self.store.set(&key, &text)?;
        self.store.flush()?;

        debug!(
            key = %key,
            stored = records.len(),
            limit,
            ascending = order.is_ascending(),
            rank,
            "added high score"
        );
        Ok(rank)
    }

    /// Load a level's records in ranked order
    ///
    /// An absent or unreadable level reads as empty. Storage is never
    /// modified.
    pub fn get_high_scores<T: PlayerRecord>(&self, level_name: &str) -> Result<Vec<T>> {
        self.load(&identifier_for(level_name))
    }

    /// Best-ranked record of a level, if any
    pub fn top_score<T: PlayerRecord>(&self, level_name: &str) -> Result<Option<T>> {
        Ok(self.get_high_scores::<T>(level_name)?.into_iter().next())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Read and decode a stored set, falling back to empty on bad text
    fn load<T: PlayerRecord>(&self, key: &str) -> Result<Vec<T>> {
        let text = self.store.get(key, "")?;

        match codec::decode(&text) {
            Ok(records) => Ok(records),
            Err(e) => {
                warn!(key = %key, error = %e, "discarding unreadable high scores");
                Ok(Vec::new())
            }
        }
    }
}
