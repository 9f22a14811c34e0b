//! Player records
//!
//! A leaderboard stores any record shape that exposes a name and a score.
//! [`Player`] is the stock shape: the two ranking fields plus an open map of
//! extension fields that are stored next to them.

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Capability set every stored record must provide
///
/// Ranking only looks at `score` (primary) and `name` (tie-break). Any other
/// fields a type carries are persisted untouched by the codec.
pub trait PlayerRecord: Serialize + DeserializeOwned {
    fn name(&self) -> &str;
    fn score(&self) -> i64;
}

/// Score direction of a ranked set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Highest score ranks first
    #[default]
    Descending,

    /// Lowest score ranks first (e.g. fastest time)
    Ascending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortOrder::Ascending
    }

    /// Compare two records best-first under this order
    ///
    /// Score follows the direction; equal scores always fall back to the
    /// name in ascending order.
    pub fn compare<T: PlayerRecord>(self, a: &T, b: &T) -> Ordering {
        let by_score = match self {
            SortOrder::Descending => b.score().cmp(&a.score()),
            SortOrder::Ascending => a.score().cmp(&b.score()),
        };
        by_score.then_with(|| a.name().cmp(b.name()))
    }
}

/// Stock record: name, score, and free-form extension fields
///
/// Extension fields are flattened, so `{"name":"A","score":3,"wave":2}`
/// decodes with `wave` in [`Player::extra`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub score: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Player {
    /// Field names owned by the base record
    pub const RESERVED_FIELDS: [&'static str; 2] = ["name", "score"];

    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
            extra: Map::new(),
        }
    }

    /// Attach an extension field
    ///
    /// Keys in [`Player::RESERVED_FIELDS`] would shadow the ranking fields
    /// and are skipped.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if !Self::is_reserved(&key) {
            self.extra.insert(key, value.into());
        }
        self
    }

    /// True if `key` names a base field and cannot be an extension field
    pub fn is_reserved(key: &str) -> bool {
        Self::RESERVED_FIELDS.contains(&key)
    }

    /// Look up an extension field
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

impl PlayerRecord for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn score(&self) -> i64 {
        self.score
    }
}
