//! Storage Module
//!
//! The key-value persistence port the leaderboard reads and writes through.
//!
//! ## Responsibilities
//! - String-keyed, string-valued get/set/delete
//! - Explicit flush that makes prior writes durable
//! - Surface persistence failures as `StorageUnavailable`
//!
//! ## Implementations
//! - [`MemoryStore`]: in-process map, flush is a no-op (tests, embedding)
//! - [`FileStore`]: whole-map snapshot file, written atomically on flush
//!
//! ## Prefs File Format (FileStore)
//! ```text
//! ┌──────────┬───────────┬─────────┬─────────┬──────────────────────┐
//! │Magic (4) │Version (2)│ CRC (4) │ Len (4) │ Payload (bincode map)│
//! └──────────┴───────────┴─────────┴─────────┴──────────────────────┘
//! ```

mod file;
mod memory;

use std::sync::Arc;

use crate::error::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Durable string key-value store
///
/// All methods take `&self`; implementations use interior mutability.
/// Writes are only guaranteed durable after [`KeyValueStore::flush`].
pub trait KeyValueStore {
    /// Read a value, or `default` if the key is absent
    fn get(&self, key: &str, default: &str) -> Result<String>;

    /// Insert or overwrite a value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Absent keys are not an error.
    fn delete(&self, key: &str) -> Result<()>;

    /// Make every prior set/delete durable
    fn flush(&self) -> Result<()>;

    /// Check whether a key is present
    ///
    /// The provided body treats a key holding the empty string as absent;
    /// stores that can tell the two apart override it.
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(!self.get(key, "")?.is_empty())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str, default: &str) -> Result<String> {
        (**self).get(key, default)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str, default: &str) -> Result<String> {
        (**self).get(key, default)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn contains(&self, key: &str) -> Result<bool> {
        (**self).contains(key)
    }
}
