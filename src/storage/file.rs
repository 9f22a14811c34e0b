//! File-backed store
//!
//! Holds every entry in memory and persists the whole map as one snapshot
//! file on flush. The snapshot is written to a temp file and renamed over
//! the live one, so a crash mid-flush leaves the previous snapshot intact.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use tracing::info;

use crate::config::{Config, SyncStrategy};
use crate::error::{Result, ScoreError};

use super::KeyValueStore;

/// Magic bytes identifying a scoreboard prefs file
const MAGIC: &[u8; 4] = b"HSPF";

/// Current prefs file format version
const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + CRC (4) + Len (4) = 14 bytes
const HEADER_SIZE: usize = 14;

/// Durable key-value store backed by a single snapshot file
///
/// ## Concurrency:
/// - `entries`: RwLock, readers share, set/delete take it exclusively
/// - `flush` holds the read lock for the whole write so no update can land
///   between serializing and clearing `dirty`
pub struct FileStore {
    /// Live snapshot file
    path: PathBuf,

    sync_strategy: SyncStrategy,

    entries: RwLock<BTreeMap<String, String>>,

    /// Set by set/delete, cleared by a successful flush
    dirty: AtomicBool,
}

impl FileStore {
    /// Snapshot file name inside the data directory
    pub const FILE_NAME: &'static str = "highscores.prefs";

    /// Open or create the store under `config.data_dir`
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_path(&config.data_dir, config.sync_strategy)
    }

    /// Open or create the store in `dir`
    ///
    /// A missing snapshot opens empty. A snapshot that fails its header or
    /// checksum is reported as [`ScoreError::Corruption`].
    pub fn open_path(dir: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        fs::create_dir_all(dir)
            .map_err(|e| ScoreError::storage("create data directory", e))?;

        let path = dir.join(Self::FILE_NAME);
        let entries = if path.exists() {
            let bytes = fs::read(&path).map_err(|e| ScoreError::storage("read prefs file", e))?;
            Self::decode_snapshot(&bytes)?
        } else {
            BTreeMap::new()
        };

        info!(path = %path.display(), entries = entries.len(), "opened prefs store");

        Ok(Self {
            path,
            sync_strategy,
            entries: RwLock::new(entries),
            dirty: AtomicBool::new(false),
        })
    }

    /// Path of the live snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// True if there are writes not yet flushed
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Snapshot Encoding
    // =========================================================================

    fn encode_snapshot(entries: &BTreeMap<String, String>) -> Result<Vec<u8>> {
        let payload = bincode::serialize(entries)
            .map_err(|e| ScoreError::StorageUnavailable(format!("serialize prefs: {}", e)))?;

        let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&VERSION.to_le_bytes());
        bytes.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    fn decode_snapshot(bytes: &[u8]) -> Result<BTreeMap<String, String>> {
        if bytes.len() < HEADER_SIZE {
            return Err(ScoreError::Corruption(format!(
                "Incomplete header: expected {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        if &bytes[0..4] != MAGIC {
            return Err(ScoreError::Corruption("Bad magic bytes".to_string()));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(ScoreError::Corruption(format!(
                "Unsupported version: {}",
                version
            )));
        }

        let stored_crc = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
        let len = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]) as usize;

        let payload = &bytes[HEADER_SIZE..];
        if payload.len() != len {
            return Err(ScoreError::Corruption(format!(
                "Payload length mismatch: header says {}, file has {}",
                len,
                payload.len()
            )));
        }

        let actual_crc = crc32fast::hash(payload);
        if actual_crc != stored_crc {
            return Err(ScoreError::Corruption(format!(
                "CRC mismatch: expected {:08x}, got {:08x}",
                stored_crc, actual_crc
            )));
        }

        bincode::deserialize(payload)
            .map_err(|e| ScoreError::Corruption(format!("Bad payload: {}", e)))
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("prefs.tmp")
    }

    fn write_snapshot(&self, bytes: &[u8]) -> Result<()> {
        let tmp_path = self.tmp_path();

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)
            .map_err(|e| ScoreError::storage("create temp prefs file", e))?;
        file.write_all(bytes)
            .map_err(|e| ScoreError::storage("write temp prefs file", e))?;

        if self.sync_strategy == SyncStrategy::EveryFlush {
            file.sync_all()
                .map_err(|e| ScoreError::storage("sync temp prefs file", e))?;
        }
        drop(file);

        fs::rename(&tmp_path, &self.path)
            .map_err(|e| ScoreError::storage("replace prefs file", e))?;

        if self.sync_strategy == SyncStrategy::EveryFlush {
            self.sync_dir()?;
        }

        Ok(())
    }

    #[cfg(unix)]
    fn sync_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            File::open(dir)
                .and_then(|d| d.sync_all())
                .map_err(|e| ScoreError::storage("sync data directory", e))?;
        }
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_dir(&self) -> Result<()> {
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str, default: &str) -> Result<String> {
        Ok(self
            .entries
            .read()
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        self.dirty.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        if self.entries.write().remove(key).is_some() {
            self.dirty.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let entries = self.entries.read();

        if !self.dirty.load(Ordering::SeqCst) {
            return Ok(());
        }

        let bytes = Self::encode_snapshot(&entries)?;
        self.write_snapshot(&bytes)?;
        self.dirty.store(false, Ordering::SeqCst);

        info!(
            path = %self.path.display(),
            entries = entries.len(),
            bytes = bytes.len(),
            "flushed prefs store"
        );
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.entries.read().contains_key(key))
    }
}
