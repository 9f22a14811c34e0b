//! Tests for FileStore
//!
//! These tests verify:
//! - Opening/creating the data directory
//! - get/set/delete semantics and the dirty flag
//! - Durability only after flush, across reopen
//! - Corruption detection on open
//! - Leaderboards surviving a restart

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use scoreboard::config::{Config, SyncStrategy};
use scoreboard::storage::{FileStore, KeyValueStore};
use scoreboard::{HighScores, Player, ScoreError, SortOrder};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().to_path_buf();
    (temp_dir, path)
}

/// Log sink shared between a test and its subscriber
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn open(path: &Path) -> FileStore {
    FileStore::open_path(path, SyncStrategy::EveryFlush).unwrap()
}

// =============================================================================
// Open/Create Tests
// =============================================================================

#[test]
fn test_open_creates_directory() {
    let (_temp, path) = setup_temp_dir();
    let data_dir = path.join("nested").join("prefs");

    let store = FileStore::open_path(&data_dir, SyncStrategy::EveryFlush).unwrap();

    assert!(data_dir.exists());
    assert!(store.is_empty());
    assert!(!store.is_dirty());
    assert_eq!(store.path(), data_dir.join(FileStore::FILE_NAME));
}

#[test]
fn test_open_from_config() {
    let (_temp, path) = setup_temp_dir();
    let config = Config::builder()
        .data_dir(&path)
        .sync_strategy(SyncStrategy::OsBuffered)
        .build()
        .unwrap();

    let store = FileStore::open(&config).unwrap();
    store.set("k", "v").unwrap();
    store.flush().unwrap();

    assert!(path.join(FileStore::FILE_NAME).exists());
}

#[test]
fn test_nothing_written_until_first_flush() {
    let (_temp, path) = setup_temp_dir();
    let store = open(&path);

    store.set("k", "v").unwrap();

    assert!(!store.path().exists());
}

// =============================================================================
// Get/Set/Delete Tests
// =============================================================================

#[test]
fn test_get_returns_default_for_missing_key() {
    let (_temp, path) = setup_temp_dir();
    let store = open(&path);

    assert_eq!(store.get("missing", "{}").unwrap(), "{}");
    assert!(!store.contains("missing").unwrap());
}

#[test]
fn test_set_get_overwrite() {
    let (_temp, path) = setup_temp_dir();
    let store = open(&path);

    store.set("k", "one").unwrap();
    store.set("k", "two").unwrap();

    assert_eq!(store.get("k", "").unwrap(), "two");
    assert_eq!(store.len(), 1);
    assert!(store.is_dirty());
}

#[test]
fn test_delete_missing_key_stays_clean() {
    let (_temp, path) = setup_temp_dir();
    let store = open(&path);

    store.delete("missing").unwrap();

    assert!(!store.is_dirty());
}

#[test]
fn test_flush_clears_dirty() {
    let (_temp, path) = setup_temp_dir();
    let store = open(&path);

    store.set("k", "v").unwrap();
    store.flush().unwrap();

    assert!(!store.is_dirty());
    assert!(store.path().exists());
    assert!(!path.join("highscores.prefs.tmp").exists());
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_flushed_entries_survive_reopen() {
    let (_temp, path) = setup_temp_dir();
    {
        let store = open(&path);
        store.set("Highscores-L1", r#"{"players":[]}"#).unwrap();
        store.set("other", "value with\nnewline").unwrap();
        store.flush().unwrap();
    }

    let store = open(&path);
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("Highscores-L1", "").unwrap(), r#"{"players":[]}"#);
    assert_eq!(store.get("other", "").unwrap(), "value with\nnewline");
}

#[test]
fn test_unflushed_entries_lost_on_reopen() {
    let (_temp, path) = setup_temp_dir();
    {
        let store = open(&path);
        store.set("kept", "1").unwrap();
        store.flush().unwrap();
        store.set("lost", "2").unwrap();
    }

    let store = open(&path);
    assert!(store.contains("kept").unwrap());
    assert!(!store.contains("lost").unwrap());
}

#[test]
fn test_delete_survives_reopen() {
    let (_temp, path) = setup_temp_dir();
    {
        let store = open(&path);
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.flush().unwrap();
        store.delete("a").unwrap();
        store.flush().unwrap();
    }

    let store = open(&path);
    assert!(!store.contains("a").unwrap());
    assert_eq!(store.get("b", "").unwrap(), "2");
}

#[test]
fn test_empty_map_after_flush_reopens_empty() {
    let (_temp, path) = setup_temp_dir();
    {
        let store = open(&path);
        store.set("a", "1").unwrap();
        store.flush().unwrap();
        store.delete("a").unwrap();
        store.flush().unwrap();
    }

    let store = open(&path);
    assert!(store.is_empty());
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_open_rejects_truncated_header() {
    let (_temp, path) = setup_temp_dir();
    fs::write(path.join(FileStore::FILE_NAME), b"HSP").unwrap();

    let result = FileStore::open_path(&path, SyncStrategy::EveryFlush);

    assert!(matches!(result, Err(ScoreError::Corruption(_))));
}

#[test]
fn test_open_rejects_bad_magic() {
    let (_temp, path) = setup_temp_dir();
    fs::write(path.join(FileStore::FILE_NAME), [0u8; 32]).unwrap();

    let result = FileStore::open_path(&path, SyncStrategy::EveryFlush);

    assert!(matches!(result, Err(ScoreError::Corruption(_))));
}

#[test]
fn test_open_detects_flipped_payload_byte() {
    let (_temp, path) = setup_temp_dir();
    {
        let store = open(&path);
        store.set("Highscores-L1", "payload").unwrap();
        store.flush().unwrap();
    }

    let file = path.join(FileStore::FILE_NAME);
    let mut bytes = fs::read(&file).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    fs::write(&file, bytes).unwrap();

    let result = FileStore::open_path(&path, SyncStrategy::EveryFlush);

    assert!(matches!(result, Err(ScoreError::Corruption(_))));
}

#[test]
fn test_open_detects_truncated_payload() {
    let (_temp, path) = setup_temp_dir();
    {
        let store = open(&path);
        store.set("k", "some value").unwrap();
        store.flush().unwrap();
    }

    let file = path.join(FileStore::FILE_NAME);
    let bytes = fs::read(&file).unwrap();
    fs::write(&file, &bytes[..bytes.len() - 3]).unwrap();

    let result = FileStore::open_path(&path, SyncStrategy::EveryFlush);

    assert!(matches!(result, Err(ScoreError::Corruption(_))));
}

// =============================================================================
// Leaderboard Restart Tests
// =============================================================================

#[test]
fn test_leaderboard_survives_restart() {
    let (_temp, path) = setup_temp_dir();
    {
        let board = HighScores::with_store(open(&path));
        board.add_high_score("L1", Player::new("A", 10)).unwrap();
        board.add_high_score("L1", Player::new("B", 12).with_extra("wave", 3)).unwrap();
        assert!(!board.store().is_dirty());
    }

    let board = HighScores::with_store(open(&path));
    let players: Vec<Player> = board.get_high_scores("L1").unwrap();
    assert_eq!(players[0], Player::new("B", 12).with_extra("wave", 3));
    assert_eq!(players[1], Player::new("A", 10));

    let rank = board
        .add_high_score_with("L1", Player::new("C", 11), 2, SortOrder::Descending)
        .unwrap();
    assert_eq!(rank, 2);
}

#[test]
fn test_reset_survives_restart() {
    let (_temp, path) = setup_temp_dir();
    {
        let board = HighScores::with_store(open(&path));
        board.add_high_score("L1", Player::new("A", 10)).unwrap();
        board.add_high_score("L2", Player::new("B", 1)).unwrap();
        board.reset_high_scores("L1").unwrap();
    }

    let board = HighScores::with_store(open(&path));
    assert!(board.get_high_scores::<Player>("L1").unwrap().is_empty());
    assert_eq!(board.get_high_scores::<Player>("L2").unwrap().len(), 1);
}

// =============================================================================
// Logging Tests
// =============================================================================

#[test]
fn test_open_and_flush_log_at_info() {
    let (_temp, path) = setup_temp_dir();
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let store = open(&path);
        store.set("k", "v").unwrap();
        store.flush().unwrap();
    });

    let logs = capture.contents();
    assert!(logs.contains("opened prefs store"), "{}", logs);
    assert!(logs.contains("flushed prefs store"), "{}", logs);
}
