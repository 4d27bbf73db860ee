//! Local storage for smart flashcards.
//!
//! A small key-value store in the spirit of browser local storage, backed by
//! SQLite. The session snapshot lives under a single key as a JSON string.

use crate::models::Snapshot;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Key-value capability the app persists through.
pub trait Storage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> StorageResult<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

impl Storage for Database {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }
}

/// Read the snapshot stored under `key`.
///
/// Absent, unreadable, or malformed data all come back as an empty snapshot.
pub fn load_snapshot(storage: &dyn Storage, key: &str) -> Snapshot {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "no saved snapshot");
            return Snapshot::default();
        }
        Err(e) => {
            warn!(key, error = %e, "failed to read snapshot");
            return Snapshot::default();
        }
    };

    match serde_json::from_str::<Snapshot>(&raw) {
        Ok(snapshot) => {
            debug!(key, cards = snapshot.cards.len(), "loaded snapshot");
            snapshot
        }
        Err(e) => {
            warn!(key, error = %e, "ignoring malformed snapshot");
            Snapshot::default()
        }
    }
}

/// Write the snapshot under `key`, replacing what was there.
pub fn save_snapshot(storage: &dyn Storage, key: &str, snapshot: &Snapshot) -> StorageResult<()> {
    let raw = serde_json::to_string(snapshot)?;
    storage.set_item(key, &raw)?;
    debug!(
        key,
        cards = snapshot.cards.len(),
        known = snapshot.known.len(),
        in_progress = snapshot.in_progress.len(),
        "saved snapshot"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Flashcard;

    const KEY: &str = "flashcardData";

    #[test]
    fn test_set_get_remove() {
        let db = Database::in_memory().unwrap();
        assert_eq!(db.get_item("a").unwrap(), None);

        db.set_item("a", "1").unwrap();
        db.set_item("a", "2").unwrap();
        assert_eq!(db.get_item("a").unwrap().as_deref(), Some("2"));

        db.remove_item("a").unwrap();
        assert_eq!(db.get_item("a").unwrap(), None);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let db = Database::in_memory().unwrap();
        let snapshot = Snapshot {
            cards: vec![Flashcard::new("1789", "Anno della Rivoluzione Francese")],
            known: vec![0],
            in_progress: vec![0],
        };
        save_snapshot(&db, KEY, &snapshot).unwrap();
        assert_eq!(load_snapshot(&db, KEY), snapshot);
    }

    #[test]
    fn test_stored_layout() {
        let db = Database::in_memory().unwrap();
        let snapshot = Snapshot {
            cards: vec![Flashcard::new("Madrid", "Capitale della Spagna")],
            known: vec![],
            in_progress: vec![0],
        };
        save_snapshot(&db, KEY, &snapshot).unwrap();

        let raw = db.get_item(KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["carte"][0]["fronte"], "Madrid");
        assert_eq!(value["inCorso"][0], 0);
    }

    #[test]
    fn test_missing_and_malformed() {
        let db = Database::in_memory().unwrap();
        assert_eq!(load_snapshot(&db, KEY), Snapshot::default());

        db.set_item(KEY, "not json").unwrap();
        assert_eq!(load_snapshot(&db, KEY), Snapshot::default());

        db.set_item(KEY, r#"{"conosciute":[2]}"#).unwrap();
        let partial = load_snapshot(&db, KEY);
        assert!(partial.cards.is_empty());
        assert_eq!(partial.known, vec![2]);
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.db");
        let snapshot = Snapshot {
            cards: vec![Flashcard::new("Fotosintesi", "energia")],
            known: vec![],
            in_progress: vec![],
        };

        {
            let db = Database::open(&path).unwrap();
            save_snapshot(&db, KEY, &snapshot).unwrap();
        }

        let db = Database::open(&path).unwrap();
        assert_eq!(load_snapshot(&db, KEY), snapshot);
    }
}
