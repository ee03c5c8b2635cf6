//! # Transcription Storage
//!
//! Persistence layer for transcription records, backed by a single SQLite
//! table. The design is intentionally minimal:
//!
//! - **Per-operation connections**: the handle owns only the database path.
//!   Every operation opens its own connection and releases it on all exit
//!   paths, so concurrent requests never share a connection or transaction —
//!   isolation is delegated entirely to SQLite.
//! - **Write-once records**: there is no update path. Records are inserted
//!   on successful transcription and only ever read or deleted afterwards.
//! - **Minimal schema**: category and key points are not stored; they are
//!   recomputed from the transcript on every read.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A persisted transcription record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: i64,
    pub filename: String,
    pub transcript: String,
    pub summary: String,
}

/// Handle to the transcription store.
///
/// Cheap to clone; holds only the database path. Connections are opened
/// per operation.
#[derive(Debug, Clone)]
pub struct Storage {
    db_path: PathBuf,
}

impl Storage {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self { db_path: db_path.into() }
    }

    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create database directory")?;
            }
        }
        let conn = Connection::open(&self.db_path).context("Failed to open database")?;
        // Concurrent requests each hold their own connection; wait out a
        // writer instead of surfacing SQLITE_BUSY to the caller.
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .context("Failed to set busy timeout")?;
        Ok(conn)
    }

    /// Idempotently ensure the record table exists.
    ///
    /// Called once at startup; a failure here is fatal, since the service
    /// cannot function without the table.
    pub fn init(&self) -> Result<()> {
        let conn = self.open()?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS transcriptions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL,
                transcript TEXT NOT NULL,
                summary TEXT NOT NULL
            )
            "#,
            [],
        )
        .context("Failed to create transcriptions table")?;
        Ok(())
    }

    /// Append a record and return its assigned id.
    pub fn insert(&self, filename: &str, transcript: &str, summary: &str) -> Result<i64> {
        let conn = self.open()?;
        conn.execute(
            "INSERT INTO transcriptions (filename, transcript, summary) VALUES (?1, ?2, ?3)",
            params![filename, transcript, summary],
        )
        .context("Failed to insert transcription")?;
        Ok(conn.last_insert_rowid())
    }

    /// All records, most recent first (`id` descending).
    pub fn list_all(&self) -> Result<Vec<Record>> {
        let conn = self.open()?;
        let mut stmt = conn
            .prepare("SELECT id, filename, transcript, summary FROM transcriptions ORDER BY id DESC")
            .context("Failed to prepare list query")?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Record {
                    id: row.get(0)?,
                    filename: row.get(1)?,
                    transcript: row.get(2)?,
                    summary: row.get(3)?,
                })
            })
            .context("Failed to list transcriptions")?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.context("Failed to read transcription row")?);
        }
        Ok(records)
    }

    /// Fetch one record by id. Absence is a normal outcome, not an error.
    pub fn get_by_id(&self, id: i64) -> Result<Option<Record>> {
        let conn = self.open()?;
        let record = conn
            .query_row(
                "SELECT id, filename, transcript, summary FROM transcriptions WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Record {
                        id: row.get(0)?,
                        filename: row.get(1)?,
                        transcript: row.get(2)?,
                        summary: row.get(3)?,
                    })
                },
            )
            .optional()
            .context("Failed to fetch transcription")?;
        Ok(record)
    }

    /// Delete a record by id. Deleting an unknown id is a no-op.
    pub fn delete_by_id(&self, id: i64) -> Result<()> {
        let conn = self.open()?;
        conn.execute("DELETE FROM transcriptions WHERE id = ?1", params![id])
            .context("Failed to delete transcription")?;
        Ok(())
    }

    /// The database path this handle operates on.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_storage() -> (tempfile::TempDir, Storage) {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("test.db"));
        storage.init().unwrap();
        (dir, storage)
    }

    #[test]
    fn test_init_is_idempotent() {
        let (_dir, storage) = test_storage();
        storage.init().unwrap();
        storage.init().unwrap();
    }

    #[test]
    fn test_insert_then_get_round_trips() {
        let (_dir, storage) = test_storage();
        let id = storage.insert("lecture.mp3", "full transcript", "a summary").unwrap();

        let record = storage.get_by_id(id).unwrap().unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.filename, "lecture.mp3");
        assert_eq!(record.transcript, "full transcript");
        assert_eq!(record.summary, "a summary");
    }

    #[test]
    fn test_ids_are_monotonically_increasing() {
        let (_dir, storage) = test_storage();
        let first = storage.insert("a.mp3", "t", "s").unwrap();
        let second = storage.insert("b.mp3", "t", "s").unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_list_all_orders_most_recent_first() {
        let (_dir, storage) = test_storage();
        for name in ["one.mp3", "two.mp3", "three.mp3"] {
            storage.insert(name, "t", "s").unwrap();
        }

        let records = storage.list_all().unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.windows(2).all(|pair| pair[0].id > pair[1].id));
        assert_eq!(records[0].filename, "three.mp3");
    }

    #[test]
    fn test_get_unknown_id_returns_none() {
        let (_dir, storage) = test_storage();
        assert!(storage.get_by_id(42).unwrap().is_none());
    }

    #[test]
    fn test_delete_removes_record() {
        let (_dir, storage) = test_storage();
        let id = storage.insert("gone.mp3", "t", "s").unwrap();
        storage.delete_by_id(id).unwrap();
        assert!(storage.get_by_id(id).unwrap().is_none());
    }

    #[test]
    fn test_delete_unknown_id_is_a_noop() {
        let (_dir, storage) = test_storage();
        let kept = storage.insert("kept.mp3", "t", "s").unwrap();

        storage.delete_by_id(9999).unwrap();

        let records = storage.list_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, kept);
    }

    #[test]
    fn test_concurrent_handles_on_one_database() {
        // Mirrors the serving model: each request gets its own handle and
        // connection against the same file.
        let (_dir, storage) = test_storage();
        let other = storage.clone();

        let writer = std::thread::spawn(move || {
            for i in 0..10 {
                other.insert(&format!("a{}.mp3", i), "t", "s").unwrap();
            }
        });
        for i in 0..10 {
            storage.insert(&format!("b{}.mp3", i), "t", "s").unwrap();
        }
        writer.join().unwrap();

        assert_eq!(storage.list_all().unwrap().len(), 20);
    }

    #[test]
    fn test_empty_transcript_is_allowed() {
        let (_dir, storage) = test_storage();
        let id = storage.insert("silent.mp3", "", "").unwrap();
        let record = storage.get_by_id(id).unwrap().unwrap();
        assert_eq!(record.transcript, "");
    }
}
