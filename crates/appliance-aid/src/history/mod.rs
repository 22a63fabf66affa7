//! Diagnosis history for appliance-aid.
//!
//! This module provides `SQLite`-based persistent storage for completed
//! diagnoses, so past advice can be re-read without another API call.
//! Entries are deduplicated by a BLAKE3 hash over the appliance, the issue
//! description, and the diagnosis text.

pub mod migrations;
pub mod schema;

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::Appliance;
use crate::error::{Error, Result};

/// A stored diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Database ID, `None` until the entry has been inserted.
    pub id: Option<i64>,
    /// When the diagnosis was produced.
    pub timestamp: DateTime<Utc>,
    /// Catalog ID of the appliance ("refrigerator", "washer", ...).
    pub appliance_id: String,
    /// Display name of the appliance.
    pub appliance_name: String,
    /// The issue as the user described it.
    pub description: String,
    /// The full diagnosis text returned by the model.
    pub diagnosis: String,
    /// BLAKE3 hex digest used for deduplication.
    pub content_hash: String,
}

impl HistoryEntry {
    /// Create an entry for a freshly produced diagnosis, stamped with the
    /// current time.
    #[must_use]
    pub fn new(
        appliance: Appliance,
        description: impl Into<String>,
        diagnosis: impl Into<String>,
    ) -> Self {
        let description = description.into();
        let diagnosis = diagnosis.into();
        let content_hash = fingerprint(appliance.id, &description, &diagnosis);

        Self {
            id: None,
            timestamp: Utc::now(),
            appliance_id: appliance.id.to_string(),
            appliance_name: appliance.name.to_string(),
            description,
            diagnosis,
            content_hash,
        }
    }
}

/// Hash the fields that make two diagnoses identical for dedup purposes.
fn fingerprint(appliance_id: &str, description: &str, diagnosis: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(appliance_id.as_bytes());
    hasher.update(b"\n");
    hasher.update(description.as_bytes());
    hasher.update(b"\n");
    hasher.update(diagnosis.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Store of past diagnoses.
///
/// Provides persistent storage using `SQLite` with support for:
/// - Insertion with content-hash deduplication
/// - Substring search over descriptions and diagnoses
/// - Pruning to a bounded number of entries
#[derive(Debug)]
pub struct History {
    /// Database connection.
    conn: Connection,
}

impl History {
    /// Open or create a history database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening history database at {}", path.display());
        let conn = Connection::open(path).map_err(|source| Error::DatabaseOpen {
            path: path.to_path_buf(),
            source,
        })?;

        // WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("History database opened at {}", path.display());
        Ok(Self { conn })
    }

    /// Create an in-memory history instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: std::path::PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Insert a diagnosis into the history.
    ///
    /// Returns the assigned ID, or `None` if the entry was deduplicated
    /// (i.e., an identical diagnosis already exists).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert(&self, entry: &HistoryEntry) -> Result<Option<i64>> {
        if self.exists_by_hash(&entry.content_hash)? {
            debug!(
                "Skipping duplicate diagnosis with hash {}",
                &entry.content_hash[..16]
            );
            return Ok(None);
        }

        let timestamp = entry.timestamp.to_rfc3339();

        self.conn.execute(
            r"
            INSERT INTO diagnoses (timestamp, appliance_id, appliance_name, description, diagnosis, content_hash)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                timestamp,
                entry.appliance_id,
                entry.appliance_name,
                entry.description,
                entry.diagnosis,
                entry.content_hash,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted diagnosis with id {}", id);
        Ok(Some(id))
    }

    /// Check if an entry with the given hash already exists.
    fn exists_by_hash(&self, hash: &str) -> Result<bool> {
        let count: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM diagnoses WHERE content_hash = ?1",
            [hash],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Get an entry by its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<HistoryEntry>> {
        let result = self
            .conn
            .query_row(
                r"
                SELECT id, timestamp, appliance_id, appliance_name, description, diagnosis, content_hash
                FROM diagnoses WHERE id = ?1
                ",
                [id],
                Self::row_to_entry,
            )
            .optional()?;
        Ok(result)
    }

    /// Get the most recent entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, timestamp, appliance_id, appliance_name, description, diagnosis, content_hash
            FROM diagnoses ORDER BY timestamp DESC LIMIT ?1
            ",
        )?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let entries = stmt
            .query_map([limit_i64], Self::row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Search entries by description or diagnosis text.
    ///
    /// Performs a case-insensitive substring search.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<HistoryEntry>> {
        let pattern = format!("%{query}%");
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, timestamp, appliance_id, appliance_name, description, diagnosis, content_hash
            FROM diagnoses WHERE description LIKE ?1 OR diagnosis LIKE ?1
            ORDER BY timestamp DESC LIMIT ?2
            ",
        )?;

        let limit_i64 = i64::try_from(limit).unwrap_or(i64::MAX);
        let entries = stmt
            .query_map(params![pattern, limit_i64], Self::row_to_entry)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Count total entries in the history.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM diagnoses", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete an entry by ID.
    ///
    /// Returns `true` if an entry was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM diagnoses WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Delete every stored entry.
    ///
    /// Returns the number of entries deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn clear(&self) -> Result<usize> {
        let affected = self.conn.execute("DELETE FROM diagnoses", [])?;
        if affected > 0 {
            info!("Cleared {} history entries", affected);
        }
        Ok(affected)
    }

    /// Prune entries to keep only the most recent N.
    ///
    /// Returns the number of entries deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn prune_keep_recent(&self, keep_count: usize) -> Result<usize> {
        let keep_i64 = i64::try_from(keep_count).unwrap_or(i64::MAX);
        let affected = self.conn.execute(
            r"
            DELETE FROM diagnoses WHERE id NOT IN (
                SELECT id FROM diagnoses ORDER BY timestamp DESC LIMIT ?1
            )
            ",
            [keep_i64],
        )?;

        if affected > 0 {
            info!("Pruned {} entries to keep {} recent", affected, keep_count);
        }
        Ok(affected)
    }

    /// Convert a database row to a `HistoryEntry`.
    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<HistoryEntry> {
        let id: i64 = row.get(0)?;
        let timestamp_str: String = row.get(1)?;
        let appliance_id: String = row.get(2)?;
        let appliance_name: String = row.get(3)?;
        let description: String = row.get(4)?;
        let diagnosis: String = row.get(5)?;
        let content_hash: String = row.get(6)?;

        let timestamp = DateTime::parse_from_rfc3339(&timestamp_str)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

        Ok(HistoryEntry {
            id: Some(id),
            timestamp,
            appliance_id,
            appliance_name,
            description,
            diagnosis,
            content_hash,
        })
    }
}
