//! `SQLite` schema definitions for the diagnosis history database.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the diagnoses table.
pub const CREATE_DIAGNOSES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS diagnoses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT NOT NULL,
    appliance_id TEXT NOT NULL,
    appliance_name TEXT NOT NULL,
    description TEXT NOT NULL,
    diagnosis TEXT NOT NULL,
    content_hash TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create an index on timestamp for efficient queries.
pub const CREATE_TIMESTAMP_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_diagnoses_timestamp ON diagnoses(timestamp DESC)
";

/// SQL statement to create an index on `content_hash` for deduplication.
pub const CREATE_HASH_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_diagnoses_hash ON diagnoses(content_hash)
";

/// SQL statement to create an index on `appliance_id` for filtering.
pub const CREATE_APPLIANCE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_diagnoses_appliance ON diagnoses(appliance_id)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_DIAGNOSES_TABLE,
    CREATE_TIMESTAMP_INDEX,
    CREATE_HASH_INDEX,
    CREATE_APPLIANCE_INDEX,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_diagnoses_table_contains_required_columns() {
        assert!(CREATE_DIAGNOSES_TABLE.contains("id INTEGER PRIMARY KEY"));
        assert!(CREATE_DIAGNOSES_TABLE.contains("timestamp TEXT NOT NULL"));
        assert!(CREATE_DIAGNOSES_TABLE.contains("appliance_id TEXT NOT NULL"));
        assert!(CREATE_DIAGNOSES_TABLE.contains("appliance_name TEXT NOT NULL"));
        assert!(CREATE_DIAGNOSES_TABLE.contains("description TEXT NOT NULL"));
        assert!(CREATE_DIAGNOSES_TABLE.contains("diagnosis TEXT NOT NULL"));
        assert!(CREATE_DIAGNOSES_TABLE.contains("content_hash TEXT NOT NULL"));
    }

    #[test]
    fn test_create_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}
