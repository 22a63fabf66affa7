//! Database migration system for the diagnosis history.
//!
//! This module handles schema versioning, so an existing history database
//! can be upgraded in place when the schema changes between releases.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::SCHEMA_STATEMENTS;

/// The current schema version.
pub const CURRENT_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Initialize the database schema.
///
/// Creates all tables and indexes if they don't exist, then applies any
/// pending migrations to bring the schema up to the current version.
///
/// # Errors
///
/// Returns an error if schema creation or migration fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    let version = schema_version(conn)?;
    if version < CURRENT_VERSION {
        apply_migrations(conn, version)?;
    }

    Ok(())
}

/// Read the schema version recorded in the database.
///
/// Returns 0 for a fresh database with no version recorded yet.
fn schema_version(conn: &Connection) -> Result<i32> {
    let result: std::result::Result<String, rusqlite::Error> = conn.query_row(
        "SELECT value FROM metadata WHERE key = ?1",
        [VERSION_KEY],
        |row| row.get(0),
    );

    match result {
        Ok(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("schema version is not a number: {value}"),
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Record the schema version in the metadata table.
fn record_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

/// Apply migrations from the given version up to the current version.
fn apply_migrations(conn: &Connection, from_version: i32) -> Result<()> {
    let mut current = from_version;

    while current < CURRENT_VERSION {
        current += 1;
        apply_migration(conn, current)?;
    }

    record_schema_version(conn, CURRENT_VERSION)?;
    Ok(())
}

/// Apply a single migration step.
fn apply_migration(conn: &Connection, version: i32) -> Result<()> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(Error::DatabaseMigration {
            message: format!("no migration defined for version {version}"),
        }),
    }
}

/// Migration to version 1 (initial schema).
///
/// The base schema is already created by `SCHEMA_STATEMENTS`, so this only
/// records the version.
fn migrate_v1(conn: &Connection) -> Result<()> {
    record_schema_version(conn, 1)?;
    Ok(())
}
