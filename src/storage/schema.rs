/*!
 * Local store schema and migrations.
 *
 * Each entry of `MIGRATIONS` upgrades the schema by one version; opening a
 * store applies every step above the recorded version inside one
 * transaction.
 */

use anyhow::{Context, Result};
use log::{debug, info, warn};
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// `(version reached, SQL)` in ascending order
const MIGRATIONS: &[(i32, &str)] = &[(
    1,
    r#"
    CREATE TABLE IF NOT EXISTS schema_version (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        version INTEGER NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS kv_store (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
)];

/// Bring the schema up to `SCHEMA_VERSION`.
///
/// A store written by a newer build is opened as is.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version > SCHEMA_VERSION {
        warn!(
            "Local store schema v{} is newer than supported v{}",
            current_version, SCHEMA_VERSION
        );
        return Ok(());
    }
    if current_version == SCHEMA_VERSION {
        debug!("Local store schema is up to date (v{})", current_version);
        return Ok(());
    }

    info!("Upgrading local store schema from v{} to v{}", current_version, SCHEMA_VERSION);
    conn.execute_batch("BEGIN")?;
    let result = apply_migrations(conn, current_version);
    match &result {
        Ok(()) => conn.execute_batch("COMMIT")?,
        Err(_) => conn.execute_batch("ROLLBACK")?,
    }
    result
}

fn apply_migrations(conn: &Connection, from_version: i32) -> Result<()> {
    for (version, sql) in MIGRATIONS.iter().filter(|(v, _)| *v > from_version) {
        conn.execute_batch(sql)
            .with_context(|| format!("Failed to apply schema migration v{}", version))?;
        set_schema_version(conn, *version)?;
        debug!("Applied schema migration v{}", version);
    }
    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version WHERE id = 1", [], |row| row.get(0))
        .unwrap_or(0);

    Ok(version)
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}
