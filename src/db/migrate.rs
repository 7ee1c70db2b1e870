//! Schema migrations. Each step runs once and is recorded in the `log`
//! table as `migration_applied`.

use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};

type Step = fn(&Connection) -> rusqlite::Result<()>;

const MIGRATIONS: [(&str, &str, Step); 3] = [
    (
        "20250301_0001_create_events",
        "Created events table",
        create_events_table,
    ),
    (
        "20250301_0002_dedup_index",
        "Enforced unique (timestamp, user, kind)",
        create_dedup_index,
    ),
    (
        "20250318_0003_add_origin_column",
        "Added origin column to events",
        add_origin_column,
    ),
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn create_events_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp      TEXT NOT NULL,     -- YYYY-MM-DD HH:MM:SS, naive local time
            user           TEXT NOT NULL CHECK (length(user) > 0),
            kind           TEXT NOT NULL CHECK (kind IN ('connected','disconnected','SESSION_END')),
            bytes_received INTEGER NOT NULL DEFAULT 0 CHECK (bytes_received >= 0),
            bytes_sent     INTEGER NOT NULL DEFAULT 0 CHECK (bytes_sent >= 0),
            duration_secs  INTEGER,
            created_at     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_events_kind_timestamp ON events(kind, timestamp);
        "#,
    )
}

/// Drop rows that would violate the dedup key (keeping the first stored),
/// then enforce it with a unique index.
fn create_dedup_index(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM events
        WHERE id NOT IN (
            SELECT MIN(id) FROM events GROUP BY timestamp, user, kind
        );

        CREATE UNIQUE INDEX IF NOT EXISTS ux_events_dedup ON events(timestamp, user, kind);
        "#,
    )
}

fn events_has_column(conn: &Connection, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare("PRAGMA table_info('events')")?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn add_origin_column(conn: &Connection) -> rusqlite::Result<()> {
    if events_has_column(conn, "origin")? {
        return Ok(());
    }
    conn.execute(
        "ALTER TABLE events ADD COLUMN origin TEXT NOT NULL DEFAULT 'log'",
        [],
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// Run every migration that has not been recorded yet.
/// Returns the number of steps applied.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for (version, message, step) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        step(&tx).map_err(|e| AppError::Migration(format!("{version}: {e}")))?;
        ttlog(&tx, "migration_applied", version, message)?;
        tx.commit()?;
        applied += 1;
    }

    Ok(applied)
}

/// Versions recorded as applied, oldest first.
pub fn applied_versions(conn: &Connection) -> AppResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT target FROM log WHERE operation = 'migration_applied' ORDER BY id ASC",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
