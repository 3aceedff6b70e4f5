use std::fs;
use std::path::Path;

use rusqlite::Connection;
use tracing::info;

use crate::error::{BookingError, Result, SqlContext};

/// Open (creating if needed) the database at `path`, enable foreign keys, and
/// run the lazy migrations.
pub fn open_store(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| BookingError::persistence("failed to create data directory", err))?;
    }

    let conn = Connection::open(path).sql_context("failed to open SQLite database")?;
    ensure_schema(&conn)?;
    info!(path = %path.display(), "store ready");
    Ok(conn)
}

/// Same as [`open_store`] but against a private in-memory database.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().sql_context("failed to open in-memory database")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Turn on `PRAGMA foreign_keys` and create the three tables if missing.
///
/// `shows` references both parents without `ON DELETE CASCADE`: removing a
/// venue or artist deletes its shows explicitly inside the same transaction,
/// and the foreign keys guarantee nothing is left dangling if that step is
/// ever skipped.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .sql_context("failed to enable foreign keys")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS venues (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            genres TEXT NOT NULL DEFAULT '[]',
            address TEXT NOT NULL DEFAULT '',
            city TEXT NOT NULL DEFAULT '',
            state TEXT NOT NULL DEFAULT '',
            phone TEXT,
            website TEXT,
            facebook_link TEXT,
            image_link TEXT,
            seeking_talent INTEGER NOT NULL DEFAULT 0,
            seeking_description TEXT
        )",
        [],
    )
    .sql_context("failed to create venues table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS artists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            genres TEXT NOT NULL DEFAULT '[]',
            city TEXT NOT NULL DEFAULT '',
            state TEXT NOT NULL DEFAULT '',
            phone TEXT,
            website TEXT,
            facebook_link TEXT,
            image_link TEXT,
            seeking_venue INTEGER NOT NULL DEFAULT 0,
            seeking_description TEXT
        )",
        [],
    )
    .sql_context("failed to create artists table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS shows (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            start_time TEXT NOT NULL,
            artist_id INTEGER NOT NULL,
            venue_id INTEGER NOT NULL,
            FOREIGN KEY(artist_id) REFERENCES artists(id),
            FOREIGN KEY(venue_id) REFERENCES venues(id)
        )",
        [],
    )
    .sql_context("failed to create shows table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS shows_by_venue ON shows (venue_id, start_time)",
        [],
    )
    .sql_context("failed to create venue show index")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS shows_by_artist ON shows (artist_id, start_time)",
        [],
    )
    .sql_context("failed to create artist show index")?;

    Ok(())
}
