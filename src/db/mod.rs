//! Persistence module split across logical submodules. Every function takes
//! the store handle explicitly and every write commits its own transaction
//! before returning.

mod artists;
mod connection;
mod shows;
mod venues;

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::error::{BookingError, Result, SqlContext};
use crate::models::{decode_genres, decode_start_time};

pub use artists::{
    delete_artist, fetch_artist, fetch_artists, insert_artist, search_artists, update_artist,
};
pub use connection::{ensure_schema, open_in_memory, open_store};
pub use shows::{
    count_shows_for, delete_show, fetch_show, fetch_shows, fetch_shows_for, insert_show,
    update_show,
};
pub use venues::{
    delete_venue, fetch_venue, fetch_venue_locations, fetch_venues, fetch_venues_in,
    insert_venue, search_venues, update_venue,
};

/// Read a JSON genre list out of `idx`. A row that fails to decode surfaces as
/// a conversion failure rather than an empty list.
fn genres_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(idx)?;
    decode_genres(&raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

fn start_time_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<chrono::NaiveDateTime> {
    let raw: String = row.get(idx)?;
    decode_start_time(&raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err)))
}

/// Case-insensitive substring test used by name search. Both sides are
/// lowercased with full Unicode rules, which SQLite's `LIKE` does not do
/// beyond ASCII. An empty term matches every name.
fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

/// Reject blank names before they reach the store.
fn require_name(entity: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        Err(BookingError::constraint(format!("{entity} name is required")))
    } else {
        Ok(())
    }
}

fn encode_genres_for(entity: &str, genres: &[String]) -> Result<String> {
    crate::models::encode_genres(genres)
        .map_err(|err| BookingError::persistence(format!("failed to encode {entity} genres"), err))
}

/// Whether `table` holds a row with `id`. Only called with the fixed table
/// names below.
fn row_exists(conn: &Connection, table: &str, id: i64) -> Result<bool> {
    conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)"),
        params![id],
        |row| row.get(0),
    )
    .sql_context("failed to check row existence")
}
