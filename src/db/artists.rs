use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::{encode_genres_for, genres_column, name_matches, require_name};
use crate::error::{BookingError, Result, SqlContext};
use crate::models::{Artist, NewArtist, SearchResults};

const ARTIST_COLUMNS: &str = "id, name, genres, city, state, phone, website, facebook_link, \
                              image_link, seeking_venue, seeking_description";

fn artist_from_row(row: &Row<'_>) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: row.get(0)?,
        name: row.get(1)?,
        genres: genres_column(row, 2)?,
        city: row.get(3)?,
        state: row.get(4)?,
        phone: row.get(5)?,
        website: row.get(6)?,
        facebook_link: row.get(7)?,
        image_link: row.get(8)?,
        seeking_venue: row.get(9)?,
        seeking_description: row.get(10)?,
    })
}

/// Load one artist by id.
pub fn fetch_artist(conn: &Connection, id: i64) -> Result<Artist> {
    debug!(artist_id = id, "fetching artist");
    conn.query_row(
        &format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = ?1"),
        params![id],
        artist_from_row,
    )
    .optional()
    .sql_context("failed to load artist")?
    .ok_or_else(|| BookingError::not_found("artist", id))
}

/// Every artist in insertion order.
pub fn fetch_artists(conn: &Connection) -> Result<Vec<Artist>> {
    let mut stmt = conn
        .prepare(&format!("SELECT {ARTIST_COLUMNS} FROM artists ORDER BY id"))
        .sql_context("failed to prepare artist query")?;

    let artists = stmt
        .query_map([], artist_from_row)
        .sql_context("failed to load artists")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .sql_context("failed to collect artists")?;

    Ok(artists)
}

/// Case-insensitive substring match on the artist name, so "ROCK" finds
/// "Rock Revival" and "CAFÉ" finds "Café Élan".
pub fn search_artists(conn: &Connection, term: &str) -> Result<SearchResults<Artist>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {ARTIST_COLUMNS} FROM artists ORDER BY name COLLATE NOCASE, id"
        ))
        .sql_context("failed to prepare artist search")?;

    let artists = stmt
        .query_map([], artist_from_row)
        .sql_context("failed to search artists")?
        .filter(|row| {
            row.as_ref()
                .map_or(true, |artist| name_matches(&artist.name, term))
        })
        .collect::<rusqlite::Result<Vec<_>>>()
        .sql_context("failed to collect artist matches")?;

    debug!(term, matches = artists.len(), "searched artists");
    Ok(SearchResults::new(artists))
}

/// Insert a new artist row and return the hydrated record.
pub fn insert_artist(conn: &Connection, artist: &NewArtist) -> Result<Artist> {
    require_name("artist", &artist.name)?;
    let genres = encode_genres_for("artist", &artist.genres)?;

    let tx = conn
        .unchecked_transaction()
        .sql_context("failed to begin artist insert")?;
    tx.execute(
        "INSERT INTO artists (name, genres, city, state, phone, website, facebook_link,
                              image_link, seeking_venue, seeking_description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            artist.name,
            genres,
            artist.city,
            artist.state,
            artist.phone,
            artist.website,
            artist.facebook_link,
            artist.image_link,
            artist.seeking_venue,
            artist.seeking_description,
        ],
    )
    .sql_context("failed to insert artist")?;
    let id = tx.last_insert_rowid();
    tx.commit().sql_context("failed to commit artist insert")?;

    info!(artist_id = id, name = %artist.name, "artist listed");
    Ok(artist.clone().into_artist(id))
}

/// Persist every editable field of an existing artist. Like the venue
/// helper, an unknown id is reported instead of silently ignored.
pub fn update_artist(conn: &Connection, artist: &Artist) -> Result<()> {
    require_name("artist", &artist.name)?;
    let genres = encode_genres_for("artist", &artist.genres)?;

    let tx = conn
        .unchecked_transaction()
        .sql_context("failed to begin artist update")?;
    let updated = tx
        .execute(
            "UPDATE artists SET name = ?1, genres = ?2, city = ?3, state = ?4, phone = ?5,
                    website = ?6, facebook_link = ?7, image_link = ?8, seeking_venue = ?9,
                    seeking_description = ?10
             WHERE id = ?11",
            params![
                artist.name,
                genres,
                artist.city,
                artist.state,
                artist.phone,
                artist.website,
                artist.facebook_link,
                artist.image_link,
                artist.seeking_venue,
                artist.seeking_description,
                artist.id,
            ],
        )
        .sql_context("failed to update artist")?;

    if updated == 0 {
        return Err(BookingError::not_found("artist", artist.id));
    }
    tx.commit().sql_context("failed to commit artist update")?;

    info!(artist_id = artist.id, "artist updated");
    Ok(())
}

/// Remove an artist and all of their shows in one transaction.
pub fn delete_artist(conn: &Connection, id: i64) -> Result<usize> {
    let tx = conn
        .unchecked_transaction()
        .sql_context("failed to begin artist delete")?;

    let removed_shows = tx
        .execute("DELETE FROM shows WHERE artist_id = ?1", params![id])
        .sql_context("failed to delete artist shows")?;
    let deleted = tx
        .execute("DELETE FROM artists WHERE id = ?1", params![id])
        .sql_context("failed to delete artist")?;

    if deleted == 0 {
        return Err(BookingError::not_found("artist", id));
    }
    tx.commit().sql_context("failed to commit artist delete")?;

    info!(artist_id = id, removed_shows, "artist deleted");
    Ok(removed_shows)
}
