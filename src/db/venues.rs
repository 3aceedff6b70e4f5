use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::{encode_genres_for, genres_column, name_matches, require_name};
use crate::error::{BookingError, Result, SqlContext};
use crate::models::{NewVenue, SearchResults, Venue};

const VENUE_COLUMNS: &str = "id, name, genres, address, city, state, phone, website, \
                             facebook_link, image_link, seeking_talent, seeking_description";

fn venue_from_row(row: &Row<'_>) -> rusqlite::Result<Venue> {
    Ok(Venue {
        id: row.get(0)?,
        name: row.get(1)?,
        genres: genres_column(row, 2)?,
        address: row.get(3)?,
        city: row.get(4)?,
        state: row.get(5)?,
        phone: row.get(6)?,
        website: row.get(7)?,
        facebook_link: row.get(8)?,
        image_link: row.get(9)?,
        seeking_talent: row.get(10)?,
        seeking_description: row.get(11)?,
    })
}

fn query_venues(
    conn: &Connection,
    sql: &str,
    args: impl rusqlite::Params,
    what: &str,
) -> Result<Vec<Venue>> {
    let mut stmt = conn
        .prepare(sql)
        .sql_context(&format!("failed to prepare {what} query"))?;

    let venues = stmt
        .query_map(args, venue_from_row)
        .sql_context(&format!("failed to load {what}"))?
        .collect::<rusqlite::Result<Vec<_>>>()
        .sql_context(&format!("failed to collect {what}"))?;

    Ok(venues)
}

/// Load one venue by id.
pub fn fetch_venue(conn: &Connection, id: i64) -> Result<Venue> {
    debug!(venue_id = id, "fetching venue");
    conn.query_row(
        &format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?1"),
        params![id],
        venue_from_row,
    )
    .optional()
    .sql_context("failed to load venue")?
    .ok_or_else(|| BookingError::not_found("venue", id))
}

/// Every venue in insertion order.
pub fn fetch_venues(conn: &Connection) -> Result<Vec<Venue>> {
    query_venues(
        conn,
        &format!("SELECT {VENUE_COLUMNS} FROM venues ORDER BY id"),
        [],
        "venues",
    )
}

/// Distinct `(city, state)` pairs that have at least one venue.
pub fn fetch_venue_locations(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT city, state FROM venues ORDER BY state, city")
        .sql_context("failed to prepare venue location query")?;

    let locations = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .sql_context("failed to load venue locations")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .sql_context("failed to collect venue locations")?;

    Ok(locations)
}

/// Venues sharing exactly the given city and state.
pub fn fetch_venues_in(conn: &Connection, city: &str, state: &str) -> Result<Vec<Venue>> {
    query_venues(
        conn,
        &format!("SELECT {VENUE_COLUMNS} FROM venues WHERE city = ?1 AND state = ?2 ORDER BY id"),
        params![city, state],
        "venues by location",
    )
}

/// Case-insensitive substring match on the venue name. The filter runs in
/// Rust so non-ASCII names fold case the same way ASCII ones do.
pub fn search_venues(conn: &Connection, term: &str) -> Result<SearchResults<Venue>> {
    let venues: Vec<Venue> = query_venues(
        conn,
        &format!("SELECT {VENUE_COLUMNS} FROM venues ORDER BY name COLLATE NOCASE, id"),
        [],
        "venue search",
    )?
    .into_iter()
    .filter(|venue| name_matches(&venue.name, term))
    .collect();

    debug!(term, matches = venues.len(), "searched venues");
    Ok(SearchResults::new(venues))
}

/// Insert a new venue row and return the hydrated record.
pub fn insert_venue(conn: &Connection, venue: &NewVenue) -> Result<Venue> {
    require_name("venue", &venue.name)?;
    let genres = encode_genres_for("venue", &venue.genres)?;

    let tx = conn
        .unchecked_transaction()
        .sql_context("failed to begin venue insert")?;
    tx.execute(
        "INSERT INTO venues (name, genres, address, city, state, phone, website,
                             facebook_link, image_link, seeking_talent, seeking_description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            venue.name,
            genres,
            venue.address,
            venue.city,
            venue.state,
            venue.phone,
            venue.website,
            venue.facebook_link,
            venue.image_link,
            venue.seeking_talent,
            venue.seeking_description,
        ],
    )
    .sql_context("failed to insert venue")?;
    let id = tx.last_insert_rowid();
    tx.commit().sql_context("failed to commit venue insert")?;

    info!(venue_id = id, name = %venue.name, "venue listed");
    Ok(venue.clone().into_venue(id))
}

/// Persist every editable field of an existing venue.
pub fn update_venue(conn: &Connection, venue: &Venue) -> Result<()> {
    require_name("venue", &venue.name)?;
    let genres = encode_genres_for("venue", &venue.genres)?;

    let tx = conn
        .unchecked_transaction()
        .sql_context("failed to begin venue update")?;
    let updated = tx
        .execute(
            "UPDATE venues SET name = ?1, genres = ?2, address = ?3, city = ?4, state = ?5,
                    phone = ?6, website = ?7, facebook_link = ?8, image_link = ?9,
                    seeking_talent = ?10, seeking_description = ?11
             WHERE id = ?12",
            params![
                venue.name,
                genres,
                venue.address,
                venue.city,
                venue.state,
                venue.phone,
                venue.website,
                venue.facebook_link,
                venue.image_link,
                venue.seeking_talent,
                venue.seeking_description,
                venue.id,
            ],
        )
        .sql_context("failed to update venue")?;

    if updated == 0 {
        return Err(BookingError::not_found("venue", venue.id));
    }
    tx.commit().sql_context("failed to commit venue update")?;

    info!(venue_id = venue.id, "venue updated");
    Ok(())
}

/// Remove a venue together with every show booked there. Returns how many
/// shows went with it.
pub fn delete_venue(conn: &Connection, id: i64) -> Result<usize> {
    let tx = conn
        .unchecked_transaction()
        .sql_context("failed to begin venue delete")?;

    let removed_shows = tx
        .execute("DELETE FROM shows WHERE venue_id = ?1", params![id])
        .sql_context("failed to delete venue shows")?;
    let deleted = tx
        .execute("DELETE FROM venues WHERE id = ?1", params![id])
        .sql_context("failed to delete venue")?;

    if deleted == 0 {
        return Err(BookingError::not_found("venue", id));
    }
    tx.commit().sql_context("failed to commit venue delete")?;

    info!(venue_id = id, removed_shows, "venue deleted");
    Ok(removed_shows)
}
