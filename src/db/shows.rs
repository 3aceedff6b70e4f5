use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::{row_exists, start_time_column};
use crate::error::{BookingError, Result, SqlContext};
use crate::models::{encode_start_time, NewShow, Show, ShowListing, ShowOwner, ShowTiming};

/// Shows joined with the venue and artist columns the projections render.
const LISTING_SELECT: &str = "SELECT s.id, s.start_time, s.artist_id, s.venue_id,
                                     v.name, v.image_link, a.name, a.image_link
                              FROM shows s
                              INNER JOIN venues v ON v.id = s.venue_id
                              INNER JOIN artists a ON a.id = s.artist_id";

fn show_from_row(row: &Row<'_>) -> rusqlite::Result<Show> {
    Ok(Show {
        id: row.get(0)?,
        start_time: start_time_column(row, 1)?,
        artist_id: row.get(2)?,
        venue_id: row.get(3)?,
    })
}

fn listing_from_row(row: &Row<'_>) -> rusqlite::Result<ShowListing> {
    Ok(ShowListing {
        show: show_from_row(row)?,
        venue_name: row.get(4)?,
        venue_image_link: row.get(5)?,
        artist_name: row.get(6)?,
        artist_image_link: row.get(7)?,
    })
}

/// Column holding the owner's id, plus the id itself.
fn owner_filter(owner: ShowOwner) -> (&'static str, i64) {
    match owner {
        ShowOwner::Venue(id) => ("venue_id", id),
        ShowOwner::Artist(id) => ("artist_id", id),
    }
}

/// Both parents must exist before a show may point at them.
fn ensure_parents(conn: &Connection, artist_id: i64, venue_id: i64) -> Result<()> {
    if !row_exists(conn, "artists", artist_id)? {
        return Err(BookingError::constraint(format!(
            "artist {artist_id} does not exist"
        )));
    }
    if !row_exists(conn, "venues", venue_id)? {
        return Err(BookingError::constraint(format!(
            "venue {venue_id} does not exist"
        )));
    }
    Ok(())
}

/// Load one show by id, without its venue and artist details.
pub fn fetch_show(conn: &Connection, id: i64) -> Result<Show> {
    debug!(show_id = id, "fetching show");
    conn.query_row(
        "SELECT id, start_time, artist_id, venue_id FROM shows WHERE id = ?1",
        params![id],
        show_from_row,
    )
    .optional()
    .sql_context("failed to load show")?
    .ok_or_else(|| BookingError::not_found("show", id))
}

/// Every show with its venue and artist, earliest first.
pub fn fetch_shows(conn: &Connection) -> Result<Vec<ShowListing>> {
    let mut stmt = conn
        .prepare(&format!("{LISTING_SELECT} ORDER BY s.start_time, s.id"))
        .sql_context("failed to prepare show listing query")?;

    let shows = stmt
        .query_map([], listing_from_row)
        .sql_context("failed to load shows")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .sql_context("failed to collect shows")?;

    Ok(shows)
}

/// Shows of one venue or artist on one side of `now`. The split is decided
/// by [`ShowTiming::classify`], so a show starting exactly at `now` is left
/// out of both sides.
pub fn fetch_shows_for(
    conn: &Connection,
    owner: ShowOwner,
    timing: ShowTiming,
    now: NaiveDateTime,
) -> Result<Vec<ShowListing>> {
    let (column, owner_id) = owner_filter(owner);

    let mut stmt = conn
        .prepare(&format!(
            "{LISTING_SELECT} WHERE s.{column} = ?1 ORDER BY s.start_time, s.id"
        ))
        .sql_context("failed to prepare owner show query")?;

    let shows = stmt
        .query_map(params![owner_id], listing_from_row)
        .sql_context("failed to load owner shows")?
        .filter(|row| {
            row.as_ref().map_or(true, |listing| {
                ShowTiming::classify(listing.show.start_time, now) == Some(timing)
            })
        })
        .collect::<rusqlite::Result<Vec<_>>>()
        .sql_context("failed to collect owner shows")?;

    debug!(?owner, ?timing, count = shows.len(), "loaded shows");
    Ok(shows)
}

/// Count-only variant of [`fetch_shows_for`]. Reads just the start times so
/// listing pages don't pay for the venue and artist join.
pub fn count_shows_for(
    conn: &Connection,
    owner: ShowOwner,
    timing: ShowTiming,
    now: NaiveDateTime,
) -> Result<usize> {
    let (column, owner_id) = owner_filter(owner);

    let mut stmt = conn
        .prepare(&format!("SELECT start_time FROM shows WHERE {column} = ?1"))
        .sql_context("failed to prepare show count query")?;

    let start_times = stmt
        .query_map(params![owner_id], |row| start_time_column(row, 0))
        .sql_context("failed to count shows")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .sql_context("failed to collect show start times")?;

    Ok(start_times
        .into_iter()
        .filter(|start_time| ShowTiming::classify(*start_time, now) == Some(timing))
        .count())
}

/// Book a show. The referenced artist and venue are checked inside the same
/// transaction as the insert so a failed check leaves no row behind.
pub fn insert_show(conn: &Connection, show: &NewShow) -> Result<Show> {
    let tx = conn
        .unchecked_transaction()
        .sql_context("failed to begin show insert")?;

    ensure_parents(&tx, show.artist_id, show.venue_id)?;
    tx.execute(
        "INSERT INTO shows (start_time, artist_id, venue_id) VALUES (?1, ?2, ?3)",
        params![encode_start_time(&show.start_time), show.artist_id, show.venue_id],
    )
    .sql_context("failed to insert show")?;
    let id = tx.last_insert_rowid();
    tx.commit().sql_context("failed to commit show insert")?;

    info!(
        show_id = id,
        artist_id = show.artist_id,
        venue_id = show.venue_id,
        "show listed"
    );
    Ok(show.clone().into_show(id))
}

/// Reschedule or reassign an existing show.
pub fn update_show(conn: &Connection, show: &Show) -> Result<()> {
    let tx = conn
        .unchecked_transaction()
        .sql_context("failed to begin show update")?;

    if !row_exists(&tx, "shows", show.id)? {
        return Err(BookingError::not_found("show", show.id));
    }
    ensure_parents(&tx, show.artist_id, show.venue_id)?;
    tx.execute(
        "UPDATE shows SET start_time = ?1, artist_id = ?2, venue_id = ?3 WHERE id = ?4",
        params![
            encode_start_time(&show.start_time),
            show.artist_id,
            show.venue_id,
            show.id
        ],
    )
    .sql_context("failed to update show")?;
    tx.commit().sql_context("failed to commit show update")?;

    info!(show_id = show.id, "show updated");
    Ok(())
}

/// Cancel a single show. Its venue and artist are left untouched.
pub fn delete_show(conn: &Connection, id: i64) -> Result<()> {
    let tx = conn
        .unchecked_transaction()
        .sql_context("failed to begin show delete")?;
    let deleted = tx
        .execute("DELETE FROM shows WHERE id = ?1", params![id])
        .sql_context("failed to delete show")?;

    if deleted == 0 {
        return Err(BookingError::not_found("show", id));
    }
    tx.commit().sql_context("failed to commit show delete")?;

    info!(show_id = id, "show deleted");
    Ok(())
}
