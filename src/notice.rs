//! User-facing outcome messages for write submissions. This is the boundary
//! where store errors stop propagating: each helper runs one entity operation
//! and turns the result into a notice the presentation layer can flash.

use rusqlite::Connection;
use serde::Serialize;
use tracing::warn;

use crate::db::{
    delete_artist, delete_show, delete_venue, insert_artist, insert_show, insert_venue,
    update_artist, update_venue,
};
use crate::error::BookingError;
use crate::models::{Artist, NewArtist, NewShow, NewVenue, Venue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Severity of a notice.
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Log the underlying error and hand back the generic message. Details stay
/// in the log; the user only sees `text`.
fn failure(err: &BookingError, text: String) -> Notice {
    warn!(error = %err, "submission failed");
    Notice::error(text)
}

pub fn create_venue_submission(conn: &Connection, venue: &NewVenue) -> Notice {
    match insert_venue(conn, venue) {
        Ok(_) => Notice::info(format!("Venue {} was successfully listed!", venue.name)),
        Err(err) => failure(
            &err,
            format!("An error occurred. Venue {} could not be listed.", venue.name),
        ),
    }
}

pub fn edit_venue_submission(conn: &Connection, venue: &Venue) -> Notice {
    match update_venue(conn, venue) {
        Ok(()) => Notice::info(format!("Venue {} was successfully updated!", venue.name)),
        Err(err) => failure(
            &err,
            format!("An error occurred. Venue {} could not be updated.", venue.name),
        ),
    }
}

pub fn delete_venue_request(conn: &Connection, id: i64) -> Notice {
    match delete_venue(conn, id) {
        Ok(_) => Notice::info("Venue was deleted."),
        Err(err) if err.is_not_found() => failure(&err, "Venue not found.".to_string()),
        Err(err) => failure(
            &err,
            "An error occurred. Venue could not be deleted.".to_string(),
        ),
    }
}

pub fn create_artist_submission(conn: &Connection, artist: &NewArtist) -> Notice {
    match insert_artist(conn, artist) {
        Ok(_) => Notice::info(format!("Artist {} was successfully listed!", artist.name)),
        Err(err) => failure(
            &err,
            format!("An error occurred. Artist {} could not be listed.", artist.name),
        ),
    }
}

pub fn edit_artist_submission(conn: &Connection, artist: &Artist) -> Notice {
    match update_artist(conn, artist) {
        Ok(()) => Notice::info(format!("Artist {} was successfully updated!", artist.name)),
        Err(err) => failure(
            &err,
            format!("An error occurred. Artist {} could not be updated.", artist.name),
        ),
    }
}

pub fn delete_artist_request(conn: &Connection, id: i64) -> Notice {
    match delete_artist(conn, id) {
        Ok(_) => Notice::info("Artist was deleted."),
        Err(err) if err.is_not_found() => failure(&err, "Artist not found.".to_string()),
        Err(err) => failure(
            &err,
            "An error occurred. Artist could not be deleted.".to_string(),
        ),
    }
}

pub fn create_show_submission(conn: &Connection, show: &NewShow) -> Notice {
    match insert_show(conn, show) {
        Ok(_) => Notice::info("Show was successfully listed!"),
        Err(err) => failure(
            &err,
            "An error occurred. Show could not be listed.".to_string(),
        ),
    }
}

pub fn delete_show_request(conn: &Connection, id: i64) -> Notice {
    match delete_show(conn, id) {
        Ok(()) => Notice::info("Show was deleted."),
        Err(err) if err.is_not_found() => failure(&err, "Show not found.".to_string()),
        Err(err) => failure(
            &err,
            "An error occurred. Show could not be deleted.".to_string(),
        ),
    }
}
