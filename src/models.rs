//! Domain records that mirror the SQLite schema. These stay plain data
//! holders; persistence lives in `db` and presentation shapes in `views`.
//! Genres and start times have a persisted text encoding, and the codecs for
//! both live here so every layer agrees on the exact format.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Text layout of `shows.start_time`. Fixed width down to the nanosecond, so
/// stored values sort chronologically and read back exactly as written.
pub const START_TIME_STORAGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.9f";

/// Layout used by every show projection.
pub const START_TIME_DISPLAY_FORMAT: &str = "%m/%d/%Y, %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A physical location that hosts shows.
pub struct Venue {
    /// Primary key assigned by the store on insert.
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    /// Whether the venue is currently looking for performers.
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Venue attributes before the store has assigned an id.
pub struct NewVenue {
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

impl NewVenue {
    /// Attach the generated id, producing the hydrated record.
    pub fn into_venue(self, id: i64) -> Venue {
        Venue {
            id,
            name: self.name,
            genres: self.genres,
            address: self.address,
            city: self.city,
            state: self.state,
            phone: self.phone,
            website: self.website,
            facebook_link: self.facebook_link,
            image_link: self.image_link,
            seeking_talent: self.seeking_talent,
            seeking_description: self.seeking_description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A performer who appears at shows.
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    /// Whether the artist is currently looking for venues to play.
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewArtist {
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

impl NewArtist {
    pub fn into_artist(self, id: i64) -> Artist {
        Artist {
            id,
            name: self.name,
            genres: self.genres,
            city: self.city,
            state: self.state,
            phone: self.phone,
            website: self.website,
            facebook_link: self.facebook_link,
            image_link: self.image_link,
            seeking_venue: self.seeking_venue,
            seeking_description: self.seeking_description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A scheduled event linking exactly one artist to one venue.
pub struct Show {
    pub id: i64,
    pub start_time: NaiveDateTime,
    pub artist_id: i64,
    pub venue_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewShow {
    pub start_time: NaiveDateTime,
    pub artist_id: i64,
    pub venue_id: i64,
}

impl NewShow {
    pub fn into_show(self, id: i64) -> Show {
        Show {
            id,
            start_time: self.start_time,
            artist_id: self.artist_id,
            venue_id: self.venue_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A show joined with the identifying fields of its venue and artist, which
/// is what every show projection needs.
pub struct ShowListing {
    pub show: Show,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The parent whose shows are being looked up.
pub enum ShowOwner {
    Venue(i64),
    Artist(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which side of "now" a show falls on.
pub enum ShowTiming {
    Past,
    Upcoming,
}

impl ShowTiming {
    /// Classify `start_time` against `now`. A show starting exactly at `now`
    /// is neither past nor upcoming.
    pub fn classify(start_time: NaiveDateTime, now: NaiveDateTime) -> Option<ShowTiming> {
        if start_time < now {
            Some(ShowTiming::Past)
        } else if start_time > now {
            Some(ShowTiming::Upcoming)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Matches of a name search together with the total match count.
pub struct SearchResults<T> {
    pub count: usize,
    pub items: Vec<T>,
}

impl<T> SearchResults<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

/// Serialize a genre list into the text stored in the `genres` column.
pub fn encode_genres(genres: &[String]) -> serde_json::Result<String> {
    serde_json::to_string(genres)
}

/// Inverse of [`encode_genres`].
pub fn decode_genres(raw: &str) -> serde_json::Result<Vec<String>> {
    serde_json::from_str(raw)
}

/// Lossless text form of a start time for the `shows` table.
pub fn encode_start_time(start_time: &NaiveDateTime) -> String {
    start_time.format(START_TIME_STORAGE_FORMAT).to_string()
}

/// Inverse of [`encode_start_time`].
pub fn decode_start_time(raw: &str) -> chrono::ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, START_TIME_STORAGE_FORMAT)
}

/// Render a start time the way show projections present it.
pub fn display_start_time(start_time: &NaiveDateTime) -> String {
    start_time.format(START_TIME_DISPLAY_FORMAT).to_string()
}
