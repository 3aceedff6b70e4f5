//! Read-only projections handed to the presentation layer. Each one is a
//! plain `Serialize` struct; functions that classify shows take `now`
//! explicitly so the past/upcoming split is decided by the caller's clock.

use chrono::NaiveDateTime;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::{
    count_shows_for, fetch_artists, fetch_shows, fetch_shows_for, fetch_venue_locations,
    fetch_venues_in, search_artists, search_venues,
};
use crate::error::Result;
use crate::models::{display_start_time, Artist, ShowListing, ShowOwner, ShowTiming, Venue};

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Minimal listing entry used by search results and index pages.
pub struct ShortFormat {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueLongFormat {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistLongFormat {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A show as listed on a venue page: who plays and when.
pub struct ShowArtistFormat {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A show as listed on an artist page: where and when.
pub struct ShowVenueFormat {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A show in the global show listing.
pub struct ShowFormat {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub venue_image_link: Option<String>,
    pub start_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueWithShows {
    #[serde(flatten)]
    pub venue: VenueLongFormat,
    pub past_shows: Vec<ShowArtistFormat>,
    pub upcoming_shows: Vec<ShowArtistFormat>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistWithShows {
    #[serde(flatten)]
    pub artist: ArtistLongFormat,
    pub past_shows: Vec<ShowVenueFormat>,
    pub upcoming_shows: Vec<ShowVenueFormat>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Venues that share one city and state.
pub struct LocationGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<ShortFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl From<&ShowListing> for ShowArtistFormat {
    fn from(listing: &ShowListing) -> Self {
        Self {
            artist_id: listing.show.artist_id,
            artist_name: listing.artist_name.clone(),
            artist_image_link: listing.artist_image_link.clone(),
            start_time: display_start_time(&listing.show.start_time),
        }
    }
}

impl From<&ShowListing> for ShowVenueFormat {
    fn from(listing: &ShowListing) -> Self {
        Self {
            venue_id: listing.show.venue_id,
            venue_name: listing.venue_name.clone(),
            venue_image_link: listing.venue_image_link.clone(),
            start_time: display_start_time(&listing.show.start_time),
        }
    }
}

impl From<&ShowListing> for ShowFormat {
    fn from(listing: &ShowListing) -> Self {
        Self {
            venue_id: listing.show.venue_id,
            venue_name: listing.venue_name.clone(),
            artist_id: listing.show.artist_id,
            artist_name: listing.artist_name.clone(),
            artist_image_link: listing.artist_image_link.clone(),
            venue_image_link: listing.venue_image_link.clone(),
            start_time: display_start_time(&listing.show.start_time),
        }
    }
}

/// Id, name and upcoming-show count for listings.
///
/// `num_upcoming_shows` counts shows strictly after `now`. Earlier versions
/// of this directory filled the field with the *past* show count. That was a
/// mislabel, and this count follows the field name instead. Use
/// [`count_shows_for`] with [`ShowTiming::Past`] for the old number.
pub fn venue_short_format(
    conn: &Connection,
    venue: &Venue,
    now: NaiveDateTime,
) -> Result<ShortFormat> {
    Ok(ShortFormat {
        id: venue.id,
        name: venue.name.clone(),
        num_upcoming_shows: count_shows_for(
            conn,
            ShowOwner::Venue(venue.id),
            ShowTiming::Upcoming,
            now,
        )?,
    })
}

/// Artist counterpart of [`venue_short_format`], with the same upcoming-only
/// count.
pub fn artist_short_format(
    conn: &Connection,
    artist: &Artist,
    now: NaiveDateTime,
) -> Result<ShortFormat> {
    Ok(ShortFormat {
        id: artist.id,
        name: artist.name.clone(),
        num_upcoming_shows: count_shows_for(
            conn,
            ShowOwner::Artist(artist.id),
            ShowTiming::Upcoming,
            now,
        )?,
    })
}

/// Every venue attribute with genres already decoded, and no show lists.
pub fn venue_long_format(venue: &Venue) -> VenueLongFormat {
    VenueLongFormat {
        id: venue.id,
        name: venue.name.clone(),
        genres: venue.genres.clone(),
        address: venue.address.clone(),
        city: venue.city.clone(),
        state: venue.state.clone(),
        phone: venue.phone.clone(),
        website: venue.website.clone(),
        facebook_link: venue.facebook_link.clone(),
        seeking_talent: venue.seeking_talent,
        seeking_description: venue.seeking_description.clone(),
        image_link: venue.image_link.clone(),
    }
}

/// Every artist attribute with genres already decoded, and no show lists.
pub fn artist_long_format(artist: &Artist) -> ArtistLongFormat {
    ArtistLongFormat {
        id: artist.id,
        name: artist.name.clone(),
        genres: artist.genres.clone(),
        city: artist.city.clone(),
        state: artist.state.clone(),
        phone: artist.phone.clone(),
        website: artist.website.clone(),
        facebook_link: artist.facebook_link.clone(),
        seeking_venue: artist.seeking_venue,
        seeking_description: artist.seeking_description.clone(),
        image_link: artist.image_link.clone(),
    }
}

/// Load one owner's shows on both sides of `now` and project each with `F`.
/// Shows starting exactly at `now` land in neither list.
fn partitioned_shows<F>(
    conn: &Connection,
    owner: ShowOwner,
    now: NaiveDateTime,
) -> Result<(Vec<F>, Vec<F>)>
where
    F: for<'a> From<&'a ShowListing>,
{
    let past = fetch_shows_for(conn, owner, ShowTiming::Past, now)?;
    let upcoming = fetch_shows_for(conn, owner, ShowTiming::Upcoming, now)?;
    Ok((
        past.iter().map(F::from).collect(),
        upcoming.iter().map(F::from).collect(),
    ))
}

/// Venue page: every attribute plus past and upcoming shows.
pub fn venue_with_shows(
    conn: &Connection,
    venue: &Venue,
    now: NaiveDateTime,
) -> Result<VenueWithShows> {
    let (past_shows, upcoming_shows) =
        partitioned_shows::<ShowArtistFormat>(conn, ShowOwner::Venue(venue.id), now)?;

    Ok(VenueWithShows {
        venue: venue_long_format(venue),
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })
}

/// Artist page: every attribute plus past and upcoming shows.
pub fn artist_with_shows(
    conn: &Connection,
    artist: &Artist,
    now: NaiveDateTime,
) -> Result<ArtistWithShows> {
    let (past_shows, upcoming_shows) =
        partitioned_shows::<ShowVenueFormat>(conn, ShowOwner::Artist(artist.id), now)?;

    Ok(ArtistWithShows {
        artist: artist_long_format(artist),
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })
}

/// Short formats of every venue at `city`/`state`, wrapped in their group.
fn location_group(
    conn: &Connection,
    city: &str,
    state: &str,
    now: NaiveDateTime,
) -> Result<LocationGroup> {
    let venues = fetch_venues_in(conn, city, state)?
        .iter()
        .map(|venue| venue_short_format(conn, venue, now))
        .collect::<Result<Vec<_>>>()?;

    Ok(LocationGroup {
        city: city.to_string(),
        state: state.to_string(),
        venues,
    })
}

/// All venues in the same city and state as `venue`, the venue included.
pub fn group_by_location(
    conn: &Connection,
    venue: &Venue,
    now: NaiveDateTime,
) -> Result<LocationGroup> {
    location_group(conn, &venue.city, &venue.state, now)
}

/// One group per distinct city/state, for the venue index.
pub fn venue_areas(conn: &Connection, now: NaiveDateTime) -> Result<Vec<LocationGroup>> {
    fetch_venue_locations(conn)?
        .iter()
        .map(|(city, state)| location_group(conn, city, state, now))
        .collect()
}

/// Short format of every artist, for the artist index.
pub fn artist_directory(conn: &Connection, now: NaiveDateTime) -> Result<Vec<ShortFormat>> {
    fetch_artists(conn)?
        .iter()
        .map(|artist| artist_short_format(conn, artist, now))
        .collect()
}

/// Every show with both parties identified, earliest first. Shows are not
/// classified here, so past, upcoming and ones happening now all appear.
pub fn show_listings(conn: &Connection) -> Result<Vec<ShowFormat>> {
    Ok(fetch_shows(conn)?.iter().map(ShowFormat::from).collect())
}

/// Venue search results as `{count, data}`, each match in short format.
pub fn search_venue_page(
    conn: &Connection,
    term: &str,
    now: NaiveDateTime,
) -> Result<SearchResponse<ShortFormat>> {
    let results = search_venues(conn, term)?;
    let data = results
        .items
        .iter()
        .map(|venue| venue_short_format(conn, venue, now))
        .collect::<Result<Vec<_>>>()?;

    Ok(SearchResponse {
        count: results.count,
        data,
    })
}

/// Artist search results as `{count, data}`, each match in short format.
pub fn search_artist_page(
    conn: &Connection,
    term: &str,
    now: NaiveDateTime,
) -> Result<SearchResponse<ShortFormat>> {
    let results = search_artists(conn, term)?;
    let data = results
        .items
        .iter()
        .map(|artist| artist_short_format(conn, artist, now))
        .collect::<Result<Vec<_>>>()?;

    Ok(SearchResponse {
        count: results.count,
        data,
    })
}
