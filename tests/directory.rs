//! End-to-end checks of the entity and view layers against an in-memory
//! store. Every test pins `now` so show classification is deterministic.

use booking_directory::db::{
    delete_artist, delete_venue, fetch_artist, fetch_show, fetch_shows, fetch_venue,
    fetch_venues, insert_artist, insert_show, insert_venue, search_artists, search_venues,
    update_artist, update_show, update_venue,
};
use booking_directory::views::{
    artist_directory, artist_with_shows, group_by_location, search_artist_page,
    search_venue_page, show_listings, venue_areas, venue_long_format, venue_short_format,
    venue_with_shows, ShowArtistFormat,
};
use booking_directory::{
    open_in_memory, open_store, Artist, BookingError, NewArtist, NewShow, NewVenue, Show, Venue,
};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rusqlite::Connection;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap()
}

fn venue(conn: &Connection, name: &str, city: &str, state: &str) -> Venue {
    insert_venue(
        conn,
        &NewVenue {
            name: name.into(),
            city: city.into(),
            state: state.into(),
            ..NewVenue::default()
        },
    )
    .unwrap()
}

fn artist(conn: &Connection, name: &str) -> Artist {
    insert_artist(
        conn,
        &NewArtist {
            name: name.into(),
            image_link: Some(format!("https://img.example/{}.jpg", name.len())),
            ..NewArtist::default()
        },
    )
    .unwrap()
}

fn book(conn: &Connection, artist: &Artist, venue: &Venue, start_time: NaiveDateTime) -> i64 {
    insert_show(
        conn,
        &NewShow {
            start_time,
            artist_id: artist.id,
            venue_id: venue.id,
        },
    )
    .unwrap()
    .id
}

#[test]
fn fillmore_scenario_lists_yesterdays_show_as_past() {
    let conn = open_in_memory().unwrap();
    let fillmore = insert_venue(
        &conn,
        &NewVenue {
            name: "The Fillmore".into(),
            city: "SF".into(),
            state: "CA".into(),
            genres: vec!["Rock".into(), "Jazz".into()],
            ..NewVenue::default()
        },
    )
    .unwrap();
    let bloom = artist(&conn, "Sonic Bloom");
    let yesterday = now() - Duration::days(1);
    book(&conn, &bloom, &fillmore, yesterday);

    let page = venue_with_shows(&conn, &fillmore, now()).unwrap();

    assert_eq!(page.past_shows_count, 1);
    assert_eq!(page.upcoming_shows_count, 0);
    assert_eq!(page.venue.genres, vec!["Rock".to_string(), "Jazz".to_string()]);
    assert_eq!(
        page.past_shows,
        vec![ShowArtistFormat {
            artist_id: bloom.id,
            artist_name: "Sonic Bloom".into(),
            artist_image_link: bloom.image_link.clone(),
            start_time: "06/14/2024, 18:00:00".into(),
        }]
    );
    assert!(page.upcoming_shows.is_empty());
}

#[test]
fn shows_split_strictly_around_now() {
    let conn = open_in_memory().unwrap();
    let hall = venue(&conn, "Hall", "Austin", "TX");
    let act = artist(&conn, "Act");

    book(&conn, &act, &hall, now() - Duration::seconds(1));
    book(&conn, &act, &hall, now());
    book(&conn, &act, &hall, now() + Duration::seconds(1));
    book(&conn, &act, &hall, now() + Duration::days(30));

    let venue_page = venue_with_shows(&conn, &hall, now()).unwrap();
    assert_eq!(venue_page.past_shows_count, 1);
    assert_eq!(venue_page.upcoming_shows_count, 2);
    assert!(venue_page
        .past_shows
        .iter()
        .chain(venue_page.upcoming_shows.iter())
        .all(|show| show.start_time != "06/15/2024, 18:00:00"));

    let artist_page = artist_with_shows(&conn, &act, now()).unwrap();
    assert_eq!(artist_page.past_shows_count, 1);
    assert_eq!(artist_page.upcoming_shows_count, 2);
    assert_eq!(artist_page.upcoming_shows[0].venue_name, "Hall");
    assert_eq!(artist_page.upcoming_shows[0].start_time, "06/15/2024, 18:00:01");

    // Everything is still listed globally, including the show at exactly now.
    assert_eq!(show_listings(&conn).unwrap().len(), 4);
}

#[test]
fn short_format_counts_upcoming_shows() {
    let conn = open_in_memory().unwrap();
    let hall = venue(&conn, "Hall", "Austin", "TX");
    let act = artist(&conn, "Act");
    book(&conn, &act, &hall, now() - Duration::days(2));
    book(&conn, &act, &hall, now() - Duration::days(1));
    book(&conn, &act, &hall, now() + Duration::days(1));

    let short = venue_short_format(&conn, &hall, now()).unwrap();
    assert_eq!(short.id, hall.id);
    assert_eq!(short.name, "Hall");
    assert_eq!(short.num_upcoming_shows, 1);

    let directory = artist_directory(&conn, now()).unwrap();
    assert_eq!(directory.len(), 1);
    assert_eq!(directory[0].num_upcoming_shows, 1);
}

#[test]
fn deleting_a_venue_cascades_to_its_shows() {
    let conn = open_in_memory().unwrap();
    let doomed = venue(&conn, "Doomed", "Austin", "TX");
    let survivor = venue(&conn, "Survivor", "Austin", "TX");
    let act = artist(&conn, "Act");
    let gone_a = book(&conn, &act, &doomed, now() - Duration::days(1));
    let gone_b = book(&conn, &act, &doomed, now() + Duration::days(1));
    let kept = book(&conn, &act, &survivor, now() + Duration::days(1));

    assert_eq!(delete_venue(&conn, doomed.id).unwrap(), 2);

    assert!(fetch_venue(&conn, doomed.id).unwrap_err().is_not_found());
    assert!(fetch_show(&conn, gone_a).unwrap_err().is_not_found());
    assert!(fetch_show(&conn, gone_b).unwrap_err().is_not_found());
    assert_eq!(fetch_show(&conn, kept).unwrap().venue_id, survivor.id);
    assert!(fetch_artist(&conn, act.id).is_ok());
}

#[test]
fn deleting_an_artist_cascades_to_their_shows() {
    let conn = open_in_memory().unwrap();
    let hall = venue(&conn, "Hall", "Austin", "TX");
    let act = artist(&conn, "Act");
    let show_id = book(&conn, &act, &hall, now() + Duration::days(3));

    assert_eq!(delete_artist(&conn, act.id).unwrap(), 1);

    assert!(fetch_show(&conn, show_id).unwrap_err().is_not_found());
    assert!(fetch_shows(&conn).unwrap().is_empty());
    assert_eq!(venue_with_shows(&conn, &hall, now()).unwrap().upcoming_shows_count, 0);
}

#[test]
fn deleting_unknown_parents_is_not_found() {
    let conn = open_in_memory().unwrap();
    assert!(delete_venue(&conn, 99).unwrap_err().is_not_found());
    assert!(delete_artist(&conn, 99).unwrap_err().is_not_found());
}

#[test]
fn shows_with_dangling_references_are_rejected() {
    let conn = open_in_memory().unwrap();
    let hall = venue(&conn, "Hall", "Austin", "TX");
    let act = artist(&conn, "Act");

    let missing_artist = insert_show(
        &conn,
        &NewShow {
            start_time: now(),
            artist_id: act.id + 100,
            venue_id: hall.id,
        },
    )
    .unwrap_err();
    assert!(missing_artist.is_constraint_violation());

    let missing_venue = insert_show(
        &conn,
        &NewShow {
            start_time: now(),
            artist_id: act.id,
            venue_id: hall.id + 100,
        },
    )
    .unwrap_err();
    assert!(matches!(missing_venue, BookingError::ConstraintViolation(_)));

    assert!(fetch_shows(&conn).unwrap().is_empty());
}

#[test]
fn updates_persist_and_unknown_ids_are_not_found() {
    let conn = open_in_memory().unwrap();
    let mut hall = venue(&conn, "Hall", "Austin", "TX");
    hall.genres = Vec::new();
    hall.seeking_talent = true;
    hall.seeking_description = Some("Looking for jazz trios".into());
    update_venue(&conn, &hall).unwrap();
    assert_eq!(fetch_venue(&conn, hall.id).unwrap(), hall);

    let mut act = artist(&conn, "Act");
    act.genres = vec!["Folk".into()];
    act.name = "Renamed Act".into();
    update_artist(&conn, &act).unwrap();
    assert_eq!(fetch_artist(&conn, act.id).unwrap(), act);

    let ghost = Venue { id: 404, ..hall.clone() };
    assert!(update_venue(&conn, &ghost).unwrap_err().is_not_found());

    let ghost_artist = Artist { id: 404, ..act.clone() };
    assert!(update_artist(&conn, &ghost_artist).unwrap_err().is_not_found());

    let mut show = insert_show(
        &conn,
        &NewShow {
            start_time: now(),
            artist_id: act.id,
            venue_id: hall.id,
        },
    )
    .unwrap();
    show.start_time = now() + Duration::hours(2);
    update_show(&conn, &show).unwrap();
    assert_eq!(fetch_show(&conn, show.id).unwrap(), show);

    show.venue_id = 404;
    assert!(update_show(&conn, &show).unwrap_err().is_constraint_violation());

    let ghost_show = Show {
        id: 404,
        venue_id: hall.id,
        ..show.clone()
    };
    assert!(update_show(&conn, &ghost_show).unwrap_err().is_not_found());
}

#[test]
fn sub_microsecond_offsets_still_classify_strictly() {
    let conn = open_in_memory().unwrap();
    let hall = venue(&conn, "Hall", "Austin", "TX");
    let act = artist(&conn, "Act");
    let noon = NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    book(&conn, &act, &hall, noon);

    let just_after = noon + Duration::nanoseconds(500);
    let page = venue_with_shows(&conn, &hall, just_after).unwrap();
    assert_eq!(page.past_shows_count, 1);
    assert_eq!(page.upcoming_shows_count, 0);

    let just_before = noon - Duration::nanoseconds(500);
    let page = artist_with_shows(&conn, &act, just_before).unwrap();
    assert_eq!(page.past_shows_count, 0);
    assert_eq!(page.upcoming_shows_count, 1);
    assert_eq!(
        venue_short_format(&conn, &hall, just_before)
            .unwrap()
            .num_upcoming_shows,
        1
    );

    let page = venue_with_shows(&conn, &hall, noon).unwrap();
    assert_eq!((page.past_shows_count, page.upcoming_shows_count), (0, 0));
}

#[test]
fn start_times_round_trip_with_nanoseconds() {
    let conn = open_in_memory().unwrap();
    let hall = venue(&conn, "Hall", "Austin", "TX");
    let act = artist(&conn, "Act");
    let precise = NaiveDate::from_ymd_opt(2024, 6, 15)
        .unwrap()
        .and_hms_nano_opt(12, 0, 0, 123_456_789)
        .unwrap();

    let inserted = insert_show(
        &conn,
        &NewShow {
            start_time: precise,
            artist_id: act.id,
            venue_id: hall.id,
        },
    )
    .unwrap();

    assert_eq!(fetch_show(&conn, inserted.id).unwrap(), inserted);
    assert_eq!(inserted.start_time, precise);
}

#[test]
fn blank_names_violate_constraints() {
    let conn = open_in_memory().unwrap();
    let err = insert_venue(&conn, &NewVenue::default()).unwrap_err();
    assert!(err.is_constraint_violation());
    assert!(fetch_venues(&conn).unwrap().is_empty());
}

#[test]
fn long_format_round_trips_genres() {
    let conn = open_in_memory().unwrap();
    for genres in [
        Vec::new(),
        vec!["Blues".to_string()],
        vec!["R&B".to_string(), "Hip-Hop".to_string(), "\"Quoted\"".to_string()],
    ] {
        let stored = insert_venue(
            &conn,
            &NewVenue {
                name: "Genre Test".into(),
                genres: genres.clone(),
                ..NewVenue::default()
            },
        )
        .unwrap();
        let loaded = fetch_venue(&conn, stored.id).unwrap();
        assert_eq!(venue_long_format(&loaded).genres, genres);
    }
}

#[test]
fn search_is_case_insensitive_substring() {
    let conn = open_in_memory().unwrap();
    artist(&conn, "Rock Revival");
    artist(&conn, "The Rockers");
    artist(&conn, "Jazz Hands");

    let hits = search_artists(&conn, "ROCK").unwrap();
    assert_eq!(hits.count, 2);
    assert_eq!(
        hits.items.iter().map(|a| a.name.as_str()).collect::<Vec<_>>(),
        vec!["Rock Revival", "The Rockers"]
    );

    artist(&conn, "Café Élan");
    let accented = search_artists(&conn, "CAFÉ").unwrap();
    assert_eq!(accented.count, 1);
    assert_eq!(accented.items[0].name, "Café Élan");

    let none = search_artist_page(&conn, "polka", now()).unwrap();
    assert_eq!(none.count, 0);
    assert!(none.data.is_empty());
}

#[test]
fn search_treats_wildcards_literally() {
    let conn = open_in_memory().unwrap();
    venue(&conn, "100% Live", "Austin", "TX");
    venue(&conn, "Live Oak", "Austin", "TX");

    assert_eq!(search_venues(&conn, "%").unwrap().count, 1);
    assert_eq!(search_venues(&conn, "_").unwrap().count, 0);

    let page = search_venue_page(&conn, "live", now()).unwrap();
    assert_eq!(page.count, 2);
    assert_eq!(page.data[0].name, "100% Live");

    venue(&conn, "Österreich Halle", "Wien", "W");
    assert_eq!(search_venues(&conn, "öSTER").unwrap().count, 1);
}

#[test]
fn venues_group_by_city_and_state() {
    let conn = open_in_memory().unwrap();
    let first = venue(&conn, "Mohawk", "Austin", "TX");
    let second = venue(&conn, "Stubb's", "Austin", "TX");
    venue(&conn, "Paris Club", "Paris", "TX");
    venue(&conn, "Austin Hall", "Austin", "MN");

    for anchor in [&first, &second] {
        let group = group_by_location(&conn, anchor, now()).unwrap();
        assert_eq!(group.city, "Austin");
        assert_eq!(group.state, "TX");
        assert_eq!(
            group.venues.iter().map(|v| v.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
    }

    let areas = venue_areas(&conn, now()).unwrap();
    assert_eq!(areas.len(), 3);
    assert_eq!(areas.iter().map(|a| a.venues.len()).sum::<usize>(), 4);
}

#[test]
fn lookups_of_missing_ids_are_not_found() {
    let conn = open_in_memory().unwrap();
    let err = fetch_venue(&conn, 1).unwrap_err();
    assert!(matches!(
        err,
        BookingError::NotFound {
            entity: "venue",
            id: 1
        }
    ));
    assert!(fetch_artist(&conn, 1).unwrap_err().is_not_found());
    assert!(fetch_show(&conn, 1).unwrap_err().is_not_found());
}

#[test]
fn corrupt_genre_rows_surface_as_persistence_errors() {
    let conn = open_in_memory().unwrap();
    let hall = venue(&conn, "Hall", "Austin", "TX");
    conn.execute(
        "UPDATE venues SET genres = 'not json' WHERE id = ?1",
        [hall.id],
    )
    .unwrap();

    let err = fetch_venue(&conn, hall.id).unwrap_err();
    assert!(matches!(err, BookingError::Persistence { .. }));
}

#[test]
fn file_backed_store_persists_between_opens() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let db_path = temp_dir.path().join("nested").join("booking.sqlite");

    {
        let conn = open_store(&db_path).unwrap();
        venue(&conn, "The Fillmore", "SF", "CA");
    }

    let conn = open_store(&db_path).unwrap();
    let venues = fetch_venues(&conn).unwrap();
    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0].name, "The Fillmore");
}
