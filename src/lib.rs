//! Library surface for the booking directory: venues, artists, and the shows
//! that link them, stored in SQLite and shaped into page-ready projections.
//! The binary and any request-handling front end reuse the same pieces.
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod notice;
pub mod views;

/// Store bootstrap, re-exported for `main.rs` and tests.
pub use db::{open_in_memory, open_store};

pub use config::StoreConfig;
pub use error::{BookingError, Result};

/// The three persisted entities.
pub use models::{Artist, NewArtist, NewShow, NewVenue, Show, Venue};
