//! Binary entry point: open the configured store and print the browse pages
//! (venues by area, artist directory, show listings) as JSON.
use anyhow::Context;
use booking_directory::views::{artist_directory, show_listings, venue_areas};
use booking_directory::{open_store, StoreConfig};
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = StoreConfig::from_env()?;
    let conn = open_store(&config.db_path)
        .with_context(|| format!("failed to open store at {}", config.db_path.display()))?;

    let now = chrono::Local::now().naive_local();
    let areas = venue_areas(&conn, now).context("failed to load venue areas")?;
    let artists = artist_directory(&conn, now).context("failed to load artists")?;
    let shows = show_listings(&conn).context("failed to load shows")?;
    info!(
        areas = areas.len(),
        artists = artists.len(),
        shows = shows.len(),
        "directory snapshot built"
    );

    let snapshot = json!({
        "areas": areas,
        "artists": artists,
        "shows": shows,
    });

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
