use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use directories::ProjectDirs;

/// Environment variable that overrides the database location.
pub const DB_PATH_ENV: &str = "BOOKING_DB_PATH";
/// Application name used to derive the platform data directory.
const APP_NAME: &str = "booking-directory";
/// SQLite file name stored inside the data directory.
const DB_FILE_NAME: &str = "booking.sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where the store lives on disk.
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl StoreConfig {
    /// Resolve the database path from `BOOKING_DB_PATH`, falling back to the
    /// platform's per-user data directory (`$XDG_DATA_HOME/booking-directory`
    /// on Linux, `Application Support` on macOS, `AppData\Roaming` on
    /// Windows).
    pub fn from_env() -> Result<Self> {
        Self::resolve(env::var(DB_PATH_ENV).ok())
    }

    fn resolve(override_path: Option<String>) -> Result<Self> {
        let db_path = match override_path.filter(|path| !path.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => default_db_path()?,
        };
        Ok(Self { db_path })
    }
}

fn default_db_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow!("could not locate a data directory for {APP_NAME}"))?;
    Ok(dirs.data_dir().join(DB_FILE_NAME))
}
