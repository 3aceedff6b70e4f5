//! Error taxonomy shared by the entity and view layers. Callers at the
//! request boundary match on the three variants to decide which notice to
//! show; nothing below that boundary swallows an error.

use std::error::Error as StdError;

use rusqlite::ErrorCode;
use thiserror::Error;

/// Boxed error for wrapping store-level failures.
pub type BoxedError = Box<dyn StdError + Send + Sync>;

/// Result alias used by every store and projection function.
pub type Result<T> = std::result::Result<T, BookingError>;

#[derive(Debug, Error)]
pub enum BookingError {
    /// Id lookup miss.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Missing or invalid required field, or a dangling foreign key.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// Any other store-level failure (I/O, corrupt rows, SQLite errors).
    #[error("persistence error: {message}")]
    Persistence {
        message: String,
        #[source]
        source: Option<BoxedError>,
    },
}

impl BookingError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn constraint(message: impl Into<String>) -> Self {
        Self::ConstraintViolation(message.into())
    }

    pub fn persistence(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Persistence {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }
}

/// Extension for attaching a message to a raw SQLite error. Constraint
/// failures reported by SQLite itself (NOT NULL, FOREIGN KEY) become
/// `ConstraintViolation`; everything else is a persistence error.
pub(crate) trait SqlContext<T> {
    fn sql_context(self, message: &str) -> Result<T>;
}

impl<T> SqlContext<T> for std::result::Result<T, rusqlite::Error> {
    fn sql_context(self, message: &str) -> Result<T> {
        self.map_err(|err| map_sql_error(err, message))
    }
}

pub(crate) fn map_sql_error(err: rusqlite::Error, message: &str) -> BookingError {
    if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
        BookingError::ConstraintViolation(format!("{message}: {err}"))
    } else {
        BookingError::persistence(message, err)
    }
}
