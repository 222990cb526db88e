use st_core::StoreError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLx error: {source} {location}")]
    Sqlx {
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("Migration error: {message} {location}")]
    Migration {
        message: String,
        location: ErrorLocation,
    },

    #[error("Database initialization failed: {message} {location}")]
    Initialization {
        message: String,
        location: ErrorLocation,
    },

    #[error("Record {id} already stored with different contents {location}")]
    Conflict { id: Uuid, location: ErrorLocation },

    #[error("Corrupt row {id}: {message} {location}")]
    Decode {
        id: String,
        message: String,
        location: ErrorLocation,
    },
}

impl DbError {
    #[track_caller]
    pub fn conflict(id: Uuid) -> Self {
        Self::Conflict {
            id,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn decode(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            id: id.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<sqlx::Error> for DbError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        Self::Sqlx {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<DbError> for StoreError {
    #[track_caller]
    fn from(err: DbError) -> Self {
        match &err {
            DbError::Conflict { id, .. } => StoreError::constraint_violation(*id, err.to_string()),
            DbError::Decode { .. } => StoreError::decode(err.to_string()),
            DbError::Sqlx { source, .. } => match source {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                    StoreError::rejected(format!("referenced subscription missing: {err}"))
                }
                sqlx::Error::Database(db) if is_busy(db.code().as_deref()) => {
                    StoreError::timeout(format!("database busy: {err}"))
                }
                sqlx::Error::PoolTimedOut => StoreError::timeout(err.to_string()),
                _ => StoreError::persistence_unavailable(err.to_string()),
            },
            DbError::Migration { .. } | DbError::Initialization { .. } => {
                StoreError::persistence_unavailable(err.to_string())
            }
        }
    }
}

/// SQLITE_BUSY (5) and SQLITE_LOCKED (6), including extended codes.
pub(crate) fn is_busy(code: Option<&str>) -> bool {
    code.and_then(|c| c.parse::<i32>().ok())
        .is_some_and(|c| matches!(c & 0xff, 5 | 6))
}

pub type Result<T> = std::result::Result<T, DbError>;
