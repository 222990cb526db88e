use crate::RecordType;

use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {message} {location}")]
    Validation {
        message: String,
        field: Option<String>,
        location: ErrorLocation,
    },

    #[error("Invalid record type: {value} {location}")]
    InvalidRecordType {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid billing cycle: {value} {location}")]
    InvalidBillingCycle {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid storage mode: {value} {location}")]
    InvalidStorageMode {
        value: String,
        location: ErrorLocation,
    },

    #[error("Record type mismatch: expected {expected}, found {found} {location}")]
    RecordTypeMismatch {
        expected: RecordType,
        found: RecordType,
        location: ErrorLocation,
    },
}

impl CoreError {
    /// Creates a Validation error at caller location.
    #[track_caller]
    pub fn validation(message: impl Into<String>, field: Option<&str>) -> Self {
        Self::Validation {
            message: message.into(),
            field: field.map(String::from),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Creates a RecordTypeMismatch error at caller location.
    #[track_caller]
    pub fn type_mismatch(expected: RecordType, found: RecordType) -> Self {
        Self::RecordTypeMismatch {
            expected,
            found,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type CoreResult<T> = StdResult<T, CoreError>;
