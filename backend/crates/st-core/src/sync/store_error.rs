use std::panic::Location;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error;
use uuid::Uuid;

/// Failure taxonomy shared by every `RecordStore` implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Local storage cannot be opened or written. Not retried.
    #[error("Persistence unavailable: {message} {location}")]
    PersistenceUnavailable {
        message: String,
        location: ErrorLocation,
    },

    /// Transient transport failure; mutation status unknown.
    #[error("Network unavailable: {message} {location}")]
    NetworkUnavailable {
        message: String,
        location: ErrorLocation,
    },

    #[error("Remote quota exceeded: {message} {location}")]
    RemoteQuotaExceeded {
        message: String,
        location: ErrorLocation,
    },

    /// Same identifier already stored with different contents.
    #[error("Constraint violation for record {id}: {message} {location}")]
    ConstraintViolation {
        id: Uuid,
        message: String,
        location: ErrorLocation,
    },

    #[error("Operation timed out: {operation} {location}")]
    Timeout {
        operation: String,
        location: ErrorLocation,
    },

    /// Store refused the record for a reason that retrying will not fix.
    #[error("Record rejected: {message} {location}")]
    Rejected {
        message: String,
        location: ErrorLocation,
    },

    #[error("Malformed record data: {message} {location}")]
    Decode {
        message: String,
        location: ErrorLocation,
    },
}

impl StoreError {
    /// Whether the same call may succeed if repeated.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkUnavailable { .. } | Self::Timeout { .. })
    }

    /// Whether a reconciliation run must stop when it sees this error.
    pub fn is_fatal_to_run(&self) -> bool {
        matches!(
            self,
            Self::PersistenceUnavailable { .. }
                | Self::RemoteQuotaExceeded { .. }
                | Self::ConstraintViolation { .. }
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PersistenceUnavailable { .. } => "PERSISTENCE_UNAVAILABLE",
            Self::NetworkUnavailable { .. } => "NETWORK_UNAVAILABLE",
            Self::RemoteQuotaExceeded { .. } => "REMOTE_QUOTA_EXCEEDED",
            Self::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Rejected { .. } => "REJECTED",
            Self::Decode { .. } => "DECODE",
        }
    }

    #[track_caller]
    pub fn persistence_unavailable(message: impl Into<String>) -> Self {
        Self::PersistenceUnavailable {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn network_unavailable(message: impl Into<String>) -> Self {
        Self::NetworkUnavailable {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::RemoteQuotaExceeded {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn constraint_violation(id: Uuid, message: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            id,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type StoreResult<T> = StdResult<T, StoreError>;
