use st_core::StoreError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while talking to the remote record service
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("Remote returned {status}: {message} (code: {code}) {location}")]
    Status {
        status: u16,
        code: String,
        message: String,
        record_id: Option<Uuid>,
        location: ErrorLocation,
    },

    #[error("JSON parse error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid remote configuration: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },
}

impl ClientError {
    #[track_caller]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        ClientError::Http {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    #[track_caller]
    pub fn from_json(err: serde_json::Error) -> Self {
        ClientError::Json {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    /// Builds a status error from a non-success response body. The body is
    /// read as `{"error": {"code", "message"}}` when it has that shape.
    #[track_caller]
    pub fn status(status: u16, body: &str, record_id: Option<Uuid>) -> Self {
        let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
        let error = parsed.as_ref().and_then(|v| v.get("error"));
        let code = error
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let message = error
            .and_then(|e| e.get("message"))
            .and_then(|v| v.as_str())
            .map(String::from)
            .unwrap_or_else(|| body.chars().take(200).collect());

        ClientError::Status {
            status,
            code,
            message,
            record_id,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn config(message: impl Into<String>) -> Self {
        ClientError::Config {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        ClientError::from_reqwest(err)
    }
}

impl From<serde_json::Error> for ClientError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        ClientError::from_json(err)
    }
}

impl From<ClientError> for StoreError {
    #[track_caller]
    fn from(err: ClientError) -> Self {
        match &err {
            ClientError::Http { source, .. } if source.is_decode() => {
                StoreError::decode(err.to_string())
            }
            ClientError::Http { .. } => StoreError::network_unavailable(err.to_string()),
            ClientError::Status {
                status, record_id, ..
            } => match *status {
                409 => StoreError::constraint_violation(
                    record_id.unwrap_or_else(Uuid::nil),
                    err.to_string(),
                ),
                429 | 507 => StoreError::quota_exceeded(err.to_string()),
                408 | 500..=599 => StoreError::network_unavailable(err.to_string()),
                _ => StoreError::rejected(err.to_string()),
            },
            ClientError::Json { .. } => StoreError::decode(err.to_string()),
            ClientError::Config { .. } => StoreError::rejected(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
