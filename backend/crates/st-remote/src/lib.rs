//! HTTP adapter exposing the remote record service as a `RecordStore`.

pub(crate) mod client;
pub(crate) mod error;


pub use client::{DEVICE_ID_HEADER, RemoteRecordStore};
pub use error::{ClientError, Result as ClientResult};
