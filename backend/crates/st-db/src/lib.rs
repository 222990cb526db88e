pub mod connection;
pub mod error;
pub mod repositories;

pub use connection::local_database::LocalDatabase;
pub use error::{DbError, Result};
pub use repositories::record_repository::{InsertOutcome, RecordRepository};
