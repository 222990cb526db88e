use crate::{Record, RecordType, StoreResult, StoreSnapshot};

use async_trait::async_trait;
use uuid::Uuid;

/// The three operations every store (local or remote) exposes.
///
/// `insert` must be idempotent on `record.id`: re-inserting an identical
/// record succeeds, inserting different contents under an existing id fails
/// with `StoreError::ConstraintViolation`. A record is either fully written
/// or absent after `insert` returns, whatever the outcome.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short label used in logs ("local", "remote", ...).
    fn label(&self) -> &str;

    /// Complete, consistent snapshot of every record of `record_type`.
    async fn fetch_all(&self, record_type: RecordType) -> StoreResult<StoreSnapshot>;

    async fn insert(&self, record: &Record) -> StoreResult<()>;

    async fn exists(&self, id: Uuid) -> StoreResult<bool>;
}
