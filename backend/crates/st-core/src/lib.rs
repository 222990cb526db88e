pub mod error;
pub mod models;
pub mod sync;

#[cfg(test)]
mod tests;

pub use error::{CoreError, CoreResult};
pub use models::billing_cycle::BillingCycle;
pub use models::billing_record::BillingRecord;
pub use models::credit_card::CreditCard;
pub use models::device_identity::DeviceIdentity;
pub use models::record::{Fields, Record, now_millis};
pub use models::record_type::RecordType;
pub use models::subscription::Subscription;
pub use models::tag::Tag;
pub use sync::conflict::{Resolution, last_writer_wins};
pub use sync::migration_result::{
    AbortReason, MigrationResult, MigrationState, MigrationStatus, RecordCounts,
};
pub use sync::record_scope::RecordScope;
pub use sync::record_store::RecordStore;
pub use sync::storage_mode::StorageMode;
pub use sync::store_error::{StoreError, StoreResult};
pub use sync::store_snapshot::StoreSnapshot;
