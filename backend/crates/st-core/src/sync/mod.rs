pub mod conflict;
pub mod migration_result;
pub mod record_scope;
pub mod record_store;
pub mod storage_mode;
pub mod store_error;
pub mod store_snapshot;
