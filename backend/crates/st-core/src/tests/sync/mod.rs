mod conflict;
mod migration_result;
mod store_error;
mod store_snapshot;
