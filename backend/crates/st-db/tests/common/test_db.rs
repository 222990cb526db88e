use st_db::{LocalDatabase, RecordRepository};

use sqlx::SqlitePool;

/// Creates an in-memory SQLite pool with migrations run
pub async fn create_test_pool() -> SqlitePool {
    LocalDatabase::connect_in_memory()
        .await
        .expect("Failed to create test pool")
}

pub async fn create_test_repository() -> RecordRepository {
    RecordRepository::new(create_test_pool().await)
}
