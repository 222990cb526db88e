use crate::{DbError, Result as DbErrorResult};

use st_core::{
    DeviceIdentity, Fields, Record, RecordStore, RecordType, StoreError, StoreResult, StoreSnapshot,
};

use std::str::FromStr;

use async_trait::async_trait;
use chrono::DateTime;
use log::debug;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const SELECT_COLUMNS: &str = "SELECT id, record_type, owner_id, parent_id, fields, updated_at FROM st_records";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// An identical copy was already stored.
    AlreadyPresent,
}

/// Local persistence adapter over the `st_records` table.
#[derive(Clone)]
pub struct RecordRepository {
    pool: SqlitePool,
}

impl RecordRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Inserts a record unless its id is taken.
    ///
    /// A single `INSERT .. ON CONFLICT DO NOTHING` statement, so the row is
    /// either fully written or not written at all.
    pub async fn create(&self, record: &Record) -> DbErrorResult<InsertOutcome> {
        let id = record.id.to_string();
        let owner_id = record.owner.to_string();
        let parent_id = record.parent_id.map(|p| p.to_string());
        let fields = serde_json::to_string(&record.fields)
            .map_err(|e| DbError::decode(id.clone(), e.to_string()))?;
        let updated_at = record.updated_at.timestamp_millis();

        let result = sqlx::query(
            r#"
              INSERT INTO st_records (id, record_type, owner_id, parent_id, fields, updated_at)
              VALUES (?, ?, ?, ?, ?, ?)
              ON CONFLICT(id) DO NOTHING
              "#,
        )
        .bind(&id)
        .bind(record.record_type.as_str())
        .bind(&owner_id)
        .bind(&parent_id)
        .bind(&fields)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(InsertOutcome::Inserted);
        }

        match self.find_by_id(record.id).await? {
            Some(existing) if existing.same_contents(record) => {
                debug!("Record {} already stored, nothing to do", record.id);
                Ok(InsertOutcome::AlreadyPresent)
            }
            _ => Err(DbError::conflict(record.id)),
        }
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<Record>> {
        let id_str = id.to_string();

        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(&id_str)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(record_from_row).transpose()
    }

    /// All records of one type ordered by `(updated_at, id)`. One statement,
    /// so concurrent writers never show up half-applied.
    pub async fn find_by_type(&self, record_type: RecordType) -> DbErrorResult<Vec<Record>> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE record_type = ? ORDER BY updated_at ASC, id ASC"
        ))
        .bind(record_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(record_from_row).collect()
    }

    pub async fn exists(&self, id: Uuid) -> DbErrorResult<bool> {
        let id_str = id.to_string();

        let found: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM st_records WHERE id = ?)")
            .bind(&id_str)
            .fetch_one(&self.pool)
            .await?;

        Ok(found != 0)
    }

    pub async fn count(&self, record_type: RecordType) -> DbErrorResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM st_records WHERE record_type = ?")
            .bind(record_type.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl RecordStore for RecordRepository {
    fn label(&self) -> &str {
        "local"
    }

    async fn fetch_all(&self, record_type: RecordType) -> StoreResult<StoreSnapshot> {
        let records = self.find_by_type(record_type).await?;
        Ok(StoreSnapshot::from_records(records))
    }

    async fn insert(&self, record: &Record) -> StoreResult<()> {
        record
            .validate()
            .map_err(|e| StoreError::rejected(e.to_string()))?;
        self.create(record).await?;
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> StoreResult<bool> {
        Ok(RecordRepository::exists(self, id).await?)
    }
}

fn record_from_row(row: &SqliteRow) -> DbErrorResult<Record> {
    let id: String = row.try_get("id")?;
    let record_type: String = row.try_get("record_type")?;
    let owner_id: String = row.try_get("owner_id")?;
    let parent_id: Option<String> = row.try_get("parent_id")?;
    let fields: String = row.try_get("fields")?;
    let updated_at: i64 = row.try_get("updated_at")?;

    let bad = |message: String| DbError::decode(id.clone(), message);

    Ok(Record {
        id: Uuid::parse_str(&id).map_err(|e| bad(format!("id: {e}")))?,
        record_type: RecordType::from_str(&record_type).map_err(|e| bad(e.to_string()))?,
        owner: DeviceIdentity::from_str(&owner_id).map_err(|e| bad(e.to_string()))?,
        parent_id: parent_id
            .map(|p| Uuid::parse_str(&p))
            .transpose()
            .map_err(|e| bad(format!("parent_id: {e}")))?,
        fields: serde_json::from_str::<Fields>(&fields).map_err(|e| bad(format!("fields: {e}")))?,
        updated_at: DateTime::from_timestamp_millis(updated_at)
            .ok_or_else(|| bad(format!("updated_at out of range: {updated_at}")))?,
    })
}
