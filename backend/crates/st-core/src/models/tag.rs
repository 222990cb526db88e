use crate::{CoreError, CoreResult, DeviceIdentity, Record, RecordType, now_millis};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub id: Uuid,
    pub owner: DeviceIdentity,

    pub name: String,
    /// Hex color, e.g. "#FF9500"
    pub color: Option<String>,

    pub updated_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(owner: DeviceIdentity, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            name,
            color: None,
            updated_at: now_millis(),
        }
    }
}

impl From<Tag> for Record {
    fn from(tag: Tag) -> Self {
        let mut record = Record::new(RecordType::Tag, tag.owner)
            .with_id(tag.id)
            .with_field("name", tag.name)
            .with_updated_at(tag.updated_at);

        if let Some(color) = tag.color {
            record = record.with_field("color", color);
        }

        record
    }
}

impl TryFrom<Record> for Tag {
    type Error = CoreError;

    fn try_from(record: Record) -> CoreResult<Self> {
        record.expect_type(RecordType::Tag)?;

        Ok(Tag {
            id: record.id,
            owner: record.owner,
            name: record.require_str("name")?,
            color: record.optional_str("color"),
            updated_at: record.updated_at,
        })
    }
}
