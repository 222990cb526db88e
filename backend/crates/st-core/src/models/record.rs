use crate::{CoreError, CoreResult, DeviceIdentity, RecordType};

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub type Fields = BTreeMap<String, Value>;

/// Current time truncated to milliseconds, the precision every store persists.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Generic store entity. Subscriptions, billing records, cards and tags all
/// travel between stores in this shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: Uuid,
    pub record_type: RecordType,
    pub owner: DeviceIdentity,

    /// Subscription this record belongs to (billing records, cards).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<Uuid>,

    #[serde(default)]
    pub fields: Fields,

    pub updated_at: DateTime<Utc>,
}

impl Record {
    pub fn new(record_type: RecordType, owner: DeviceIdentity) -> Self {
        Self {
            id: Uuid::new_v4(),
            record_type,
            owner,
            parent_id: None,
            fields: Fields::new(),
            updated_at: now_millis(),
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_parent(mut self, parent_id: Uuid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Sets a field and advances `updated_at`.
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) {
        self.fields.insert(name.to_string(), value.into());
        self.touch();
    }

    /// Removes a field, advancing `updated_at` only if something was removed.
    pub fn remove_field(&mut self, name: &str) -> Option<Value> {
        let removed = self.fields.remove(name);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Advances `updated_at`. Strictly increasing even if the clock stalls
    /// or moves backwards.
    pub fn touch(&mut self) {
        let floor = self.updated_at + Duration::milliseconds(1);
        self.updated_at = now_millis().max(floor);
    }

    /// Content equality at persisted (millisecond) timestamp precision.
    pub fn same_contents(&self, other: &Record) -> bool {
        self.id == other.id
            && self.record_type == other.record_type
            && self.owner == other.owner
            && self.parent_id == other.parent_id
            && self.fields == other.fields
            && self.updated_at.timestamp_millis() == other.updated_at.timestamp_millis()
    }

    /// Checks the subscription reference rules for this record's type.
    pub fn validate(&self) -> CoreResult<()> {
        match self.parent_id {
            None if self.record_type.requires_parent() => Err(CoreError::validation(
                format!("{} {} has no subscription", self.record_type, self.id),
                Some("parent_id"),
            )),
            Some(_) if !self.record_type.references_subscription() => {
                Err(CoreError::validation(
                    format!("{} {} cannot reference a subscription", self.record_type, self.id),
                    Some("parent_id"),
                ))
            }
            Some(parent) if parent == self.id => Err(CoreError::validation(
                format!("{} {} references itself", self.record_type, self.id),
                Some("parent_id"),
            )),
            _ => Ok(()),
        }
    }

    #[track_caller]
    pub(crate) fn expect_type(&self, expected: RecordType) -> CoreResult<()> {
        if self.record_type != expected {
            return Err(CoreError::type_mismatch(expected, self.record_type));
        }
        Ok(())
    }

    #[track_caller]
    pub(crate) fn require_str(&self, name: &str) -> CoreResult<String> {
        self.field(name)
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| missing(name, "string"))
    }

    pub(crate) fn optional_str(&self, name: &str) -> Option<String> {
        self.field(name).and_then(Value::as_str).map(String::from)
    }

    #[track_caller]
    pub(crate) fn require_i64(&self, name: &str) -> CoreResult<i64> {
        self.field(name)
            .and_then(Value::as_i64)
            .ok_or_else(|| missing(name, "integer"))
    }

    #[track_caller]
    pub(crate) fn require_bool(&self, name: &str) -> CoreResult<bool> {
        self.field(name)
            .and_then(Value::as_bool)
            .ok_or_else(|| missing(name, "boolean"))
    }

    #[track_caller]
    pub(crate) fn require_datetime(&self, name: &str) -> CoreResult<DateTime<Utc>> {
        let raw = self.require_str(name)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| CoreError::validation(format!("Invalid timestamp for {name}: {raw}"), Some(name)))
    }

    #[track_caller]
    pub(crate) fn require_parent(&self) -> CoreResult<Uuid> {
        self.parent_id
            .ok_or_else(|| CoreError::validation(format!("{} has no subscription", self.id), Some("parent_id")))
    }
}

#[track_caller]
fn missing(name: &str, kind: &str) -> CoreError {
    CoreError::validation(format!("Missing or non-{kind} field: {name}"), Some(name))
}
