use crate::{BillingCycle, CoreError, CoreResult, DeviceIdentity, Record, RecordType, now_millis};

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub id: Uuid,
    pub owner: DeviceIdentity,

    pub name: String,
    /// Price in minor currency units (cents).
    pub amount_minor: i64,
    pub currency: String,
    pub billing_cycle: BillingCycle,
    pub next_due_at: DateTime<Utc>,
    pub active: bool,

    /// Card this subscription is charged to.
    pub card_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,

    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(
        owner: DeviceIdentity,
        name: String,
        amount_minor: i64,
        currency: String,
        billing_cycle: BillingCycle,
        next_due_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            name,
            amount_minor,
            currency,
            billing_cycle,
            next_due_at,
            active: true,
            card_id: None,
            tag_ids: Vec::new(),
            updated_at: now_millis(),
        }
    }
}

impl From<Subscription> for Record {
    fn from(sub: Subscription) -> Self {
        let mut record = Record::new(RecordType::Subscription, sub.owner)
            .with_id(sub.id)
            .with_field("name", sub.name)
            .with_field("amount_minor", sub.amount_minor)
            .with_field("currency", sub.currency)
            .with_field("billing_cycle", sub.billing_cycle.as_str())
            .with_field("next_due_at", sub.next_due_at.to_rfc3339())
            .with_field("active", sub.active);

        if let Some(card_id) = sub.card_id {
            record = record.with_field("card_id", card_id.to_string());
        }
        if !sub.tag_ids.is_empty() {
            let tags: Vec<Value> = sub
                .tag_ids
                .iter()
                .map(|id| Value::String(id.to_string()))
                .collect();
            record = record.with_field("tag_ids", tags);
        }

        record.with_updated_at(sub.updated_at)
    }
}

impl TryFrom<Record> for Subscription {
    type Error = CoreError;

    fn try_from(record: Record) -> CoreResult<Self> {
        record.expect_type(RecordType::Subscription)?;

        Ok(Subscription {
            id: record.id,
            owner: record.owner,
            name: record.require_str("name")?,
            amount_minor: record.require_i64("amount_minor")?,
            currency: record.require_str("currency")?,
            billing_cycle: BillingCycle::from_str(&record.require_str("billing_cycle")?)?,
            next_due_at: record.require_datetime("next_due_at")?,
            active: record.require_bool("active")?,
            card_id: record
                .optional_str("card_id")
                .map(|raw| parse_id("card_id", &raw))
                .transpose()?,
            tag_ids: tag_ids(&record)?,
            updated_at: record.updated_at,
        })
    }
}

#[track_caller]
fn parse_id(field: &str, raw: &str) -> CoreResult<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| CoreError::validation(format!("Invalid id in {field}: {raw}"), Some(field)))
}

#[track_caller]
fn tag_ids(record: &Record) -> CoreResult<Vec<Uuid>> {
    let Some(value) = record.field("tag_ids") else {
        return Ok(Vec::new());
    };

    let items = value
        .as_array()
        .ok_or_else(|| CoreError::validation("tag_ids must be an array", Some("tag_ids")))?;

    items
        .iter()
        .map(|item| match item.as_str() {
            Some(raw) => parse_id("tag_ids", raw),
            None => Err(CoreError::validation("tag_ids must hold strings", Some("tag_ids"))),
        })
        .collect()
}
