use crate::{CoreError, CoreResult, DeviceIdentity, Record, RecordType, now_millis};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One charge against a subscription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillingRecord {
    pub id: Uuid,
    pub owner: DeviceIdentity,
    pub subscription_id: Uuid,

    pub amount_minor: i64,
    pub currency: String,
    pub paid_at: DateTime<Utc>,
    pub note: Option<String>,

    pub updated_at: DateTime<Utc>,
}

impl BillingRecord {
    pub fn new(
        owner: DeviceIdentity,
        subscription_id: Uuid,
        amount_minor: i64,
        currency: String,
        paid_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            subscription_id,
            amount_minor,
            currency,
            paid_at,
            note: None,
            updated_at: now_millis(),
        }
    }
}

impl From<BillingRecord> for Record {
    fn from(bill: BillingRecord) -> Self {
        let mut record = Record::new(RecordType::BillingRecord, bill.owner)
            .with_id(bill.id)
            .with_parent(bill.subscription_id)
            .with_field("amount_minor", bill.amount_minor)
            .with_field("currency", bill.currency)
            .with_field("paid_at", bill.paid_at.to_rfc3339())
            .with_updated_at(bill.updated_at);

        if let Some(note) = bill.note {
            record = record.with_field("note", note);
        }

        record
    }
}

impl TryFrom<Record> for BillingRecord {
    type Error = CoreError;

    fn try_from(record: Record) -> CoreResult<Self> {
        record.expect_type(RecordType::BillingRecord)?;

        Ok(BillingRecord {
            id: record.id,
            owner: record.owner,
            subscription_id: record.require_parent()?,
            amount_minor: record.require_i64("amount_minor")?,
            currency: record.require_str("currency")?,
            paid_at: record.require_datetime("paid_at")?,
            note: record.optional_str("note"),
            updated_at: record.updated_at,
        })
    }
}
