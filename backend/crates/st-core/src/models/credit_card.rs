use crate::{CoreError, CoreResult, DeviceIdentity, Record, RecordType, now_millis};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment card. Only the last four digits are ever stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreditCard {
    pub id: Uuid,
    pub owner: DeviceIdentity,
    pub subscription_id: Option<Uuid>,

    pub label: String,
    pub last_four: String,
    pub expiry_month: i64,
    pub expiry_year: i64,

    pub updated_at: DateTime<Utc>,
}

impl CreditCard {
    pub fn new(
        owner: DeviceIdentity,
        label: String,
        last_four: String,
        expiry_month: i64,
        expiry_year: i64,
    ) -> CoreResult<Self> {
        if last_four.len() != 4 || !last_four.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::validation(
                "last_four must be exactly 4 digits",
                Some("last_four"),
            ));
        }
        if !(1..=12).contains(&expiry_month) {
            return Err(CoreError::validation(
                format!("expiry_month must be 1-12, got {expiry_month}"),
                Some("expiry_month"),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            owner,
            subscription_id: None,
            label,
            last_four,
            expiry_month,
            expiry_year,
            updated_at: now_millis(),
        })
    }
}

impl From<CreditCard> for Record {
    fn from(card: CreditCard) -> Self {
        let mut record = Record::new(RecordType::CreditCard, card.owner)
            .with_id(card.id)
            .with_field("label", card.label)
            .with_field("last_four", card.last_four)
            .with_field("expiry_month", card.expiry_month)
            .with_field("expiry_year", card.expiry_year)
            .with_updated_at(card.updated_at);

        if let Some(subscription_id) = card.subscription_id {
            record = record.with_parent(subscription_id);
        }

        record
    }
}

impl TryFrom<Record> for CreditCard {
    type Error = CoreError;

    fn try_from(record: Record) -> CoreResult<Self> {
        record.expect_type(RecordType::CreditCard)?;

        Ok(CreditCard {
            id: record.id,
            owner: record.owner,
            subscription_id: record.parent_id,
            label: record.require_str("label")?,
            last_four: record.require_str("last_four")?,
            expiry_month: record.require_i64("expiry_month")?,
            expiry_year: record.require_i64("expiry_year")?,
            updated_at: record.updated_at,
        })
    }
}
