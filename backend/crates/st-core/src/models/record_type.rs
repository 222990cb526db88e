use crate::{CoreError, CoreResult};

use std::fmt;
use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Kinds of records a store holds.
///
/// Variant order is migration order: parents (subscriptions) sort before
/// the records that reference them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Subscription,
    BillingRecord,
    CreditCard,
    Tag,
}

impl RecordType {
    pub const MIGRATION_ORDER: [RecordType; 4] = [
        Self::Subscription,
        Self::BillingRecord,
        Self::CreditCard,
        Self::Tag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subscription => "subscription",
            Self::BillingRecord => "billing_record",
            Self::CreditCard => "credit_card",
            Self::Tag => "tag",
        }
    }

    /// Whether records of this type may reference a subscription.
    pub fn references_subscription(&self) -> bool {
        matches!(self, Self::BillingRecord | Self::CreditCard)
    }

    /// Whether a subscription reference is mandatory.
    pub fn requires_parent(&self) -> bool {
        matches!(self, Self::BillingRecord)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "subscription" => Ok(Self::Subscription),
            "billing_record" => Ok(Self::BillingRecord),
            "credit_card" => Ok(Self::CreditCard),
            "tag" => Ok(Self::Tag),
            _ => Err(CoreError::InvalidRecordType {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
