use crate::{DeviceIdentity, Record};

use serde::Serialize;

/// Which source records a reconciliation run carries over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordScope {
    /// Only records produced by this device.
    OwnedBy(DeviceIdentity),
    All,
}

impl RecordScope {
    pub fn includes(&self, record: &Record) -> bool {
        match self {
            Self::OwnedBy(identity) => record.owner == *identity,
            Self::All => true,
        }
    }
}
