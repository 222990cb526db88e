use st_core::DeviceIdentity;

use chrono::Utc;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: i32 = 1;

/// On-disk form of the device identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredIdentity {
    pub device_id: DeviceIdentity,
    pub created_at: String,
    pub schema_version: i32,
}

impl StoredIdentity {
    pub fn mint() -> Self {
        Self {
            device_id: DeviceIdentity::generate(),
            created_at: Utc::now().to_rfc3339(),
            schema_version: SCHEMA_VERSION,
        }
    }
}
