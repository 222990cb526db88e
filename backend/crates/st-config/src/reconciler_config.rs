use crate::ConfigErrorResult;
use crate::error::check_range;

use serde::Deserialize;

pub const MIN_MAX_WORKERS: usize = 1;
pub const MAX_MAX_WORKERS: usize = 64;
pub const DEFAULT_MAX_WORKERS: usize = 4;

pub const MIN_RECORD_TIMEOUT_SECS: u64 = 1;
pub const MAX_RECORD_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_RECORD_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Concurrent inserts within one record type
    pub max_workers: usize,
    /// Budget for one record (all retries included) before it counts as failed
    pub record_timeout_secs: u64,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            record_timeout_secs: DEFAULT_RECORD_TIMEOUT_SECS,
        }
    }
}

impl ReconcilerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        check_range(
            "Reconciler",
            "reconciler.max_workers",
            self.max_workers,
            MIN_MAX_WORKERS,
            MAX_MAX_WORKERS,
        )?;
        check_range(
            "Reconciler",
            "reconciler.record_timeout_secs",
            self.record_timeout_secs,
            MIN_RECORD_TIMEOUT_SECS,
            MAX_RECORD_TIMEOUT_SECS,
        )
    }
}
