use crate::RetryPolicy;

use st_config::Config;

use std::time::Duration;

/// Knobs for one `Reconciler`, usually derived from the loaded `Config`.
#[derive(Debug, Clone)]
pub struct ReconcilerSettings {
    /// Concurrent record copies within one record type
    pub max_workers: usize,
    /// Budget for one record (existence check plus insert, retries included)
    pub record_timeout: Duration,
    pub retry: RetryPolicy,
    /// Cloud sync feature switch; runs abort up front when false
    pub cloud_enabled: bool,
}

impl ReconcilerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_workers: config.reconciler.max_workers.max(1),
            record_timeout: Duration::from_secs(config.reconciler.record_timeout_secs),
            retry: RetryPolicy::from(&config.retry),
            cloud_enabled: config.remote.enabled,
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }
}

/// Config defaults with the cloud switch on.
impl Default for ReconcilerSettings {
    fn default() -> Self {
        Self {
            cloud_enabled: true,
            ..Self::from_config(&Config::default())
        }
    }
}
