use st_core::StorageMode;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Current source of truth; the CLI compares it with `--to` when switching
    pub mode: StorageMode,
}
