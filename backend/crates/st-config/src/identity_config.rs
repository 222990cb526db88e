use crate::{ConfigError, ConfigErrorResult, DEFAULT_IDENTITY_FILENAME};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Device identity file name inside the config directory
    pub file: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            file: String::from(DEFAULT_IDENTITY_FILENAME),
        }
    }
}

impl IdentityConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.file.is_empty() || self.file.contains('/') || self.file.contains('\\') {
            return Err(ConfigError::identity(format!(
                "identity.file must be a plain file name, got '{}'",
                self.file
            )));
        }
        Ok(())
    }
}
