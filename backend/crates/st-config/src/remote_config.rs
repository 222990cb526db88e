use crate::error::check_range;
use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Cloud store endpoint. Read once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Cloud sync feature switch; migrations to or from the cloud abort when false
    pub enabled: bool,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: None,
            api_key: None,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl RemoteConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.enabled {
            match self.base_url.as_deref() {
                None | Some("") => {
                    return Err(ConfigError::remote(
                        "remote.base_url is required when remote.enabled = true",
                    ));
                }
                Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                    return Err(ConfigError::remote(format!(
                        "remote.base_url must start with http:// or https://, got {url}"
                    )));
                }
                Some(_) => {}
            }
        }

        check_range(
            "Remote",
            "remote.request_timeout_secs",
            self.request_timeout_secs,
            MIN_REQUEST_TIMEOUT_SECS,
            MAX_REQUEST_TIMEOUT_SECS,
        )
    }
}
