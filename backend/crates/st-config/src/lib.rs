mod config;
mod database_config;
mod error;
mod identity_config;
mod log_level;
mod logging_config;
mod reconciler_config;
mod remote_config;
mod retry_config;
mod storage_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use identity_config::IdentityConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use reconciler_config::ReconcilerConfig;
pub use remote_config::RemoteConfig;
pub use retry_config::RetryConfig;
pub use storage_config::StorageConfig;

const CONFIG_DIR_ENV: &str = "ST_CONFIG_DIR";
const DEFAULT_CONFIG_DIR_NAME: &str = ".subtrack";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_DATABASE_FILENAME: &str = "subtrack.db";
const DEFAULT_IDENTITY_FILENAME: &str = "device.json";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
