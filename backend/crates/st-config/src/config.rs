use crate::{
    CONFIG_DIR_ENV, CONFIG_FILE_NAME, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_DIR_NAME,
    DatabaseConfig, IdentityConfig, LoggingConfig, ReconcilerConfig, RemoteConfig, RetryConfig,
    StorageConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub identity: IdentityConfig,
    pub remote: RemoteConfig,
    pub retry: RetryConfig,
    pub reconciler: ReconcilerConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for ST_CONFIG_DIR env var, else use ./.subtrack/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply ST_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Priority: ST_CONFIG_DIR env var > ./.subtrack/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR_NAME))
    }

    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.database.validate()?;
        self.identity.validate()?;
        self.remote.validate()?;
        self.retry.validate()?;
        self.reconciler.validate()?;
        Ok(())
    }

    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.database.path))
    }

    pub fn identity_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(Self::config_dir()?.join(&self.identity.file))
    }

    /// Log configuration summary (never logs the API key).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  storage: mode={}", self.storage.mode);
        info!(
            "  database: {} (max {} connections)",
            self.database.path, self.database.max_connections
        );
        info!("  identity: {}", self.identity.file);
        info!(
            "  remote: {} url={} key={} timeout={}s",
            if self.remote.enabled {
                "enabled"
            } else {
                "disabled"
            },
            self.remote.base_url.as_deref().unwrap_or("<unset>"),
            if self.remote.api_key.is_some() {
                "set"
            } else {
                "unset"
            },
            self.remote.request_timeout_secs
        );
        info!(
            "  retry: attempts={}, initial={}ms, max={}s, backoff={}x, jitter={}",
            self.retry.max_attempts,
            self.retry.initial_delay_ms,
            self.retry.max_delay_secs,
            self.retry.backoff_multiplier,
            self.retry.jitter
        );
        info!(
            "  reconciler: workers={}, record_timeout={}s",
            self.reconciler.max_workers, self.reconciler.record_timeout_secs
        );
        info!(
            "  logging: {} (colored: {})",
            self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Storage
        Self::apply_env_parse("ST_STORAGE_MODE", &mut self.storage.mode);

        // Database
        Self::apply_env_string("ST_DATABASE_PATH", &mut self.database.path);
        Self::apply_env_parse(
            "ST_DATABASE_MAX_CONNECTIONS",
            &mut self.database.max_connections,
        );

        // Identity
        Self::apply_env_string("ST_IDENTITY_FILE", &mut self.identity.file);

        // Remote
        Self::apply_env_bool("ST_REMOTE_ENABLED", &mut self.remote.enabled);
        Self::apply_env_option_string("ST_REMOTE_BASE_URL", &mut self.remote.base_url);
        Self::apply_env_option_string("ST_REMOTE_API_KEY", &mut self.remote.api_key);
        Self::apply_env_parse(
            "ST_REMOTE_REQUEST_TIMEOUT_SECS",
            &mut self.remote.request_timeout_secs,
        );

        // Retry
        Self::apply_env_parse("ST_RETRY_MAX_ATTEMPTS", &mut self.retry.max_attempts);
        Self::apply_env_parse(
            "ST_RETRY_INITIAL_DELAY_MS",
            &mut self.retry.initial_delay_ms,
        );
        Self::apply_env_parse("ST_RETRY_MAX_DELAY_SECS", &mut self.retry.max_delay_secs);
        Self::apply_env_parse(
            "ST_RETRY_BACKOFF_MULTIPLIER",
            &mut self.retry.backoff_multiplier,
        );
        Self::apply_env_bool("ST_RETRY_JITTER", &mut self.retry.jitter);

        // Reconciler
        Self::apply_env_parse(
            "ST_RECONCILER_MAX_WORKERS",
            &mut self.reconciler.max_workers,
        );
        Self::apply_env_parse(
            "ST_RECONCILER_RECORD_TIMEOUT_SECS",
            &mut self.reconciler.record_timeout_secs,
        );

        // Logging
        Self::apply_env_parse("ST_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("ST_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("ST_LOG_FILE", &mut self.logging.file);
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Accepts "true"/"1"; anything else is false.
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Unparseable values are ignored and the previous value kept.
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
