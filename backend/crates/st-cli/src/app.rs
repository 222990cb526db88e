use crate::{CliError, CliResult, Commands, IdentityCommands, RecordsCommands};

use st_config::Config;
use st_core::{DeviceIdentity, RecordType, StorageMode};
use st_db::{LocalDatabase, RecordRepository};
use st_identity::IdentityStore;
use st_remote::RemoteRecordStore;
use st_sync::{MigrationCancel, ModeSwitcher, ReconcilePlan, ReconcilerSettings, SwitchReport};

use std::sync::Arc;
use std::time::Duration;

use log::info;
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Serialize)]
pub struct IdentityReport {
    pub device_id: DeviceIdentity,
    pub created_at: Option<String>,
    pub path: String,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct RecordCountsReport {
    pub subscriptions: i64,
    pub billing_records: i64,
    pub credit_cards: i64,
    pub tags: i64,
}

/// Process-wide wiring: configuration, identity store and the stores built
/// from them.
pub struct App {
    config: Config,
    identity_store: IdentityStore,
}

impl App {
    pub fn new(config: Config) -> CliResult<Self> {
        let identity_store = IdentityStore::new(config.identity_path()?);
        Ok(Self {
            config,
            identity_store,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs one subcommand and returns its JSON report plus whether it fully
    /// succeeded.
    pub async fn dispatch(&self, command: Commands, cancel: &MigrationCancel) -> CliResult<(Value, bool)> {
        match command {
            Commands::Identity { action } => match action {
                IdentityCommands::Show => Ok((serde_json::to_value(self.show_identity()?)?, true)),
                IdentityCommands::Reset => Ok((self.reset_identity()?, true)),
            },
            Commands::Migrate { to, workers } => {
                let report = self.migrate(to, workers, cancel).await?;
                let committed = report.commit;
                Ok((serde_json::to_value(report)?, committed))
            }
            Commands::Plan { to } => Ok((serde_json::to_value(self.plan(to).await?)?, true)),
            Commands::Records { action } => match action {
                RecordsCommands::Count => {
                    Ok((serde_json::to_value(self.count_records().await?)?, true))
                }
            },
        }
    }

    pub fn identity(&self) -> CliResult<DeviceIdentity> {
        Ok(self.identity_store.get_or_create_device_identity()?)
    }

    pub fn show_identity(&self) -> CliResult<IdentityReport> {
        let device_id = self.identity()?;
        let created_at = self
            .identity_store
            .load()?
            .identity
            .map(|stored| stored.created_at);

        Ok(IdentityReport {
            device_id,
            created_at,
            path: self.identity_store.path().display().to_string(),
        })
    }

    pub fn reset_identity(&self) -> CliResult<Value> {
        let removed = self.identity_store.reset()?;
        Ok(json!({
            "removed": removed,
            "path": self.identity_store.path().display().to_string(),
        }))
    }

    pub async fn local_store(&self) -> CliResult<Arc<RecordRepository>> {
        let database = LocalDatabase::new(
            self.config.database_path()?,
            self.config.database.max_connections,
        );
        let pool = database.connect().await?;
        Ok(Arc::new(RecordRepository::new(pool)))
    }

    pub fn remote_store(&self, identity: DeviceIdentity) -> CliResult<Arc<RemoteRecordStore>> {
        let remote = &self.config.remote;
        let base_url = remote.base_url.as_deref().ok_or_else(|| {
            CliError::setup("remote.base_url is not configured (set ST_REMOTE_BASE_URL)")
        })?;

        let store = RemoteRecordStore::new(
            base_url,
            identity,
            remote.api_key.as_deref(),
            Duration::from_secs(remote.request_timeout_secs),
        )?;
        Ok(Arc::new(store))
    }

    pub async fn migrate(
        &self,
        to: StorageMode,
        workers: Option<usize>,
        cancel: &MigrationCancel,
    ) -> CliResult<SwitchReport> {
        let from = self.config.storage.mode;
        info!("Migrating storage mode {from} -> {to}");

        let switcher = self.switcher(workers).await?;
        Ok(switcher.switch(from, to, cancel).await)
    }

    pub async fn plan(&self, to: StorageMode) -> CliResult<ReconcilePlan> {
        let switcher = self.switcher(None).await?;
        Ok(switcher.plan(self.config.storage.mode, to).await?)
    }

    pub async fn count_records(&self) -> CliResult<RecordCountsReport> {
        let local = self.local_store().await?;
        Ok(RecordCountsReport {
            subscriptions: local.count(RecordType::Subscription).await?,
            billing_records: local.count(RecordType::BillingRecord).await?,
            credit_cards: local.count(RecordType::CreditCard).await?,
            tags: local.count(RecordType::Tag).await?,
        })
    }

    async fn switcher(&self, workers: Option<usize>) -> CliResult<ModeSwitcher> {
        let identity = self.identity()?;
        let local = self.local_store().await?;
        let remote = self.remote_store(identity)?;

        let mut settings = ReconcilerSettings::from_config(&self.config);
        if let Some(workers) = workers {
            settings = settings.with_max_workers(workers);
        }

        Ok(ModeSwitcher::new(identity, local, remote, settings))
    }
}

/// Serializes a command report for stdout.
pub fn render(value: &Value, pretty: bool) -> CliResult<String> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(output)
}
