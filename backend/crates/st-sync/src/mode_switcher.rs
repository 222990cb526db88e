use crate::{MigrationCancel, ReconcilePlan, Reconciler, ReconcilerSettings};

use st_core::{
    DeviceIdentity, MigrationResult, MigrationStatus, RecordScope, RecordStore, StorageMode,
    StoreResult,
};

use std::sync::Arc;

use log::info;
use serde::Serialize;

/// Direction of a storage-mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeSwitch {
    Unchanged,
    /// Local -> Cloud: push this device's records to the remote store.
    Push,
    /// Cloud -> Local: pull every remote record into the local store.
    Pull,
}

impl ModeSwitch {
    pub fn between(from: StorageMode, to: StorageMode) -> Self {
        match (from, to) {
            (StorageMode::Local, StorageMode::Cloud) => Self::Push,
            (StorageMode::Cloud, StorageMode::Local) => Self::Pull,
            _ => Self::Unchanged,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SwitchReport {
    pub from: StorageMode,
    pub to: StorageMode,
    pub direction: ModeSwitch,
    pub result: MigrationResult,
    /// True only when the run succeeded; otherwise keep the old mode.
    pub commit: bool,
}

/// Moves data between the local and remote stores when the user changes
/// storage mode.
pub struct ModeSwitcher {
    identity: DeviceIdentity,
    push: Reconciler,
    pull: Reconciler,
}

impl ModeSwitcher {
    pub fn new(
        identity: DeviceIdentity,
        local: Arc<dyn RecordStore>,
        remote: Arc<dyn RecordStore>,
        settings: ReconcilerSettings,
    ) -> Self {
        Self {
            identity,
            push: Reconciler::new(identity, local.clone(), remote.clone(), settings.clone()),
            pull: Reconciler::new(identity, remote, local, settings),
        }
    }

    pub async fn switch(
        &self,
        from: StorageMode,
        to: StorageMode,
        cancel: &MigrationCancel,
    ) -> SwitchReport {
        let direction = ModeSwitch::between(from, to);

        let result = match self.route(direction) {
            None => {
                info!("Storage mode already {to}; nothing to migrate");
                MigrationResult::started().finish()
            }
            Some((reconciler, scope)) => reconciler.run(scope, cancel).await,
        };

        let commit = result.status == MigrationStatus::Success;
        info!(
            "Switch {from} -> {to}: {result}; {}",
            if commit { "committing new mode" } else { "keeping current mode" }
        );

        SwitchReport {
            from,
            to,
            direction,
            result,
            commit,
        }
    }

    /// Dry run of `switch`. Same-mode switches plan nothing.
    pub async fn plan(&self, from: StorageMode, to: StorageMode) -> StoreResult<ReconcilePlan> {
        match self.route(ModeSwitch::between(from, to)) {
            None => Ok(ReconcilePlan::default()),
            Some((reconciler, scope)) => reconciler.plan(scope).await,
        }
    }

    fn route(&self, direction: ModeSwitch) -> Option<(&Reconciler, RecordScope)> {
        match direction {
            ModeSwitch::Unchanged => None,
            ModeSwitch::Push => Some((&self.push, RecordScope::OwnedBy(self.identity))),
            ModeSwitch::Pull => Some((&self.pull, RecordScope::All)),
        }
    }
}
