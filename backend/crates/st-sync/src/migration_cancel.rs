use std::sync::Arc;

use tokio::sync::watch;

/// Cancellation handle shared between the caller and a running migration.
///
/// Cancelling stops new records from being dispatched; inserts already in
/// flight run to completion and are counted.
#[derive(Clone)]
pub struct MigrationCancel {
    tx: Arc<watch::Sender<bool>>,
}

impl MigrationCancel {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request cancellation (call this from a signal handler)
    pub fn cancel(&self) {
        if !self.tx.send_replace(true) {
            log::info!("Migration cancellation requested");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once `cancel` has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for MigrationCancel {
    fn default() -> Self {
        Self::new()
    }
}
