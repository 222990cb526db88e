use crate::{
    MigrationCancel, PlannedConflict, ReconcilePlan, ReconcilerSettings, with_retry,
};

use st_core::{
    AbortReason, DeviceIdentity, MigrationResult, MigrationState, Record, RecordScope,
    RecordStore, RecordType, Resolution, StoreError, StoreResult, StoreSnapshot,
    last_writer_wins,
};

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::{StreamExt, stream};
use log::{debug, info, warn};
use tokio::time::timeout;
use uuid::Uuid;

enum CopyOutcome {
    Copied,
    Skipped,
    Failed(StoreError),
}

/// Copies every in-scope record from `source` to `destination`, parents
/// first, without duplicating or overwriting anything.
///
/// Runs are resumable: records already at the destination are skipped, so
/// repeating a partial or aborted run finishes the job.
pub struct Reconciler {
    identity: DeviceIdentity,
    source: Arc<dyn RecordStore>,
    destination: Arc<dyn RecordStore>,
    settings: ReconcilerSettings,
    state: Mutex<MigrationState>,
}

impl Reconciler {
    pub fn new(
        identity: DeviceIdentity,
        source: Arc<dyn RecordStore>,
        destination: Arc<dyn RecordStore>,
        settings: ReconcilerSettings,
    ) -> Self {
        Self {
            identity,
            source,
            destination,
            settings,
            state: Mutex::new(MigrationState::NotStarted),
        }
    }

    pub fn identity(&self) -> DeviceIdentity {
        self.identity
    }

    pub fn settings(&self) -> &ReconcilerSettings {
        &self.settings
    }

    pub fn state(&self) -> MigrationState {
        *lock_state(&self.state)
    }

    /// Runs one reconciliation. Never fails: every error ends up as a retry,
    /// a failed record or an aborted result.
    pub async fn run(&self, scope: RecordScope, cancel: &MigrationCancel) -> MigrationResult {
        let Some(guard) = RunGuard::begin(&self.state) else {
            warn!(
                "Reconciliation {} -> {} already running",
                self.source.label(),
                self.destination.label()
            );
            return MigrationResult::aborted(AbortReason::AlreadyRunning).finish();
        };

        info!(
            "Reconciling {} -> {} for device {} (scope {:?}, {} workers)",
            self.source.label(),
            self.destination.label(),
            self.identity,
            scope,
            self.settings.max_workers
        );

        let result = self.execute(scope, cancel).await.finish();
        guard.complete(result.status.into());

        match &result.abort_reason {
            Some(reason) => warn!("Reconciliation aborted: {result} ({reason})"),
            None => info!("Reconciliation {:?}: {result}", result.status),
        }
        result
    }

    /// Dry run: compares both stores and reports what `run` would copy, what
    /// is already present and which ids conflict. Writes nothing.
    pub async fn plan(&self, scope: RecordScope) -> StoreResult<ReconcilePlan> {
        let source = self.fetch_snapshot(self.source.as_ref()).await?;
        let destination = self.fetch_snapshot(self.destination.as_ref()).await?;
        let existing: HashMap<Uuid, &Record> = destination.iter().map(|r| (r.id, r)).collect();
        let selected = selection(&source, scope);

        let mut plan = ReconcilePlan::default();
        for record in source.iter().filter(|r| selected.contains(&r.id)) {
            match existing.get(&record.id) {
                None => plan.to_copy.push(record.clone()),
                Some(current) => match last_writer_wins(record, current) {
                    Resolution::Identical => plan.present.push(record.id),
                    winner => plan.conflicts.push(PlannedConflict {
                        id: record.id,
                        record_type: record.record_type,
                        winner,
                    }),
                },
            }
        }

        debug!(
            "Plan: {} to copy, {} present, {} conflicts",
            plan.to_copy.len(),
            plan.present.len(),
            plan.conflicts.len()
        );
        Ok(plan)
    }

    async fn execute(&self, scope: RecordScope, cancel: &MigrationCancel) -> MigrationResult {
        if !self.settings.cloud_enabled {
            return MigrationResult::aborted(AbortReason::Precondition {
                message: String::from("cloud sync is not enabled"),
            });
        }

        if cancel.is_cancelled() {
            return MigrationResult::aborted(AbortReason::Cancelled);
        }

        if let Err(e) = self.ping_destination().await {
            return MigrationResult::aborted(run_abort_reason(&e).unwrap_or_else(|| {
                AbortReason::Precondition {
                    message: format!("{} is unreachable: {e}", self.destination.label()),
                }
            }));
        }

        // The whole source is read before the first write.
        let snapshot = match self.fetch_snapshot(self.source.as_ref()).await {
            Ok(snapshot) => snapshot,
            Err(e) => return MigrationResult::aborted(fetch_abort_reason(self.source.label(), &e)),
        };

        let selected = selection(&snapshot, scope);
        let mut result = MigrationResult::started();
        let mut failed_parents = HashSet::new();

        for record_type in RecordType::MIGRATION_ORDER {
            let mut pending = Vec::new();
            for record in snapshot
                .records(record_type)
                .iter()
                .filter(|r| selected.contains(&r.id))
            {
                match record.parent_id {
                    Some(parent) if failed_parents.contains(&parent) => {
                        debug!(
                            "{record_type} {} not copied: subscription {parent} failed",
                            record.id
                        );
                        result.record_failure(record_type, record.id);
                    }
                    _ => pending.push(record),
                }
            }

            if pending.is_empty() {
                continue;
            }

            if cancel.is_cancelled() {
                result.abort(AbortReason::Cancelled);
                break;
            }

            let total = pending.len();
            let processed = self
                .copy_group(
                    record_type,
                    pending,
                    &selected,
                    cancel,
                    &mut result,
                    &mut failed_parents,
                )
                .await;

            if result.is_aborted() {
                break;
            }

            if processed < total {
                result.abort(AbortReason::Cancelled);
                break;
            }
        }

        result
    }

    /// Copies one record type with at most `max_workers` records in flight.
    /// Returns how many records were dispatched.
    async fn copy_group(
        &self,
        record_type: RecordType,
        pending: Vec<&Record>,
        selected: &HashSet<Uuid>,
        cancel: &MigrationCancel,
        result: &mut MigrationResult,
        failed_parents: &mut HashSet<Uuid>,
    ) -> usize {
        let halted = AtomicBool::new(false);
        let dispatch = pending
            .into_iter()
            .take_while(|_| !halted.load(Ordering::SeqCst) && !cancel.is_cancelled());

        let mut copies = stream::iter(dispatch)
            .map(|record| async move {
                // A parent outside this run has to be at the destination already.
                let unverified_parent = record.parent_id.filter(|p| !selected.contains(p));
                (record, self.copy_one(record, unverified_parent).await)
            })
            .buffer_unordered(self.settings.max_workers.max(1));

        let mut processed = 0;
        while let Some((record, outcome)) = copies.next().await {
            processed += 1;
            match outcome {
                CopyOutcome::Copied => {
                    debug!("Copied {record_type} {}", record.id);
                    result.counts_mut(record_type).copied += 1;
                }
                CopyOutcome::Skipped => {
                    debug!("Skipped {record_type} {} (already present)", record.id);
                    result.counts_mut(record_type).skipped += 1;
                }
                CopyOutcome::Failed(e) => {
                    warn!("Failed to copy {record_type} {}: {e}", record.id);
                    result.record_failure(record_type, record.id);
                    failed_parents.insert(record.id);

                    if let Some(reason) = run_abort_reason(&e) {
                        halted.store(true, Ordering::SeqCst);
                        result.abort(reason);
                    }
                }
            }
        }

        processed
    }

    async fn copy_one(&self, record: &Record, unverified_parent: Option<Uuid>) -> CopyOutcome {
        let retry = &self.settings.retry;
        let attempt = async {
            let present = with_retry(retry, &format!("exists {}", record.id), || {
                self.destination.exists(record.id)
            })
            .await?;

            if present {
                return Ok(CopyOutcome::Skipped);
            }

            if let Some(parent) = unverified_parent {
                let parent_present = with_retry(retry, &format!("exists {parent}"), || {
                    self.destination.exists(parent)
                })
                .await?;

                if !parent_present {
                    return Err(StoreError::rejected(format!(
                        "subscription {parent} is neither in {} nor in {}",
                        self.source.label(),
                        self.destination.label()
                    )));
                }
            }

            with_retry(retry, &format!("insert {}", record.id), || {
                self.destination.insert(record)
            })
            .await?;

            Ok::<_, StoreError>(CopyOutcome::Copied)
        };

        match timeout(self.settings.record_timeout, attempt).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => CopyOutcome::Failed(e),
            Err(_) => CopyOutcome::Failed(StoreError::timeout(format!(
                "copy of {} {} exceeded {:?}",
                record.record_type, record.id, self.settings.record_timeout
            ))),
        }
    }

    /// Reachability check that stays within the three-operation store contract.
    async fn ping_destination(&self) -> StoreResult<()> {
        let ping = with_retry(&self.settings.retry, "destination reachability check", || {
            self.destination.exists(Uuid::nil())
        });

        match timeout(self.settings.record_timeout, ping).await {
            Ok(outcome) => outcome.map(|_| ()),
            Err(_) => Err(StoreError::timeout("destination reachability check")),
        }
    }

    async fn fetch_snapshot(&self, store: &dyn RecordStore) -> StoreResult<StoreSnapshot> {
        let mut snapshot = StoreSnapshot::new();
        for record_type in RecordType::MIGRATION_ORDER {
            let part = with_retry(
                &self.settings.retry,
                &format!("fetch {record_type} from {}", store.label()),
                || store.fetch_all(record_type),
            )
            .await?;
            snapshot.extend(part);
        }
        Ok(snapshot)
    }
}

/// Store errors that stop the whole run rather than one record.
fn run_abort_reason(err: &StoreError) -> Option<AbortReason> {
    if !err.is_fatal_to_run() {
        return None;
    }

    let reason = match err {
        StoreError::ConstraintViolation { id, message, .. } => AbortReason::Integrity {
            id: *id,
            message: message.clone(),
        },
        StoreError::RemoteQuotaExceeded { message, .. } => AbortReason::QuotaExceeded {
            message: message.clone(),
        },
        StoreError::PersistenceUnavailable { message, .. } => AbortReason::Persistence {
            message: message.clone(),
        },
        // Not fatal, filtered above.
        other => AbortReason::Persistence {
            message: other.to_string(),
        },
    };
    Some(reason)
}

fn fetch_abort_reason(label: &str, err: &StoreError) -> AbortReason {
    run_abort_reason(err).unwrap_or_else(|| AbortReason::Precondition {
        message: format!("could not read {label}: {err}"),
    })
}

/// Ids a run migrates: every in-scope record, plus the out-of-scope
/// subscriptions that in-scope dependents reference, so parents land first.
fn selection(snapshot: &StoreSnapshot, scope: RecordScope) -> HashSet<Uuid> {
    let mut selected: HashSet<Uuid> = snapshot
        .iter()
        .filter(|r| scope.includes(r))
        .map(|r| r.id)
        .collect();

    let carried: Vec<Uuid> = snapshot
        .iter()
        .filter(|r| selected.contains(&r.id))
        .filter_map(|r| r.parent_id)
        .filter(|parent| !selected.contains(parent) && snapshot.get(*parent).is_some())
        .collect();

    for parent in carried {
        if selected.insert(parent) {
            debug!("Carrying subscription {parent} along for its in-scope dependents");
        }
    }
    selected
}

fn lock_state(state: &Mutex<MigrationState>) -> MutexGuard<'_, MigrationState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds the `Running` state for one run. Dropped without `complete` (the
/// run future was cancelled) it leaves the reconciler `Aborted`.
struct RunGuard<'a> {
    state: &'a Mutex<MigrationState>,
    completed: bool,
}

impl<'a> RunGuard<'a> {
    fn begin(state: &'a Mutex<MigrationState>) -> Option<Self> {
        let mut current = lock_state(state);
        if *current == MigrationState::Running {
            return None;
        }
        *current = MigrationState::Running;
        Some(Self {
            state,
            completed: false,
        })
    }

    fn complete(mut self, final_state: MigrationState) {
        *lock_state(self.state) = final_state;
        self.completed = true;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            *lock_state(self.state) = MigrationState::Aborted;
        }
    }
}
