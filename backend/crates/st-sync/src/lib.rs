pub mod migration_cancel;
pub mod mode_switcher;
pub mod reconcile_plan;
pub mod reconciler;
pub mod reconciler_settings;
pub mod retry;

pub use migration_cancel::MigrationCancel;
pub use mode_switcher::{ModeSwitch, ModeSwitcher, SwitchReport};
pub use reconcile_plan::{PlannedConflict, ReconcilePlan};
pub use reconciler::Reconciler;
pub use reconciler_settings::ReconcilerSettings;
pub use retry::{IsRetryable, RetryPolicy, with_retry};
