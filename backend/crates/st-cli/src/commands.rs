use crate::{IdentityCommands, RecordsCommands};

use st_core::StorageMode;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Device identity operations
    Identity {
        #[command(subcommand)]
        action: IdentityCommands,
    },

    /// Switch storage mode, copying records to the new store (Ctrl-C cancels)
    Migrate {
        /// Target storage mode: cloud or local
        #[arg(long)]
        to: StorageMode,

        /// Concurrent record copies (overrides reconciler.max_workers)
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Show what a migration would copy, without writing anything
    Plan {
        /// Target storage mode: cloud or local
        #[arg(long)]
        to: StorageMode,
    },

    /// Local record operations
    Records {
        #[command(subcommand)]
        action: RecordsCommands,
    },
}
