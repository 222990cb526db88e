use crate::Commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "subtrack")]
#[command(about = "Subscription tracker: device identity and store reconciliation")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}
