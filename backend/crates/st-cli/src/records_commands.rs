use clap::Subcommand;

#[derive(Subcommand)]
pub enum RecordsCommands {
    /// Count local records per type
    Count,
}
