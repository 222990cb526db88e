use clap::Subcommand;

#[derive(Subcommand)]
pub enum IdentityCommands {
    /// Print this device's identity, creating it on first use
    Show,

    /// Delete the persisted identity (a new one is minted on next use)
    Reset,
}
