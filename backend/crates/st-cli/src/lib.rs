//! st-cli library
//!
//! Wiring behind the `subtrack` binary, exported for tests.

pub(crate) mod app;
pub(crate) mod cli;
pub(crate) mod commands;
pub(crate) mod error;
pub(crate) mod identity_commands;
pub(crate) mod logger;
pub(crate) mod records_commands;


pub use app::{App, IdentityReport, RecordCountsReport, render};
pub use cli::Cli;
pub use commands::Commands;
pub use error::{CliError, Result as CliResult};
pub use identity_commands::IdentityCommands;
pub use logger::initialize as initialize_logger;
pub use records_commands::RecordsCommands;
