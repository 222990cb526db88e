//! subtrack - subscription tracker CLI
//!
//! # Examples
//!
//! ```bash
//! # Show this device's identity
//! subtrack identity show --pretty
//!
//! # Preview, then push local records to the cloud store
//! subtrack plan --to cloud
//! subtrack migrate --to cloud --workers 8
//! ```

use st_cli::{App, Cli, CliResult, initialize_logger, render};
use st_config::Config;
use st_sync::MigrationCancel;

use std::process::ExitCode;

use clap::Parser;
use log::{error, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<ExitCode> {
    let config = Config::load()?;
    config.validate()?;

    let log_file = match &config.logging.file {
        Some(file) => Some(Config::config_dir()?.join(file)),
        None => None,
    };
    initialize_logger(config.logging.level, log_file, config.logging.colored)?;
    config.log_summary();

    let app = App::new(config)?;

    let cancel = MigrationCancel::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received; letting in-flight records finish");
            on_interrupt.cancel();
        }
    });

    let (report, succeeded) = app.dispatch(cli.command, &cancel).await?;
    println!("{}", render(&report, cli.pretty)?);

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
