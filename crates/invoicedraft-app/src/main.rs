//! Main application entry point.

use clap::Parser;
use invoicedraft_app::{App, AppConfig, AppResult, Cli};
use std::process::ExitCode;

fn run(cli: Cli) -> AppResult<std::path::PathBuf> {
    let config = AppConfig::from_cli(cli)?;
    App::new(config)?.run()
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting InvoiceDraft");

    match run(Cli::parse()) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
