use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use pydocs_parser::{cli, logger, Cli, Config};

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logger::init(&config.log_file) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    info!("Parser started!");

    let args = Cli::parse();
    info!("Command-line arguments: {:?}", args);

    match cli::run(&args, &config) {
        Ok(()) => {
            info!("Parser finished successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Parser finished with an error.\n{e}");
            ExitCode::FAILURE
        }
    }
}
