use clap::{Parser, ValueEnum};
use log::info;

use crate::config::Config;
use crate::errors::ParserError;
use crate::modes::Mode;
use crate::outputs::control_output;
use crate::session::{CachedSession, Session};

/// Where tabular results go. Without `--output` they are printed as plain lines.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table on stdout
    Pretty,
    /// CSV file under the results directory
    File,
}

/// Python documentation parser.
#[derive(Debug, Parser)]
#[command(name = "pydocs-parser", version, about = "Python documentation parser")]
pub struct Cli {
    /// Parser mode
    #[arg(value_enum)]
    pub mode: Mode,

    /// Clear the HTTP response cache before running
    #[arg(short = 'c', long)]
    pub clear_cache: bool,

    /// Extra output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

/// Builds the cached session and runs the selected mode.
pub fn run(cli: &Cli, config: &Config) -> Result<(), ParserError> {
    let session = CachedSession::new(&config.cache_dir, config.request_timeout)?;
    if cli.clear_cache {
        session.clear_cache()?;
    }
    run_with_session(cli, &session, config)
}

pub fn run_with_session(cli: &Cli, session: &dyn Session, config: &Config) -> Result<(), ParserError> {
    info!("Running mode {}", cli.mode.as_str());
    if let Some(results) = cli.mode.run(session, config)? {
        control_output(&results, cli.mode, cli.output, config)?;
    }
    Ok(())
}
