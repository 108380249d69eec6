//! The four scraping routines and the enum that dispatches between them.
//!
//! Every routine works page by page. Loops over many pages (`whats-new`, `pep`)
//! record connection, missing-tag and unresolvable-link failures as error
//! records, skip the page and keep going; the records are logged as one batch
//! when the loop is done.
//! Structural lookups outside a loop propagate and end the run.

pub mod download;
pub mod latest_versions;
pub mod pep;
pub mod whats_new;

use clap::ValueEnum;
use log::error;

use crate::config::Config;
use crate::errors::ParserError;
use crate::session::Session;

/// One output line: a fixed number of text fields. The first row of a result is the header.
pub type Row = Vec<String>;

pub fn row<I, S>(fields: I) -> Row
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fields.into_iter().map(Into::into).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Release-notes articles with their titles and authors
    WhatsNew,
    /// Documentation versions and their status
    LatestVersions,
    /// Download the A4 PDF documentation archive
    Download,
    /// Count PEP statuses and report index/page disagreements
    Pep,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::WhatsNew => "whats-new",
            Mode::LatestVersions => "latest-versions",
            Mode::Download => "download",
            Mode::Pep => "pep",
        }
    }

    /// Runs the routine. `None` means the mode's effect is a file on disk, not rows.
    pub fn run(self, session: &dyn Session, config: &Config) -> Result<Option<Vec<Row>>, ParserError> {
        match self {
            Mode::WhatsNew => whats_new::whats_new(session, config).map(Some),
            Mode::LatestVersions => latest_versions::latest_versions(session, config).map(Some),
            Mode::Download => download::download(session, config).map(|_| None),
            Mode::Pep => pep::pep(session, config).map(Some),
        }
    }
}

/// Formats a page-level failure for the batched error log.
pub fn error_record(err: &ParserError, url: &str) -> String {
    match err {
        ParserError::ConnectionFailure { source, .. } => {
            format!("Error while processing {url}: {source}")
        }
        _ => format!("{err} at {url}"),
    }
}

pub fn log_error_records(errors: &[String]) {
    if !errors.is_empty() {
        error!("{}", errors.join("\n"));
    }
}
