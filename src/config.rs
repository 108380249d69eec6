use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use crate::errors::ParserError;

pub const MAIN_DOC_URL: &str = "https://docs.python.org/3/";
pub const MAIN_PEPS_URL: &str = "https://peps.python.org/";

/// Overrides the directory that results, downloads, logs and the cache live under.
pub const HOME_ENV: &str = "PYDOCS_PARSER_HOME";

const RESULTS_DIR: &str = "results";
const DOWNLOADS_DIR: &str = "downloads";
const LOG_DIR: &str = "logs";
const LOG_FILE: &str = "parser.log";
const CACHE_DIR: &str = ".http_cache";

pub const DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Status letter from the PEP index -> statuses a detail page may legitimately show.
const EXPECTED_STATUS: &[(&str, &[&str])] = &[
    ("A", &["Active", "Accepted"]),
    ("D", &["Deferred"]),
    ("F", &["Final"]),
    ("P", &["Provisional"]),
    ("R", &["Rejected"]),
    ("S", &["Superseded"]),
    ("W", &["Withdrawn"]),
    ("", &["Draft", "Active"]),
];

/// Read-only lookup over the PEP status letters.
#[derive(Debug, Clone, Copy)]
pub struct ExpectedStatus {
    entries: &'static [(&'static str, &'static [&'static str])],
}

impl Default for ExpectedStatus {
    fn default() -> Self {
        ExpectedStatus {
            entries: EXPECTED_STATUS,
        }
    }
}

impl ExpectedStatus {
    pub fn get(&self, code: &str) -> Option<&'static [&'static str]> {
        self.entries
            .iter()
            .find(|(key, _)| *key == code)
            .map(|(_, statuses)| *statuses)
    }

    /// Like [`get`](Self::get), but an unseen code is an error.
    pub fn lookup(&self, code: &str) -> Result<&'static [&'static str], ParserError> {
        self.get(code)
            .ok_or_else(|| ParserError::UnknownStatusCode(code.to_string()))
    }
}

/// Everything the routines need to know about the outside world, built once in `main`.
#[derive(Debug, Clone)]
pub struct Config {
    pub main_doc_url: Url,
    pub main_peps_url: Url,
    pub base_dir: PathBuf,
    pub results_dir: PathBuf,
    pub downloads_dir: PathBuf,
    pub log_file: PathBuf,
    pub cache_dir: PathBuf,
    pub datetime_format: &'static str,
    pub request_timeout: Duration,
    pub expected_status: ExpectedStatus,
}

impl Config {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self, ParserError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        Ok(Config {
            main_doc_url: Url::parse(MAIN_DOC_URL)?,
            main_peps_url: Url::parse(MAIN_PEPS_URL)?,
            results_dir: base_dir.join(RESULTS_DIR),
            downloads_dir: base_dir.join(DOWNLOADS_DIR),
            log_file: base_dir.join(LOG_DIR).join(LOG_FILE),
            cache_dir: base_dir.join(CACHE_DIR),
            base_dir,
            datetime_format: DATETIME_FORMAT,
            request_timeout: Duration::from_secs(30),
            expected_status: ExpectedStatus::default(),
        })
    }

    /// Base directory from `PYDOCS_PARSER_HOME`, falling back to the working directory.
    pub fn from_env() -> Result<Self, ParserError> {
        let base_dir = match env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => env::current_dir()?,
        };
        Self::new(base_dir)
    }

    /// Points the routines at another site root, used against local fixtures.
    pub fn with_urls(mut self, main_doc_url: Url, main_peps_url: Url) -> Self {
        self.main_doc_url = main_doc_url;
        self.main_peps_url = main_peps_url;
        self
    }
}
