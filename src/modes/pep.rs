use std::fmt;

use log::{error, info};
use scraper::ElementRef;
use url::Url;

use super::{error_record, log_error_records, row, Row};
use crate::config::Config;
use crate::errors::ParserError;
use crate::extractor::status_code;
use crate::progress::Progress;
use crate::session::Session;
use crate::utils::{cook_page, find_tag, selector, text_of, Page, TagQuery};

pub const HEADER: [&str; 2] = ["Status", "Count"];
pub const FOOTER: &str = "Total";

const INDEX_ROWS: &str = "#numerical-index tbody tr";
const STATUS_LABEL: &str = "Status";

/// Counts per status, kept in the order statuses were first seen.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusTally {
    entries: Vec<(String, usize)>,
}

impl StatusTally {
    pub fn add(&mut self, status: &str) {
        match self.entries.iter_mut().find(|(s, _)| s == status) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((status.to_string(), 1)),
        }
    }

    #[cfg(test)]
    pub fn get(&self, status: &str) -> usize {
        self.entries
            .iter()
            .find(|(s, _)| s == status)
            .map_or(0, |(_, count)| *count)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Header, one row per status, then the total.
    pub fn to_rows(&self) -> Vec<Row> {
        let mut rows = Vec::with_capacity(self.entries.len() + 2);
        rows.push(row(HEADER));
        for (status, count) in &self.entries {
            rows.push(vec![status.clone(), count.to_string()]);
        }
        rows.push(vec![FOOTER.to_string(), self.total().to_string()]);
        rows
    }
}

/// A PEP whose page shows a status the index letter does not allow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub url: String,
    pub actual: String,
    pub expected: Vec<String>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\nStatus on page: {}\nExpected statuses: {:?}",
            self.url, self.actual, self.expected
        )
    }
}

#[derive(Debug, Default)]
pub struct PepAudit {
    pub tally: StatusTally,
    pub mismatches: Vec<Mismatch>,
    pub errors: Vec<String>,
}

impl PepAudit {
    /// Counts `actual` and notes a mismatch when it is not among `expected`.
    pub fn record(&mut self, url: &Url, actual: &str, expected: &[&str]) {
        if !expected.contains(&actual) {
            self.mismatches.push(Mismatch {
                url: url.to_string(),
                actual: actual.to_string(),
                expected: expected.iter().map(|s| s.to_string()).collect(),
            });
        }
        self.tally.add(actual);
    }
}

/// Status counts over every PEP in the numerical index.
pub fn pep(session: &dyn Session, config: &Config) -> Result<Vec<Row>, ParserError> {
    let audit = audit(session, config)?;

    log_error_records(&audit.errors);
    if !audit.mismatches.is_empty() {
        let details: Vec<String> = audit.mismatches.iter().map(ToString::to_string).collect();
        error!("Mismatched statuses:\n{}", details.join("\n"));
    }
    Ok(audit.tally.to_rows())
}

/// Walks the index and every PEP page. Unreachable or malformed pages are recorded
/// and skipped; an unknown status letter aborts the whole audit.
pub fn audit(session: &dyn Session, config: &Config) -> Result<PepAudit, ParserError> {
    let index = cook_page(session, &config.main_peps_url)?;
    let tr_tags = index.select(INDEX_ROWS)?;
    info!("Found {} PEPs in the numerical index", tr_tags.len());

    let progress = Progress::bar(tr_tags.len(), "pep");
    let mut audit = PepAudit::default();

    for tr in tr_tags {
        let mut pep_url = None;
        match audit_row(session, config, &index, tr, &mut pep_url) {
            Ok((url, actual, expected)) => audit.record(&url, &actual, expected),
            Err(e) if e.is_page_level() => {
                let url = pep_url.as_ref().unwrap_or(&index.url);
                audit.errors.push(error_record(&e, url.as_str()));
            }
            Err(e) => return Err(e),
        }
        progress.inc();
    }
    progress.finish();

    Ok(audit)
}

/// PEP page URL, the status shown on that page and the statuses its index letter allows.
/// `pep_url` is filled in as soon as the link is resolved so failures can name it.
fn audit_row(
    session: &dyn Session,
    config: &Config,
    index: &Page,
    tr: ElementRef<'_>,
    pep_url: &mut Option<Url>,
) -> Result<(Url, String, &'static [&'static str]), ParserError> {
    let code = status_code(&text_of(find_tag(tr, &TagQuery::new("td"))?));
    let expected = config.expected_status.lookup(&code)?;

    let link = find_tag(tr, &TagQuery::new("a").attr("class", "pep reference internal"))?;
    let href = link.value().attr("href").unwrap_or_default();
    let url = index.join(href)?;
    *pep_url = Some(url.clone());

    let page = cook_page(session, &url)?;
    let actual = status_on_page(&page)?;
    Ok((url, actual, expected))
}

/// Text of the field that follows the `Status` label in the PEP header.
fn status_on_page(page: &Page) -> Result<String, ParserError> {
    let dt_sel = selector("dt")?;
    page.root()
        .select(&dt_sel)
        .find(|dt| dt.text().any(|t| t.trim() == STATUS_LABEL))
        .and_then(|dt| dt.next_siblings().find_map(ElementRef::wrap))
        .map(|value| text_of(value).trim().to_string())
        .ok_or_else(|| ParserError::TagNotFound {
            tag: "dt".to_string(),
            attrs: format!("{{text={STATUS_LABEL:?}}}"),
        })
}
