use log::info;
use url::Url;

use super::{error_record, log_error_records, row, Row};
use crate::config::Config;
use crate::errors::ParserError;
use crate::extractor::flatten_lines;
use crate::progress::Progress;
use crate::session::Session;
use crate::utils::{cook_page, text_of, Page, TagQuery};

pub const HEADER: [&str; 3] = ["Article link", "Title", "Editor, author"];

const ARTICLE_LINKS: &str = "#what-s-new-in-python div.toctree-wrapper li.toctree-l1 > a";

/// Article rows plus one record per page that could not be turned into a row.
#[derive(Debug, Default)]
pub struct ReleaseNotes {
    pub rows: Vec<Row>,
    pub errors: Vec<String>,
}

/// One row per "What's New" article: link, page title and the editor/author block.
pub fn whats_new(session: &dyn Session, config: &Config) -> Result<Vec<Row>, ParserError> {
    let notes = release_notes(session, config)?;
    log_error_records(&notes.errors);
    Ok(notes.rows)
}

pub fn release_notes(session: &dyn Session, config: &Config) -> Result<ReleaseNotes, ParserError> {
    let whats_new_url = config.main_doc_url.join("whatsnew/")?;
    let index = cook_page(session, &whats_new_url)?;

    let hrefs: Vec<String> = index
        .select(ARTICLE_LINKS)?
        .into_iter()
        .filter_map(|a| a.value().attr("href").map(str::to_string))
        .collect();
    info!("Found {} release notes on {}", hrefs.len(), whats_new_url);

    let progress = Progress::bar(hrefs.len(), "whats-new");
    let mut notes = ReleaseNotes {
        rows: vec![row(HEADER)],
        errors: Vec::new(),
    };

    for href in hrefs {
        let mut version_link = None;
        match article_row(session, &index, &href, &mut version_link) {
            Ok(article) => notes.rows.push(article),
            Err(e) if e.is_page_level() => {
                let at = version_link.as_ref().unwrap_or(&index.url);
                notes.errors.push(error_record(&e, at.as_str()));
            }
            Err(e) => return Err(e),
        }
        progress.inc();
    }
    progress.finish();

    Ok(notes)
}

fn article_row(
    session: &dyn Session,
    index: &Page,
    href: &str,
    version_link: &mut Option<Url>,
) -> Result<Row, ParserError> {
    let link = version_link.insert(index.join(href)?);
    let page = cook_page(session, link)?;
    let title = text_of(page.find(&TagQuery::new("h1"))?);
    let editors = flatten_lines(&text_of(page.find(&TagQuery::new("dl"))?));
    Ok(vec![link.to_string(), title, editors])
}
