use super::{row, Row};
use crate::config::Config;
use crate::errors::ParserError;
use crate::extractor::Extractor;
use crate::session::Session;
use crate::utils::{cook_page, selector, text_of, TagQuery};

pub const HEADER: [&str; 3] = ["Documentation link", "Version", "Status"];

const ALL_VERSIONS_MARKER: &str = "All versions";

/// Version list from the docs sidebar: `(href, version, status)` per link.
pub fn latest_versions(session: &dyn Session, config: &Config) -> Result<Vec<Row>, ParserError> {
    let page = cook_page(session, &config.main_doc_url)?;
    let sidebar = page.find(&TagQuery::new("div").attr("class", "sphinxsidebarwrapper"))?;

    let ul_sel = selector("ul")?;
    let versions = sidebar
        .select(&ul_sel)
        .find(|ul| text_of(*ul).contains(ALL_VERSIONS_MARKER))
        .ok_or_else(|| {
            ParserError::ElementNotFound(format!(
                "no sidebar list containing {ALL_VERSIONS_MARKER:?} on {}",
                page.url
            ))
        })?;

    let extractor = Extractor::new();
    let a_sel = selector("a")?;
    let mut results = vec![row(HEADER)];
    for a in versions.select(&a_sel) {
        let href = a.value().attr("href").unwrap_or_default().to_string();
        let (version, status) = extractor.version_and_status(&text_of(a));
        results.push(vec![href, version, status]);
    }
    Ok(results)
}
