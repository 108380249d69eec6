use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::errors::ParserError;
use crate::session::{get_response, Session};

/// Tag name plus attribute filter, matched the same way at every call site.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagQuery {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

impl TagQuery {
    pub fn new(name: impl Into<String>) -> Self {
        TagQuery {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    /// `class` also matches on a single class token; other attributes need the exact value.
    pub fn matches(&self, element: ElementRef<'_>) -> bool {
        let el = element.value();
        if !el.name().eq_ignore_ascii_case(&self.name) {
            return false;
        }
        self.attrs.iter().all(|(key, expected)| match el.attr(key) {
            Some(actual) if actual == expected => true,
            Some(_) if key == "class" => el.classes().any(|c| c == expected),
            _ => false,
        })
    }

    fn not_found(&self) -> ParserError {
        ParserError::TagNotFound {
            tag: self.name.clone(),
            attrs: self.attrs_display(),
        }
    }

    fn attrs_display(&self) -> String {
        let pairs: Vec<String> = self
            .attrs
            .iter()
            .map(|(k, v)| format!("{k}={v:?}"))
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }
}

/// First element below `scope` (document order) matching `query`.
pub fn find_tag<'a>(scope: ElementRef<'a>, query: &TagQuery) -> Result<ElementRef<'a>, ParserError> {
    scope
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| query.matches(*el))
        .ok_or_else(|| query.not_found())
}

pub fn selector(css: &str) -> Result<Selector, ParserError> {
    Selector::parse(css).map_err(|e| ParserError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// All text nodes below `element`, concatenated.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// A parsed HTML page together with the URL it was loaded from.
pub struct Page {
    pub url: Url,
    html: Html,
}

impl Page {
    pub fn parse(url: Url, text: &str) -> Self {
        Page {
            url,
            html: Html::parse_document(text),
        }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    pub fn find(&self, query: &TagQuery) -> Result<ElementRef<'_>, ParserError> {
        let root = self.root();
        if query.matches(root) {
            return Ok(root);
        }
        find_tag(root, query)
    }

    pub fn select(&self, css: &str) -> Result<Vec<ElementRef<'_>>, ParserError> {
        let sel = selector(css)?;
        Ok(self.html.select(&sel).collect())
    }

    pub fn select_one(&self, css: &str) -> Result<Option<ElementRef<'_>>, ParserError> {
        let sel = selector(css)?;
        Ok(self.html.select(&sel).next())
    }

    /// Resolves `href` against the page URL.
    pub fn join(&self, href: &str) -> Result<Url, ParserError> {
        self.url.join(href).map_err(|source| ParserError::BadLink {
            href: href.to_string(),
            source,
        })
    }
}

/// Loads `url` through `session` and parses it as HTML.
pub fn cook_page(session: &dyn Session, url: &Url) -> Result<Page, ParserError> {
    let response = get_response(session, url.as_str())?;
    Ok(Page::parse(url.clone(), &response.text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::stub::StubSession;

    const DOC: &str = r#"
        <html><body>
          <div class="sphinxsidebarwrapper extra"><p>side</p></div>
          <table><tr>
            <td>SF</td>
            <td><a class="pep reference internal" href="pep-0008/">8</a></td>
            <td><a class="pep" href="pep-0009/">9</a></td>
          </tr></table>
          <h1>Title</h1>
        </body></html>"#;

    fn page() -> Page {
        Page::parse(Url::parse("https://peps.python.org/").unwrap(), DOC)
    }

    #[test]
    fn find_matches_name_only() {
        let page = page();
        let h1 = page.find(&TagQuery::new("h1")).unwrap();
        assert_eq!(text_of(h1), "Title");
    }

    #[test]
    fn find_matches_class_token_and_full_value() {
        let page = page();
        let sidebar = page
            .find(&TagQuery::new("div").attr("class", "sphinxsidebarwrapper"))
            .unwrap();
        assert_eq!(text_of(sidebar), "side");

        let link = page
            .find(&TagQuery::new("a").attr("class", "pep reference internal"))
            .unwrap();
        assert_eq!(link.value().attr("href"), Some("pep-0008/"));
    }

    #[test]
    fn find_tag_searches_below_scope_only() {
        let page = page();
        let row = page.find(&TagQuery::new("tr")).unwrap();
        let cell = find_tag(row, &TagQuery::new("td")).unwrap();
        assert_eq!(text_of(cell), "SF");
        assert!(find_tag(row, &TagQuery::new("h1")).is_err());
        assert!(find_tag(cell, &TagQuery::new("td")).is_err());
    }

    #[test]
    fn find_without_match_is_tag_not_found() {
        let page = page();
        let err = page
            .find(&TagQuery::new("a").attr("class", "missing"))
            .unwrap_err();
        match err {
            ParserError::TagNotFound { tag, attrs } => {
                assert_eq!(tag, "a");
                assert!(attrs.contains("missing"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            page.find(&TagQuery::new("dl")),
            Err(ParserError::TagNotFound { .. })
        ));
    }

    #[test]
    fn select_and_join() {
        let page = page();
        let links = page.select("td > a").unwrap();
        assert_eq!(links.len(), 2);
        assert!(page.select_one("dl").unwrap().is_none());
        assert_eq!(
            page.join("pep-0008/").unwrap().as_str(),
            "https://peps.python.org/pep-0008/"
        );
        assert!(matches!(page.select("td >"), Err(ParserError::Selector { .. })));
        assert!(matches!(
            page.join("http://[bad/"),
            Err(ParserError::BadLink { href, .. }) if href == "http://[bad/"
        ));
    }

    #[test]
    fn cook_page_propagates_connection_failure() {
        let url = Url::parse("https://docs.python.org/3/").unwrap();
        let session = StubSession::new().page(url.as_str(), "<h1>Docs</h1>");
        let page = cook_page(&session, &url).unwrap();
        assert_eq!(text_of(page.find(&TagQuery::new("h1")).unwrap()), "Docs");

        let missing = Url::parse("https://docs.python.org/2/").unwrap();
        assert!(matches!(
            cook_page(&session, &missing),
            Err(ParserError::ConnectionFailure { .. })
        ));
    }
}
