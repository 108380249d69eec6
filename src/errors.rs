use std::error::Error as StdError;

/// Boxed cause carried by [`ParserError::ConnectionFailure`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    /// Any transport-level fault while loading a page.
    #[error("failed to load page {url}: {source}")]
    ConnectionFailure {
        url: String,
        #[source]
        source: BoxError,
    },

    /// Expected HTML structure is missing.
    #[error("tag not found: {tag} {attrs}")]
    TagNotFound { tag: String, attrs: String },

    /// A required page section is missing.
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// PEP index cell carries a status code the expected-status table does not know.
    #[error("unknown PEP status code {0:?}")]
    UnknownStatusCode(String),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A link on a page that cannot be resolved against the page URL.
    #[error("cannot resolve link {href:?}: {source}")]
    BadLink {
        href: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid css selector {selector:?}: {message}")]
    Selector { selector: String, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("logger setup failed: {0}")]
    Logger(String),
}

impl ParserError {
    pub fn connection(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ParserError::ConnectionFailure {
            url: url.into(),
            source: source.into(),
        }
    }

    /// Per-page failures that a scraping loop records and skips.
    pub fn is_page_level(&self) -> bool {
        matches!(
            self,
            ParserError::ConnectionFailure { .. }
                | ParserError::TagNotFound { .. }
                | ParserError::BadLink { .. }
        )
    }
}
