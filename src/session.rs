use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use md5::{Digest, Md5};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};

use crate::errors::{BoxError, ParserError};

const USER_AGENT_VALUE: &str = concat!("pydocs-parser/", env!("CARGO_PKG_VERSION"));

/// Anything that can turn a URL into a response body.
pub trait Session {
    fn get(&self, url: &str) -> Result<Vec<u8>, BoxError>;
}

/// A loaded page. The body is always decoded as UTF-8.
#[derive(Debug, Clone)]
pub struct Response {
    pub url: String,
    body: Vec<u8>,
}

impl Response {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }
}

/// Fetches `url`; every transport failure comes back as `ConnectionFailure`.
pub fn get_response(session: &dyn Session, url: &str) -> Result<Response, ParserError> {
    let body = session
        .get(url)
        .map_err(|source| ParserError::connection(url, source))?;
    Ok(Response {
        url: url.to_string(),
        body,
    })
}

/// On-disk store of response bodies keyed by the md5 of their URL.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ResponseCache { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, url: &str) -> PathBuf {
        let digest = Md5::digest(url.as_bytes());
        self.dir.join(format!("{:x}", digest))
    }

    pub fn load(&self, url: &str) -> Option<Vec<u8>> {
        fs::read(self.path_for(url)).ok()
    }

    pub fn store(&self, url: &str, body: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(url), body)
    }

    pub fn clear(&self) -> io::Result<()> {
        if self.dir.exists() {
            fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

/// Blocking HTTP client backed by a [`ResponseCache`].
pub struct CachedSession {
    client: Client,
    cache: ResponseCache,
}

impl CachedSession {
    pub fn new(cache_dir: impl Into<PathBuf>, timeout: Duration) -> Result<Self, ParserError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| ParserError::connection("<client setup>", e))?;

        Ok(CachedSession {
            client,
            cache: ResponseCache::new(cache_dir),
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn clear_cache(&self) -> Result<(), ParserError> {
        self.cache.clear()?;
        info!("Response cache cleared: {}", self.cache.dir().display());
        Ok(())
    }
}

impl Session for CachedSession {
    fn get(&self, url: &str) -> Result<Vec<u8>, BoxError> {
        if let Some(body) = self.cache.load(url) {
            debug!("Cache hit: {}", url);
            return Ok(body);
        }

        debug!("Fetching: {}", url);
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        let body = resp.bytes()?.to_vec();

        if status.is_success() {
            if let Err(e) = self.cache.store(url, &body) {
                warn!("Failed to cache {}: {}", url, e);
            }
        } else {
            warn!("{} answered with status {}", url, status);
        }
        Ok(body)
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io;

    use super::Session;
    use crate::errors::BoxError;

    /// In-memory pages; unknown URLs fail like a refused connection.
    #[derive(Default)]
    pub struct StubSession {
        pages: HashMap<String, Vec<u8>>,
        pub requests: RefCell<Vec<String>>,
    }

    impl StubSession {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.pages.insert(url.to_string(), body.into());
            self
        }
    }

    impl Session for StubSession {
        fn get(&self, url: &str) -> Result<Vec<u8>, BoxError> {
            self.requests.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| {
                io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused").into()
            })
        }
    }
}
