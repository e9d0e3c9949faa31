//! HTML retrieval strategies
//!
//! Design: each fetcher is one way of getting a page's HTML (a relay, a
//! direct request, ...). [`FetcherChain`] tries them in registration order
//! and the first success is authoritative. There is no backoff and no
//! circuit breaking: a failure simply moves on to the next strategy.

mod direct;
mod http;
mod relay;

pub use direct::DirectFetcher;
pub use relay::RelayFetcher;

use crate::error::FetchError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default total request timeout
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP settings shared by the built-in fetchers
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Time allowed to establish a connection
    pub connect_timeout: Duration,
    /// Time allowed for the whole request, body included
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// One strategy for retrieving raw HTML
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Identifier for logging
    fn name(&self) -> &str;

    /// Retrieve the HTML of `url`
    async fn fetch_html(&self, url: &Url) -> Result<String, FetchError>;
}

/// Ordered fallback list of fetchers
pub struct FetcherChain {
    fetchers: Vec<Box<dyn Fetcher>>,
}

impl Default for FetcherChain {
    fn default() -> Self {
        Self::new()
    }
}

impl FetcherChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self {
            fetchers: Vec::new(),
        }
    }

    /// Relays in the given order, followed by a direct fetcher when
    /// `direct` is set
    pub fn with_defaults(relays: &[String], direct: bool, options: FetchOptions) -> Self {
        let mut chain = Self::new();
        for relay in relays {
            chain.register(Box::new(RelayFetcher::new(relay.clone(), options.clone())));
        }
        if direct {
            chain.register(Box::new(DirectFetcher::new(options)));
        }
        chain
    }

    /// Append a fetcher; earlier registrations are tried first
    pub fn register(&mut self, fetcher: Box<dyn Fetcher>) {
        self.fetchers.push(fetcher);
    }

    /// Number of registered fetchers
    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    /// True when no fetcher is registered
    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }

    /// Names of the registered fetchers, in order
    pub fn names(&self) -> Vec<&str> {
        self.fetchers.iter().map(|f| f.name()).collect()
    }

    /// Retrieve `url` with the first fetcher that succeeds
    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let url = validate_url(url)?;

        if self.fetchers.is_empty() {
            return Err(FetchError::NoFetchers);
        }

        let mut last_error = None;
        for fetcher in &self.fetchers {
            debug!(fetcher = fetcher.name(), url = %url, "Trying fetcher");
            match fetcher.fetch_html(&url).await {
                Ok(html) => {
                    debug!(fetcher = fetcher.name(), bytes = html.len(), "Fetch succeeded");
                    return Ok(html);
                }
                Err(e) => {
                    warn!(fetcher = fetcher.name(), error = %e, "Fetcher failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(FetchError::AllFailed(
            last_error.map(|e| e.to_string()).unwrap_or_default(),
        ))
    }
}

/// Accept only non-empty http(s) URLs
fn validate_url(url: &str) -> Result<Url, FetchError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(FetchError::MissingUrl);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(FetchError::InvalidUrlScheme);
    }
    Url::parse(url).map_err(|_| FetchError::InvalidUrlScheme)
}
