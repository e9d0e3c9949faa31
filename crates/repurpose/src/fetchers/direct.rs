//! Direct HTTP fetcher
//!
//! Requests the article URL itself. Usually registered last, after any
//! relays.

use crate::error::FetchError;
use crate::fetchers::{http, FetchOptions, Fetcher};
use async_trait::async_trait;
use url::Url;

/// Plain `GET` of the target URL
pub struct DirectFetcher {
    options: FetchOptions,
}

impl DirectFetcher {
    /// Create a direct fetcher
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }
}

impl Default for DirectFetcher {
    fn default() -> Self {
        Self::new(FetchOptions::default())
    }
}

#[async_trait]
impl Fetcher for DirectFetcher {
    fn name(&self) -> &str {
        "direct"
    }

    async fn fetch_html(&self, url: &Url) -> Result<String, FetchError> {
        http::get_text(url.clone(), &self.options).await
    }
}
