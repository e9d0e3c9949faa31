//! Relay (proxy) fetcher
//!
//! Asks a server-side relay to retrieve the page: `GET {relay}?url={target}`.
//! Relays sidestep sites that refuse requests from unknown clients.

use crate::error::FetchError;
use crate::fetchers::{http, FetchOptions, Fetcher};
use async_trait::async_trait;
use url::Url;

/// Fetch through a relay endpoint
pub struct RelayFetcher {
    endpoint: String,
    options: FetchOptions,
}

impl RelayFetcher {
    /// Relay at `endpoint`, e.g. `https://example.com/api/proxy`
    pub fn new(endpoint: impl Into<String>, options: FetchOptions) -> Self {
        Self {
            endpoint: endpoint.into(),
            options,
        }
    }

    /// Relay endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn relay_url(&self, target: &Url) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| FetchError::RequestError(format!("invalid relay URL: {e}")))?;
        url.query_pairs_mut().append_pair("url", target.as_str());
        Ok(url)
    }
}

#[async_trait]
impl Fetcher for RelayFetcher {
    fn name(&self) -> &str {
        "relay"
    }

    async fn fetch_html(&self, url: &Url) -> Result<String, FetchError> {
        http::get_text(self.relay_url(url)?, &self.options).await
    }
}
