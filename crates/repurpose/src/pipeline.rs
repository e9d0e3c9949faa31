//! Repurposer builder and end-to-end pipeline

use crate::error::{ConfigError, PipelineError};
use crate::extract::{extract_document, ExtractedContent};
use crate::fetchers::{FetchOptions, Fetcher, FetcherChain};
use crate::generate::{AssetGenerator, GeminiClient, GeminiConfig, GenerationClient};
use crate::types::{AssetBundle, GenerationParams, RawDocument, RepurposeInput};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Progress update during a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineStatus {
    /// Current phase ("validate", "fetch", "extract", "generate", "complete")
    pub phase: String,
    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Estimated completion percentage (0-100)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<f32>,
}

impl PipelineStatus {
    /// Create a new status with phase
    pub fn new(phase: impl Into<String>) -> Self {
        Self {
            phase: phase.into(),
            message: None,
            percent_complete: None,
        }
    }

    /// Set message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Set completion percentage
    pub fn with_percent(mut self, percent: f32) -> Self {
        self.percent_complete = Some(percent);
        self
    }
}

/// Builder for a [`Repurposer`]
#[derive(Default)]
pub struct RepurposerBuilder {
    api_key: Option<String>,
    model: Option<String>,
    gemini_base_url: Option<String>,
    temperature: Option<f32>,
    user_agent: Option<String>,
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    relays: Vec<String>,
    direct_fetch: Option<bool>,
    generation_client: Option<Arc<dyn GenerationClient>>,
    fetchers: Vec<Box<dyn Fetcher>>,
}

impl RepurposerBuilder {
    /// Create a builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Gemini API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Gemini model name
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Gemini API base URL
    pub fn gemini_base_url(mut self, url: impl Into<String>) -> Self {
        self.gemini_base_url = Some(url.into());
        self
    }

    /// Sampling temperature, 0.0 to 2.0
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set custom User-Agent for page fetches
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Connect timeout for every outbound request
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Total timeout for every outbound request
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Add a relay endpoint; relays are tried in the order added
    pub fn relay(mut self, endpoint: impl Into<String>) -> Self {
        self.relays.push(endpoint.into());
        self
    }

    /// Whether to fall back to a direct request after the relays
    pub fn direct_fetch(mut self, enable: bool) -> Self {
        self.direct_fetch = Some(enable);
        self
    }

    /// Use this generation client instead of Gemini
    pub fn generation_client(mut self, client: Arc<dyn GenerationClient>) -> Self {
        self.generation_client = Some(client);
        self
    }

    /// Append a custom fetcher, tried after the relays and direct fetcher
    pub fn fetcher(mut self, fetcher: Box<dyn Fetcher>) -> Self {
        self.fetchers.push(fetcher);
        self
    }

    /// Build the repurposer
    pub fn build(self) -> Result<Repurposer, ConfigError> {
        let mut params = GenerationParams::default();
        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::InvalidTemperature(temperature));
            }
            params.temperature = temperature;
        }

        let mut fetch_options = FetchOptions {
            user_agent: self.user_agent,
            ..Default::default()
        };
        if let Some(timeout) = self.connect_timeout {
            fetch_options.connect_timeout = timeout;
        }
        if let Some(timeout) = self.request_timeout {
            fetch_options.timeout = timeout;
        }

        let client: Arc<dyn GenerationClient> = match self.generation_client {
            Some(client) => client,
            None => {
                let mut config = GeminiConfig::new(self.api_key.ok_or(ConfigError::MissingApiKey)?);
                if let Some(model) = self.model {
                    config.model = model;
                }
                if let Some(url) = self.gemini_base_url {
                    config.base_url = url;
                }
                if let Some(timeout) = self.connect_timeout {
                    config.connect_timeout = timeout;
                }
                if let Some(timeout) = self.request_timeout {
                    config.timeout = timeout;
                }
                Arc::new(GeminiClient::new(config)?)
            }
        };

        let mut fetchers = FetcherChain::with_defaults(
            &self.relays,
            self.direct_fetch.unwrap_or(true),
            fetch_options,
        );
        for fetcher in self.fetchers {
            fetchers.register(fetcher);
        }

        Ok(Repurposer {
            fetchers,
            generator: AssetGenerator::new(client).with_params(params),
        })
    }
}

/// Article in, asset bundle out
///
/// Holds no per-request state and can be shared across tasks. Dropping a
/// pending `repurpose` future cancels the in-flight HTTP call.
pub struct Repurposer {
    fetchers: FetcherChain,
    generator: AssetGenerator,
}

impl Repurposer {
    /// Create a new builder
    pub fn builder() -> RepurposerBuilder {
        RepurposerBuilder::new()
    }

    /// Assemble from explicit parts
    pub fn new(fetchers: FetcherChain, generator: AssetGenerator) -> Self {
        Self {
            fetchers,
            generator,
        }
    }

    /// Fetch chain in use
    pub fn fetchers(&self) -> &FetcherChain {
        &self.fetchers
    }

    /// Generator in use
    pub fn generator(&self) -> &AssetGenerator {
        &self.generator
    }

    /// Fetch and extract a page without generating anything
    pub async fn extract_url(&self, url: &str) -> Result<ExtractedContent, PipelineError> {
        let html = self.fetchers.fetch_html(url).await?;
        Ok(extract_document(&RawDocument::html(html, url))?)
    }

    /// Run the full pipeline
    pub async fn repurpose(&self, input: RepurposeInput) -> Result<AssetBundle, PipelineError> {
        self.repurpose_with_status(input, |_| {}).await
    }

    /// Run the full pipeline with status updates
    pub async fn repurpose_with_status<F>(
        &self,
        input: RepurposeInput,
        mut status_callback: F,
    ) -> Result<AssetBundle, PipelineError>
    where
        F: FnMut(PipelineStatus),
    {
        status_callback(PipelineStatus::new("validate").with_percent(0.0));

        let text = match input {
            RepurposeInput::Url { url } => {
                status_callback(
                    PipelineStatus::new("fetch")
                        .with_message(url.clone())
                        .with_percent(10.0),
                );
                info!(url = %url, "Fetching article");
                let html = self.fetchers.fetch_html(&url).await?;

                status_callback(PipelineStatus::new("extract").with_percent(40.0));
                let extracted = extract_document(&RawDocument::html(html, url))?;
                info!(
                    chars = extracted.char_count,
                    truncated = extracted.truncated,
                    "Extracted article text"
                );
                extracted.text
            }
            RepurposeInput::Text { text } => text,
        };

        status_callback(PipelineStatus::new("generate").with_percent(50.0));
        let bundle = self.generator.generate(&text).await?;

        status_callback(PipelineStatus::new("complete").with_percent(100.0));
        Ok(bundle)
    }
}
