//! Asset generation
//!
//! Builds the prompt, calls the injected [`GenerationClient`] once and
//! validates the reply into an [`AssetBundle`]. No retries.

mod client;
mod gemini;
mod prompt;

pub use client::GenerationClient;
pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_GEMINI_MODEL, GEMINI_BASE_URL};
pub use prompt::{build_prompt, SYSTEM_INSTRUCTION, TASK_TEMPLATE};

use crate::error::GenerationError;
use crate::types::{AssetBundle, AssetRequest, GenerationParams};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shortest text worth sending to the model
pub const MIN_GENERATION_LENGTH: usize = 50;

/// Turns content text into an [`AssetBundle`]
#[derive(Clone)]
pub struct AssetGenerator {
    client: Arc<dyn GenerationClient>,
    params: GenerationParams,
}

impl AssetGenerator {
    /// Create a generator with default parameters
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            client,
            params: GenerationParams::default(),
        }
    }

    /// Replace the generation parameters
    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    /// Configured parameters
    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Generate with the configured parameters
    pub async fn generate(&self, content: &str) -> Result<AssetBundle, GenerationError> {
        self.generate_with(content, &self.params).await
    }

    /// Generate with explicit parameters
    pub async fn generate_with(
        &self,
        content: &str,
        params: &GenerationParams,
    ) -> Result<AssetBundle, GenerationError> {
        let found = content.chars().count();
        if found < MIN_GENERATION_LENGTH {
            return Err(GenerationError::ContentTooShort {
                found,
                required: MIN_GENERATION_LENGTH,
            });
        }

        let request = AssetRequest {
            prompt: build_prompt(content),
            params: params.clone(),
        };

        debug!(
            client = self.client.name(),
            content_chars = found,
            temperature = params.temperature,
            "Requesting assets"
        );

        let raw = self.client.complete(&request).await?;
        parse_bundle(&raw)
    }
}

/// Parse and validate a model reply. The reply text itself never ends up in
/// the error.
pub fn parse_bundle(raw: &str) -> Result<AssetBundle, GenerationError> {
    serde_json::from_str::<AssetBundle>(raw.trim()).map_err(|e| {
        warn!(error = %e, len = raw.len(), "Rejecting generation response");
        GenerationError::MalformedResponse(e.to_string())
    })
}
