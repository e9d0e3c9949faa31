//! Google Gemini generation client

use crate::error::{ConfigError, GenerationError};
use crate::generate::GenerationClient;
use crate::types::AssetRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Public Gemini API endpoint
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// The key travels in a header so it never appears in a URL
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig<'a> {
    response_mime_type: &'a str,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

/// Connection settings for [`GeminiClient`]
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Defaults for everything but the key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Google Gemini `generateContent` client
pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a client from `config`
    pub fn new(config: GeminiConfig) -> Result<Self, ConfigError> {
        if config.api_key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ConfigError::ClientBuildError)?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> Result<Url, GenerationError> {
        let raw = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        Url::parse(&raw)
            .map_err(|e| GenerationError::ServiceUnavailable(format!("invalid endpoint: {e}")))
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: &AssetRequest) -> Result<String, GenerationError> {
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GeminiGenerationConfig {
                response_mime_type: &request.params.response_mime_type,
                temperature: request.params.temperature,
            },
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = request.prompt.len(),
            "Sending Gemini request"
        );

        let resp = self
            .client
            .post(self.endpoint()?)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                GenerationError::ServiceUnavailable(format!("request failed: {}", e.without_url()))
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(GenerationError::ServiceUnavailable(match status.as_u16() {
                429 => "rate limit exceeded".to_string(),
                401 => "invalid API key".to_string(),
                403 => "API access forbidden".to_string(),
                code => format!("Gemini API error ({code})"),
            }));
        }

        let text = resp
            .text()
            .await
            .map_err(|e| {
                GenerationError::ServiceUnavailable(format!("reading body: {}", e.without_url()))
            })?;

        let parsed: GeminiResponse = serde_json::from_str(&text)
            .map_err(|e| GenerationError::MalformedResponse(format!("envelope: {e}")))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::MalformedResponse("no candidates".to_string()))?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(GenerationError::MalformedResponse(
                "blocked by safety filters".to_string(),
            ));
        }

        candidate
            .content
            .and_then(|c| c.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| GenerationError::MalformedResponse("no content parts".to_string()))
    }
}
