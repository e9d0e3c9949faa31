//! Error types for Repurpose
//!
//! Each stage has its own error enum. [`PipelineError`] is the single type
//! callers of [`Repurposer::repurpose`](crate::Repurposer::repurpose) see.

use thiserror::Error;

/// Errors raised while retrieving raw HTML
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL is missing
    #[error("Missing required parameter: url")]
    MissingUrl,

    /// URL has invalid scheme
    #[error("Invalid URL: must start with http:// or https://")]
    InvalidUrlScheme,

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to connect to server")]
    ConnectError(#[source] reqwest::Error),

    /// Server (or relay) answered with a non-success status
    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    /// Response is not textual
    #[error("Binary content is not supported: {0}")]
    BinaryContent(String),

    /// Body did not arrive completely before the deadline
    #[error("Response body timed out")]
    BodyTimeout,

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),

    /// No fetcher is configured
    #[error("No fetcher available for URL")]
    NoFetchers,

    /// Every configured fetcher failed
    #[error("All fetchers failed, last error: {0}")]
    AllFailed(String),
}

impl FetchError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::ConnectError(err)
        } else {
            FetchError::RequestError(err.to_string())
        }
    }
}

/// Errors raised by the content extractor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// Extraction ran but found too little usable text
    #[error("Insufficient content: found {found} characters, need at least {required}")]
    InsufficientContent { found: usize, required: usize },
}

/// Errors raised by the asset generator and generation clients
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Input text is below the generation threshold
    #[error("Content too short: {found} characters, need at least {required}")]
    ContentTooShort { found: usize, required: usize },

    /// Transport or service failure
    #[error("Generation service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Response could not be parsed or failed validation
    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),
}

/// Errors raised while building a [`Repurposer`](crate::Repurposer)
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No API key and no injected generation client
    #[error("Missing API key: set one or inject a generation client")]
    MissingApiKey,

    /// Temperature out of range
    #[error("Invalid temperature {0}: must be between 0.0 and 2.0")]
    InvalidTemperature(f32),

    /// HTTP client construction failed
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),
}

/// Errors surfaced by the end-to-end pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Retrieving the page failed
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Extraction found less than the minimum amount of text
    #[error("Website blocked reading or no content found. Please paste text instead.")]
    InsufficientContent,

    /// Text is too short to send to the model
    #[error("Content too short to repurpose.")]
    ContentTooShort,

    /// Generation transport failed
    #[error("Generation service unavailable. Please try again later.")]
    ServiceUnavailable,

    /// Generation output was unusable
    #[error("The generation service returned an invalid response.")]
    MalformedResponse,
}

impl From<ExtractionError> for PipelineError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::InsufficientContent { .. } => PipelineError::InsufficientContent,
        }
    }
}

impl From<GenerationError> for PipelineError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::ContentTooShort { .. } => PipelineError::ContentTooShort,
            GenerationError::ServiceUnavailable(_) => PipelineError::ServiceUnavailable,
            GenerationError::MalformedResponse(_) => PipelineError::MalformedResponse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FetchError::MissingUrl.to_string(),
            "Missing required parameter: url"
        );
        assert_eq!(
            FetchError::InvalidUrlScheme.to_string(),
            "Invalid URL: must start with http:// or https://"
        );
        assert_eq!(FetchError::Status(502).to_string(), "Upstream returned HTTP 502");
        assert_eq!(
            PipelineError::ContentTooShort.to_string(),
            "Content too short to repurpose."
        );
        assert!(PipelineError::InsufficientContent
            .to_string()
            .contains("paste text"));
    }

    #[test]
    fn test_pipeline_error_conversions() {
        let err: PipelineError = ExtractionError::InsufficientContent {
            found: 3,
            required: 100,
        }
        .into();
        assert!(matches!(err, PipelineError::InsufficientContent));

        let err: PipelineError = GenerationError::ServiceUnavailable("boom".into()).into();
        assert!(matches!(err, PipelineError::ServiceUnavailable));

        let err: PipelineError = GenerationError::MalformedResponse("bad json".into()).into();
        assert!(matches!(err, PipelineError::MalformedResponse));
        // response details stay out of the caller-facing message
        assert!(!err.to_string().contains("bad json"));

        let err: PipelineError = FetchError::Status(403).into();
        assert!(err.to_string().contains("403"));
    }
}
