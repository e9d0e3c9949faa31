//! Generation client capability

use crate::error::GenerationError;
use crate::types::AssetRequest;
use async_trait::async_trait;

/// Text generation backend
///
/// Implementations perform exactly one service call per `complete` and
/// return the raw text of the first candidate. Transport and HTTP failures
/// map to [`GenerationError::ServiceUnavailable`]; an undecodable envelope
/// or an empty candidate list maps to [`GenerationError::MalformedResponse`].
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Identifier for logging
    fn name(&self) -> &str;

    /// Send the request and return the generated text
    async fn complete(&self, request: &AssetRequest) -> Result<String, GenerationError>;
}
