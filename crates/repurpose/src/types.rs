//! Core types for Repurpose

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Number of LinkedIn variants in a valid bundle
pub const LINKEDIN_POST_COUNT: usize = 3;

/// Number of short-form hook variants in a valid bundle
pub const TWITTER_HOOK_COUNT: usize = 3;

/// Default creativity for generation
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

/// Default response format requested from the model
pub const DEFAULT_RESPONSE_MIME_TYPE: &str = "application/json";

/// Where a [`RawDocument`] came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// HTML fetched from this URL
    Url(String),
    /// Text typed or pasted by the user; no extraction needed
    UserText,
}

/// Input document for one request
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// HTML markup, or plain text for [`Source::UserText`]
    pub body: String,
    /// Origin of the body
    pub source: Source,
}

impl RawDocument {
    /// HTML retrieved from `url`
    pub fn html(body: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            source: Source::Url(url.into()),
        }
    }

    /// Plain text supplied by the user
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            body: text.into(),
            source: Source::UserText,
        }
    }

    /// True when the body needs HTML extraction
    pub fn needs_extraction(&self) -> bool {
        matches!(self.source, Source::Url(_))
    }
}

/// Caller input for the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum RepurposeInput {
    /// Fetch and extract an article
    Url {
        /// Article URL (http:// or https://)
        url: String,
    },
    /// Use pasted text directly
    Text {
        /// Article text
        text: String,
    },
}

impl RepurposeInput {
    /// URL mode
    pub fn url(url: impl Into<String>) -> Self {
        RepurposeInput::Url { url: url.into() }
    }

    /// Text mode
    pub fn text(text: impl Into<String>) -> Self {
        RepurposeInput::Text { text: text.into() }
    }
}

/// Knobs forwarded to the generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature
    pub temperature: f32,
    /// Expected response MIME type
    pub response_mime_type: String,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            response_mime_type: DEFAULT_RESPONSE_MIME_TYPE.to_string(),
        }
    }
}

impl GenerationParams {
    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A single request handed to a [`GenerationClient`](crate::GenerationClient)
#[derive(Debug, Clone)]
pub struct AssetRequest {
    /// Fully assembled prompt
    pub prompt: String,
    /// Generation parameters
    pub params: GenerationParams,
}

/// One LinkedIn post variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LinkedInPost {
    /// Angle of the post (contrarian, educational, storytelling, ...)
    pub angle: String,
    /// Post body
    pub content: String,
}

/// One short-form hook variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TwitterHook {
    /// Framing of the hook (how-to, warning, listicle, ...)
    pub framing: String,
    /// Hook body
    pub content: String,
}

/// Video strategy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VideoScript {
    /// Video title
    pub title: String,
    /// Two sentence hook
    pub description: String,
}

/// Wire shape of the model response, before cardinality checks
#[derive(Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct WireBundle {
    linkedin_posts: Vec<LinkedInPost>,
    twitter_hooks: Vec<TwitterHook>,
    meta_description: String,
    video_script: VideoScript,
}

/// The complete set of generated assets for one document
///
/// Deserializing validates cardinalities, so a value of this type always
/// holds exactly [`LINKEDIN_POST_COUNT`] posts and [`TWITTER_HOOK_COUNT`]
/// hooks. Unknown fields in the input are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", try_from = "WireBundle")]
pub struct AssetBundle {
    /// LinkedIn variants, exactly three
    pub linkedin_posts: Vec<LinkedInPost>,
    /// Short-form hook variants, exactly three
    pub twitter_hooks: Vec<TwitterHook>,
    /// SEO meta description
    pub meta_description: String,
    /// YouTube strategy
    pub video_script: VideoScript,
}

impl TryFrom<WireBundle> for AssetBundle {
    type Error = String;

    fn try_from(wire: WireBundle) -> Result<Self, Self::Error> {
        if wire.linkedin_posts.len() != LINKEDIN_POST_COUNT {
            return Err(format!(
                "expected {} linkedinPosts, got {}",
                LINKEDIN_POST_COUNT,
                wire.linkedin_posts.len()
            ));
        }
        if wire.twitter_hooks.len() != TWITTER_HOOK_COUNT {
            return Err(format!(
                "expected {} twitterHooks, got {}",
                TWITTER_HOOK_COUNT,
                wire.twitter_hooks.len()
            ));
        }
        Ok(Self {
            linkedin_posts: wire.linkedin_posts,
            twitter_hooks: wire.twitter_hooks,
            meta_description: wire.meta_description,
            video_script: wire.video_script,
        })
    }
}

impl AssetBundle {
    /// JSON schema of the bundle
    pub fn json_schema() -> serde_json::Value {
        let schema = schemars::schema_for!(AssetBundle);
        serde_json::to_value(schema).unwrap_or_default()
    }
}
