//! Repurpose - turn one article into a set of social assets
//!
//! This crate takes an article URL or pasted text, isolates the readable
//! main content, and asks a text-generation service for a fixed bundle of
//! assets: three LinkedIn posts, three short-form hooks, an SEO meta
//! description and a YouTube video concept.
//!
//! ## Pipeline
//!
//! - [`FetcherChain`] retrieves HTML through relays, then directly
//! - [`extract()`] removes page chrome and picks the main content region
//! - [`AssetGenerator`] prompts a [`GenerationClient`] and validates the reply
//!
//! [`Repurposer`] wires the three together; build one with
//! [`Repurposer::builder`].
//!
//! ```no_run
//! use repurpose::{RepurposeInput, Repurposer};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let repurposer = Repurposer::builder().api_key("my-key").build()?;
//! let bundle = repurposer
//!     .repurpose(RepurposeInput::url("https://example.com/post"))
//!     .await?;
//! println!("{}", bundle.meta_description);
//! # Ok(())
//! # }
//! ```

mod error;
pub mod extract;
pub mod fetchers;
pub mod generate;
mod pipeline;
mod platform;
mod types;

pub use error::{
    ConfigError, ExtractionError, FetchError, GenerationError, PipelineError,
};
pub use extract::{
    extract, extract_document, DocumentTree, ExtractedContent, HtmlTree, Selection,
    MAX_CONTENT_LENGTH, MIN_CONTENT_LENGTH,
};
pub use fetchers::{DirectFetcher, FetchOptions, Fetcher, FetcherChain, RelayFetcher};
pub use generate::{
    parse_bundle, AssetGenerator, GeminiClient, GeminiConfig, GenerationClient,
    MIN_GENERATION_LENGTH,
};
pub use pipeline::{PipelineStatus, Repurposer, RepurposerBuilder};
pub use platform::{AssetCard, DisplayDescriptor, Platform, PlatformError};
pub use types::{
    AssetBundle, AssetRequest, GenerationParams, LinkedInPost, RawDocument, RepurposeInput,
    Source, TwitterHook, VideoScript, DEFAULT_TEMPERATURE, LINKEDIN_POST_COUNT,
    TWITTER_HOOK_COUNT,
};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "Repurpose/1.0";

/// Short description of the tool
pub const TOOL_DESCRIPTION: &str = r#"Repurposes an article into social media assets.

- Accepts an article URL or pasted text
- Strips navigation, ads and other page chrome
- Returns 3 LinkedIn posts, 3 X/Twitter hooks, an SEO meta description and a YouTube concept"#;

/// Extended documentation (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# Repurpose

Turns one article into a bundle of social media assets.

## Input
- `mode`: "url" or "text"
- `url`: article URL (http:// or https://), for mode "url"
- `text`: article text, for mode "text"

## Output Fields
- `linkedinPosts`: exactly 3 `{angle, content}` objects
- `twitterHooks`: exactly 3 `{framing, content}` objects
- `metaDescription`: SEO meta description
- `videoScript`: `{title, description}` for a YouTube video

## Examples

### Repurpose a blog post
```json
{"mode": "url", "url": "https://example.com/blog/post"}
```

### Repurpose pasted text
```json
{"mode": "text", "text": "Most teams ship features nobody asked for..."}
```

## Error Handling
- Pages that block reading or have under 100 characters of content fail; paste the text instead
- Text under 50 characters is rejected before any service call
- Service failures and malformed replies are reported without retrying
"#;
