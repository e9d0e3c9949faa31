//! Main-content extraction
//!
//! Turns arbitrary HTML into bounded, model-ready plain text:
//!
//! 1. parse (never fails)
//! 2. detach noise regions ([`NOISE_SELECTORS`])
//! 3. tier 1: first semantic container ([`SEMANTIC_SELECTORS`], in priority
//!    order) with more than [`SIGNIFICANT_TEXT_LENGTH`] characters
//! 4. tier 2: the `div` holding the most paragraphs, else `body`
//! 5. normalize whitespace
//! 6. reject below [`MIN_CONTENT_LENGTH`], cut at [`MAX_CONTENT_LENGTH`]
//!
//! Extraction is pure and synchronous.

mod dom;
mod normalize;

pub use dom::{DocumentTree, HtmlTree};
pub use normalize::{normalize, truncate_chars};

use crate::error::ExtractionError;
use crate::types::{RawDocument, Source};
use serde::Serialize;
use tracing::debug;

/// Regions removed before any scoring
pub const NOISE_SELECTORS: &[&str] = &[
    "script",
    "style",
    "nav",
    "footer",
    "header",
    "aside",
    ".sidebar",
    "#comments",
    ".ads",
    "noscript",
];

/// Tier-1 containers, highest confidence first
pub const SEMANTIC_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    ".post-content",
    ".article-body",
    "#content",
];

/// A tier-1 container must hold more than this many characters
pub const SIGNIFICANT_TEXT_LENGTH: usize = 500;

/// Shortest accepted extraction
pub const MIN_CONTENT_LENGTH: usize = 100;

/// Hard cap on extracted text
pub const MAX_CONTENT_LENGTH: usize = 6000;

/// Generic containers scanned by the density fallback
const DENSITY_CONTAINER: &str = "div";

/// Paragraph-like elements counted by the density fallback
const PARAGRAPH: &str = "p";

/// How the main content region was chosen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    /// Tier 1 match on this selector
    Semantic { selector: &'static str },
    /// Tier 2 `div` with this many paragraphs
    Density { paragraphs: usize },
    /// Whole body
    Body,
    /// User supplied text, not extracted
    UserText,
}

/// Normalized text of the main content region
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedContent {
    /// Normalized, capped text
    pub text: String,
    /// Strategy that picked the region
    pub selection: Selection,
    /// Length of `text` in characters
    pub char_count: usize,
    /// True when the cap cut the text
    pub truncated: bool,
}

/// A node under consideration as the main content container
#[derive(Debug, Clone, Copy)]
struct CandidateRegion<N> {
    node: N,
    paragraphs: usize,
}

/// Extract the main content of an HTML document
pub fn extract(html: &str) -> Result<ExtractedContent, ExtractionError> {
    let mut tree = HtmlTree::parse(html);
    extract_from_tree(&mut tree)
}

/// Extract from a [`RawDocument`]. User text skips HTML processing but is
/// still normalized and bounded.
pub fn extract_document(doc: &RawDocument) -> Result<ExtractedContent, ExtractionError> {
    match &doc.source {
        Source::Url(url) => {
            debug!(url = %url, bytes = doc.body.len(), "Extracting fetched document");
            extract(&doc.body)
        }
        Source::UserText => accept(&doc.body, Selection::UserText),
    }
}

/// Run the extraction algorithm over any [`DocumentTree`]
pub fn extract_from_tree<T: DocumentTree>(
    tree: &mut T,
) -> Result<ExtractedContent, ExtractionError> {
    remove_noise(tree);

    if let Some((node, selector)) = select_semantic(tree) {
        return accept(&tree.visible_text(node), Selection::Semantic { selector });
    }

    if let Some(candidate) = select_densest(tree) {
        debug!(paragraphs = candidate.paragraphs, "Using densest container");
        return accept(
            &tree.visible_text(candidate.node),
            Selection::Density {
                paragraphs: candidate.paragraphs,
            },
        );
    }

    match tree.body() {
        Some(body) => {
            debug!("Falling back to document body");
            accept(&tree.visible_text(body), Selection::Body)
        }
        None => Err(ExtractionError::InsufficientContent {
            found: 0,
            required: MIN_CONTENT_LENGTH,
        }),
    }
}

fn remove_noise<T: DocumentTree>(tree: &mut T) {
    for pattern in NOISE_SELECTORS {
        let nodes = tree.find_all(pattern);
        if !nodes.is_empty() {
            debug!(pattern, count = nodes.len(), "Removing noise");
        }
        for node in nodes {
            tree.remove(node);
        }
    }
}

/// First selector, in priority order, whose first match is significant
fn select_semantic<T: DocumentTree>(tree: &T) -> Option<(T::Node, &'static str)> {
    for &selector in SEMANTIC_SELECTORS {
        let Some(node) = tree.find_all(selector).into_iter().next() else {
            continue;
        };
        let len = tree.visible_text(node).trim().chars().count();
        if len > SIGNIFICANT_TEXT_LENGTH {
            debug!(selector, len, "Semantic container selected");
            return Some((node, selector));
        }
        debug!(selector, len, "Semantic container too short");
    }
    None
}

/// Container with the most paragraphs; earliest wins ties
fn select_densest<T: DocumentTree>(tree: &T) -> Option<CandidateRegion<T::Node>> {
    let mut best: Option<CandidateRegion<T::Node>> = None;
    for node in tree.find_all(DENSITY_CONTAINER) {
        let paragraphs = tree.find_within(node, PARAGRAPH).len();
        if paragraphs > best.map_or(0, |b| b.paragraphs) {
            best = Some(CandidateRegion { node, paragraphs });
        }
    }
    best
}

fn accept(raw: &str, selection: Selection) -> Result<ExtractedContent, ExtractionError> {
    let normalized = normalize(raw);
    let found = normalized.chars().count();
    if found < MIN_CONTENT_LENGTH {
        debug!(found, "Extracted text below minimum");
        return Err(ExtractionError::InsufficientContent {
            found,
            required: MIN_CONTENT_LENGTH,
        });
    }

    let (text, truncated) = truncate_chars(&normalized, MAX_CONTENT_LENGTH);
    let char_count = text.chars().count();
    Ok(ExtractedContent {
        text,
        selection,
        char_count,
        truncated,
    })
}
