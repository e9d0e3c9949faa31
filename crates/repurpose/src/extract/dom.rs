//! Document tree capability used by the extractor
//!
//! The extraction algorithm only talks to [`DocumentTree`]. [`HtmlTree`]
//! implements it on top of `scraper` (html5ever parsing into an `ego_tree`).

use ego_tree::iter::Edge;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;

/// Elements whose contents are never rendered
const NON_RENDERED: &[&str] = &["head", "title", "template", "script", "style", "noscript"];

/// Elements that break lines in rendered text
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "details",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

/// Minimal DOM query and mutation interface
///
/// Patterns are CSS selectors. An invalid pattern matches nothing.
pub trait DocumentTree {
    /// Node handle, valid for the lifetime of the tree
    type Node: Copy;

    /// All elements matching `pattern`, in document order
    fn find_all(&self, pattern: &str) -> Vec<Self::Node>;

    /// Descendants of `scope` matching `pattern`, in document order
    fn find_within(&self, scope: Self::Node, pattern: &str) -> Vec<Self::Node>;

    /// Detach `node` and its subtree from the document
    fn remove(&mut self, node: Self::Node);

    /// Rendered text of `node`, with block boundaries as newlines
    fn visible_text(&self, node: Self::Node) -> String;

    /// The document body, if any
    fn body(&self) -> Option<Self::Node>;
}

/// [`DocumentTree`] backed by a parsed `scraper::Html` document
pub struct HtmlTree {
    html: Html,
}

impl HtmlTree {
    /// Parse a full HTML document. Never fails: malformed markup yields a
    /// best-effort tree.
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    fn element(&self, node: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(node).and_then(ElementRef::wrap)
    }
}

fn selector(pattern: &str) -> Option<Selector> {
    match Selector::parse(pattern) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(pattern, error = %e, "Ignoring invalid selector");
            None
        }
    }
}

impl DocumentTree for HtmlTree {
    type Node = NodeId;

    fn find_all(&self, pattern: &str) -> Vec<NodeId> {
        let Some(sel) = selector(pattern) else {
            return Vec::new();
        };
        self.html.select(&sel).map(|el| el.id()).collect()
    }

    fn find_within(&self, scope: NodeId, pattern: &str) -> Vec<NodeId> {
        let (Some(sel), Some(scope)) = (selector(pattern), self.element(scope)) else {
            return Vec::new();
        };
        scope.select(&sel).map(|el| el.id()).collect()
    }

    fn remove(&mut self, node: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(node) {
            node.detach();
        }
    }

    fn visible_text(&self, node: NodeId) -> String {
        let Some(root) = self.html.tree.get(node) else {
            return String::new();
        };

        let mut out = String::new();
        // depth inside a hidden subtree, counted in elements
        let mut hidden_depth = 0usize;

        for edge in root.traverse() {
            match edge {
                Edge::Open(node) => {
                    if hidden_depth > 0 {
                        if node.value().is_element() {
                            hidden_depth += 1;
                        }
                        continue;
                    }
                    match node.value() {
                        Node::Text(text) => out.push_str(text),
                        Node::Element(el) => {
                            let name = el.name();
                            if NON_RENDERED.contains(&name) || el.attr("hidden").is_some() {
                                hidden_depth = 1;
                            } else if name == "br" || BLOCK_ELEMENTS.contains(&name) {
                                out.push('\n');
                            }
                        }
                        _ => {}
                    }
                }
                Edge::Close(node) => {
                    if hidden_depth > 0 {
                        if node.value().is_element() {
                            hidden_depth -= 1;
                        }
                        continue;
                    }
                    if let Node::Element(el) = node.value() {
                        if BLOCK_ELEMENTS.contains(&el.name()) {
                            out.push('\n');
                        }
                    }
                }
            }
        }

        out
    }

    fn body(&self) -> Option<NodeId> {
        self.find_all("body").into_iter().next()
    }
}
