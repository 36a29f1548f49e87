use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::document::{MarkupDocument, MarkupNode, decode_markup};
use crate::error::ScrapeError;

/// Something that opens a tag, a comment, a doctype or a processing
/// instruction. A body without any of these is not markup.
static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[A-Za-z!/?]").unwrap());

/// Leading characters inspected when telling binary payloads apart.
const BINARY_SNIFF_CHARS: usize = 512;

/// Parse raw page bytes into an HTML document.
///
/// Parsing is lenient: broken or partial HTML, stray control bytes and
/// legacy charsets are all accepted. Only payloads that are clearly not
/// markup are rejected.
pub fn parse_document(bytes: &[u8]) -> Result<Html, ScrapeError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ScrapeError::EmptyBody);
    }

    let markup = decode_markup(bytes);
    if looks_binary(&markup) {
        return Err(ScrapeError::NotMarkup("binary payload"));
    }
    if !TAG_PATTERN.is_match(&markup) {
        return Err(ScrapeError::NotMarkup("no tags found"));
    }

    let document = Html::parse_document(&markup);
    debug!(
        parse_errors = document.errors.len(),
        "Parsed document of {} bytes",
        bytes.len()
    );

    Ok(document)
}

/// NUL bytes at the very start with no tag among them. A NUL later in an
/// otherwise ordinary page does not count.
fn looks_binary(markup: &str) -> bool {
    let end = markup
        .char_indices()
        .nth(BINARY_SNIFF_CHARS)
        .map_or(markup.len(), |(index, _)| index);
    let head = &markup[..end];

    head.contains('\0') && !TAG_PATTERN.is_match(head)
}

#[derive(Debug, Clone, Copy)]
enum NodeKind<'a> {
    Document,
    Element(ElementRef<'a>),
    Text {
        content: &'a str,
        // `None` when the text hangs directly off the document node
        parent: Option<ElementRef<'a>>,
    },
}

/// A node of a `scraper` document seen through [`MarkupNode`].
#[derive(Debug, Clone, Copy)]
pub struct DomNode<'a> {
    html: &'a Html,
    kind: NodeKind<'a>,
}

impl<'a> DomNode<'a> {
    fn document(html: &'a Html) -> Self {
        DomNode { html, kind: NodeKind::Document }
    }

    fn element(html: &'a Html, element: ElementRef<'a>) -> Self {
        DomNode { html, kind: NodeKind::Element(element) }
    }
}

impl MarkupNode for DomNode<'_> {
    fn tag_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(element) => Some(element.value().name()),
            _ => None,
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(element) => element.value().attr(name),
            _ => None,
        }
    }

    fn text_content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { content, .. } => Some(*content),
            _ => None,
        }
    }

    fn children(&self) -> Vec<Self> {
        let html = self.html;
        let (children, parent) = match &self.kind {
            NodeKind::Document => (html.tree.root().children(), None),
            NodeKind::Element(element) => (element.children(), Some(*element)),
            NodeKind::Text { .. } => return Vec::new(),
        };

        children
            .filter_map(|child| {
                if let Some(element) = ElementRef::wrap(child) {
                    return Some(DomNode::element(html, element));
                }
                // Comments, doctypes and processing instructions are skipped
                child.value().as_text().map(|text| DomNode {
                    html,
                    kind: NodeKind::Text { content: &**text, parent },
                })
            })
            .collect()
    }

    fn parent(&self) -> Option<Self> {
        let html = self.html;
        match &self.kind {
            NodeKind::Document => None,
            NodeKind::Element(element) => {
                let parent = element.parent()?;
                Some(match ElementRef::wrap(parent) {
                    Some(parent) => DomNode::element(html, parent),
                    None => DomNode::document(html),
                })
            }
            NodeKind::Text { parent, .. } => Some(match parent {
                Some(parent) => DomNode::element(html, *parent),
                None => DomNode::document(html),
            }),
        }
    }
}

impl MarkupDocument for Html {
    type Node<'a>
        = DomNode<'a>
    where
        Self: 'a;

    fn root(&self) -> DomNode<'_> {
        DomNode::document(self)
    }

    fn select_first(&self, selector: &str) -> Option<DomNode<'_>> {
        let parsed = match Selector::parse(selector) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Invalid selector '{}': {:?}", selector, e);
                return None;
            }
        };

        self.select(&parsed)
            .next()
            .map(|element| DomNode::element(self, element))
    }
}
