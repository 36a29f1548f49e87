//! Parser-independent view of a markup document.
//!
//! The extractor only needs a handful of capabilities from a parsed page:
//! tag names, attribute lookup, text, and parent/child navigation. Any
//! parser backend implementing [`MarkupDocument`] can be plugged in; the
//! crate ships one backed by `scraper` in [`html_document`].

pub mod charset;
pub mod html_document;

pub use charset::decode_markup;
pub use html_document::{DomNode, parse_document};

/// A node in a parsed markup tree: the document itself, an element, or a
/// text node.
pub trait MarkupNode: Clone {
    /// Lower-case tag name for elements, `None` otherwise.
    fn tag_name(&self) -> Option<&str>;

    fn attr(&self, name: &str) -> Option<&str>;

    /// Own content of a text node, `None` for every other node.
    fn text_content(&self) -> Option<&str>;

    fn children(&self) -> Vec<Self>;

    fn parent(&self) -> Option<Self>;

    fn is_element(&self, tag: &str) -> bool {
        self.tag_name().is_some_and(|name| name.eq_ignore_ascii_case(tag))
    }

    /// All nodes below this one in document order (pre-order), excluding
    /// the node itself.
    fn descendants(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut stack: Vec<Self> = self.children().into_iter().rev().collect();

        while let Some(node) = stack.pop() {
            stack.extend(node.children().into_iter().rev());
            out.push(node);
        }

        out
    }

    /// Concatenated text of this node and everything below it.
    fn text(&self) -> String {
        if let Some(content) = self.text_content() {
            return content.to_string();
        }

        self.descendants()
            .iter()
            .filter_map(|node| node.text_content().map(str::to_string))
            .collect()
    }
}

/// A parsed page that can hand out its root node and answer CSS queries.
pub trait MarkupDocument {
    type Node<'a>: MarkupNode
    where
        Self: 'a;

    /// The document node; every element is a descendant of it.
    fn root(&self) -> Self::Node<'_>;

    /// First element matching `selector` in document order. An invalid
    /// selector matches nothing.
    fn select_first(&self, selector: &str) -> Option<Self::Node<'_>>;
}
