//! High-level API for parsing markup and querying it with CSS selectors.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document** - a parsed tree with document-level queries
//! - **Element references** - borrowed views with the DOM element methods
//!   (`matches`, `closest`, `querySelector`, ...)
//! - **Sink parsing** - [`parse_into`] for building into a custom
//!   [`NodeSink`](dom::NodeSink)
//!
//! The lower-level crates are re-exported as [`dom`], [`html`], [`css`] and
//! [`common`].
//!
//! ```
//! let doc = wren::Document::parse(r#"<ul><li>one</li><li class="hot">two</li></ul>"#);
//! let hot = doc.query_selector("li.hot").unwrap().unwrap();
//! assert_eq!(hot.text(), "two");
//! assert_eq!(hot.closest("ul").unwrap().unwrap().tag_name(), "UL");
//! ```

mod element;

pub use element::ElementRef;

pub use wren_common as common;
pub use wren_css as css;
pub use wren_dom as dom;
pub use wren_html as html;

use thiserror::Error;
use wren_common::warning::clear_warnings;
use wren_css::SelectorError;
use wren_dom::serialize::inner_html;
use wren_dom::{DomTree, NodeId, NodeSink, SinkError};

/// Errors surfaced by the high-level API.
#[derive(Debug, Error)]
pub enum Error {
    /// A selector failed to compile.
    #[error(transparent)]
    Selector(#[from] SelectorError),

    /// A custom sink refused an operation during parsing.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Result alias for this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// A parsed document.
///
/// Owns the [`DomTree`]; top-level nodes are children of the root fragment.
#[derive(Debug, Clone)]
pub struct Document {
    tree: DomTree,
}

impl Document {
    /// Parse `markup`. Never fails.
    ///
    /// Recovery warnings are deduplicated per document: the warning set is
    /// cleared before parsing.
    #[must_use]
    pub fn parse(markup: &str) -> Self {
        clear_warnings();
        Self {
            tree: wren_html::parse(markup),
        }
    }

    /// Wrap an existing tree.
    #[must_use]
    pub const fn from_tree(tree: DomTree) -> Self {
        Self { tree }
    }

    /// The underlying tree.
    #[must_use]
    pub const fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Give up the document and keep the tree.
    #[must_use]
    pub fn into_tree(self) -> DomTree {
        self.tree
    }

    /// The root fragment.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// A view of `id` if it is an element.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        ElementRef::new(&self.tree, id)
    }

    /// Top-level elements, in order.
    #[must_use]
    pub fn children(&self) -> Vec<ElementRef<'_>> {
        self.refs(self.tree.children(self.root()))
    }

    /// The first element in the document matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selector`] if `selector` does not compile.
    pub fn query_selector(&self, selector: &str) -> Result<Option<ElementRef<'_>>> {
        let found = wren_css::query_selector(&self.tree, self.root(), selector)?;
        Ok(found.and_then(|id| self.element(id)))
    }

    /// Every element in the document matching `selector`, in document
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selector`] if `selector` does not compile.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<ElementRef<'_>>> {
        let found = wren_css::query_selector_all(&self.tree, self.root(), selector)?;
        Ok(self.refs(found))
    }

    /// Serialize the whole document back to markup.
    #[must_use]
    pub fn to_markup(&self) -> String {
        inner_html(&self.tree, self.root())
    }

    fn refs(&self, ids: Vec<NodeId>) -> Vec<ElementRef<'_>> {
        ids.into_iter().filter_map(|id| self.element(id)).collect()
    }
}

impl From<DomTree> for Document {
    fn from(tree: DomTree) -> Self {
        Self::from_tree(tree)
    }
}

/// Parse `markup` into a custom sink, returning the fragment that holds the
/// top-level nodes.
///
/// # Errors
///
/// Returns the sink's first refusal, converted into [`Error`].
pub fn parse_into<S>(markup: &str, sink: &mut S) -> Result<S::Handle>
where
    S: NodeSink,
    Error: From<S::Error>,
{
    Ok(wren_html::parse_into(markup, sink)?)
}
