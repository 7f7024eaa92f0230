//! Forgiving markup parser for wren.
//!
//! # Scope
//!
//! This crate implements a single-pass scanner and tree builder for
//! HTML-like markup:
//! - **Tokenizer**: comments, start and end tags, `<!...>` declarations,
//!   attribute spans, and raw text for `script` / `style`
//! - **Tree Builder**: a stack of open elements, namespace inheritance for
//!   `svg`, void and explicitly self-closed tags
//!
//! # Not Implemented
//!
//! - WHATWG tree construction (implicit tags, foster parenting, adoption
//!   agency)
//! - Character reference decoding
//! - Encoding sniffing
//!
//! Parsing never fails on malformed markup. The only errors come from a
//! custom [`NodeSink`] refusing an operation.

/// Tree construction on top of the tokenizer.
pub mod builder;
/// Markup tokenizer.
pub mod tokenizer;

pub use builder::{Observer, TreeBuilder};
pub use tokenizer::{Attribute, Token, Tokenizer};

use wren_dom::{DomTree, NodeId, NodeSink};

/// Parse `markup` into a new [`DomTree`]. Top-level nodes are children of
/// [`NodeId::ROOT`].
#[must_use]
pub fn parse(markup: &str) -> DomTree {
    parse_with_observer(markup, |_, _| {})
}

/// Parse `markup`, calling `observer` once per created node in creation
/// (pre-order) order, after the node has been attached.
pub fn parse_with_observer<F>(markup: &str, mut observer: F) -> DomTree
where
    F: FnMut(&DomTree, NodeId),
{
    let mut tree = DomTree::new();
    match TreeBuilder::new(&mut tree)
        .with_observer(&mut observer)
        .build_into(markup, NodeId::ROOT)
    {
        Ok(()) => {}
        Err(never) => match never {},
    }
    tree
}

/// Parse `markup` through a custom sink. Returns the fragment that holds the
/// top-level nodes.
///
/// # Errors
///
/// Returns the sink's error from the first operation it rejects.
pub fn parse_into<S: NodeSink>(markup: &str, sink: &mut S) -> Result<S::Handle, S::Error> {
    TreeBuilder::new(sink).build(markup)
}
