//! Tree construction.
//!
//! The builder pulls tokens from the [`Tokenizer`] and writes nodes through a
//! [`NodeSink`]. It keeps a stack of open frames; new nodes always go to the
//! top frame. There is no implicit tag insertion and no auto-closing: an end
//! tag closes the top frame only when the names match, and frames still open
//! at the end of input stay where they are. Text after the last tag or
//! comment goes to the root container, not to whatever is still open.

use tracing::{debug, trace};
use wren_common::warning::warn_once;
use wren_dom::{HTML_NAMESPACE, NodeSink, SVG_NAMESPACE, is_void_element};

use crate::tokenizer::{Attribute, Token, Tokenizer};

/// Elements whose content is opaque character data.
const RAW_TEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Callback invoked once for every node the builder creates.
pub type Observer<'o, S> = dyn FnMut(&S, <S as NodeSink>::Handle) + 'o;

/// An open element (or the root container) receiving new children.
struct Frame<H> {
    /// Lowercase local name; empty for the root frame.
    tag_name: String,
    node: H,
    namespace_uri: &'static str,
}

/// Builds a node tree from markup through a [`NodeSink`].
///
/// # Example
/// ```
/// use wren_dom::{DomTree, NodeId};
/// use wren_html::TreeBuilder;
///
/// let mut tree = DomTree::new();
/// let mut seen = 0;
/// let mut count = |_: &DomTree, _: NodeId| seen += 1;
/// let fragment = TreeBuilder::new(&mut tree)
///     .with_observer(&mut count)
///     .build("<p>hi</p>");
/// assert!(fragment.is_ok());
/// assert_eq!(seen, 2);
/// ```
pub struct TreeBuilder<'s, 'o, S: NodeSink> {
    sink: &'s mut S,
    observer: Option<&'o mut Observer<'o, S>>,
    stack: Vec<Frame<S::Handle>>,
}

impl<'s, 'o, S: NodeSink> TreeBuilder<'s, 'o, S> {
    /// Create a builder writing into `sink`.
    pub fn new(sink: &'s mut S) -> Self {
        Self {
            sink,
            observer: None,
            stack: Vec::new(),
        }
    }

    /// Call `observer` after each node is created and appended.
    #[must_use]
    pub fn with_observer(mut self, observer: &'o mut Observer<'o, S>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Parse `markup` into a new fragment created through the sink.
    ///
    /// # Errors
    ///
    /// Returns the sink's error as soon as any sink operation fails.
    pub fn build(mut self, markup: &str) -> Result<S::Handle, S::Error> {
        let fragment = self.sink.create_document_fragment()?;
        self.run(markup, fragment)?;
        Ok(fragment)
    }

    /// Parse `markup` directly into an existing container node.
    ///
    /// # Errors
    ///
    /// Returns the sink's error as soon as any sink operation fails.
    pub fn build_into(mut self, markup: &str, container: S::Handle) -> Result<(), S::Error> {
        self.run(markup, container)
    }

    fn run(&mut self, markup: &str, root: S::Handle) -> Result<(), S::Error> {
        self.stack.clear();
        self.stack.push(Frame {
            tag_name: String::new(),
            node: root,
            namespace_uri: HTML_NAMESPACE,
        });

        let mut tokenizer = Tokenizer::new(markup);
        while let Some(token) = tokenizer.next_token() {
            trace!(?token, position = tokenizer.position(), "token");
            match token {
                Token::Text(data) => {
                    let node = self.sink.create_text_node(data)?;
                    if tokenizer.at_end() {
                        self.append(root, node)?;
                    } else {
                        self.insert(node)?;
                    }
                }
                Token::Comment(data) => {
                    let node = self.sink.create_comment(data)?;
                    self.insert(node)?;
                }
                Token::Declaration { name } => {
                    let _ = warn_once("HTML", &format!("dropped <!{name}> declaration"));
                }
                Token::EndTag { name } => self.close(name),
                Token::StartTag {
                    name,
                    self_closing,
                    attributes,
                } => self.open(&mut tokenizer, name, self_closing, &attributes)?,
            }
        }
        Ok(())
    }

    fn current(&self) -> &Frame<S::Handle> {
        // The root frame is pushed first and never popped.
        &self.stack[self.stack.len() - 1]
    }

    /// Append `node` to the current frame, then notify the observer.
    fn insert(&mut self, node: S::Handle) -> Result<(), S::Error> {
        let parent = self.current().node;
        self.append(parent, node)
    }

    fn append(&mut self, parent: S::Handle, node: S::Handle) -> Result<(), S::Error> {
        self.sink.append_child(parent, node)?;
        if let Some(observer) = self.observer.as_mut() {
            observer(&*self.sink, node);
        }
        Ok(())
    }

    fn open(
        &mut self,
        tokenizer: &mut Tokenizer<'_>,
        name: &str,
        self_closing: bool,
        attributes: &[Attribute<'_>],
    ) -> Result<(), S::Error> {
        let local_name = name.to_ascii_lowercase();
        let namespace_uri = match local_name.as_str() {
            "svg" => SVG_NAMESPACE,
            "html" => HTML_NAMESPACE,
            _ => self.current().namespace_uri,
        };

        let element = self.sink.create_element_ns(namespace_uri, &local_name)?;
        for attribute in attributes {
            self.sink.set_attribute(
                element,
                &attribute.name.to_ascii_lowercase(),
                attribute.value,
            )?;
        }
        self.insert(element)?;

        if self_closing || is_void_element(&local_name) {
            return Ok(());
        }

        if RAW_TEXT_ELEMENTS.contains(&local_name.as_str()) {
            let raw = tokenizer.consume_raw_text(&local_name);
            if !raw.terminated {
                let _ = warn_once("HTML", &format!("unterminated <{local_name}> element"));
            }
            if !raw.text.is_empty() {
                let text = self.sink.create_text_node(raw.text)?;
                self.append(element, text)?;
            }
            return Ok(());
        }

        self.stack.push(Frame {
            tag_name: local_name,
            node: element,
            namespace_uri,
        });
        Ok(())
    }

    fn close(&mut self, name: &str) {
        if self.stack.len() > 1 && self.current().tag_name.eq_ignore_ascii_case(name) {
            let _ = self.stack.pop();
        } else {
            debug!(
                name,
                open = %self.current().tag_name,
                "ignoring end tag that does not match the open element"
            );
        }
    }
}
