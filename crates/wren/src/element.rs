use core::fmt;

use wren_dom::serialize::{inner_html, outer_html};
use wren_dom::{DomTree, NodeId};

use crate::Result;

/// A borrowed view of one element in a [`DomTree`].
///
/// Only constructed for element nodes, so the accessors below never see a
/// text, comment or fragment node.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
}

impl<'a> ElementRef<'a> {
    /// A view of `id`, or `None` if it is not an element.
    #[must_use]
    pub fn new(tree: &'a DomTree, id: NodeId) -> Option<Self> {
        tree.is_element(id).then_some(Self { tree, id })
    }

    /// The node this view points at.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The tree this element lives in.
    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-tagname)
    ///
    /// Uppercase for HTML-namespace elements, as written otherwise.
    #[must_use]
    pub fn tag_name(&self) -> String {
        self.tree.tag_name(self.id).unwrap_or_default()
    }

    /// Lowercase local name.
    #[must_use]
    pub fn local_name(&self) -> &'a str {
        self.tree.local_name(self.id).unwrap_or_default()
    }

    /// Namespace URI.
    #[must_use]
    pub fn namespace_uri(&self) -> &'a str {
        self.tree.namespace_uri(self.id).unwrap_or_default()
    }

    /// Attribute value by (case-insensitive) name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.tree.get_attribute(self.id, name)
    }

    /// Attributes in source order.
    pub fn attrs(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.tree
            .attributes(self.id)
            .into_iter()
            .flat_map(|attrs| attrs.iter())
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-textcontent)
    #[must_use]
    pub fn text(&self) -> String {
        self.tree.text_content(self.id)
    }

    /// The element and its contents as markup.
    #[must_use]
    pub fn outer_html(&self) -> String {
        outer_html(self.tree, self.id)
    }

    /// The element's contents as markup.
    #[must_use]
    pub fn inner_html(&self) -> String {
        inner_html(self.tree, self.id)
    }

    /// Parent, if it is an element.
    #[must_use]
    pub fn parent_element(&self) -> Option<Self> {
        self.tree
            .parent_element(self.id)
            .and_then(|id| Self::new(self.tree, id))
    }

    /// Element children, in order.
    #[must_use]
    pub fn children(&self) -> Vec<Self> {
        self.tree
            .element_children(self.id)
            .filter_map(|id| Self::new(self.tree, id))
            .collect()
    }

    /// True if this element matches `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selector`](crate::Error::Selector) if `selector` does
    /// not compile.
    pub fn matches(&self, selector: &str) -> Result<bool> {
        Ok(wren_css::matches(self.tree, self.id, selector)?)
    }

    /// This element or its nearest ancestor matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selector`](crate::Error::Selector) if `selector` does
    /// not compile.
    pub fn closest(&self, selector: &str) -> Result<Option<Self>> {
        let found = wren_css::closest(self.tree, self.id, selector)?;
        Ok(found.and_then(|id| Self::new(self.tree, id)))
    }

    /// The first descendant matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selector`](crate::Error::Selector) if `selector` does
    /// not compile.
    pub fn query_selector(&self, selector: &str) -> Result<Option<Self>> {
        let found = wren_css::query_selector(self.tree, self.id, selector)?;
        Ok(found.and_then(|id| Self::new(self.tree, id)))
    }

    /// Every descendant matching `selector`, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selector`](crate::Error::Selector) if `selector` does
    /// not compile.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Self>> {
        let found = wren_css::query_selector_all(self.tree, self.id, selector)?;
        Ok(found
            .into_iter()
            .filter_map(|id| Self::new(self.tree, id))
            .collect())
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for ElementRef<'_> {}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("local_name", &self.local_name())
            .finish()
    }
}
