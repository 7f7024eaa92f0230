//! Arena-based node tree for the wren parser.
//!
//! This crate provides the tree the parser builds into and the selector
//! engine reads from. Node relationships follow the
//! [DOM Living Standard](https://dom.spec.whatwg.org/) tree concepts, but only
//! the structural subset needed for parsing and querying is modelled.
//!
//! # Design
//!
//! All nodes live in a single `Vec` owned by [`DomTree`] and are addressed by
//! [`NodeId`] indices. Each node stores its parent and ordered children;
//! sibling relationships and derived values such as
//! [`DomTree::text_content`] are computed on demand from those two fields.

mod attributes;
pub mod serialize;
mod sink;

pub use attributes::Attributes;
pub use sink::{NodeSink, SinkError, SinkOperation};

use std::convert::Infallible;

/// [§ 2.9 Namespaces](https://infra.spec.whatwg.org/#namespaces)
///
/// "The HTML namespace is "http://www.w3.org/1999/xhtml"."
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// [§ 2.9 Namespaces](https://infra.spec.whatwg.org/#namespaces)
///
/// "The SVG namespace is "http://www.w3.org/2000/svg"."
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
///
/// `keygen` and `param` are obsolete but still treated as void.
pub const VOID_ELEMENTS: [&str; 15] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Returns true if `name` (any ASCII case) is a void element.
#[must_use]
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(name))
}

/// A type-safe index into the node tree.
///
/// `NodeId` provides O(1) access to any node without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root fragment is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// A single node in the arena.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is; fixed at construction.
    pub kind: NodeKind,

    /// [§ 4.2.1](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.2.1](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "...and has children, which is an ordered set of objects."
    pub children: Vec<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// The node kinds the parser can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// [§ 4.7 Interface DocumentFragment](https://dom.spec.whatwg.org/#interface-documentfragment)
    ///
    /// Root container. Appending a fragment moves its children instead.
    Fragment,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.11 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.14 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace, namespace prefix, local name..."
///
/// Namespace prefixes are not modelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// The element's local name, folded to ASCII lowercase.
    pub local_name: String,
    /// The element's namespace URI.
    pub namespace_uri: String,
    /// "An element has an associated attribute list"
    pub attrs: Attributes,
}

impl ElementData {
    /// Create element data with a lowercased local name and no attributes.
    #[must_use]
    pub fn new(namespace_uri: &str, local_name: &str) -> Self {
        Self {
            local_name: local_name.to_ascii_lowercase(),
            namespace_uri: namespace_uri.to_string(),
            attrs: Attributes::new(),
        }
    }

    /// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-tagname)
    ///
    /// "If this is in the HTML namespace and its node document is an HTML
    /// document, then set qualifiedName to qualifiedName in ASCII uppercase."
    #[must_use]
    pub fn tag_name(&self) -> String {
        if self.namespace_uri == HTML_NAMESPACE {
            self.local_name.to_ascii_uppercase()
        } else {
            self.local_name.clone()
        }
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id")
    }

    /// Returns the class names from the class attribute, in source order.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens..."
    #[must_use]
    pub fn classes(&self) -> Vec<&str> {
        self.attrs
            .get("class")
            .map(|list| list.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Arena-based node tree.
///
/// [§ 4.2 Node tree](https://dom.spec.whatwg.org/#node-trees)
///
/// A fresh tree holds only the root fragment at [`NodeId::ROOT`]. Nodes are
/// created detached and attached with [`DomTree::append_child`] or
/// [`DomTree::insert_before`]. Detached nodes remain in the arena.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree with just the root fragment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Fragment,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Get the root fragment ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes in the arena, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root fragment exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    // ===== Creation =====

    /// [§ 4.5](https://dom.spec.whatwg.org/#dom-document-createelementns)
    ///
    /// Create a detached element. The local name is folded to lowercase.
    pub fn create_element_ns(&mut self, namespace_uri: &str, local_name: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(namespace_uri, local_name)))
    }

    /// Create a detached text node holding `data` verbatim.
    pub fn create_text_node(&mut self, data: &str) -> NodeId {
        self.alloc(NodeKind::Text(data.to_string()))
    }

    /// Create a detached comment holding `data` verbatim.
    pub fn create_comment(&mut self, data: &str) -> NodeId {
        self.alloc(NodeKind::Comment(data.to_string()))
    }

    /// Create a detached, empty fragment.
    pub fn create_document_fragment(&mut self) -> NodeId {
        self.alloc(NodeKind::Fragment)
    }

    // ===== Mutation =====

    /// [§ 4.2.3 Mutation algorithms](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// If `child` is a fragment its children are moved instead, leaving it
    /// empty. A child that already has a parent is removed from it first.
    /// Insertions that would create a cycle, or that target a text or
    /// comment node, are ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// [§ 4.2.3](https://dom.spec.whatwg.org/#concept-node-pre-insert)
    ///
    /// Insert `child` into `parent` before `reference`, or at the end when
    /// `reference` is `None` or not a child of `parent`. Same rules as
    /// [`DomTree::append_child`].
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if !self.can_insert(parent, child) {
            return;
        }

        let moved = if self.is_fragment(child) {
            let children = self.nodes[child.0].children.drain(..).collect::<Vec<_>>();
            for &grandchild in &children {
                self.nodes[grandchild.0].parent = None;
            }
            children
        } else {
            self.detach(child);
            vec![child]
        };

        let siblings = &self.nodes[parent.0].children;
        let index = reference
            .and_then(|r| siblings.iter().position(|&id| id == r))
            .unwrap_or(siblings.len());

        for &id in &moved {
            self.nodes[id.0].parent = Some(parent);
        }
        let _ = self.nodes[parent.0].children.splice(index..index, moved);
    }

    /// [§ 4.2.3](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Remove `child` from `parent`. Does nothing if `child` is not a child of
    /// `parent`. The removed node stays in the arena, detached.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
        }
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Parent must hold children, child must not be the root and must not be
    /// an inclusive ancestor of parent.
    /// A childless node cannot be an ancestor of `parent`, so the ancestor walk
    /// is skipped for it.
    fn can_insert(&self, parent: NodeId, child: NodeId) -> bool {
        let (Some(parent_node), Some(child_node)) = (self.get(parent), self.get(child)) else {
            return false;
        };
        if !matches!(parent_node.kind, NodeKind::Fragment | NodeKind::Element(_)) {
            return false;
        }
        if child == NodeId::ROOT || child == parent {
            return false;
        }
        child_node.children.is_empty() || !self.ancestors(parent).any(|a| a == child)
    }

    /// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-setattribute)
    ///
    /// Set an attribute on an element. The name is folded to lowercase; an
    /// existing attribute keeps its position and takes the new value.
    /// Does nothing for non-elements.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(data) = self.as_element_mut(id) {
            data.attrs.set(name, value);
        }
    }

    /// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-removeattribute)
    ///
    /// Remove an attribute by name (any ASCII case). Returns the old value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.as_element_mut(id).and_then(|data| data.attrs.remove(name))
    }

    // ===== Read contract =====

    /// Node kind, if `id` is in the arena.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|n| &n.kind)
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        match self.kind(id) {
            Some(NodeKind::Element(data)) => Some(data),
            _ => None,
        }
    }

    fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            Some(NodeKind::Element(data)) => Some(data),
            _ => None,
        }
    }

    /// Get character data if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Text(data)) => Some(data),
            _ => None,
        }
    }

    /// Returns true if the node is an element.
    #[must_use]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.as_element(id).is_some()
    }

    /// Returns true if the node is a fragment.
    #[must_use]
    pub fn is_fragment(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Fragment))
    }

    /// Qualified tag name: uppercase for HTML-namespace elements.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<String> {
        self.as_element(id).map(ElementData::tag_name)
    }

    /// Lowercase local name.
    #[must_use]
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|e| e.local_name.as_str())
    }

    /// Namespace URI of an element.
    #[must_use]
    pub fn namespace_uri(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|e| e.namespace_uri.as_str())
    }

    /// Returns true if the element carries attribute `name` (any ASCII case).
    #[must_use]
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.as_element(id).is_some_and(|e| e.attrs.contains(name))
    }

    /// Value of attribute `name` (any ASCII case).
    #[must_use]
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.as_element(id).and_then(|e| e.attrs.get(name))
    }

    /// All attributes of an element, in insertion order.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> Option<&Attributes> {
        self.as_element(id).map(|e| &e.attrs)
    }

    /// All children (elements, text and comments).
    #[must_use]
    pub fn child_nodes(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// [§ 4.2.6](https://dom.spec.whatwg.org/#dom-parentnode-children)
    ///
    /// "The children getter steps are to return an HTMLCollection collection
    /// rooted at this matching only element children."
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.element_children(id).collect()
    }

    /// Iterate over element children without allocating.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.child_nodes(id)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Parent if it is an element.
    #[must_use]
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    /// [§ 4.2.7](https://dom.spec.whatwg.org/#dom-nondocumenttypechildnode-previouselementsibling)
    ///
    /// "The previousElementSibling getter steps are to return the first
    /// preceding sibling of this that is an element; otherwise null."
    #[must_use]
    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.preceding_element_siblings(id).next()
    }

    /// [§ 4.2.7](https://dom.spec.whatwg.org/#dom-nondocumenttypechildnode-nextelementsibling)
    ///
    /// "The nextElementSibling getter steps are to return the first following
    /// sibling of this that is an element; otherwise null."
    #[must_use]
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.child_nodes(self.parent(id)?);
        let index = siblings.iter().position(|&s| s == id)?;
        siblings[index + 1..]
            .iter()
            .copied()
            .find(|&s| self.is_element(s))
    }

    /// Element siblings before `id`, nearest first.
    pub fn preceding_element_siblings(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let siblings = self.parent(id).map_or(&[][..], |p| self.child_nodes(p));
        let index = siblings.iter().position(|&s| s == id).unwrap_or(0);
        siblings[..index]
            .iter()
            .rev()
            .copied()
            .filter(|&s| self.is_element(s))
    }

    /// First element child.
    #[must_use]
    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next()
    }

    /// Last element child.
    #[must_use]
    pub fn last_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.child_nodes(id)
            .iter()
            .rev()
            .copied()
            .find(|&c| self.is_element(c))
    }

    /// [§ 6.8.1 Editing APIs](https://html.spec.whatwg.org/multipage/interaction.html#attr-contenteditable)
    ///
    /// An element is editable when the nearest inclusive ancestor carrying a
    /// `contenteditable` attribute has any value other than "false" (ASCII
    /// case-insensitive). No such ancestor means not editable.
    #[must_use]
    pub fn is_content_editable(&self, id: NodeId) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find_map(|n| self.get_attribute(n, "contenteditable"))
            .is_some_and(|value| !value.eq_ignore_ascii_case("false"))
    }

    /// [§ 4.4](https://dom.spec.whatwg.org/#dom-node-textcontent)
    ///
    /// Text and comment nodes return their data. Elements and fragments
    /// return the concatenation of all descendant text nodes in tree order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        match self.kind(id) {
            None => String::new(),
            Some(NodeKind::Text(data) | NodeKind::Comment(data)) => data.clone(),
            Some(NodeKind::Element(_) | NodeKind::Fragment) => self
                .descendants(id)
                .filter_map(|d| self.as_text(d))
                .collect(),
        }
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over all descendants of a node (excluding the node) in tree
    /// order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.child_nodes(id).iter().rev().copied().collect(),
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeSink for DomTree {
    type Handle = NodeId;
    type Error = Infallible;

    fn create_document_fragment(&mut self) -> Result<NodeId, Infallible> {
        Ok(Self::create_document_fragment(self))
    }

    fn create_element_ns(
        &mut self,
        namespace_uri: &str,
        local_name: &str,
    ) -> Result<NodeId, Infallible> {
        Ok(Self::create_element_ns(self, namespace_uri, local_name))
    }

    fn create_text_node(&mut self, data: &str) -> Result<NodeId, Infallible> {
        Ok(Self::create_text_node(self, data))
    }

    fn create_comment(&mut self, data: &str) -> Result<NodeId, Infallible> {
        Ok(Self::create_comment(self, data))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), Infallible> {
        Self::append_child(self, parent, child);
        Ok(())
    }

    fn set_attribute(
        &mut self,
        element: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), Infallible> {
        Self::set_attribute(self, element, name, value);
        Ok(())
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node, driven by an explicit
/// stack.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.child_nodes(id).iter().rev().copied());
        Some(id)
    }
}
