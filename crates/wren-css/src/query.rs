//! The query surface: `querySelector`, `querySelectorAll`, `matches` and
//! `closest` over a [`DomTree`].
//!
//! Each function compiles its selector list first and reports compile
//! failures under its own [`Operation`] name.

use wren_dom::{DomTree, NodeId};

use crate::error::{Operation, SelectorError};
use crate::selector::{SelectorList, compile_list};

fn compile_for(operation: Operation, selector: &str) -> Result<SelectorList, SelectorError> {
    compile_list(selector).map_err(|err| err.during(operation))
}

/// [§ 4.2.6](https://dom.spec.whatwg.org/#dom-parentnode-queryselectorall)
///
/// Element descendants of `root` (excluding `root` itself) that match
/// `selector`, in document order.
///
/// # Errors
///
/// Returns [`SelectorError::InvalidSelector`] if `selector` does not compile.
pub fn query_selector_all(
    tree: &DomTree,
    root: NodeId,
    selector: &str,
) -> Result<Vec<NodeId>, SelectorError> {
    let list = compile_for(Operation::QuerySelectorAll, selector)?;
    Ok(list.query_all(tree, root))
}

/// [§ 4.2.6](https://dom.spec.whatwg.org/#dom-parentnode-queryselector)
///
/// The first element descendant of `root` that matches `selector`.
///
/// # Errors
///
/// Returns [`SelectorError::InvalidSelector`] if `selector` does not compile.
pub fn query_selector(
    tree: &DomTree,
    root: NodeId,
    selector: &str,
) -> Result<Option<NodeId>, SelectorError> {
    let list = compile_for(Operation::QuerySelector, selector)?;
    Ok(list.query_first(tree, root))
}

/// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-matches)
///
/// True if `element` matches `selector`.
///
/// # Errors
///
/// Returns [`SelectorError::InvalidSelector`] if `selector` does not compile.
pub fn matches(tree: &DomTree, element: NodeId, selector: &str) -> Result<bool, SelectorError> {
    let list = compile_for(Operation::Matches, selector)?;
    Ok(list.matches(tree, element, Some(element)))
}

/// [§ 4.9](https://dom.spec.whatwg.org/#dom-element-closest)
///
/// "The closest(selectors) method steps are... For each element in this's
/// inclusive ancestors that are elements, in reverse tree order: If match a
/// selector against an element, using s, element, and scoping root this,
/// returns success, return element."
///
/// Each candidate is tested with itself as scope.
///
/// # Errors
///
/// Returns [`SelectorError::InvalidSelector`] if `selector` does not compile.
pub fn closest(
    tree: &DomTree,
    element: NodeId,
    selector: &str,
) -> Result<Option<NodeId>, SelectorError> {
    let list = compile_for(Operation::Closest, selector)?;
    Ok(list.closest(tree, element))
}

impl SelectorList {
    /// All matching element descendants of `root`, in document order.
    #[must_use]
    pub fn query_all(&self, tree: &DomTree, root: NodeId) -> Vec<NodeId> {
        tree.descendants(root)
            .filter(|&node| self.matches(tree, node, None))
            .collect()
    }

    /// The first matching element descendant of `root`.
    #[must_use]
    pub fn query_first(&self, tree: &DomTree, root: NodeId) -> Option<NodeId> {
        tree.descendants(root)
            .find(|&node| self.matches(tree, node, None))
    }

    /// The nearest inclusive ancestor of `element` that matches.
    #[must_use]
    pub fn closest(&self, tree: &DomTree, element: NodeId) -> Option<NodeId> {
        std::iter::once(element)
            .chain(tree.ancestors(element))
            .filter(|&node| tree.is_element(node))
            .find(|&node| self.matches(tree, node, Some(node)))
    }
}
