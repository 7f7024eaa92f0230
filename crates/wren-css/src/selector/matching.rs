//! Matching compiled selectors against a [`DomTree`].
//!
//! Matching is right to left: the key compound is tested on the candidate,
//! then each combinator moves to the parent, an ancestor, or a preceding
//! sibling and tests the next compound to the left. Combinators that allow
//! several candidates (descendant, subsequent-sibling) are explored with an
//! explicit work-list, and the chain matches if any path reaches the
//! leftmost compound.

use std::collections::HashSet;

use wren_dom::{DomTree, NodeId};

use super::{
    AttributeOperator, AttributeSelector, Combinator, CompiledSelector, Group, PseudoClass,
    SelectorList, SimpleSelector,
};

/// Form controls for which `readonly` decides `:read-only` / `:read-write`.
const TEXT_CONTROLS: [&str; 2] = ["input", "textarea"];

/// Form controls that honour `required`.
const REQUIRABLE_CONTROLS: [&str; 3] = ["input", "textarea", "select"];

impl CompiledSelector {
    /// [§ 4.1](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// Match against `node`. Descendant combinators stop before `scope`.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId, scope: Option<NodeId>) -> bool {
        match self.groups.len().checked_sub(1) {
            Some(last) => matches_chain(tree, node, &self.groups, last, scope),
            None => false,
        }
    }
}

impl SelectorList {
    /// True if any selector in the list matches `node`.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, node: NodeId, scope: Option<NodeId>) -> bool {
        self.selectors
            .iter()
            .any(|selector| selector.matches(tree, node, scope))
    }
}

/// Match the chain `groups[..=index]` with `groups[index]` anchored at
/// `node`.
///
/// `groups[index]` is normally a compound. If it is a combinator, the
/// combinator is applied from `node` first. Descendant combinators search
/// ancestors up to, but not including, `scope`.
#[must_use]
pub fn matches_chain(
    tree: &DomTree,
    node: NodeId,
    groups: &[Group],
    index: usize,
    scope: Option<NodeId>,
) -> bool {
    let mut work = vec![(node, index)];
    let mut seen = HashSet::new();

    while let Some((node, index)) = work.pop() {
        if !seen.insert((node, index)) {
            continue;
        }
        match groups.get(index) {
            None => {}
            Some(Group::Compound(compound)) => {
                if !matches_compound(tree, node, compound) {
                    continue;
                }
                match index.checked_sub(1) {
                    None => return true,
                    Some(previous) => work.push((node, previous)),
                }
            }
            Some(Group::Combinator(combinator)) => {
                let Some(target) = index.checked_sub(1) else {
                    continue;
                };
                match combinator {
                    Combinator::Child => {
                        if let Some(parent) = tree.parent_element(node) {
                            work.push((parent, target));
                        }
                    }
                    Combinator::NextSibling => {
                        if let Some(previous) = tree.prev_element_sibling(node) {
                            work.push((previous, target));
                        }
                    }
                    Combinator::SubsequentSibling => {
                        work.extend(
                            tree.preceding_element_siblings(node)
                                .map(|sibling| (sibling, target)),
                        );
                    }
                    Combinator::Descendant => {
                        work.extend(
                            tree.ancestors(node)
                                .take_while(|&ancestor| Some(ancestor) != scope)
                                .filter(|&ancestor| tree.is_element(ancestor))
                                .map(|ancestor| (ancestor, target)),
                        );
                    }
                }
            }
        }
    }
    false
}

/// True if `node` matches every simple selector in `compound`. Each simple
/// selector sees the ones before it, for the `-of-type` pseudo-classes.
#[must_use]
pub fn matches_compound(tree: &DomTree, node: NodeId, compound: &[SimpleSelector]) -> bool {
    compound
        .iter()
        .enumerate()
        .all(|(i, simple)| matches_simple(tree, node, simple, &compound[..i]))
}

/// Match one simple selector. `preceding` holds the simple selectors before
/// it in the same compound; it defines the "type" for `:first-of-type` and
/// friends (any element if empty). Non-elements never match.
#[must_use]
pub fn matches_simple(
    tree: &DomTree,
    node: NodeId,
    simple: &SimpleSelector,
    preceding: &[SimpleSelector],
) -> bool {
    let Some(element) = tree.as_element(node) else {
        return false;
    };
    match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(name) => element.local_name == *name,
        SimpleSelector::Attribute(attribute) => attribute_matches(tree, node, attribute),
        SimpleSelector::PseudoClass(pseudo) => pseudo_class_matches(tree, node, pseudo, preceding),
    }
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
fn attribute_matches(tree: &DomTree, node: NodeId, attribute: &AttributeSelector) -> bool {
    match attribute {
        AttributeSelector::Exists(name) => tree.has_attribute(node, name),
        AttributeSelector::Match {
            name,
            operator,
            value: expected,
            case_insensitive,
        } => {
            let Some(actual) = tree.get_attribute(node, name) else {
                return false;
            };
            if *case_insensitive {
                compare(
                    *operator,
                    &actual.to_ascii_lowercase(),
                    &expected.to_ascii_lowercase(),
                )
            } else {
                compare(*operator, actual, expected)
            }
        }
    }
}

fn compare(operator: AttributeOperator, actual: &str, expected: &str) -> bool {
    match operator {
        AttributeOperator::Equals => actual == expected,
        // "Represents an element with the att attribute whose value is a
        // whitespace-separated list of words, one of which is exactly "val"."
        AttributeOperator::Includes => actual.split_ascii_whitespace().any(|word| word == expected),
        // "...whose value either being exactly "val" or beginning with "val"
        // immediately followed by "-" (U+002D)."
        AttributeOperator::DashMatch => actual
            .strip_prefix(expected)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('-')),
        AttributeOperator::Prefix => actual.starts_with(expected),
        AttributeOperator::Suffix => actual.ends_with(expected),
        AttributeOperator::Substring => actual.contains(expected),
    }
}

/// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
fn pseudo_class_matches(
    tree: &DomTree,
    node: NodeId,
    pseudo: &PseudoClass,
    preceding: &[SimpleSelector],
) -> bool {
    let is = |name: &str| tree.local_name(node) == Some(name);
    let has = |attribute: &str| tree.has_attribute(node, attribute);

    match pseudo {
        PseudoClass::Root => tree.parent(node).is_some_and(|parent| tree.is_fragment(parent)),

        // Any child node counts, comments and whitespace text included.
        PseudoClass::Empty => tree.child_nodes(node).is_empty(),

        PseudoClass::Disabled => has("disabled"),
        PseudoClass::Enabled => !has("disabled"),
        PseudoClass::Checked => has("checked") || (is("option") && has("selected")),

        PseudoClass::ReadOnly => !is_read_write(tree, node),
        PseudoClass::ReadWrite => is_read_write(tree, node),

        PseudoClass::Optional => REQUIRABLE_CONTROLS.iter().any(|c| is(c)) && !has("required"),
        PseudoClass::Required => REQUIRABLE_CONTROLS.iter().any(|c| is(c)) && has("required"),

        PseudoClass::FirstChild => {
            parent_of(tree, node).and_then(|p| tree.first_element_child(p)) == Some(node)
        }
        PseudoClass::LastChild => {
            parent_of(tree, node).and_then(|p| tree.last_element_child(p)) == Some(node)
        }
        PseudoClass::OnlyChild => parent_of(tree, node)
            .is_some_and(|p| tree.element_children(p).eq(std::iter::once(node))),

        PseudoClass::FirstOfType => position_among(tree, node, preceding, false) == Some(1),
        PseudoClass::LastOfType => position_among(tree, node, preceding, true) == Some(1),
        PseudoClass::OnlyOfType => parent_of(tree, node).is_some_and(|p| {
            let mut of_type = of_type_siblings(tree, p, preceding);
            of_type.next() == Some(node) && of_type.next().is_none()
        }),

        PseudoClass::NthChild(nth) => {
            position_among(tree, node, &[], false).is_some_and(|p| nth.matches(p))
        }
        PseudoClass::NthLastChild(nth) => {
            position_among(tree, node, &[], true).is_some_and(|p| nth.matches(p))
        }
        PseudoClass::NthOfType(nth) => {
            position_among(tree, node, preceding, false).is_some_and(|p| nth.matches(p))
        }
        PseudoClass::NthLastOfType(nth) => {
            position_among(tree, node, preceding, true).is_some_and(|p| nth.matches(p))
        }

        // [§ 4.3](https://www.w3.org/TR/selectors-4/#negation)
        // "...represents an element that is not represented by its argument."
        PseudoClass::Not(list) => !list.matches(tree, node, Some(node)),
    }
}

/// [§ 13.2](https://www.w3.org/TR/selectors-4/#rw-pseudos)
///
/// Text controls are writable unless `readonly`; anything else only when
/// content-editable.
fn is_read_write(tree: &DomTree, node: NodeId) -> bool {
    match tree.local_name(node) {
        Some(name) if TEXT_CONTROLS.contains(&name) => !tree.has_attribute(node, "readonly"),
        _ => tree.is_content_editable(node),
    }
}

/// The parent, if it can hold positioned siblings.
fn parent_of(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    tree.parent(node)
        .filter(|&parent| tree.is_element(parent) || tree.is_fragment(parent))
}

/// Element children of `parent` that match every selector in `filter`.
fn of_type_siblings<'t>(
    tree: &'t DomTree,
    parent: NodeId,
    filter: &'t [SimpleSelector],
) -> impl Iterator<Item = NodeId> + 't {
    tree.element_children(parent)
        .filter(move |&sibling| matches_compound(tree, sibling, filter))
}

/// 1-based position of `node` among its element siblings that match
/// `filter` (all of them if `filter` is empty), counted from the end when
/// `from_end` is set.
fn position_among(
    tree: &DomTree,
    node: NodeId,
    filter: &[SimpleSelector],
    from_end: bool,
) -> Option<usize> {
    let parent = parent_of(tree, node)?;
    let siblings: Vec<NodeId> = of_type_siblings(tree, parent, filter).collect();
    let index = siblings.iter().position(|&sibling| sibling == node)?;
    Some(if from_end {
        siblings.len() - index
    } else {
        index + 1
    })
}
