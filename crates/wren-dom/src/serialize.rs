//! Serialization back to markup.
//!
//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
//!
//! A simplified fragment serializer: elements are written with their local
//! name and attributes in stored order, void elements get neither children
//! nor an end tag, and every other element gets an explicit end tag. Text and
//! comment data are written verbatim, since the parser never decodes
//! character references.

use crate::{DomTree, ElementData, NodeId, NodeKind, is_void_element};

enum Step {
    Node(NodeId),
    EndTag(NodeId),
}

/// Markup for `id` including the node itself. For a fragment this equals
/// [`inner_html`].
#[must_use]
pub fn outer_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_steps(tree, vec![Step::Node(id)], &mut out);
    out
}

/// Markup for the children of `id`.
#[must_use]
pub fn inner_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    let steps = tree
        .child_nodes(id)
        .iter()
        .rev()
        .map(|&c| Step::Node(c))
        .collect();
    write_steps(tree, steps, &mut out);
    out
}

fn write_steps(tree: &DomTree, mut stack: Vec<Step>, out: &mut String) {
    while let Some(step) = stack.pop() {
        let id = match step {
            Step::EndTag(id) => {
                if let Some(data) = tree.as_element(id) {
                    out.push_str("</");
                    out.push_str(&data.local_name);
                    out.push('>');
                }
                continue;
            }
            Step::Node(id) => id,
        };

        match tree.kind(id) {
            None => {}
            Some(NodeKind::Text(data)) => out.push_str(data),
            Some(NodeKind::Comment(data)) => {
                out.push_str("<!--");
                out.push_str(data);
                out.push_str("-->");
            }
            Some(NodeKind::Fragment) => {
                stack.extend(tree.child_nodes(id).iter().rev().map(|&c| Step::Node(c)));
            }
            Some(NodeKind::Element(data)) => {
                write_start_tag(data, out);
                if !is_void_element(&data.local_name) {
                    stack.push(Step::EndTag(id));
                    stack.extend(tree.child_nodes(id).iter().rev().map(|&c| Step::Node(c)));
                }
            }
        }
    }
}

fn write_start_tag(data: &ElementData, out: &mut String) {
    out.push('<');
    out.push_str(&data.local_name);
    for (name, value) in data.attrs.iter() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attribute_value(value, out);
        out.push('"');
    }
    out.push('>');
}

/// [§ 13.3](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// Attribute mode: `&` becomes `&amp;` and `"` becomes `&quot;`.
fn escape_attribute_value(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
