//! Tree and JSON rendering for the command line.

use std::io::{self, Write};

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::{Map, Value};
use wren::dom::{DomTree, HTML_NAMESPACE, NodeId, NodeKind, SVG_NAMESPACE};

/// Optional terminal colors for the tree printer.
pub struct Painter {
    color: bool,
}

impl Painter {
    pub const fn new(color: bool) -> Self {
        Self { color }
    }

    fn tag(&self, name: &str) -> String {
        if self.color {
            name.cyan().bold().to_string()
        } else {
            name.to_string()
        }
    }

    fn attr_name(&self, name: &str) -> String {
        if self.color {
            name.yellow().to_string()
        } else {
            name.to_string()
        }
    }

    fn attr_value(&self, value: &str) -> String {
        if self.color {
            format!("\"{value}\"").green().to_string()
        } else {
            format!("\"{value}\"")
        }
    }

    fn text(&self, text: &str) -> String {
        if self.color {
            text.white().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.bright_black().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Write the subtree at `id` as an indented outline, one node per line.
pub fn write_tree(
    out: &mut impl Write,
    tree: &DomTree,
    id: NodeId,
    painter: &Painter,
) -> io::Result<()> {
    let mut stack = vec![(id, 0usize)];

    while let Some((node, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        match tree.kind(node) {
            Some(NodeKind::Fragment) => writeln!(out, "{indent}{}", painter.dim("#fragment"))?,
            Some(NodeKind::Element(data)) => {
                let mut line = format!("<{}", painter.tag(&data.local_name));
                for (name, value) in data.attrs.iter() {
                    line.push(' ');
                    line.push_str(&painter.attr_name(name));
                    if !value.is_empty() {
                        line.push('=');
                        line.push_str(&painter.attr_value(value));
                    }
                }
                line.push('>');
                match data.namespace_uri.as_str() {
                    HTML_NAMESPACE => {}
                    SVG_NAMESPACE => line.push_str(&painter.dim(" (svg)")),
                    other => line.push_str(&painter.dim(&format!(" ({other})"))),
                }
                writeln!(out, "{indent}{line}")?;
            }
            Some(NodeKind::Text(data)) => {
                let shown = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
                writeln!(out, "{indent}{}", painter.text(&format!("\"{shown}\"")))?;
            }
            Some(NodeKind::Comment(data)) => {
                writeln!(out, "{indent}{}", painter.dim(&format!("<!--{data}-->")))?;
            }
            None => {}
        }

        stack.extend(
            tree.child_nodes(node)
                .iter()
                .rev()
                .map(|&child| (child, depth + 1)),
        );
    }
    Ok(())
}

/// JSON shape of one node and its subtree.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum JsonNode<'a> {
    Fragment {
        children: Vec<JsonNode<'a>>,
    },
    Element {
        #[serde(rename = "tagName")]
        tag_name: String,
        #[serde(rename = "namespaceURI")]
        namespace_uri: &'a str,
        attributes: Map<String, Value>,
        children: Vec<JsonNode<'a>>,
    },
    Text {
        content: &'a str,
    },
    Comment {
        content: &'a str,
    },
}

impl<'a> JsonNode<'a> {
    fn build(tree: &'a DomTree, id: NodeId) -> Option<Self> {
        let children = || -> Vec<Self> {
            tree.child_nodes(id)
                .iter()
                .filter_map(|&child| Self::build(tree, child))
                .collect()
        };
        Some(match tree.kind(id)? {
            NodeKind::Fragment => Self::Fragment {
                children: children(),
            },
            NodeKind::Element(data) => Self::Element {
                tag_name: data.tag_name(),
                namespace_uri: &data.namespace_uri,
                attributes: data
                    .attrs
                    .iter()
                    .map(|(name, value)| (name.to_string(), Value::from(value)))
                    .collect(),
                children: children(),
            },
            NodeKind::Text(data) => Self::Text { content: data },
            NodeKind::Comment(data) => Self::Comment { content: data },
        })
    }
}

/// Deepest subtree, in node levels, the JSON output will render. Same as
/// `serde_json`'s default recursion limit when reading.
pub const MAX_JSON_DEPTH: usize = 128;

/// Number of node levels in the subtree at `id`, counting `id` itself.
fn subtree_depth(tree: &DomTree, id: NodeId) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(id, 1usize)];
    while let Some((node, depth)) = stack.pop() {
        deepest = deepest.max(depth);
        stack.extend(tree.child_nodes(node).iter().map(|&child| (child, depth + 1)));
    }
    deepest
}

/// Building and serializing a [`JsonNode`] recurses once per level.
fn check_depth(tree: &DomTree, id: NodeId) -> Result<()> {
    let depth = subtree_depth(tree, id);
    if depth > MAX_JSON_DEPTH {
        bail!(
            "tree is {depth} levels deep; --json renders at most {MAX_JSON_DEPTH} \
             (drop --json for the outline)"
        );
    }
    Ok(())
}

/// Pretty JSON for the subtree at `id`.
pub fn node_json(tree: &DomTree, id: NodeId) -> Result<String> {
    check_depth(tree, id)?;
    Ok(serde_json::to_string_pretty(&JsonNode::build(tree, id))?)
}

/// Pretty JSON array for several subtrees.
pub fn elements_json(tree: &DomTree, ids: &[NodeId]) -> Result<String> {
    for &id in ids {
        check_depth(tree, id)?;
    }
    let nodes: Vec<JsonNode<'_>> = ids
        .iter()
        .filter_map(|&id| JsonNode::build(tree, id))
        .collect();
    Ok(serde_json::to_string_pretty(&nodes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wren::Document;

    fn plain_tree(markup: &str) -> String {
        let doc = Document::parse(markup);
        let mut out = Vec::new();
        write_tree(&mut out, doc.tree(), doc.root(), &Painter::new(false)).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_tree_outline() {
        let outline = plain_tree("<p id=\"a\" hidden>hi there</p><!--c--><svg><rect/></svg>");
        assert_eq!(
            outline,
            "#fragment\n  <p id=\"a\" hidden>\n    \"hi\u{00B7}there\"\n  <!--c-->\n  <svg> (svg)\n    <rect> (svg)\n"
        );
    }

    #[test]
    fn test_colored_tree_still_has_names() {
        let doc = Document::parse("<em>x</em>");
        let mut out = Vec::new();
        write_tree(&mut out, doc.tree(), doc.root(), &Painter::new(true)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("em"));
    }

    #[test]
    fn test_document_json() {
        let doc = Document::parse("<a href=\"/x\">go</a><!--note-->");
        let json: Value = serde_json::from_str(&node_json(doc.tree(), doc.root()).unwrap()).unwrap();

        assert_eq!(json["type"], "fragment");
        let link = &json["children"][0];
        assert_eq!(link["type"], "element");
        assert_eq!(link["tagName"], "A");
        assert_eq!(link["namespaceURI"], HTML_NAMESPACE);
        assert_eq!(link["attributes"]["href"], "/x");
        assert_eq!(link["children"][0]["content"], "go");
        assert_eq!(json["children"][1]["type"], "comment");
    }

    #[test]
    fn test_elements_json_is_an_array() {
        let doc = Document::parse("<i>1</i><i>2</i>");
        let ids: Vec<NodeId> = doc
            .query_selector_all("i")
            .unwrap()
            .iter()
            .map(wren::ElementRef::id)
            .collect();
        let json: Value = serde_json::from_str(&elements_json(doc.tree(), &ids).unwrap()).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(2));
        assert_eq!(json[1]["children"][0]["content"], "2");
    }

    #[test]
    fn test_json_depth_limit() {
        // The fragment is one level, so this is exactly at the limit.
        let at_limit = Document::parse(&"<b>".repeat(MAX_JSON_DEPTH - 1));
        assert!(node_json(at_limit.tree(), at_limit.root()).is_ok());

        let too_deep = Document::parse(&"<b>".repeat(50_000));
        let err = node_json(too_deep.tree(), too_deep.root()).unwrap_err();
        assert!(err.to_string().contains("50001 levels deep"), "{err}");

        let ids: Vec<NodeId> = too_deep.tree().children(too_deep.root());
        assert!(elements_json(too_deep.tree(), &ids).is_err());
    }
}
