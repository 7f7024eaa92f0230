//! Tests for parsing through custom node sinks.

use wren_dom::{DomTree, NodeId, NodeSink, SVG_NAMESPACE, SinkError, SinkOperation};
use wren_html::{TreeBuilder, parse_into};

/// A sink that records operations and refuses SVG elements.
#[derive(Default)]
struct RecordingSink {
    next: usize,
    log: Vec<String>,
}

impl RecordingSink {
    fn handle(&mut self) -> usize {
        self.next += 1;
        self.next
    }
}

impl NodeSink for RecordingSink {
    type Handle = usize;
    type Error = SinkError;

    fn create_document_fragment(&mut self) -> Result<usize, SinkError> {
        self.log.push("fragment".to_string());
        Ok(self.handle())
    }

    fn create_element_ns(&mut self, namespace_uri: &str, local_name: &str) -> Result<usize, SinkError> {
        if namespace_uri == SVG_NAMESPACE {
            return Err(SinkError::violation(
                SinkOperation::CreateElementNs,
                format!("cannot create <{local_name}> in {namespace_uri}"),
            ));
        }
        self.log.push(format!("element {local_name}"));
        Ok(self.handle())
    }

    fn create_text_node(&mut self, data: &str) -> Result<usize, SinkError> {
        self.log.push(format!("text {data}"));
        Ok(self.handle())
    }

    fn create_comment(&mut self, data: &str) -> Result<usize, SinkError> {
        self.log.push(format!("comment {data}"));
        Ok(self.handle())
    }

    fn append_child(&mut self, parent: usize, child: usize) -> Result<(), SinkError> {
        self.log.push(format!("append {child} to {parent}"));
        Ok(())
    }

    fn set_attribute(&mut self, element: usize, name: &str, value: &str) -> Result<(), SinkError> {
        self.log.push(format!("attr {element} {name}={value}"));
        Ok(())
    }
}

#[test]
fn test_operations_reach_the_sink_in_order() {
    let mut sink = RecordingSink::default();
    let fragment = parse_into(r#"<p ID="x">hi</p>"#, &mut sink).unwrap();

    assert_eq!(fragment, 1);
    assert_eq!(
        sink.log,
        vec![
            "fragment",
            "element p",
            "attr 2 id=x",
            "append 2 to 1",
            "text hi",
            "append 3 to 2",
        ]
    );
}

#[test]
fn test_contract_violation_stops_the_parse() {
    let mut sink = RecordingSink::default();
    let err = parse_into("<div></div><svg><circle/></svg><p>after</p>", &mut sink).unwrap_err();

    assert_eq!(
        err,
        SinkError::ContractViolation {
            operation: SinkOperation::CreateElementNs,
            detail: format!("cannot create <svg> in {SVG_NAMESPACE}"),
        }
    );
    assert!(err.to_string().starts_with("node sink rejected createElementNS"));
    assert!(!sink.log.iter().any(|entry| entry.contains("after")));
}

#[test]
fn test_parse_into_dom_tree_returns_detached_fragment() {
    let mut tree = DomTree::new();
    let Ok(fragment) = parse_into("<a></a><b></b>", &mut tree);

    assert_ne!(fragment, NodeId::ROOT);
    assert!(tree.is_fragment(fragment));
    assert_eq!(tree.children(fragment).len(), 2);
    assert!(tree.child_nodes(NodeId::ROOT).is_empty());

    // Appending the fragment moves its children.
    tree.append_child(NodeId::ROOT, fragment);
    assert_eq!(tree.children(NodeId::ROOT).len(), 2);
    assert!(tree.child_nodes(fragment).is_empty());
}

#[test]
fn test_builder_observer_with_custom_sink() {
    let mut sink = RecordingSink::default();
    let mut observed = Vec::new();
    let mut observer = |_: &RecordingSink, handle: usize| observed.push(handle);
    let result = TreeBuilder::new(&mut sink)
        .with_observer(&mut observer)
        .build("<i>x</i><!--y-->");

    assert_eq!(result, Ok(1));
    assert_eq!(observed, vec![2, 3, 4]);
}
