//! Tests for tree mutation and the read accessors.

use wren_dom::{DomTree, HTML_NAMESPACE, NodeId, NodeKind, SVG_NAMESPACE, is_void_element};

/// Helper to create an HTML element and return its NodeId.
fn element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.create_element_ns(HTML_NAMESPACE, tag)
}

/// Helper: `<div><a/>text<b/><!--c--><c/></div>` under the root.
fn sample(tree: &mut DomTree) -> (NodeId, NodeId, NodeId, NodeId) {
    let div = element(tree, "div");
    tree.append_child(NodeId::ROOT, div);
    let a = element(tree, "a");
    let text = tree.create_text_node("text");
    let b = element(tree, "b");
    let comment = tree.create_comment("c");
    let c = element(tree, "c");
    for child in [a, text, b, comment, c] {
        tree.append_child(div, child);
    }
    (div, a, b, c)
}

// ========== creation ==========

#[test]
fn test_new_tree_has_root_fragment() {
    let tree = DomTree::new();
    assert_eq!(tree.len(), 1);
    assert!(tree.is_fragment(NodeId::ROOT));
    assert!(tree.child_nodes(NodeId::ROOT).is_empty());
}

#[test]
fn test_local_name_is_lowercased() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, "DiV");
    assert_eq!(tree.local_name(div), Some("div"));
}

#[test]
fn test_tag_name_uppercase_only_in_html_namespace() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, "div");
    let svg = tree.create_element_ns(SVG_NAMESPACE, "svg");
    assert_eq!(tree.tag_name(div).as_deref(), Some("DIV"));
    assert_eq!(tree.tag_name(svg).as_deref(), Some("svg"));
    assert_eq!(tree.namespace_uri(svg), Some(SVG_NAMESPACE));
}

#[test]
fn test_void_element_table() {
    assert!(is_void_element("br"));
    assert!(is_void_element("IMG"));
    assert!(is_void_element("keygen"));
    assert!(!is_void_element("div"));
    assert!(!is_void_element("script"));
}

// ========== append_child ==========

#[test]
fn test_append_fragment_splices_children() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, div);

    let fragment = tree.create_document_fragment();
    let a = element(&mut tree, "a");
    let b = element(&mut tree, "b");
    tree.append_child(fragment, a);
    tree.append_child(fragment, b);

    tree.append_child(div, fragment);

    assert_eq!(tree.child_nodes(div), &[a, b]);
    assert_eq!(tree.parent(a), Some(div));
    assert!(tree.child_nodes(fragment).is_empty());
    assert_eq!(tree.parent(fragment), None);
}

#[test]
fn test_append_moves_attached_node() {
    let mut tree = DomTree::new();
    let first = element(&mut tree, "div");
    let second = element(&mut tree, "div");
    let child = element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, first);
    tree.append_child(NodeId::ROOT, second);
    tree.append_child(first, child);

    tree.append_child(second, child);

    assert!(tree.child_nodes(first).is_empty());
    assert_eq!(tree.child_nodes(second), &[child]);
}

#[test]
fn test_append_ancestor_is_ignored() {
    let mut tree = DomTree::new();
    let outer = element(&mut tree, "div");
    let inner = element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, outer);
    tree.append_child(outer, inner);

    tree.append_child(inner, outer);
    tree.append_child(inner, NodeId::ROOT);

    assert_eq!(tree.parent(outer), Some(NodeId::ROOT));
    assert!(tree.child_nodes(inner).is_empty());
}

#[test]
fn test_append_childless_node_to_itself_is_ignored() {
    let mut tree = DomTree::new();
    let leaf = element(&mut tree, "i");
    tree.append_child(NodeId::ROOT, leaf);

    tree.append_child(leaf, leaf);

    assert_eq!(tree.parent(leaf), Some(NodeId::ROOT));
    assert!(tree.child_nodes(leaf).is_empty());
}

#[test]
fn test_append_childless_node_deep_in_tree() {
    let mut tree = DomTree::new();
    let mut parent = NodeId::ROOT;
    for _ in 0..1000 {
        let next = element(&mut tree, "b");
        tree.append_child(parent, next);
        parent = next;
    }
    let leaf = element(&mut tree, "i");
    tree.append_child(NodeId::ROOT, leaf);

    tree.append_child(parent, leaf);

    assert_eq!(tree.parent(leaf), Some(parent));
    assert_eq!(tree.ancestors(leaf).count(), 1001);
}

#[test]
fn test_append_into_text_is_ignored() {
    let mut tree = DomTree::new();
    let text = tree.create_text_node("x");
    let div = element(&mut tree, "div");
    tree.append_child(text, div);
    assert_eq!(tree.parent(div), None);
}

// ========== insert_before / remove_child ==========

#[test]
fn test_insert_before_reference() {
    let mut tree = DomTree::new();
    let a = element(&mut tree, "a");
    let c = element(&mut tree, "c");
    tree.append_child(NodeId::ROOT, a);
    tree.append_child(NodeId::ROOT, c);

    let b = element(&mut tree, "b");
    tree.insert_before(NodeId::ROOT, b, Some(c));

    assert_eq!(tree.child_nodes(NodeId::ROOT), &[a, b, c]);
}

#[test]
fn test_insert_before_none_appends() {
    let mut tree = DomTree::new();
    let a = element(&mut tree, "a");
    let b = element(&mut tree, "b");
    tree.append_child(NodeId::ROOT, a);
    tree.insert_before(NodeId::ROOT, b, None);
    assert_eq!(tree.child_nodes(NodeId::ROOT), &[a, b]);
}

#[test]
fn test_remove_child_detaches() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = sample(&mut tree);

    tree.remove_child(div, b);

    assert_eq!(tree.children(div), vec![a, c]);
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.next_element_sibling(a), Some(c));
}

#[test]
fn test_remove_child_wrong_parent_is_noop() {
    let mut tree = DomTree::new();
    let (div, a, _, _) = sample(&mut tree);
    tree.remove_child(NodeId::ROOT, a);
    assert_eq!(tree.parent(a), Some(div));
}

// ========== attributes ==========

#[test]
fn test_attributes_order_and_overwrite() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, "div");
    tree.set_attribute(div, "ID", "one");
    tree.set_attribute(div, "class", "x y");
    tree.set_attribute(div, "id", "two");

    let attrs: Vec<_> = tree.attributes(div).unwrap().iter().collect();
    assert_eq!(attrs, vec![("id", "two"), ("class", "x y")]);
    assert!(tree.has_attribute(div, "Class"));
    assert_eq!(tree.as_element(div).unwrap().classes(), vec!["x", "y"]);
    assert_eq!(tree.as_element(div).unwrap().id(), Some("two"));
}

#[test]
fn test_remove_attribute() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, "div");
    tree.set_attribute(div, "hidden", "");
    assert_eq!(tree.remove_attribute(div, "HIDDEN"), Some(String::new()));
    assert!(!tree.has_attribute(div, "hidden"));
    assert_eq!(tree.remove_attribute(div, "hidden"), None);
}

#[test]
fn test_set_attribute_on_text_is_ignored() {
    let mut tree = DomTree::new();
    let text = tree.create_text_node("x");
    tree.set_attribute(text, "id", "a");
    assert!(!tree.has_attribute(text, "id"));
}

// ========== read contract ==========

#[test]
fn test_element_children_skip_text_and_comments() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = sample(&mut tree);
    assert_eq!(tree.child_nodes(div).len(), 5);
    assert_eq!(tree.children(div), vec![a, b, c]);
    assert_eq!(tree.first_element_child(div), Some(a));
    assert_eq!(tree.last_element_child(div), Some(c));
}

#[test]
fn test_element_siblings() {
    let mut tree = DomTree::new();
    let (_, a, b, c) = sample(&mut tree);
    assert_eq!(tree.prev_element_sibling(a), None);
    assert_eq!(tree.prev_element_sibling(b), Some(a));
    assert_eq!(tree.next_element_sibling(b), Some(c));
    assert_eq!(tree.next_element_sibling(c), None);
    assert_eq!(tree.preceding_element_siblings(c).collect::<Vec<_>>(), vec![b, a]);
}

#[test]
fn test_parent_element_of_top_level_is_none() {
    let mut tree = DomTree::new();
    let (div, a, _, _) = sample(&mut tree);
    assert_eq!(tree.parent(div), Some(NodeId::ROOT));
    assert_eq!(tree.parent_element(div), None);
    assert_eq!(tree.parent_element(a), Some(div));
}

#[test]
fn test_text_content_concatenates_descendant_text() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, div);
    let hello = tree.create_text_node("Hello, ");
    let span = element(&mut tree, "span");
    let world = tree.create_text_node("world");
    let comment = tree.create_comment("skip");
    tree.append_child(div, hello);
    tree.append_child(div, span);
    tree.append_child(span, world);
    tree.append_child(div, comment);

    assert_eq!(tree.text_content(div), "Hello, world");
    assert_eq!(tree.text_content(comment), "skip");
    assert_eq!(tree.text_content(NodeId::ROOT), "Hello, world");
}

#[test]
fn test_descendants_pre_order() {
    let mut tree = DomTree::new();
    let (div, a, b, c) = sample(&mut tree);
    let inner = element(&mut tree, "i");
    tree.append_child(a, inner);

    let elements: Vec<_> = tree
        .descendants(NodeId::ROOT)
        .filter(|&id| tree.is_element(id))
        .collect();
    assert_eq!(elements, vec![div, a, inner, b, c]);
}

#[test]
fn test_ancestors() {
    let mut tree = DomTree::new();
    let (div, a, _, _) = sample(&mut tree);
    assert_eq!(tree.ancestors(a).collect::<Vec<_>>(), vec![div, NodeId::ROOT]);
    assert!(tree.is_descendant_of(a, NodeId::ROOT));
    assert!(!tree.is_descendant_of(div, a));
}

#[test]
fn test_content_editable_nearest_ancestor_decides() {
    let mut tree = DomTree::new();
    let outer = element(&mut tree, "div");
    let middle = element(&mut tree, "div");
    let inner = element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, outer);
    tree.append_child(outer, middle);
    tree.append_child(middle, inner);

    assert!(!tree.is_content_editable(inner));

    tree.set_attribute(outer, "contenteditable", "");
    assert!(tree.is_content_editable(inner));

    tree.set_attribute(middle, "contenteditable", "FALSE");
    assert!(!tree.is_content_editable(inner));
    assert!(tree.is_content_editable(outer));
}

#[test]
fn test_kind_is_fixed() {
    let mut tree = DomTree::new();
    let comment = tree.create_comment("");
    assert_eq!(tree.kind(comment), Some(&NodeKind::Comment(String::new())));
    assert_eq!(tree.kind(NodeId(999)), None);
}
