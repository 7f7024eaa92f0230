//! Integration tests for the tree builder.

use wren_dom::serialize::{inner_html, outer_html};
use wren_dom::{DomTree, HTML_NAMESPACE, NodeId, NodeKind, SVG_NAMESPACE};
use wren_html::{parse, parse_with_observer};

/// Helper to get the element children of the root.
fn top_elements(tree: &DomTree) -> Vec<NodeId> {
    tree.children(NodeId::ROOT)
}

/// Helper to find the first element with a local name, in document order.
fn find_element(tree: &DomTree, name: &str) -> NodeId {
    tree.descendants(NodeId::ROOT)
        .find(|&id| tree.local_name(id) == Some(name))
        .unwrap_or_else(|| panic!("no <{name}> in tree"))
}

/// Helper to describe the root's child nodes compactly.
fn shape(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.child_nodes(id)
        .iter()
        .map(|&child| match tree.kind(child).unwrap() {
            NodeKind::Element(data) => format!("<{}>", data.local_name),
            NodeKind::Text(data) => format!("{data:?}"),
            NodeKind::Comment(data) => format!("<!--{data}-->"),
            NodeKind::Fragment => "#fragment".to_string(),
        })
        .collect()
}

// ========== void and self-closing tags ==========

#[test]
fn test_known_void_tag() {
    let tree = parse(r#"<meta charset="UTF-8">"#);
    let elements = top_elements(&tree);
    assert_eq!(elements.len(), 1);

    let meta = elements[0];
    assert_eq!(tree.tag_name(meta).as_deref(), Some("META"));
    assert_eq!(tree.get_attribute(meta, "charset"), Some("UTF-8"));
    assert!(tree.child_nodes(meta).is_empty());
}

#[test]
fn test_custom_tag_with_self_closing_slash() {
    let tree = parse(r#"<bfs-img src="img/circle" alt=""/>"#);
    let elements = top_elements(&tree);
    assert_eq!(elements.len(), 1);

    let img = elements[0];
    assert_eq!(tree.tag_name(img).as_deref(), Some("BFS-IMG"));
    assert_eq!(tree.get_attribute(img, "src"), Some("img/circle"));
    assert_eq!(tree.get_attribute(img, "alt"), Some(""));
    assert!(tree.children(img).is_empty());
    assert_eq!(
        outer_html(&tree, img),
        r#"<bfs-img src="img/circle" alt=""></bfs-img>"#
    );
}

#[test]
fn test_repeated_void_tags_are_siblings() {
    let tree = parse(
        "<meta charset=\"UTF-8\">\n<meta http-equiv=\"X-UA-Compatible\" content=\"ie=edge\">",
    );
    let elements = top_elements(&tree);
    assert_eq!(elements.len(), 2);
    assert_eq!(tree.get_attribute(elements[1], "content"), Some("ie=edge"));
    assert_eq!(shape(&tree, NodeId::ROOT), vec!["<meta>", "\"\\n\"", "<meta>"]);
}

#[test]
fn test_void_tag_does_not_capture_following_content() {
    let tree = parse("<p>a<br>b</p>");
    let p = find_element(&tree, "p");
    assert_eq!(shape(&tree, p), vec!["\"a\"", "<br>", "\"b\""]);
}

// ========== raw text ==========

#[test]
fn test_script_with_nested_script_string() {
    let tree = parse(r#"<script type="module">const s = '<script>x</script>';</script>"#);
    let elements = top_elements(&tree);
    assert_eq!(elements.len(), 1);

    let script = elements[0];
    assert_eq!(tree.local_name(script), Some("script"));
    assert!(tree.children(script).is_empty());
    assert_eq!(tree.text_content(script), "const s = '<script>x</script>';");
}

#[test]
fn test_style_content_is_not_parsed() {
    let tree = parse("<style>p > a { color: red }</style><p>x</p>");
    let style = find_element(&tree, "style");
    assert_eq!(tree.text_content(style), "p > a { color: red }");
    assert_eq!(top_elements(&tree).len(), 2);
}

#[test]
fn test_empty_script_has_no_text_child() {
    let tree = parse(r#"<script src="app.js"></script>"#);
    let script = find_element(&tree, "script");
    assert!(tree.child_nodes(script).is_empty());
}

#[test]
fn test_unterminated_script_takes_rest_of_input() {
    let tree = parse("<script>let a = 1;<p>not a tag");
    let script = find_element(&tree, "script");
    assert_eq!(tree.text_content(script), "let a = 1;<p>not a tag");
    assert_eq!(top_elements(&tree), vec![script]);
}

#[test]
fn test_self_closed_script_has_no_content() {
    let tree = parse("<script/><p>x</p>");
    assert_eq!(top_elements(&tree).len(), 2);
}

// ========== namespaces ==========

#[test]
fn test_svg_namespace_inheritance() {
    let tree = parse("<svg><circle/></svg><p></p>");
    let svg = find_element(&tree, "svg");
    let circle = find_element(&tree, "circle");
    let p = find_element(&tree, "p");

    assert_eq!(tree.namespace_uri(svg), Some(SVG_NAMESPACE));
    assert_eq!(tree.namespace_uri(circle), Some(SVG_NAMESPACE));
    assert_eq!(tree.namespace_uri(p), Some(HTML_NAMESPACE));
    assert_eq!(tree.parent(circle), Some(svg));
    // tagName is only uppercased for HTML elements.
    assert_eq!(tree.tag_name(circle).as_deref(), Some("circle"));
}

#[test]
fn test_html_inside_svg_resets_namespace() {
    let tree = parse("<svg><html><b></b></html></svg>");
    let b = find_element(&tree, "b");
    assert_eq!(tree.namespace_uri(b), Some(HTML_NAMESPACE));
}

// ========== text, comments, declarations ==========

#[test]
fn test_whitespace_is_preserved() {
    let markup = "\n  <div>\n    <p> a  b </p>\n  </div>\n";
    let tree = parse(markup);
    assert_eq!(inner_html(&tree, NodeId::ROOT), markup);
}

#[test]
fn test_comments_are_kept() {
    let tree = parse("<div><!-- logo --><!----></div>");
    let div = find_element(&tree, "div");
    assert_eq!(shape(&tree, div), vec!["<!-- logo -->", "<!---->"]);
}

#[test]
fn test_declaration_dropped_surrounding_text_kept() {
    let tree = parse("a<!doctype html>b<html></html>");
    assert_eq!(shape(&tree, NodeId::ROOT), vec!["\"a\"", "\"b\"", "<html>"]);
}

#[test]
fn test_trailing_text_goes_to_root() {
    let tree = parse("<div>hello");
    assert_eq!(inner_html(&tree, NodeId::ROOT), "<div></div>hello");
    assert!(tree.child_nodes(find_element(&tree, "div")).is_empty());
}

#[test]
fn test_text_before_last_tag_stays_in_open_element() {
    let tree = parse("<section><p>a<i></i>b");
    let p = find_element(&tree, "p");
    assert_eq!(shape(&tree, p), vec!["\"a\"", "<i>"]);
    assert_eq!(shape(&tree, NodeId::ROOT), vec!["<section>", "\"b\""]);
}

#[test]
fn test_entities_are_not_decoded() {
    let tree = parse("<p>a &amp; b</p>");
    assert_eq!(tree.text_content(find_element(&tree, "p")), "a &amp; b");
}

// ========== end tags ==========

#[test]
fn test_mismatched_end_tag_is_ignored() {
    let tree = parse("<div><span>x</div></span><i></i>");
    let span = find_element(&tree, "span");
    let i = find_element(&tree, "i");
    // `</div>` is ignored while <span> is open; `</span>` then returns to the div.
    assert_eq!(tree.parent(i), tree.parent(span));
}

#[test]
fn test_end_tag_match_is_case_insensitive() {
    let tree = parse("<DIV>a</div>b");
    let div = find_element(&tree, "div");
    assert_eq!(tree.text_content(div), "a");
    assert_eq!(shape(&tree, NodeId::ROOT), vec!["<div>", "\"b\""]);
}

#[test]
fn test_stray_end_tag_at_root_is_ignored() {
    let tree = parse("</p>text");
    assert_eq!(shape(&tree, NodeId::ROOT), vec!["\"text\""]);
}

#[test]
fn test_unclosed_same_name_tags_nest() {
    let tree = parse("<li>one<li>two");
    let items: Vec<_> = tree
        .descendants(NodeId::ROOT)
        .filter(|&id| tree.local_name(id) == Some("li"))
        .collect();
    assert_eq!(items.len(), 2);
    assert_eq!(tree.parent(items[1]), Some(items[0]));
}

#[test]
fn test_deeply_nested_unclosed_tags() {
    const DEPTH: usize = 50_000;
    let tree = parse(&"<b>".repeat(DEPTH));

    let deepest = tree
        .descendants(NodeId::ROOT)
        .last()
        .expect("tree has elements");
    assert_eq!(tree.ancestors(deepest).count(), DEPTH);
    assert_eq!(top_elements(&tree).len(), 1);

    let markup = inner_html(&tree, NodeId::ROOT);
    assert_eq!(markup.len(), DEPTH * "<b></b>".len());
}

// ========== attributes ==========

#[test]
fn test_attribute_names_are_lowercased_and_last_wins() {
    let tree = parse(r#"<div ID="a" Class='b c' id=z hidden></div>"#);
    let div = find_element(&tree, "div");
    let attrs: Vec<_> = tree.attributes(div).unwrap().iter().collect();
    assert_eq!(attrs, vec![("id", "z"), ("class", "b c"), ("hidden", "")]);
}

#[test]
fn test_tag_names_are_lowercased() {
    let tree = parse("<DiV></DiV>");
    assert_eq!(outer_html(&tree, NodeId::ROOT), "<div></div>");
}

// ========== observer ==========

#[test]
fn test_observer_sees_every_node_in_pre_order() {
    let mut seen = Vec::new();
    let tree = parse_with_observer("<ul><li>a</li><!--c--><li/></ul>t", |tree, id| {
        assert!(tree.parent(id).is_some(), "observer runs after append");
        seen.push(id);
    });

    let expected: Vec<_> = tree.descendants(NodeId::ROOT).collect();
    assert_eq!(seen, expected);
    assert_eq!(seen.len(), 6);
}

#[test]
fn test_observer_sees_script_text() {
    let mut texts = Vec::new();
    let _ = parse_with_observer("<script>x</script>", |tree, id| {
        if let Some(text) = tree.as_text(id) {
            texts.push(text.to_string());
        }
    });
    assert_eq!(texts, vec!["x"]);
}
