//! Tests for tree construction, traversal order and geometry helpers.

use strata_dom::{DomTree, ElementData, NodeId, NodeType, Rect};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

#[test]
fn test_descendants_visit_shadow_tree_before_light_children() {
    let mut tree = DomTree::new();
    let host = alloc_element(&mut tree, "my-widget");
    tree.append_child(NodeId::ROOT, host);

    let light = alloc_element(&mut tree, "span");
    tree.append_child(host, light);

    let shadow = alloc_element(&mut tree, "div");
    tree.append_shadow_child(host, shadow);
    let shadow_inner = alloc_element(&mut tree, "b");
    tree.append_child(shadow, shadow_inner);

    assert_eq!(
        tree.descendants(host),
        vec![host, shadow, shadow_inner, light]
    );
    assert_eq!(tree.parent(shadow), Some(host));
    assert!(tree.is_descendant_of(shadow_inner, host));
}

#[test]
fn test_contains_is_inclusive() {
    let mut tree = DomTree::new();
    let a = alloc_element(&mut tree, "div");
    let b = alloc_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, a);
    tree.append_child(a, b);

    assert!(tree.contains(a, a));
    assert!(tree.contains(a, b));
    assert!(!tree.contains(b, a));
}

#[test]
fn test_parent_element_skips_text_nodes() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, p);
    let t1 = tree.alloc(NodeType::Text("Hello ".to_string()));
    tree.append_child(p, t1);
    let em = alloc_element(&mut tree, "em");
    tree.append_child(p, em);
    let t2 = tree.alloc(NodeType::Text("world".to_string()));
    tree.append_child(em, t2);

    assert_eq!(tree.parent_element(t1), Some(p));
    assert_eq!(tree.parent_element(t2), Some(em));
}

#[test]
fn test_default_node_id_is_document() {
    let tree = DomTree::default();
    assert_eq!(NodeId::default(), NodeId::ROOT);
    assert!(matches!(
        tree.get(NodeId::default()).map(|n| &n.node_type),
        Some(NodeType::Document)
    ));
}

#[test]
fn test_body_lookup() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let head = alloc_element(&mut tree, "head");
    tree.append_child(html, head);
    let body = alloc_element(&mut tree, "BODY");
    tree.append_child(html, body);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(body));
}

#[test]
fn test_control_value_prefers_live_value() {
    let mut input = ElementData::new("input");
    let _ = input.attrs.insert("value".to_string(), "initial".to_string());
    assert_eq!(input.control_value(), Some("initial"));

    input.value = Some("typed".to_string());
    assert_eq!(input.control_value(), Some("typed"));
}

#[test]
fn test_rect_degenerate_and_rounding() {
    assert!(Rect::new(0.0, 0.0, 0.4, 20.0).is_degenerate());
    assert!(Rect::new(0.0, 0.0, 20.0, 0.0).is_degenerate());
    assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_degenerate());

    let r = Rect::new(10.4, 20.6, 99.5, 30.2).rounded();
    assert_eq!((r.left, r.top, r.width, r.height), (10.0, 21.0, 100.0, 30.0));
    assert_eq!(r.right, 110.0);
}

#[test]
fn test_rect_union_and_centering() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(5.0, 20.0, 10.0, 5.0);
    let u = a.union(&b);
    assert_eq!((u.left, u.top, u.right, u.bottom), (0.0, 0.0, 15.0, 25.0));

    let line = Rect::new(0.0, 100.0, 50.0, 14.0).centered_to_height(20.0);
    assert_eq!((line.top, line.height), (97.0, 20.0));
}
