//! Integration tests for tree assembly, regrouping and normalization.

use std::cell::Cell;

use strata_css::ComputedStyle;
use strata_dom::{DomTree, NodeId, Rect};
use strata_layers::capture::PageBuilder;
use strata_layers::layer::{LayerNode, Paint};
use strata_layers::normalize::resolve_offsets;
use strata_layers::{
    AssemblyStrategy, CapturedPage, ConvertOptions, PaintOrder, Pseudo, StyleContext, Viewport,
    convert,
};

fn block(color: &str) -> Vec<(&str, &str)> {
    vec![("display", "block"), ("background-color", color)]
}

fn red_channel(layer: &LayerNode) -> f64 {
    match layer.fills.first() {
        Some(Paint::Solid { color, .. }) => color.r,
        other => panic!("expected a solid fill, got {other:?}"),
    }
}

fn single_root(page: &CapturedPage, options: &ConvertOptions) -> LayerNode {
    let conversion = convert(page, options);
    assert!(conversion.issues.is_empty(), "{:?}", conversion.issues);
    assert_eq!(conversion.layers.len(), 1);
    conversion.layers.into_iter().next().unwrap()
}

/// `body > div.outer > div.inner > "Label"`
fn nested_page() -> CapturedPage {
    let mut page = PageBuilder::new(1024.0, 768.0);
    let body = page.body();
    let outer = page.element(body, "div", Rect::new(0.0, 0.0, 400.0, 300.0), &block("rgb(255, 0, 0)"));
    let inner = page.element(outer, "div", Rect::new(50.0, 60.0, 100.0, 100.0), &block("rgb(0, 255, 0)"));
    let _ = page.text(inner, "Label", Rect::new(60.0, 70.0, 40.0, 20.0));
    page.build()
}

fn assert_nested(root: &LayerNode) {
    assert_eq!(root.children.len(), 1);
    let outer = &root.children[0];
    assert_eq!(outer.name.as_deref(), Some("div"));
    assert_eq!(outer.children.len(), 1);
    let inner = &outer.children[0];
    assert_eq!((inner.x, inner.y), (50.0, 60.0));
    assert_eq!(inner.children.len(), 1);
    let text = &inner.children[0];
    assert_eq!(text.text().unwrap().characters, "Label");
    assert_eq!((text.x, text.y), (10.0, 10.0));
}

#[test]
fn test_canonical_nesting() {
    let root = single_root(&nested_page(), &ConvertOptions::default());
    assert_nested(&root);
}

#[test]
fn test_reconcile_matches_canonical() {
    let options = ConvertOptions {
        strategy: AssemblyStrategy::Reconcile,
        ..ConvertOptions::default()
    };
    let root = single_root(&nested_page(), &options);
    assert_nested(&root);
}

#[test]
fn test_layers_skip_non_painting_ancestors() {
    let mut page = PageBuilder::new(800.0, 600.0);
    let body = page.body();
    let outer = page.element(body, "section", Rect::new(0.0, 0.0, 800.0, 400.0), &block("rgb(255, 0, 0)"));
    let plain = page.element(outer, "div", Rect::new(20.0, 20.0, 300.0, 300.0), &[("display", "block")]);
    let _ = page.element(plain, "div", Rect::new(30.0, 40.0, 50.0, 50.0), &block("rgb(0, 0, 255)"));
    let root = single_root(&page.build(), &ConvertOptions::default());

    let section = &root.children[0];
    assert_eq!(section.children.len(), 1);
    assert_eq!((section.children[0].x, section.children[0].y), (30.0, 40.0));
}

#[test]
fn test_shadow_children_come_first() {
    let mut page = PageBuilder::new(800.0, 600.0);
    let body = page.body();
    let host = page.element(body, "my-card", Rect::new(0.0, 0.0, 300.0, 200.0), &block("rgb(255, 255, 255)"));
    let _ = page.element(host, "p", Rect::new(0.0, 100.0, 300.0, 50.0), &block("rgb(0, 0, 255)"));
    let _ = page.shadow_element(host, "header", Rect::new(0.0, 0.0, 300.0, 50.0), &block("rgb(255, 0, 0)"));
    let root = single_root(&page.build(), &ConvertOptions::default());

    let names: Vec<_> = root.children[0]
        .children
        .iter()
        .map(|c| c.name.clone().unwrap_or_default())
        .collect();
    assert_eq!(names, ["header", "p"]);
}

#[test]
fn test_paint_order_by_z_index() {
    let mut page = PageBuilder::new(800.0, 600.0);
    let body = page.body();
    for (z, red) in [("1", "rgb(1, 0, 0)"), ("3", "rgb(3, 0, 0)"), ("2", "rgb(2, 0, 0)")] {
        let _ = page.element(
            body,
            "div",
            Rect::new(0.0, 0.0, 100.0, 100.0),
            &[("display", "block"), ("position", "absolute"), ("z-index", z), ("background-color", red)],
        );
    }
    let page = page.build();

    let root = single_root(&page, &ConvertOptions::default());
    let reds: Vec<f64> = root.children.iter().map(|c| (red_channel(c) * 255.0).round()).collect();
    assert_eq!(reds, [3.0, 2.0, 1.0]);

    let options = ConvertOptions {
        paint_order: PaintOrder::BottommostFirst,
        ..ConvertOptions::default()
    };
    let root = single_root(&page, &options);
    let reds: Vec<f64> = root.children.iter().map(|c| (red_channel(c) * 255.0).round()).collect();
    assert_eq!(reds, [1.0, 2.0, 3.0]);
}

#[test]
fn test_equal_z_keeps_document_order() {
    let mut page = PageBuilder::new(800.0, 600.0);
    let body = page.body();
    for red in ["rgb(1, 0, 0)", "rgb(2, 0, 0)", "rgb(3, 0, 0)"] {
        let _ = page.element(body, "div", Rect::new(0.0, 0.0, 10.0, 10.0), &block(red));
    }
    let root = single_root(&page.build(), &ConvertOptions::default());
    let reds: Vec<f64> = root.children.iter().map(|c| (red_channel(c) * 255.0).round()).collect();
    assert_eq!(reds, [1.0, 2.0, 3.0]);
}

#[test]
fn test_pseudo_layers_sort_with_children() {
    let mut page = PageBuilder::new(800.0, 600.0);
    let body = page.body();
    let div = page.element(body, "div", Rect::new(0.0, 0.0, 200.0, 100.0), &block("rgb(255, 255, 255)"));
    let _ = page.element(div, "p", Rect::new(0.0, 20.0, 200.0, 40.0), &block("rgb(0, 0, 255)"));
    let _ = page
        .pseudo(
            div,
            Pseudo::Before,
            Rect::new(0.0, 0.0, 10.0, 10.0),
            &[("content", "\"\""), ("z-index", "-1"), ("background-color", "rgb(255, 0, 0)")],
        )
        .pseudo(
            div,
            Pseudo::After,
            Rect::new(190.0, 0.0, 10.0, 10.0),
            &[("content", "\"\""), ("z-index", "5"), ("background-color", "rgb(0, 255, 0)")],
        );
    let page = page.build();

    let names = |root: &LayerNode| -> Vec<String> {
        root.children[0]
            .children
            .iter()
            .map(|c| c.name.clone().unwrap_or_default())
            .collect()
    };

    let root = single_root(&page, &ConvertOptions::default());
    assert_eq!(names(&root), ["::after", "p", "::before"]);

    let options = ConvertOptions {
        paint_order: PaintOrder::BottommostFirst,
        ..ConvertOptions::default()
    };
    let root = single_root(&page, &options);
    assert_eq!(names(&root), ["::before", "p", "::after"]);
}

#[test]
fn test_common_ancestor_grouping() {
    let mut page = PageBuilder::new(800.0, 600.0);
    let body = page.body();
    let wrapper = page.element(
        body,
        "div",
        Rect::new(100.0, 50.0, 300.0, 200.0),
        &[("display", "block"), ("overflow", "hidden")],
    );
    let _ = page.element(wrapper, "div", Rect::new(110.0, 60.0, 50.0, 50.0), &block("rgb(255, 0, 0)"));
    let _ = page.element(wrapper, "div", Rect::new(200.0, 60.0, 50.0, 50.0), &block("rgb(0, 255, 0)"));
    let _ = page.element(body, "div", Rect::new(0.0, 400.0, 50.0, 50.0), &block("rgb(0, 0, 255)"));
    let page = page.build();

    let flat = single_root(&page, &ConvertOptions::default());
    assert_eq!(flat.children.len(), 3);

    let options = ConvertOptions {
        group_common_ancestors: true,
        ..ConvertOptions::default()
    };
    let root = single_root(&page, &options);
    assert_eq!(root.children.len(), 2);

    let group = &root.children[0];
    assert!(group.clips_content());
    assert!(group.fills.is_empty());
    assert_eq!((group.x, group.y, group.width, group.height), (100.0, 50.0, 300.0, 200.0));
    assert_eq!(group.children.len(), 2);
    assert_eq!((group.children[0].x, group.children[0].y), (10.0, 10.0));
    assert_eq!((group.children[1].x, group.children[1].y), (100.0, 10.0));
    assert_eq!(red_channel(&root.children[1]), 0.0);
}

#[test]
fn test_flat_output() {
    let mut page = PageBuilder::new(800.0, 600.0);
    let body = page.body();
    let div = page.element(
        body,
        "div",
        Rect::new(40.0, 30.0, 200.0, 100.0),
        &[("display", "block"), ("border-left", "4px solid rgb(0, 0, 0)")],
    );
    let _ = page.pseudo(
        div,
        Pseudo::Before,
        Rect::new(40.0, 30.0, 20.0, 20.0),
        &[("content", "\"\""), ("background-color", "rgb(255, 0, 0)")],
    );
    let _ = page.text(div, "Body copy", Rect::new(50.0, 40.0, 100.0, 20.0));

    let options = ConvertOptions {
        use_frames: false,
        ..ConvertOptions::default()
    };
    let conversion = convert(&page.build(), &options);
    let layers = conversion.layers;

    let kinds: Vec<_> = layers
        .iter()
        .map(|l| l.name.clone().unwrap_or_else(|| l.kind.type_name().to_string()))
        .collect();
    assert_eq!(kinds, ["FRAME", "::before", "div", "::borders", "RECTANGLE", "TEXT"]);
    assert!(layers.iter().all(|l| l.children.is_empty()));
    // Coordinates stay absolute.
    assert_eq!((layers[4].x, layers[4].y), (40.0, 30.0));
    assert_eq!((layers[5].x, layers[5].y), (50.0, 40.0));
    assert!(layers.iter().all(|l| l.constraints.is_some()));
}

#[test]
fn test_every_layer_has_constraints() {
    let root = single_root(&nested_page(), &ConvertOptions::default());
    let mut count = 0;
    root.walk(&mut |layer| {
        count += 1;
        assert!(layer.constraints.is_some(), "{layer:?}");
    });
    assert_eq!(count, 4);
}

#[test]
fn test_normalization_is_idempotent() {
    let root = single_root(&nested_page(), &ConvertOptions::default());
    let mut again = root.clone();
    resolve_offsets(&mut again);
    assert_eq!(again, root);
}

#[test]
fn test_document_root_frame() {
    let page = PageBuilder::new(1280.0, 2400.0).build();
    let root = single_root(&page, &ConvertOptions::default());
    assert_eq!((root.x, root.y, root.width, root.height), (0.0, 0.0, 1280.0, 2400.0));
    assert!(!root.clips_content());
    assert!(root.fills.is_empty());
    assert!(root.children.is_empty());
}

/// Reports a different parent for one node on every call.
struct FlipContext {
    page: CapturedPage,
    node: NodeId,
    parents: [NodeId; 2],
    calls: Cell<usize>,
}

impl StyleContext for FlipContext {
    fn dom(&self) -> &DomTree {
        self.page.dom()
    }

    fn document_root(&self) -> NodeId {
        self.page.document_root()
    }

    fn computed_style(&self, node: NodeId, pseudo: Option<Pseudo>) -> &ComputedStyle {
        self.page.computed_style(node, pseudo)
    }

    fn bounding_rect(&self, node: NodeId, pseudo: Option<Pseudo>) -> Option<Rect> {
        self.page.bounding_rect(node, pseudo)
    }

    fn text_rect(&self, node: NodeId) -> Option<Rect> {
        self.page.text_rect(node)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        if node != self.node {
            return self.page.parent(node);
        }
        let calls = self.calls.get();
        self.calls.set(calls + 1);
        Some(self.parents[calls % 2])
    }

    fn viewport(&self) -> Viewport {
        self.page.viewport()
    }

    fn base_url(&self) -> Option<&str> {
        self.page.base_url()
    }
}

#[test]
fn test_reconcile_stops_at_iteration_limit() {
    let mut page = PageBuilder::new(800.0, 600.0);
    let body = page.body();
    let a = page.element(body, "div", Rect::new(0.0, 0.0, 100.0, 100.0), &block("rgb(1, 0, 0)"));
    let b = page.element(body, "div", Rect::new(100.0, 0.0, 100.0, 100.0), &block("rgb(2, 0, 0)"));
    let c = page.element(body, "div", Rect::new(10.0, 10.0, 10.0, 10.0), &block("rgb(3, 0, 0)"));
    let ctx = FlipContext {
        page: page.build(),
        node: c,
        parents: [a, b],
        calls: Cell::new(0),
    };

    let options = ConvertOptions {
        strategy: AssemblyStrategy::Reconcile,
        iteration_limit: 8,
        ..ConvertOptions::default()
    };
    let conversion = convert(&ctx, &options);

    assert_eq!(conversion.layers.len(), 1);
    assert!(
        conversion
            .issues
            .iter()
            .any(|issue| issue.component == "assemble" && issue.message.contains("8 passes")),
        "{:?}",
        conversion.issues
    );
    let root = &conversion.layers[0];
    assert_eq!(root.children.len(), 2);
    assert_eq!(root.count(), 4);
}
