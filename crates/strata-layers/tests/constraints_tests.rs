//! Integration tests for constraint inference.

use strata_dom::Rect;
use strata_layers::capture::PageBuilder;
use strata_layers::constraints::{
    HEIGHT_TYPE_KEY, POSITION_KEY, WIDTH_TYPE_KEY, infer_constraints,
};
use strata_layers::layer::{ConstraintType, Constraints, LayerKind, LayerNode};
use strata_layers::{CapturedPage, ConvertOptions, convert};

fn root_of(page: &CapturedPage) -> LayerNode {
    convert(page, &ConvertOptions::default())
        .layers
        .into_iter()
        .next()
        .unwrap()
}

fn constraints(layer: &LayerNode) -> (ConstraintType, ConstraintType) {
    let c = layer.constraints.expect("constraints are always set");
    (c.horizontal, c.vertical)
}

/// A painted container holding one painted block child.
fn container_with_child(parent_style: &[(&str, &str)], child_style: &[(&str, &str)]) -> LayerNode {
    let mut page = PageBuilder::new(800.0, 600.0);
    let body = page.body();
    let parent = page.element(body, "div", Rect::new(0.0, 0.0, 800.0, 400.0), parent_style);
    let _ = page.element(parent, "div", Rect::new(300.0, 100.0, 200.0, 100.0), child_style);
    let root = root_of(&page.build());
    root.children[0].children[0].clone()
}

const PAINTED_BLOCK: [(&str, &str); 2] = [("display", "block"), ("background-color", "rgb(0, 0, 0)")];

#[test]
fn test_block_defaults_to_scale_min() {
    let child = container_with_child(&PAINTED_BLOCK, &PAINTED_BLOCK);
    assert_eq!(constraints(&child), (ConstraintType::Scale, ConstraintType::Min));
    assert!(child.data.is_empty());
}

#[test]
fn test_flex_row_center() {
    let child = container_with_child(
        &[
            ("display", "flex"),
            ("justify-content", "center"),
            ("align-items", "center"),
            ("background-color", "rgb(255, 255, 255)"),
        ],
        &PAINTED_BLOCK,
    );
    assert_eq!(constraints(&child), (ConstraintType::Center, ConstraintType::Center));
}

#[test]
fn test_flex_row_end() {
    let child = container_with_child(
        &[
            ("display", "flex"),
            ("justify-content", "flex-end"),
            ("background-color", "rgb(255, 255, 255)"),
        ],
        &PAINTED_BLOCK,
    );
    assert_eq!(constraints(&child), (ConstraintType::Max, ConstraintType::Min));
}

#[test]
fn test_flex_column_swaps_axes() {
    let child = container_with_child(
        &[
            ("display", "inline-flex"),
            ("flex-direction", "column"),
            ("align-items", "center"),
            ("justify-content", "end"),
            ("background-color", "rgb(255, 255, 255)"),
        ],
        &PAINTED_BLOCK,
    );
    assert_eq!(constraints(&child), (ConstraintType::Center, ConstraintType::Max));
}

#[test]
fn test_inline_child_of_right_aligned_parent() {
    let child = container_with_child(
        &[
            ("display", "block"),
            ("text-align", "right"),
            ("background-color", "rgb(255, 255, 255)"),
        ],
        &[("display", "inline-block"), ("vertical-align", "middle"), ("background-color", "rgb(0, 0, 0)")],
    );
    assert_eq!(constraints(&child), (ConstraintType::Max, ConstraintType::Center));
    assert_eq!(child.data.get(WIDTH_TYPE_KEY).map(String::as_str), Some("shrink"));
}

#[test]
fn test_hidden_style_supplies_margins_and_fixed_size() {
    let mut page = PageBuilder::new(800.0, 600.0);
    let body = page.body();
    let div = page.element(body, "div", Rect::new(300.0, 0.0, 200.0, 50.0), &PAINTED_BLOCK);
    let _ = page.hidden_style(
        div,
        &[
            ("display", "block"),
            ("width", "200px"),
            ("height", "auto"),
            ("margin-left", "auto"),
            ("margin-right", "auto"),
        ],
    );
    let root = root_of(&page.build());

    let layer = &root.children[0];
    assert_eq!(constraints(layer), (ConstraintType::Center, ConstraintType::Min));
    assert_eq!(layer.data.get(WIDTH_TYPE_KEY).map(String::as_str), Some("fixed"));
    assert!(!layer.data.contains_key(HEIGHT_TYPE_KEY));
}

#[test]
fn test_left_auto_margin_pins_right() {
    let mut page = PageBuilder::new(800.0, 600.0);
    let body = page.body();
    let div = page.element(body, "div", Rect::new(600.0, 0.0, 200.0, 50.0), &PAINTED_BLOCK);
    let _ = page.hidden_style(div, &[("margin-left", "auto"), ("height", "50px")]);
    let root = root_of(&page.build());

    let layer = &root.children[0];
    assert_eq!(constraints(layer), (ConstraintType::Max, ConstraintType::Min));
    assert_eq!(layer.data.get(HEIGHT_TYPE_KEY).map(String::as_str), Some("fixed"));
}

#[test]
fn test_position_is_recorded() {
    let mut page = PageBuilder::new(800.0, 600.0);
    let body = page.body();
    let _ = page.element(
        body,
        "div",
        Rect::new(0.0, 0.0, 50.0, 50.0),
        &[("display", "block"), ("position", "fixed"), ("background-color", "rgb(0, 0, 0)")],
    );
    let _ = page.element(
        body,
        "div",
        Rect::new(0.0, 0.0, 50.0, 50.0),
        &[("display", "block"), ("position", "relative"), ("background-color", "rgb(0, 0, 0)")],
    );
    let root = root_of(&page.build());

    assert_eq!(root.children[0].data.get(POSITION_KEY).map(String::as_str), Some("fixed"));
    assert!(!root.children[1].data.contains_key(POSITION_KEY));
}

#[test]
fn test_centered_text() {
    let mut page = PageBuilder::new(800.0, 600.0);
    let body = page.body();
    let h1 = page.element(
        body,
        "h1",
        Rect::new(0.0, 0.0, 800.0, 40.0),
        &[("display", "block"), ("text-align", "center")],
    );
    let _ = page.text(h1, "Welcome", Rect::new(340.0, 5.0, 120.0, 30.0));
    let root = root_of(&page.build());

    let text = &root.children[0];
    assert!(text.text().is_some());
    assert_eq!(constraints(text), (ConstraintType::Center, ConstraintType::Min));
}

#[test]
fn test_document_root_scales() {
    let root = root_of(&PageBuilder::new(800.0, 600.0).build());
    assert_eq!(constraints(&root), (ConstraintType::Scale, ConstraintType::Min));
}

#[test]
fn test_layer_without_source_gets_default() {
    let page = PageBuilder::new(800.0, 600.0).build();
    let layer = LayerNode::frame(&Rect::new(0.0, 0.0, 10.0, 10.0), false);
    let inference = infer_constraints(&page, &layer, None);
    assert_eq!(inference.constraints, Constraints::DEFAULT);
    assert!(inference.data.is_empty());
}

#[test]
fn test_svg_layers_center_horizontally() {
    let page = PageBuilder::new(800.0, 600.0).build();
    let layer = LayerNode::new(
        LayerKind::Svg {
            svg: "<svg></svg>".to_string(),
        },
        &Rect::new(0.0, 0.0, 10.0, 10.0),
    );
    let inference = infer_constraints(&page, &layer, None);
    assert_eq!(
        inference.constraints,
        Constraints {
            horizontal: ConstraintType::Center,
            vertical: ConstraintType::Min,
        }
    );
}
