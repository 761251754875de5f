//! Integration tests for the host canvas driver.

use strata_dom::Rect;
use strata_layers::MaterializeError;
use strata_layers::layer::{ImageSource, LayerKind, LayerNode, Paint, ScaleMode, TextProps};
use strata_layers::materialize::{
    FontMatcher, FontName, HostCanvas, ImageHandle, NodeRequest, materialize,
};

/// What the mock host was asked to create.
#[derive(Debug, Clone, PartialEq)]
struct Created {
    name: String,
    parent: Option<usize>,
    x: f64,
    y: f64,
    font: Option<FontName>,
    images: Vec<ImageHandle>,
}

/// Records nodes and rejects layers named `reject`.
struct MockHost {
    fonts: FontMatcher,
    created: Vec<Created>,
    uploads: usize,
}

impl MockHost {
    fn new() -> Self {
        Self {
            fonts: FontMatcher::new([
                FontName::new("Open Sans", "Regular"),
                FontName::new("Inter", "Bold"),
                FontName::new("Inter", "Regular"),
            ]),
            created: Vec::new(),
            uploads: 0,
        }
    }

    fn by_name(&self, name: &str) -> &Created {
        self.created.iter().find(|c| c.name == name).unwrap()
    }
}

impl HostCanvas for MockHost {
    type Node = usize;

    fn resolve_font(&mut self, family_list: &str) -> FontName {
        self.fonts.resolve(family_list)
    }

    fn create_image(&mut self, bytes: &[u8]) -> Result<ImageHandle, MaterializeError> {
        if bytes.is_empty() {
            return Err(MaterializeError::Host("empty image".to_string()));
        }
        self.uploads += 1;
        Ok(ImageHandle(format!("img-{}", self.uploads)))
    }

    fn create_node(&mut self, request: NodeRequest<'_, usize>) -> Result<usize, MaterializeError> {
        let name = request.layer.name.clone().unwrap_or_default();
        if name == "reject" {
            return Err(MaterializeError::Unsupported(request.layer.kind.type_name().to_string()));
        }
        self.created.push(Created {
            name,
            parent: request.parent.copied(),
            x: request.x,
            y: request.y,
            font: request.font,
            images: request.images,
        });
        Ok(self.created.len() - 1)
    }
}

fn frame(name: &str, x: f64, y: f64) -> LayerNode {
    LayerNode::frame(&Rect::new(x, y, 50.0, 50.0), false).named(name)
}

#[test]
fn test_tree_is_created_parent_first() {
    let mut root = frame("root", 0.0, 0.0);
    let mut card = frame("card", 10.0, 20.0);
    card.children.push(frame("badge", 1.0, 2.0));
    root.children.push(card);

    let mut host = MockHost::new();
    let report = materialize(&[root], &mut host);

    assert_eq!(report.created, 3);
    assert!(report.failures.is_empty());
    let names: Vec<_> = host.created.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["root", "card", "badge"]);
    assert_eq!(host.by_name("card").parent, Some(0));
    assert_eq!(host.by_name("badge").parent, Some(1));
    assert_eq!((host.by_name("badge").x, host.by_name("badge").y), (1.0, 2.0));
}

#[test]
fn test_failed_layer_children_reattach_with_offset() {
    let mut root = frame("root", 0.0, 0.0);
    let mut rejected = frame("reject", 10.0, 20.0);
    rejected.children.push(frame("orphan", 5.0, 5.0));
    root.children.push(rejected);

    let mut host = MockHost::new();
    let report = materialize(&[root], &mut host);

    assert_eq!(report.created, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].layer, "reject");
    assert!(matches!(report.failures[0].error, MaterializeError::Unsupported(_)));

    let orphan = host.by_name("orphan");
    assert_eq!(orphan.parent, Some(0));
    assert_eq!((orphan.x, orphan.y), (15.0, 25.0));
}

#[test]
fn test_non_finite_coordinates_fail_the_layer() {
    let mut root = frame("root", 0.0, 0.0);
    let mut broken = LayerNode::new(LayerKind::Rectangle, &Rect::new(0.0, 3.0, 4.0, 4.0));
    broken.x = f64::NAN;
    broken.children.push(frame("inside", 2.0, 2.0));
    root.children.push(broken);

    let mut host = MockHost::new();
    let report = materialize(&[root], &mut host);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].layer, "RECTANGLE");
    assert!(matches!(
        report.failures[0].error,
        MaterializeError::InvalidCoordinates { .. }
    ));
    let inside = host.by_name("inside");
    assert_eq!(inside.parent, Some(0));
    assert_eq!((inside.x, inside.y), (2.0, 2.0));
}

#[test]
fn test_image_fills_are_uploaded() {
    let mut layer = frame("photo", 0.0, 0.0);
    layer.fills.push(Paint::Image {
        source: ImageSource::Bytes(vec![1, 2, 3]),
        scale_mode: ScaleMode::Fit,
    });
    layer.fills.push(Paint::Image {
        source: ImageSource::Url("https://a.test/unresolved.png".to_string()),
        scale_mode: ScaleMode::Fill,
    });
    let mut empty = frame("empty-image", 0.0, 0.0);
    empty.fills.push(Paint::Image {
        source: ImageSource::Bytes(Vec::new()),
        scale_mode: ScaleMode::Fill,
    });

    let mut host = MockHost::new();
    let report = materialize(&[layer, empty], &mut host);

    assert_eq!(host.by_name("photo").images, [ImageHandle("img-1".to_string())]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].layer, "empty-image");
}

#[test]
fn test_text_layers_get_a_font() {
    let text = LayerNode::new(
        LayerKind::Text(TextProps {
            characters: "Hello".to_string(),
            font_family: Some("\"Open Sans\", sans-serif".to_string()),
            ..TextProps::default()
        }),
        &Rect::new(0.0, 0.0, 40.0, 20.0),
    )
    .named("greeting");

    let mut host = MockHost::new();
    let _ = materialize(&[text], &mut host);
    assert_eq!(host.by_name("greeting").font, Some(FontName::new("Open Sans", "Regular")));
}

#[test]
fn test_font_matching() {
    let mut fonts = FontMatcher::new([
        FontName::new("OpenSans", "Regular"),
        FontName::new("Inter", "Bold"),
        FontName::new("Inter", "Regular"),
    ]);

    assert_eq!(fonts.resolve("'Open Sans', Arial"), FontName::new("OpenSans", "Regular"));
    assert_eq!(fonts.resolve("Helvetica, INTER"), FontName::new("Inter", "Regular"));
    assert_eq!(fonts.resolve("Comic Sans MS"), FontName::fallback());
    assert_eq!(fonts.resolve("'Open Sans', Arial"), FontName::new("OpenSans", "Regular"));
}
