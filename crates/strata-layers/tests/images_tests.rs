//! Integration tests for image resolution with an in-memory fetcher.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use strata_common::net::{FetchError, FetchedResource};
use strata_dom::Rect;
use strata_layers::ImageError;
use strata_layers::images::{ImageFetcher, LoadedImage, is_svg, load_image, resolve_images};
use strata_layers::layer::{ImageSource, LayerKind, LayerNode, Paint, ScaleMode};
use strata_layers::options::PaintOrder;

const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgo=";
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const SVG_DATA_URL: &str = "data:image/svg+xml,%3Csvg%20xmlns%3D%22http%3A%2F%2Fwww.w3.org%2F2000%2Fsvg%22%2F%3E";

/// Serves canned resources and counts requests.
#[derive(Default)]
struct MockFetcher {
    resources: HashMap<String, FetchedResource>,
    requests: AtomicUsize,
}

impl MockFetcher {
    fn with(mut self, url: &str, bytes: &[u8], content_type: Option<&str>) -> Self {
        let _ = self.resources.insert(
            url.to_string(),
            FetchedResource {
                bytes: bytes.to_vec(),
                content_type: content_type.map(str::to_string),
            },
        );
        self
    }
}

impl ImageFetcher for MockFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedResource, ImageError> {
        let _ = self.requests.fetch_add(1, Ordering::SeqCst);
        self.resources
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status(format!("404 Not Found for {url}")).into())
    }
}

fn image_layer(url: &str) -> LayerNode {
    let mut layer = LayerNode::frame(&Rect::new(10.0, 10.0, 64.0, 48.0), false);
    layer.fills.push(Paint::Image {
        source: ImageSource::Url(url.to_string()),
        scale_mode: ScaleMode::Fill,
    });
    layer
}

#[test]
fn test_raster_url_becomes_bytes() {
    let fetcher = MockFetcher::default().with("https://a.test/cat.png", &PNG_SIGNATURE, Some("image/png"));
    let mut layers = vec![image_layer("https://a.test/cat.png")];
    let issues = resolve_images(&mut layers, &fetcher, PaintOrder::TopmostFirst);

    assert!(issues.is_empty());
    assert_eq!(
        layers[0].fills[0],
        Paint::Image {
            source: ImageSource::Bytes(PNG_SIGNATURE.to_vec()),
            scale_mode: ScaleMode::Fill,
        }
    );
}

#[test]
fn test_each_url_is_fetched_once() {
    let fetcher = MockFetcher::default().with("https://a.test/dot.png", &PNG_SIGNATURE, None);
    let mut root = LayerNode::frame(&Rect::new(0.0, 0.0, 100.0, 100.0), false);
    root.children = vec![image_layer("https://a.test/dot.png"), image_layer("https://a.test/dot.png")];
    let mut layers = vec![root];
    let issues = resolve_images(&mut layers, &fetcher, PaintOrder::TopmostFirst);

    assert!(issues.is_empty());
    assert_eq!(fetcher.requests.load(Ordering::SeqCst), 1);
    assert!(
        layers[0]
            .children
            .iter()
            .all(|c| matches!(&c.fills[0], Paint::Image { source: ImageSource::Bytes(_), .. }))
    );
}

#[test]
fn test_data_urls_never_hit_the_fetcher() {
    let fetcher = MockFetcher::default();
    assert_eq!(
        load_image(&fetcher, PNG_DATA_URL).unwrap(),
        LoadedImage::Bytes(PNG_SIGNATURE.to_vec())
    );
    assert_eq!(
        load_image(&fetcher, SVG_DATA_URL).unwrap(),
        LoadedImage::Svg("<svg xmlns=\"http://www.w3.org/2000/svg\"/>".to_string())
    );
    assert!(matches!(
        load_image(&fetcher, "data:image/png,raw"),
        Err(ImageError::UnsupportedDataUrl(_))
    ));
    assert_eq!(fetcher.requests.load(Ordering::SeqCst), 0);
}

#[test]
fn test_svg_image_on_leaf_becomes_svg_layer() {
    let fetcher = MockFetcher::default();
    let mut layers = vec![image_layer(SVG_DATA_URL)];
    let issues = resolve_images(&mut layers, &fetcher, PaintOrder::TopmostFirst);

    assert!(issues.is_empty());
    let layer = &layers[0];
    assert!(matches!(&layer.kind, LayerKind::Svg { svg } if svg.starts_with("<svg")));
    assert!(layer.fills.is_empty());
    assert_eq!((layer.x, layer.y, layer.width, layer.height), (10.0, 10.0, 64.0, 48.0));
}

#[test]
fn test_svg_image_on_container_adds_child() {
    let fetcher =
        MockFetcher::default().with("https://a.test/icons/logo.svg?v=2", b"<svg/>", Some("text/plain"));
    let mut layer = image_layer("https://a.test/icons/logo.svg?v=2");
    layer.children.push(LayerNode::frame(&Rect::new(0.0, 0.0, 5.0, 5.0), false));

    let mut layers = vec![layer.clone()];
    let issues = resolve_images(&mut layers, &fetcher, PaintOrder::TopmostFirst);
    assert!(issues.is_empty());
    let resolved = &layers[0];
    assert!(matches!(resolved.kind, LayerKind::Frame { .. }));
    assert_eq!(resolved.children.len(), 2);
    let svg = &resolved.children[1];
    assert!(matches!(svg.kind, LayerKind::Svg { .. }));
    assert_eq!((svg.x, svg.y, svg.width, svg.height), (0.0, 0.0, 64.0, 48.0));

    let mut layers = vec![layer];
    let _ = resolve_images(&mut layers, &fetcher, PaintOrder::BottommostFirst);
    assert!(matches!(layers[0].children[0].kind, LayerKind::Svg { .. }));
}

#[test]
fn test_failed_image_is_reported_and_kept() {
    let fetcher = MockFetcher::default();
    let mut layers = vec![image_layer("https://a.test/missing.png")];
    let issues = resolve_images(&mut layers, &fetcher, PaintOrder::TopmostFirst);

    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].component, "images");
    assert!(issues[0].message.contains("https://a.test/missing.png"));
    assert_eq!(
        layers[0].fills[0],
        Paint::Image {
            source: ImageSource::Url("https://a.test/missing.png".to_string()),
            scale_mode: ScaleMode::Fill,
        }
    );
}

#[test]
fn test_svg_detection() {
    let resource = |bytes: &[u8], content_type: Option<&str>| FetchedResource {
        bytes: bytes.to_vec(),
        content_type: content_type.map(str::to_string),
    };
    assert!(is_svg("https://a.test/x.SVG#frag", &resource(b"", None)));
    assert!(is_svg("https://a.test/x", &resource(b"", Some("image/svg+xml"))));
    assert!(is_svg("https://a.test/x", &resource(b"\n  <?xml version=\"1.0\"?>", None)));
    assert!(is_svg("https://a.test/x", &resource(b"<svg></svg>", None)));
    assert!(!is_svg("https://a.test/x.png", &resource(&PNG_SIGNATURE, Some("image/png"))));
}
