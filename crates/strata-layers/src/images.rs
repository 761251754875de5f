//! Image paint resolution.
//!
//! Image paints leave synthesis as URLs. This pass turns them into bytes, or
//! into `Svg` layers when the resource is SVG markup:
//!
//! 1. **Collect** every distinct URL in the tree.
//! 2. **Load** them concurrently with rayon through an [`ImageFetcher`].
//! 3. **Apply** the results on the calling thread. Failures are reported and
//!    leave the paint as a URL.

use std::collections::{BTreeSet, HashMap};

use rayon::prelude::*;
use strata_common::net::{DataURL, FetchedResource, fetch_resource};
use strata_dom::Rect;

use crate::error::ImageError;
use crate::issue::{ConversionIssue, report};
use crate::layer::{ConstraintType, Constraints, ImageSource, LayerKind, LayerNode, Paint};
use crate::options::PaintOrder;

const SVG_CONSTRAINTS: Constraints = Constraints {
    horizontal: ConstraintType::Center,
    vertical: ConstraintType::Min,
};

/// Source of image bytes. Shared across rayon workers.
pub trait ImageFetcher: Sync {
    /// Fetch a non-`data:` URL.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError`] when the resource cannot be retrieved.
    fn fetch(&self, url: &str) -> Result<FetchedResource, ImageError>;
}

/// Blocking HTTP fetcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpFetcher;

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedResource, ImageError> {
        Ok(fetch_resource(url)?)
    }
}

/// A loaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedImage {
    /// SVG markup, exported as a vector layer.
    Svg(String),
    /// Encoded raster bytes.
    Bytes(Vec<u8>),
}

/// Load one image URL.
///
/// `data:` URLs are decoded locally: SVG media types become markup, other
/// base64 payloads become bytes. Anything else goes through `fetcher` and is
/// treated as SVG when the extension, content type or leading bytes say so.
///
/// # Errors
///
/// Returns [`ImageError`] when fetching or decoding fails, or for a
/// non-SVG `data:` URL that is not base64.
pub fn load_image(fetcher: &dyn ImageFetcher, url: &str) -> Result<LoadedImage, ImageError> {
    if url.starts_with("data:") {
        let data = DataURL::parse(url)?;
        if data.media_type().contains("svg") {
            return Ok(LoadedImage::Svg(data.decode_text()?));
        }
        if data.is_base64() {
            return Ok(LoadedImage::Bytes(data.decode()?));
        }
        return Err(ImageError::UnsupportedDataUrl(data.media_type().to_string()));
    }

    let resource = fetcher.fetch(url)?;
    if is_svg(url, &resource) {
        let markup =
            String::from_utf8(resource.bytes).map_err(|e| ImageError::InvalidSvg(e.to_string()))?;
        Ok(LoadedImage::Svg(markup))
    } else {
        Ok(LoadedImage::Bytes(resource.bytes))
    }
}

/// SVG detection for a fetched resource.
///
/// 1. **Extension**: the URL path ends in `.svg`.
/// 2. **Content type**: the server reported an SVG media type.
/// 3. **Sniffing**: after leading whitespace, the body starts with `<?xml`
///    or `<svg`.
#[must_use]
pub fn is_svg(url: &str, resource: &FetchedResource) -> bool {
    let path = url.split_once('#').map_or(url, |(before, _)| before);
    let path = path.split_once('?').map_or(path, |(before, _)| before);
    if std::path::Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
    {
        return true;
    }

    if resource.is_svg_content_type() {
        return true;
    }

    let head: Vec<u8> = resource
        .bytes
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .take(256)
        .copied()
        .collect();
    head.starts_with(b"<?xml") || head.starts_with(b"<svg")
}

/// Resolve every image paint in `layers`.
///
/// A layer whose image turns out to be SVG becomes an `Svg` layer, or gains
/// an `Svg` child covering it when it already has children. Failed images
/// are returned as issues.
pub fn resolve_images(
    layers: &mut [LayerNode],
    fetcher: &dyn ImageFetcher,
    order: PaintOrder,
) -> Vec<ConversionIssue> {
    let mut urls = BTreeSet::new();
    for layer in layers.iter() {
        layer.walk(&mut |node| {
            for paint in &node.fills {
                if let Paint::Image {
                    source: ImageSource::Url(url),
                    ..
                } = paint
                {
                    let _ = urls.insert(url.clone());
                }
            }
        });
    }

    let results: Vec<(String, Result<LoadedImage, ImageError>)> = urls
        .into_par_iter()
        .map(|url| {
            let loaded = load_image(fetcher, &url);
            (url, loaded)
        })
        .collect();

    let mut issues = Vec::new();
    let mut loaded = HashMap::new();
    for (url, result) in results {
        match result {
            Ok(image) => {
                let _ = loaded.insert(url, image);
            }
            Err(err) => report(&mut issues, "images", format!("failed to load {url}: {err}")),
        }
    }

    for layer in layers.iter_mut() {
        apply(layer, &loaded, order);
    }
    issues
}

fn apply(layer: &mut LayerNode, loaded: &HashMap<String, LoadedImage>, order: PaintOrder) {
    let mut svg = None;
    layer.fills.retain_mut(|paint| {
        let Paint::Image { source, .. } = paint else {
            return true;
        };
        let ImageSource::Url(url) = source else {
            return true;
        };
        match loaded.get(url.as_str()) {
            Some(LoadedImage::Bytes(bytes)) => {
                *source = ImageSource::Bytes(bytes.clone());
                true
            }
            Some(LoadedImage::Svg(markup)) => {
                svg = Some(markup.clone());
                false
            }
            None => true,
        }
    });

    if let Some(svg) = svg {
        if layer.children.is_empty() && !matches!(layer.kind, LayerKind::Text(_)) {
            layer.kind = LayerKind::Svg { svg };
            layer.constraints = Some(SVG_CONSTRAINTS);
        } else {
            let mut child = LayerNode::new(
                LayerKind::Svg { svg },
                &Rect::new(0.0, 0.0, layer.width, layer.height),
            );
            child.constraints = Some(SVG_CONSTRAINTS);
            match order {
                PaintOrder::TopmostFirst => layer.children.push(child),
                PaintOrder::BottommostFirst => layer.children.insert(0, child),
            }
        }
    }

    for child in &mut layer.children {
        apply(child, loaded, order);
    }
}
