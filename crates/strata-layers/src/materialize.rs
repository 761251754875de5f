//! Host canvas boundary.
//!
//! The compiler never talks to a design tool directly. A host implements
//! [`HostCanvas`]; [`materialize`] walks the layer tree and asks it to create
//! one node per layer. A layer that fails is reported and skipped. Its
//! children still materialize, attached to the nearest ancestor that
//! succeeded, with the failed layer's offset folded into their position.

use std::collections::HashMap;

use crate::error::MaterializeError;
use crate::layer::{ImageSource, LayerNode, Paint};

/// A font as the host names it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontName {
    /// Family, e.g. `Roboto`.
    pub family: String,
    /// Style, e.g. `Regular`.
    pub style: String,
}

impl FontName {
    /// A font name.
    #[must_use]
    pub fn new(family: &str, style: &str) -> Self {
        Self {
            family: family.to_string(),
            style: style.to_string(),
        }
    }

    /// `Roboto Regular`, used when no family in a list matches.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new("Roboto", "Regular")
    }
}

/// Host-side handle for an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageHandle(pub String);

/// Everything the host needs to create one node.
#[derive(Debug)]
pub struct NodeRequest<'a, N> {
    /// The layer. Its `x`/`y` are relative to its layer parent.
    pub layer: &'a LayerNode,
    /// The host node to attach to, or `None` for the host's base frame.
    pub parent: Option<&'a N>,
    /// Position relative to `parent`.
    pub x: f64,
    /// Position relative to `parent`.
    pub y: f64,
    /// Resolved font for text layers.
    pub font: Option<FontName>,
    /// Handles for the layer's byte-backed image fills, in fill order.
    pub images: Vec<ImageHandle>,
}

/// A design canvas that can create nodes, fonts and images.
pub trait HostCanvas {
    /// The host's node handle.
    type Node;

    /// Pick a font for a CSS `font-family` list.
    fn resolve_font(&mut self, family_list: &str) -> FontName;

    /// Upload encoded image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`MaterializeError::Host`] when the host rejects the image.
    fn create_image(&mut self, bytes: &[u8]) -> Result<ImageHandle, MaterializeError>;

    /// Create and attach one node.
    ///
    /// # Errors
    ///
    /// Returns [`MaterializeError`] when the host cannot create the node.
    fn create_node(
        &mut self,
        request: NodeRequest<'_, Self::Node>,
    ) -> Result<Self::Node, MaterializeError>;
}

/// A layer that could not be materialized.
#[derive(Debug)]
pub struct LayerFailure {
    /// The layer's name, or its type when unnamed.
    pub layer: String,
    /// Why it failed.
    pub error: MaterializeError,
}

/// Result of a [`materialize`] run.
#[derive(Debug, Default)]
pub struct MaterializeReport {
    /// Nodes created.
    pub created: usize,
    /// Layers that failed, in traversal order.
    pub failures: Vec<LayerFailure>,
}

/// Create host nodes for every layer of every tree in `layers`.
pub fn materialize<H: HostCanvas>(layers: &[LayerNode], host: &mut H) -> MaterializeReport {
    let mut report = MaterializeReport::default();
    for layer in layers {
        visit(layer, None, (0.0, 0.0), host, &mut report);
    }
    report
}

fn visit<H: HostCanvas>(
    layer: &LayerNode,
    parent: Option<&H::Node>,
    offset: (f64, f64),
    host: &mut H,
    report: &mut MaterializeReport,
) {
    match create(layer, parent, offset, host) {
        Ok(node) => {
            report.created += 1;
            for child in &layer.children {
                visit(child, Some(&node), (0.0, 0.0), host, report);
            }
        }
        Err(error) => {
            report.failures.push(LayerFailure {
                layer: layer_label(layer),
                error,
            });
            // Children keep their place on the canvas when their parent is lost.
            let offset = if layer.x.is_finite() && layer.y.is_finite() {
                (offset.0 + layer.x, offset.1 + layer.y)
            } else {
                offset
            };
            for child in &layer.children {
                visit(child, parent, offset, host, report);
            }
        }
    }
}

fn create<H: HostCanvas>(
    layer: &LayerNode,
    parent: Option<&H::Node>,
    offset: (f64, f64),
    host: &mut H,
) -> Result<H::Node, MaterializeError> {
    if !layer.x.is_finite() || !layer.y.is_finite() {
        return Err(MaterializeError::InvalidCoordinates {
            x: layer.x,
            y: layer.y,
        });
    }

    let font = layer
        .text()
        .and_then(|text| text.font_family.as_deref())
        .map(|family| host.resolve_font(family));

    let images = layer
        .fills
        .iter()
        .filter_map(|paint| match paint {
            Paint::Image {
                source: ImageSource::Bytes(bytes),
                ..
            } => Some(bytes),
            _ => None,
        })
        .map(|bytes| host.create_image(bytes))
        .collect::<Result<Vec<_>, _>>()?;

    host.create_node(NodeRequest {
        layer,
        parent,
        x: offset.0 + layer.x,
        y: offset.1 + layer.y,
        font,
        images,
    })
}

fn layer_label(layer: &LayerNode) -> String {
    layer
        .name
        .clone()
        .unwrap_or_else(|| layer.kind.type_name().to_string())
}

/// Matches CSS `font-family` lists against the host's fonts.
///
/// Only `Regular` styles are considered. Names compare by their ASCII letters,
/// case-insensitively, so `"Open Sans"` matches `OpenSans`. Results are
/// cached per list.
#[derive(Debug, Clone, Default)]
pub struct FontMatcher {
    available: Vec<FontName>,
    cache: HashMap<String, FontName>,
}

impl FontMatcher {
    /// A matcher over the host's available fonts.
    pub fn new(available: impl IntoIterator<Item = FontName>) -> Self {
        Self {
            available: available
                .into_iter()
                .filter(|font| font.style == "Regular")
                .collect(),
            cache: HashMap::new(),
        }
    }

    /// The first family in the list the host has, else [`FontName::fallback`].
    pub fn resolve(&mut self, family_list: &str) -> FontName {
        if let Some(cached) = self.cache.get(family_list) {
            return cached.clone();
        }

        let found = family_list
            .split(',')
            .map(normalize_font_name)
            .find_map(|wanted| {
                self.available
                    .iter()
                    .find(|font| normalize_font_name(&font.family) == wanted)
                    .cloned()
            });

        match found {
            Some(font) => {
                let _ = self.cache.insert(family_list.to_string(), font.clone());
                font
            }
            None => FontName::fallback(),
        }
    }
}

fn normalize_font_name(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
