//! The layer model handed to a design canvas.
//!
//! [`LayerNode`] is the public, serializable output. [`MetaLayer`] wraps it
//! during assembly with the bookkeeping (source node, z-index, pseudo and
//! border sub-layers) that the normalizer folds away.

use std::collections::BTreeMap;

use serde::Serialize;
use strata_css::Rgba;
use strata_dom::{NodeId, Rect};

use crate::context::Pseudo;

/// An sRGB color without alpha. Opacity travels separately on the paint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    /// Red, `0.0..=1.0`.
    pub r: f64,
    /// Green, `0.0..=1.0`.
    pub g: f64,
    /// Blue, `0.0..=1.0`.
    pub b: f64,
}

/// How an image fills its layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScaleMode {
    /// Letterboxed, whole image visible.
    Fit,
    /// Cropped to cover the layer.
    Fill,
}

/// Where an image paint's pixels come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ImageSource {
    /// Not yet fetched.
    #[serde(rename = "url")]
    Url(String),
    /// Encoded image bytes.
    #[serde(rename = "intArr")]
    Bytes(Vec<u8>),
}

/// A fill or stroke.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Paint {
    /// A flat color.
    Solid {
        /// Paint color.
        color: Color,
        /// Paint opacity, `0.0..=1.0`.
        opacity: f64,
    },
    /// A raster image.
    Image {
        /// URL or bytes.
        #[serde(flatten)]
        source: ImageSource,
        /// Fit or fill.
        scale_mode: ScaleMode,
    },
}

impl Paint {
    /// A solid paint from a parsed CSS color.
    #[must_use]
    pub fn solid(color: Rgba) -> Self {
        Self::Solid {
            color: Color {
                r: color.r,
                g: color.g,
                b: color.b,
            },
            opacity: color.a,
        }
    }

    /// Whether this is an image paint.
    #[must_use]
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }
}

/// A 2D offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vector {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

/// Parameters shared by drop and inner shadows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shadow {
    /// Shadow color with alpha.
    pub color: Rgba,
    /// Blur radius.
    pub radius: f64,
    /// Spread. Zero for inner shadows.
    pub spread: f64,
    /// Offset from the layer.
    pub offset: Vector,
}

/// A layer effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    /// `box-shadow` without `inset`.
    DropShadow(Shadow),
    /// `box-shadow` with `inset`.
    InnerShadow(Shadow),
}

impl Effect {
    /// The effect's spread.
    #[must_use]
    pub fn spread(&self) -> f64 {
        match self {
            Self::DropShadow(shadow) | Self::InnerShadow(shadow) => shadow.spread,
        }
    }
}

/// Anchoring on one axis when the parent resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintType {
    /// Pinned to the left/top edge.
    Min,
    /// Pinned to the center.
    Center,
    /// Pinned to the right/bottom edge.
    Max,
    /// Scales with the parent.
    Scale,
}

/// Horizontal and vertical anchoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Constraints {
    /// Horizontal rule.
    pub horizontal: ConstraintType,
    /// Vertical rule.
    pub vertical: ConstraintType,
}

impl Constraints {
    /// `{SCALE, MIN}`: the rule for layers without a usable source.
    pub const DEFAULT: Self = Self {
        horizontal: ConstraintType::Scale,
        vertical: ConstraintType::Min,
    };
}

/// Unit tag for [`PixelValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Unit {
    /// CSS pixels.
    Pixels,
}

/// A length in pixels, as design canvases spell it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelValue {
    /// Always `PIXELS`.
    pub unit: Unit,
    /// Length.
    pub value: f64,
}

impl PixelValue {
    /// A pixel length.
    #[must_use]
    pub fn px(value: f64) -> Self {
        Self {
            unit: Unit::Pixels,
            value,
        }
    }
}

/// `text-transform` mapped to the canvas text case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextCase {
    /// `uppercase`
    Upper,
    /// `lowercase`
    Lower,
    /// `capitalize`
    Title,
}

/// `text-decoration` mapped to the canvas decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextDecoration {
    /// `underline`
    Underline,
    /// `line-through`
    Strikethrough,
}

/// `text-align` mapped to the canvas horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlign {
    /// `left`
    Left,
    /// `center`
    Center,
    /// `right`
    Right,
    /// `justify`
    Justified,
}

/// Text-specific fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    /// Whitespace-collapsed text.
    pub characters: String,
    /// Rounded font size in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Raw `font-family` list; matched against host fonts at materialization.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Letter spacing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<PixelValue>,
    /// Line height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<PixelValue>,
    /// Text case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_case: Option<TextCase>,
    /// Decoration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    /// Horizontal alignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_horizontal: Option<TextAlign>,
}

/// Layer variant with its variant-specific fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum LayerKind {
    /// A container that may clip its children.
    Frame {
        /// Clip children to the frame bounds.
        clips_content: bool,
    },
    /// A filled box.
    Rectangle,
    /// A run of text.
    Text(TextProps),
    /// Vector markup.
    Svg {
        /// Serialized `<svg>` element.
        svg: String,
    },
    /// A non-clipping container.
    Group,
}

impl LayerKind {
    /// The serialized `type` tag.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Frame { .. } => "FRAME",
            Self::Rectangle => "RECTANGLE",
            Self::Text(_) => "TEXT",
            Self::Svg { .. } => "SVG",
            Self::Group => "GROUP",
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

/// One node of the output tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerNode {
    /// Variant and its fields.
    #[serde(flatten)]
    pub kind: LayerKind,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Left edge: document-absolute before normalization, parent-relative after.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Fills, bottom first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<Paint>,
    /// Strokes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub strokes: Vec<Paint>,
    /// Stroke weight in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_weight: Option<f64>,
    /// Shadows in source order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
    /// Top-left corner radius.
    #[serde(skip_serializing_if = "is_zero")]
    pub top_left_radius: f64,
    /// Top-right corner radius.
    #[serde(skip_serializing_if = "is_zero")]
    pub top_right_radius: f64,
    /// Bottom-right corner radius.
    #[serde(skip_serializing_if = "is_zero")]
    pub bottom_right_radius: f64,
    /// Bottom-left corner radius.
    #[serde(skip_serializing_if = "is_zero")]
    pub bottom_left_radius: f64,
    /// Layer opacity when below 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Anchoring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
    /// Plugin data: `position`, `widthType`, `heightType`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
    /// Children, ordered by paint order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayerNode>,
    /// Set once this node's offset has been subtracted from its descendants.
    #[serde(skip)]
    pub offsets_resolved: bool,
}

impl LayerNode {
    /// A layer of `kind` covering `rect`, rounded to whole pixels.
    #[must_use]
    pub fn new(kind: LayerKind, rect: &Rect) -> Self {
        let rect = rect.rounded();
        Self {
            kind,
            name: None,
            x: rect.left,
            y: rect.top,
            width: rect.width,
            height: rect.height,
            fills: Vec::new(),
            strokes: Vec::new(),
            stroke_weight: None,
            effects: Vec::new(),
            top_left_radius: 0.0,
            top_right_radius: 0.0,
            bottom_right_radius: 0.0,
            bottom_left_radius: 0.0,
            opacity: None,
            constraints: None,
            data: BTreeMap::new(),
            children: Vec::new(),
            offsets_resolved: false,
        }
    }

    /// A frame covering `rect`.
    #[must_use]
    pub fn frame(rect: &Rect, clips_content: bool) -> Self {
        Self::new(LayerKind::Frame { clips_content }, rect)
    }

    /// Set the display name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Frames and groups hold children.
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(self.kind, LayerKind::Frame { .. } | LayerKind::Group)
    }

    /// `clipsContent` for frames, `false` otherwise.
    #[must_use]
    pub fn clips_content(&self) -> bool {
        matches!(self.kind, LayerKind::Frame { clips_content: true })
    }

    /// Force a frame to clip.
    pub fn set_clips_content(&mut self) {
        if let LayerKind::Frame { clips_content } = &mut self.kind {
            *clips_content = true;
        }
    }

    /// Text fields, for text layers.
    #[must_use]
    pub fn text(&self) -> Option<&TextProps> {
        match &self.kind {
            LayerKind::Text(props) => Some(props),
            _ => None,
        }
    }

    /// The layer's box.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Pre-order visit of this node and all descendants.
    pub fn walk(&self, visit: &mut impl FnMut(&Self)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Number of nodes in this subtree.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }
}

/// Back-reference from a layer to what produced it. Assembly only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceRef {
    /// Element or text node.
    pub node: NodeId,
    /// Set for `::before`/`::after` layers.
    pub pseudo: Option<Pseudo>,
}

impl SourceRef {
    /// A source for a real node.
    #[must_use]
    pub fn node(node: NodeId) -> Self {
        Self { node, pseudo: None }
    }
}

/// A layer plus its assembly-time bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaLayer {
    /// The layer itself. Its `children` stay empty until folding.
    pub layer: LayerNode,
    /// What produced the layer.
    pub source: Option<SourceRef>,
    /// Stacking hint from `z-index`.
    pub z_index: i32,
    /// `::before` sub-layer.
    pub before: Option<Box<MetaLayer>>,
    /// `::after` sub-layer.
    pub after: Option<Box<MetaLayer>>,
    /// The `::borders` frame holding border pins.
    pub borders: Option<Box<MetaLayer>>,
    /// Text of a form control.
    pub text_value: Option<Box<MetaLayer>>,
    /// Structural children.
    pub children: Vec<MetaLayer>,
}

impl MetaLayer {
    /// Wrap a layer with no bookkeeping.
    #[must_use]
    pub fn new(layer: LayerNode) -> Self {
        Self {
            layer,
            source: None,
            z_index: 0,
            before: None,
            after: None,
            borders: None,
            text_value: None,
            children: Vec::new(),
        }
    }

    /// Attach a source reference.
    #[must_use]
    pub fn with_source(mut self, source: SourceRef) -> Self {
        self.source = Some(source);
        self
    }

    /// Move `before`, `text_value`, `borders` and `after` into `children`.
    ///
    /// Order: `before`, text value, structural children, borders, `after`.
    /// Running it again is a no-op.
    pub fn fold_children(&mut self) {
        let mut folded = Vec::with_capacity(self.children.len() + 4);
        folded.extend(self.before.take().map(|b| *b));
        folded.extend(self.text_value.take().map(|t| *t));
        folded.append(&mut self.children);
        folded.extend(self.borders.take().map(|b| *b));
        folded.extend(self.after.take().map(|a| *a));
        self.children = folded;
    }

    /// Every meta layer in this subtree, including unfolded sub-layers.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Self)) {
        visit(self);
        for part in [
            &mut self.before,
            &mut self.text_value,
            &mut self.borders,
            &mut self.after,
        ]
        .into_iter()
        .flatten()
        {
            part.walk_mut(visit);
        }
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }

    /// Fold and strip bookkeeping, producing the public tree.
    #[must_use]
    pub fn into_layer(mut self) -> LayerNode {
        self.fold_children();
        let mut layer = self.layer;
        layer.children = self
            .children
            .into_iter()
            .map(Self::into_layer)
            .collect();
        layer
    }
}
