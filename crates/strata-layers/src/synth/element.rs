//! Element synthesis: frames, paints, borders and pseudo-elements.

use strata_common::url::{first_srcset_candidate, resolve_url};
use strata_css::{Corner, extract_url, parse_box_shadows};
use strata_dom::NodeId;

use super::border::{get_border, get_border_pins};
use super::svg::svg_to_layer;
use super::text::form_control_text;
use crate::context::{Pseudo, StyleContext};
use crate::geometry::{is_visible, resolve_rect};
use crate::kind::ElementKind;
use crate::layer::{
    Effect, ImageSource, LayerNode, MetaLayer, Paint, ScaleMode, Shadow, SourceRef, Vector,
};
use crate::options::ConvertOptions;
use crate::style::{StyleProperty, extract_applied_styles};

/// What one element contributes before assembly.
#[derive(Debug, Default)]
pub struct ElementLayers {
    /// The element's own layer, with pseudo, border and text sub-layers
    /// attached.
    pub primary: Option<MetaLayer>,
    /// Sub-layers that had no primary layer to attach to.
    pub detached: Vec<MetaLayer>,
}

impl ElementLayers {
    /// Whether the element contributes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.detached.is_empty()
    }

    /// Every layer, primary first.
    pub fn into_layers(self) -> impl Iterator<Item = MetaLayer> {
        self.primary.into_iter().chain(self.detached)
    }
}

/// Synthesize the layers for one element.
///
/// Hidden elements, SVG descendants and the children of `<picture>` produce
/// nothing. SVG roots become a single `Svg` layer. Everything else gets a
/// frame when it paints something (or is media) and covers at least a pixel;
/// `::before`/`::after` boxes and form-control text attach to that frame.
pub fn element_to_layers(
    ctx: &dyn StyleContext,
    node: NodeId,
    options: &ConvertOptions,
) -> ElementLayers {
    let mut out = ElementLayers::default();
    if ctx.dom().as_element(node).is_none() || !is_visible(ctx, node, None) {
        return out;
    }

    let kind = ElementKind::of(ctx, node);
    match kind {
        ElementKind::SvgRoot => {
            out.primary = svg_to_layer(ctx, node);
            return out;
        }
        ElementKind::SvgChild => return out,
        _ => {}
    }
    let in_picture = ctx
        .dom()
        .parent_element(node)
        .and_then(|p| ctx.dom().as_element(p))
        .is_some_and(|p| p.is("picture"));
    if in_picture {
        return out;
    }

    let mut primary = box_layer(ctx, node, None, kind, options);

    for pseudo in Pseudo::ALL {
        if !ctx.computed_style(node, Some(pseudo)).generates_content()
            || !is_visible(ctx, node, Some(pseudo))
        {
            continue;
        }
        let Some(layer) = box_layer(ctx, node, Some(pseudo), ElementKind::Generic, options) else {
            continue;
        };
        match primary.as_mut() {
            Some(owner) if pseudo == Pseudo::Before => owner.before = Some(Box::new(layer)),
            Some(owner) => owner.after = Some(Box::new(layer)),
            None => out.detached.push(layer),
        }
    }

    if kind.is_form_control() {
        if let Some(text) = form_control_text(ctx, node, options) {
            match primary.as_mut() {
                Some(owner) => owner.text_value = Some(Box::new(text)),
                None => out.detached.push(text),
            }
        }
    }

    out.primary = primary;
    out
}

/// The frame for an element or pseudo-element box.
fn box_layer(
    ctx: &dyn StyleContext,
    node: NodeId,
    pseudo: Option<Pseudo>,
    kind: ElementKind,
    options: &ConvertOptions,
) -> Option<MetaLayer> {
    let element = ctx.dom().as_element(node)?;
    let snapshot = extract_applied_styles(ctx, node, pseudo);
    let style = ctx.computed_style(node, pseudo);
    if (snapshot.is_empty() && !kind.is_media()) || style.is_display_none() {
        return None;
    }
    let rect = resolve_rect(ctx, node, pseudo, options.aggregate_inline_rects)?;

    let name = pseudo.map_or_else(|| element.tag_name.clone(), |p| p.layer_name().to_string());
    let mut layer = LayerNode::frame(&rect, style.clips_overflow()).named(name);

    if let Some(background) = style
        .color("background-color")
        .filter(|c| !c.is_transparent())
    {
        layer.fills.push(Paint::solid(background));
    }

    let opacity = style.opacity();
    if opacity < 1.0 {
        layer.opacity = Some(opacity);
    }

    let mut borders = None;
    if let Some((stroke, weight)) = get_border(style) {
        layer.strokes.push(stroke);
        layer.stroke_weight = Some(weight);
    } else {
        borders = get_border_pins(style, &rect);
    }

    if let Some(url) = snapshot
        .get(StyleProperty::BackgroundImage)
        .and_then(extract_url)
    {
        let scale_mode = if style.value("background-size") == "contain" {
            ScaleMode::Fit
        } else {
            ScaleMode::Fill
        };
        layer.fills.push(image_paint(ctx, &url, scale_mode));
    }

    if pseudo.is_none() {
        if let Some(url) = media_url(ctx, node, kind) {
            let scale_mode = if style.value("object-fit") == "contain" {
                ScaleMode::Fit
            } else {
                ScaleMode::Fill
            };
            layer.fills.push(image_paint(ctx, &url, scale_mode));
        }
    }

    for shadow in parse_box_shadows(style.value("box-shadow")) {
        let params = Shadow {
            color: shadow.color,
            radius: shadow.blur_radius,
            spread: shadow.spread_radius,
            offset: Vector {
                x: shadow.offset_x,
                y: shadow.offset_y,
            },
        };
        layer.effects.push(if shadow.inset {
            Effect::InnerShadow(params)
        } else {
            Effect::DropShadow(params)
        });
    }
    // Any spread clips the frame.
    if layer.effects.iter().any(|e| e.spread() != 0.0) {
        layer.set_clips_content();
    }

    let height = rect.height;
    layer.top_left_radius = style.corner_radius(Corner::TopLeft, height);
    layer.top_right_radius = style.corner_radius(Corner::TopRight, height);
    layer.bottom_right_radius = style.corner_radius(Corner::BottomRight, height);
    layer.bottom_left_radius = style.corner_radius(Corner::BottomLeft, height);

    let mut meta = MetaLayer::new(layer).with_source(SourceRef { node, pseudo });
    meta.z_index = style.z_index().unwrap_or(0);
    meta.borders = borders.map(Box::new);
    Some(meta)
}

/// The image URL carried by `<img>`, `<picture>` or `<video>`.
fn media_url(ctx: &dyn StyleContext, node: NodeId, kind: ElementKind) -> Option<String> {
    let dom = ctx.dom();
    let element = dom.as_element(node)?;
    let url = match kind {
        ElementKind::Image => element
            .attr("src")
            .or_else(|| element.attr("srcset").and_then(first_srcset_candidate)),
        ElementKind::Picture => dom
            .descendants(node)
            .into_iter()
            .filter_map(|id| dom.as_element(id))
            .find(|el| el.is("source"))
            .and_then(|source| source.attr("srcset"))
            .and_then(first_srcset_candidate),
        ElementKind::Video => element.attr("poster"),
        _ => None,
    }?;
    let url = url.trim();
    (!url.is_empty()).then(|| url.to_string())
}

fn image_paint(ctx: &dyn StyleContext, url: &str, scale_mode: ScaleMode) -> Paint {
    Paint::Image {
        source: ImageSource::Url(resolve_url(url, ctx.base_url())),
        scale_mode,
    }
}
