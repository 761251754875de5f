//! Text layers for text nodes and form-control values.

use strata_css::{ComputedStyle, Rgba, Side};
use strata_dom::{NodeId, Rect};

use crate::context::StyleContext;
use crate::geometry::is_visible;
use crate::kind::ElementKind;
use crate::layer::{
    LayerKind, LayerNode, MetaLayer, Paint, PixelValue, SourceRef, TextAlign, TextCase,
    TextDecoration, TextProps,
};
use crate::options::ConvertOptions;

/// Collapse runs of whitespace to single spaces and trim.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A `Text` layer for a DOM text node, styled by its parent element.
///
/// Nothing is produced for whitespace-only text, text whose parent is hidden,
/// text inside SVG or form controls (their markup or value covers it), or a
/// range rect under one pixel.
pub fn text_to_layer(ctx: &dyn StyleContext, node: NodeId) -> Option<MetaLayer> {
    let dom = ctx.dom();
    let characters = collapse_whitespace(dom.as_text(node)?);
    if characters.is_empty() {
        return None;
    }

    let parent = dom.parent_element(node)?;
    let parent_kind = ElementKind::of(ctx, parent);
    if matches!(parent_kind, ElementKind::SvgRoot | ElementKind::SvgChild)
        || parent_kind.is_form_control()
    {
        return None;
    }
    if !is_visible(ctx, parent, None) {
        return None;
    }

    let style = ctx.computed_style(parent, None);
    let rect = ctx.text_rect(node)?;
    let line_height = line_height(style, None);
    let rect = fit_line_height(rect, line_height);
    let color = style.color("color");

    build(characters, &rect, style, line_height, color).map(|layer| {
        MetaLayer::new(layer).with_source(SourceRef::node(node))
    })
}

/// The text of an `<input>` or `<textarea>`: its value, else its placeholder
/// drawn in the placeholder color. Inset by border and padding on every side.
pub fn form_control_text(
    ctx: &dyn StyleContext,
    node: NodeId,
    options: &ConvertOptions,
) -> Option<MetaLayer> {
    let element = ctx.dom().as_element(node)?;
    let kind = ElementKind::of(ctx, node);
    if !kind.is_form_control() {
        return None;
    }

    let value = element.control_value().map(collapse_whitespace).unwrap_or_default();
    let (characters, is_placeholder) = if value.is_empty() {
        let placeholder = element.attr("placeholder").map(collapse_whitespace)?;
        (placeholder, true)
    } else {
        (value, false)
    };
    if characters.is_empty() {
        return None;
    }

    let style = ctx.computed_style(node, None);
    let rect = ctx.bounding_rect(node, None)?;
    let single_line = (kind == ElementKind::Input).then_some(rect.height);
    let line_height = line_height(style, single_line);
    let rect = inset(&fit_line_height(rect, line_height), style);
    let color = if is_placeholder {
        Some(options.placeholder_rgba())
    } else {
        style.color("color")
    };

    build(characters, &rect, style, line_height, color).map(|layer| {
        MetaLayer::new(layer).with_source(SourceRef::node(node))
    })
}

/// Explicit pixel `line-height`, else the single-line control height, else
/// `floor(font-size * 1.2)`.
fn line_height(style: &ComputedStyle, single_line: Option<f64>) -> f64 {
    style
        .px("line-height")
        .or(single_line)
        .unwrap_or_else(|| (font_size(style) * 1.2).floor())
}

fn font_size(style: &ComputedStyle) -> f64 {
    style.px("font-size").unwrap_or(16.0)
}

fn fit_line_height(rect: Rect, line_height: f64) -> Rect {
    if rect.height < line_height {
        rect.centered_to_height(line_height)
    } else {
        rect
    }
}

fn inset(rect: &Rect, style: &ComputedStyle) -> Rect {
    let edge = |side: Side| {
        let name = side.name();
        style.px_or_zero(&format!("border-{name}-width")) + style.px_or_zero(&format!("padding-{name}"))
    };
    let (top, right, bottom, left) = (
        edge(Side::Top),
        edge(Side::Right),
        edge(Side::Bottom),
        edge(Side::Left),
    );
    Rect::new(
        rect.left + left,
        rect.top + top,
        rect.width - left - right,
        rect.height - top - bottom,
    )
}

fn build(
    characters: String,
    rect: &Rect,
    style: &ComputedStyle,
    line_height: f64,
    color: Option<Rgba>,
) -> Option<LayerNode> {
    if rect.is_degenerate() || rect.rounded().is_degenerate() {
        return None;
    }

    let font_family = style.value("font-family").trim();
    let props = TextProps {
        characters,
        font_size: Some(font_size(style).round()),
        font_family: (!font_family.is_empty()).then(|| font_family.to_string()),
        letter_spacing: style.px("letter-spacing").map(PixelValue::px),
        line_height: Some(PixelValue::px(line_height)),
        text_case: text_case(style.value("text-transform")),
        text_decoration: text_decoration(style),
        text_align_horizontal: text_align(style.value("text-align")),
    };

    let mut layer = LayerNode::new(LayerKind::Text(props), rect);
    if let Some(color) = color.filter(|c| !c.is_transparent()) {
        layer.fills.push(Paint::solid(color));
    }
    Some(layer)
}

fn text_case(transform: &str) -> Option<TextCase> {
    match transform {
        "uppercase" => Some(TextCase::Upper),
        "lowercase" => Some(TextCase::Lower),
        "capitalize" => Some(TextCase::Title),
        _ => None,
    }
}

fn text_decoration(style: &ComputedStyle) -> Option<TextDecoration> {
    let line = style
        .get("text-decoration-line")
        .or_else(|| style.get("text-decoration"))?;
    match line.split_whitespace().next()? {
        "underline" => Some(TextDecoration::Underline),
        "line-through" | "strikethrough" => Some(TextDecoration::Strikethrough),
        _ => None,
    }
}

/// Horizontal alignment from a `text-align` keyword.
fn text_align(align: &str) -> Option<TextAlign> {
    match align {
        "left" => Some(TextAlign::Left),
        "center" => Some(TextAlign::Center),
        "right" => Some(TextAlign::Right),
        "justify" | "justified" => Some(TextAlign::Justified),
        _ => None,
    }
}
