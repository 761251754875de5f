//! Borders as strokes or border pins.
//!
//! Canvas strokes are uniform, so a border only becomes a stroke when all four
//! sides serialize identically. Anything else degrades to one filled
//! rectangle per painted side, collected in a `::borders` frame.

use strata_css::{ComputedStyle, Side, parse_border};
use strata_dom::Rect;

use crate::layer::{LayerKind, LayerNode, MetaLayer, Paint};

/// Name of the frame holding border pins.
pub const BORDERS_FRAME_NAME: &str = "::borders";

/// Sides in the order pins are emitted.
const PIN_ORDER: [Side; 4] = [Side::Top, Side::Left, Side::Right, Side::Bottom];

/// A uniform stroke from the `border` shorthand: paint and rounded weight.
#[must_use]
pub fn get_border(style: &ComputedStyle) -> Option<(Paint, f64)> {
    let border = parse_border(&style.border_shorthand()?)?;
    if !border.is_painted() {
        return None;
    }
    let color = border.color?;
    Some((Paint::solid(color), border.width.round()))
}

/// One rectangle per painted side, flush inside the border box, wrapped in a
/// non-clipping frame with the element's geometry. `None` when no side
/// paints.
#[must_use]
pub fn get_border_pins(style: &ComputedStyle, rect: &Rect) -> Option<MetaLayer> {
    let pins: Vec<MetaLayer> = PIN_ORDER
        .iter()
        .filter_map(|&side| {
            let border = style.border_side(side).filter(|b| b.is_painted())?;
            let color = border.color?;
            let pin_rect = pin_rect(side, border.width, rect);
            if pin_rect.rounded().is_degenerate() {
                return None;
            }
            let mut pin = LayerNode::new(LayerKind::Rectangle, &pin_rect);
            pin.fills.push(Paint::solid(color));
            Some(MetaLayer::new(pin))
        })
        .collect();

    if pins.is_empty() {
        return None;
    }

    let mut frame = MetaLayer::new(LayerNode::frame(rect, false).named(BORDERS_FRAME_NAME));
    frame.children = pins;
    Some(frame)
}

fn pin_rect(side: Side, width: f64, rect: &Rect) -> Rect {
    match side {
        Side::Top => Rect::new(rect.left, rect.top, rect.width, width),
        Side::Bottom => Rect::new(rect.left, rect.bottom - width, rect.width, width),
        Side::Left => Rect::new(rect.left, rect.top, width, rect.height),
        Side::Right => Rect::new(rect.right - width, rect.top, width, rect.height),
    }
}
