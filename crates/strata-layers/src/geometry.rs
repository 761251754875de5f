//! Visibility and effective rectangles.

use strata_dom::{NodeId, Rect};

use crate::context::{Pseudo, StyleContext};

/// Whether an element (or one of its pseudo-elements) renders.
///
/// Walks the element and its ancestors. Hidden when any of them has
/// `display: none`, `visibility: hidden`, or clips overflow while being less
/// than one pixel tall (collapsed dropdowns and accordions). The pseudo
/// style is consulted for the first step only.
pub fn is_visible(ctx: &dyn StyleContext, node: NodeId, pseudo: Option<Pseudo>) -> bool {
    let dom = ctx.dom();
    let mut current = Some(node);
    let mut pseudo = pseudo;
    // Bounded by the arena size so a corrupt parent chain cannot spin.
    let mut remaining = dom.len() + 1;

    while let Some(id) = current {
        if remaining == 0 || dom.as_element(id).is_none() {
            break;
        }
        remaining -= 1;

        let style = ctx.computed_style(id, pseudo);
        if style.is_display_none() || style.is_visibility_hidden() {
            return false;
        }
        if style.clips_overflow()
            && ctx.bounding_rect(id, None).map_or(0.0, |r| r.height) < 1.0
        {
            return false;
        }

        pseudo = None;
        current = dom.parent(id);
    }
    true
}

/// The rect a layer for this element or pseudo-element covers, or `None`
/// when it is narrower or shorter than one pixel.
///
/// With `aggregate_inline` set, an inline element with element children
/// covers the union of its children's rects, widened to its own box when
/// that is wider.
pub fn resolve_rect(
    ctx: &dyn StyleContext,
    node: NodeId,
    pseudo: Option<Pseudo>,
    aggregate_inline: bool,
) -> Option<Rect> {
    let rect = if aggregate_inline && pseudo.is_none() {
        aggregate_rect(ctx, node, ctx.dom().len())?
    } else {
        ctx.bounding_rect(node, pseudo)?
    };
    (!rect.is_degenerate()).then_some(rect)
}

fn aggregate_rect(ctx: &dyn StyleContext, node: NodeId, depth_budget: usize) -> Option<Rect> {
    let own = ctx.bounding_rect(node, None);
    if depth_budget == 0 || !ctx.computed_style(node, None).is_inline_level() {
        return own;
    }

    let dom = ctx.dom();
    let union = dom
        .children(node)
        .iter()
        .filter(|&&child| dom.as_element(child).is_some())
        .filter_map(|&child| aggregate_rect(ctx, child, depth_budget - 1))
        .reduce(|acc, rect| acc.union(&rect));

    match (union, own) {
        (Some(union), Some(own)) if own.width > union.width => Some(Rect::new(
            own.left,
            union.top,
            own.width,
            union.height,
        )),
        (Some(union), _) => Some(union),
        (None, own) => own,
    }
}
