//! Common-ancestor regrouping.
//!
//! A frame with more than two children is checked for a deeper element that
//! contains some, but not all, of them. Those children are moved into a new
//! frame spanning that element, so the output mirrors intermediate wrappers
//! that painted nothing themselves.

use std::collections::HashMap;

use strata_dom::NodeId;

use super::arena::{LayerArena, LayerId, ROOT};
use crate::context::StyleContext;
use crate::issue::{ConversionIssue, report};
use crate::layer::{LayerKind, LayerNode, MetaLayer, SourceRef};

/// Regroup children under their deepest shared ancestor, at most `limit`
/// passes. Each pass performs at most one regrouping.
pub fn group_common_ancestors(
    ctx: &dyn StyleContext,
    arena: &mut LayerArena,
    limit: usize,
    issues: &mut Vec<ConversionIssue>,
) {
    for _ in 0..limit {
        if !group_pass(ctx, arena) {
            return;
        }
    }
    report(
        issues,
        "assemble",
        format!("common-ancestor grouping stopped after {limit} passes without converging"),
    );
}

fn group_pass(ctx: &dyn StyleContext, arena: &mut LayerArena) -> bool {
    for id in arena.preorder(ROOT) {
        if !matches!(arena.meta(id).layer.kind, LayerKind::Frame { .. }) {
            continue;
        }
        let children = arena.children(id).to_vec();
        if children.len() <= 2 {
            continue;
        }
        let Some(frame_node) = arena.meta(id).source.map(|s| s.node) else {
            continue;
        };
        if try_group(ctx, arena, id, frame_node, &children) {
            return true;
        }
    }
    false
}

fn try_group(
    ctx: &dyn StyleContext,
    arena: &mut LayerArena,
    frame: LayerId,
    frame_node: NodeId,
    children: &[LayerId],
) -> bool {
    let dom = ctx.dom();
    let refs: Vec<Option<NodeId>> = children
        .iter()
        .map(|&child| arena.meta(child).source.map(|s| s.node))
        .collect();

    let Some(ancestor) = deepest_shared_ancestor(ctx, frame_node, &refs) else {
        return false;
    };

    let grouped: Vec<LayerId> = children
        .iter()
        .zip(&refs)
        .filter(|(_, r)| r.is_some_and(|node| dom.contains(ancestor, node)))
        .map(|(&child, _)| child)
        .collect();
    if grouped.len() == children.len() || grouped.is_empty() {
        return false;
    }

    let Some(rect) = ctx
        .bounding_rect(ancestor, None)
        .filter(|r| !r.is_degenerate())
    else {
        return false;
    };
    let clips = ctx.computed_style(ancestor, None).clips_overflow();
    let wrapper = arena.push(
        MetaLayer::new(LayerNode::frame(&rect, clips)).with_source(SourceRef::node(ancestor)),
    );

    let first = children
        .iter()
        .position(|child| grouped.contains(child))
        .unwrap_or(0);
    arena.insert(frame, first, wrapper);
    for child in grouped {
        arena.append(wrapper, child);
    }
    true
}

/// The deepest element inside `frame_node` that is a strict ancestor of at
/// least two of the children. Ties go to the one met first.
fn deepest_shared_ancestor(
    ctx: &dyn StyleContext,
    frame_node: NodeId,
    refs: &[Option<NodeId>],
) -> Option<NodeId> {
    let dom = ctx.dom();
    let frame_depth = ancestor_chain(ctx, frame_node).len();

    // node -> (children sharing it, depth, first-seen order)
    let mut shared: HashMap<NodeId, (usize, usize, usize)> = HashMap::new();
    let mut seen = 0;
    for node in refs.iter().flatten() {
        let chain = ancestor_chain(ctx, *node);
        let len = chain.len();
        for (index, ancestor) in chain.into_iter().enumerate() {
            let entry = shared.entry(ancestor).or_insert_with(|| {
                seen += 1;
                (0, len - index - 1, seen)
            });
            entry.0 += 1;
        }
    }

    shared
        .into_iter()
        .filter(|(node, (count, depth, _))| {
            *count >= 2 && *depth > frame_depth && dom.contains(frame_node, *node)
        })
        .max_by_key(|(_, (_, depth, order))| (*depth, std::cmp::Reverse(*order)))
        .map(|(node, _)| node)
}

/// Strict ancestors via [`StyleContext::parent`], nearest first. Text nodes
/// are measured from their parent element.
fn ancestor_chain(ctx: &dyn StyleContext, node: NodeId) -> Vec<NodeId> {
    let dom = ctx.dom();
    let limit = dom.len();
    let start = if dom.as_element(node).is_some() {
        Some(node)
    } else {
        ctx.parent(node)
    };

    let mut chain = Vec::new();
    let mut current = start.and_then(|n| ctx.parent(n));
    while let Some(id) = current {
        if chain.len() >= limit {
            break;
        }
        chain.push(id);
        current = ctx.parent(id);
    }
    chain
}
