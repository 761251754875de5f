//! Reconciliation: repair a flat bag of layers into a tree.
//!
//! Every layer starts as a child of the root. Each pass walks the tree and
//! moves any layer whose nearest layer-owning ancestor is not its current
//! parent. Passes repeat until nothing moves or the ceiling is hit.

use std::collections::HashMap;

use strata_dom::NodeId;

use super::arena::{LayerArena, LayerId, ROOT};
use super::{CollectedLayers, document_root_layer, owner_ancestors};
use crate::context::StyleContext;
use crate::issue::{ConversionIssue, report};
use crate::layer::{LayerNode, MetaLayer};

/// Layers keyed by the node whose ancestors decide their parent.
struct Placement {
    owners: HashMap<NodeId, LayerId>,
    starts: HashMap<LayerId, NodeId>,
}

/// Build the tree by repeated reparenting, at most `limit` passes.
///
/// A layer is never moved into its own subtree. When the owning layer is not
/// a container it is wrapped in a frame that takes over its source; an owner
/// without a parent to wrap in is reported and the walk continues upward.
pub fn reconcile(
    ctx: &dyn StyleContext,
    collected: Vec<CollectedLayers>,
    limit: usize,
    issues: &mut Vec<ConversionIssue>,
) -> LayerArena {
    let mut arena = LayerArena::new(document_root_layer(ctx));
    let mut placement = Placement {
        owners: HashMap::new(),
        starts: HashMap::new(),
    };

    for CollectedLayers { node, layers } in collected {
        if let Some(primary) = layers.primary {
            let id = arena.push(primary);
            arena.append(ROOT, id);
            let _ = placement.owners.insert(node, id);
            let _ = placement.starts.insert(id, node);
        }
        for layer in layers.detached {
            let id = arena.push(layer);
            arena.append(ROOT, id);
            let _ = placement.starts.insert(id, node);
        }
    }

    let mut converged = false;
    for _ in 0..limit {
        if !reconcile_pass(ctx, &mut arena, &mut placement, issues) {
            converged = true;
            break;
        }
    }
    if !converged {
        report(
            issues,
            "assemble",
            format!("tree reconciliation stopped after {limit} passes without converging"),
        );
    }
    arena
}

/// One walk over the tree. Returns whether any layer moved.
fn reconcile_pass(
    ctx: &dyn StyleContext,
    arena: &mut LayerArena,
    placement: &mut Placement,
    issues: &mut Vec<ConversionIssue>,
) -> bool {
    let mut moved = false;
    for id in arena.preorder(ROOT).into_iter().skip(1) {
        let Some(&start) = placement.starts.get(&id) else {
            continue;
        };
        let current = arena.parent(id);

        for ancestor in owner_ancestors(ctx, start) {
            let Some(&owner) = placement.owners.get(&ancestor) else {
                continue;
            };
            if Some(owner) == current || arena.is_within(owner, id) {
                break;
            }
            if arena.meta(owner).layer.is_container() {
                arena.append(owner, id);
                moved = true;
                break;
            }
            let Some(wrapper) = wrap(ctx, arena, owner) else {
                report(
                    issues,
                    "assemble",
                    format!("layer for node {} has no parent to wrap it in", ancestor.0),
                );
                continue;
            };
            arena.append(wrapper, id);
            let _ = placement.owners.insert(ancestor, wrapper);
            if let Some(node) = placement.starts.remove(&owner) {
                let _ = placement.starts.insert(wrapper, node);
            }
            moved = true;
            break;
        }
    }
    moved
}

/// Replace a non-container layer with a frame of the same box holding it.
/// The frame clips when the source element's overflow is not visible.
fn wrap(ctx: &dyn StyleContext, arena: &mut LayerArena, owner: LayerId) -> Option<LayerId> {
    arena.parent(owner)?;

    let meta = arena.meta_mut(owner);
    let source = meta.source.take();
    let clips = source.is_some_and(|s| ctx.computed_style(s.node, None).clips_overflow());
    let mut frame = MetaLayer::new(LayerNode::frame(&meta.layer.rect(), clips));
    frame.source = source;
    frame.z_index = meta.z_index;

    let wrapper = arena.push(frame);
    if !arena.replace(owner, wrapper) {
        return None;
    }
    arena.append(wrapper, owner);
    Some(wrapper)
}
