//! Tree assembly: per-node layers in, one nested layer tree out.
//!
//! Every strategy starts from the same collection step: a pre-order walk of
//! the converted subtree (shadow children before light children) that runs
//! the synthesizers on each element and text node. The strategies differ in
//! how those layers find their parent frame.

mod arena;
mod group;
mod reconcile;

use std::collections::HashMap;

use strata_dom::{NodeId, NodeType, Rect};

use self::arena::{LayerArena, ROOT};
use crate::context::StyleContext;
use crate::issue::{ConversionIssue, report};
use crate::layer::{LayerNode, MetaLayer, SourceRef};
use crate::options::{AssemblyStrategy, ConvertOptions};
use crate::synth::{ElementLayers, element_to_layers, text_to_layer};

pub use self::group::group_common_ancestors;
pub use self::reconcile::reconcile;

/// Layers produced for one source node, in document order.
#[derive(Debug)]
pub struct CollectedLayers {
    /// Element or text node.
    pub node: NodeId,
    /// What the synthesizers produced for it.
    pub layers: ElementLayers,
}

/// The frame every tree hangs from: `(0, 0)`, viewport width by scroll
/// height, sourced from the converted root element.
pub fn document_root_layer(ctx: &dyn StyleContext) -> MetaLayer {
    let viewport = ctx.viewport();
    let rect = Rect::new(0.0, 0.0, viewport.width, viewport.scroll_height);
    MetaLayer::new(LayerNode::frame(&rect, false))
        .with_source(SourceRef::node(ctx.document_root()))
}

/// Run the synthesizers over every node below the document root.
pub fn collect_layers(ctx: &dyn StyleContext, options: &ConvertOptions) -> Vec<CollectedLayers> {
    let dom = ctx.dom();
    dom.descendants(ctx.document_root())
        .into_iter()
        .skip(1)
        .filter_map(|node| {
            let layers = match dom.get(node)?.node_type {
                NodeType::Element(_) => element_to_layers(ctx, node, options),
                NodeType::Text(_) => ElementLayers {
                    primary: text_to_layer(ctx, node),
                    detached: Vec::new(),
                },
                _ => return None,
            };
            (!layers.is_empty()).then_some(CollectedLayers { node, layers })
        })
        .collect()
}

/// Nest the collected layers under the document root frame with the
/// configured strategy. Ceilings and missing ancestors are recorded in
/// `issues`; a tree is always returned.
pub fn assemble(
    ctx: &dyn StyleContext,
    options: &ConvertOptions,
    issues: &mut Vec<ConversionIssue>,
) -> MetaLayer {
    let collected = collect_layers(ctx, options);
    let mut arena = match options.strategy {
        AssemblyStrategy::Canonical => canonical(ctx, collected, issues),
        AssemblyStrategy::Reconcile => reconcile(ctx, collected, options.iteration_limit, issues),
    };
    if options.strategy == AssemblyStrategy::Reconcile || options.group_common_ancestors {
        group_common_ancestors(ctx, &mut arena, options.iteration_limit, issues);
    }
    arena.into_tree(options.paint_order)
}

/// Single pass: each layer goes under the layer of its nearest ancestor that
/// owns a container, or under the root.
///
/// Form controls carrying a text value do not take DOM children.
fn canonical(
    ctx: &dyn StyleContext,
    collected: Vec<CollectedLayers>,
    issues: &mut Vec<ConversionIssue>,
) -> LayerArena {
    let mut arena = LayerArena::new(document_root_layer(ctx));
    let mut owners: HashMap<NodeId, usize> = HashMap::new();
    let mut placed = Vec::new();

    for CollectedLayers { node, layers } in collected {
        if let Some(primary) = layers.primary {
            let owns = primary.layer.is_container() && primary.text_value.is_none();
            let id = arena.push(primary);
            if owns {
                let _ = owners.insert(node, id);
            }
            placed.push((node, id));
        }
        for layer in layers.detached {
            placed.push((node, arena.push(layer)));
        }
    }

    for (node, id) in placed {
        let owner = owner_ancestors(ctx, node)
            .into_iter()
            .find_map(|ancestor| owners.get(&ancestor).copied())
            .unwrap_or(ROOT);
        if arena.is_within(owner, id) {
            report(
                issues,
                "assemble",
                format!("layer for node {} would nest inside itself; kept at the root", node.0),
            );
            arena.append(ROOT, id);
        } else {
            arena.append(owner, id);
        }
    }
    arena
}

/// Ancestors of `node` via [`StyleContext::parent`], nearest first, stopping
/// before the document root. Bounded by the tree size.
pub(crate) fn owner_ancestors(ctx: &dyn StyleContext, node: NodeId) -> Vec<NodeId> {
    let root = ctx.document_root();
    let limit = ctx.dom().len();
    let mut out = Vec::new();
    let mut current = ctx.parent(node);
    while let Some(id) = current {
        if id == root || out.len() >= limit {
            break;
        }
        out.push(id);
        current = ctx.parent(id);
    }
    out
}

/// Flat output: the root frame, then every layer and sub-layer in document
/// order with absolute coordinates.
pub fn flatten(ctx: &dyn StyleContext, options: &ConvertOptions) -> Vec<MetaLayer> {
    let mut out = vec![document_root_layer(ctx)];
    for collected in collect_layers(ctx, options) {
        for layer in collected.layers.into_layers() {
            flatten_into(layer, &mut out);
        }
    }
    out
}

fn flatten_into(mut meta: MetaLayer, out: &mut Vec<MetaLayer>) {
    let before = meta.before.take();
    let after = meta.after.take();
    let borders = meta.borders.take();
    let text_value = meta.text_value.take();
    let children = std::mem::take(&mut meta.children);

    if let Some(before) = before {
        flatten_into(*before, out);
    }
    out.push(meta);
    for child in children {
        flatten_into(child, out);
    }
    if let Some(borders) = borders {
        flatten_into(*borders, out);
    }
    if let Some(text_value) = text_value {
        flatten_into(*text_value, out);
    }
    if let Some(after) = after {
        flatten_into(*after, out);
    }
}
