//! Conversion to the public tree with parent-relative coordinates.

use crate::layer::{LayerNode, MetaLayer};

/// Fold a meta tree into public layers and make every descendant of a frame
/// or group relative to it.
#[must_use]
pub fn normalize(root: MetaLayer) -> LayerNode {
    let mut layer = root.into_layer();
    resolve_offsets(&mut layer);
    layer
}

/// Subtract each container's position from its descendants, parents first.
///
/// Each container is resolved at most once, so running this again on an
/// already-normalized tree changes nothing.
pub fn resolve_offsets(layer: &mut LayerNode) {
    if layer.is_container() && !layer.offsets_resolved {
        let (x, y) = (layer.x, layer.y);
        if x != 0.0 || y != 0.0 {
            for child in &mut layer.children {
                shift(child, x, y);
            }
        }
        layer.offsets_resolved = true;
    }
    for child in &mut layer.children {
        resolve_offsets(child);
    }
}

fn shift(layer: &mut LayerNode, dx: f64, dy: f64) {
    layer.x -= dx;
    layer.y -= dy;
    for child in &mut layer.children {
        shift(child, dx, dy);
    }
}
