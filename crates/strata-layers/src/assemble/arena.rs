//! Index-based layer tree used while layers are being moved around.
//!
//! Layers live in a flat `Vec` and refer to each other by [`LayerId`], so a
//! layer can be detached and re-attached anywhere without fighting the
//! borrow checker. [`LayerArena::into_tree`] turns the arena back into an
//! owned [`MetaLayer`] tree once assembly is done.

use std::cmp::Reverse;

use crate::layer::MetaLayer;
use crate::options::PaintOrder;

/// Index of a layer in a [`LayerArena`].
pub type LayerId = usize;

/// The document root frame is always the first slot.
pub const ROOT: LayerId = 0;

/// Links for one layer. The root's layer is held outside the slots.
#[derive(Debug)]
struct Slot {
    meta: Option<MetaLayer>,
    parent: Option<LayerId>,
    children: Vec<LayerId>,
}

/// Layers plus parent/child links.
#[derive(Debug)]
pub struct LayerArena {
    root: MetaLayer,
    slots: Vec<Slot>,
}

impl LayerArena {
    /// An arena holding only the root frame.
    pub fn new(root: MetaLayer) -> Self {
        Self {
            root,
            slots: vec![Slot {
                meta: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Add a detached layer.
    pub fn push(&mut self, meta: MetaLayer) -> LayerId {
        let id = self.slots.len();
        self.slots.push(Slot {
            meta: Some(meta),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Number of layers, attached or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn meta(&self, id: LayerId) -> &MetaLayer {
        self.slots[id].meta.as_ref().unwrap_or(&self.root)
    }

    pub fn meta_mut(&mut self, id: LayerId) -> &mut MetaLayer {
        match self.slots[id].meta.as_mut() {
            Some(meta) => meta,
            None => &mut self.root,
        }
    }

    pub fn parent(&self, id: LayerId) -> Option<LayerId> {
        self.slots[id].parent
    }

    pub fn children(&self, id: LayerId) -> &[LayerId] {
        &self.slots[id].children
    }

    /// Unlink a layer from its parent. Its own subtree stays intact.
    pub fn detach(&mut self, id: LayerId) {
        if let Some(parent) = self.slots[id].parent.take() {
            self.slots[parent].children.retain(|&child| child != id);
        }
    }

    /// Move a layer to the end of `parent`'s children.
    pub fn append(&mut self, parent: LayerId, id: LayerId) {
        self.detach(id);
        self.slots[id].parent = Some(parent);
        self.slots[parent].children.push(id);
    }

    /// Move a layer into `parent`'s children at `index`.
    pub fn insert(&mut self, parent: LayerId, index: usize, id: LayerId) {
        self.detach(id);
        self.slots[id].parent = Some(parent);
        let children = &mut self.slots[parent].children;
        let index = index.min(children.len());
        children.insert(index, id);
    }

    /// Put `replacement` where `old` sits in its parent; `old` is left
    /// detached.
    pub fn replace(&mut self, old: LayerId, replacement: LayerId) -> bool {
        let Some(parent) = self.slots[old].parent else {
            return false;
        };
        let Some(index) = self.slots[parent].children.iter().position(|&c| c == old) else {
            return false;
        };
        self.detach(replacement);
        self.slots[parent].children[index] = replacement;
        self.slots[replacement].parent = Some(parent);
        self.slots[old].parent = None;
        true
    }

    /// Whether `id` is `ancestor` or sits below it.
    ///
    /// The parent walk is bounded by the arena size.
    pub fn is_within(&self, id: LayerId, ancestor: LayerId) -> bool {
        let mut current = Some(id);
        for _ in 0..=self.slots.len() {
            match current {
                Some(node) if node == ancestor => return true,
                Some(node) => current = self.slots[node].parent,
                None => return false,
            }
        }
        false
    }

    /// `from` and everything below it, parents before children.
    pub fn preorder(&self, from: LayerId) -> Vec<LayerId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if out.len() > self.slots.len() {
                break;
            }
            out.push(id);
            stack.extend(self.slots[id].children.iter().rev());
        }
        out
    }

    /// Rebuild the owned tree below [`ROOT`], sorting each layer's children
    /// by z-index. Pseudo, border and text sub-layers are folded in first so
    /// they sort with their siblings. The sort is stable, so equal z keeps
    /// document order. Layers not reachable from the root are dropped.
    pub fn into_tree(self, order: PaintOrder) -> MetaLayer {
        let mut root = self.root;
        let mut children = Vec::with_capacity(self.slots.len());
        let mut metas = Vec::with_capacity(self.slots.len());
        for slot in self.slots {
            children.push(slot.children);
            metas.push(slot.meta);
        }
        root.children
            .extend(build_children(ROOT, &children, &mut metas, order));
        root
    }
}

fn build_children(
    id: LayerId,
    children: &[Vec<LayerId>],
    metas: &mut [Option<MetaLayer>],
    order: PaintOrder,
) -> Vec<MetaLayer> {
    let mut built = Vec::with_capacity(children[id].len());
    for &child in &children[id] {
        if let Some(mut meta) = metas[child].take() {
            meta.children
                .extend(build_children(child, children, metas, order));
            meta.fold_children();
            sort_by_z(&mut meta.children, order);
            built.push(meta);
        }
    }
    sort_by_z(&mut built, order);
    built
}

fn sort_by_z(layers: &mut [MetaLayer], order: PaintOrder) {
    match order {
        PaintOrder::TopmostFirst => layers.sort_by_key(|m| Reverse(m.z_index)),
        PaintOrder::BottommostFirst => layers.sort_by_key(|m| m.z_index),
    }
}
