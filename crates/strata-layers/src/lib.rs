//! Layer compiler for rendered HTML.
//!
//! # Scope
//!
//! This crate provides:
//! - **Capture loading** - rendered pages as JSON, served through [`StyleContext`]
//! - **Layer synthesis** - frames, paints, borders, shadows, text and SVG
//! - **Tree assembly** - canonical and reconciling strategies
//! - **Constraints** - resize behavior inferred from layout
//! - **Normalization** - parent-relative coordinates
//! - **Image resolution** - concurrent fetching with per-image failures
//! - **Materialization** - a host canvas trait and traversal driver
//!
//! # Pipeline
//!
//! ```text
//! StyleContext ─► synth ─► assemble ─► constraints ─► normalize ─► Vec<LayerNode>
//! ```
//!
//! [`convert`] runs the pipeline; [`images::resolve_images`] and
//! [`materialize::materialize`] are separate, optional steps.

pub mod assemble;
pub mod capture;
pub mod constraints;
pub mod context;
pub mod error;
pub mod geometry;
pub mod images;
pub mod issue;
pub mod kind;
pub mod layer;
pub mod materialize;
pub mod normalize;
pub mod options;
pub mod style;
pub mod synth;

pub use capture::{CapturedPage, PageBuilder};
pub use context::{Pseudo, StyleContext, Viewport};
pub use error::{CaptureError, ConfigError, ImageError, MaterializeError};
pub use issue::ConversionIssue;
pub use kind::ElementKind;
pub use layer::{LayerKind, LayerNode, MetaLayer, Paint};
pub use options::{AssemblyStrategy, ConvertOptions, PaintOrder};

use serde::Serialize;
use strata_common::warning::clear_warnings;

use crate::constraints::apply_constraints;

/// Output of [`convert`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    /// With frames: a single document root frame. Flat: the root frame
    /// followed by every layer with absolute coordinates.
    pub layers: Vec<LayerNode>,
    /// Degraded steps, in the order they happened.
    pub issues: Vec<ConversionIssue>,
}

/// Convert a rendered document into layers.
///
/// Never fails: unsupported elements are skipped and every recovery is
/// listed in [`Conversion::issues`].
pub fn convert(ctx: &dyn StyleContext, options: &ConvertOptions) -> Conversion {
    clear_warnings();
    let mut issues = Vec::new();

    let layers = if options.use_frames {
        let mut root = assemble::assemble(ctx, options, &mut issues);
        apply_constraints(ctx, &mut root);
        vec![normalize::normalize(root)]
    } else {
        assemble::flatten(ctx, options)
            .into_iter()
            .map(|mut meta| {
                apply_constraints(ctx, &mut meta);
                meta.into_layer()
            })
            .collect()
    };

    Conversion { layers, issues }
}
