//! Resize constraints inferred from layout.
//!
//! Layout that centers or end-aligns a box is folded into a set of
//! effective `auto` margins, which then map to a constraint per axis.
//! Boxes with no such layout scale horizontally and pin to the top.

use std::collections::BTreeMap;

use strata_css::{ComputedStyle, is_px_length};

use crate::context::StyleContext;
use crate::layer::{ConstraintType, Constraints, LayerKind, LayerNode, MetaLayer, SourceRef};

/// Plugin-data key for `position` when it is `absolute` or `fixed`.
pub const POSITION_KEY: &str = "position";
/// Plugin-data key for the horizontal sizing mode.
pub const WIDTH_TYPE_KEY: &str = "widthType";
/// Plugin-data key for the vertical sizing mode.
pub const HEIGHT_TYPE_KEY: &str = "heightType";

/// Whether the start and end margins on one axis behave as `auto` after the
/// layout rules are applied.
#[derive(Debug, Clone, Copy, Default)]
struct AutoMargins {
    start: bool,
    end: bool,
}

impl AutoMargins {
    fn from_style(style: &ComputedStyle, start: &str, end: &str) -> Self {
        Self {
            start: style.value(start) == "auto",
            end: style.value(end) == "auto",
        }
    }

    fn both(&mut self) {
        self.start = true;
        self.end = true;
    }

    fn start_only(&mut self) {
        self.start = true;
        self.end = false;
    }

    /// Auto on both sides centers; auto on the start side alone pushes the
    /// box to the end edge.
    fn resolve(self, otherwise: ConstraintType) -> ConstraintType {
        match (self.start, self.end) {
            (true, true) => ConstraintType::Center,
            (true, false) => ConstraintType::Max,
            _ => otherwise,
        }
    }
}

/// Constraints and plugin data for one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inference {
    /// Horizontal and vertical rules.
    pub constraints: Constraints,
    /// `position`, `widthType` and `heightType` entries, when known.
    pub data: BTreeMap<String, String>,
}

impl Inference {
    fn bare(constraints: Constraints) -> Self {
        Self {
            constraints,
            data: BTreeMap::new(),
        }
    }
}

/// Infer the constraints of a layer produced from `source`.
///
/// Total: every layer gets a result. Layers without a source element or
/// parent fall back to [`Constraints::DEFAULT`]; SVG layers are centered
/// horizontally and pinned to the top.
pub fn infer_constraints(
    ctx: &dyn StyleContext,
    layer: &LayerNode,
    source: Option<SourceRef>,
) -> Inference {
    if matches!(layer.kind, LayerKind::Svg { .. }) {
        return Inference::bare(Constraints {
            horizontal: ConstraintType::Center,
            vertical: ConstraintType::Min,
        });
    }

    let Some(source) = source else {
        return Inference::bare(Constraints::DEFAULT);
    };
    let dom = ctx.dom();
    // Text is laid out by its parent element.
    let element = if dom.as_element(source.node).is_some() {
        Some(source.node)
    } else {
        dom.parent_element(source.node)
    };
    let Some(element) = element else {
        return Inference::bare(Constraints::DEFAULT);
    };
    let pseudo = if element == source.node {
        source.pseudo
    } else {
        None
    };
    let Some(parent) = dom.parent_element(element) else {
        return Inference::bare(Constraints::DEFAULT);
    };

    let hidden = ctx.computed_style_hidden(element, pseudo);
    let style = ctx.computed_style(element, pseudo);
    let parent_style = ctx.computed_style(parent, None);

    let mut horizontal = AutoMargins::from_style(hidden, "margin-left", "margin-right");
    let mut vertical = AutoMargins::from_style(hidden, "margin-top", "margin-bottom");
    let mut data = BTreeMap::new();

    let position = style.value("position");
    if position == "absolute" || position == "fixed" {
        let _ = data.insert(POSITION_KEY.to_string(), position.to_string());
    }
    if is_px_length(hidden.value("height")) {
        let _ = data.insert(HEIGHT_TYPE_KEY.to_string(), "fixed".to_string());
    }
    if is_px_length(hidden.value("width")) {
        let _ = data.insert(WIDTH_TYPE_KEY.to_string(), "fixed".to_string());
    }

    if style.is_inline_level() {
        match parent_style.value("text-align") {
            "center" => horizontal.both(),
            "right" => horizontal.start = true,
            _ => {}
        }
        match style.value("vertical-align") {
            "middle" => vertical.both(),
            "bottom" => vertical.start_only(),
            _ => {}
        }
        let _ = data.insert(WIDTH_TYPE_KEY.to_string(), "shrink".to_string());
    }

    if parent_style.is_flex_container() {
        apply_flex(parent_style, &mut horizontal, &mut vertical);
    }

    if layer.text().is_some() {
        match style.value("text-align") {
            "center" => horizontal.both(),
            "right" => horizontal.start_only(),
            _ => {}
        }
    }

    Inference {
        constraints: Constraints {
            horizontal: horizontal.resolve(ConstraintType::Scale),
            vertical: vertical.resolve(ConstraintType::Min),
        },
        data,
    }
}

/// Main axis from `justify-content` on rows, `align-items` on columns; cross
/// axis the other way round.
fn apply_flex(parent: &ComputedStyle, horizontal: &mut AutoMargins, vertical: &mut AutoMargins) {
    let (main, cross) = match parent.value("flex-direction") {
        "row" => (parent.value("justify-content"), parent.value("align-items")),
        "column" => (parent.value("align-items"), parent.value("justify-content")),
        _ => return,
    };

    if main == "center" {
        horizontal.both();
    } else if main.contains("end") || main.contains("right") {
        horizontal.start_only();
    }

    if cross == "center" {
        vertical.both();
    } else if cross.contains("end") || cross.contains("bottom") {
        vertical.start_only();
    }
}

/// Set constraints and plugin data on every layer of a meta tree.
pub fn apply_constraints(ctx: &dyn StyleContext, meta: &mut MetaLayer) {
    meta.walk_mut(&mut |node| {
        let inference = infer_constraints(ctx, &node.layer, node.source);
        node.layer.constraints = Some(inference.constraints);
        node.layer.data.extend(inference.data);
    });
}
