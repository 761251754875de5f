//! Applied-style snapshots.
//!
//! A [`StyleSnapshot`] keeps only the paint-relevant properties whose computed
//! value differs from the rendering default, so "does this element paint
//! anything" is a map lookup.

use std::collections::BTreeMap;

use strata_css::{ComputedStyle, Corner, Side};
use strata_dom::NodeId;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::context::{Pseudo, StyleContext};

/// The allow-list of properties a snapshot may contain.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, AsRefStr, Display, EnumIter, EnumString,
)]
#[strum(serialize_all = "kebab-case")]
pub enum StyleProperty {
    /// `opacity`
    Opacity,
    /// `background-color`
    BackgroundColor,
    /// `border` (uniform sides only)
    Border,
    /// `border-top`
    BorderTop,
    /// `border-left`
    BorderLeft,
    /// `border-right`
    BorderRight,
    /// `border-bottom`
    BorderBottom,
    /// `border-radius`
    BorderRadius,
    /// `background-image`
    BackgroundImage,
    /// `border-color`
    BorderColor,
    /// `box-shadow`
    BoxShadow,
}

impl StyleProperty {
    /// The value this property has when it paints nothing. Border defaults
    /// embed the element's `color`.
    #[must_use]
    pub fn default_value(self, color: &str) -> String {
        match self {
            Self::Opacity => "1".to_string(),
            Self::BackgroundColor => "rgba(0, 0, 0, 0)".to_string(),
            Self::Border
            | Self::BorderTop
            | Self::BorderLeft
            | Self::BorderRight
            | Self::BorderBottom => format!("0px none {color}"),
            Self::BorderRadius => "0px".to_string(),
            Self::BackgroundImage | Self::BoxShadow => "none".to_string(),
            Self::BorderColor => color.to_string(),
        }
    }

    fn read(self, style: &ComputedStyle) -> Option<String> {
        let side = |side| Some(style.border_side_text(side));
        match self {
            Self::Border => style.border_shorthand(),
            Self::BorderTop => side(Side::Top),
            Self::BorderLeft => side(Side::Left),
            Self::BorderRight => side(Side::Right),
            Self::BorderBottom => side(Side::Bottom),
            Self::BorderRadius => style.get("border-radius").map(str::to_string).or_else(|| {
                let corners = Corner::ALL.map(|c| style.value(c.property()).to_string());
                corners
                    .iter()
                    .any(|c| c != "0px")
                    .then(|| corners.join(" "))
            }),
            _ => style.get(self.as_ref()).map(str::to_string),
        }
    }
}

/// Non-default values of the allow-listed properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSnapshot {
    values: BTreeMap<StyleProperty, String>,
}

impl StyleSnapshot {
    /// Whether the property differs from its default.
    #[must_use]
    pub fn has(&self, property: StyleProperty) -> bool {
        self.values.contains_key(&property)
    }

    /// The captured value of a non-default property.
    #[must_use]
    pub fn get(&self, property: StyleProperty) -> Option<&str> {
        self.values.get(&property).map(String::as_str)
    }

    /// Number of non-default properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether every allow-listed property has its default value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in allow-list order.
    pub fn iter(&self) -> impl Iterator<Item = (StyleProperty, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Snapshot the paint-relevant, non-default computed values of an element or
/// pseudo-element.
pub fn extract_applied_styles(
    ctx: &dyn StyleContext,
    node: NodeId,
    pseudo: Option<Pseudo>,
) -> StyleSnapshot {
    if ctx.dom().as_element(node).is_none() {
        return StyleSnapshot::default();
    }
    let style = ctx.computed_style(node, pseudo);
    let color = style.value("color");

    let values = StyleProperty::iter()
        .filter_map(|property| {
            let value = property.read(style)?;
            (!value.is_empty() && value != property.default_value(color))
                .then_some((property, value))
        })
        .collect();
    StyleSnapshot { values }
}
