//! CSS Border values
//!
//! [CSS Backgrounds and Borders Level 3](https://www.w3.org/TR/css-backgrounds-3/)

use serde::Serialize;

use super::color::{Rgba, parse_color};
use super::length::parse_px;

/// One physical side of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    /// The top edge.
    Top,
    /// The right edge.
    Right,
    /// The bottom edge.
    Bottom,
    /// The left edge.
    Left,
}

impl Side {
    /// All sides in the order browsers serialize them.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Lowercase name used in property names (`border-top`, `padding-left`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

/// [§ 4 Borders](https://www.w3.org/TR/css-backgrounds-3/#borders)
///
/// Border value representing width, style, and color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorderSide {
    /// [§ 4.3 'border-width'](https://www.w3.org/TR/css-backgrounds-3/#border-width)
    pub width: f64,
    /// [§ 4.2 'border-style'](https://www.w3.org/TR/css-backgrounds-3/#border-style)
    pub style: String,
    /// [§ 4.1 'border-color'](https://www.w3.org/TR/css-backgrounds-3/#border-color)
    ///
    /// `None` when the color text does not parse.
    pub color: Option<Rgba>,
}

impl BorderSide {
    /// A border paints when it has width, a style other than `none`/`hidden`,
    /// and a color that is not fully transparent.
    #[must_use]
    pub fn is_painted(&self) -> bool {
        self.width > 0.0
            && self.style != "none"
            && self.style != "hidden"
            && self.color.is_some_and(|c| !c.is_transparent())
    }
}

/// Parse a computed border shorthand: `<width>px <style> <color>`.
///
/// Width and style are required. The color is everything after the style, so
/// `rgb(0, 0, 0)` with its inner spaces stays intact.
#[must_use]
pub fn parse_border(value: &str) -> Option<BorderSide> {
    let value = value.trim();
    let (width, rest) = value.split_once(char::is_whitespace)?;
    if !width.ends_with("px") {
        return None;
    }
    let width = parse_px(width)?;
    if width < 0.0 {
        return None;
    }

    let rest = rest.trim_start();
    let (style, color) = rest
        .split_once(char::is_whitespace)
        .unwrap_or((rest, ""));
    if style.is_empty() || !style.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    Some(BorderSide {
        width,
        style: style.to_ascii_lowercase(),
        color: parse_color(color),
    })
}
