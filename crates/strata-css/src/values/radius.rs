//! Corner radii
//!
//! [§ 5 Rounded Corners](https://www.w3.org/TR/css-backgrounds-3/#corners)

use serde::Serialize;

use super::length::parse_length_percentage;

/// One corner of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Corner {
    /// `border-top-left-radius`
    TopLeft,
    /// `border-top-right-radius`
    TopRight,
    /// `border-bottom-right-radius`
    BottomRight,
    /// `border-bottom-left-radius`
    BottomLeft,
}

impl Corner {
    /// Shorthand order: top-left, top-right, bottom-right, bottom-left.
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    /// The corner's longhand property.
    #[must_use]
    pub fn property(self) -> &'static str {
        match self {
            Self::TopLeft => "border-top-left-radius",
            Self::TopRight => "border-top-right-radius",
            Self::BottomRight => "border-bottom-right-radius",
            Self::BottomLeft => "border-bottom-left-radius",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomRight => 2,
            Self::BottomLeft => 3,
        }
    }
}

/// [§ 5.1 'border-radius'](https://www.w3.org/TR/css-backgrounds-3/#border-radius)
///
/// "The four values for each 'radii' are given in the order top-left,
/// top-right, bottom-right, bottom-left. If bottom-left is omitted it is the
/// same as top-right. If bottom-right is omitted it is the same as top-left.
/// If top-right is omitted it is the same as top-left."
///
/// Only the horizontal radii (before any `/`) are kept.
#[must_use]
pub fn expand_border_radius(shorthand: &str) -> Option<[String; 4]> {
    let horizontal = shorthand.split('/').next().unwrap_or_default();
    let values: Vec<&str> = horizontal.split_whitespace().collect();
    let (tl, tr, br, bl) = match values.as_slice() {
        [a] => (*a, *a, *a, *a),
        [a, b] => (*a, *b, *a, *b),
        [a, b, c] => (*a, *b, *c, *b),
        [a, b, c, d] => (*a, *b, *c, *d),
        _ => return None,
    };
    Some([tl, tr, br, bl].map(str::to_string))
}

/// Resolve one corner's radius in pixels.
///
/// `longhand` is the corner's own computed value (which may be an elliptical
/// pair such as `4px 8px`; the first radius wins). When it is absent the
/// `border-radius` shorthand is consulted. Percentages resolve against
/// `height`.
#[must_use]
pub fn parse_corner_radius(
    corner: Corner,
    longhand: Option<&str>,
    shorthand: Option<&str>,
    height: f64,
) -> Option<f64> {
    let from_shorthand;
    let value = match longhand {
        Some(value) if !value.trim().is_empty() => value,
        _ => {
            from_shorthand = expand_border_radius(shorthand?)?;
            from_shorthand[corner.index()].as_str()
        }
    };
    let first = value.split_whitespace().next()?;
    parse_length_percentage(first)
        .map(|length| length.resolve(height))
        .filter(|radius| *radius >= 0.0)
}
