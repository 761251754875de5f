//! Document-space rectangles.
//!
//! [CSSOM View § 6 DOMRect](https://drafts.fxtf.org/geometry/#domrect)

use serde::{Deserialize, Serialize};

/// A rectangle in document coordinates, shaped like `getBoundingClientRect()`.
///
/// `right`/`bottom` are always derived from `left + width` and `top + height`
/// so the six fields never disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RectRepr")]
pub struct Rect {
    /// Distance from the document's top edge.
    pub top: f64,
    /// Distance from the document's left edge.
    pub left: f64,
    /// `left + width`.
    pub right: f64,
    /// `top + height`.
    pub bottom: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Build a rect from its origin and size.
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            right: left + width,
            bottom: top + height,
            width,
            height,
        }
    }

    /// A rect narrower or shorter than one pixel produces no visual layer.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width >= 1.0 && self.height >= 1.0)
    }

    /// Round origin and size to whole pixels, clamping negative sizes to zero.
    #[must_use]
    pub fn rounded(&self) -> Self {
        Self::new(
            self.left.round(),
            self.top.round(),
            self.width.round().max(0.0),
            self.height.round().max(0.0),
        )
    }

    /// The smallest rect covering both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right.max(other.right);
        let bottom = self.bottom.max(other.bottom);
        Self::new(left, top, right - left, bottom - top)
    }

    /// Grow vertically around the center until the height is at least `height`.
    #[must_use]
    pub fn centered_to_height(&self, height: f64) -> Self {
        if self.height >= height {
            return *self;
        }
        let delta = height - self.height;
        Self::new(self.left, self.top - delta / 2.0, self.width, height)
    }
}

/// Accepts either `{left, top, width, height}` or `{x, y, width, height}`.
#[derive(Deserialize)]
struct RectRepr {
    #[serde(alias = "x")]
    left: f64,
    #[serde(alias = "y")]
    top: f64,
    width: f64,
    height: f64,
}

impl From<RectRepr> for Rect {
    fn from(repr: RectRepr) -> Self {
        Self::new(repr.left, repr.top, repr.width, repr.height)
    }
}
