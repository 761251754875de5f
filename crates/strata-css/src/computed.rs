//! CSS Computed Style
//!
//! [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//! "The computed value is the result of resolving the specified value..."
//!
//! The cascade already ran in the browser that produced the capture, so a
//! [`ComputedStyle`] is a plain property map. Lookups of uncaptured
//! properties fall back to the property's initial value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::values::border::{BorderSide, Side, parse_border};
use crate::values::color::{Rgba, parse_color};
use crate::values::length::parse_px;
use crate::values::radius::{Corner, parse_corner_radius};

/// Computed styles for an element or pseudo-element.
///
/// Keys are CSS property names in kebab case (`background-color`). Keys given
/// in CSSOM camel case (`backgroundColor`) are converted on insertion, so a
/// capture may use either spelling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct ComputedStyle {
    properties: BTreeMap<String, String>,
}

impl ComputedStyle {
    /// An empty style: every lookup yields the initial value.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            properties: BTreeMap::new(),
        }
    }

    /// Build a style from `(property, value)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut style = Self::new();
        for (name, value) in pairs {
            style.set(name, value);
        }
        style
    }

    /// Set a property. The name is normalized to kebab case.
    pub fn set(&mut self, name: &str, value: &str) {
        let _ = self
            .properties
            .insert(kebab_case(name), value.trim().to_string());
    }

    /// The captured value, if the property was captured.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// The captured value, else the property's initial value, else `""`.
    #[must_use]
    pub fn value(&self, name: &str) -> &str {
        self.get(name)
            .or_else(|| initial_value(name))
            .unwrap_or_default()
    }

    /// Captured properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of captured properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// [§ 2 'display'](https://www.w3.org/TR/css-display-3/#the-display-properties)
    #[must_use]
    pub fn display(&self) -> &str {
        self.value("display")
    }

    /// [§ 2.6 display: none](https://www.w3.org/TR/css-display-3/#valdef-display-none)
    ///
    /// "The element and its descendants generate no boxes or text runs."
    #[must_use]
    pub fn is_display_none(&self) -> bool {
        self.display() == "none"
    }

    /// Inline-level outer display type (`inline`, `inline-block`,
    /// `inline-flex`, ...).
    #[must_use]
    pub fn is_inline_level(&self) -> bool {
        self.display().starts_with("inline")
    }

    /// Flex container (`flex` or `inline-flex`).
    #[must_use]
    pub fn is_flex_container(&self) -> bool {
        matches!(self.display(), "flex" | "inline-flex")
    }

    /// [§ 11.2 'visibility'](https://www.w3.org/TR/CSS2/visufx.html#visibility)
    #[must_use]
    pub fn is_visibility_hidden(&self) -> bool {
        self.value("visibility") == "hidden"
    }

    /// [§ 3 'overflow'](https://www.w3.org/TR/css-overflow-3/#propdef-overflow)
    ///
    /// True when either axis clips or scrolls.
    #[must_use]
    pub fn clips_overflow(&self) -> bool {
        let overflow = self.value("overflow");
        overflow
            .split_whitespace()
            .any(|keyword| keyword != "visible")
    }

    /// [§ 9.9.1 'z-index'](https://www.w3.org/TR/CSS2/visuren.html#z-index)
    ///
    /// `None` for `auto` or anything that is not a finite integer.
    #[must_use]
    pub fn z_index(&self) -> Option<i32> {
        self.value("z-index").parse::<i32>().ok()
    }

    /// `opacity` as a number, `1.0` when unparsable.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.value("opacity")
            .parse::<f64>()
            .ok()
            .filter(|o| o.is_finite())
            .map_or(1.0, |o| o.clamp(0.0, 1.0))
    }

    /// A color-valued property.
    #[must_use]
    pub fn color(&self, name: &str) -> Option<Rgba> {
        parse_color(self.value(name))
    }

    /// A pixel-valued property.
    #[must_use]
    pub fn px(&self, name: &str) -> Option<f64> {
        parse_px(self.value(name))
    }

    /// A pixel-valued property, `0.0` when it is a keyword or missing.
    #[must_use]
    pub fn px_or_zero(&self, name: &str) -> f64 {
        self.px(name).unwrap_or(0.0)
    }

    /// [§ 12.2 The 'content' property](https://www.w3.org/TR/CSS2/generate.html#content)
    ///
    /// "none: The pseudo-element is not generated." `normal` computes to
    /// `none` on `::before`/`::after`.
    #[must_use]
    pub fn generates_content(&self) -> bool {
        let content = self.value("content");
        !content.is_empty() && content != "none" && content != "normal"
    }

    /// The serialized border for one side: the `border-<side>` shorthand when
    /// captured, else rebuilt from its longhands. The color falls back to the
    /// element's `color` (`currentColor`).
    #[must_use]
    pub fn border_side_text(&self, side: Side) -> String {
        let shorthand = format!("border-{}", side.name());
        if let Some(value) = self.get(&shorthand).filter(|v| !v.is_empty()) {
            return value.to_string();
        }
        let width = self.value(&format!("{shorthand}-width"));
        let style = self.value(&format!("{shorthand}-style"));
        let color = self
            .get(&format!("{shorthand}-color"))
            .unwrap_or_else(|| self.value("color"));
        format!("{width} {style} {color}")
    }

    /// A parsed border side.
    #[must_use]
    pub fn border_side(&self, side: Side) -> Option<BorderSide> {
        parse_border(&self.border_side_text(side))
    }

    /// The `border` shorthand: captured as-is, or synthesized when all four
    /// sides serialize identically (as `getComputedStyle().border` does).
    #[must_use]
    pub fn border_shorthand(&self) -> Option<String> {
        if let Some(value) = self.get("border").filter(|v| !v.is_empty()) {
            return Some(value.to_string());
        }
        let [top, rest @ ..] = Side::ALL.map(|side| self.border_side_text(side));
        rest.iter().all(|side| *side == top).then_some(top)
    }

    /// One corner radius in pixels, percentages resolved against `height`.
    #[must_use]
    pub fn corner_radius(&self, corner: Corner, height: f64) -> f64 {
        parse_corner_radius(
            corner,
            self.get(corner.property()),
            self.get("border-radius"),
            height,
        )
        .unwrap_or(0.0)
    }
}

impl From<BTreeMap<String, String>> for ComputedStyle {
    fn from(map: BTreeMap<String, String>) -> Self {
        let mut style = Self::new();
        for (name, value) in &map {
            style.set(name, value);
        }
        style
    }
}

impl From<ComputedStyle> for BTreeMap<String, String> {
    fn from(style: ComputedStyle) -> Self {
        style.properties
    }
}

/// `backgroundColor` → `background-color`. Custom properties and names that
/// are already kebab case pass through.
fn kebab_case(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") || !name.chars().any(|c| c.is_ascii_uppercase()) {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// [§ 7.1 Initial Values](https://www.w3.org/TR/css-cascade-4/#initial-values)
///
/// "Each property has an initial value, defined in the property's
/// definition table."
///
/// Values are given in their computed serialization. Border sides are absent
/// because their color depends on the element's `color`.
#[must_use]
pub fn initial_value(name: &str) -> Option<&'static str> {
    let value = match name {
        "display" => "inline",
        "position" => "static",
        "visibility" => "visible",
        "overflow" | "overflow-x" | "overflow-y" => "visible",
        "opacity" => "1",
        "z-index" => "auto",
        "color" => "rgb(0, 0, 0)",
        "background-color" => "rgba(0, 0, 0, 0)",
        "background-image" => "none",
        "background-size" => "auto",
        "box-shadow" => "none",
        "border-radius"
        | "border-top-left-radius"
        | "border-top-right-radius"
        | "border-bottom-right-radius"
        | "border-bottom-left-radius" => "0px",
        "border-top-width" | "border-right-width" | "border-bottom-width"
        | "border-left-width" => "0px",
        "border-top-style" | "border-right-style" | "border-bottom-style"
        | "border-left-style" => "none",
        "content" => "normal",
        "fill" => "rgb(0, 0, 0)",
        "font-size" => "16px",
        "font-family" => "",
        "line-height" | "letter-spacing" => "normal",
        "text-align" => "start",
        "text-transform" => "none",
        "text-decoration" | "text-decoration-line" => "none",
        "vertical-align" => "baseline",
        "margin-top" | "margin-right" | "margin-bottom" | "margin-left" => "0px",
        "padding-top" | "padding-right" | "padding-bottom" | "padding-left" => "0px",
        "width" | "height" => "auto",
        "flex-direction" => "row",
        "justify-content" | "align-items" => "normal",
        "object-fit" => "fill",
        _ => return None,
    };
    Some(value)
}
