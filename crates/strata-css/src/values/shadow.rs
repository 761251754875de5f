//! Box shadows
//!
//! [§ 6.1 'box-shadow'](https://www.w3.org/TR/css-backgrounds-3/#box-shadow)

use serde::Serialize;

use super::color::{Rgba, parse_color};
use super::length::parse_px;

/// [§ 6.1 'box-shadow'](https://www.w3.org/TR/css-backgrounds-3/#box-shadow)
///
/// "The 'box-shadow' property attaches one or more drop-shadows to the box."
///
/// `<shadow> = inset? && <length>{2,4} && <color>?`
///
/// - 2 required lengths: offset-x, offset-y
/// - 2 optional lengths: blur-radius (default 0), spread-radius (default 0)
/// - `inset` keyword: inner shadow
/// - color defaults to opaque black
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxShadow {
    /// Horizontal offset. Positive = right.
    pub offset_x: f64,
    /// Vertical offset. Positive = down.
    pub offset_y: f64,
    /// Blur radius.
    pub blur_radius: f64,
    /// Outward spread. Always 0 for inset shadows.
    pub spread_radius: f64,
    /// Inward spread of an inset shadow. Always 0 for outer shadows.
    pub inset_spread: f64,
    /// Shadow color.
    pub color: Rgba,
    /// If true, shadow is drawn inside the box (inset shadow).
    pub inset: bool,
}

/// Parse a computed `box-shadow` list. `none` and malformed descriptors
/// produce no entries; source order is kept.
#[must_use]
pub fn parse_box_shadows(value: &str) -> Vec<BoxShadow> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Vec::new();
    }
    split_top_level(value, ',')
        .into_iter()
        .filter_map(parse_shadow)
        .collect()
}

fn parse_shadow(descriptor: &str) -> Option<BoxShadow> {
    let mut lengths = Vec::with_capacity(4);
    let mut color_tokens = Vec::new();
    let mut inset = false;

    for token in split_top_level(descriptor, ' ') {
        if token.eq_ignore_ascii_case("inset") {
            inset = true;
        } else if let Some(px) = parse_px(token) {
            lengths.push(px);
        } else {
            color_tokens.push(token);
        }
    }

    if lengths.len() < 2 || lengths.len() > 4 {
        return None;
    }
    let color = if color_tokens.is_empty() {
        Rgba::BLACK
    } else {
        parse_color(&color_tokens.join(" "))?
    };

    let spread = lengths.get(3).copied().unwrap_or(0.0);
    let (spread_radius, inset_spread) = if inset { (0.0, spread) } else { (spread, 0.0) };

    Some(BoxShadow {
        offset_x: lengths[0],
        offset_y: lengths[1],
        blur_radius: lengths.get(2).copied().unwrap_or(0.0).max(0.0),
        spread_radius,
        inset_spread,
        color,
        inset,
    })
}

/// Split on `separator` outside parentheses, trimming each piece and dropping
/// empty ones. A space separator splits on any whitespace.
#[must_use]
pub fn split_top_level(value: &str, separator: char) -> Vec<&str> {
    let matches = |c: char| {
        if separator == ' ' {
            c.is_whitespace()
        } else {
            c == separator
        }
    };

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if depth == 0 && matches(c) => {
                parts.push(&value[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}
