//! CSS Length values and parsing
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//!
//! Computed values arrive already absolutized, so pixels and percentages are
//! the only units that survive to this point.

use serde::Serialize;

/// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths) or
/// [§ 4.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LengthPercentage {
    /// "1px = 1/96th of 1in"
    Px(f64),
    /// "a <number> immediately followed by a percent sign '%'"
    Percent(f64),
}

impl LengthPercentage {
    /// Resolve against `basis` (only percentages depend on it).
    #[must_use]
    pub fn resolve(&self, basis: f64) -> f64 {
        match self {
            Self::Px(px) => *px,
            Self::Percent(pct) => basis * pct / 100.0,
        }
    }
}

/// Parse a pixel length such as `12px`, `-3.5px` or a bare `0`.
///
/// Returns `None` for keywords (`auto`, `normal`) and for other units.
#[must_use]
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = match value.strip_suffix("px") {
        Some(number) => number,
        // [§ 4.1](https://www.w3.org/TR/css-values-4/#lengths)
        // "for zero lengths the unit identifier is optional"
        None if value.parse::<f64>().is_ok_and(|n| n == 0.0) => value,
        None => return None,
    };
    number.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parse a `<length-percentage>`.
#[must_use]
pub fn parse_length_percentage(value: &str) -> Option<LengthPercentage> {
    let value = value.trim();
    if let Some(pct) = value.strip_suffix('%') {
        return pct
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(LengthPercentage::Percent);
    }
    parse_px(value).map(LengthPercentage::Px)
}

/// Whether a used `width`/`height` value is an explicit pixel length.
#[must_use]
pub fn is_px_length(value: &str) -> bool {
    value.trim().ends_with("px")
}
