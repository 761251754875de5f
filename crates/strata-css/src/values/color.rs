//! CSS Color values and parsing
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)

use serde::Serialize;

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
///
/// sRGB color with every channel normalized to `0.0..=1.0`, the form the
/// design canvas consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    /// "the red color channel"
    pub r: f64,
    /// "the green color channel"
    pub g: f64,
    /// "the blue color channel"
    pub b: f64,
    /// "the alpha channel" (1.0 = fully opaque)
    pub a: f64,
}

impl Rgba {
    /// Black (#000000)
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// [§ 6.2 transparent](https://www.w3.org/TR/css-color-4/#transparent-color)
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Build a color from 8-bit channels and a `0.0..=1.0` alpha.
    #[must_use]
    pub fn from_u8(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// A color with zero alpha paints nothing.
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    /// "The syntax of a <hex-color> is a <hash-token> token whose value consists of
    /// 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            // [§ 4.2.1]
            // "The three-digit RGB notation (#RGB) is converted into six-digit form (#RRGGBB)
            // by replicating digits, not by adding zeros."
            3 | 4 => {
                let r = channel(&hex[0..1].repeat(2))?;
                let g = channel(&hex[1..2].repeat(2))?;
                let b = channel(&hex[2..3].repeat(2))?;
                let a = if hex.len() == 4 {
                    f64::from(channel(&hex[3..4].repeat(2))?) / 255.0
                } else {
                    1.0
                };
                Some(Self::from_u8(r, g, b, a))
            }
            6 | 8 => {
                let r = channel(&hex[0..2])?;
                let g = channel(&hex[2..4])?;
                let b = channel(&hex[4..6])?;
                let a = if hex.len() == 8 {
                    f64::from(channel(&hex[6..8])?) / 255.0
                } else {
                    1.0
                };
                Some(Self::from_u8(r, g, b, a))
            }
            _ => None,
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    ///
    /// Computed values are already serialized as `rgb()`, so only the basic
    /// palette plus a few common extended keywords is recognized.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let (r, g, b) = match name.to_ascii_lowercase().as_str() {
            "white" => (255, 255, 255),
            "black" => (0, 0, 0),
            "red" => (255, 0, 0),
            "green" => (0, 128, 0),
            "blue" => (0, 0, 255),
            "yellow" => (255, 255, 0),
            "cyan" | "aqua" => (0, 255, 255),
            "magenta" | "fuchsia" => (255, 0, 255),
            "gray" | "grey" => (128, 128, 128),
            "lime" => (0, 255, 0),
            "maroon" => (128, 0, 0),
            "navy" => (0, 0, 128),
            "olive" => (128, 128, 0),
            "purple" => (128, 0, 128),
            "silver" => (192, 192, 192),
            "teal" => (0, 128, 128),
            "orange" => (255, 165, 0),
            "pink" => (255, 192, 203),
            "brown" => (165, 42, 42),
            "darkgray" | "darkgrey" => (169, 169, 169),
            "lightgray" | "lightgrey" => (211, 211, 211),
            "whitesmoke" => (245, 245, 245),
            "transparent" => return Some(Self::TRANSPARENT),
            _ => return None,
        };
        Some(Self::from_u8(r, g, b, 1.0))
    }

    /// The 8-bit value of a normalized channel.
    #[must_use]
    pub fn channel_u8(value: f64) -> u8 {
        (value * 255.0).round().clamp(0.0, 255.0) as u8
    }
}

/// Parse any color serialization a computed style may carry: `rgb()`/`rgba()`
/// (legacy comma or modern space syntax), hex notation, named colors and
/// `transparent`.
#[must_use]
pub fn parse_color(value: &str) -> Option<Rgba> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if value.starts_with('#') {
        return Rgba::from_hex(value);
    }
    let lower = value.to_ascii_lowercase();
    if let Some(args) = function_args(&lower, "rgba").or_else(|| function_args(&lower, "rgb")) {
        return parse_rgb_function(args);
    }
    Rgba::from_named(&lower)
}

/// Serialize a color the way `getComputedStyle()` does: `rgb(r, g, b)` when
/// opaque, `rgba(r, g, b, a)` otherwise.
#[must_use]
pub fn format_color(color: &Rgba) -> String {
    let r = Rgba::channel_u8(color.r);
    let g = Rgba::channel_u8(color.g);
    let b = Rgba::channel_u8(color.b);
    if color.a >= 1.0 {
        format!("rgb({r}, {g}, {b})")
    } else {
        format!("rgba({r}, {g}, {b}, {})", color.a)
    }
}

/// The text between `name(` and the closing parenthesis.
fn function_args<'a>(value: &'a str, name: &str) -> Option<&'a str> {
    value
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// A numeric value extracted from a color function argument.
#[derive(Debug, Clone, Copy)]
enum ColorArg {
    Number(f64),
    Percentage(f64),
}

impl ColorArg {
    fn parse(token: &str) -> Option<Self> {
        if let Some(pct) = token.strip_suffix('%') {
            pct.parse().ok().map(ColorArg::Percentage)
        } else {
            token.parse().ok().map(ColorArg::Number)
        }
    }
}

/// [§ 4.1 The RGB Functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
///
/// "rgb() = rgb( <percentage>{3} [ / <alpha-value> ]? ) |
///          rgb( <number>{3} [ / <alpha-value> ]? )"
///
/// Legacy: "rgb( <percentage>#{3} , <alpha-value>? ) |
///          rgb( <number>#{3} , <alpha-value>? )"
fn parse_rgb_function(args: &str) -> Option<Rgba> {
    let vals = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(ColorArg::parse)
        .collect::<Option<Vec<_>>>()?;
    if vals.len() < 3 || vals.len() > 4 {
        return None;
    }

    // "If omitted, it defaults to 100%."
    let a = vals.get(3).map_or(1.0, |&arg| alpha_value(arg));

    Some(Rgba {
        r: channel_value(vals[0]),
        g: channel_value(vals[1]),
        b: channel_value(vals[2]),
        a,
    })
}

/// "Values outside these ranges are not invalid, but are clamped to the
/// ranges defined here at parsed-value time."
fn channel_value(arg: ColorArg) -> f64 {
    let v = match arg {
        ColorArg::Number(n) => n / 255.0,
        // "100% = 255"
        ColorArg::Percentage(p) => p / 100.0,
    };
    v.clamp(0.0, 1.0)
}

/// "The <alpha-value> can be a <number> (clamped to [0, 1]) or a
/// <percentage> (clamped to [0%, 100%])."
fn alpha_value(arg: ColorArg) -> f64 {
    let v = match arg {
        ColorArg::Number(n) => n,
        ColorArg::Percentage(p) => p / 100.0,
    };
    v.clamp(0.0, 1.0)
}
