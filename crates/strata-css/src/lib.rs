//! CSS values for captured documents.
//!
//! A capture carries already-resolved computed values as strings, exactly as
//! `getComputedStyle()` reports them. This crate stores them in a
//! [`ComputedStyle`] map that answers with the CSS initial value when a
//! property was not captured, and parses the handful of value grammars the
//! layer compiler reads:
//!
//! - [CSS Color Level 4](https://www.w3.org/TR/css-color-4/): [`parse_color`]
//! - [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/):
//!   [`parse_px`], [`parse_length_percentage`]
//! - [CSS Backgrounds and Borders Level 3](https://www.w3.org/TR/css-backgrounds-3/):
//!   [`parse_border`], [`parse_box_shadows`], [`expand_border_radius`],
//!   [`extract_url`]

pub mod computed;
pub mod values;

pub use computed::{ComputedStyle, initial_value};
pub use values::border::{BorderSide, Side, parse_border};
pub use values::color::{Rgba, format_color, parse_color};
pub use values::length::{LengthPercentage, is_px_length, parse_length_percentage, parse_px};
pub use values::radius::{Corner, expand_border_radius, parse_corner_radius};
pub use values::shadow::{BoxShadow, parse_box_shadows, split_top_level};
pub use values::url::extract_url;
