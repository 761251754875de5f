//! Conversion options.
//!
//! Options load from a `strata.toml` file; every field has a default so a
//! partial file (or none at all) is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_css::{Rgba, parse_color};
use strum_macros::{Display, EnumString};

use crate::error::ConfigError;

/// Default ceiling for both reconciliation loops.
pub const DEFAULT_ITERATION_LIMIT: usize = 10_000;

/// Default fill for placeholder text in empty form controls.
pub const DEFAULT_PLACEHOLDER_COLOR: &str = "#757575";

/// How per-element layers are nested into a tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssemblyStrategy {
    /// Single pre-order walk with a parent-keyed multimap.
    #[default]
    Canonical,
    /// Flat bag of layers repaired to a fixed point.
    Reconcile,
}

/// Order of a frame's `children` array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PaintOrder {
    /// Highest z-index first.
    #[default]
    TopmostFirst,
    /// Lowest z-index first.
    BottommostFirst,
}

/// Options for [`crate::convert`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Nest layers into frames. When false the output is flat.
    pub use_frames: bool,
    /// Nesting strategy used when `use_frames` is set.
    pub strategy: AssemblyStrategy,
    /// Run common-ancestor regrouping after canonical assembly.
    pub group_common_ancestors: bool,
    /// Ceiling for the reconciliation and regrouping loops.
    pub iteration_limit: usize,
    /// Sort direction for children.
    pub paint_order: PaintOrder,
    /// Union inline elements' child rects into their own rect.
    pub aggregate_inline_rects: bool,
    /// Fill for placeholder text in empty inputs and textareas.
    pub placeholder_color: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            use_frames: true,
            strategy: AssemblyStrategy::Canonical,
            group_common_ancestors: false,
            iteration_limit: DEFAULT_ITERATION_LIMIT,
            paint_order: PaintOrder::TopmostFirst,
            aggregate_inline_rects: false,
            placeholder_color: DEFAULT_PLACEHOLDER_COLOR.to_string(),
        }
    }
}

impl ConvertOptions {
    /// Load options from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is not valid TOML,
    /// or names an unparsable placeholder color.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse options from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] on invalid TOML or an unparsable placeholder
    /// color.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(content)?;
        if parse_color(&options.placeholder_color).is_none() {
            return Err(ConfigError::Invalid(format!(
                "placeholder_color '{}' is not a color",
                options.placeholder_color
            )));
        }
        Ok(options)
    }

    /// The placeholder fill, falling back to the default gray.
    #[must_use]
    pub fn placeholder_rgba(&self) -> Rgba {
        parse_color(&self.placeholder_color)
            .or_else(|| parse_color(DEFAULT_PLACEHOLDER_COLOR))
            .unwrap_or(Rgba::BLACK)
    }
}
