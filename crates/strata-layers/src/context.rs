//! The capability through which the compiler reads a rendered document.
//!
//! Every extractor takes a [`StyleContext`] explicitly. Nothing reads ambient
//! global state, so conversions are deterministic and testable headless.

use serde::{Deserialize, Serialize};
use strata_css::ComputedStyle;
use strata_dom::{DomTree, NodeId, Rect};

/// Style returned for nodes the context knows nothing about.
pub static EMPTY_STYLE: ComputedStyle = ComputedStyle::new();

/// [§ 11.1 Generated content pseudo-elements](https://www.w3.org/TR/css-pseudo-4/#generated-content)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pseudo {
    /// `::before`
    Before,
    /// `::after`
    After,
}

impl Pseudo {
    /// Both pseudo-elements, in paint order.
    pub const ALL: [Self; 2] = [Self::Before, Self::After];

    /// The layer name reserved for this pseudo-element.
    #[must_use]
    pub fn layer_name(self) -> &'static str {
        match self {
            Self::Before => "::before",
            Self::After => "::after",
        }
    }
}

/// Size of the captured page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// `window.innerWidth`
    pub width: f64,
    /// `document.documentElement.scrollHeight`
    pub scroll_height: f64,
}

/// Read access to a rendered document: tree, computed styles and geometry.
pub trait StyleContext {
    /// The document tree.
    fn dom(&self) -> &DomTree;

    /// The element whose subtree is converted (normally `<body>`). It becomes
    /// the source of the document root frame.
    fn document_root(&self) -> NodeId;

    /// Computed style of an element or one of its pseudo-elements.
    fn computed_style(&self, node: NodeId, pseudo: Option<Pseudo>) -> &ComputedStyle;

    /// Computed style read while the element is hidden, so `width`/`height`
    /// report declared sizes rather than used ones.
    fn computed_style_hidden(&self, node: NodeId, pseudo: Option<Pseudo>) -> &ComputedStyle {
        self.computed_style(node, pseudo)
    }

    /// [CSSOM View § getBoundingClientRect()](https://drafts.csswg.org/cssom-view/#dom-element-getboundingclientrect)
    ///
    /// For a pseudo-element this is the generated box.
    fn bounding_rect(&self, node: NodeId, pseudo: Option<Pseudo>) -> Option<Rect>;

    /// Bounds of a `Range` selecting a text node.
    fn text_rect(&self, node: NodeId) -> Option<Rect>;

    /// Structural parent used by the assembler's ancestor walks.
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.dom().parent(node)
    }

    /// Page size.
    fn viewport(&self) -> Viewport;

    /// URL the page was captured from, for resolving relative image URLs.
    fn base_url(&self) -> Option<&str>;
}
