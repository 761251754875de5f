//! Captured pages.
//!
//! A capture is a JSON snapshot of a rendered document: the element tree with
//! each element's computed style (and its `::before`/`::after` styles),
//! bounding rects, text-node rects, form-control values and SVG markup.
//! [`CapturedPage`] loads one and serves it through [`StyleContext`].
//!
//! ```json
//! {
//!   "viewport": { "width": 1280, "scrollHeight": 2400 },
//!   "baseUrl": "https://example.com/docs/",
//!   "root": {
//!     "tag": "html",
//!     "children": [{
//!       "tag": "body",
//!       "style": { "display": "block" },
//!       "rect": { "x": 0, "y": 0, "width": 1280, "height": 2400 },
//!       "children": [{ "text": "Hello", "rect": { "x": 8, "y": 8, "width": 40, "height": 18 } }]
//!     }]
//!   }
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;
use strata_css::ComputedStyle;
use strata_dom::{DomTree, ElementData, Namespace, NodeId, NodeType, Rect};

use crate::context::{EMPTY_STYLE, Pseudo, StyleContext, Viewport};
use crate::error::CaptureError;

/// Top-level capture document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureDocument {
    /// Page size.
    pub viewport: Viewport,
    /// URL of the captured page.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Document element (`<html>`) or the element to convert.
    pub root: CapturedNode,
}

/// A captured element or text node.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CapturedNode {
    /// An element.
    Element(Box<CapturedElement>),
    /// A text node.
    Text(CapturedText),
}

/// A captured element.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedElement {
    /// Local name.
    pub tag: String,
    /// `"svg"` for SVG content. Inferred from `<svg>` ancestry when absent.
    #[serde(default)]
    pub namespace: Option<String>,
    /// Attributes.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
    /// Computed style.
    #[serde(default)]
    pub style: ComputedStyle,
    /// Computed style read while the element was hidden.
    #[serde(default)]
    pub hidden_style: Option<ComputedStyle>,
    /// Bounding client rect.
    #[serde(default)]
    pub rect: Option<Rect>,
    /// `::before` box.
    #[serde(default)]
    pub before: Option<CapturedPseudo>,
    /// `::after` box.
    #[serde(default)]
    pub after: Option<CapturedPseudo>,
    /// Live form-control value.
    #[serde(default)]
    pub value: Option<String>,
    /// Serialized markup (captured for `<svg>` roots).
    #[serde(default)]
    pub outer_html: Option<String>,
    /// Light-tree children.
    #[serde(default)]
    pub children: Vec<CapturedNode>,
    /// Shadow-root children.
    #[serde(default)]
    pub shadow_children: Vec<CapturedNode>,
}

/// A captured pseudo-element box.
#[derive(Debug, Deserialize)]
pub struct CapturedPseudo {
    /// Computed style of the pseudo-element.
    #[serde(default)]
    pub style: ComputedStyle,
    /// Measured generated box.
    #[serde(default)]
    pub rect: Option<Rect>,
}

/// A captured text node.
#[derive(Debug, Deserialize)]
pub struct CapturedText {
    /// Raw text.
    pub text: String,
    /// Range bounding rect.
    #[serde(default)]
    pub rect: Option<Rect>,
}

/// A loaded capture.
#[derive(Debug, Clone, Default)]
pub struct CapturedPage {
    dom: DomTree,
    root: NodeId,
    styles: HashMap<(NodeId, Option<Pseudo>), ComputedStyle>,
    hidden_styles: HashMap<NodeId, ComputedStyle>,
    rects: HashMap<(NodeId, Option<Pseudo>), Rect>,
    text_rects: HashMap<NodeId, Rect>,
    viewport: Viewport,
    base_url: Option<String>,
}

impl CapturedPage {
    /// Parse a capture from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::Json`] for malformed JSON and
    /// [`CaptureError::Invalid`] when the root is a text node.
    pub fn from_json(json: &str) -> Result<Self, CaptureError> {
        let document: CaptureDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Read and parse a capture file.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::Io`] if the file cannot be read, otherwise as
    /// [`CapturedPage::from_json`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CaptureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Build a page from a parsed capture document.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::Invalid`] when the root is not an element.
    pub fn from_document(document: CaptureDocument) -> Result<Self, CaptureError> {
        let CapturedNode::Element(root) = document.root else {
            return Err(CaptureError::Invalid(
                "capture root must be an element".to_string(),
            ));
        };

        let mut page = Self {
            viewport: document.viewport,
            base_url: document.base_url,
            ..Self::default()
        };
        let root_id = page.insert_element(*root, NodeId::ROOT, Namespace::Html, false);

        // Convert <body> when the capture starts at <html>; otherwise the
        // captured root itself.
        page.root = page.dom.body().unwrap_or(root_id);
        Ok(page)
    }

    fn insert_element(
        &mut self,
        element: CapturedElement,
        parent: NodeId,
        parent_namespace: Namespace,
        shadow: bool,
    ) -> NodeId {
        let namespace = match element.namespace.as_deref() {
            Some(ns) if ns.eq_ignore_ascii_case("svg") => Namespace::Svg,
            Some(_) => Namespace::Html,
            None if element.tag.eq_ignore_ascii_case("svg") => Namespace::Svg,
            None => parent_namespace,
        };

        let mut data = ElementData::new(&element.tag);
        data.namespace = namespace;
        data.attrs = element.attrs.into_iter().collect();
        data.value = element.value;
        data.markup = element.outer_html;

        let id = self.dom.alloc(NodeType::Element(data));
        if shadow {
            self.dom.append_shadow_child(parent, id);
        } else {
            self.dom.append_child(parent, id);
        }

        let _ = self.styles.insert((id, None), element.style);
        if let Some(hidden) = element.hidden_style {
            let _ = self.hidden_styles.insert(id, hidden);
        }
        if let Some(rect) = element.rect {
            let _ = self.rects.insert((id, None), rect);
        }
        for (pseudo, captured) in [(Pseudo::Before, element.before), (Pseudo::After, element.after)] {
            if let Some(captured) = captured {
                let _ = self.styles.insert((id, Some(pseudo)), captured.style);
                if let Some(rect) = captured.rect {
                    let _ = self.rects.insert((id, Some(pseudo)), rect);
                }
            }
        }

        for child in element.shadow_children {
            self.insert_node(child, id, namespace, true);
        }
        for child in element.children {
            self.insert_node(child, id, namespace, false);
        }
        id
    }

    fn insert_node(&mut self, node: CapturedNode, parent: NodeId, namespace: Namespace, shadow: bool) {
        match node {
            CapturedNode::Element(element) => {
                let _ = self.insert_element(*element, parent, namespace, shadow);
            }
            CapturedNode::Text(text) => {
                let id = self.dom.alloc(NodeType::Text(text.text));
                if shadow {
                    self.dom.append_shadow_child(parent, id);
                } else {
                    self.dom.append_child(parent, id);
                }
                if let Some(rect) = text.rect {
                    let _ = self.text_rects.insert(id, rect);
                }
            }
        }
    }
}

impl StyleContext for CapturedPage {
    fn dom(&self) -> &DomTree {
        &self.dom
    }

    fn document_root(&self) -> NodeId {
        self.root
    }

    fn computed_style(&self, node: NodeId, pseudo: Option<Pseudo>) -> &ComputedStyle {
        self.styles.get(&(node, pseudo)).unwrap_or(&EMPTY_STYLE)
    }

    fn computed_style_hidden(&self, node: NodeId, pseudo: Option<Pseudo>) -> &ComputedStyle {
        match pseudo {
            None => self
                .hidden_styles
                .get(&node)
                .unwrap_or_else(|| self.computed_style(node, None)),
            Some(_) => self.computed_style(node, pseudo),
        }
    }

    fn bounding_rect(&self, node: NodeId, pseudo: Option<Pseudo>) -> Option<Rect> {
        self.rects.get(&(node, pseudo)).copied()
    }

    fn text_rect(&self, node: NodeId) -> Option<Rect> {
        self.text_rects.get(&node).copied()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

/// Builds a [`CapturedPage`] in code.
///
/// Starts with `<html><body>` sized to the viewport.
///
/// # Example
/// ```
/// use strata_dom::Rect;
/// use strata_layers::capture::PageBuilder;
///
/// let mut page = PageBuilder::new(800.0, 600.0);
/// let body = page.body();
/// let div = page.element(body, "div", Rect::new(0.0, 0.0, 100.0, 50.0), &[("background-color", "red")]);
/// page.text(div, "Hi", Rect::new(4.0, 4.0, 20.0, 16.0));
/// let page = page.build();
/// ```
#[derive(Debug)]
pub struct PageBuilder {
    page: CapturedPage,
    body: NodeId,
}

impl PageBuilder {
    /// An empty page of the given size.
    #[must_use]
    pub fn new(width: f64, scroll_height: f64) -> Self {
        let mut page = CapturedPage {
            viewport: Viewport {
                width,
                scroll_height,
            },
            ..CapturedPage::default()
        };
        let html = page.dom.alloc(NodeType::Element(ElementData::new("html")));
        page.dom.append_child(NodeId::ROOT, html);
        let body = page.dom.alloc(NodeType::Element(ElementData::new("body")));
        page.dom.append_child(html, body);

        let block = ComputedStyle::from_pairs([("display", "block")]);
        let _ = page.styles.insert((html, None), block.clone());
        let _ = page.styles.insert((body, None), block);
        let viewport_rect = Rect::new(0.0, 0.0, width, scroll_height);
        let _ = page.rects.insert((html, None), viewport_rect);
        let _ = page.rects.insert((body, None), viewport_rect);
        page.root = body;

        Self { page, body }
    }

    /// The `<body>` element.
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Set the base URL.
    pub fn base_url(&mut self, url: &str) -> &mut Self {
        self.page.base_url = Some(url.to_string());
        self
    }

    /// Append an element with a rect and computed style.
    pub fn element(&mut self, parent: NodeId, tag: &str, rect: Rect, style: &[(&str, &str)]) -> NodeId {
        self.insert(parent, tag, rect, style, false)
    }

    /// Append an element to `host`'s shadow root.
    pub fn shadow_element(&mut self, host: NodeId, tag: &str, rect: Rect, style: &[(&str, &str)]) -> NodeId {
        self.insert(host, tag, rect, style, true)
    }

    fn insert(&mut self, parent: NodeId, tag: &str, rect: Rect, style: &[(&str, &str)], shadow: bool) -> NodeId {
        let parent_namespace = self
            .page
            .dom
            .as_element(parent)
            .map_or(Namespace::Html, |e| e.namespace);
        let mut data = ElementData::new(tag);
        data.namespace = if data.is("svg") {
            Namespace::Svg
        } else {
            parent_namespace
        };

        let id = self.page.dom.alloc(NodeType::Element(data));
        if shadow {
            self.page.dom.append_shadow_child(parent, id);
        } else {
            self.page.dom.append_child(parent, id);
        }
        let _ = self
            .page
            .styles
            .insert((id, None), ComputedStyle::from_pairs(style.iter().copied()));
        let _ = self.page.rects.insert((id, None), rect);
        id
    }

    /// Append a text node.
    pub fn text(&mut self, parent: NodeId, text: &str, rect: Rect) -> NodeId {
        let id = self.page.dom.alloc(NodeType::Text(text.to_string()));
        self.page.dom.append_child(parent, id);
        let _ = self.page.text_rects.insert(id, rect);
        id
    }

    /// Add computed properties to an element.
    pub fn style(&mut self, node: NodeId, style: &[(&str, &str)]) -> &mut Self {
        let computed = self.page.styles.entry((node, None)).or_default();
        for (name, value) in style {
            computed.set(name, value);
        }
        self
    }

    /// Set the style observed while the element is hidden.
    pub fn hidden_style(&mut self, node: NodeId, style: &[(&str, &str)]) -> &mut Self {
        let _ = self
            .page
            .hidden_styles
            .insert(node, ComputedStyle::from_pairs(style.iter().copied()));
        self
    }

    /// Give an element a `::before`/`::after` box.
    pub fn pseudo(&mut self, node: NodeId, pseudo: Pseudo, rect: Rect, style: &[(&str, &str)]) -> &mut Self {
        let _ = self.page.styles.insert(
            (node, Some(pseudo)),
            ComputedStyle::from_pairs(style.iter().copied()),
        );
        let _ = self.page.rects.insert((node, Some(pseudo)), rect);
        self
    }

    /// Set an attribute.
    pub fn attr(&mut self, node: NodeId, name: &str, value: &str) -> &mut Self {
        if let Some(NodeType::Element(data)) = self.page.dom.get_mut(node).map(|n| &mut n.node_type) {
            let _ = data.attrs.insert(name.to_string(), value.to_string());
        }
        self
    }

    /// Set a form control's live value.
    pub fn value(&mut self, node: NodeId, value: &str) -> &mut Self {
        if let Some(NodeType::Element(data)) = self.page.dom.get_mut(node).map(|n| &mut n.node_type) {
            data.value = Some(value.to_string());
        }
        self
    }

    /// Set an element's serialized markup.
    pub fn markup(&mut self, node: NodeId, markup: &str) -> &mut Self {
        if let Some(NodeType::Element(data)) = self.page.dom.get_mut(node).map(|n| &mut n.node_type) {
            data.markup = Some(markup.to_string());
        }
        self
    }

    /// Finish the page.
    #[must_use]
    pub fn build(self) -> CapturedPage {
        self.page
    }
}
