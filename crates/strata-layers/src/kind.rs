//! Element classification.

use strata_dom::{ElementData, Namespace, NodeId};

use crate::context::StyleContext;

/// What kind of primitive an element maps to. Computed once per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `<input>`: carries its value as a text sub-layer.
    Input,
    /// `<textarea>`: like `Input`; its DOM text is not scanned.
    Textarea,
    /// `<img>`
    Image,
    /// `<picture>`
    Picture,
    /// `<video>`
    Video,
    /// Outermost `<svg>`: exported as markup.
    SvgRoot,
    /// Anything inside an `<svg>`: covered by the root's markup.
    SvgChild,
    /// Any other element.
    Generic,
}

impl ElementKind {
    /// Classify an element. Non-elements are `Generic`.
    pub fn of(ctx: &dyn StyleContext, node: NodeId) -> Self {
        let Some(element) = ctx.dom().as_element(node) else {
            return Self::Generic;
        };

        if element.namespace == Namespace::Svg || element.is("svg") {
            let parent_is_svg = ctx
                .dom()
                .parent_element(node)
                .and_then(|p| ctx.dom().as_element(p))
                .is_some_and(|p| p.namespace == Namespace::Svg || p.is("svg"));
            return if element.is("svg") && !parent_is_svg {
                Self::SvgRoot
            } else {
                Self::SvgChild
            };
        }

        Self::of_html(element)
    }

    fn of_html(element: &ElementData) -> Self {
        match element.tag_name.as_str() {
            "input" => Self::Input,
            "textarea" => Self::Textarea,
            "img" => Self::Image,
            "picture" => Self::Picture,
            "video" => Self::Video,
            _ => Self::Generic,
        }
    }

    /// Form controls whose text comes from their value, not DOM text nodes.
    #[must_use]
    pub fn is_form_control(self) -> bool {
        matches!(self, Self::Input | Self::Textarea)
    }

    /// Replaced elements that always produce a frame for their image paint.
    #[must_use]
    pub fn is_media(self) -> bool {
        matches!(self, Self::Image | Self::Picture | Self::Video)
    }
}
