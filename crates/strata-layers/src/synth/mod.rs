//! Layer synthesis: one element or text node in, layer records out.

pub mod border;
pub mod element;
pub mod svg;
pub mod text;

pub use element::{ElementLayers, element_to_layers};
pub use text::{form_control_text, text_to_layer};
