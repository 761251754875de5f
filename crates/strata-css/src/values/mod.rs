//! Parsers for the computed-value grammars the layer compiler reads.

pub mod border;
pub mod color;
pub mod length;
pub mod radius;
pub mod shadow;
pub mod url;
