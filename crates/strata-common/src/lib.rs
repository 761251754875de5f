//! Common utilities for the Strata layer compiler.
//!
//! This crate provides shared infrastructure used by all Strata components:
//! - **Warning System** - colored terminal output for degraded conversions
//! - **Networking** - blocking image fetches and `data:` URL decoding
//! - **URLs** - resolution of relative and protocol-relative image URLs

pub mod net;
pub mod url;
pub mod warning;
