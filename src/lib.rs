//! Shared library for `docpress`
//!
//! Builds the project's documentation set: PDF (or HTML/Markdown) documents
//! laid out from TOML definitions, with Graphviz diagrams rendered on the fly.

pub mod core;

pub use crate::core::*;
