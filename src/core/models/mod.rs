//! Document model
//!
//! Typed representation of the content each generator lays out: page
//! geometry, paragraph styles, inline markup, tables and their style
//! commands, code listings and diagram placements.

pub mod color;
pub mod document;
pub mod error;
pub mod font;
pub mod markup;
pub mod style;
pub mod table;
pub mod units;

pub use color::Color;
pub use document::{Block, CodeBlock, DiagramBlock, Document};
pub use error::DocumentError;
pub use font::{fold_to_ascii, FontName};
pub use markup::{Inline, SpanStyle};
pub use style::{Alignment, ParagraphStyle, StyleSheet, StyleSpec};
pub use table::{
    CellRange, CellStyle, HAlign, ResolvedTableStyle, RuleLine, TableBlock, TableCommand, VAlign,
};
pub use units::{Length, Margins, Orientation, PageSetup, PaperSize};
