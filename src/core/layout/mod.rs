//! Flow layout engine
//!
//! Turns a [`Document`] into pages of positioned drawing operations. The
//! engine fills a single frame per page (the page minus its margins) from top
//! to bottom, breaking paragraphs into lines, splitting tables between rows and
//! moving images and listings to the next page when they do not fit.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner of the
//! page.

mod flow;
pub mod table;
pub mod text;

use crate::core::models::{Color, Document, FontName};

pub use flow::layout_document;

/// Stroke settings for outlines and rules
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Line color
    pub color: Color,
    /// Line width in points
    pub width: f32,
}

/// A single drawing instruction
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// A run of text starting at `x` on baseline `y`
    Text {
        /// Left edge
        x: f32,
        /// Baseline
        y: f32,
        /// Face
        font: FontName,
        /// Size in points
        size: f32,
        /// Fill color
        color: Color,
        /// Text, already folded to what the built-in fonts can show
        text: String,
    },
    /// An axis-aligned rectangle with its bottom-left corner at `x`, `y`
    Rect {
        /// Left edge
        x: f32,
        /// Bottom edge
        y: f32,
        /// Width
        width: f32,
        /// Height
        height: f32,
        /// Interior fill
        fill: Option<Color>,
        /// Outline
        stroke: Option<Stroke>,
    },
    /// A straight line
    Line {
        /// Start x
        x1: f32,
        /// Start y
        y1: f32,
        /// End x
        x2: f32,
        /// End y
        y2: f32,
        /// Stroke
        stroke: Stroke,
    },
    /// A diagram image scaled into the box with bottom-left corner `x`, `y`
    Image {
        /// Diagram id the renderer resolves to an image file
        diagram: String,
        /// Left edge
        x: f32,
        /// Bottom edge
        y: f32,
        /// Drawn width
        width: f32,
        /// Drawn height
        height: f32,
    },
}

/// The drawing operations of one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Operations in painting order
    pub ops: Vec<DrawOp>,
}

/// Shape of a table as laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSummary {
    /// Rows drawn (across all pages)
    pub rows: usize,
    /// Columns
    pub cols: usize,
}

/// What the layout produced, for logging and tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutSummary {
    /// Number of pages
    pub pages: usize,
    /// Every table in document order
    pub tables: Vec<TableSummary>,
    /// Diagrams drawn
    pub images_placed: Vec<String>,
    /// Diagrams skipped because their image was unavailable
    pub images_skipped: Vec<String>,
}

/// A fully laid-out document
#[derive(Debug, Clone)]
pub struct LaidOutDocument {
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Pages in order
    pub pages: Vec<Page>,
    /// Summary of the layout
    pub summary: LayoutSummary,
}

impl LaidOutDocument {
    /// Lay out `doc`, drawing only the diagrams for which `has_image` is true
    #[must_use]
    pub fn new(doc: &Document, has_image: &dyn Fn(&str) -> bool) -> Self {
        layout_document(doc, has_image)
    }
}

/// Distance from the top of a line box to its baseline
#[must_use]
pub fn baseline_offset(size: f32, leading: f32) -> f32 {
    (leading - size) / 2.0 + 0.718 * size
}
