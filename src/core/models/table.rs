//! Tables and their style commands
//!
//! A table is a grid of plain strings plus an ordered list of style commands.
//! Each command addresses a rectangle of cells as `[col0, row0, col1, row1]`;
//! negative indices count back from the last column or row, so
//! `[0, 0, -1, -1]` is the whole table and `[0, 0, -1, 0]` the header row.

use super::{Color, FontName, Length};
use serde::Deserialize;

/// Horizontal alignment inside a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HAlign {
    /// Left edge
    #[default]
    Left,
    /// Centered
    Center,
    /// Right edge
    Right,
}

/// Vertical alignment inside a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    /// Top edge
    Top,
    /// Centered
    Middle,
    /// Bottom edge
    #[default]
    Bottom,
}

/// A rectangle of cells, possibly with negative (from-the-end) indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "[i32; 4]")]
pub struct CellRange {
    /// First column
    pub col0: i32,
    /// First row
    pub row0: i32,
    /// Last column (inclusive)
    pub col1: i32,
    /// Last row (inclusive)
    pub row1: i32,
}

impl From<[i32; 4]> for CellRange {
    fn from([col0, row0, col1, row1]: [i32; 4]) -> Self {
        Self {
            col0,
            row0,
            col1,
            row1,
        }
    }
}

impl CellRange {
    /// The whole table
    pub const ALL: Self = Self {
        col0: 0,
        row0: 0,
        col1: -1,
        row1: -1,
    };

    /// Resolve against a table of `cols` x `rows`.
    ///
    /// Returns inclusive `(col0, row0, col1, row1)` or `None` when the
    /// rectangle is empty after clamping.
    #[must_use]
    pub fn resolve(&self, cols: usize, rows: usize) -> Option<(usize, usize, usize, usize)> {
        let fix = |index: i32, len: usize| -> Option<usize> {
            let len = i64::try_from(len).ok()?;
            let index = i64::from(index);
            let absolute = if index < 0 { len + index } else { index };
            if len == 0 || absolute < 0 {
                return None;
            }
            usize::try_from(absolute.min(len - 1)).ok()
        };
        let c0 = fix(self.col0, cols)?;
        let r0 = fix(self.row0, rows)?;
        let c1 = fix(self.col1, cols)?;
        let r1 = fix(self.row1, rows)?;
        (c0 <= c1 && r0 <= r1).then_some((c0, r0, c1, r1))
    }
}

/// One table style command
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case", deny_unknown_fields)]
pub enum TableCommand {
    /// Font face, optionally with a size
    Font {
        /// Target cells
        cells: CellRange,
        /// Face
        name: FontName,
        /// Size in points
        size: Option<f32>,
    },
    /// Font size
    FontSize {
        /// Target cells
        cells: CellRange,
        /// Size in points
        size: f32,
    },
    /// Text color
    TextColor {
        /// Target cells
        cells: CellRange,
        /// Color
        color: Color,
    },
    /// Cell background
    Background {
        /// Target cells
        cells: CellRange,
        /// Fill color
        color: Color,
    },
    /// Alternating row fills, cycling through `colors`
    RowBackgrounds {
        /// Target cells
        cells: CellRange,
        /// Fills applied to successive rows
        colors: Vec<Color>,
    },
    /// Lines around and between every cell
    Grid {
        /// Target cells
        cells: CellRange,
        /// Stroke width in points
        #[serde(default = "default_line_width")]
        width: f32,
        /// Stroke color
        color: Color,
    },
    /// Outline of the whole range
    Box {
        /// Target cells
        cells: CellRange,
        /// Stroke width in points
        #[serde(default = "default_line_width")]
        width: f32,
        /// Stroke color
        color: Color,
    },
    /// Horizontal alignment
    Align {
        /// Target cells
        cells: CellRange,
        /// Alignment
        value: HAlign,
    },
    /// Vertical alignment
    Valign {
        /// Target cells
        cells: CellRange,
        /// Alignment
        value: VAlign,
    },
    /// All four paddings
    Padding {
        /// Target cells
        cells: CellRange,
        /// Padding in points
        amount: f32,
    },
    /// Top padding
    TopPadding {
        /// Target cells
        cells: CellRange,
        /// Padding in points
        amount: f32,
    },
    /// Bottom padding
    BottomPadding {
        /// Target cells
        cells: CellRange,
        /// Padding in points
        amount: f32,
    },
    /// Left padding
    LeftPadding {
        /// Target cells
        cells: CellRange,
        /// Padding in points
        amount: f32,
    },
    /// Right padding
    RightPadding {
        /// Target cells
        cells: CellRange,
        /// Padding in points
        amount: f32,
    },
    /// Merge the range into one cell showing the top-left content
    Span {
        /// Target cells
        cells: CellRange,
    },
}

const fn default_line_width() -> f32 {
    1.0
}

impl TableCommand {
    /// Cells this command applies to
    #[must_use]
    pub const fn cells(&self) -> CellRange {
        match self {
            Self::Font { cells, .. }
            | Self::FontSize { cells, .. }
            | Self::TextColor { cells, .. }
            | Self::Background { cells, .. }
            | Self::RowBackgrounds { cells, .. }
            | Self::Grid { cells, .. }
            | Self::Box { cells, .. }
            | Self::Align { cells, .. }
            | Self::Valign { cells, .. }
            | Self::Padding { cells, .. }
            | Self::TopPadding { cells, .. }
            | Self::BottomPadding { cells, .. }
            | Self::LeftPadding { cells, .. }
            | Self::RightPadding { cells, .. }
            | Self::Span { cells } => *cells,
        }
    }
}

/// Appearance of a single cell after all commands are applied
#[derive(Debug, Clone, PartialEq)]
pub struct CellStyle {
    /// Font face
    pub font: FontName,
    /// Font size
    pub font_size: f32,
    /// Baseline distance
    pub leading: f32,
    /// Text color
    pub color: Color,
    /// Fill
    pub background: Option<Color>,
    /// Horizontal alignment
    pub align: HAlign,
    /// Vertical alignment
    pub valign: VAlign,
    /// Left padding
    pub left_padding: f32,
    /// Right padding
    pub right_padding: f32,
    /// Top padding
    pub top_padding: f32,
    /// Bottom padding
    pub bottom_padding: f32,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            font: FontName::Helvetica,
            font_size: 10.0,
            leading: 12.0,
            color: Color::BLACK,
            background: None,
            align: HAlign::Left,
            valign: VAlign::Bottom,
            left_padding: 6.0,
            right_padding: 6.0,
            top_padding: 3.0,
            bottom_padding: 3.0,
        }
    }
}

/// A stroked line segment requested by `grid` or `box`, in cell coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleLine {
    /// Horizontal lines run along a row edge, vertical along a column edge
    pub horizontal: bool,
    /// Row edge (0..=rows) for horizontal lines, column edge for vertical
    pub at: usize,
    /// First cell index covered along the line
    pub from: usize,
    /// Last cell index covered along the line (inclusive)
    pub to: usize,
    /// Stroke width
    pub width: f32,
    /// Stroke color
    pub color: Color,
}

/// A table block as written in a document
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableBlock {
    /// Width of each column
    pub col_widths: Vec<Length>,
    /// Cell text, row-major; `\n` forces a line break
    pub rows: Vec<Vec<String>>,
    /// Names of presets from the document's `table_styles`, applied first
    #[serde(default, rename = "use")]
    pub presets: Vec<String>,
    /// Commands applied after the presets
    #[serde(default)]
    pub style: Vec<TableCommand>,
}

impl TableBlock {
    /// Number of columns
    #[must_use]
    pub fn cols(&self) -> usize {
        self.col_widths.len()
    }

    /// Number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Sum of the column widths in points
    #[must_use]
    pub fn total_width(&self) -> f32 {
        self.col_widths.iter().map(|w| w.points()).sum()
    }
}

/// Per-cell styles, spans and rules produced by applying a command list
#[derive(Debug, Clone)]
pub struct ResolvedTableStyle {
    cols: usize,
    cells: Vec<CellStyle>,
    /// Merged rectangles as inclusive `(col0, row0, col1, row1)`
    pub spans: Vec<(usize, usize, usize, usize)>,
    /// Lines to stroke, in command order
    pub rules: Vec<RuleLine>,
}

impl ResolvedTableStyle {
    /// Apply `commands` in order to a `cols` x `rows` grid of default cells
    #[must_use]
    pub fn resolve<'a>(
        cols: usize,
        rows: usize,
        commands: impl IntoIterator<Item = &'a TableCommand>,
    ) -> Self {
        let mut resolved = Self {
            cols,
            cells: vec![CellStyle::default(); cols * rows],
            spans: Vec::new(),
            rules: Vec::new(),
        };
        for command in commands {
            let Some(range) = command.cells().resolve(cols, rows) else {
                continue;
            };
            resolved.apply(command, range);
        }
        resolved
    }

    fn apply(&mut self, command: &TableCommand, (c0, r0, c1, r1): (usize, usize, usize, usize)) {
        match command {
            TableCommand::RowBackgrounds { colors, .. } => {
                if colors.is_empty() {
                    return;
                }
                for row in r0..=r1 {
                    let fill = colors[(row - r0) % colors.len()];
                    for col in c0..=c1 {
                        self.cell_mut(col, row).background = Some(fill);
                    }
                }
            }
            TableCommand::Grid { width, color, .. } => {
                for row in r0..=r1 + 1 {
                    self.rules.push(RuleLine {
                        horizontal: true,
                        at: row,
                        from: c0,
                        to: c1,
                        width: *width,
                        color: *color,
                    });
                }
                for col in c0..=c1 + 1 {
                    self.rules.push(RuleLine {
                        horizontal: false,
                        at: col,
                        from: r0,
                        to: r1,
                        width: *width,
                        color: *color,
                    });
                }
            }
            TableCommand::Box { width, color, .. } => {
                for (horizontal, at, from, to) in [
                    (true, r0, c0, c1),
                    (true, r1 + 1, c0, c1),
                    (false, c0, r0, r1),
                    (false, c1 + 1, r0, r1),
                ] {
                    self.rules.push(RuleLine {
                        horizontal,
                        at,
                        from,
                        to,
                        width: *width,
                        color: *color,
                    });
                }
            }
            TableCommand::Span { .. } => {
                if (c0, r0) != (c1, r1) {
                    self.spans.push((c0, r0, c1, r1));
                }
            }
            _ => {
                for row in r0..=r1 {
                    for col in c0..=c1 {
                        Self::apply_to_cell(command, self.cell_mut(col, row));
                    }
                }
            }
        }
    }

    fn apply_to_cell(command: &TableCommand, cell: &mut CellStyle) {
        match command {
            TableCommand::Font { name, size, .. } => {
                cell.font = *name;
                if let Some(size) = size {
                    cell.font_size = *size;
                    cell.leading = size * 1.2;
                }
            }
            TableCommand::FontSize { size, .. } => {
                cell.font_size = *size;
                cell.leading = size * 1.2;
            }
            TableCommand::TextColor { color, .. } => cell.color = *color,
            TableCommand::Background { color, .. } => cell.background = Some(*color),
            TableCommand::Align { value, .. } => cell.align = *value,
            TableCommand::Valign { value, .. } => cell.valign = *value,
            TableCommand::Padding { amount, .. } => {
                cell.left_padding = *amount;
                cell.right_padding = *amount;
                cell.top_padding = *amount;
                cell.bottom_padding = *amount;
            }
            TableCommand::TopPadding { amount, .. } => cell.top_padding = *amount,
            TableCommand::BottomPadding { amount, .. } => cell.bottom_padding = *amount,
            TableCommand::LeftPadding { amount, .. } => cell.left_padding = *amount,
            TableCommand::RightPadding { amount, .. } => cell.right_padding = *amount,
            TableCommand::RowBackgrounds { .. }
            | TableCommand::Grid { .. }
            | TableCommand::Box { .. }
            | TableCommand::Span { .. } => {}
        }
    }

    fn cell_mut(&mut self, col: usize, row: usize) -> &mut CellStyle {
        &mut self.cells[row * self.cols + col]
    }

    /// Style of the cell at `col`, `row`
    ///
    /// # Panics
    /// Panics when the coordinates are outside the table.
    #[must_use]
    pub fn cell(&self, col: usize, row: usize) -> &CellStyle {
        &self.cells[row * self.cols + col]
    }

    /// The span whose top-left corner is at `col`, `row`, if any
    #[must_use]
    pub fn span_at(&self, col: usize, row: usize) -> Option<(usize, usize, usize, usize)> {
        self.spans
            .iter()
            .copied()
            .find(|&(c0, r0, _, _)| c0 == col && r0 == row)
    }

    /// Whether the cell is covered by a span it does not start
    #[must_use]
    pub fn is_hidden(&self, col: usize, row: usize) -> bool {
        self.spans.iter().any(|&(c0, r0, c1, r1)| {
            (c0..=c1).contains(&col) && (r0..=r1).contains(&row) && (col, row) != (c0, r0)
        })
    }

    /// Whether the edge between two adjacent cells lies inside a span.
    ///
    /// `horizontal` edges sit above row `at` at column `index`; vertical edges
    /// sit left of column `at` at row `index`.
    #[must_use]
    pub fn edge_inside_span(&self, horizontal: bool, at: usize, index: usize) -> bool {
        self.spans.iter().any(|&(c0, r0, c1, r1)| {
            if horizontal {
                at > r0 && at <= r1 && (c0..=c1).contains(&index)
            } else {
                at > c0 && at <= c1 && (r0..=r1).contains(&index)
            }
        })
    }
}
