//! Table measurement and drawing

use super::text::wrap_plain;
use super::{baseline_offset, DrawOp, Stroke};
use crate::core::models::{CellStyle, HAlign, ResolvedTableStyle, TableBlock, TableCommand, VAlign};
use std::ops::Range;

/// A visible cell with its wrapped text
#[derive(Debug, Clone)]
struct CellLayout {
    col: usize,
    row: usize,
    col_end: usize,
    row_end: usize,
    lines: Vec<String>,
    style: CellStyle,
}

/// A measured table: column widths, row heights and wrapped cell text
#[derive(Debug, Clone)]
pub struct TableLayout {
    /// Column widths in points
    pub col_widths: Vec<f32>,
    /// Row heights in points
    pub row_heights: Vec<f32>,
    cells: Vec<CellLayout>,
    style: ResolvedTableStyle,
}

impl TableLayout {
    /// Resolve styles, wrap every cell and compute row heights
    #[must_use]
    pub fn measure(table: &TableBlock, commands: &[&TableCommand]) -> Self {
        let cols = table.cols();
        let rows = table.row_count();
        let style = ResolvedTableStyle::resolve(cols, rows, commands.iter().copied());
        let col_widths: Vec<f32> = table.col_widths.iter().map(|w| w.points()).collect();
        let mut row_heights = vec![0.0_f32; rows];
        let mut cells = Vec::new();
        let mut tall_spans = Vec::new();

        for (row, texts) in table.rows.iter().enumerate() {
            for (col, text) in texts.iter().enumerate().take(cols) {
                if style.is_hidden(col, row) {
                    continue;
                }
                let (col_end, row_end) = style
                    .span_at(col, row)
                    .map_or((col, row), |(_, _, c1, r1)| (c1, r1));
                let cell_style = style.cell(col, row).clone();
                let width: f32 = col_widths[col..=col_end].iter().sum();
                let inner = (width - cell_style.left_padding - cell_style.right_padding).max(1.0);
                let lines = wrap_plain(text, cell_style.font, cell_style.font_size, inner);
                #[allow(clippy::cast_precision_loss)]
                let needed = lines.len() as f32 * cell_style.leading
                    + cell_style.top_padding
                    + cell_style.bottom_padding;
                if row_end == row {
                    row_heights[row] = row_heights[row].max(needed);
                } else {
                    tall_spans.push((row, row_end, needed));
                }
                cells.push(CellLayout {
                    col,
                    row,
                    col_end,
                    row_end,
                    lines,
                    style: cell_style,
                });
            }
        }
        for (r0, r1, needed) in tall_spans {
            let have: f32 = row_heights[r0..=r1].iter().sum();
            if have < needed {
                row_heights[r1] += needed - have;
            }
        }
        Self {
            col_widths,
            row_heights,
            cells,
            style,
        }
    }

    /// Number of rows
    #[must_use]
    pub fn rows(&self) -> usize {
        self.row_heights.len()
    }

    /// Total width
    #[must_use]
    pub fn width(&self) -> f32 {
        self.col_widths.iter().sum()
    }

    /// Height of a run of rows
    #[must_use]
    pub fn height(&self, rows: Range<usize>) -> f32 {
        self.row_heights[rows].iter().sum()
    }

    /// Whether the table may be split between `row` and `row + 1`
    #[must_use]
    pub fn can_split_after(&self, row: usize) -> bool {
        !self
            .style
            .spans
            .iter()
            .any(|&(_, r0, _, r1)| r0 <= row && row < r1)
    }

    /// Largest `end` such that rows `start..end` fit in `available` and the
    /// table may be split after `end - 1`. Returns `start` when nothing fits.
    #[must_use]
    pub fn fit_rows(&self, start: usize, available: f32) -> usize {
        let mut used = 0.0;
        let mut best = start;
        for row in start..self.rows() {
            used += self.row_heights[row];
            if used > available + 0.01 {
                break;
            }
            if row + 1 == self.rows() || self.can_split_after(row) {
                best = row + 1;
            }
        }
        best
    }

    fn col_x(&self, col: usize) -> f32 {
        self.col_widths[..col].iter().sum()
    }

    /// Draw rows `rows` with the table's left edge at `x` and top at `top`
    pub fn draw(&self, rows: Range<usize>, x: f32, top: f32, ops: &mut Vec<DrawOp>) {
        let row_top = |row: usize| top - self.height(rows.start..row);
        let visible: Vec<&CellLayout> = self
            .cells
            .iter()
            .filter(|c| rows.contains(&c.row))
            .collect();

        for cell in &visible {
            let Some(fill) = cell.style.background else {
                continue;
            };
            let row_end = cell.row_end.min(rows.end - 1);
            let cell_top = row_top(cell.row);
            let height = self.height(cell.row..row_end + 1);
            ops.push(DrawOp::Rect {
                x: x + self.col_x(cell.col),
                y: cell_top - height,
                width: self.col_x(cell.col_end + 1) - self.col_x(cell.col),
                height,
                fill: Some(fill),
                stroke: None,
            });
        }

        for cell in &visible {
            self.draw_cell_text(cell, x, row_top(cell.row), rows.end, ops);
        }

        for rule in &self.style.rules {
            let stroke = Stroke {
                color: rule.color,
                width: rule.width,
            };
            if rule.horizontal {
                if rule.at < rows.start || rule.at > rows.end {
                    continue;
                }
                let y = row_top(rule.at);
                let segments = (rule.from..=rule.to)
                    .filter(|&col| !self.style.edge_inside_span(true, rule.at, col));
                for (c0, c1) in runs(segments) {
                    ops.push(DrawOp::Line {
                        x1: x + self.col_x(c0),
                        y1: y,
                        x2: x + self.col_x(c1 + 1),
                        y2: y,
                        stroke,
                    });
                }
            } else {
                let first = rule.from.max(rows.start);
                let last = rule.to.min(rows.end.saturating_sub(1));
                if first > last {
                    continue;
                }
                let lx = x + self.col_x(rule.at);
                let segments =
                    (first..=last).filter(|&row| !self.style.edge_inside_span(false, rule.at, row));
                for (r0, r1) in runs(segments) {
                    ops.push(DrawOp::Line {
                        x1: lx,
                        y1: row_top(r0),
                        x2: lx,
                        y2: row_top(r1 + 1),
                        stroke,
                    });
                }
            }
        }
    }

    fn draw_cell_text(
        &self,
        cell: &CellLayout,
        x: f32,
        cell_top: f32,
        rows_end: usize,
        ops: &mut Vec<DrawOp>,
    ) {
        let style = &cell.style;
        let left = x + self.col_x(cell.col);
        let width = self.col_x(cell.col_end + 1) - self.col_x(cell.col);
        let height = self.height(cell.row..cell.row_end.min(rows_end - 1) + 1);
        #[allow(clippy::cast_precision_loss)]
        let content = cell.lines.len() as f32 * style.leading;
        let block_top = match style.valign {
            VAlign::Top => cell_top - style.top_padding,
            VAlign::Bottom => cell_top - height + style.bottom_padding + content,
            VAlign::Middle => {
                let inner = height - style.top_padding - style.bottom_padding;
                cell_top - style.top_padding - (inner - content) / 2.0
            }
        };
        let offset = baseline_offset(style.font_size, style.leading);
        for (i, line) in cell.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let text_width = style.font.text_width(line, style.font_size);
            let tx = match style.align {
                HAlign::Left => left + style.left_padding,
                HAlign::Right => left + width - style.right_padding - text_width,
                HAlign::Center => {
                    let inner = width - style.left_padding - style.right_padding;
                    left + style.left_padding + (inner - text_width) / 2.0
                }
            };
            #[allow(clippy::cast_precision_loss)]
            let y = block_top - i as f32 * style.leading - offset;
            ops.push(DrawOp::Text {
                x: tx,
                y,
                font: style.font,
                size: style.font_size,
                color: style.color,
                text: line.clone(),
            });
        }
    }
}

/// Collapse an increasing sequence of indices into inclusive runs
fn runs(indices: impl Iterator<Item = usize>) -> Vec<(usize, usize)> {
    let mut out: Vec<(usize, usize)> = Vec::new();
    for i in indices {
        match out.last_mut() {
            Some((_, end)) if *end + 1 == i => *end = i,
            _ => out.push((i, i)),
        }
    }
    out
}
