//! Single-frame page flow

use super::table::TableLayout;
use super::text::{break_lines, place_line};
use super::{
    baseline_offset, DrawOp, LaidOutDocument, LayoutSummary, Page, Stroke, TableSummary,
};
use crate::core::models::{
    fold_to_ascii, markup, Block, CodeBlock, Color, DiagramBlock, Document, FontName, TableBlock,
};
use logger::{debug, warn};

const EPSILON: f32 = 0.01;

struct Flow<'a> {
    doc: &'a Document,
    has_image: &'a dyn Fn(&str) -> bool,
    left: f32,
    top: f32,
    bottom: f32,
    width: f32,
    cursor: f32,
    pages: Vec<Page>,
    current: Page,
    summary: LayoutSummary,
}

impl<'a> Flow<'a> {
    fn new(doc: &'a Document, has_image: &'a dyn Fn(&str) -> bool) -> Self {
        let (_, page_height) = doc.page.page_size();
        let margins = doc.page.margins;
        let top = page_height - margins.top.points();
        Self {
            doc,
            has_image,
            left: margins.left.points(),
            top,
            bottom: margins.bottom.points(),
            width: doc.page.frame_width(),
            cursor: top,
            pages: Vec::new(),
            current: Page::default(),
            summary: LayoutSummary::default(),
        }
    }

    fn remaining(&self) -> f32 {
        self.cursor - self.bottom
    }

    fn at_top(&self) -> bool {
        (self.cursor - self.top).abs() < EPSILON
    }

    fn frame_height(&self) -> f32 {
        self.top - self.bottom
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = self.top;
    }

    /// Start a new page unless `height` still fits or the page is fresh
    fn ensure(&mut self, height: f32) {
        if height > self.remaining() + EPSILON && !self.at_top() {
            self.new_page();
        }
    }

    fn push(&mut self, op: DrawOp) {
        self.current.ops.push(op);
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Paragraph { style, text } => self.paragraph(style, text),
            Block::Spacer { height } => {
                if height.points() > self.remaining() + EPSILON {
                    if !self.at_top() {
                        self.new_page();
                    }
                } else {
                    self.cursor -= height.points();
                }
            }
            Block::PageBreak => {
                // A page that only moved the cursor is reused.
                if self.current.ops.is_empty() {
                    self.cursor = self.top;
                } else {
                    self.new_page();
                }
            }
            Block::Table(table) => self.table(table),
            Block::Code(code) => self.code(code),
            Block::Diagram(diagram) => self.diagram(diagram),
        }
    }

    fn paragraph(&mut self, style_name: &str, text: &str) {
        let doc = self.doc;
        let Some(style) = doc.styles.get(style_name) else {
            return;
        };
        let Ok(inlines) = markup::parse(text) else {
            return;
        };
        if !self.at_top() {
            self.cursor -= style.space_before;
        }
        let offset = baseline_offset(style.font_size, style.leading);
        for line in break_lines(&inlines, style, self.width) {
            if style.leading > self.remaining() + EPSILON {
                self.new_page();
            }
            let baseline = self.cursor - offset;
            for placed in place_line(&line, style.align, self.width) {
                if placed.fragment.text.is_empty() {
                    continue;
                }
                self.push(DrawOp::Text {
                    x: self.left + placed.x,
                    y: baseline,
                    font: placed.fragment.font,
                    size: style.font_size,
                    color: placed.fragment.color,
                    text: placed.fragment.text,
                });
            }
            self.cursor -= style.leading;
        }
        self.cursor -= style.space_after;
        if self.cursor < self.bottom {
            self.cursor = self.bottom;
        }
    }

    fn table(&mut self, table: &TableBlock) {
        let doc = self.doc;
        let commands = doc.table_commands(table);
        let layout = TableLayout::measure(table, &commands);
        let x = self.left + (self.width - layout.width()) / 2.0;

        let mut drawn = 0;
        let mut start = 0;
        while start < layout.rows() {
            let mut end = layout.fit_rows(start, self.remaining());
            if end == start {
                if self.at_top() {
                    // a row group taller than the page is drawn anyway and overflows
                    end = start;
                    while end + 1 < layout.rows() && !layout.can_split_after(end) {
                        end += 1;
                    }
                    end += 1;
                } else {
                    self.new_page();
                    continue;
                }
            }
            layout.draw(start..end, x, self.cursor, &mut self.current.ops);
            self.cursor -= layout.height(start..end);
            drawn += end - start;
            start = end;
            if start < layout.rows() {
                self.new_page();
            }
        }
        self.cursor = self.cursor.max(self.bottom);
        self.summary.tables.push(TableSummary {
            rows: drawn,
            cols: layout.col_widths.len(),
        });
    }

    fn code(&mut self, code: &CodeBlock) {
        let lines = code.lines();
        let box_width = code.width.map_or(self.width, |w| w.points());
        let x = self.left + (self.width - box_width) / 2.0;
        #[allow(clippy::cast_precision_loss)]
        let full = lines.len() as f32 * code.leading + 2.0 * code.padding;
        if full <= self.frame_height() {
            self.ensure(full);
        }

        let offset = baseline_offset(code.font_size, code.leading);
        let mut rest: &[&str] = &lines;
        loop {
            let room = self.remaining() - 2.0 * code.padding;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let fit = ((room + EPSILON) / code.leading).floor().max(0.0) as usize;
            if fit == 0 && !self.at_top() {
                self.new_page();
                continue;
            }
            let take = fit.clamp(1, rest.len().max(1));
            let (chunk, tail) = rest.split_at(take.min(rest.len()));
            #[allow(clippy::cast_precision_loss)]
            let height = chunk.len() as f32 * code.leading + 2.0 * code.padding;
            self.push(DrawOp::Rect {
                x,
                y: self.cursor - height,
                width: box_width,
                height,
                fill: Some(code.background),
                stroke: Some(Stroke {
                    color: code.border,
                    width: code.border_width,
                }),
            });
            let mut line_top = self.cursor - code.padding;
            for line in chunk {
                if !line.trim().is_empty() {
                    self.push(DrawOp::Text {
                        x: x + code.padding,
                        y: line_top - offset,
                        font: FontName::Courier,
                        size: code.font_size,
                        color: Color::BLACK,
                        text: fold_to_ascii(line),
                    });
                }
                line_top -= code.leading;
            }
            self.cursor -= height;
            rest = tail;
            if rest.is_empty() {
                break;
            }
            self.new_page();
        }
    }

    fn diagram(&mut self, diagram: &DiagramBlock) {
        if !(self.has_image)(&diagram.diagram) {
            warn!("No image for diagram '{}', skipping", diagram.diagram);
            self.summary.images_skipped.push(diagram.diagram.clone());
            return;
        }
        let mut width = diagram.width.points();
        let mut height = diagram.height.points();
        let scale = (self.frame_height() / height).min(self.width / width).min(1.0);
        width *= scale;
        height *= scale;
        self.ensure(height);
        self.push(DrawOp::Image {
            diagram: diagram.diagram.clone(),
            x: self.left + (self.width - width) / 2.0,
            y: self.cursor - height,
            width,
            height,
        });
        self.cursor -= height;
        self.summary.images_placed.push(diagram.diagram.clone());
    }

    fn finish(mut self) -> LaidOutDocument {
        if !self.current.ops.is_empty() || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        let (width, height) = self.doc.page.page_size();
        self.summary.pages = self.pages.len();
        LaidOutDocument {
            width,
            height,
            pages: self.pages,
            summary: self.summary,
        }
    }
}

/// Lay out every block of `doc` in order.
///
/// Diagram blocks are drawn only when `has_image` reports an image for their
/// id; the others are skipped and listed in the summary.
#[must_use]
pub fn layout_document(doc: &Document, has_image: &dyn Fn(&str) -> bool) -> LaidOutDocument {
    let mut flow = Flow::new(doc, has_image);
    for block in &doc.blocks {
        flow.block(block);
    }
    let laid_out = flow.finish();
    debug!(
        "Laid out '{}': {} pages, {} tables",
        doc.id,
        laid_out.summary.pages,
        laid_out.summary.tables.len()
    );
    laid_out
}
