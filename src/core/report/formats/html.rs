//! HTML renderer
//!
//! Produces a single self-contained page: paragraph styles become CSS
//! classes, tables carry their resolved cell styles inline and diagrams are
//! embedded as inline SVG. The page shell is an askama template.

use crate::core::models::{
    markup, Alignment, Block, CodeBlock, Color, DiagramBlock, Document, FontName, HAlign, Inline,
    PageSetup, ParagraphStyle, ResolvedTableStyle, RuleLine, TableBlock, VAlign,
};
use crate::core::report::{DiagramAsset, DocumentRenderer, RenderContext, RenderedDocument};
use askama::Template;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::Write;

/// The page shell around the rendered body
#[derive(Template)]
#[template(path = "document.html")]
struct PageTemplate<'a> {
    lang: &'a str,
    title: &'a str,
    subject: &'a str,
    frame_width: String,
    padding: String,
    styles: &'a str,
    body: &'a str,
}

/// HTML renderer
#[derive(Debug, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Create a new HTML renderer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Wrap a standalone SVG diagram in the page shell
    ///
    /// # Errors
    /// Returns an error if the template fails to render
    pub fn wrap_svg(title: &str, svg: &str) -> Result<String, askama::Error> {
        let body = format!("<figure class=\"diagram\">\n{}\n</figure>", strip_xml_prolog(svg));
        render_page(title, "", &PageSetup::default(), "", &body)
    }

    fn render_body(ctx: &RenderContext) -> String {
        let doc = ctx.document;
        let mut body = String::new();
        for block in &doc.blocks {
            match block {
                Block::Paragraph { style, text } => paragraph(&mut body, doc, style, text),
                Block::Spacer { height } => {
                    let _ = writeln!(
                        body,
                        "<div class=\"spacer\" style=\"height: {}\"></div>",
                        pt(height.points())
                    );
                }
                Block::PageBreak => body.push_str("<div class=\"page-break\"></div>\n"),
                Block::Table(table) => table_html(&mut body, doc, table),
                Block::Code(code) => listing(&mut body, code, doc.page.frame_width()),
                Block::Diagram(diagram) => figure(&mut body, ctx, diagram),
            }
        }
        body
    }
}

impl DocumentRenderer for HtmlRenderer {
    fn render(&self, ctx: &RenderContext) -> Result<RenderedDocument, Box<dyn Error>> {
        let doc = ctx.document;
        let body = Self::render_body(ctx);
        let styles = style_rules(doc);
        let html = render_page(&doc.title, &doc.subject, &doc.page, &styles, &body)?;
        Ok(RenderedDocument {
            bytes: html.into_bytes(),
            pages: 1,
            summary: None,
        })
    }
}

fn render_page(
    title: &str,
    subject: &str,
    page: &PageSetup,
    styles: &str,
    body: &str,
) -> Result<String, askama::Error> {
    let margins = &page.margins;
    PageTemplate {
        lang: "sq",
        title,
        subject,
        frame_width: format!("{:.1}", page.frame_width()),
        padding: format!(
            "{} {} {} {}",
            pt(margins.top.points()),
            pt(margins.right.points()),
            pt(margins.bottom.points()),
            pt(margins.left.points())
        ),
        styles,
        body,
    }
    .render()
}

fn pt(value: f32) -> String {
    format!("{value:.1}pt")
}

/// Escape text for element content and attribute values
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

fn strip_xml_prolog(svg: &str) -> &str {
    svg.find("<svg").map_or(svg, |start| &svg[start..])
}

/// CSS declarations for a face
fn font_css(font: FontName) -> String {
    let family = if font.is_monospace() {
        "'Courier New', Courier, monospace"
    } else {
        "Helvetica, Arial, sans-serif"
    };
    format!(
        "font-family: {family}; font-weight: {}; font-style: {};",
        if font.is_bold() { "bold" } else { "normal" },
        if font.is_italic() { "italic" } else { "normal" }
    )
}

const fn text_align(align: Alignment) -> &'static str {
    match align {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
        Alignment::Justify => "justify",
    }
}

fn class_name(style: &str) -> String {
    let cleaned: String = style
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!("s-{cleaned}")
}

/// One CSS rule per paragraph style the document uses
fn style_rules(doc: &Document) -> String {
    let used: BTreeSet<&str> = doc
        .blocks
        .iter()
        .filter_map(|block| match block {
            Block::Paragraph { style, .. } => Some(style.as_str()),
            _ => None,
        })
        .collect();
    let mut css = String::new();
    for name in used {
        let Some(style) = doc.styles.get(name) else {
            continue;
        };
        let _ = writeln!(css, ".{} {{ {} }}", class_name(name), paragraph_css(style));
    }
    css
}

fn paragraph_css(style: &ParagraphStyle) -> String {
    format!(
        "{} font-size: {}; line-height: {}; margin: {} 0 {} 0; text-align: {}; color: {};",
        font_css(style.font),
        pt(style.font_size),
        pt(style.leading),
        pt(style.space_before),
        pt(style.space_after),
        text_align(style.align),
        style.color.to_hex()
    )
}

fn inline_html(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Break => out.push_str("<br>"),
            Inline::Text(text, span) => {
                let mut piece = escape(text);
                if span.italic {
                    piece = format!("<i>{piece}</i>");
                }
                if span.bold {
                    piece = format!("<b>{piece}</b>");
                }
                let mut css = String::new();
                if let Some(face) = span.face {
                    css.push_str(&font_css(face.with_style(span.bold, span.italic)));
                }
                if let Some(color) = span.color {
                    let _ = write!(css, " color: {};", color.to_hex());
                }
                if css.is_empty() {
                    out.push_str(&piece);
                } else {
                    let _ = write!(out, "<span style=\"{}\">{piece}</span>", css.trim());
                }
            }
        }
    }
    out
}

fn paragraph(out: &mut String, doc: &Document, style: &str, text: &str) {
    // Validated on load; a parse failure here still shows the raw text.
    let content =
        markup::parse(text).map_or_else(|_| escape(text), |inlines| inline_html(&inlines));
    let tag = match doc.styles.heading_level(style) {
        Some(level) => format!("h{level}"),
        None => "p".to_string(),
    };
    let _ = writeln!(out, "<{tag} class=\"{}\">{content}</{tag}>", class_name(style));
}

/// The last rule in command order that covers a cell edge
fn edge_rule(
    rules: &[RuleLine],
    horizontal: bool,
    at: usize,
    along: std::ops::RangeInclusive<usize>,
) -> Option<&RuleLine> {
    rules.iter().rev().find(|rule| {
        rule.horizontal == horizontal
            && rule.at == at
            && rule.from <= *along.end()
            && rule.to >= *along.start()
    })
}

fn border_css(side: &str, rule: Option<&RuleLine>) -> String {
    rule.map_or_else(String::new, |rule| {
        format!(" border-{side}: {} solid {};", pt(rule.width), rule.color.to_hex())
    })
}

const fn cell_align(align: HAlign) -> &'static str {
    match align {
        HAlign::Left => "left",
        HAlign::Center => "center",
        HAlign::Right => "right",
    }
}

const fn cell_valign(valign: VAlign) -> &'static str {
    match valign {
        VAlign::Top => "top",
        VAlign::Middle => "middle",
        VAlign::Bottom => "bottom",
    }
}

fn background_css(color: Option<Color>) -> String {
    color.map_or_else(String::new, |c| format!(" background: {};", c.to_hex()))
}

fn table_html(out: &mut String, doc: &Document, table: &TableBlock) {
    let cols = table.cols();
    let rows = table.row_count();
    let style = ResolvedTableStyle::resolve(cols, rows, doc.table_commands(table));

    let _ = writeln!(
        out,
        "<table class=\"grid\" style=\"width: {}\">",
        pt(table.total_width())
    );
    out.push_str("<colgroup>");
    for width in &table.col_widths {
        let _ = write!(out, "<col style=\"width: {}\">", pt(width.points()));
    }
    out.push_str("</colgroup>\n");

    for (row, cells) in table.rows.iter().enumerate() {
        out.push_str("<tr>");
        for (col, text) in cells.iter().enumerate().take(cols) {
            if style.is_hidden(col, row) {
                continue;
            }
            let (c1, r1) = style
                .span_at(col, row)
                .map_or((col, row), |(_, _, c1, r1)| (c1, r1));
            let cell = style.cell(col, row);
            let mut css = format!(
                "{} font-size: {}; line-height: {}; color: {};{} text-align: {}; vertical-align: {}; padding: {} {} {} {};",
                font_css(cell.font),
                pt(cell.font_size),
                pt(cell.leading),
                cell.color.to_hex(),
                background_css(cell.background),
                cell_align(cell.align),
                cell_valign(cell.valign),
                pt(cell.top_padding),
                pt(cell.right_padding),
                pt(cell.bottom_padding),
                pt(cell.left_padding),
            );
            css.push_str(&border_css("top", edge_rule(&style.rules, true, row, col..=c1)));
            css.push_str(&border_css("bottom", edge_rule(&style.rules, true, r1 + 1, col..=c1)));
            css.push_str(&border_css("left", edge_rule(&style.rules, false, col, row..=r1)));
            css.push_str(&border_css("right", edge_rule(&style.rules, false, c1 + 1, row..=r1)));

            out.push_str("<td");
            if c1 > col {
                let _ = write!(out, " colspan=\"{}\"", c1 - col + 1);
            }
            if r1 > row {
                let _ = write!(out, " rowspan=\"{}\"", r1 - row + 1);
            }
            let content = escape(text).replace('\n', "<br>");
            let _ = write!(out, " style=\"{css}\">{content}</td>");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>\n");
}

fn listing(out: &mut String, code: &CodeBlock, frame_width: f32) {
    let width = code.width.map_or(frame_width, |w| w.points());
    let _ = writeln!(
        out,
        "<pre class=\"listing\" style=\"width: {}; {} font-size: {}; line-height: {}; padding: {}; background: {}; border: {} solid {};\">{}</pre>",
        pt(width),
        font_css(FontName::Courier),
        pt(code.font_size),
        pt(code.leading),
        pt(code.padding),
        code.background.to_hex(),
        pt(code.border_width),
        code.border.to_hex(),
        escape(&code.lines().join("\n"))
    );
}

fn figure(out: &mut String, ctx: &RenderContext, diagram: &DiagramBlock) {
    let style = format!(
        "width: {}; max-height: {};",
        pt(diagram.width.points()),
        pt(diagram.height.points())
    );
    match ctx.assets.get(&diagram.diagram) {
        Some(DiagramAsset::Svg(svg)) => {
            let _ = writeln!(
                out,
                "<figure class=\"diagram\" style=\"{style}\">\n{}\n</figure>",
                strip_xml_prolog(svg)
            );
        }
        Some(DiagramAsset::Dot(source)) => {
            let _ = writeln!(
                out,
                "<figure class=\"diagram\" style=\"{style}\"><pre class=\"listing\">{}</pre></figure>",
                escape(source)
            );
        }
        Some(DiagramAsset::Image(_)) | None => {
            logger::warn!("No SVG rendered for diagram '{}', skipping", diagram.diagram);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::DiagramAssets;

    fn doc(blocks: &str) -> Document {
        let src = format!("id = \"t\"\ntitle = \"Teste & Cilësi\"\noutput = \"t.pdf\"\n{blocks}");
        Document::from_toml(&src).unwrap()
    }

    fn render(document: &Document, assets: &DiagramAssets) -> String {
        let rendered = HtmlRenderer::new()
            .render(&RenderContext::new(document, assets))
            .unwrap();
        String::from_utf8(rendered.bytes).unwrap()
    }

    #[test]
    fn test_headings_and_markup() {
        let document = doc(
            r##"
[styles.title]
parent = "heading1"
align = "center"

[[blocks]]
type = "paragraph"
style = "title"
text = "Arkitektura"

[[blocks]]
type = "paragraph"
text = "<b>Frontend</b> &amp; <font face=\"Courier\" color=\"#1565C0\">api</font>"
"##,
        );
        let html = render(&document, &DiagramAssets::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Teste &amp; Cilësi</title>"));
        assert!(html.contains("<h1 class=\"s-title\">Arkitektura</h1>"));
        assert!(html.contains(".s-title {"));
        assert!(html.contains("text-align: center"));
        assert!(html.contains("<b>Frontend</b> &amp; "));
        assert!(html.contains("color: #1565C0;"));
    }

    #[test]
    fn test_table_spans_and_borders() {
        let document = doc(
            r##"
[[blocks]]
type = "table"
col_widths = ["3cm", "3cm", "3cm"]
rows = [["Kategoria", "", ""], ["a", "b", "c"]]
style = [
    { cmd = "span", cells = [0, 0, -1, 0] },
    { cmd = "background", cells = [0, 0, -1, 0], color = "#1565C0" },
    { cmd = "grid", cells = [0, 0, -1, -1], width = 0.5, color = "#BDBDBD" },
]
"##,
        );
        let html = render(&document, &DiagramAssets::default());
        assert!(html.contains("<td colspan=\"3\""));
        assert_eq!(html.matches("<td").count(), 4);
        assert!(html.contains("background: #1565C0;"));
        assert!(html.contains("border-top: 0.5pt solid #BDBDBD;"));
    }

    #[test]
    fn test_inline_svg_and_missing_diagram() {
        let document = doc(
            r#"
[[blocks]]
type = "diagram"
diagram = "git_workflow"
width = "10cm"
height = "5cm"

[[blocks]]
type = "diagram"
diagram = "architecture"
width = "10cm"
height = "5cm"
"#,
        );
        let mut assets = DiagramAssets::default();
        assets.insert(
            "git_workflow",
            DiagramAsset::Svg("<?xml version=\"1.0\"?>\n<svg id=\"g\"></svg>".into()),
        );
        let html = render(&document, &assets);
        assert!(html.contains("<svg id=\"g\"></svg>"));
        assert!(!html.contains("<?xml"));
        assert_eq!(html.matches("<figure").count(), 1);
    }

    #[test]
    fn test_wrap_svg() {
        let html = HtmlRenderer::wrap_svg("ER", "<svg></svg>").unwrap();
        assert!(html.contains("<title>ER</title>"));
        assert!(html.contains("<figure class=\"diagram\">\n<svg></svg>"));
    }
}
