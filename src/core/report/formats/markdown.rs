//! Markdown renderer
//!
//! Produces plain Markdown that reads well on GitHub, GitLab and in VS Code.
//! Heading styles map to `#` levels, tables to pipe tables and diagrams to
//! fenced `dot` blocks holding their Graphviz source.

use crate::core::models::{markup, Block, CodeBlock, Document, Inline, TableBlock};
use crate::core::report::{DiagramAsset, DocumentRenderer, RenderContext, RenderedDocument};
use std::error::Error;
use std::fmt::Write;

/// Markdown renderer
#[derive(Debug, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    /// Create a new Markdown renderer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// A fenced `dot` block for a standalone diagram
    #[must_use]
    pub fn dot_document(title: &str, source: &str) -> String {
        let mut out = format!("# {}\n\n", escape_inline(title));
        fenced(&mut out, "dot", source);
        out
    }

    fn render_markdown(ctx: &RenderContext) -> String {
        let doc = ctx.document;
        let mut out = String::new();
        for block in &doc.blocks {
            match block {
                Block::Paragraph { style, text } => paragraph(&mut out, doc, style, text),
                // Blank lines already separate blocks.
                Block::Spacer { .. } => {}
                Block::PageBreak => out.push_str("---\n\n"),
                Block::Table(table) => table_markdown(&mut out, table),
                Block::Code(code) => listing(&mut out, code),
                Block::Diagram(diagram) => match ctx.assets.get(&diagram.diagram) {
                    Some(DiagramAsset::Dot(source)) => fenced(&mut out, "dot", source),
                    _ => logger::warn!(
                        "No DOT source for diagram '{}', skipping",
                        diagram.diagram
                    ),
                },
            }
        }
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out.push('\n');
        out
    }
}

impl DocumentRenderer for MarkdownRenderer {
    fn render(&self, ctx: &RenderContext) -> Result<RenderedDocument, Box<dyn Error>> {
        Ok(RenderedDocument {
            bytes: Self::render_markdown(ctx).into_bytes(),
            pages: 1,
            summary: None,
        })
    }
}

/// Backslash-escape characters Markdown would treat as formatting
fn escape_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '`' | '[' | ']' | '<' | '>' | '|') {
            out.push('\\');
        }
        out.push(if c == '\n' { ' ' } else { c });
    }
    out
}

/// Inline runs as Markdown emphasis
fn inline_markdown(inlines: &[Inline], plain: bool) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Break if plain => out.push(' '),
            Inline::Break => out.push_str("  \n"),
            Inline::Text(text, span) => {
                let escaped = escape_inline(text);
                // Emphasis markers must hug the text, so surrounding spaces stay outside.
                let core = escaped.trim();
                if plain || core.is_empty() || !(span.bold || span.italic) {
                    out.push_str(&escaped);
                    continue;
                }
                let marker = match (span.bold, span.italic) {
                    (true, true) => "***",
                    (true, false) => "**",
                    _ => "*",
                };
                let lead = &escaped[..escaped.len() - escaped.trim_start().len()];
                let tail = &escaped[escaped.trim_end().len()..];
                let _ = write!(out, "{lead}{marker}{core}{marker}{tail}");
            }
        }
    }
    out
}

fn paragraph(out: &mut String, doc: &Document, style: &str, text: &str) {
    let level = doc.styles.heading_level(style);
    let content = markup::parse(text).map_or_else(
        |_| escape_inline(text),
        |inlines| inline_markdown(&inlines, level.is_some()),
    );
    let content = content.trim();
    if content.is_empty() {
        return;
    }
    match level {
        Some(level) => {
            let _ = writeln!(out, "{} {content}\n", "#".repeat(usize::from(level)));
        }
        None => {
            let _ = writeln!(out, "{content}\n");
        }
    }
}

fn table_cell(text: &str) -> String {
    text.split('\n')
        .map(escape_inline)
        .collect::<Vec<_>>()
        .join("<br>")
}

/// Pipe table with the first row as header. Cells covered by a span stay empty.
fn table_markdown(out: &mut String, table: &TableBlock) {
    let cols = table.cols();
    if cols == 0 || table.rows.is_empty() {
        return;
    }
    for (index, row) in table.rows.iter().enumerate() {
        let cells: Vec<String> = row.iter().take(cols).map(|text| table_cell(text)).collect();
        let _ = writeln!(out, "| {} |", cells.join(" | "));
        if index == 0 {
            let _ = writeln!(out, "|{}", "---|".repeat(cols));
        }
    }
    out.push('\n');
}

/// Fence long enough that no run of backticks inside the body closes it
fn fenced(out: &mut String, lang: &str, body: &str) {
    let mut longest = 0;
    let mut run = 0;
    for c in body.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    let fence = "`".repeat(longest.max(2) + 1);
    let _ = writeln!(out, "{fence}{lang}\n{}\n{fence}\n", body.trim_end_matches('\n'));
}

fn listing(out: &mut String, code: &CodeBlock) {
    fenced(out, "", &code.lines().join("\n"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::DiagramAssets;

    fn render(blocks: &str, assets: &DiagramAssets) -> String {
        let src = format!("id = \"t\"\ntitle = \"T\"\noutput = \"t.pdf\"\n{blocks}");
        let document = Document::from_toml(&src).unwrap();
        let rendered = MarkdownRenderer::new()
            .render(&RenderContext::new(&document, assets))
            .unwrap();
        String::from_utf8(rendered.bytes).unwrap()
    }

    #[test]
    fn test_headings_follow_style_levels() {
        let md = render(
            r#"
[styles.section]
parent = "heading2"

[[blocks]]
type = "paragraph"
style = "heading1"
text = "Dokumentimi i <b>Testeve</b>"

[[blocks]]
type = "paragraph"
style = "section"
text = "1. Hyrje"

[[blocks]]
type = "paragraph"
text = "Teste <b>unit</b> dhe <i>integrimi</i><br/>rreshti 2"
"#,
            &DiagramAssets::default(),
        );
        assert!(md.starts_with("# Dokumentimi i Testeve\n\n## 1. Hyrje\n\n"));
        assert!(md.contains("Teste **unit** dhe *integrimi*  \nrreshti 2"));
    }

    #[test]
    fn test_pipe_table_and_fenced_blocks() {
        let mut assets = DiagramAssets::default();
        assets.insert("git_workflow", DiagramAsset::Dot("digraph G {}".into()));
        let md = render(
            r#"
[[blocks]]
type = "table"
col_widths = ["3cm", "3cm"]
rows = [["Skedari", "Teste"], ["auth|test.ts", "12\n(unit)"]]

[[blocks]]
type = "code"
text = "describe('x', () => {\n  it(`a`);\n});\n"

[[blocks]]
type = "diagram"
diagram = "git_workflow"
width = "10cm"
height = "5cm"
"#,
            &assets,
        );
        assert!(md.contains("| Skedari | Teste |\n|---|---|\n| auth\\|test.ts | 12<br>(unit) |\n"));
        assert!(md.contains("```\ndescribe('x', () => {\n  it(`a`);\n});\n```\n"));
        assert!(md.contains("```dot\ndigraph G {}\n```"));
        assert!(md.ends_with("```\n"));
    }

    #[test]
    fn test_fence_grows_past_backtick_runs() {
        let mut out = String::new();
        fenced(&mut out, "", "a ```` b");
        assert!(out.starts_with("`````\n"));
    }
}
