//! Documents: page setup, styles and the ordered list of content blocks

use super::{
    markup, Color, DocumentError, Length, PageSetup, StyleSheet, StyleSpec, TableBlock,
    TableCommand,
};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A preformatted listing drawn in a padded, bordered box
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodeBlock {
    /// Listing text; lines are kept as written
    pub text: String,
    /// Box width; the frame width when omitted
    pub width: Option<Length>,
    /// Font size of the listing
    #[serde(default = "default_code_size")]
    pub font_size: f32,
    /// Line distance of the listing
    #[serde(default = "default_code_leading")]
    pub leading: f32,
    /// Box fill
    #[serde(default = "default_code_background")]
    pub background: Color,
    /// Box outline
    #[serde(default = "default_code_border")]
    pub border: Color,
    /// Outline width
    #[serde(default = "default_code_border_width")]
    pub border_width: f32,
    /// Space between the outline and the text
    #[serde(default = "default_code_padding")]
    pub padding: f32,
}

const fn default_code_size() -> f32 {
    7.0
}
const fn default_code_leading() -> f32 {
    9.0
}
const fn default_code_background() -> Color {
    Color::rgb(0xF5, 0xF5, 0xF5)
}
const fn default_code_border() -> Color {
    Color::rgb(0xE0, 0xE0, 0xE0)
}
const fn default_code_border_width() -> f32 {
    1.0
}
const fn default_code_padding() -> f32 {
    8.0
}

impl CodeBlock {
    /// Listing lines with trailing blank lines removed
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        let trimmed = self.text.trim_end_matches(['\n', ' ']);
        trimmed.lines().collect()
    }
}

/// A rendered diagram placed at a fixed size
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagramBlock {
    /// Diagram library id
    pub diagram: String,
    /// Drawn width
    pub width: Length,
    /// Drawn height
    pub height: Length,
}

/// One content block
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Styled paragraph with inline markup
    Paragraph {
        /// Style name from the document's sheet
        #[serde(default = "default_style")]
        style: String,
        /// Text with inline markup
        text: String,
    },
    /// Vertical gap
    Spacer {
        /// Gap height
        height: Length,
    },
    /// Start a new page
    PageBreak,
    /// Table
    Table(TableBlock),
    /// Preformatted listing
    Code(CodeBlock),
    /// Embedded diagram image
    Diagram(DiagramBlock),
}

fn default_style() -> String {
    "normal".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocumentSource {
    id: String,
    title: String,
    output: String,
    #[serde(default)]
    subject: String,
    #[serde(default)]
    page: PageSetup,
    #[serde(default)]
    styles: BTreeMap<String, StyleSpec>,
    #[serde(default)]
    table_styles: BTreeMap<String, Vec<TableCommand>>,
    blocks: Vec<Block>,
}

/// A validated document ready for layout
#[derive(Debug, Clone)]
pub struct Document {
    /// Stable identifier
    pub id: String,
    /// Title written into the output metadata
    pub title: String,
    /// Output file name, including the `.pdf` extension
    pub output: String,
    /// Short description for listings
    pub subject: String,
    /// Paper and margins
    pub page: PageSetup,
    /// Resolved paragraph styles
    pub styles: StyleSheet,
    /// Named table style presets
    pub table_styles: BTreeMap<String, Vec<TableCommand>>,
    /// Content in reading order
    pub blocks: Vec<Block>,
}

impl Document {
    /// Parse and validate a document definition.
    ///
    /// # Errors
    /// Returns a [`DocumentError`] when the TOML does not match the schema or
    /// the content fails validation (see [`Document::validate`]).
    pub fn from_toml(source: &str) -> Result<Self, DocumentError> {
        let raw: DocumentSource = toml::from_str(source)?;
        let styles = StyleSheet::with_specs(&raw.styles)?;
        let document = Self {
            id: raw.id,
            title: raw.title,
            output: raw.output,
            subject: raw.subject,
            page: raw.page,
            styles,
            table_styles: raw.table_styles,
            blocks: raw.blocks,
        };
        document.validate()?;
        Ok(document)
    }

    /// Check that every reference resolves and every table is rectangular.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), DocumentError> {
        for block in &self.blocks {
            if let Block::Paragraph { style, text } = block {
                if !self.styles.contains(style) {
                    return Err(DocumentError::UnknownStyle(style.clone()));
                }
                markup::parse(text)?;
            }
        }
        for (index, table) in self.tables().enumerate() {
            for preset in &table.presets {
                if !self.table_styles.contains_key(preset) {
                    return Err(DocumentError::UnknownPreset(preset.clone()));
                }
            }
            for (row, cells) in table.rows.iter().enumerate() {
                if cells.len() != table.cols() {
                    return Err(DocumentError::RowWidth {
                        table: index,
                        row,
                        found: cells.len(),
                        expected: table.cols(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Tables in document order
    pub fn tables(&self) -> impl Iterator<Item = &TableBlock> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }

    /// Distinct diagram ids in first-use order
    #[must_use]
    pub fn diagram_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for block in &self.blocks {
            if let Block::Diagram(diagram) = block {
                if !ids.contains(&diagram.diagram.as_str()) {
                    ids.push(&diagram.diagram);
                }
            }
        }
        ids
    }

    /// Preset commands followed by the table's own commands
    #[must_use]
    pub fn table_commands<'a>(&'a self, table: &'a TableBlock) -> Vec<&'a TableCommand> {
        table
            .presets
            .iter()
            .filter_map(|name| self.table_styles.get(name))
            .flatten()
            .chain(table.style.iter())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"
id = "sample"
title = "Sample"
output = "sample.pdf"

[page]
orientation = "landscape"
margins = { top = "1.5cm", right = "1cm", bottom = "1cm", left = "1cm" }

[styles.title]
parent = "heading1"
font_size = 28
align = "center"

[[table_styles.striped]]
cmd = "row_backgrounds"
cells = [0, 1, -1, -1]
colors = ["white", "#F5F5F5"]

[[blocks]]
type = "paragraph"
style = "title"
text = "Diagramet"

[[blocks]]
type = "spacer"
height = "0.5cm"

[[blocks]]
type = "diagram"
diagram = "architecture_clean"
width = "24cm"
height = "13cm"

[[blocks]]
type = "table"
col_widths = ["4cm", "6cm"]
rows = [["A", "B"], ["c", "d"]]
use = ["striped"]
style = [{ cmd = "grid", cells = [0, 0, -1, -1], color = "#BDBDBD" }]

[[blocks]]
type = "page_break"

[[blocks]]
type = "code"
text = """
let x = 1;
"""
"##;

    #[test]
    fn test_sample_document_loads() {
        let doc = Document::from_toml(SAMPLE).unwrap();
        assert_eq!(doc.id, "sample");
        assert_eq!(doc.blocks.len(), 6);
        assert!(doc.page.page_size().0 > doc.page.page_size().1);
        assert_eq!(doc.diagram_ids(), vec!["architecture_clean"]);
        let table = doc.tables().next().unwrap();
        assert_eq!(doc.table_commands(table).len(), 2);
        let Block::Code(code) = &doc.blocks[5] else {
            panic!("expected code block");
        };
        assert_eq!(code.lines(), vec!["let x = 1;"]);
        assert!((code.font_size - 7.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_ragged_table_is_rejected() {
        let src = SAMPLE.replace(r#"[["A", "B"], ["c", "d"]]"#, r#"[["A", "B"], ["c"]]"#);
        let err = Document::from_toml(&src).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::RowWidth {
                row: 1,
                found: 1,
                expected: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_style_and_preset_are_rejected() {
        let base = SAMPLE;
        let bad_style = base.replace(r#"style = "title""#, r#"style = "missing""#);
        assert!(matches!(
            Document::from_toml(&bad_style),
            Err(DocumentError::UnknownStyle(_))
        ));
        let bad_preset = base.replace(r#"use = ["striped"]"#, r#"use = ["zebra"]"#);
        assert!(matches!(
            Document::from_toml(&bad_preset),
            Err(DocumentError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_bad_markup_is_rejected() {
        let base = SAMPLE;
        let bad = base.replace("text = \"Diagramet\"", "text = \"<b>Diagramet\"");
        assert!(matches!(
            Document::from_toml(&bad),
            Err(DocumentError::Markup { .. })
        ));
    }
}
