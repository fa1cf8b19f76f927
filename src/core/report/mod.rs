//! Document rendering
//!
//! This module renders a [`Document`] into one of the output formats
//! (PDF, HTML, Markdown) and drives the generation pipeline: render the
//! diagrams a document needs, render the document, clean up.

pub mod formats;
pub mod generate;

use crate::core::layout::LayoutSummary;
use crate::core::models::Document;
use std::collections::BTreeMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

pub use formats::{HtmlRenderer, MarkdownRenderer, OutputFormat, PdfRenderer};
pub use generate::{generate, GenerateError, GenerateOptions, GeneratedDocument};

/// A rendered diagram, in the form the output format embeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramAsset {
    /// Raster image on disk
    Image(PathBuf),
    /// SVG markup
    Svg(String),
    /// DOT source
    Dot(String),
}

/// Rendered diagrams keyed by diagram id
#[derive(Debug, Clone, Default)]
pub struct DiagramAssets {
    assets: BTreeMap<String, DiagramAsset>,
}

impl DiagramAssets {
    /// Register the asset for `id`
    pub fn insert(&mut self, id: &str, asset: DiagramAsset) {
        self.assets.insert(id.to_owned(), asset);
    }

    /// Asset for `id`
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DiagramAsset> {
        self.assets.get(id)
    }

    /// Path of the image for `id`, if one was rendered
    #[must_use]
    pub fn image_path(&self, id: &str) -> Option<&Path> {
        match self.assets.get(id) {
            Some(DiagramAsset::Image(path)) => Some(path),
            _ => None,
        }
    }

    /// Whether `id` can be embedded right now. Image files are checked on
    /// disk so a file removed after rendering is skipped rather than failing.
    #[must_use]
    pub fn is_available(&self, id: &str) -> bool {
        match self.assets.get(id) {
            Some(DiagramAsset::Image(path)) => path.is_file(),
            Some(_) => true,
            None => false,
        }
    }

    /// Number of registered diagrams
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// True when no diagram is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Everything a renderer needs
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Document being rendered
    pub document: &'a Document,
    /// Diagrams rendered for it
    pub assets: &'a DiagramAssets,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context
    #[must_use]
    pub const fn new(document: &'a Document, assets: &'a DiagramAssets) -> Self {
        Self { document, assets }
    }
}

/// Output of a renderer
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// File contents
    pub bytes: Vec<u8>,
    /// Page count; 1 for unpaginated formats
    pub pages: usize,
    /// Layout details, for paginated formats
    pub summary: Option<LayoutSummary>,
}

/// Trait for document renderers
pub trait DocumentRenderer {
    /// Render the document to bytes
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, ctx: &RenderContext) -> Result<RenderedDocument, Box<dyn Error>>;

    /// Render the document and write it to `output_path`
    ///
    /// # Errors
    /// Returns an error if rendering or file writing fails
    fn generate(
        &self,
        ctx: &RenderContext,
        output_path: &Path,
    ) -> Result<RenderedDocument, Box<dyn Error>> {
        let rendered = self.render(ctx)?;
        fs::write(output_path, &rendered.bytes)?;
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_image_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("git_diagram.png");
        let mut assets = DiagramAssets::default();
        assets.insert("git_workflow", DiagramAsset::Image(path.clone()));
        assets.insert("er_schema", DiagramAsset::Dot("digraph {}".into()));

        assert!(!assets.is_available("git_workflow"));
        fs::write(&path, b"png").unwrap();
        assert!(assets.is_available("git_workflow"));
        assert!(assets.is_available("er_schema"));
        assert!(!assets.is_available("architecture"));
        assert_eq!(assets.image_path("git_workflow"), Some(path.as_path()));
        assert_eq!(assets.image_path("er_schema"), None);
        assert_eq!(assets.len(), 2);
    }
}
