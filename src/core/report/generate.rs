//! The generation pipeline
//!
//! Every document goes through the same steps: render the diagrams it
//! references to temporary files, render the document, write it, then remove
//! the temporary files.

use super::{
    DiagramAsset, DiagramAssets, HtmlRenderer, MarkdownRenderer, OutputFormat, RenderContext,
};
use crate::core::catalog::{self, CatalogEntry, EntryKind};
use crate::core::diagram::{DiagramError, DiagramFormat, DiagramId, DiagramRenderer};
use crate::core::layout::LayoutSummary;
use crate::core::models::{Document, DocumentError};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where and how to generate
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Directory the document is written to
    pub out_dir: PathBuf,
    /// Directory for temporary diagram files
    pub work_dir: PathBuf,
    /// Output format
    pub format: OutputFormat,
    /// Leave temporary diagram files in place
    pub keep_diagrams: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            work_dir: PathBuf::from("."),
            format: OutputFormat::Pdf,
            keep_diagrams: false,
        }
    }
}

/// Result of generating one document
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// Catalog id
    pub id: String,
    /// Written file
    pub path: PathBuf,
    /// Size of the written file
    pub bytes: usize,
    /// Page count; 1 for unpaginated formats
    pub pages: usize,
    /// Temporary diagram files that were removed
    pub removed: Vec<PathBuf>,
    /// Temporary diagram files left in place
    pub kept: Vec<PathBuf>,
    /// Layout details, for laid-out PDF documents
    pub summary: Option<LayoutSummary>,
}

/// Errors that abort the generation of a document
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The document definition is invalid
    #[error(transparent)]
    Document(#[from] DocumentError),
    /// Graphviz could not render a diagram
    #[error(transparent)]
    Diagram(#[from] DiagramError),
    /// Creating directories or writing the output failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The renderer failed
    #[error("failed to render document: {0}")]
    Render(String),
}

/// Temporary diagram files registered before they are written
#[derive(Debug, Default)]
struct TempFiles {
    paths: Vec<PathBuf>,
}

impl TempFiles {
    fn track(&mut self, path: PathBuf) -> PathBuf {
        if !self.paths.contains(&path) {
            self.paths.push(path.clone());
        }
        path
    }

    /// Remove the files unless they are kept. Returns `(removed, kept)`.
    fn finish(self, keep: bool) -> (Vec<PathBuf>, Vec<PathBuf>) {
        if keep {
            let kept = self.paths.into_iter().filter(|p| p.exists()).collect();
            return (Vec::new(), kept);
        }
        let mut removed = Vec::new();
        for path in self.paths {
            if !path.exists() {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => {
                    logger::debug!("Removed temporary file {}", path.display());
                    removed.push(path);
                }
                Err(e) => logger::warn!("Could not remove {}: {}", path.display(), e),
            }
        }
        (removed, Vec::new())
    }
}

/// Output path of `entry` in `options.format`
#[must_use]
pub fn output_path(entry: &CatalogEntry, options: &GenerateOptions) -> PathBuf {
    options
        .out_dir
        .join(Path::new(entry.output).with_extension(options.format.extension()))
}

fn temp_path(options: &GenerateOptions, diagram: DiagramId, format: DiagramFormat) -> PathBuf {
    options
        .work_dir
        .join(format!("{}.{}", diagram.file_stem(), format.extension()))
}

/// Generate one catalog entry.
///
/// Diagrams are rendered through `diagrams`. Documents without diagrams never
/// call it, and Markdown output embeds DOT source without rendering.
///
/// # Errors
/// Returns the first error; temporary files are cleaned up either way.
pub fn generate(
    entry: &CatalogEntry,
    options: &GenerateOptions,
    diagrams: &dyn DiagramRenderer,
) -> Result<GeneratedDocument, GenerateError> {
    fs::create_dir_all(&options.out_dir)?;
    fs::create_dir_all(&options.work_dir)?;
    let path = output_path(entry, options);
    logger::info!("Generating {} -> {}", entry.id, path.display());

    let mut temps = TempFiles::default();
    let outcome = match entry.kind {
        EntryKind::Layout(source) => {
            generate_layout(source, options, diagrams, &path, &mut temps)
        }
        EntryKind::Diagram(diagram) => {
            generate_diagram(entry, diagram, options, diagrams, &path, &mut temps)
        }
    };
    let (removed, kept) = temps.finish(options.keep_diagrams);
    let (pages, summary) = outcome?;

    let bytes = usize::try_from(fs::metadata(&path)?.len()).unwrap_or(usize::MAX);
    Ok(GeneratedDocument {
        id: entry.id.to_owned(),
        path,
        bytes,
        pages,
        removed,
        kept,
        summary,
    })
}

/// Render the diagrams a document references, in first-use order
fn render_assets(
    document: &Document,
    options: &GenerateOptions,
    diagrams: &dyn DiagramRenderer,
    temps: &mut TempFiles,
) -> Result<DiagramAssets, GenerateError> {
    let mut assets = DiagramAssets::default();
    for id in document.diagram_ids() {
        let diagram: DiagramId = id.parse()?;
        let graph = diagram.build();
        let asset = match options.format.diagram_format() {
            None => DiagramAsset::Dot(graph.to_dot()),
            Some(format) => {
                let file = temps.track(temp_path(options, diagram, format));
                diagrams.render(&graph, format, &file)?;
                match format {
                    DiagramFormat::Svg => DiagramAsset::Svg(fs::read_to_string(&file)?),
                    DiagramFormat::Png | DiagramFormat::Pdf => DiagramAsset::Image(file),
                }
            }
        };
        assets.insert(id, asset);
    }
    Ok(assets)
}

fn generate_layout(
    source: &str,
    options: &GenerateOptions,
    diagrams: &dyn DiagramRenderer,
    path: &Path,
    temps: &mut TempFiles,
) -> Result<(usize, Option<LayoutSummary>), GenerateError> {
    let document = catalog::load(source)?;
    let assets = render_assets(&document, options, diagrams, temps)?;
    let ctx = RenderContext::new(&document, &assets);
    let rendered = options
        .format
        .renderer()
        .generate(&ctx, path)
        .map_err(|e| GenerateError::Render(e.to_string()))?;
    Ok((rendered.pages, rendered.summary))
}

fn generate_diagram(
    entry: &CatalogEntry,
    diagram: DiagramId,
    options: &GenerateOptions,
    diagrams: &dyn DiagramRenderer,
    path: &Path,
    temps: &mut TempFiles,
) -> Result<(usize, Option<LayoutSummary>), GenerateError> {
    let graph = diagram.build();
    match options.format {
        OutputFormat::Pdf => diagrams.render(&graph, DiagramFormat::Pdf, path)?,
        OutputFormat::Html => {
            let file = temps.track(temp_path(options, diagram, DiagramFormat::Svg));
            diagrams.render(&graph, DiagramFormat::Svg, &file)?;
            let svg = fs::read_to_string(&file)?;
            let html = HtmlRenderer::wrap_svg(entry.title, &svg)
                .map_err(|e| GenerateError::Render(e.to_string()))?;
            fs::write(path, html)?;
        }
        OutputFormat::Markdown => {
            fs::write(path, MarkdownRenderer::dot_document(entry.title, &graph.to_dot()))?;
        }
    }
    Ok((1, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_files_removed_unless_kept() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        fs::write(&a, b"x").unwrap();

        let mut temps = TempFiles::default();
        temps.track(a.clone());
        temps.track(a.clone());
        temps.track(b);
        let (removed, kept) = temps.finish(false);
        assert_eq!(removed, vec![a.clone()]);
        assert!(kept.is_empty());
        assert!(!a.exists());

        fs::write(&a, b"x").unwrap();
        let mut temps = TempFiles::default();
        temps.track(a.clone());
        let (removed, kept) = temps.finish(true);
        assert!(removed.is_empty());
        assert_eq!(kept, vec![a.clone()]);
        assert!(a.exists());
    }

    #[test]
    fn test_output_path_uses_format_extension() {
        let entry = catalog::find("design_patterns").unwrap();
        let options = GenerateOptions {
            out_dir: PathBuf::from("out"),
            format: OutputFormat::Markdown,
            ..GenerateOptions::default()
        };
        assert_eq!(
            output_path(entry, &options),
            PathBuf::from("out").join("design_patterns.md")
        );
    }
}
