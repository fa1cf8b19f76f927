//! Integration tests for document generation
//!
//! Graphviz is replaced by a stub renderer that writes small but valid
//! files, so these tests run without `dot` installed.

use docpress::catalog::{self, EntryKind};
use docpress::diagram::{DiagramError, DiagramFormat, DiagramRenderer, Digraph};
use docpress::report::{generate, GenerateOptions, OutputFormat};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Writes a placeholder file for each requested diagram and records the calls
#[derive(Default)]
struct StubRenderer {
    calls: RefCell<Vec<(DiagramFormat, PathBuf)>>,
}

impl DiagramRenderer for StubRenderer {
    fn render(
        &self,
        graph: &Digraph,
        format: DiagramFormat,
        output: &Path,
    ) -> Result<(), DiagramError> {
        self.calls.borrow_mut().push((format, output.to_path_buf()));
        match format {
            DiagramFormat::Png => {
                image::RgbaImage::from_pixel(120, 60, image::Rgba([25, 118, 210, 255]))
                    .save(output)
                    .map_err(|e| DiagramError::Io(std::io::Error::other(e.to_string())))?;
            }
            DiagramFormat::Svg => fs::write(
                output,
                format!(
                    "<?xml version=\"1.0\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\"><!-- {} bytes of dot --></svg>",
                    graph.to_dot().len()
                ),
            )?,
            DiagramFormat::Pdf => fs::write(output, b"%PDF-1.4\n%stub\n%%EOF\n")?,
        }
        Ok(())
    }
}

/// Always fails, like a missing Graphviz install
struct MissingGraphviz;

impl DiagramRenderer for MissingGraphviz {
    fn render(&self, _: &Digraph, _: DiagramFormat, _: &Path) -> Result<(), DiagramError> {
        Err(DiagramError::NotFound {
            tried: "dot".to_string(),
        })
    }
}

fn options(dir: &TempDir, format: OutputFormat) -> GenerateOptions {
    GenerateOptions {
        out_dir: dir.path().join("out"),
        work_dir: dir.path().join("work"),
        format,
        keep_diagrams: false,
    }
}

/// Rows and columns of every table, read straight from the raw definition
fn literal_table_shapes(source: &str) -> Vec<(usize, usize)> {
    let value: toml::Value = source.parse().expect("Failed to parse definition");
    value["blocks"]
        .as_array()
        .expect("blocks is an array")
        .iter()
        .filter(|block| block.get("type").and_then(toml::Value::as_str) == Some("table"))
        .map(|block| {
            let len = |key: &str| block[key].as_array().map_or(0, Vec::len);
            (len("rows"), len("col_widths"))
        })
        .collect()
}

#[test]
fn test_every_document_generates_pdf() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let stub = StubRenderer::default();
    let options = options(&dir, OutputFormat::Pdf);

    for entry in catalog::all() {
        let done = generate(entry, &options, &stub)
            .unwrap_or_else(|e| panic!("{} failed: {e}", entry.id));
        assert_eq!(done.path, options.out_dir.join(entry.output));
        let bytes = fs::read(&done.path).expect("Failed to read output");
        assert!(!bytes.is_empty());
        assert!(bytes.starts_with(b"%PDF"), "{} is not a PDF", entry.id);
        assert_eq!(done.bytes, bytes.len());
        assert!(done.pages >= 1);
    }
}

#[test]
fn test_temporary_diagrams_are_removed() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let stub = StubRenderer::default();
    let options = options(&dir, OutputFormat::Pdf);
    let entry = catalog::find("system_architecture").unwrap();

    let done = generate(entry, &options, &stub).unwrap();

    let calls = stub.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|(format, _)| *format == DiagramFormat::Png));
    assert_eq!(
        done.removed,
        vec![
            options.work_dir.join("architecture_diagram.png"),
            options.work_dir.join("git_diagram.png"),
        ]
    );
    assert!(done.kept.is_empty());
    for path in &done.removed {
        assert!(!path.exists(), "{} was not removed", path.display());
    }
    let summary = done.summary.unwrap();
    assert_eq!(summary.images_placed, vec!["architecture", "git_workflow"]);
    assert!(summary.images_skipped.is_empty());
}

#[test]
fn test_keep_diagrams_leaves_files() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let stub = StubRenderer::default();
    let options = GenerateOptions {
        keep_diagrams: true,
        ..options(&dir, OutputFormat::Pdf)
    };
    let entry = catalog::find("diagrams_presentation").unwrap();

    let done = generate(entry, &options, &stub).unwrap();

    assert!(done.removed.is_empty());
    assert_eq!(done.kept.len(), 2);
    assert!(done.kept.iter().all(|p| p.is_file()));
}

#[test]
fn test_table_shapes_match_definitions() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let stub = StubRenderer::default();
    let options = options(&dir, OutputFormat::Pdf);

    for entry in catalog::all() {
        let EntryKind::Layout(source) = entry.kind else {
            continue;
        };
        let expected = literal_table_shapes(source);
        assert!(!expected.is_empty(), "{} has no tables", entry.id);

        let done = generate(entry, &options, &stub).unwrap();
        let laid: Vec<(usize, usize)> = done
            .summary
            .unwrap()
            .tables
            .iter()
            .map(|t| (t.rows, t.cols))
            .collect();
        assert_eq!(laid, expected, "table shapes differ in {}", entry.id);
    }
}

#[test]
fn test_documents_without_diagrams_skip_graphviz() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let options = options(&dir, OutputFormat::Pdf);

    for id in ["design_patterns", "unit_testing_coverage", "tests_documentation"] {
        let entry = catalog::find(id).unwrap();
        let done = generate(entry, &options, &MissingGraphviz)
            .unwrap_or_else(|e| panic!("{id} failed: {e}"));
        assert!(done.removed.is_empty());
    }
}

#[test]
fn test_missing_graphviz_fails_and_cleans_up() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let options = options(&dir, OutputFormat::Pdf);
    let entry = catalog::find("er_diagram_presentation").unwrap();

    let err = generate(entry, &options, &MissingGraphviz).unwrap_err();
    assert!(err.to_string().contains("Graphviz not found"));
    assert!(!options.out_dir.join(entry.output).exists());
}

#[test]
fn test_html_inlines_svg() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let stub = StubRenderer::default();
    let options = options(&dir, OutputFormat::Html);
    let entry = catalog::find("system_architecture").unwrap();

    let done = generate(entry, &options, &stub).unwrap();

    assert_eq!(done.path, options.out_dir.join("system_architecture.html"));
    assert_eq!(done.pages, 1);
    let html = fs::read_to_string(&done.path).unwrap();
    assert!(html.contains("<svg"));
    assert!(!html.contains("<?xml"));
    assert!(stub
        .calls
        .borrow()
        .iter()
        .all(|(format, _)| *format == DiagramFormat::Svg));
    assert!(done.removed.iter().all(|p| !p.exists()));
}

#[test]
fn test_markdown_embeds_dot_without_rendering() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let options = options(&dir, OutputFormat::Markdown);

    let entry = catalog::find("diagrams_presentation").unwrap();
    let done = generate(entry, &options, &MissingGraphviz).unwrap();
    let md = fs::read_to_string(&done.path).unwrap();
    assert!(md.starts_with("# "));
    assert_eq!(md.matches("```dot").count(), 2);

    let entry = catalog::find("er_diagram").unwrap();
    let done = generate(entry, &options, &MissingGraphviz).unwrap();
    assert_eq!(done.path, options.out_dir.join("er_diagram.md"));
    let md = fs::read_to_string(&done.path).unwrap();
    assert!(md.contains("```dot\ndigraph"));
}

#[test]
fn test_er_diagram_renders_pdf_directly() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let stub = StubRenderer::default();
    let options = options(&dir, OutputFormat::Pdf);
    let entry = catalog::find("er_diagram").unwrap();

    let done = generate(entry, &options, &stub).unwrap();

    let calls = stub.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], (DiagramFormat::Pdf, done.path.clone()));
    assert!(done.summary.is_none());
    assert!(done.removed.is_empty());
}
