//! Generate command handler
//!
//! Generates one or more catalog documents. Every requested id is checked
//! before the first document is written; a failing document is reported and
//! the remaining ones are still generated.

use docpress::catalog::{self, CatalogEntry};
use docpress::config::Config;
use docpress::diagram::GraphvizRenderer;
use docpress::report::{generate, GenerateOptions, GeneratedDocument, OutputFormat};
use logger::{debug, error, info};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Arguments of the generate subcommand
#[derive(Debug, Default)]
pub struct GenerateArgs {
    /// Requested ids; empty for the whole catalog
    pub documents: Vec<String>,
    /// Output format name
    pub format: String,
    /// Output directory
    pub out_dir: Option<PathBuf>,
    /// Work directory
    pub work_dir: Option<PathBuf>,
    /// Keep rendered diagram images
    pub keep_diagrams: bool,
    /// Graphviz binary
    pub dot: Option<PathBuf>,
}

/// Run the generate command.
///
/// # Errors
/// Returns a printable message when an id or the format is unknown, or when
/// at least one document failed.
pub fn run(args: &GenerateArgs, config: &Config) -> Result<(), String> {
    let format = OutputFormat::from_str(&args.format).map_err(|e| format!("✗ {e}"))?;
    let entries = resolve_entries(&args.documents)?;
    let options = build_options(args, config, format);
    let renderer = build_renderer(args.dot.as_deref(), config);

    info!(
        "Generating {} document(s) as {} into {}",
        entries.len(),
        format,
        options.out_dir.display()
    );

    let mut failed = Vec::new();
    for entry in entries {
        match generate(entry, &options, &renderer) {
            Ok(done) => report(&done),
            Err(e) => {
                error!("Generation of {} failed: {e}", entry.id);
                eprintln!("✗ Failed to generate {}: {e}", entry.id);
                failed.push(entry.id);
            }
        }
    }

    if failed.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "✗ {} document(s) failed: {}",
            failed.len(),
            failed.join(", ")
        ))
    }
}

/// Map ids to catalog entries; all of them when none are given
fn resolve_entries(ids: &[String]) -> Result<Vec<&'static CatalogEntry>, String> {
    if ids.is_empty() {
        return Ok(catalog::all().iter().collect());
    }
    let mut entries: Vec<&'static CatalogEntry> = Vec::new();
    for id in ids {
        let entry = catalog::find(id).ok_or_else(|| {
            format!("✗ Unknown document '{id}'. Run `docpress list` to see the available ids")
        })?;
        if !entries.iter().any(|e| e.id == entry.id) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

fn dir_or_default(cli: Option<&Path>, configured: &str) -> PathBuf {
    cli.map_or_else(
        || {
            if configured.is_empty() {
                PathBuf::from(".")
            } else {
                PathBuf::from(configured)
            }
        },
        Path::to_path_buf,
    )
}

/// Command options win over the (already overridden) configuration
fn build_options(args: &GenerateArgs, config: &Config, format: OutputFormat) -> GenerateOptions {
    GenerateOptions {
        out_dir: dir_or_default(args.out_dir.as_deref(), &config.paths.out_dir),
        work_dir: dir_or_default(args.work_dir.as_deref(), &config.paths.work_dir),
        format,
        keep_diagrams: args.keep_diagrams || config.graphviz.keep_diagrams,
    }
}

/// Graphviz renderer for the configured binary and search directories
pub fn build_renderer(dot: Option<&Path>, config: &Config) -> GraphvizRenderer {
    let binary = dot.map_or_else(
        || config.graphviz.binary.clone(),
        |p| p.to_string_lossy().to_string(),
    );
    GraphvizRenderer::new()
        .with_binary(&binary)
        .with_search_dirs(config.graphviz.search_dirs.iter().map(PathBuf::from))
}

fn report(done: &GeneratedDocument) {
    println!(
        "✓ Generated: {} ({} bytes, {} pages)",
        done.path.display(),
        done.bytes,
        done.pages
    );
    if let Some(summary) = &done.summary {
        for (index, table) in summary.tables.iter().enumerate() {
            debug!(
                "{}: table {} laid out with {} rows x {} cols",
                done.id, index, table.rows, table.cols
            );
        }
        for skipped in &summary.images_skipped {
            logger::warn!("{}: diagram '{skipped}' was not available", done.id);
        }
    }
    for path in &done.removed {
        logger::verbose!("  removed {}", path.display());
    }
    for path in &done.kept {
        logger::verbose!("  kept {}", path.display());
    }
}
