//! Diagram command handler

use super::generate::build_renderer;
use docpress::config::Config;
use docpress::diagram::{DiagramFormat, DiagramId, DiagramRenderer};
use logger::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// What the diagram command writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    /// DOT source, no Graphviz needed
    Dot,
    /// A Graphviz output format
    Rendered(DiagramFormat),
}

impl Target {
    const fn extension(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Rendered(format) => format.extension(),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("dot") || s.eq_ignore_ascii_case("gv") {
            return Ok(Self::Dot);
        }
        DiagramFormat::from_str(s)
            .map(Self::Rendered)
            .map_err(|_| format!("Invalid diagram format '{s}'. Valid options: png, svg, pdf, dot"))
    }
}

/// Run the diagram command.
///
/// # Errors
/// Returns a printable message when the id or format is unknown or the
/// diagram cannot be written.
pub fn run(id: &str, output: Option<&Path>, format: &str, config: &Config) -> Result<(), String> {
    let diagram = DiagramId::from_str(id).map_err(|e| format!("✗ {e}"))?;
    let target = Target::from_str(format).map_err(|e| format!("✗ {e}"))?;
    let path = output.map_or_else(|| default_path(diagram, target, config), Path::to_path_buf);

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("✗ Failed to create {}: {e}", parent.display()))?;
    }

    let graph = diagram.build();
    info!("Rendering diagram {diagram} to {}", path.display());
    match target {
        Target::Dot => fs::write(&path, graph.to_dot())
            .map_err(|e| format!("✗ Failed to write {}: {e}", path.display()))?,
        Target::Rendered(format) => build_renderer(None, config)
            .render(&graph, format, &path)
            .map_err(|e| format!("✗ Failed to render {diagram}: {e}"))?,
    }

    println!("✓ Rendered: {}", path.display());
    Ok(())
}

fn default_path(diagram: DiagramId, target: Target, config: &Config) -> PathBuf {
    let dir = if config.paths.out_dir.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(&config.paths.out_dir)
    };
    dir.join(format!("{}.{}", diagram.file_stem(), target.extension()))
}
