//! Graphviz subprocess renderer
//!
//! Diagrams are rasterized by the external `dot` program. The binary is
//! looked up once per renderer: the configured path first, then `dot` on
//! `PATH`, then the configured search directories and finally the default
//! Windows install location.

use super::graph::Digraph;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;
use thiserror::Error;

/// Default Graphviz install directory on Windows
pub const WINDOWS_INSTALL_DIR: &str = r"C:\Program Files\Graphviz\bin";

/// Errors raised while rendering a diagram
#[derive(Debug, Error)]
pub enum DiagramError {
    /// No working `dot` binary was found
    #[error(
        "Graphviz not found (tried: {tried}).\n\
         Install Graphviz (https://graphviz.org/download/) or point to the binary with --dot PATH"
    )]
    NotFound {
        /// Candidates that were probed
        tried: String,
    },
    /// Spawning the process or touching the output file failed
    #[error("Graphviz I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// `dot` exited with a failure status
    #[error("Graphviz failed ({status}): {stderr}")]
    Failed {
        /// Exit status as reported by the OS
        status: String,
        /// Captured standard error
        stderr: String,
    },
}

/// Output formats `dot` is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramFormat {
    /// Raster image, embedded in PDF output
    Png,
    /// Vector image, inlined in HTML output
    Svg,
    /// Standalone PDF
    Pdf,
}

impl DiagramFormat {
    /// Value passed to `-T` and used as the file extension
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
        }
    }
}

impl FromStr for DiagramFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            _ => Err(format!(
                "Invalid diagram format '{s}'. Valid options: png, svg, pdf"
            )),
        }
    }
}

/// Anything able to turn a graph into an image file
pub trait DiagramRenderer {
    /// Render `graph` as `format` into `output`
    ///
    /// # Errors
    /// Returns an error if the diagram could not be produced
    fn render(&self, graph: &Digraph, format: DiagramFormat, output: &Path)
        -> Result<(), DiagramError>;
}

/// A located `dot` binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphvizBinary {
    /// Program to execute
    pub program: PathBuf,
    /// Directory to prepend to the child's `PATH`, when found outside `PATH`
    pub path_dir: Option<PathBuf>,
}

/// Renders diagrams by piping DOT into the `dot` program
#[derive(Debug, Clone, Default)]
pub struct GraphvizRenderer {
    binary: Option<String>,
    search_dirs: Vec<PathBuf>,
}

impl GraphvizRenderer {
    /// Renderer that probes the default locations
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Try `binary` before anything else
    #[must_use]
    pub fn with_binary(mut self, binary: &str) -> Self {
        if !binary.trim().is_empty() {
            self.binary = Some(binary.to_owned());
        }
        self
    }

    /// Extra directories probed for a `dot` executable
    #[must_use]
    pub fn with_search_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Candidates in probing order
    #[must_use]
    pub fn candidates(&self) -> Vec<GraphvizBinary> {
        let exe = if cfg!(windows) { "dot.exe" } else { "dot" };
        let mut out = Vec::new();
        if let Some(binary) = &self.binary {
            let program = PathBuf::from(binary);
            let path_dir = program
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf);
            out.push(GraphvizBinary { program, path_dir });
        }
        out.push(GraphvizBinary {
            program: PathBuf::from("dot"),
            path_dir: None,
        });
        for dir in self
            .search_dirs
            .iter()
            .cloned()
            .chain(std::iter::once(PathBuf::from(WINDOWS_INSTALL_DIR)))
        {
            out.push(GraphvizBinary {
                program: dir.join(exe),
                path_dir: Some(dir),
            });
        }
        out
    }

    /// Locate a working `dot` binary.
    ///
    /// # Errors
    /// Returns [`DiagramError::NotFound`] when no candidate answers `-V`
    pub fn detect(&self) -> Result<GraphvizBinary, DiagramError> {
        let candidates = self.candidates();
        for candidate in &candidates {
            let mut command = Command::new(&candidate.program);
            command.arg("-V").stdout(Stdio::null()).stderr(Stdio::null());
            apply_path(&mut command, candidate.path_dir.as_deref());
            if let Ok(status) = command.status() {
                if status.success() {
                    logger::debug!("Using Graphviz at {}", candidate.program.display());
                    return Ok(candidate.clone());
                }
            }
            logger::verbose!("Graphviz candidate not usable: {}", candidate.program.display());
        }
        let tried = candidates
            .iter()
            .map(|c| c.program.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(DiagramError::NotFound { tried })
    }

    /// Run `dot` on DOT source text
    ///
    /// # Errors
    /// Returns an error when Graphviz is missing or fails
    pub fn render_source(
        &self,
        source: &str,
        format: DiagramFormat,
        output: &Path,
    ) -> Result<(), DiagramError> {
        let binary = self.detect()?;
        let mut command = Command::new(&binary.program);
        command
            .arg(format!("-T{}", format.extension()))
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        apply_path(&mut command, binary.path_dir.as_deref());

        let mut child = command.spawn()?;
        // dot may exit before reading all input; its stderr says why
        let written = child
            .stdin
            .take()
            .map_or(Ok(()), |mut stdin| stdin.write_all(source.as_bytes()));
        let result = child.wait_with_output()?;
        if !result.status.success() {
            return Err(DiagramError::Failed {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_owned(),
            });
        }
        written?;
        logger::debug!("Rendered {}", output.display());
        Ok(())
    }
}

impl DiagramRenderer for GraphvizRenderer {
    fn render(
        &self,
        graph: &Digraph,
        format: DiagramFormat,
        output: &Path,
    ) -> Result<(), DiagramError> {
        self.render_source(&graph.to_dot(), format, output)
    }
}

/// Prepend `dir` to the child's `PATH` so Graphviz finds its plugins
fn apply_path(command: &mut Command, dir: Option<&Path>) {
    let Some(dir) = dir else {
        return;
    };
    let current = std::env::var_os("PATH").unwrap_or_default();
    let paths = std::iter::once(dir.to_path_buf()).chain(std::env::split_paths(&current));
    match std::env::join_paths(paths) {
        Ok(joined) => {
            command.env("PATH", joined);
        }
        Err(e) => logger::warn!("Cannot add {} to PATH: {}", dir.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_order() {
        let renderer = GraphvizRenderer::new()
            .with_binary("/opt/graphviz/bin/dot")
            .with_search_dirs(["/usr/local/graphviz"]);
        let candidates = renderer.candidates();
        assert_eq!(candidates.len(), 4);
        assert_eq!(candidates[0].program, PathBuf::from("/opt/graphviz/bin/dot"));
        assert_eq!(
            candidates[0].path_dir,
            Some(PathBuf::from("/opt/graphviz/bin"))
        );
        assert_eq!(candidates[1].program, PathBuf::from("dot"));
        assert_eq!(candidates[1].path_dir, None);
        assert_eq!(
            candidates[2].path_dir,
            Some(PathBuf::from("/usr/local/graphviz"))
        );
        assert_eq!(
            candidates[3].path_dir,
            Some(PathBuf::from(WINDOWS_INSTALL_DIR))
        );
    }

    #[test]
    fn test_blank_binary_is_ignored() {
        let renderer = GraphvizRenderer::new().with_binary("  ");
        assert_eq!(renderer.candidates()[0].program, PathBuf::from("dot"));
    }

    #[test]
    fn test_missing_binary_reports_not_found() {
        let renderer = GraphvizRenderer {
            binary: Some("/nonexistent/docpress-dot".into()),
            search_dirs: Vec::new(),
        };
        // only meaningful when Graphviz is absent from PATH
        if Command::new("dot").arg("-V").output().is_err() {
            let err = renderer.detect().unwrap_err();
            assert!(matches!(err, DiagramError::NotFound { .. }));
            assert!(err.to_string().contains("/nonexistent/docpress-dot"));
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_early_exit_reports_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("dot");
        std::fs::write(
            &fake,
            "#!/bin/sh\n\
             if [ \"$1\" = \"-V\" ]; then exit 0; fi\n\
             echo 'syntax error in line 1' >&2\n\
             exit 1\n",
        )
        .unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let renderer = GraphvizRenderer::new().with_binary(&fake.to_string_lossy());
        // larger than a pipe buffer, so the write fails once the child is gone
        let source = format!("digraph G {{ /* {} */ }}", "x".repeat(4 << 20));
        let err = renderer
            .render_source(&source, DiagramFormat::Png, &dir.path().join("out.png"))
            .unwrap_err();
        let DiagramError::Failed { stderr, .. } = err else {
            panic!("expected a Graphviz failure");
        };
        assert_eq!(stderr, "syntax error in line 1");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("PNG".parse::<DiagramFormat>(), Ok(DiagramFormat::Png));
        assert_eq!("svg".parse::<DiagramFormat>(), Ok(DiagramFormat::Svg));
        assert!("gif".parse::<DiagramFormat>().is_err());
        assert_eq!(DiagramFormat::Pdf.extension(), "pdf");
    }
}
