//! CLI argument definitions for `docpress`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use docpress::config::ConfigOverrides;
use logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let as_str = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        write!(f, "{as_str}")
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `out_dir`, `dot`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Generate documents.
    ///
    /// With no DOCUMENT, every document in the catalog is generated.
    Generate {
        /// Document ids (see `docpress list`)
        #[arg(value_name = "DOCUMENT")]
        documents: Vec<String>,

        /// Output format: pdf, html or md
        #[arg(short, long, value_name = "FORMAT", default_value = "pdf")]
        format: String,

        /// Output directory (defaults to config `out_dir`)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,

        /// Directory for temporary diagram images (defaults to config `work_dir`)
        #[arg(long, value_name = "DIR")]
        work_dir: Option<PathBuf>,

        /// Keep the rendered diagram images
        #[arg(long)]
        keep_diagrams: bool,

        /// Path to the Graphviz `dot` binary
        #[arg(long, value_name = "PATH")]
        dot: Option<PathBuf>,
    },
    /// List the documents that can be generated.
    List,
    /// Render a single library diagram.
    Diagram {
        /// Diagram id or file stem (e.g. `er_schema`, `git_diagram`)
        #[arg(value_name = "ID")]
        id: String,

        /// Output file (defaults to `<file stem>.<format>` in the output directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Format: png, svg, pdf or dot
        #[arg(short, long, value_name = "FORMAT", default_value = "png")]
        format: String,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "docpress",
    about = "Generates the project documentation PDFs",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level (stored in config file)
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config output directory
    #[arg(long = "config-out-dir", value_name = "DIR")]
    pub config_out_dir: Option<PathBuf>,

    /// Override config output directory (short form)
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Override config work directory
    #[arg(long = "config-work-dir", value_name = "DIR")]
    pub config_work_dir: Option<PathBuf>,

    /// Override config work directory (short form)
    #[arg(long = "work-dir", value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Override config Graphviz binary
    #[arg(long = "config-dot", value_name = "PATH")]
    pub config_dot: Option<PathBuf>,

    /// Override config Graphviz binary (short form)
    #[arg(long = "dot", value_name = "PATH")]
    pub dot: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

fn path_string(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().to_string())
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--out-dir`) take precedence over long-form
    /// flags (e.g., `--config-out-dir`) when both are provided.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string().to_lowercase()),
            file: path_string(self.config_log_file.as_ref()),
            verbose: self.config_verbose,
            out_dir: path_string(self.out_dir.as_ref())
                .or_else(|| path_string(self.config_out_dir.as_ref())),
            work_dir: path_string(self.work_dir.as_ref())
                .or_else(|| path_string(self.config_work_dir.as_ref())),
            dot: path_string(self.dot.as_ref()).or_else(|| path_string(self.config_dot.as_ref())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare() -> Cli {
        Cli {
            log_level: None,
            verbose: false,
            debug_flag: false,
            log_file: None,
            config_level: None,
            config_log_file: None,
            config_verbose: None,
            config_out_dir: None,
            out_dir: None,
            config_work_dir: None,
            work_dir: None,
            config_dot: None,
            dot: None,
            command: Command::List,
        }
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevelArg::Error.to_string(), "error");
        assert_eq!(LogLevelArg::Warn.to_string(), "warn");
        assert_eq!(LogLevelArg::Info.to_string(), "info");
        assert_eq!(LogLevelArg::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_level_to_logger_level() {
        assert_eq!(Level::from(LogLevelArg::Error), Level::Error);
        assert_eq!(Level::from(LogLevelArg::Warn), Level::Warn);
        assert_eq!(Level::from(LogLevelArg::Info), Level::Info);
        assert_eq!(Level::from(LogLevelArg::Debug), Level::Debug);
    }

    #[test]
    fn test_to_config_overrides_empty() {
        let overrides = bare().to_config_overrides();
        assert!(overrides.level.is_none());
        assert!(overrides.file.is_none());
        assert!(overrides.verbose.is_none());
        assert!(overrides.out_dir.is_none());
        assert!(overrides.work_dir.is_none());
        assert!(overrides.dot.is_none());
    }

    #[test]
    fn test_to_config_overrides_with_values() {
        let cli = Cli {
            config_level: Some(LogLevelArg::Debug),
            config_log_file: Some(PathBuf::from("/tmp/test.log")),
            config_verbose: Some(true),
            out_dir: Some(PathBuf::from("/output")),
            config_work_dir: Some(PathBuf::from("/tmp/work")),
            config_dot: Some(PathBuf::from("/opt/graphviz/bin/dot")),
            ..bare()
        };

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.level, Some("debug".to_string()));
        assert_eq!(overrides.file, Some("/tmp/test.log".to_string()));
        assert_eq!(overrides.verbose, Some(true));
        assert_eq!(overrides.out_dir, Some("/output".to_string()));
        assert_eq!(overrides.work_dir, Some("/tmp/work".to_string()));
        assert_eq!(overrides.dot, Some("/opt/graphviz/bin/dot".to_string()));
    }

    #[test]
    fn test_short_form_precedence_over_long_form() {
        let cli = Cli {
            config_out_dir: Some(PathBuf::from("/long/out")),
            out_dir: Some(PathBuf::from("/short/out")),
            config_work_dir: Some(PathBuf::from("/long/work")),
            work_dir: Some(PathBuf::from("/short/work")),
            config_dot: Some(PathBuf::from("/long/dot")),
            dot: Some(PathBuf::from("/short/dot")),
            ..bare()
        };

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.out_dir, Some("/short/out".to_string()));
        assert_eq!(overrides.work_dir, Some("/short/work".to_string()));
        assert_eq!(overrides.dot, Some("/short/dot".to_string()));
    }

    #[test]
    fn test_long_form_when_short_form_absent() {
        let cli = Cli {
            config_out_dir: Some(PathBuf::from("/long/out")),
            config_dot: Some(PathBuf::from("/long/dot")),
            ..bare()
        };

        let overrides = cli.to_config_overrides();
        assert_eq!(overrides.out_dir, Some("/long/out".to_string()));
        assert_eq!(overrides.dot, Some("/long/dot".to_string()));
    }

    #[test]
    fn test_parse_generate_subcommand() {
        let cli = Cli::try_parse_from([
            "docpress",
            "--out-dir",
            "global",
            "generate",
            "design_patterns",
            "er_diagram",
            "-f",
            "html",
            "--out-dir",
            "docs",
            "--keep-diagrams",
        ])
        .unwrap();
        assert_eq!(cli.out_dir, Some(PathBuf::from("global")));
        let Command::Generate {
            documents,
            format,
            out_dir,
            keep_diagrams,
            ..
        } = cli.command
        else {
            panic!("expected generate");
        };
        assert_eq!(documents, vec!["design_patterns", "er_diagram"]);
        assert_eq!(format, "html");
        assert_eq!(out_dir, Some(PathBuf::from("docs")));
        assert!(keep_diagrams);
    }

    #[test]
    fn test_parse_diagram_defaults_to_png() {
        let cli = Cli::try_parse_from(["docpress", "diagram", "er_schema"]).unwrap();
        let Command::Diagram { id, output, format } = cli.command else {
            panic!("expected diagram");
        };
        assert_eq!(id, "er_schema");
        assert!(output.is_none());
        assert_eq!(format, "png");
    }
}
