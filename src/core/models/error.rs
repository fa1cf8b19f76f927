//! Errors raised while loading a document definition.

use thiserror::Error;

/// Problems found while parsing or validating a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The TOML source does not match the document schema
    #[error("failed to parse document: {0}")]
    Parse(#[from] toml::de::Error),
    /// A length string without a known unit
    #[error("invalid length '{0}' (expected a number with cm, mm, in or pt)")]
    Length(String),
    /// A color that is neither `#RRGGBB` nor a known name
    #[error("invalid color '{0}'")]
    Color(String),
    /// A font name outside the built-in PDF fonts
    #[error("unknown font '{0}'")]
    Font(String),
    /// Unbalanced or unknown inline markup
    #[error("invalid markup in \"{text}\": {reason}")]
    Markup {
        /// Offending paragraph text (shortened)
        text: String,
        /// What went wrong
        reason: String,
    },
    /// A paragraph or style references a style that does not exist
    #[error("unknown paragraph style '{0}'")]
    UnknownStyle(String),
    /// Styles whose parents loop back on themselves
    #[error("paragraph style '{0}' inherits from itself")]
    StyleCycle(String),
    /// A table references a preset missing from `table_styles`
    #[error("unknown table style preset '{0}'")]
    UnknownPreset(String),
    /// A table row does not have one cell per column
    #[error("table {table}: row {row} has {found} cells, expected {expected}")]
    RowWidth {
        /// Zero-based index of the table within the document
        table: usize,
        /// Zero-based row index
        row: usize,
        /// Cells in the row
        found: usize,
        /// Declared columns
        expected: usize,
    },
    /// A diagram block names a diagram that is not in the library
    #[error("unknown diagram '{0}'")]
    UnknownDiagram(String),
}
