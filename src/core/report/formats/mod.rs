//! Output format implementations
//!
//! Provides renderers for the supported output formats: PDF, HTML and Markdown.

pub mod html;
pub mod markdown;
pub mod pdf;

pub use html::HtmlRenderer;
pub use markdown::MarkdownRenderer;
pub use pdf::PdfRenderer;

use super::DocumentRenderer;
use crate::core::diagram::DiagramFormat;
use std::fmt;
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Paginated PDF with embedded PNG diagrams
    #[default]
    Pdf,
    /// Self-contained HTML page with inline SVG diagrams
    Html,
    /// Markdown with diagrams as fenced DOT source
    Markdown,
}

impl OutputFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Html => "html",
            Self::Markdown => "md",
        }
    }

    /// Image format diagrams are rendered to, if any
    #[must_use]
    pub const fn diagram_format(&self) -> Option<DiagramFormat> {
        match self {
            Self::Pdf => Some(DiagramFormat::Png),
            Self::Html => Some(DiagramFormat::Svg),
            Self::Markdown => None,
        }
    }

    /// The renderer for this format
    #[must_use]
    pub fn renderer(&self) -> Box<dyn DocumentRenderer> {
        match self {
            Self::Pdf => Box::new(PdfRenderer::new()),
            Self::Html => Box::new(HtmlRenderer::new()),
            Self::Markdown => Box::new(MarkdownRenderer::new()),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "html" | "htm" => Ok(Self::Html),
            "md" | "markdown" => Ok(Self::Markdown),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::Html => write!(f, "html"),
            Self::Markdown => write!(f, "markdown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("PDF".parse::<OutputFormat>(), Ok(OutputFormat::Pdf));
        assert_eq!("htm".parse::<OutputFormat>(), Ok(OutputFormat::Html));
        assert_eq!("markdown".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert!("docx".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_diagram_formats() {
        assert_eq!(OutputFormat::Pdf.diagram_format(), Some(DiagramFormat::Png));
        assert_eq!(OutputFormat::Html.diagram_format(), Some(DiagramFormat::Svg));
        assert_eq!(OutputFormat::Markdown.diagram_format(), None);
        assert_eq!(OutputFormat::Markdown.extension(), "md");
    }
}
