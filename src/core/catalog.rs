//! The documents docpress knows how to build
//!
//! Laid-out documents are compiled in from the TOML definitions under
//! `src/assets/documents`. The standalone ER diagram has no layout; Graphviz
//! produces the whole file.

use crate::core::diagram::DiagramId;
use crate::core::models::{Document, DocumentError};
use std::path::Path;

/// How a catalog entry is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Laid out from a document definition
    Layout(&'static str),
    /// Rendered directly from a library diagram
    Diagram(DiagramId),
}

/// One generatable document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Identifier used on the command line
    pub id: &'static str,
    /// Output file name
    pub output: &'static str,
    /// Human title
    pub title: &'static str,
    /// How the document is produced
    pub kind: EntryKind,
}

impl CatalogEntry {
    /// Output file name without extension
    #[must_use]
    pub fn stem(&self) -> &'static str {
        Path::new(self.output)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(self.output)
    }

    /// Library diagrams this entry needs rendered
    ///
    /// # Errors
    /// Returns an error when the definition does not parse.
    pub fn diagrams(&self) -> Result<Vec<DiagramId>, DocumentError> {
        match self.kind {
            EntryKind::Diagram(id) => Ok(vec![id]),
            EntryKind::Layout(source) => load(source)?
                .diagram_ids()
                .into_iter()
                .map(str::parse)
                .collect(),
        }
    }
}

static ENTRIES: [CatalogEntry; 7] = [
    CatalogEntry {
        id: "system_architecture",
        output: "system_architecture.pdf",
        title: "Arkitektura e Sistemit",
        kind: EntryKind::Layout(include_str!(
            "../assets/documents/system_architecture.toml"
        )),
    },
    CatalogEntry {
        id: "design_patterns",
        output: "design_patterns.pdf",
        title: "Design Patterns - Modelet e Dizajnit",
        kind: EntryKind::Layout(include_str!("../assets/documents/design_patterns.toml")),
    },
    CatalogEntry {
        id: "diagrams_presentation",
        output: "diagrams_presentation.pdf",
        title: "Diagramet - Arkitektura dhe Git Workflow",
        kind: EntryKind::Layout(include_str!(
            "../assets/documents/diagrams_presentation.toml"
        )),
    },
    CatalogEntry {
        id: "er_diagram",
        output: "er_diagram.pdf",
        title: "Diagrami ER i Databazes",
        kind: EntryKind::Diagram(DiagramId::ErSchema),
    },
    CatalogEntry {
        id: "er_diagram_presentation",
        output: "er_diagram_presentation.pdf",
        title: "Diagrami Entity-Relationship (ER)",
        kind: EntryKind::Layout(include_str!(
            "../assets/documents/er_diagram_presentation.toml"
        )),
    },
    CatalogEntry {
        id: "unit_testing_coverage",
        output: "unit_testing_coverage.pdf",
        title: "Unit Testing & Code Coverage",
        kind: EntryKind::Layout(include_str!(
            "../assets/documents/unit_testing_coverage.toml"
        )),
    },
    CatalogEntry {
        id: "tests_documentation",
        output: "tests_documentation.pdf",
        title: "Unit Testing - Dokumentacioni i Testeve",
        kind: EntryKind::Layout(include_str!(
            "../assets/documents/tests_documentation.toml"
        )),
    },
];

/// Every entry in generation order
#[must_use]
pub fn all() -> &'static [CatalogEntry] {
    &ENTRIES
}

/// Look up an entry by id or output file stem, ignoring case
#[must_use]
pub fn find(id: &str) -> Option<&'static CatalogEntry> {
    let wanted = id.trim();
    ENTRIES
        .iter()
        .find(|e| e.id.eq_ignore_ascii_case(wanted) || e.stem().eq_ignore_ascii_case(wanted))
}

/// Parse a document definition and check that its diagrams exist
///
/// # Errors
/// Returns the first parse or validation error.
pub fn load(source: &str) -> Result<Document, DocumentError> {
    let document = Document::from_toml(source)?;
    for id in document.diagram_ids() {
        id.parse::<DiagramId>()?;
    }
    logger::verbose!(
        "Loaded document '{}' ({} blocks)",
        document.id,
        document.blocks.len()
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Block;

    #[test]
    fn test_every_layout_parses() {
        for entry in all() {
            if let EntryKind::Layout(source) = entry.kind {
                let document = load(source).unwrap();
                assert_eq!(document.id, entry.id);
                assert_eq!(document.output, entry.output);
                assert_eq!(document.title, entry.title);
                assert!(!document.blocks.is_empty());
            }
        }
    }

    #[test]
    fn test_find_by_id_or_stem() {
        assert_eq!(find("DESIGN_PATTERNS").unwrap().id, "design_patterns");
        assert_eq!(find(" er_diagram ").unwrap().output, "er_diagram.pdf");
        assert!(find("er_diagram.pdf").is_none());
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let ids: Vec<&str> = all().iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 7);
        assert_eq!(ids[0], "system_architecture");
        assert_eq!(ids[6], "tests_documentation");
        for (i, id) in ids.iter().enumerate() {
            assert!(!ids[i + 1..].contains(id));
        }
    }

    #[test]
    fn test_diagrams_per_entry() {
        let arch = find("system_architecture").unwrap();
        assert_eq!(
            arch.diagrams().unwrap(),
            vec![DiagramId::Architecture, DiagramId::GitWorkflow]
        );
        assert_eq!(
            find("er_diagram").unwrap().diagrams().unwrap(),
            vec![DiagramId::ErSchema]
        );
        assert!(find("tests_documentation")
            .unwrap()
            .diagrams()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_unknown_diagram_rejected() {
        let src = r#"
id = "x"
title = "X"
output = "x.pdf"

[[blocks]]
type = "diagram"
diagram = "class_diagram"
width = "10cm"
height = "5cm"
"#;
        let err = load(src).unwrap_err();
        assert!(matches!(err, DocumentError::UnknownDiagram(_)));
    }

    #[test]
    fn test_tests_documentation_listings() {
        let EntryKind::Layout(source) = find("tests_documentation").unwrap().kind else {
            panic!("expected a layout entry");
        };
        let document = load(source).unwrap();
        let listings = document
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::Code(_)))
            .count();
        assert_eq!(listings, 7);
        let shapes: Vec<(usize, usize)> = document
            .tables()
            .map(|t| (t.rows.len(), t.cols()))
            .collect();
        assert_eq!(shapes, vec![(8, 4), (3, 5), (3, 2)]);
    }
}
