//! List command handler

use docpress::catalog::{self, EntryKind};
use docpress::diagram::DiagramId;

/// Print every document, then the diagram library
pub fn run() {
    let width = catalog::all().iter().map(|e| e.id.len()).max().unwrap_or(0);
    println!("Documents:");
    for entry in catalog::all() {
        let kind = match entry.kind {
            EntryKind::Layout(_) => "",
            EntryKind::Diagram(_) => " [graphviz]",
        };
        println!(
            "  {:<width$}  {:<30}  {}{kind}",
            entry.id, entry.output, entry.title
        );
    }

    let width = DiagramId::ALL
        .iter()
        .map(|d| d.as_str().len())
        .max()
        .unwrap_or(0);
    println!("\nDiagrams:");
    for diagram in DiagramId::ALL {
        println!("  {:<width$}  {}", diagram.as_str(), diagram.description());
    }
}
