//! The fixed set of diagrams documents can embed

mod git;
mod layers;
mod schema;

pub use schema::{presentation_model, schema_model};

use super::graph::Digraph;
use crate::core::models::DocumentError;
use std::fmt;
use std::str::FromStr;

/// Identifier of a library diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramId {
    /// Layered architecture, compact
    Architecture,
    /// Git workflow, compact
    GitWorkflow,
    /// Layered architecture for slides
    ArchitectureClean,
    /// Git workflow for slides
    GitWorkflowClean,
    /// Full database schema
    ErSchema,
    /// Database schema grouped by domain
    ErPresentation,
}

impl DiagramId {
    /// Every diagram in a stable order
    pub const ALL: [Self; 6] = [
        Self::Architecture,
        Self::GitWorkflow,
        Self::ArchitectureClean,
        Self::GitWorkflowClean,
        Self::ErSchema,
        Self::ErPresentation,
    ];

    /// Identifier used in document definitions and on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Architecture => "architecture",
            Self::GitWorkflow => "git_workflow",
            Self::ArchitectureClean => "architecture_clean",
            Self::GitWorkflowClean => "git_workflow_clean",
            Self::ErSchema => "er_schema",
            Self::ErPresentation => "er_presentation",
        }
    }

    /// Base name of the rendered file
    #[must_use]
    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::Architecture => "architecture_diagram",
            Self::GitWorkflow => "git_diagram",
            Self::ArchitectureClean => "architecture_clean",
            Self::GitWorkflowClean => "git_workflow_clean",
            Self::ErSchema => "er_diagram",
            Self::ErPresentation => "er_diagram_vertical",
        }
    }

    /// One-line description for listings
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Architecture => "Layered architecture (4 layers)",
            Self::GitWorkflow => "Git workflow: working dir, staging, local, remote",
            Self::ArchitectureClean => "Layered architecture, presentation style",
            Self::GitWorkflowClean => "Git workflow with fetch/pull, presentation style",
            Self::ErSchema => "Entity-relationship diagram of the full schema",
            Self::ErPresentation => "Entity-relationship diagram grouped by domain",
        }
    }

    /// Build the graph
    #[must_use]
    pub fn build(self) -> Digraph {
        match self {
            Self::Architecture => layers::architecture(),
            Self::GitWorkflow => git::git_workflow(),
            Self::ArchitectureClean => layers::architecture_clean(),
            Self::GitWorkflowClean => git::git_workflow_clean(),
            Self::ErSchema => schema::er_schema(),
            Self::ErPresentation => schema::er_presentation(),
        }
    }
}

impl FromStr for DiagramId {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted || id.file_stem() == wanted)
            .ok_or_else(|| DocumentError::UnknownDiagram(s.to_owned()))
    }
}

impl fmt::Display for DiagramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
