//! Diagrams: DOT graph building, Graphviz rendering and the diagram library

pub mod er;
pub mod graph;
pub mod graphviz;
pub mod label;
pub mod library;

pub use graph::{Digraph, Label};
pub use graphviz::{DiagramError, DiagramFormat, DiagramRenderer, GraphvizRenderer};
pub use library::DiagramId;
