//! Directed graph builder with DOT serialization
//!
//! Mirrors the small subset of the DOT language the diagram library needs:
//! default attributes for the graph, its nodes and its edges, nodes with plain
//! or HTML-like labels, edges, and one level of cluster subgraphs.

use super::label::HtmlTable;
use std::fmt::Write as _;

/// An ordered attribute list; setting an existing key replaces its value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(Vec<(String, String)>);

impl Attrs {
    /// Build from `(key, value)` pairs
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut attrs = Self::default();
        for (key, value) in pairs {
            attrs.set(key, value);
        }
        attrs
    }

    /// Set `key`, replacing any previous value
    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(slot) = self.0.iter_mut().find(|(k, _)| k == key) {
            slot.1 = value.to_owned();
        } else {
            self.0.push((key.to_owned(), value.to_owned()));
        }
    }

    /// Value of `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// True when no attribute is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn write_list(&self, out: &mut String) {
        let body: Vec<String> = self
            .0
            .iter()
            .map(|(k, v)| format!("{k}={}", quote(v)))
            .collect();
        out.push_str(&body.join(", "));
    }
}

/// A node label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// Plain text; newlines become line breaks
    Text(String),
    /// HTML-like label markup, emitted between `<` and `>`
    Html(String),
}

impl From<&str> for Label {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Label {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<HtmlTable> for Label {
    fn from(table: HtmlTable) -> Self {
        Self::Html(table.to_html())
    }
}

/// A graph node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node identifier
    pub id: String,
    /// Label, when different from the id
    pub label: Option<Label>,
    /// Node attributes
    pub attrs: Attrs,
}

/// A directed edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Tail node id
    pub from: String,
    /// Head node id
    pub to: String,
    /// Edge attributes, `label` included
    pub attrs: Attrs,
}

/// A subgraph whose name starts with `cluster` so Graphviz boxes it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    /// Subgraph name
    pub name: String,
    /// Graph attributes of the cluster
    pub attrs: Attrs,
    /// Nodes declared inside the cluster
    pub nodes: Vec<Node>,
}

impl Cluster {
    /// Set a cluster attribute
    pub fn attr(&mut self, key: &str, value: &str) -> &mut Self {
        self.attrs.set(key, value);
        self
    }

    /// Declare a node inside the cluster
    pub fn node(&mut self, id: &str, label: impl Into<Label>, attrs: &[(&str, &str)]) -> &mut Self {
        self.nodes.push(Node {
            id: id.to_owned(),
            label: Some(label.into()),
            attrs: Attrs::from_pairs(attrs),
        });
        self
    }
}

/// A directed graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Digraph {
    /// Graph name
    pub name: String,
    /// Graph attributes
    pub graph_attrs: Attrs,
    /// Default node attributes
    pub node_attrs: Attrs,
    /// Default edge attributes
    pub edge_attrs: Attrs,
    /// Cluster subgraphs in declaration order
    pub clusters: Vec<Cluster>,
    /// Top-level nodes
    pub nodes: Vec<Node>,
    /// Edges in declaration order
    pub edges: Vec<Edge>,
}

impl Digraph {
    /// Create an empty graph
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    /// Set graph attributes
    pub fn graph_attr(&mut self, attrs: &[(&str, &str)]) -> &mut Self {
        for (key, value) in attrs {
            self.graph_attrs.set(key, value);
        }
        self
    }

    /// Set default node attributes
    pub fn node_attr(&mut self, attrs: &[(&str, &str)]) -> &mut Self {
        for (key, value) in attrs {
            self.node_attrs.set(key, value);
        }
        self
    }

    /// Set default edge attributes
    pub fn edge_attr(&mut self, attrs: &[(&str, &str)]) -> &mut Self {
        for (key, value) in attrs {
            self.edge_attrs.set(key, value);
        }
        self
    }

    /// Add a cluster and fill it in through `build`
    pub fn cluster(&mut self, name: &str, build: impl FnOnce(&mut Cluster)) -> &mut Self {
        let mut cluster = Cluster {
            name: name.to_owned(),
            attrs: Attrs::default(),
            nodes: Vec::new(),
        };
        build(&mut cluster);
        self.clusters.push(cluster);
        self
    }

    /// Declare a top-level node
    pub fn node(&mut self, id: &str, label: impl Into<Label>, attrs: &[(&str, &str)]) -> &mut Self {
        self.nodes.push(Node {
            id: id.to_owned(),
            label: Some(label.into()),
            attrs: Attrs::from_pairs(attrs),
        });
        self
    }

    /// Add an edge
    pub fn edge(&mut self, from: &str, to: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.edges.push(Edge {
            from: from.to_owned(),
            to: to.to_owned(),
            attrs: Attrs::from_pairs(attrs),
        });
        self
    }

    /// Every node, clustered ones first
    pub fn all_nodes(&self) -> impl Iterator<Item = &Node> {
        self.clusters
            .iter()
            .flat_map(|c| c.nodes.iter())
            .chain(self.nodes.iter())
    }

    /// Look up a node by id
    #[must_use]
    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.all_nodes().find(|n| n.id == id)
    }

    /// Serialize as DOT source
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph {} {{", quote(&self.name));
        write_defaults(&mut out, "\t", "graph", &self.graph_attrs);
        write_defaults(&mut out, "\t", "node", &self.node_attrs);
        write_defaults(&mut out, "\t", "edge", &self.edge_attrs);
        for cluster in &self.clusters {
            let _ = writeln!(out, "\tsubgraph {} {{", quote(&cluster.name));
            write_defaults(&mut out, "\t\t", "graph", &cluster.attrs);
            for node in &cluster.nodes {
                write_node(&mut out, "\t\t", node);
            }
            out.push_str("\t}\n");
        }
        for node in &self.nodes {
            write_node(&mut out, "\t", node);
        }
        for edge in &self.edges {
            let _ = write!(out, "\t{} -> {}", quote(&edge.from), quote(&edge.to));
            if !edge.attrs.is_empty() {
                out.push_str(" [");
                edge.attrs.write_list(&mut out);
                out.push(']');
            }
            out.push('\n');
        }
        out.push_str("}\n");
        out
    }
}

fn write_defaults(out: &mut String, indent: &str, kind: &str, attrs: &Attrs) {
    if attrs.is_empty() {
        return;
    }
    let _ = write!(out, "{indent}{kind} [");
    attrs.write_list(out);
    out.push_str("]\n");
}

fn write_node(out: &mut String, indent: &str, node: &Node) {
    let _ = write!(out, "{indent}{}", quote(&node.id));
    let mut parts = Vec::new();
    match &node.label {
        Some(Label::Text(text)) => parts.push(format!("label={}", quote(text))),
        Some(Label::Html(html)) => parts.push(format!("label=<{html}>")),
        None => {}
    }
    if !node.attrs.is_empty() {
        let mut rest = String::new();
        node.attrs.write_list(&mut rest);
        parts.push(rest);
    }
    if !parts.is_empty() {
        let _ = write!(out, " [{}]", parts.join(", "));
    }
    out.push('\n');
}

/// Quote a DOT identifier or string value
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes_quotes_backslashes_and_newlines() {
        assert_eq!(quote("plain"), "\"plain\"");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote("a\\b"), "\"a\\\\b\"");
        assert_eq!(quote("Faqet\n(Pages)"), "\"Faqet\\n(Pages)\"");
    }

    #[test]
    fn test_attrs_replace_existing_key() {
        let mut attrs = Attrs::from_pairs(&[("rankdir", "TB"), ("dpi", "150")]);
        attrs.set("dpi", "200");
        assert_eq!(attrs.get("dpi"), Some("200"));
        assert_eq!(attrs.get("rankdir"), Some("TB"));
        assert_eq!(attrs.0.len(), 2);
    }

    #[test]
    fn test_to_dot_layout() {
        let mut g = Digraph::new("Git");
        g.graph_attr(&[("rankdir", "LR")])
            .node_attr(&[("shape", "box")])
            .cluster("cluster_a", |c| {
                c.attr("label", "Layer\nA");
                c.node("x", "X", &[("fillcolor", "#BBDEFB")]);
            })
            .node("y", "Y", &[])
            .edge("x", "y", &[("label", "git add")]);
        let dot = g.to_dot();
        assert!(dot.starts_with("digraph \"Git\" {\n"));
        assert!(dot.contains("\tgraph [rankdir=\"LR\"]\n"));
        assert!(dot.contains("\tnode [shape=\"box\"]\n"));
        assert!(dot.contains("\tsubgraph \"cluster_a\" {\n\t\tgraph [label=\"Layer\\nA\"]\n"));
        assert!(dot.contains("\t\t\"x\" [label=\"X\", fillcolor=\"#BBDEFB\"]\n"));
        assert!(dot.contains("\t\"x\" -> \"y\" [label=\"git add\"]\n"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_html_label_is_not_quoted() {
        let mut g = Digraph::new("t");
        g.node("n", Label::Html("<TABLE><TR><TD>a</TD></TR></TABLE>".into()), &[]);
        assert!(g
            .to_dot()
            .contains("\"n\" [label=<<TABLE><TR><TD>a</TD></TR></TABLE>>]"));
    }

    #[test]
    fn test_find_node_searches_clusters() {
        let mut g = Digraph::new("t");
        g.cluster("cluster_c", |c| {
            c.node("inner", "Inner", &[]);
        });
        g.node("outer", "Outer", &[]);
        assert!(g.find_node("inner").is_some());
        assert!(g.find_node("outer").is_some());
        assert!(g.find_node("missing").is_none());
        assert_eq!(g.all_nodes().count(), 2);
    }
}
