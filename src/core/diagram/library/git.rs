//! Git workflow diagrams

use crate::core::diagram::graph::Digraph;
use crate::core::diagram::label::{HtmlCell, HtmlTable, HtmlText};

/// Working directory, staging area, local and remote repository
pub fn git_workflow() -> Digraph {
    let mut g = Digraph::new("Git");
    g.graph_attr(&[
        ("rankdir", "LR"),
        ("splines", "line"),
        ("nodesep", "0.4"),
        ("dpi", "150"),
    ])
    .node_attr(&[
        ("shape", "box"),
        ("style", "filled,rounded"),
        ("fontname", "Arial"),
        ("fontsize", "10"),
    ])
    .edge_attr(&[("fontname", "Arial"), ("fontsize", "8")]);

    g.node(
        "working",
        "Working Directory\n(Dosja e Punes)",
        &[("fillcolor", "#FFCDD2")],
    )
    .node(
        "staging",
        "Staging Area\n(Zona e Pergatitjes)",
        &[("fillcolor", "#FFF9C4")],
    )
    .node("local", "Local Repository\n(Repo Lokal)", &[("fillcolor", "#C8E6C9")])
    .node("remote", "Remote Repository\n(GitHub)", &[("fillcolor", "#BBDEFB")]);

    g.edge("working", "staging", &[("label", "git add")])
        .edge("staging", "local", &[("label", "git commit")])
        .edge("local", "remote", &[("label", "git push")])
        .edge("remote", "local", &[("label", "git pull"), ("style", "dashed")]);
    g
}

/// Icon, title, Albanian name and hint stacked in one node
fn stage(icon: &str, title: &str, name: &str, hint: &str) -> HtmlTable {
    HtmlTable::new()
        .border(0)
        .cellborder(0)
        .cellspacing(4)
        .line(HtmlCell::new(HtmlText::new(icon).size(24)))
        .line(HtmlCell::new(HtmlText::new(title).bold()))
        .line(HtmlCell::new(HtmlText::new(name).size(10).color("#666666")))
        .line(HtmlCell::new(HtmlText::new(hint).size(9).color("#888888")))
}

/// Slide version with icons, colored outlines and fetch/pull return paths
pub fn git_workflow_clean() -> Digraph {
    let mut g = Digraph::new("Git");
    g.graph_attr(&[
        ("rankdir", "LR"),
        ("splines", "spline"),
        ("nodesep", "1.2"),
        ("ranksep", "1.5"),
        ("bgcolor", "white"),
        ("pad", "0.5"),
        ("dpi", "200"),
    ])
    .node_attr(&[
        ("fontname", "Arial"),
        ("fontsize", "13"),
        ("style", "filled,rounded"),
        ("penwidth", "3"),
        ("height", "1.2"),
        ("width", "2"),
    ])
    .edge_attr(&[("fontname", "Arial Bold"), ("fontsize", "12"), ("penwidth", "3")]);

    let stages = [
        (
            "working",
            "\u{1F4C1}",
            "Working Directory",
            "Dosja e Punes",
            "Skedaret lokale",
            "#FFCDD2",
            "#C62828",
        ),
        (
            "staging",
            "\u{1F4CB}",
            "Staging Area",
            "Zona e Pergatitjes",
            "Gati per commit",
            "#FFF9C4",
            "#F9A825",
        ),
        (
            "local",
            "\u{1F4BE}",
            "Local Repository",
            "Repo Lokal",
            "Historia e commits",
            "#C8E6C9",
            "#2E7D32",
        ),
        (
            "remote",
            "\u{2601}\u{FE0F}",
            "Remote Repository",
            "GitHub / GitLab",
            "Cloud storage",
            "#BBDEFB",
            "#1565C0",
        ),
    ];
    for (id, icon, title, name, hint, fill, color) in stages {
        g.node(
            id,
            stage(icon, title, name, hint),
            &[("shape", "box"), ("fillcolor", fill), ("color", color)],
        );
    }

    let transitions = [
        ("working", "staging", "git add", "#E65100", "bold", None),
        ("staging", "local", "git commit", "#2E7D32", "bold", None),
        ("local", "remote", "git push", "#1565C0", "bold", None),
        ("remote", "local", "git fetch", "#7B1FA2", "dashed", None),
        ("remote", "working", "git pull", "#C62828", "dashed", Some("false")),
    ];
    for (from, to, command, color, style, constraint) in transitions {
        let label = format!("  {command}  ");
        let mut attrs = vec![
            ("label", label.as_str()),
            ("color", color),
            ("fontcolor", color),
            ("style", style),
        ];
        if let Some(constraint) = constraint {
            attrs.push(("constraint", constraint));
        }
        g.edge(from, to, &attrs);
    }
    g
}
