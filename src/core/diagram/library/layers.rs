//! Layered architecture diagrams

use crate::core::diagram::graph::{Cluster, Digraph};
use crate::core::diagram::label::{HtmlCell, HtmlTable, HtmlText};

/// Bold title over smaller item lines
fn caption(title: &str, items: &[&str]) -> HtmlTable {
    let mut table = HtmlTable::new()
        .border(0)
        .cellborder(0)
        .cellspacing(4)
        .line(HtmlCell::new(HtmlText::new(title).bold()));
    for item in items {
        table = table.line(HtmlCell::new(HtmlText::new(item).size(10)));
    }
    table
}

/// Plain filled frame around one layer
fn shaded(c: &mut Cluster, label: &str, color: &str) {
    c.attr("label", label)
        .attr("style", "filled")
        .attr("color", color)
        .attr("fontname", "Arial Bold");
}

/// Bold rounded frame around one layer
fn frame(c: &mut Cluster, label: &str, color: &str, fill: &str, font: &str) {
    c.attr("label", label)
        .attr("style", "filled,rounded,bold")
        .attr("color", color)
        .attr("fillcolor", fill)
        .attr("fontname", "Arial Bold")
        .attr("fontsize", "14")
        .attr("fontcolor", font)
        .attr("penwidth", "3");
}

/// Bold request-flow edge with a padded label
fn flow(g: &mut Digraph, from: &str, to: &str, label: &str, color: &str, font: &str) {
    let label = format!("  {label}  ");
    g.edge(
        from,
        to,
        &[
            ("label", label.as_str()),
            ("color", color),
            ("fontcolor", font),
            ("style", "bold"),
        ],
    );
}

/// Four layers, compact plain-text nodes
pub fn architecture() -> Digraph {
    let mut g = Digraph::new("Architecture");
    g.graph_attr(&[
        ("rankdir", "TB"),
        ("splines", "polyline"),
        ("nodesep", "0.5"),
        ("ranksep", "0.8"),
        ("dpi", "150"),
    ])
    .node_attr(&[
        ("shape", "box"),
        ("style", "filled,rounded"),
        ("fontname", "Arial"),
        ("fontsize", "11"),
    ])
    .edge_attr(&[("fontname", "Arial"), ("fontsize", "9")]);

    g.cluster("cluster_presentation", |c| {
        shaded(c, "Shtresa e Prezantimit\n(Presentation Layer)", "#E3F2FD");
        c.node(
            "pages",
            "Faqet (Pages)\nDashboard, Projects,\nTasks, Courses",
            &[("fillcolor", "#BBDEFB")],
        );
        c.node(
            "components",
            "Komponentet (Components)\nButton, Card, Modal,\nSidebar, Forms",
            &[("fillcolor", "#BBDEFB")],
        );
        c.node(
            "context",
            "State Management\nReact Context API",
            &[("fillcolor", "#BBDEFB")],
        );
    });
    g.cluster("cluster_api", |c| {
        shaded(c, "Shtresa API\n(API Layer)", "#E8F5E9");
        c.node(
            "routes",
            "Route Handlers\n/api/auth, /api/projects\n/api/tasks, /api/courses",
            &[("fillcolor", "#C8E6C9")],
        );
        c.node("auth", "Autentifikimi\nJWT + Cookies", &[("fillcolor", "#C8E6C9")]);
    });
    g.cluster("cluster_business", |c| {
        shaded(c, "Shtresa e Logjikes se Biznesit\n(Business Logic Layer)", "#FFF3E0");
        c.node(
            "services",
            "Services\nAuthService, ProjectService\nTaskService, CourseService\nNotificationService",
            &[("fillcolor", "#FFE0B2")],
        );
    });
    g.cluster("cluster_data", |c| {
        shaded(c, "Shtresa e Aksesit te te Dhenave\n(Data Access Layer)", "#FCE4EC");
        c.node("prisma", "Prisma ORM\nDatabase Client", &[("fillcolor", "#F8BBD9")]);
        c.node(
            "db",
            "PostgreSQL\nDatabase",
            &[("fillcolor", "#F8BBD9"), ("shape", "cylinder")],
        );
    });

    g.edge("pages", "routes", &[("label", "HTTP Requests")])
        .edge("components", "pages", &[("label", ""), ("style", "dashed")])
        .edge("context", "components", &[("label", ""), ("style", "dashed")])
        .edge("routes", "auth", &[("label", "Verify Token")])
        .edge("routes", "services", &[("label", "Call Services")])
        .edge("services", "prisma", &[("label", "Database Queries")])
        .edge("prisma", "db", &[("label", "SQL")]);
    g
}

/// The same four layers drawn for slides: bold cluster frames and
/// table-formatted node captions
pub fn architecture_clean() -> Digraph {
    let mut g = Digraph::new("Architecture");
    g.graph_attr(&[
        ("rankdir", "TB"),
        ("splines", "ortho"),
        ("nodesep", "0.8"),
        ("ranksep", "1.0"),
        ("bgcolor", "white"),
        ("pad", "0.5"),
        ("compound", "true"),
        ("dpi", "200"),
    ])
    .node_attr(&[
        ("fontname", "Arial"),
        ("fontsize", "12"),
        ("style", "filled,rounded"),
        ("penwidth", "2"),
    ])
    .edge_attr(&[("fontname", "Arial"), ("fontsize", "10"), ("penwidth", "2")]);

    let blue = [("shape", "box"), ("fillcolor", "#BBDEFB"), ("color", "#1976D2")];
    let green = [("shape", "box"), ("fillcolor", "#C8E6C9"), ("color", "#388E3C")];

    g.cluster("cluster_presentation", |c| {
        frame(
            c,
            "SHTRESA E PREZANTIMIT\n(Presentation Layer)",
            "#1565C0",
            "#E3F2FD",
            "#0D47A1",
        );
        c.node(
            "pages",
            caption(
                "Faqet (Pages)",
                &["Dashboard", "Projects / Tasks", "Courses / Settings"],
            ),
            &blue,
        );
        c.node(
            "components",
            caption("Komponentet UI", &["Button, Card, Modal", "Sidebar, Forms"]),
            &blue,
        );
        c.node(
            "state",
            caption(
                "State Management",
                &["React Context API", "NotificationContext"],
            ),
            &blue,
        );
    });
    g.cluster("cluster_api", |c| {
        frame(c, "SHTRESA API\n(API Layer)", "#2E7D32", "#E8F5E9", "#1B5E20");
        c.node(
            "routes",
            caption(
                "Route Handlers",
                &["/api/auth/*", "/api/projects/*", "/api/tasks/*"],
            ),
            &green,
        );
        c.node(
            "auth",
            caption("Autentifikimi", &["JWT Token", "HttpOnly Cookies"]),
            &green,
        );
    });
    g.cluster("cluster_business", |c| {
        frame(
            c,
            "SHTRESA E LOGJIKES SE BIZNESIT\n(Business Logic Layer)",
            "#E65100",
            "#FFF3E0",
            "#BF360C",
        );
        c.node(
            "services",
            caption(
                "Services",
                &[
                    "AuthService",
                    "ProjectService",
                    "TaskService",
                    "NotificationService",
                ],
            ),
            &[("shape", "box"), ("fillcolor", "#FFE0B2"), ("color", "#F57C00")],
        );
    });
    g.cluster("cluster_data", |c| {
        frame(
            c,
            "SHTRESA E AKSESIT TE TE DHENAVE\n(Data Access Layer)",
            "#6A1B9A",
            "#F3E5F5",
            "#4A148C",
        );
        c.node(
            "prisma",
            caption("Prisma ORM", &["Database Client", "Query Builder"]),
            &[("shape", "box"), ("fillcolor", "#E1BEE7"), ("color", "#8E24AA")],
        );
        c.node(
            "db",
            caption("PostgreSQL", &["Database"]),
            &[
                ("shape", "cylinder"),
                ("fillcolor", "#CE93D8"),
                ("color", "#7B1FA2"),
            ],
        );
    });

    flow(&mut g, "pages", "routes", "HTTP Request", "#1976D2", "#1976D2");
    g.edge(
        "components",
        "pages",
        &[("style", "dashed"), ("color", "#64B5F6"), ("arrowhead", "none")],
    )
    .edge(
        "state",
        "components",
        &[("style", "dashed"), ("color", "#64B5F6"), ("arrowhead", "none")],
    );
    flow(&mut g, "routes", "auth", "Verify", "#388E3C", "#388E3C");
    flow(&mut g, "routes", "services", "Call Service", "#388E3C", "#388E3C");
    flow(&mut g, "services", "prisma", "Query", "#F57C00", "#E65100");
    flow(&mut g, "prisma", "db", "SQL", "#8E24AA", "#6A1B9A");
    g.edge(
        "db",
        "pages",
        &[
            ("label", "  Response  "),
            ("color", "#9E9E9E"),
            ("fontcolor", "#616161"),
            ("style", "dashed"),
            ("constraint", "false"),
        ],
    );
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_architecture_shape() {
        let g = architecture();
        assert_eq!(g.clusters.len(), 4);
        assert_eq!(g.all_nodes().count(), 8);
        assert_eq!(g.edges.len(), 7);
        assert_eq!(
            g.find_node("db").and_then(|n| n.attrs.get("shape")),
            Some("cylinder")
        );
    }

    #[test]
    fn test_clean_variant_adds_response_edge() {
        let g = architecture_clean();
        assert_eq!(g.clusters.len(), 4);
        assert_eq!(g.edges.len(), 8);
        let response = g.edges.last().unwrap();
        assert_eq!((response.from.as_str(), response.to.as_str()), ("db", "pages"));
        assert_eq!(response.attrs.get("constraint"), Some("false"));
        assert!(g.to_dot().contains("<B>Faqet (Pages)</B>"));
    }
}
