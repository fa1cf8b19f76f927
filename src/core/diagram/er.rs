//! Entity-relationship model
//!
//! Entities and relationships are plain data; [`ErModel::add_to`] turns them
//! into graph nodes and edges in one of two label styles:
//!
//! - [`ErStyle::Schema`]: two-column boxes (field, type) with a colored
//!   header, the primary key underlined.
//! - [`ErStyle::Presentation`]: single-column boxes where primary keys are
//!   bold and underlined and foreign keys italic.

use super::graph::{Cluster, Digraph};
use super::label::{HtmlCell, HtmlTable, HtmlText};

/// Role of a field in its entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Primary key, written with a `*` prefix
    Primary,
    /// Foreign key, written with a `+` prefix
    Foreign,
    /// Ordinary attribute
    Plain,
}

/// One attribute of an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Attribute name without its key prefix
    pub name: String,
    /// Type column, when shown
    pub kind: Option<String>,
    /// Key role
    pub key: KeyKind,
}

impl Field {
    /// Parse a field written as `*name`, `+name` or `name`
    #[must_use]
    pub fn parse(spec: &str, kind: Option<&str>) -> Self {
        let (key, name) = if let Some(rest) = spec.strip_prefix('*') {
            (KeyKind::Primary, rest)
        } else if let Some(rest) = spec.strip_prefix('+') {
            (KeyKind::Foreign, rest)
        } else {
            (KeyKind::Plain, spec)
        };
        Self {
            name: name.to_owned(),
            kind: kind.map(str::to_owned),
            key,
        }
    }
}

/// A table of the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Entity name, also its node id
    pub name: String,
    /// Header cell background
    pub header: String,
    /// Header text color
    pub header_font: String,
    /// Body background, if any
    pub body: Option<String>,
    /// Attributes in display order
    pub fields: Vec<Field>,
}

impl Entity {
    /// Entity whose fields carry a type column (`("*id", "UUID (PK)")`)
    #[must_use]
    pub fn typed(name: &str, header: &str, body: &str, fields: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_owned(),
            header: header.to_owned(),
            header_font: "white".to_owned(),
            body: Some(body.to_owned()),
            fields: fields
                .iter()
                .map(|(spec, kind)| Field::parse(spec, Some(*kind)))
                .collect(),
        }
    }

    /// Entity whose fields are names only (`"*id (UUID)"`, `"+projectId"`)
    #[must_use]
    pub fn named(name: &str, header: &str, fields: &[&str]) -> Self {
        Self {
            name: name.to_owned(),
            header: header.to_owned(),
            header_font: "white".to_owned(),
            body: None,
            fields: fields.iter().map(|spec| Field::parse(spec, None)).collect(),
        }
    }

    /// Override the header text color
    #[must_use]
    pub fn header_font(mut self, color: &str) -> Self {
        self.header_font = color.to_owned();
        self
    }

    /// The node label for `style`
    #[must_use]
    pub fn label(&self, style: ErStyle) -> HtmlTable {
        let title = HtmlText::new(&self.name).bold().color(&self.header_font);
        match style {
            ErStyle::Schema => {
                let mut table = HtmlTable::new().border(1).cellborder(0).cellspacing(0);
                if let Some(body) = &self.body {
                    table = table.bgcolor(body);
                }
                table = table.line(HtmlCell::new(title).colspan(2).bgcolor(&self.header));
                for field in &self.fields {
                    let mut name = HtmlText::new(&field.name);
                    if field.key == KeyKind::Primary {
                        name = name.underline();
                    }
                    table = table.row(vec![
                        HtmlCell::new(name).align("LEFT"),
                        HtmlCell::plain(field.kind.as_deref().unwrap_or_default()).align("LEFT"),
                    ]);
                }
                table
            }
            ErStyle::Presentation => {
                let mut table = HtmlTable::new()
                    .border(0)
                    .cellborder(1)
                    .cellspacing(0)
                    .cellpadding(6)
                    .line(HtmlCell::new(title).bgcolor(&self.header).align("CENTER"));
                for field in &self.fields {
                    let text = HtmlText::new(&field.name);
                    let text = match field.key {
                        KeyKind::Primary => text.bold().underline(),
                        KeyKind::Foreign => text.italic(),
                        KeyKind::Plain => text,
                    };
                    table = table.line(HtmlCell::new(text).align("LEFT"));
                }
                table
            }
        }
    }
}

/// Label style of an ER diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErStyle {
    /// Full schema with types
    Schema,
    /// Names only, keys by typography
    Presentation,
}

/// A directed relationship with its cardinalities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Entity on the "one" side
    pub from: String,
    /// Related entity
    pub to: String,
    /// Cardinality at `from`
    pub left: String,
    /// Cardinality at `to`
    pub right: String,
    /// Verb describing the relationship
    pub role: Option<String>,
}

impl Relationship {
    /// Relationship without a role
    #[must_use]
    pub fn new(from: &str, to: &str, left: &str, right: &str) -> Self {
        Self {
            from: from.to_owned(),
            to: to.to_owned(),
            left: left.to_owned(),
            right: right.to_owned(),
            role: None,
        }
    }

    /// Attach a role verb
    #[must_use]
    pub fn role(mut self, role: &str) -> Self {
        self.role = Some(role.to_owned());
        self
    }

    /// `left:right`
    #[must_use]
    pub fn cardinality(&self) -> String {
        format!("{}:{}", self.left, self.right)
    }

    /// Edge arrowhead: none for a to-one side, crow's foot otherwise
    #[must_use]
    pub fn arrowhead(&self) -> &'static str {
        if self.right == "1" {
            "none"
        } else {
            "crow"
        }
    }
}

/// Entities and the relationships between them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErModel {
    /// Entities in declaration order
    pub entities: Vec<Entity>,
    /// Relationships in declaration order, duplicates included
    pub relationships: Vec<Relationship>,
}

impl ErModel {
    /// Relationships keeping only the first per `(from, to)` pair
    #[must_use]
    pub fn unique_relationships(&self) -> Vec<&Relationship> {
        let mut seen: Vec<(&str, &str)> = Vec::new();
        let mut out = Vec::new();
        for rel in &self.relationships {
            let key = (rel.from.as_str(), rel.to.as_str());
            if !seen.contains(&key) {
                seen.push(key);
                out.push(rel);
            }
        }
        out
    }

    /// Look up an entity
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name == name)
    }

    /// Add the named entities as nodes of `cluster`
    pub fn add_entities_to(&self, cluster: &mut Cluster, names: &[&str], style: ErStyle) {
        for entity in names.iter().filter_map(|name| self.entity(name)) {
            cluster.node(&entity.name, entity.label(style), &[]);
        }
    }

    /// Add every entity as a top-level node and every unique relationship as
    /// an edge. Schema edges show the cardinality only; presentation edges
    /// prefix it with the role when one is set.
    pub fn add_to(&self, graph: &mut Digraph, style: ErStyle, with_nodes: bool) {
        if with_nodes {
            for entity in &self.entities {
                graph.node(&entity.name, entity.label(style), &[]);
            }
        }
        for rel in self.unique_relationships() {
            let label = match (style, &rel.role) {
                (ErStyle::Presentation, Some(role)) => format!("{role}\n{}", rel.cardinality()),
                _ => rel.cardinality(),
            };
            graph.edge(
                &rel.from,
                &rel.to,
                &[("label", label.as_str()), ("arrowhead", rel.arrowhead())],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ErModel {
        ErModel {
            entities: vec![
                Entity::typed(
                    "User",
                    "#2196F3",
                    "#E8F4FD",
                    &[("*id", "UUID (PK)"), ("email", "String (unique)")],
                ),
                Entity::named("Task", "#7B1FA2", &["*id (UUID)", "+projectId", "title"]),
            ],
            relationships: vec![
                Relationship::new("User", "Task", "1", "N").role("assigned"),
                Relationship::new("User", "Task", "1", "N").role("creates"),
                Relationship::new("Project", "ProjectGrade", "1", "1").role("graded"),
            ],
        }
    }

    #[test]
    fn test_field_prefixes() {
        assert_eq!(Field::parse("*id (UUID)", None).key, KeyKind::Primary);
        assert_eq!(Field::parse("+userId", None).name, "userId");
        assert_eq!(Field::parse("title", None).key, KeyKind::Plain);
    }

    #[test]
    fn test_duplicate_pairs_keep_first() {
        let m = model();
        let unique = m.unique_relationships();
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].role.as_deref(), Some("assigned"));
    }

    #[test]
    fn test_arrowhead_follows_right_cardinality() {
        assert_eq!(Relationship::new("a", "b", "1", "N").arrowhead(), "crow");
        assert_eq!(Relationship::new("a", "b", "1", "1").arrowhead(), "none");
    }

    #[test]
    fn test_schema_edges_show_cardinality_only() {
        let mut g = Digraph::new("ER");
        model().add_to(&mut g, ErStyle::Schema, true);
        assert_eq!(g.nodes.len(), 2);
        assert_eq!(g.edges.len(), 2);
        assert_eq!(g.edges[0].attrs.get("label"), Some("1:N"));
        assert_eq!(g.edges[1].attrs.get("arrowhead"), Some("none"));
    }

    #[test]
    fn test_presentation_edges_prefix_role() {
        let mut g = Digraph::new("ER");
        model().add_to(&mut g, ErStyle::Presentation, false);
        assert!(g.nodes.is_empty());
        assert_eq!(g.edges[0].attrs.get("label"), Some("assigned\n1:N"));
    }

    #[test]
    fn test_label_styles() {
        let m = model();
        let schema = m.entities[0].label(ErStyle::Schema).to_html();
        assert!(schema
            .contains("<TD ALIGN=\"LEFT\"><U>id</U></TD><TD ALIGN=\"LEFT\">UUID (PK)</TD>"));
        assert!(schema.contains("BGCOLOR=\"#E8F4FD\""));
        let presentation = m.entities[1].label(ErStyle::Presentation).to_html();
        assert!(presentation.contains("<B><U>id (UUID)</U></B>"));
        assert!(presentation.contains("<I>projectId</I>"));
        assert!(presentation.contains("CELLPADDING=\"6\""));
    }
}
