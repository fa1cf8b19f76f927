//! Entity-relationship diagrams of the project management schema

use crate::core::diagram::er::{Entity, ErModel, ErStyle, Relationship};
use crate::core::diagram::graph::Digraph;
use crate::core::diagram::label::{HtmlCell, HtmlTable, HtmlText};

/// Every table of the schema with its column types
#[must_use]
pub fn schema_model() -> ErModel {
    let entities = vec![
        Entity::typed(
            "User",
            "#2196F3",
            "#E8F4FD",
            &[
                ("*id", "UUID (PK)"),
                ("email", "String (unique)"),
                ("passwordHash", "String"),
                ("fullName", "String"),
                ("role", "UserRole"),
                ("avatarUrl", "String?"),
                ("isActive", "Boolean"),
                ("createdAt", "DateTime"),
                ("updatedAt", "DateTime"),
                ("lastLoginAt", "DateTime?"),
                ("deletedAt", "DateTime?"),
            ],
        ),
        Entity::typed(
            "Session",
            "#FF9800",
            "#FFF3E0",
            &[
                ("*id", "UUID (PK)"),
                ("userId", "UUID (FK)"),
                ("userAgent", "String?"),
                ("ip", "String?"),
                ("createdAt", "DateTime"),
                ("expiresAt", "DateTime"),
                ("revoked", "Boolean"),
            ],
        ),
        Entity::typed(
            "Project",
            "#4CAF50",
            "#E8F5E9",
            &[
                ("*id", "UUID (PK)"),
                ("title", "String"),
                ("description", "String?"),
                ("courseCode", "String?"),
                ("courseId", "UUID? (FK)"),
                ("projectType", "ProjectType"),
                ("teamLeaderId", "UUID (FK)"),
                ("status", "ProjectStatus"),
                ("deadlineDate", "DateTime?"),
                ("createdAt", "DateTime"),
                ("updatedAt", "DateTime"),
                ("deletedAt", "DateTime?"),
            ],
        ),
        Entity::typed(
            "ProjectUser",
            "#E91E63",
            "#FCE4EC",
            &[
                ("*id", "UUID (PK)"),
                ("projectId", "UUID (FK)"),
                ("userId", "UUID (FK)"),
                ("role", "UserRole"),
                ("invitedById", "UUID? (FK)"),
                ("inviteStatus", "InviteStatus"),
                ("joinedAt", "DateTime?"),
            ],
        ),
        Entity::typed(
            "Task",
            "#9C27B0",
            "#F3E5F5",
            &[
                ("*id", "UUID (PK)"),
                ("projectId", "UUID (FK)"),
                ("title", "String"),
                ("description", "String?"),
                ("priority", "TaskPriority"),
                ("status", "TaskStatus"),
                ("assigneeId", "UUID? (FK)"),
                ("ordinal", "Int"),
                ("createdById", "UUID (FK)"),
                ("dueDate", "DateTime?"),
                ("isDeleted", "Boolean"),
            ],
        ),
        Entity::typed(
            "TaskHistory",
            "#673AB7",
            "#EDE7F6",
            &[
                ("*id", "UUID (PK)"),
                ("taskId", "UUID (FK)"),
                ("changedById", "UUID (FK)"),
                ("previousStatus", "TaskStatus?"),
                ("newStatus", "TaskStatus?"),
                ("previousAssignee", "String?"),
                ("newAssignee", "String?"),
                ("comment", "String?"),
                ("createdAt", "DateTime"),
            ],
        ),
        Entity::typed(
            "File",
            "#00BCD4",
            "#E0F7FA",
            &[
                ("*id", "UUID (PK)"),
                ("taskId", "UUID (FK)"),
                ("uploadedBy", "UUID (FK)"),
                ("filename", "String"),
                ("s3Key", "String?"),
                ("sizeBytes", "BigInt"),
                ("mimeType", "String?"),
                ("createdAt", "DateTime"),
            ],
        ),
        Entity::typed(
            "Comment",
            "#009688",
            "#E0F2F1",
            &[
                ("*id", "UUID (PK)"),
                ("taskId", "UUID (FK)"),
                ("authorId", "UUID (FK)"),
                ("content", "String"),
                ("createdAt", "DateTime"),
                ("updatedAt", "DateTime"),
            ],
        ),
        Entity::typed(
            "ActivityLog",
            "#607D8B",
            "#ECEFF1",
            &[
                ("*id", "UUID (PK)"),
                ("userId", "UUID (FK)"),
                ("action", "String"),
                ("resourceType", "String?"),
                ("resourceId", "String?"),
                ("details", "Json?"),
                ("createdAt", "DateTime"),
            ],
        ),
        Entity::typed(
            "Notification",
            "#FFC107",
            "#FFF8E1",
            &[
                ("*id", "UUID (PK)"),
                ("userId", "UUID (FK)"),
                ("type", "NotificationType"),
                ("title", "String"),
                ("message", "String"),
                ("isRead", "Boolean"),
                ("projectId", "UUID? (FK)"),
                ("taskId", "UUID? (FK)"),
                ("actorId", "UUID? (FK)"),
                ("metadata", "Json?"),
                ("createdAt", "DateTime"),
                ("readAt", "DateTime?"),
            ],
        )
        .header_font("black"),
        Entity::typed(
            "Course",
            "#F44336",
            "#FFEBEE",
            &[
                ("*id", "UUID (PK)"),
                ("title", "String"),
                ("code", "String (unique)"),
                ("description", "String?"),
                ("semester", "String"),
                ("year", "Int"),
                ("professorId", "UUID (FK)"),
                ("isActive", "Boolean"),
                ("createdAt", "DateTime"),
                ("updatedAt", "DateTime"),
            ],
        ),
        Entity::typed(
            "CourseEnrollment",
            "#D32F2F",
            "#FFCDD2",
            &[
                ("*id", "UUID (PK)"),
                ("courseId", "UUID (FK)"),
                ("studentId", "UUID (FK)"),
                ("enrolledAt", "DateTime"),
            ],
        ),
        Entity::typed(
            "ProjectGrade",
            "#388E3C",
            "#C8E6C9",
            &[
                ("*id", "UUID (PK)"),
                ("projectId", "UUID (FK, unique)"),
                ("professorId", "UUID (FK)"),
                ("gradeType", "GradeType"),
                ("numericGrade", "Int?"),
                ("letterGrade", "String?"),
                ("feedback", "String?"),
                ("gradedAt", "DateTime"),
                ("updatedAt", "DateTime"),
            ],
        ),
        Entity::typed(
            "FinalSubmission",
            "#689F38",
            "#DCEDC8",
            &[
                ("*id", "UUID (PK)"),
                ("projectId", "UUID (FK, unique)"),
                ("description", "String"),
                ("status", "SubmissionStatus"),
                ("submittedAt", "DateTime?"),
                ("submittedById", "UUID? (FK)"),
                ("reviewedAt", "DateTime?"),
                ("reviewedById", "UUID? (FK)"),
                ("reviewComment", "String?"),
            ],
        ),
        Entity::typed(
            "FinalSubmissionFile",
            "#AFB42B",
            "#F0F4C3",
            &[
                ("*id", "UUID (PK)"),
                ("submissionId", "UUID (FK)"),
                ("filename", "String"),
                ("filepath", "String"),
                ("sizeBytes", "BigInt"),
                ("mimeType", "String?"),
                ("uploadedBy", "UUID (FK)"),
                ("createdAt", "DateTime"),
            ],
        ),
        Entity::typed(
            "ProjectReview",
            "#00796B",
            "#B2DFDB",
            &[
                ("*id", "UUID (PK)"),
                ("projectId", "UUID (FK)"),
                ("professorId", "UUID (FK)"),
                ("content", "String"),
                ("createdAt", "DateTime"),
                ("updatedAt", "DateTime"),
            ],
        ),
        Entity::typed(
            "Announcement",
            "#0288D1",
            "#B3E5FC",
            &[
                ("*id", "UUID (PK)"),
                ("courseId", "UUID (FK)"),
                ("professorId", "UUID (FK)"),
                ("title", "String"),
                ("content", "String"),
                ("isPinned", "Boolean"),
                ("createdAt", "DateTime"),
                ("updatedAt", "DateTime"),
            ],
        ),
    ];

    let relationships = [
        ("User", "Session", "1", "N", "has"),
        ("User", "Project", "1", "N", "leads"),
        ("User", "ProjectUser", "1", "N", "member"),
        ("User", "ProjectUser", "1", "N", "invites"),
        ("User", "Task", "1", "N", "assigned"),
        ("User", "Task", "1", "N", "creates"),
        ("User", "TaskHistory", "1", "N", "changes"),
        ("User", "File", "1", "N", "uploads"),
        ("User", "Comment", "1", "N", "authors"),
        ("User", "ActivityLog", "1", "N", "logs"),
        ("User", "Notification", "1", "N", "receives"),
        ("User", "Course", "1", "N", "teaches"),
        ("User", "CourseEnrollment", "1", "N", "enrolls"),
        ("User", "ProjectGrade", "1", "N", "grades"),
        ("User", "FinalSubmission", "1", "N", "submits"),
        ("User", "FinalSubmission", "1", "N", "reviews"),
        ("User", "ProjectReview", "1", "N", "writes"),
        ("User", "Announcement", "1", "N", "posts"),
        ("User", "FinalSubmissionFile", "1", "N", "uploads"),
        ("Project", "ProjectUser", "1", "N", "has"),
        ("Project", "Task", "1", "N", "contains"),
        ("Project", "Notification", "1", "N", "triggers"),
        ("Project", "ProjectGrade", "1", "1", "graded"),
        ("Project", "FinalSubmission", "1", "1", "submission"),
        ("Project", "ProjectReview", "1", "N", "reviewed"),
        ("Course", "Project", "1", "N", "has"),
        ("Course", "CourseEnrollment", "1", "N", "enrollments"),
        ("Course", "Announcement", "1", "N", "announcements"),
        ("Task", "TaskHistory", "1", "N", "history"),
        ("Task", "File", "1", "N", "attachments"),
        ("Task", "Comment", "1", "N", "comments"),
        ("Task", "Notification", "1", "N", "notifications"),
        ("FinalSubmission", "FinalSubmissionFile", "1", "N", "files"),
    ]
    .iter()
    .map(|(from, to, l, r, role)| Relationship::new(from, to, l, r).role(role))
    .collect();

    ErModel {
        entities,
        relationships,
    }
}

fn legend() -> HtmlTable {
    let mut table = HtmlTable::new()
        .border(1)
        .cellborder(0)
        .cellspacing(0)
        .bgcolor("#FAFAFA")
        .line(
            HtmlCell::new(HtmlText::new("LEGEND").bold().color("white"))
                .colspan(2)
                .bgcolor("#424242"),
        );
    let rows = [
        (HtmlText::new("PK"), "Primary Key"),
        (HtmlText::new("FK"), "Foreign Key"),
        (HtmlText::new("underline").underline(), "Primary Key field"),
        (HtmlText::new("1:N"), "One-to-Many"),
        (HtmlText::new("1:1"), "One-to-One"),
        (HtmlText::new("?"), "Nullable field"),
    ];
    for (key, meaning) in rows {
        table = table.row(vec![
            HtmlCell::new(key).align("LEFT"),
            HtmlCell::plain(meaning).align("LEFT"),
        ]);
    }
    table
}

fn title() -> HtmlTable {
    HtmlTable::new()
        .border(0)
        .cellborder(0)
        .cellspacing(0)
        .line(HtmlCell::new(
            HtmlText::new("Project Management System").bold().size(24),
        ))
        .line(HtmlCell::new(
            HtmlText::new("Entity-Relationship Diagram").size(14),
        ))
        .line(HtmlCell::new(HtmlText::new("Based on Prisma Schema").size(10)))
}

/// Full schema: every entity with column types, a legend and a title node
pub fn er_schema() -> Digraph {
    let mut g = Digraph::new("ER_Diagram");
    g.graph_attr(&[
        ("rankdir", "TB"),
        ("splines", "ortho"),
        ("nodesep", "0.8"),
        ("ranksep", "1.2"),
    ])
    .node_attr(&[("shape", "none"), ("fontname", "Arial"), ("fontsize", "10")])
    .edge_attr(&[("fontname", "Arial"), ("fontsize", "9")]);

    schema_model().add_to(&mut g, ErStyle::Schema, true);
    g.node("Legend", legend(), &[]);
    g.node("Title", title(), &[("shape", "none")]);
    g
}

/// Condensed entities for slides, grouped by domain
#[must_use]
pub fn presentation_model() -> ErModel {
    const CORE: &str = "#1976D2";
    const TASK: &str = "#7B1FA2";
    const COURSE: &str = "#C62828";
    const SYSTEM: &str = "#388E3C";

    let entities = vec![
        Entity::named(
            "User",
            CORE,
            &["*id (UUID)", "email", "fullName", "role", "avatarUrl", "isActive"],
        ),
        Entity::named(
            "Project",
            CORE,
            &[
                "*id (UUID)",
                "title",
                "description",
                "+teamLeaderId",
                "+courseId",
                "status",
                "deadlineDate",
            ],
        ),
        Entity::named(
            "ProjectUser",
            CORE,
            &["*id (UUID)", "+projectId", "+userId", "role", "inviteStatus", "joinedAt"],
        ),
        Entity::named(
            "Task",
            TASK,
            &["*id (UUID)", "+projectId", "title", "status", "priority", "+assigneeId", "dueDate"],
        ),
        Entity::named(
            "TaskHistory",
            TASK,
            &["*id (UUID)", "+taskId", "+changedById", "previousStatus", "newStatus"],
        ),
        Entity::named(
            "Comment",
            TASK,
            &["*id (UUID)", "+taskId", "+authorId", "content", "createdAt"],
        ),
        Entity::named(
            "File",
            TASK,
            &["*id (UUID)", "+taskId", "+uploadedBy", "filename", "sizeBytes"],
        ),
        Entity::named(
            "Course",
            COURSE,
            &["*id (UUID)", "title", "code", "semester", "year", "+professorId"],
        ),
        Entity::named(
            "CourseEnrollment",
            COURSE,
            &["*id (UUID)", "+courseId", "+studentId", "enrolledAt"],
        ),
        Entity::named(
            "ProjectGrade",
            COURSE,
            &["*id (UUID)", "+projectId", "+professorId", "gradeType", "numericGrade"],
        ),
        Entity::named(
            "FinalSubmission",
            COURSE,
            &["*id (UUID)", "+projectId", "status", "+submittedById", "+reviewedById"],
        ),
        Entity::named(
            "Announcement",
            COURSE,
            &["*id (UUID)", "+courseId", "+professorId", "title", "content"],
        ),
        Entity::named("Session", SYSTEM, &["*id (UUID)", "+userId", "expiresAt", "revoked"]),
        Entity::named(
            "Notification",
            SYSTEM,
            &["*id (UUID)", "+userId", "type", "title", "isRead"],
        ),
        Entity::named("ActivityLog", SYSTEM, &["*id (UUID)", "+userId", "action", "resourceType"]),
    ];

    let relationships = vec![
        Relationship::new("User", "Session", "1", "N"),
        Relationship::new("User", "Project", "1", "N").role("leads"),
        Relationship::new("User", "ProjectUser", "1", "N").role("member"),
        Relationship::new("User", "Task", "1", "N").role("assigned"),
        Relationship::new("User", "Course", "1", "N").role("teaches"),
        Relationship::new("User", "Notification", "1", "N"),
        Relationship::new("User", "ActivityLog", "1", "N"),
        Relationship::new("Project", "ProjectUser", "1", "N"),
        Relationship::new("Project", "Task", "1", "N"),
        Relationship::new("Project", "ProjectGrade", "1", "1"),
        Relationship::new("Project", "FinalSubmission", "1", "1"),
        Relationship::new("Course", "Project", "1", "N"),
        Relationship::new("Course", "CourseEnrollment", "1", "N"),
        Relationship::new("Course", "Announcement", "1", "N"),
        Relationship::new("User", "CourseEnrollment", "1", "N").role("enrolls"),
        Relationship::new("Task", "TaskHistory", "1", "N"),
        Relationship::new("Task", "Comment", "1", "N"),
        Relationship::new("Task", "File", "1", "N"),
    ];

    ErModel {
        entities,
        relationships,
    }
}

/// Vertical ER diagram with one shaded cluster per domain
pub fn er_presentation() -> Digraph {
    let mut g = Digraph::new("ER_Diagram");
    g.graph_attr(&[
        ("rankdir", "TB"),
        ("splines", "spline"),
        ("nodesep", "0.6"),
        ("ranksep", "1.0"),
        ("bgcolor", "white"),
        ("pad", "0.5"),
        ("dpi", "200"),
    ])
    .node_attr(&[("fontname", "Arial"), ("fontsize", "11")])
    .edge_attr(&[("fontname", "Arial"), ("fontsize", "9"), ("color", "#666666")]);

    let model = presentation_model();
    // (cluster, label, frame, fill, font, members)
    let domains: [(&str, &str, &str, &str, &str, &[&str]); 4] = [
        (
            "cluster_core",
            "Entitetet Kryesore",
            "#BBDEFB",
            "#E3F2FD",
            "#1565C0",
            &["User", "Project", "ProjectUser"],
        ),
        (
            "cluster_tasks",
            "Menaxhimi i Detyrave",
            "#CE93D8",
            "#F3E5F5",
            "#6A1B9A",
            &["Task", "TaskHistory", "Comment", "File"],
        ),
        (
            "cluster_course",
            "Menaxhimi i Kurseve (Profesor)",
            "#EF9A9A",
            "#FFEBEE",
            "#B71C1C",
            &["Course", "CourseEnrollment", "ProjectGrade", "FinalSubmission", "Announcement"],
        ),
        (
            "cluster_system",
            "Sistemi",
            "#A5D6A7",
            "#E8F5E9",
            "#1B5E20",
            &["Session", "Notification", "ActivityLog"],
        ),
    ];
    for (name, label, color, fill, font, members) in domains {
        g.cluster(name, |c| {
            c.attr("label", label)
                .attr("style", "rounded,filled")
                .attr("color", color)
                .attr("fillcolor", fill)
                .attr("fontname", "Arial Bold")
                .attr("fontsize", "14")
                .attr("fontcolor", font);
            model.add_entities_to(c, members, ErStyle::Presentation);
        });
    }
    model.add_to(&mut g, ErStyle::Presentation, false);
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_counts() {
        let model = schema_model();
        assert_eq!(model.entities.len(), 17);
        assert_eq!(model.relationships.len(), 33);
        // three (from, to) pairs repeat
        assert_eq!(model.unique_relationships().len(), 30);
    }

    #[test]
    fn test_er_schema_graph() {
        let g = er_schema();
        assert_eq!(g.nodes.len(), 19);
        assert_eq!(g.edges.len(), 30);
        let grade = g
            .edges
            .iter()
            .find(|e| e.from == "Project" && e.to == "ProjectGrade")
            .unwrap();
        assert_eq!(grade.attrs.get("label"), Some("1:1"));
        assert_eq!(grade.attrs.get("arrowhead"), Some("none"));
        let dot = g.to_dot();
        assert!(dot.contains("<FONT COLOR=\"black\"><B>Notification</B></FONT>"));
        assert!(dot.contains("<B>LEGEND</B>"));
    }

    #[test]
    fn test_presentation_clusters_hold_every_entity() {
        let g = er_presentation();
        assert_eq!(g.clusters.len(), 4);
        assert_eq!(g.edges.len(), 18);
        assert!(g.nodes.is_empty());
        assert_eq!(g.all_nodes().count(), presentation_model().entities.len());
        let leads = g
            .edges
            .iter()
            .find(|e| e.from == "User" && e.to == "Project")
            .unwrap();
        assert_eq!(leads.attrs.get("label"), Some("leads\n1:N"));
    }
}
