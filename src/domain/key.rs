use std::fmt;

/// The fixed set of entity kinds a migration reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Milestone,
    Label,
    Issue,
    Project,
    ProjectColumn,
    ProjectCard,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Milestone => "milestone",
            EntityKind::Label => "label",
            EntityKind::Issue => "issue",
            EntityKind::Project => "project",
            EntityKind::ProjectColumn => "project_column",
            EntityKind::ProjectCard => "project_card",
        }
    }

    /// Plural form used in log lines and error messages.
    pub fn plural(&self) -> &'static str {
        match self {
            EntityKind::Milestone => "milestones",
            EntityKind::Label => "labels",
            EntityKind::Issue => "issues",
            EntityKind::Project => "projects",
            EntityKind::ProjectColumn => "project columns",
            EntityKind::ProjectCard => "project cards",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Natural identity of an entity: its kind plus the identifier that is
/// stable across hosting instances (title, name, or number).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    kind: EntityKind,
    natural_id: String,
}

impl Key {
    pub fn new(kind: EntityKind, natural_id: impl Into<String>) -> Self {
        Self {
            kind,
            natural_id: natural_id.into(),
        }
    }

    /// Exact, case-sensitive comparison. An absent key matches nothing,
    /// including another absent key.
    pub fn matches(lhs: Option<&Key>, rhs: Option<&Key>) -> bool {
        match (lhs, rhs) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.natural_id)
    }
}
