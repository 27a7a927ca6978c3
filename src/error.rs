use std::fmt;

use thiserror::Error;

use crate::domain::EntityKind;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Target => f.write_str("target"),
        }
    }
}

/// Fatal conditions of a migration run. Each aborts the run; nothing is
/// retried or rolled back.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to fetch {} from {side} repository {scope}", .kind.plural())]
    Fetch {
        kind: EntityKind,
        side: Side,
        scope: String,
        #[source]
        source: BoxError,
    },

    /// A card points at an issue the issue stage never saw on the target.
    #[error("no issue mapping found for number={number}")]
    MissingIssueMapping { number: u64 },

    #[error("failed to {action}")]
    Action {
        action: String,
        #[source]
        source: BoxError,
    },
}

impl MigrationError {
    pub fn fetch(kind: EntityKind, side: Side, scope: impl fmt::Display, err: anyhow::Error) -> Self {
        MigrationError::Fetch {
            kind,
            side,
            scope: scope.to_string(),
            source: err.into(),
        }
    }
}
