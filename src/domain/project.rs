use super::identity::IssueIdentityMap;
use super::key::EntityKind;
use super::reconcile::{MatchPolicy, Reconcilable};
use crate::error::MigrationError;
use crate::model::request::{ProjectCardRequest, ProjectColumnRequest, ProjectRequest};
use crate::model::{Project, ProjectCard, ProjectColumn};

const ISSUES_SEGMENT: &str = "/issues/";

/// A same-name project is never edited; matching it means "reconcile its columns".
impl Reconcilable for Project {
    const KIND: EntityKind = EntityKind::Project;
    const ON_MATCH: MatchPolicy = MatchPolicy::Descend;

    fn natural_id(&self) -> String {
        self.name.clone()
    }

    fn same_content(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// A same-name column is never edited; matching it means "reconcile its cards".
impl Reconcilable for ProjectColumn {
    const KIND: EntityKind = EntityKind::ProjectColumn;
    const ON_MATCH: MatchPolicy = MatchPolicy::Descend;

    fn natural_id(&self) -> String {
        self.name.clone()
    }

    fn same_content(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Cards are only ever created.
impl Reconcilable for ProjectCard {
    const KIND: EntityKind = EntityKind::ProjectCard;
    const ON_MATCH: MatchPolicy = MatchPolicy::Keep;

    fn natural_id(&self) -> String {
        self.id.to_string()
    }

    fn same_content(&self, other: &Self) -> bool {
        self.archived == other.archived && self.note == other.note
    }
}

pub fn project_request(source: &Project) -> ProjectRequest {
    ProjectRequest {
        name: source.name.clone(),
        body: source.body.clone(),
    }
}

pub fn column_request(source: &ProjectColumn) -> ProjectColumnRequest {
    ProjectColumnRequest {
        name: source.name.clone(),
    }
}

/// Issue number referenced by a card's content URL, e.g. `.../issues/42`.
pub fn issue_number_from_content_url(url: &str) -> Option<u64> {
    let offset = url.find(ISSUES_SEGMENT)? + ISSUES_SEGMENT.len();
    url[offset..].parse().ok()
}

/// Builds the create body for a card.
///
/// Note cards carry their note. Issue cards are resolved through the issue
/// identity map; `Ok(None)` means the content URL is missing or malformed
/// and the card should be skipped.
pub fn card_request(
    card: &ProjectCard,
    issues: &IssueIdentityMap,
) -> Result<Option<ProjectCardRequest>, MigrationError> {
    if let Some(note) = card.note_text() {
        return Ok(Some(ProjectCardRequest::note(note)));
    }
    let Some(number) = card.content_url.as_deref().and_then(issue_number_from_content_url) else {
        return Ok(None);
    };
    let id = issues
        .get(number)
        .ok_or(MigrationError::MissingIssueMapping { number })?;
    Ok(Some(ProjectCardRequest::issue(id)))
}
