use super::alias::UserAliasResolver;
use super::key::EntityKind;
use super::reconcile::Reconcilable;
use crate::model::request::{IssueCommentRequest, IssueRequest};
use crate::model::{Issue, Repository};

/// Label put on target issues once they have been reconciled, so later runs
/// leave them alone.
pub const MIGRATED_LABEL: &str = "migrated";

impl Reconcilable for Issue {
    const KIND: EntityKind = EntityKind::Issue;

    fn natural_id(&self) -> String {
        self.number.to_string()
    }

    fn same_content(&self, other: &Self) -> bool {
        self.title == other.title
            && normalized_assignees(self) == normalized_assignees(other)
            && normalized_labels(self) == normalized_labels(other)
    }

    fn already_migrated(&self) -> bool {
        self.labels.iter().any(|l| l.name == MIGRATED_LABEL)
    }
}

fn normalized_assignees(issue: &Issue) -> String {
    let mut logins: Vec<&str> = issue.assignees.iter().map(|u| u.login.as_str()).collect();
    logins.sort_unstable();
    logins.join(",")
}

fn normalized_labels(issue: &Issue) -> String {
    let mut names: Vec<&str> = issue.labels.iter().map(|l| l.name.as_str()).collect();
    names.sort_unstable();
    names.join(",")
}

pub fn import_note(issue: &Issue, source_repo: &Repository) -> String {
    format!(
        "This issue or P-R imported from {} in previous repository ({})",
        issue.html_url, source_repo
    )
}

pub fn reference_note(issue: &Issue, source_repo: &Repository) -> String {
    format!(
        "This issue or P-R referenced as {} in previous repository ({})",
        issue.html_url, source_repo
    )
}

pub fn create_issue_request(
    issue: &Issue,
    source_repo: &Repository,
    resolver: &UserAliasResolver,
) -> IssueRequest {
    IssueRequest {
        title: Some(issue.title.clone()),
        body: Some(import_note(issue, source_repo)),
        state: None,
        assignees: Some(resolver.target_assignees(&issue.assignees)),
        labels: Some(issue.label_names()),
        milestone: issue.milestone.as_ref().map(|m| m.number),
    }
}

/// Follow-up edit for closed issues; creation cannot set the state.
pub fn close_issue_request(issue: &Issue) -> Option<IssueRequest> {
    if !issue.is_closed() {
        return None;
    }
    Some(IssueRequest {
        state: Some(issue.state.clone()),
        ..Default::default()
    })
}

pub fn reference_comment(issue: &Issue, source_repo: &Repository) -> IssueCommentRequest {
    IssueCommentRequest {
        body: reference_note(issue, source_repo),
    }
}

/// Edit applied to an existing target issue: source assignees and labels plus
/// the migrated marker.
pub fn mark_migrated_request(issue: &Issue, resolver: &UserAliasResolver) -> IssueRequest {
    let mut labels = vec![MIGRATED_LABEL.to_string()];
    labels.extend(issue.label_names());
    IssueRequest {
        assignees: Some(resolver.target_assignees(&issue.assignees)),
        labels: Some(labels),
        ..Default::default()
    }
}
