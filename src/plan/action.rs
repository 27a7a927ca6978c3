use std::fmt;

use anyhow::Result;

use crate::model::request::{
    IssueCommentRequest, IssueRequest, LabelRequest, MilestoneRequest, ProjectCardRequest,
    ProjectColumnRequest, ProjectRequest,
};
use crate::model::Repository;
use crate::providers::RepoWriter;

/// One remote mutation against the target, with its fully built payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CreateMilestone {
        repo: Repository,
        milestone: MilestoneRequest,
    },
    UpdateMilestone {
        repo: Repository,
        number: u64,
        milestone: MilestoneRequest,
    },
    CreateLabel {
        repo: Repository,
        label: LabelRequest,
    },
    UpdateLabel {
        repo: Repository,
        name: String,
        label: LabelRequest,
    },
    CreateIssue {
        repo: Repository,
        issue: IssueRequest,
    },
    UpdateIssue {
        repo: Repository,
        number: u64,
        issue: IssueRequest,
    },
    CreateIssueComment {
        repo: Repository,
        number: u64,
        comment: IssueCommentRequest,
    },
    CreateProject {
        repo: Repository,
        project: ProjectRequest,
    },
    CreateProjectColumn {
        project_id: u64,
        column: ProjectColumnRequest,
    },
    CreateProjectCard {
        column_id: u64,
        card: ProjectCardRequest,
    },
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::CreateMilestone { .. } => "create_milestone",
            Action::UpdateMilestone { .. } => "update_milestone",
            Action::CreateLabel { .. } => "create_label",
            Action::UpdateLabel { .. } => "update_label",
            Action::CreateIssue { .. } => "create_issue",
            Action::UpdateIssue { .. } => "update_issue",
            Action::CreateIssueComment { .. } => "create_issue_comment",
            Action::CreateProject { .. } => "create_project",
            Action::CreateProjectColumn { .. } => "create_project_column",
            Action::CreateProjectCard { .. } => "create_project_card",
        }
    }

    pub async fn apply<W: RepoWriter + ?Sized>(&self, writer: &W) -> Result<()> {
        match self {
            Action::CreateMilestone { repo, milestone } => writer.create_milestone(repo, milestone).await,
            Action::UpdateMilestone {
                repo,
                number,
                milestone,
            } => writer.update_milestone(repo, *number, milestone).await,
            Action::CreateLabel { repo, label } => writer.create_label(repo, label).await,
            Action::UpdateLabel { repo, name, label } => writer.update_label(repo, name, label).await,
            Action::CreateIssue { repo, issue } => writer.create_issue(repo, issue).await,
            Action::UpdateIssue { repo, number, issue } => writer.update_issue(repo, *number, issue).await,
            Action::CreateIssueComment {
                repo,
                number,
                comment,
            } => writer.create_issue_comment(repo, *number, comment).await,
            Action::CreateProject { repo, project } => writer.create_project(repo, project).await,
            Action::CreateProjectColumn { project_id, column } => {
                writer.create_project_column(*project_id, column).await
            }
            Action::CreateProjectCard { column_id, card } => writer.create_project_card(*column_id, card).await,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::CreateMilestone { repo, milestone } => {
                write!(f, "create milestone {:?} on {repo}", milestone.title)
            }
            Action::UpdateMilestone {
                repo,
                number,
                milestone,
            } => write!(f, "update milestone {:?} (number={number}) on {repo}", milestone.title),
            Action::CreateLabel { repo, label } => {
                write!(f, "create label {:?} on {repo}", label.name.as_deref().unwrap_or_default())
            }
            Action::UpdateLabel { repo, name, .. } => write!(f, "update label {name:?} on {repo}"),
            Action::CreateIssue { repo, issue } => {
                write!(f, "create issue {:?} on {repo}", issue.title.as_deref().unwrap_or_default())
            }
            Action::UpdateIssue { repo, number, issue } => {
                write!(f, "update issue {repo}#{number}")?;
                if let Some(state) = &issue.state {
                    write!(f, " state={state}")?;
                }
                if let Some(labels) = &issue.labels {
                    write!(f, " labels=[{}]", labels.join(", "))?;
                }
                if let Some(assignees) = &issue.assignees {
                    write!(f, " assignees=[{}]", assignees.join(", "))?;
                }
                Ok(())
            }
            Action::CreateIssueComment { repo, number, .. } => {
                write!(f, "create issue comment on {repo}#{number}")
            }
            Action::CreateProject { repo, project } => {
                write!(f, "create project {:?} on {repo}", project.name)
            }
            Action::CreateProjectColumn { project_id, column } => {
                write!(f, "create project column {:?} on project id={project_id}", column.name)
            }
            Action::CreateProjectCard { column_id, card } => match card.content_id {
                Some(content_id) => write!(
                    f,
                    "create project card for issue id={content_id} on column id={column_id}"
                ),
                None => write!(f, "create note card on column id={column_id}"),
            },
        }
    }
}
