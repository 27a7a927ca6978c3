pub mod cache;
pub mod github;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::request::{
    IssueCommentRequest, IssueRequest, LabelRequest, MilestoneRequest, ProjectCardRequest,
    ProjectColumnRequest, ProjectRequest,
};
use crate::model::{Issue, Label, Milestone, Project, ProjectCard, ProjectColumn, Repository};

/// Snapshot listings of one repository side. Every call returns the fully
/// paginated list.
#[async_trait]
pub trait RepoReader: Send + Sync {
    async fn list_milestones(&self, repo: &Repository) -> Result<Vec<Milestone>>;
    async fn list_labels(&self, repo: &Repository) -> Result<Vec<Label>>;
    async fn list_issues(&self, repo: &Repository) -> Result<Vec<Issue>>;
    async fn list_projects(&self, repo: &Repository) -> Result<Vec<Project>>;
    async fn list_project_columns(&self, project_id: u64) -> Result<Vec<ProjectColumn>>;
    async fn list_project_cards(&self, column_id: u64) -> Result<Vec<ProjectCard>>;
}

/// Remote mutations applied to the target side, one per action kind.
#[async_trait]
pub trait RepoWriter: Send + Sync {
    async fn create_milestone(&self, repo: &Repository, milestone: &MilestoneRequest) -> Result<()>;
    async fn update_milestone(
        &self,
        repo: &Repository,
        number: u64,
        milestone: &MilestoneRequest,
    ) -> Result<()>;
    async fn create_label(&self, repo: &Repository, label: &LabelRequest) -> Result<()>;
    async fn update_label(&self, repo: &Repository, name: &str, label: &LabelRequest) -> Result<()>;
    async fn create_issue(&self, repo: &Repository, issue: &IssueRequest) -> Result<()>;
    async fn update_issue(&self, repo: &Repository, number: u64, issue: &IssueRequest) -> Result<()>;
    async fn create_issue_comment(
        &self,
        repo: &Repository,
        number: u64,
        comment: &IssueCommentRequest,
    ) -> Result<()>;
    async fn create_project(&self, repo: &Repository, project: &ProjectRequest) -> Result<()>;
    async fn create_project_column(&self, project_id: u64, column: &ProjectColumnRequest) -> Result<()>;
    async fn create_project_card(&self, column_id: u64, card: &ProjectCardRequest) -> Result<()>;
}
