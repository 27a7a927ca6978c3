use tracing::{debug, info, warn};

use super::action::Action;
use crate::domain::issue::{
    close_issue_request, create_issue_request, mark_migrated_request, reference_comment,
};
use crate::domain::label::{create_label_request, update_label_request};
use crate::domain::milestone::milestone_request;
use crate::domain::project::{card_request, column_request, project_request};
use crate::domain::{op_list, EntityKind, IssueIdentityMap, OpKind, UserAliasResolver};
use crate::error::{MigrationError, Side};
use crate::model::{Project, ProjectColumn, Repository};
use crate::providers::RepoReader;

/// Ordered actions for one source/target pair.
#[derive(Debug, Default)]
pub struct MigrationPlan {
    pub actions: Vec<Action>,
    /// Issue cards whose content URL could not be turned into an issue number.
    pub skipped_cards: Vec<SkippedCard>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCard {
    pub card_id: u64,
    pub content_url: Option<String>,
}

impl MigrationPlan {
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Builds the plan stage by stage: milestones, labels, issues, then projects
/// with their columns and cards. Issues run before projects because cards
/// resolve issue references through the identity map the issue stage fills.
pub struct PlanBuilder<'a> {
    source: &'a dyn RepoReader,
    target: &'a dyn RepoReader,
    resolver: &'a UserAliasResolver,
    source_repo: &'a Repository,
    target_repo: &'a Repository,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(
        source: &'a dyn RepoReader,
        target: &'a dyn RepoReader,
        resolver: &'a UserAliasResolver,
        source_repo: &'a Repository,
        target_repo: &'a Repository,
    ) -> Self {
        Self {
            source,
            target,
            resolver,
            source_repo,
            target_repo,
        }
    }

    pub async fn build(&self) -> Result<MigrationPlan, MigrationError> {
        let mut plan = MigrationPlan::default();
        let mut issues = IssueIdentityMap::new();

        self.milestone_stage(&mut plan).await?;
        self.label_stage(&mut plan).await?;
        self.issue_stage(&mut plan, &mut issues).await?;
        self.project_stage(&mut plan, &issues).await?;

        info!(
            actions = plan.actions.len(),
            skipped_cards = plan.skipped_cards.len(),
            "migration plan built"
        );
        Ok(plan)
    }

    async fn milestone_stage(&self, plan: &mut MigrationPlan) -> Result<(), MigrationError> {
        let kind = EntityKind::Milestone;
        let source = self
            .source
            .list_milestones(self.source_repo)
            .await
            .map_err(|e| MigrationError::fetch(kind, Side::Source, self.source_repo, e))?;
        let target = self
            .target
            .list_milestones(self.target_repo)
            .await
            .map_err(|e| MigrationError::fetch(kind, Side::Target, self.target_repo, e))?;

        let before = plan.actions.len();
        for op in op_list(&source, &target) {
            let milestone = milestone_request(op.source);
            plan.actions.push(match (op.kind, op.target) {
                // Matched by title; numbering differs between instances.
                (OpKind::Update, Some(existing)) => Action::UpdateMilestone {
                    repo: self.target_repo.clone(),
                    number: existing.number,
                    milestone,
                },
                _ => Action::CreateMilestone {
                    repo: self.target_repo.clone(),
                    milestone,
                },
            });
        }
        log_stage(kind, source.len(), target.len(), plan.actions.len() - before);
        Ok(())
    }

    async fn label_stage(&self, plan: &mut MigrationPlan) -> Result<(), MigrationError> {
        let kind = EntityKind::Label;
        let source = self
            .source
            .list_labels(self.source_repo)
            .await
            .map_err(|e| MigrationError::fetch(kind, Side::Source, self.source_repo, e))?;
        let target = self
            .target
            .list_labels(self.target_repo)
            .await
            .map_err(|e| MigrationError::fetch(kind, Side::Target, self.target_repo, e))?;

        let before = plan.actions.len();
        for op in op_list(&source, &target) {
            plan.actions.push(match op.kind {
                OpKind::Update => Action::UpdateLabel {
                    repo: self.target_repo.clone(),
                    name: op.source.name.clone(),
                    label: update_label_request(op.source),
                },
                _ => Action::CreateLabel {
                    repo: self.target_repo.clone(),
                    label: create_label_request(op.source),
                },
            });
        }
        log_stage(kind, source.len(), target.len(), plan.actions.len() - before);
        Ok(())
    }

    async fn issue_stage(
        &self,
        plan: &mut MigrationPlan,
        issues: &mut IssueIdentityMap,
    ) -> Result<(), MigrationError> {
        let kind = EntityKind::Issue;
        let source = self
            .source
            .list_issues(self.source_repo)
            .await
            .map_err(|e| MigrationError::fetch(kind, Side::Source, self.source_repo, e))?;
        let target = self
            .target
            .list_issues(self.target_repo)
            .await
            .map_err(|e| MigrationError::fetch(kind, Side::Target, self.target_repo, e))?;
        issues.record_all(&target);
        debug!(mapped = issues.len(), "issue identity map filled");

        let before = plan.actions.len();
        for op in op_list(&source, &target) {
            let number = op.source.number;
            match op.kind {
                OpKind::Update => {
                    plan.actions.push(Action::CreateIssueComment {
                        repo: self.target_repo.clone(),
                        number,
                        comment: reference_comment(op.source, self.source_repo),
                    });
                    plan.actions.push(Action::UpdateIssue {
                        repo: self.target_repo.clone(),
                        number,
                        issue: mark_migrated_request(op.source, self.resolver),
                    });
                }
                _ => {
                    plan.actions.push(Action::CreateIssue {
                        repo: self.target_repo.clone(),
                        issue: create_issue_request(op.source, self.source_repo, self.resolver),
                    });
                    if let Some(issue) = close_issue_request(op.source) {
                        plan.actions.push(Action::UpdateIssue {
                            repo: self.target_repo.clone(),
                            number,
                            issue,
                        });
                    }
                }
            }
        }
        log_stage(kind, source.len(), target.len(), plan.actions.len() - before);
        Ok(())
    }

    async fn project_stage(
        &self,
        plan: &mut MigrationPlan,
        issues: &IssueIdentityMap,
    ) -> Result<(), MigrationError> {
        let kind = EntityKind::Project;
        let source = self
            .source
            .list_projects(self.source_repo)
            .await
            .map_err(|e| MigrationError::fetch(kind, Side::Source, self.source_repo, e))?;
        let target = self
            .target
            .list_projects(self.target_repo)
            .await
            .map_err(|e| MigrationError::fetch(kind, Side::Target, self.target_repo, e))?;

        let mut created = 0;
        for op in op_list(&source, &target) {
            match (op.kind, op.target) {
                (OpKind::Update, Some(target_project)) => {
                    self.column_stage(plan, op.source, target_project, issues).await?;
                }
                _ => {
                    plan.actions.push(Action::CreateProject {
                        repo: self.target_repo.clone(),
                        project: project_request(op.source),
                    });
                    created += 1;
                }
            }
        }
        log_stage(kind, source.len(), target.len(), created);
        Ok(())
    }

    async fn column_stage(
        &self,
        plan: &mut MigrationPlan,
        source_project: &Project,
        target_project: &Project,
        issues: &IssueIdentityMap,
    ) -> Result<(), MigrationError> {
        let kind = EntityKind::ProjectColumn;
        let source = self
            .source
            .list_project_columns(source_project.id)
            .await
            .map_err(|e| {
                let scope = format!("{} project id={}", self.source_repo, source_project.id);
                MigrationError::fetch(kind, Side::Source, scope, e)
            })?;
        let target = self
            .target
            .list_project_columns(target_project.id)
            .await
            .map_err(|e| {
                let scope = format!("{} project id={}", self.target_repo, target_project.id);
                MigrationError::fetch(kind, Side::Target, scope, e)
            })?;

        let mut created = 0;
        for op in op_list(&source, &target) {
            match (op.kind, op.target) {
                (OpKind::Update, Some(target_column)) => {
                    self.card_stage(plan, op.source, target_column, issues).await?;
                }
                _ => {
                    plan.actions.push(Action::CreateProjectColumn {
                        project_id: target_project.id,
                        column: column_request(op.source),
                    });
                    created += 1;
                }
            }
        }
        debug!(project = %source_project.name, "project columns reconciled");
        log_stage(kind, source.len(), target.len(), created);
        Ok(())
    }

    async fn card_stage(
        &self,
        plan: &mut MigrationPlan,
        source_column: &ProjectColumn,
        target_column: &ProjectColumn,
        issues: &IssueIdentityMap,
    ) -> Result<(), MigrationError> {
        let kind = EntityKind::ProjectCard;
        let source = self
            .source
            .list_project_cards(source_column.id)
            .await
            .map_err(|e| {
                let scope = format!("{} column id={}", self.source_repo, source_column.id);
                MigrationError::fetch(kind, Side::Source, scope, e)
            })?;
        let target = self
            .target
            .list_project_cards(target_column.id)
            .await
            .map_err(|e| {
                let scope = format!("{} column id={}", self.target_repo, target_column.id);
                MigrationError::fetch(kind, Side::Target, scope, e)
            })?;
        debug!(column = %source_column.name, "project cards fetched");

        let before = plan.actions.len();
        for op in op_list(&source, &target) {
            if op.kind != OpKind::Create {
                continue;
            }
            match card_request(op.source, issues)? {
                Some(card) => plan.actions.push(Action::CreateProjectCard {
                    column_id: target_column.id,
                    card,
                }),
                None => {
                    warn!(
                        card_id = op.source.id,
                        content_url = op.source.content_url.as_deref().unwrap_or(""),
                        "card has invalid content URL, skipping"
                    );
                    plan.skipped_cards.push(SkippedCard {
                        card_id: op.source.id,
                        content_url: op.source.content_url.clone(),
                    });
                }
            }
        }
        log_stage(kind, source.len(), target.len(), plan.actions.len() - before);
        Ok(())
    }
}

fn log_stage(kind: EntityKind, source: usize, target: usize, actions: usize) {
    info!(kind = kind.as_str(), source, target, actions, "stage planned");
}
