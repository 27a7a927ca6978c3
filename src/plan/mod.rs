pub mod action;
pub mod builder;
pub mod executor;

pub use action::Action;
pub use builder::{MigrationPlan, PlanBuilder, SkippedCard};
pub use executor::{ExecutionReport, Executor};

use tracing::info;

use crate::domain::UserAliasResolver;
use crate::error::MigrationError;
use crate::model::Repository;
use crate::providers::{RepoReader, RepoWriter};

/// Entry point tying snapshot readers, plan building and execution together.
pub struct Migrator<'a> {
    source: &'a dyn RepoReader,
    target: &'a dyn RepoReader,
    writer: &'a dyn RepoWriter,
    resolver: UserAliasResolver,
    executor: Executor,
}

impl<'a> Migrator<'a> {
    pub fn new(
        source: &'a dyn RepoReader,
        target: &'a dyn RepoReader,
        writer: &'a dyn RepoWriter,
        resolver: UserAliasResolver,
        executor: Executor,
    ) -> Self {
        Self {
            source,
            target,
            writer,
            resolver,
            executor,
        }
    }

    pub async fn plan(
        &self,
        source_repo: &Repository,
        target_repo: &Repository,
    ) -> Result<MigrationPlan, MigrationError> {
        PlanBuilder::new(self.source, self.target, &self.resolver, source_repo, target_repo)
            .build()
            .await
    }

    /// Builds the whole plan, then executes it. Nothing runs if planning fails.
    pub async fn migrate(
        &self,
        source_repo: &Repository,
        target_repo: &Repository,
    ) -> Result<ExecutionReport, MigrationError> {
        info!(source = %source_repo, target = %target_repo, "starting migration");
        let plan = self.plan(source_repo, target_repo).await?;
        let report = self.executor.execute(self.writer, &plan.actions).await?;
        info!(executed = report.executed, pauses = report.pauses, "migration finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests;
