use std::time::Duration;

use tracing::{debug, info};

use super::action::Action;
use crate::config::RateLimitConfig;
use crate::error::MigrationError;
use crate::providers::RepoWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecutionReport {
    pub executed: usize,
    pub pauses: usize,
}

/// Runs actions one at a time, pausing after every full batch.
#[derive(Debug, Clone)]
pub struct Executor {
    batch_size: usize,
    cool_down: Duration,
}

impl Executor {
    pub fn new(batch_size: usize, cool_down: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            cool_down,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.batch_size, config.cool_down())
    }

    /// Stops at the first failing action. Actions already applied stay applied.
    pub async fn execute<W: RepoWriter + ?Sized>(
        &self,
        writer: &W,
        actions: &[Action],
    ) -> Result<ExecutionReport, MigrationError> {
        let mut report = ExecutionReport::default();
        let mut in_batch = 0;
        for action in actions {
            info!(
                step = report.executed + 1,
                total = actions.len(),
                action = action.as_str(),
                "{action}"
            );
            action
                .apply(writer)
                .await
                .map_err(|e| MigrationError::Action {
                    action: action.to_string(),
                    source: e.into(),
                })?;
            report.executed += 1;
            in_batch += 1;
            if in_batch >= self.batch_size {
                debug!(cool_down_ms = self.cool_down.as_millis() as u64, "cooling down");
                tokio::time::sleep(self.cool_down).await;
                report.pauses += 1;
                in_batch = 0;
            }
        }
        Ok(report)
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::from_config(&RateLimitConfig::default())
    }
}
