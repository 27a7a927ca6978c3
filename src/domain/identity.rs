use std::collections::HashMap;

use crate::model::Issue;

/// Target issue number to target issue database id.
///
/// Filled during the issue stage and only read afterwards, when project
/// cards that point at issues are recreated.
#[derive(Debug, Clone, Default)]
pub struct IssueIdentityMap {
    ids: HashMap<u64, u64>,
}

impl IssueIdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, number: u64, id: u64) {
        self.ids.insert(number, id);
    }

    pub fn record_all(&mut self, issues: &[Issue]) {
        for issue in issues {
            self.record(issue.number, issue.id);
        }
    }

    pub fn get(&self, number: u64) -> Option<u64> {
        self.ids.get(&number).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
