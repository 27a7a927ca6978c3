use serde::{Deserialize, Serialize};

use super::{Label, Milestone};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
}

/// An issue or pull request as listed by the issues endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Database identifier, used when a project card references this issue.
    #[serde(default)]
    pub id: u64,
    pub number: u64,
    pub title: String,
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub milestone: Option<Milestone>,
}

fn default_state() -> String {
    "open".into()
}

impl Issue {
    pub fn new(number: u64, title: &str) -> Self {
        Self {
            id: 0,
            number,
            title: title.to_string(),
            state: default_state(),
            html_url: String::new(),
            assignees: Vec::new(),
            labels: Vec::new(),
            milestone: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.state == "closed"
    }

    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().map(|l| l.name.clone()).collect()
    }
}
