use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    #[serde(default)]
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default)]
    pub due_on: Option<DateTime<Utc>>,
}

fn default_state() -> String {
    "open".into()
}

impl Milestone {
    pub fn new(title: &str) -> Self {
        Self {
            number: 0,
            title: title.to_string(),
            description: None,
            state: default_state(),
            due_on: None,
        }
    }
}
