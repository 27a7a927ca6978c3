use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Label {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            color: String::new(),
            description: None,
        }
    }
}
