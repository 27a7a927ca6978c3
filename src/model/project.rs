use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectColumn {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCard {
    pub id: u64,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub archived: bool,
    /// API URL of the issue an issue card points at, e.g.
    /// `https://api.github.com/repos/owner/repo/issues/3`.
    #[serde(default)]
    pub content_url: Option<String>,
}

impl ProjectCard {
    /// Note text, treating an empty note the same as no note.
    pub fn note_text(&self) -> Option<&str> {
        self.note.as_deref().filter(|n| !n.is_empty())
    }
}
